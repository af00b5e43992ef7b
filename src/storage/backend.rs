use crate::error::Result;

/// Visibility policy applied to stored files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Abstract interface for raw storage I/O.
///
/// This trait handles the "how" of storage (local disk vs object store),
/// while [`Storage`](super::Storage) handles the "what" (prefixing,
/// visibility, directory composition).
///
/// Paths are forward-slash relative strings; listings return paths relative
/// to the backend root, keeping the listed directory as a prefix.
pub trait StorageBackend {
    /// Read file contents.
    /// Returns `Ok(None)` if the path does not exist.
    /// Returns `Err` only on actual I/O errors (permissions, disk failure).
    fn read(&self, path: &str) -> Result<Option<Vec<u8>>>;

    /// Write contents, creating parent directories as needed.
    /// MUST be atomic for local disks (write to tmp then rename).
    fn write(&self, path: &str, content: &[u8], visibility: Visibility) -> Result<()>;

    /// Append to a file, creating it when missing.
    fn append(&self, path: &str, content: &[u8]) -> Result<()>;

    /// Whether a file exists at the path.
    fn exists(&self, path: &str) -> bool;

    /// Copy a file to a new location.
    fn copy(&self, from: &str, to: &str) -> Result<()>;

    /// Move a file to a new location.
    fn rename(&self, from: &str, to: &str) -> Result<()>;

    /// Delete the file at the path. Deleting a missing file is a no-op.
    fn delete(&self, path: &str) -> Result<()>;

    /// Create a directory (and parents). Object stores may treat this as a
    /// no-op since they have no native directory concept.
    fn make_directory(&self, path: &str) -> Result<()>;

    /// Remove a directory tree natively. The facade only calls this on local
    /// backends; object stores delete per-file instead.
    fn delete_directory(&self, path: &str) -> Result<()>;

    /// Immediate subdirectories of a directory.
    fn directories(&self, dir: &str) -> Result<Vec<String>>;

    /// Files directly inside a directory (non-recursive).
    fn files(&self, dir: &str) -> Result<Vec<String>>;

    /// All files under a directory, recursively.
    fn all_files(&self, dir: &str) -> Result<Vec<String>>;

    /// Public URL for a path.
    fn url(&self, path: &str) -> String;

    /// Fetch contents through a URL previously produced by [`url`](Self::url),
    /// ignoring any query string. Used by the facade to bypass content caches
    /// on public object stores.
    fn read_url(&self, url: &str) -> Result<Vec<u8>>;

    /// Whether this backend is a local disk.
    fn is_local(&self) -> bool;
}
