use super::backend::{StorageBackend, Visibility};
use crate::error::{CoreError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Local-disk backend rooted at a directory.
///
/// Visibility is accepted but not enforced; a local disk exposes whatever the
/// host serves from `base_url`.
pub struct LocalBackend {
    root: PathBuf,
    base_url: String,
}

impl LocalBackend {
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn absolute(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    fn ensure_parent(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(CoreError::Io)?;
            }
        }
        Ok(())
    }

    /// Convert an absolute path back to a root-relative, forward-slash path.
    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn collect_files(&self, dir: &Path, recursive: bool, out: &mut Vec<String>) -> Result<()> {
        if !dir.exists() {
            return Ok(());
        }
        for entry in fs::read_dir(dir).map_err(CoreError::Io)? {
            let entry = entry.map_err(CoreError::Io)?;
            let path = entry.path();
            if path.is_file() {
                out.push(self.relative(&path));
            } else if recursive && path.is_dir() {
                self.collect_files(&path, true, out)?;
            }
        }
        Ok(())
    }
}

impl StorageBackend for LocalBackend {
    fn read(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let absolute = self.absolute(path);
        if !absolute.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read(absolute).map_err(CoreError::Io)?))
    }

    fn write(&self, path: &str, content: &[u8], _visibility: Visibility) -> Result<()> {
        let target = self.absolute(path);
        self.ensure_parent(&target)?;

        // Atomic write: tmp file in the target directory, then rename
        let tmp = target.with_file_name(format!(".write-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, content).map_err(CoreError::Io)?;
        fs::rename(&tmp, &target).map_err(CoreError::Io)?;
        Ok(())
    }

    fn append(&self, path: &str, content: &[u8]) -> Result<()> {
        let target = self.absolute(path);
        self.ensure_parent(&target)?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(target)
            .map_err(CoreError::Io)?;
        file.write_all(content).map_err(CoreError::Io)?;
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.absolute(path).is_file()
    }

    fn copy(&self, from: &str, to: &str) -> Result<()> {
        let target = self.absolute(to);
        self.ensure_parent(&target)?;
        fs::copy(self.absolute(from), target).map_err(CoreError::Io)?;
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        let target = self.absolute(to);
        self.ensure_parent(&target)?;
        fs::rename(self.absolute(from), target).map_err(CoreError::Io)?;
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<()> {
        let absolute = self.absolute(path);
        if absolute.exists() {
            fs::remove_file(absolute).map_err(CoreError::Io)?;
        }
        Ok(())
    }

    fn make_directory(&self, path: &str) -> Result<()> {
        fs::create_dir_all(self.absolute(path)).map_err(CoreError::Io)?;
        Ok(())
    }

    fn delete_directory(&self, path: &str) -> Result<()> {
        let absolute = self.absolute(path);
        if absolute.exists() {
            fs::remove_dir_all(absolute).map_err(CoreError::Io)?;
        }
        Ok(())
    }

    fn directories(&self, dir: &str) -> Result<Vec<String>> {
        let absolute = self.absolute(dir);
        let mut dirs = Vec::new();
        if !absolute.exists() {
            return Ok(dirs);
        }
        for entry in fs::read_dir(absolute).map_err(CoreError::Io)? {
            let entry = entry.map_err(CoreError::Io)?;
            if entry.path().is_dir() {
                dirs.push(self.relative(&entry.path()));
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    fn files(&self, dir: &str) -> Result<Vec<String>> {
        let mut files = Vec::new();
        self.collect_files(&self.absolute(dir), false, &mut files)?;
        files.sort();
        Ok(files)
    }

    fn all_files(&self, dir: &str) -> Result<Vec<String>> {
        let mut files = Vec::new();
        self.collect_files(&self.absolute(dir), true, &mut files)?;
        files.sort();
        Ok(files)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn read_url(&self, url: &str) -> Result<Vec<u8>> {
        let path = url
            .strip_prefix(&self.base_url)
            .map(|rest| rest.trim_start_matches('/'))
            .unwrap_or(url);
        let path = path.split('?').next().unwrap_or(path);
        self.read(path)?
            .ok_or_else(|| CoreError::NotFound(path.to_string()))
    }

    fn is_local(&self) -> bool {
        true
    }
}
