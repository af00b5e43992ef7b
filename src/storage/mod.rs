//! # File Storage
//!
//! A uniform, path-based API over pluggable backends.
//!
//! - [`StorageBackend`]: raw I/O contract (local disk or object store).
//! - [`DiskRegistry`]: named disks with an optional path prefix each, plus a
//!   default disk used when a configured name is unknown.
//! - [`Storage`]: the facade applications talk to. Constructed with a
//!   `public` flag, it resolves the disk, path prefix, and visibility once and
//!   applies them to every operation.
//!
//! ## Directory operations
//!
//! Object stores have no native directory concept, so the facade composes
//! directory copy/move/delete out of per-file operations, substituting the
//! source prefix and aborting at the first failing file. The emptied source
//! tree is removed natively, but only on local disks.
//!
//! ## Public cloud reads
//!
//! Some cloud providers cache public file contents aggressively. For public
//! visibility on a non-local backend, [`Storage::get`] reads through the
//! file's URL with a throwaway `rand` query parameter instead of the backend's
//! native read call.

pub mod backend;
pub mod local;
pub mod memory;

pub use backend::{StorageBackend, Visibility};
pub use local::LocalBackend;
pub use memory::MemoryBackend;

use crate::config::CoreConfig;
use crate::error::{CoreError, Result};
use chrono::Utc;
use log::debug;
use std::collections::HashMap;
use std::rc::Rc;

struct Disk {
    backend: Rc<dyn StorageBackend>,
    path_prefix: Option<String>,
}

/// Named disks and the default used for unrecognized names.
pub struct DiskRegistry {
    disks: HashMap<String, Disk>,
    default_disk: String,
}

impl DiskRegistry {
    pub fn new(default_disk: &str) -> Self {
        Self {
            disks: HashMap::new(),
            default_disk: default_disk.to_string(),
        }
    }

    pub fn register(&mut self, name: &str, backend: Rc<dyn StorageBackend>) {
        self.disks.insert(
            name.to_string(),
            Disk {
                backend,
                path_prefix: None,
            },
        );
    }

    pub fn register_with_prefix(
        &mut self,
        name: &str,
        backend: Rc<dyn StorageBackend>,
        path_prefix: &str,
    ) {
        self.disks.insert(
            name.to_string(),
            Disk {
                backend,
                path_prefix: Some(path_prefix.trim_matches('/').to_string()),
            },
        );
    }

    /// Resolve a configured disk name, falling back to the default disk when
    /// the name is not registered.
    fn resolve(&self, name: &str) -> Result<&Disk> {
        if let Some(disk) = self.disks.get(name) {
            return Ok(disk);
        }
        self.disks.get(&self.default_disk).ok_or_else(|| {
            CoreError::Storage(format!(
                "Unknown disk `{}` and no default disk `{}` registered",
                name, self.default_disk
            ))
        })
    }
}

/// Path-based facade over one resolved disk.
pub struct Storage {
    backend: Rc<dyn StorageBackend>,
    visibility: Visibility,
    prefix: String,
}

impl Storage {
    /// Resolve the configured public or private disk and fix the visibility
    /// policy for every subsequent operation.
    pub fn new(registry: &DiskRegistry, config: &CoreConfig, public: bool) -> Result<Self> {
        let name = if public {
            &config.public_disk
        } else {
            &config.private_disk
        };
        let disk = registry.resolve(name)?;
        Ok(Self {
            backend: Rc::clone(&disk.backend),
            visibility: if public {
                Visibility::Public
            } else {
                Visibility::Private
            },
            prefix: disk.path_prefix.clone().unwrap_or_default(),
        })
    }

    /// File or folder name from a path (last segment).
    pub fn name(path: &str) -> &str {
        path.rsplit('/').next().unwrap_or(path)
    }

    fn full_path(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if self.prefix.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.prefix, path)
        }
    }

    /// File contents as raw bytes. Fails with `NotFound` for missing paths.
    ///
    /// For public visibility on non-local backends, reads through the URL
    /// with a cache-busting query parameter instead of the native read.
    pub fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        if !self.backend.is_local() && self.visibility == Visibility::Public {
            let url = format!("{}?rand={}", self.url(path), Utc::now().timestamp());
            debug!("reading {} through url to bypass content cache", path);
            return self.backend.read_url(&url);
        }

        let full = self.full_path(path);
        self.backend
            .read(&full)?
            .ok_or(CoreError::NotFound(full))
    }

    /// File contents as text.
    pub fn get(&self, path: &str) -> Result<String> {
        let bytes = self.get_bytes(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Public URL for a path.
    pub fn url(&self, path: &str) -> String {
        self.backend.url(&self.full_path(path))
    }

    /// Write contents; visibility defaults to the facade's policy.
    pub fn put(&self, path: &str, content: &[u8], visibility: Option<Visibility>) -> Result<()> {
        self.backend.write(
            &self.full_path(path),
            content,
            visibility.unwrap_or(self.visibility),
        )
    }

    pub fn append(&self, path: &str, content: &[u8]) -> Result<()> {
        self.backend.append(&self.full_path(path), content)
    }

    pub fn exists(&self, path: &str) -> bool {
        self.backend.exists(&self.full_path(path))
    }

    pub fn copy(&self, from: &str, to: &str) -> Result<()> {
        self.backend.copy(&self.full_path(from), &self.full_path(to))
    }

    pub fn move_file(&self, from: &str, to: &str) -> Result<()> {
        self.backend
            .rename(&self.full_path(from), &self.full_path(to))
    }

    /// Copy every file under `from` into `to`, substituting the prefix.
    /// Aborts at the first file that fails.
    pub fn copy_directory(&self, from: &str, to: &str) -> Result<()> {
        let from_full = self.full_path(from);
        let to_full = self.full_path(to);
        for file in self.backend.all_files(&from_full)? {
            let target = file.replacen(&from_full, &to_full, 1);
            self.backend.copy(&file, &target)?;
        }
        Ok(())
    }

    /// Move every file under `from` into `to`, then remove the emptied source
    /// tree when the backend is a local disk.
    pub fn move_directory(&self, from: &str, to: &str) -> Result<()> {
        let from_full = self.full_path(from);
        let to_full = self.full_path(to);
        for file in self.backend.all_files(&from_full)? {
            let target = file.replacen(&from_full, &to_full, 1);
            self.backend.rename(&file, &target)?;
        }
        if self.backend.is_local() {
            self.backend.delete_directory(&from_full)?;
        }
        Ok(())
    }

    pub fn make_directory(&self, path: &str) -> Result<()> {
        self.backend.make_directory(&self.full_path(path))
    }

    /// Remove a directory and all of its files: natively on a local disk,
    /// file by file on an object store.
    pub fn delete_directory(&self, dir: &str) -> Result<()> {
        let full = self.full_path(dir);
        if self.backend.is_local() {
            return self.backend.delete_directory(&full);
        }
        for file in self.backend.all_files(&full)? {
            self.backend.delete(&file)?;
        }
        Ok(())
    }

    pub fn delete(&self, path: &str) -> Result<()> {
        self.backend.delete(&self.full_path(path))
    }

    pub fn delete_many(&self, paths: &[&str]) -> Result<()> {
        for path in paths {
            self.delete(path)?;
        }
        Ok(())
    }

    pub fn directories(&self, dir: &str) -> Result<Vec<String>> {
        self.backend.directories(&self.full_path(dir))
    }

    pub fn files(&self, dir: &str) -> Result<Vec<String>> {
        self.backend.files(&self.full_path(dir))
    }

    pub fn all_files(&self, dir: &str) -> Result<Vec<String>> {
        self.backend.all_files(&self.full_path(dir))
    }
}
