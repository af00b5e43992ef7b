use super::backend::{StorageBackend, Visibility};
use crate::error::{CoreError, Result};
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Clone)]
struct FileEntry {
    data: Vec<u8>,
    #[allow(dead_code)]
    visibility: Visibility,
}

/// In-memory backend with a flat key space and no native directory concept,
/// standing in for a cloud object store in tests.
///
/// Uses `RefCell` for interior mutability since execution is single-threaded
/// and request-scoped. This keeps `&self` on all trait methods without the
/// overhead of a lock.
pub struct MemoryBackend {
    files: RefCell<HashMap<String, FileEntry>>,
    base_url: String,
    simulate_write_error: RefCell<bool>,
    last_url_read: RefCell<Option<String>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self {
            files: RefCell::new(HashMap::new()),
            base_url: "memory://disk".to_string(),
            simulate_write_error: RefCell::new(false),
            last_url_read: RefCell::new(None),
        }
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// The last URL fetched through [`read_url`](StorageBackend::read_url),
    /// for asserting on cache-busting behavior in tests.
    pub fn last_url_read(&self) -> Option<String> {
        self.last_url_read.borrow().clone()
    }

    fn guard_write(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(CoreError::Storage("Simulated write error".to_string()));
        }
        Ok(())
    }

    fn normalize(path: &str) -> String {
        path.trim_start_matches('/').to_string()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let files = self.files.borrow();
        Ok(files.get(&Self::normalize(path)).map(|e| e.data.clone()))
    }

    fn write(&self, path: &str, content: &[u8], visibility: Visibility) -> Result<()> {
        self.guard_write()?;
        self.files.borrow_mut().insert(
            Self::normalize(path),
            FileEntry {
                data: content.to_vec(),
                visibility,
            },
        );
        Ok(())
    }

    fn append(&self, path: &str, content: &[u8]) -> Result<()> {
        self.guard_write()?;
        let mut files = self.files.borrow_mut();
        files
            .entry(Self::normalize(path))
            .or_insert_with(|| FileEntry {
                data: Vec::new(),
                visibility: Visibility::Private,
            })
            .data
            .extend_from_slice(content);
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.files.borrow().contains_key(&Self::normalize(path))
    }

    fn copy(&self, from: &str, to: &str) -> Result<()> {
        self.guard_write()?;
        let entry = {
            let files = self.files.borrow();
            files
                .get(&Self::normalize(from))
                .cloned()
                .ok_or_else(|| CoreError::NotFound(from.to_string()))?
        };
        self.files.borrow_mut().insert(Self::normalize(to), entry);
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        self.guard_write()?;
        let entry = self
            .files
            .borrow_mut()
            .remove(&Self::normalize(from))
            .ok_or_else(|| CoreError::NotFound(from.to_string()))?;
        self.files.borrow_mut().insert(Self::normalize(to), entry);
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<()> {
        self.files.borrow_mut().remove(&Self::normalize(path));
        Ok(())
    }

    fn make_directory(&self, _path: &str) -> Result<()> {
        // Object stores have no directories; keys carry the full path
        Ok(())
    }

    fn delete_directory(&self, path: &str) -> Result<()> {
        let prefix = format!("{}/", Self::normalize(path));
        self.files
            .borrow_mut()
            .retain(|key, _| !key.starts_with(&prefix));
        Ok(())
    }

    fn directories(&self, dir: &str) -> Result<Vec<String>> {
        let prefix = match Self::normalize(dir).as_str() {
            "" => String::new(),
            normalized => format!("{}/", normalized),
        };
        let files = self.files.borrow();
        let mut dirs: Vec<String> = files
            .keys()
            .filter_map(|key| {
                let rest = key.strip_prefix(&prefix)?;
                let (first, remainder) = rest.split_once('/')?;
                if remainder.is_empty() {
                    return None;
                }
                Some(format!("{}{}", prefix, first))
            })
            .collect();
        dirs.sort();
        dirs.dedup();
        Ok(dirs)
    }

    fn files(&self, dir: &str) -> Result<Vec<String>> {
        let prefix = match Self::normalize(dir).as_str() {
            "" => String::new(),
            normalized => format!("{}/", normalized),
        };
        let files = self.files.borrow();
        let mut listed: Vec<String> = files
            .keys()
            .filter(|key| {
                key.strip_prefix(&prefix)
                    .is_some_and(|rest| !rest.contains('/'))
            })
            .cloned()
            .collect();
        listed.sort();
        Ok(listed)
    }

    fn all_files(&self, dir: &str) -> Result<Vec<String>> {
        let prefix = match Self::normalize(dir).as_str() {
            "" => String::new(),
            normalized => format!("{}/", normalized),
        };
        let files = self.files.borrow();
        let mut listed: Vec<String> = files
            .keys()
            .filter(|key| key.starts_with(&prefix))
            .cloned()
            .collect();
        listed.sort();
        Ok(listed)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, Self::normalize(path))
    }

    fn read_url(&self, url: &str) -> Result<Vec<u8>> {
        *self.last_url_read.borrow_mut() = Some(url.to_string());

        let path = url
            .strip_prefix(&self.base_url)
            .map(|rest| rest.trim_start_matches('/'))
            .unwrap_or(url);
        let path = path.split('?').next().unwrap_or(path);
        self.read(path)?
            .ok_or_else(|| CoreError::NotFound(path.to_string()))
    }

    fn is_local(&self) -> bool {
        false
    }
}
