//! In-memory file set, for hosts that hand documents over directly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::error::LoadError;
use super::vfs::FileSystem;

/// Path to contents, shared behind a lock so it can be filled while a
/// loader reads from it.
#[derive(Debug, Default)]
pub struct FileSet {
    files: RwLock<IndexMap<PathBuf, Arc<str>>>,
}

impl FileSet {
    /// Create a new empty file set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the contents of a file, replacing any previous contents.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<Arc<str>>) {
        self.files.write().insert(path.into(), contents.into());
    }

    /// Get the contents of a file.
    pub fn contents(&self, path: &Path) -> Option<Arc<str>> {
        self.files.read().get(path).cloned()
    }

    /// Remove a file from the set.
    pub fn remove(&self, path: &Path) -> Option<Arc<str>> {
        self.files.write().shift_remove(path)
    }

    /// Get the number of files.
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// Check if the file set is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All paths, in insertion order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.read().keys().cloned().collect()
    }
}

impl FileSystem for FileSet {
    fn list_files_recursive(&self, root: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let mut paths: Vec<_> = self
            .files
            .read()
            .keys()
            .filter(|path| path.starts_with(root))
            .cloned()
            .collect();
        paths.sort();
        Ok(paths)
    }

    fn read_to_string(&self, path: &Path) -> Result<String, LoadError> {
        self.contents(path)
            .map(|text| text.to_string())
            .ok_or_else(|| LoadError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }
}
