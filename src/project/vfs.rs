//! File-system collaborator used by the workspace loader.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::LoadError;

/// Recursive listing and reading of mapper files.
///
/// Implementations must be shareable across threads; catalogs are
/// extracted in parallel.
pub trait FileSystem: Sync {
    /// Every file under `root`, in a stable order.
    fn list_files_recursive(&self, root: &Path) -> Result<Vec<PathBuf>, LoadError>;

    fn read_to_string(&self, path: &Path) -> Result<String, LoadError>;
}

/// The real file system.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn list_files_recursive(&self, root: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(LoadError::Walk {
                        path: root.to_path_buf(),
                        source: e,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        path = ?e.path(),
                        error = %e,
                        "skipping unreadable entry under mapper root"
                    );
                    continue;
                }
            };
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    fn read_to_string(&self, path: &Path) -> Result<String, LoadError> {
        std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
