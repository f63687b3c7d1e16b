//! Errors raised while configuring or loading the mapper root.

use std::path::PathBuf;

use thiserror::Error;

/// The configured mapper root cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no mapper path is configured")]
    Unset,

    /// A relative path was configured but no workspace folder is open.
    #[error("invalid path for mapper path: \"{path}\" is relative and no workspace folder is open")]
    MissingWorkspace { path: String },

    #[error("invalid path for mapper path: {} does not exist", .path.display())]
    RootNotFound { path: PathBuf },

    #[error("invalid path for mapper path: {} is not a directory", .path.display())]
    RootNotDirectory { path: PathBuf },
}

/// A mapper file or directory could not be read.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl LoadError {
    /// The path that failed.
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Io { path, .. } | LoadError::Walk { path, .. } => path,
        }
    }
}
