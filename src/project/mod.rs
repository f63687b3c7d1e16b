//! Project-level plumbing: configuration, the file-system collaborator
//! and registry loading.

mod config;
mod error;
mod file_set;
mod vfs;
mod workspace_loader;

pub use config::{ConfigSource, DEFAULT_MAPPER_TAG, MapperConfig, keys};
pub use error::{ConfigError, LoadError};
pub use file_set::FileSet;
pub use vfs::{FileSystem, OsFileSystem};
pub use workspace_loader::WorkspaceLoader;
