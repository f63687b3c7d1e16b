//! Mapper configuration read from the host.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::path::{Path, PathBuf};

use smol_str::SmolStr;

use super::error::ConfigError;
use crate::check::CheckOptions;

/// Configuration keys understood by [`MapperConfig::from_source`].
pub mod keys {
    pub const MAPPER_PATH: &str = "mapperPath";
    pub const MAPPER_TAG: &str = "mapperTag";
    pub const LEGACY_SUPPORT: &str = "legacySupport";
}

pub const DEFAULT_MAPPER_TAG: &str = "mapper";

/// Where the host keeps its settings.
pub trait ConfigSource {
    /// The raw value of `key`, if set.
    fn get(&self, key: &str) -> Option<String>;
}

impl<S: BuildHasher> ConfigSource for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapperConfig {
    /// The mapper root as configured, before resolution.
    pub mapper_path: String,
    pub mapper_tag: SmolStr,
    pub legacy_support: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            mapper_path: String::new(),
            mapper_tag: SmolStr::new_static(DEFAULT_MAPPER_TAG),
            legacy_support: false,
        }
    }
}

impl MapperConfig {
    /// Read every key, falling back to defaults for unset or blank values.
    pub fn from_source(source: &dyn ConfigSource) -> Self {
        let value = |key: &str| source.get(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(path) = value(keys::MAPPER_PATH) {
            config.mapper_path = path;
        }
        if let Some(tag) = value(keys::MAPPER_TAG) {
            config.mapper_tag = SmolStr::new(tag.trim());
        }
        if let Some(flag) = value(keys::LEGACY_SUPPORT) {
            config.legacy_support = is_truthy(&flag);
        }
        config
    }

    pub fn check_options(&self) -> CheckOptions {
        CheckOptions::new(self.mapper_tag.clone(), self.legacy_support)
    }

    /// Resolve the configured path to an existing directory.
    ///
    /// Backslashes are treated as separators, and a path starting with `.`
    /// is relative to `workspace`.
    pub fn resolve_root(&self, workspace: Option<&Path>) -> Result<PathBuf, ConfigError> {
        let configured = self.mapper_path.trim().replace('\\', "/");
        if configured.is_empty() {
            return Err(ConfigError::Unset);
        }

        let root = if configured.starts_with('.') {
            let Some(workspace) = workspace else {
                return Err(ConfigError::MissingWorkspace { path: configured });
            };
            workspace.join(&configured)
        } else {
            PathBuf::from(&configured)
        };

        match std::fs::metadata(&root) {
            Ok(meta) if meta.is_dir() => Ok(root),
            Ok(_) => Err(ConfigError::RootNotDirectory { path: root }),
            Err(_) => Err(ConfigError::RootNotFound { path: root }),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}
