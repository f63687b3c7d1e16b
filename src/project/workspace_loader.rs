use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use smol_str::SmolStr;

use super::error::LoadError;
use super::vfs::FileSystem;
use crate::base::has_xml_extension;
use crate::hir::{MapperNamespace, NamespaceRegistry};
use crate::syntax::MarkupIndex;

/// Builds namespace registries from every mapper under a root.
#[derive(Clone, Debug)]
pub struct WorkspaceLoader {
    mapper_tag: SmolStr,
}

impl WorkspaceLoader {
    pub fn new(mapper_tag: impl Into<SmolStr>) -> Self {
        Self {
            mapper_tag: mapper_tag.into(),
        }
    }

    /// Extract the catalog of every `.xml` file under `root` and build a
    /// fresh registry from them, in listing order.
    ///
    /// Fails only when the root itself cannot be listed; unreadable files
    /// are skipped.
    pub fn load_registry(
        &self,
        fs: &dyn FileSystem,
        root: &Path,
    ) -> Result<NamespaceRegistry, LoadError> {
        let paths: Vec<PathBuf> = fs
            .list_files_recursive(root)?
            .into_iter()
            .filter(|path| has_xml_extension(path))
            .collect();

        // Extract in parallel, keeping listing order.
        let results: Vec<_> = paths
            .par_iter()
            .map(|path| self.load_catalog(fs, path))
            .collect();

        let mut catalogs = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(catalog) => catalogs.push(catalog),
                Err(e) => {
                    tracing::warn!(
                        path = %e.path().display(),
                        error = %e,
                        "skipping mapper file"
                    );
                }
            }
        }

        let registry = NamespaceRegistry::from_catalogs(catalogs);
        tracing::info!(
            root = %root.display(),
            documents = registry.len(),
            namespaces = registry.unique_namespaces().len(),
            "rebuilt namespace registry"
        );
        Ok(registry)
    }

    /// Like [`load_registry`](Self::load_registry), but an unlistable root
    /// yields an empty registry.
    pub fn load_registry_or_empty(&self, fs: &dyn FileSystem, root: &Path) -> NamespaceRegistry {
        self.load_registry(fs, root).unwrap_or_else(|e| {
            tracing::warn!(root = %root.display(), error = %e, "mapper root unavailable");
            NamespaceRegistry::new()
        })
    }

    fn load_catalog(
        &self,
        fs: &dyn FileSystem,
        path: &Path,
    ) -> Result<MapperNamespace, LoadError> {
        let text = fs.read_to_string(path)?;
        let index = MarkupIndex::new(&text);
        Ok(MapperNamespace::extract(Arc::from(path), &index, &self.mapper_tag))
    }
}

impl Default for WorkspaceLoader {
    fn default() -> Self {
        Self::new(super::config::DEFAULT_MAPPER_TAG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::StatementKind;
    use crate::project::FileSet;

    fn mapper(namespace: &str, sql: &str) -> String {
        format!(r#"<mapper namespace="{namespace}"><sql id="{sql}">x</sql></mapper>"#)
    }

    #[test]
    fn test_load_registry_filters_xml() {
        let files = FileSet::new();
        files.insert("/m/a.xml", mapper("orders", "a"));
        files.insert("/m/sub/b.XML", mapper("orders", "b"));
        files.insert("/m/notes.txt", mapper("ignored", "c"));
        files.insert("/elsewhere/c.xml", mapper("users", "c"));

        let registry = WorkspaceLoader::default()
            .load_registry(&files, Path::new("/m"))
            .unwrap();

        assert_eq!(registry.len(), 2);
        let ids: Vec<_> = registry
            .unique_identifiers("orders", StatementKind::Sql)
            .into_iter()
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(!registry.has_namespace("ignored"));
        assert!(!registry.has_namespace("users"));
    }

    #[test]
    fn test_custom_mapper_tag() {
        let files = FileSet::new();
        files.insert("/m/a.xml", r#"<dao namespace="d"><sql id="x">1</sql></dao>"#);

        let registry = WorkspaceLoader::new("dao")
            .load_registry(&files, Path::new("/m"))
            .unwrap();
        assert!(registry.has_namespace("d"));

        let registry = WorkspaceLoader::default()
            .load_registry(&files, Path::new("/m"))
            .unwrap();
        assert!(registry.unique_namespaces().is_empty());
    }
}
