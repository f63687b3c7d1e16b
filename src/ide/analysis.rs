//! Analysis host — owns the registry snapshot and drives validation.
//!
//! [`AnalysisHost`] holds the configuration, the resolved mapper root and
//! the current [`NamespaceRegistry`]. A rebuild builds a complete new
//! registry and swaps it in with one write, so validation running on
//! another thread keeps reading the previous snapshot and never waits on
//! file-system work.
//!
//! ```ignore
//! let host = AnalysisHost::new(MapperConfig::from_source(&settings), Some(workspace));
//! host.validate_all(&OsFileSystem, &mut sink);
//!
//! let analysis = host.analysis();
//! let target = analysis.goto_definition(&doc, offset);
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use smol_str::SmolStr;

use crate::base::{Document, TextSize};
use crate::check::{CheckOptions, validate_document};
use crate::hir::{Diagnostic, NamespaceRegistry, StatementKind};
use crate::project::{ConfigError, FileSystem, MapperConfig, WorkspaceLoader};

use super::completion::{CompletionItem, completions};
use super::document_links::{DocumentLink, document_links};
use super::goto::{GotoResult, GotoTarget, goto_definition, resolve_reference};

/// Where validation results are published, keyed by document path.
///
/// Each call replaces everything previously published for `path`.
pub trait DiagnosticSink {
    fn publish(&mut self, path: &Path, diagnostics: Vec<Diagnostic>);
}

impl<S: std::hash::BuildHasher> DiagnosticSink for IndexMap<PathBuf, Vec<Diagnostic>, S> {
    fn publish(&mut self, path: &Path, diagnostics: Vec<Diagnostic>) {
        self.insert(path.to_path_buf(), diagnostics);
    }
}

// ============================================================================
// HOST
// ============================================================================

pub struct AnalysisHost {
    config: MapperConfig,
    options: Arc<CheckOptions>,
    root: Option<PathBuf>,
    root_error: Option<ConfigError>,
    registry: RwLock<Arc<NamespaceRegistry>>,
}

impl AnalysisHost {
    /// Create a host, resolving the configured root against `workspace`.
    ///
    /// An unresolvable root is logged once and leaves the host with an
    /// empty registry; see [`root_error`](Self::root_error).
    pub fn new(config: MapperConfig, workspace: Option<&Path>) -> Self {
        let (root, root_error) = match config.resolve_root(workspace) {
            Ok(root) => (Some(root), None),
            Err(e) => {
                tracing::warn!(error = %e, "mapper root unavailable");
                (None, Some(e))
            }
        };
        Self::build(config, root, root_error)
    }

    /// Create a host for an already resolved root, without touching disk.
    pub fn with_root(config: MapperConfig, root: impl Into<PathBuf>) -> Self {
        Self::build(config, Some(root.into()), None)
    }

    fn build(
        config: MapperConfig,
        root: Option<PathBuf>,
        root_error: Option<ConfigError>,
    ) -> Self {
        let options = Arc::new(config.check_options());
        Self {
            config,
            options,
            root,
            root_error,
            registry: RwLock::new(Arc::new(NamespaceRegistry::new())),
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Why the configured root could not be used, if it could not.
    pub fn root_error(&self) -> Option<&ConfigError> {
        self.root_error.as_ref()
    }

    /// The current registry snapshot.
    pub fn snapshot(&self) -> Arc<NamespaceRegistry> {
        self.registry.read().clone()
    }

    /// Get an immutable analysis view over the current snapshot.
    pub fn analysis(&self) -> Analysis {
        Analysis {
            registry: self.snapshot(),
            options: self.options.clone(),
        }
    }

    /// Rescan the root and swap in the new registry.
    ///
    /// The old snapshot stays readable until the swap.
    pub fn rebuild(&self, fs: &dyn FileSystem) -> Arc<NamespaceRegistry> {
        let loader = WorkspaceLoader::new(self.config.mapper_tag.clone());
        let registry = Arc::new(match &self.root {
            Some(root) => loader.load_registry_or_empty(fs, root),
            None => NamespaceRegistry::new(),
        });
        *self.registry.write() = registry.clone();
        registry
    }

    /// Whether `path` is a mapper document this host validates.
    pub fn is_mapper(&self, path: &Path) -> bool {
        match &self.root {
            Some(root) => path.starts_with(root) && crate::base::has_xml_extension(path),
            None => false,
        }
    }

    pub fn did_open(&self, doc: &Document, sink: &mut dyn DiagnosticSink) {
        self.validate_into(doc, sink);
    }

    pub fn did_change_active(&self, doc: &Document, sink: &mut dyn DiagnosticSink) {
        self.validate_into(doc, sink);
    }

    /// Saving may rename, add or remove ids, so the registry is rebuilt
    /// before the saved document is validated.
    pub fn did_save(&self, doc: &Document, fs: &dyn FileSystem, sink: &mut dyn DiagnosticSink) {
        if !self.is_mapper(doc.path()) {
            return;
        }
        self.rebuild(fs);
        self.validate_into(doc, sink);
    }

    /// Rebuild, then validate every mapper under the root.
    pub fn validate_all(&self, fs: &dyn FileSystem, sink: &mut dyn DiagnosticSink) {
        self.rebuild(fs);
        let Some(root) = &self.root else {
            return;
        };
        let paths = match fs.list_files_recursive(root) {
            Ok(paths) => paths,
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "mapper root unavailable");
                return;
            }
        };
        for path in paths.into_iter().filter(|path| self.is_mapper(path)) {
            match fs.read_to_string(&path) {
                Ok(text) => self.validate_into(&Document::new(&path, text), sink),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping mapper file");
                }
            }
        }
    }

    fn validate_into(&self, doc: &Document, sink: &mut dyn DiagnosticSink) {
        if !self.is_mapper(doc.path()) {
            return;
        }
        sink.publish(doc.path(), self.analysis().validate(doc));
    }
}

// ============================================================================
// ANALYSIS SNAPSHOT
// ============================================================================

/// A read view over one registry snapshot.
///
/// Cheap to create and to clone; a rebuild after creation is not seen.
#[derive(Clone)]
pub struct Analysis {
    registry: Arc<NamespaceRegistry>,
    options: Arc<CheckOptions>,
}

impl Analysis {
    pub fn new(registry: Arc<NamespaceRegistry>, options: CheckOptions) -> Self {
        Self {
            registry,
            options: Arc::new(options),
        }
    }

    pub fn registry(&self) -> &NamespaceRegistry {
        &self.registry
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Validate a document, whether or not it is under the root.
    pub fn validate(&self, doc: &Document) -> Vec<Diagnostic> {
        validate_document(doc, &self.registry, &self.options)
    }

    /// The `<sql>` fragment `namespace.id`, from saved documents.
    pub fn resolve_reference(&self, namespace: &str, id: &str) -> Option<GotoTarget> {
        resolve_reference(&self.registry, None, namespace, id)
    }

    pub fn list_namespaces(&self) -> Vec<SmolStr> {
        self.registry.unique_namespaces().into_iter().collect()
    }

    /// Distinct `sql` ids of `namespace`.
    pub fn list_identifiers(&self, namespace: &str) -> Vec<SmolStr> {
        self.registry
            .unique_identifiers(namespace, StatementKind::Sql)
            .into_iter()
            .collect()
    }

    pub fn goto_definition(&self, doc: &Document, offset: TextSize) -> Option<GotoResult> {
        goto_definition(doc, offset, &self.registry, &self.options.mapper_tag)
    }

    pub fn completions(&self, doc: &Document, offset: TextSize) -> Vec<CompletionItem> {
        completions(doc, offset, &self.registry)
    }

    pub fn document_links(&self, doc: &Document) -> Vec<DocumentLink> {
        document_links(doc, &self.registry, &self.options.mapper_tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::codes;
    use crate::project::FileSet;

    const ORDERS: &str = r#"<mapper namespace="orders">
  <sql id="cols">id, total</sql>
</mapper>"#;

    const REPORTS: &str = r#"<mapper namespace="reports">
  <select id="summary">select <include refid="orders.cols"/> from orders</select>
</mapper>"#;

    fn host(files: &FileSet) -> AnalysisHost {
        let host = AnalysisHost::with_root(MapperConfig::default(), "/m");
        host.rebuild(files);
        host
    }

    fn files() -> FileSet {
        let files = FileSet::new();
        files.insert("/m/orders.xml", ORDERS);
        files.insert("/m/reports.xml", REPORTS);
        files
    }

    #[test]
    fn test_validate_all_publishes_every_mapper() {
        let files = files();
        files.insert("/m/readme.txt", "<where>");
        files.insert("/outside/x.xml", "<where>");
        let host = AnalysisHost::with_root(MapperConfig::default(), "/m");

        let mut sink: IndexMap<PathBuf, Vec<Diagnostic>> = IndexMap::new();
        host.validate_all(&files, &mut sink);

        let published: Vec<_> = sink.keys().cloned().collect();
        assert_eq!(
            published,
            vec![PathBuf::from("/m/orders.xml"), PathBuf::from("/m/reports.xml")]
        );
        assert!(sink.values().all(Vec::is_empty));
    }

    #[test]
    fn test_save_rebuilds_before_validating() {
        let files = files();
        let host = host(&files);
        let mut sink: IndexMap<PathBuf, Vec<Diagnostic>> = IndexMap::new();

        // Renaming the fragment breaks the reference once orders is saved.
        let renamed = ORDERS.replace("\"cols\"", "\"columns\"");
        files.insert("/m/orders.xml", renamed.clone());
        let reports = Document::new("/m/reports.xml", REPORTS);
        host.did_change_active(&reports, &mut sink);
        assert!(sink[Path::new("/m/reports.xml")].is_empty());

        host.did_save(&Document::new("/m/orders.xml", renamed), &files, &mut sink);
        host.did_change_active(&reports, &mut sink);
        let diags = &sink[Path::new("/m/reports.xml")];
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, codes::REFID_MISSING);
    }

    #[test]
    fn test_snapshot_survives_rebuild() {
        let files = files();
        let host = host(&files);
        let before = host.analysis();

        files.remove(Path::new("/m/orders.xml"));
        host.rebuild(&files);

        assert_eq!(before.list_namespaces(), vec!["orders", "reports"]);
        assert_eq!(host.analysis().list_namespaces(), vec!["reports"]);
    }

    #[test]
    fn test_documents_outside_root_are_ignored() {
        let host = host(&files());
        let mut sink: IndexMap<PathBuf, Vec<Diagnostic>> = IndexMap::new();
        host.did_open(&Document::new("/elsewhere/a.xml", "<where>"), &mut sink);
        host.did_open(&Document::new("/m/notes.md", "<where>"), &mut sink);
        assert!(sink.is_empty());

        host.did_open(&Document::new("/m/NEW.XML", "<where>"), &mut sink);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_queries() {
        let analysis = host(&files()).analysis();
        assert_eq!(analysis.list_identifiers("orders"), vec!["cols"]);
        assert!(analysis.list_identifiers("reports").is_empty());

        let target = analysis.resolve_reference("orders", "cols").unwrap();
        assert_eq!(&*target.path, Path::new("/m/orders.xml"));
        assert_eq!(&ORDERS[target.range], r#"<sql id="cols">id, total</sql>"#);
        assert!(analysis.resolve_reference("orders", "nope").is_none());
    }

    #[test]
    fn test_missing_root_degrades_to_empty_registry() {
        let config = MapperConfig {
            mapper_path: "./does/not/exist".to_string(),
            ..MapperConfig::default()
        };
        let host = AnalysisHost::new(config, Some(Path::new("/nonexistent-workspace")));
        assert!(matches!(host.root_error(), Some(ConfigError::RootNotFound { .. })));

        host.rebuild(&files());
        assert!(host.snapshot().is_empty());
    }
}
