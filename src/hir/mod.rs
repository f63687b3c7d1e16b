//! Semantic model of mapper documents.
//!
//! - [`catalog`]: per-document namespace and statement ids
//! - [`registry`]: every catalog under the mapper root, merged by namespace
//! - [`diagnostics`]: findings reported by the validators

mod catalog;
pub mod diagnostics;
mod registry;

pub use catalog::{
    MapperNamespace, NO_NAMESPACE, StatementIds, StatementKind, TagDetails, extract_catalog,
    is_named,
};
pub use diagnostics::{
    Category, Diagnostic, DiagnosticCollector, DiagnosticData, Severity, codes,
};
pub use registry::NamespaceRegistry;
