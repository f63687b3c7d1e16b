//! # mapperlint-base
//!
//! Tolerant validation engine for MyBatis-style SQL mapper documents.
//!
//! Mapper files are not well-formed XML: bare comparison operators may
//! appear inside `test="..."` attributes, so documents are scanned with a
//! forgiving lexer that knows just enough of the dialect to tell an
//! operator from an unterminated tag.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide     → AnalysisHost, goto, completion, code actions, links
//!   ↓
//! project → configuration, file system, registry rebuild
//!   ↓
//! check   → balance, caret, reference and duplicate validators
//!   ↓
//! hir     → catalogs, namespace registry, diagnostics
//!   ↓
//! syntax  → logos lexer, markup event stream, tag vocabulary
//!   ↓
//! base    → TextRange, LineIndex, Document
//! ```

/// Foundation types: text ranges, line index, documents
pub mod base;

/// Lexing and the markup event stream
pub mod syntax;

/// Catalogs, the namespace registry and diagnostics
pub mod hir;

/// Validators run over one document
pub mod check;

/// Configuration, file-system access and registry loading
pub mod project;

/// Editor-facing features
pub mod ide;

/// JSON diagnostic reports
#[cfg(feature = "interchange")]
pub mod interchange;

pub use base::{Document, LineCol, LineIndex, TextRange, TextSize};
pub use check::{CheckOptions, validate_document};
pub use hir::{Diagnostic, NamespaceRegistry, Severity};
pub use ide::{Analysis, AnalysisHost, DiagnosticSink};
pub use project::{MapperConfig, OsFileSystem, WorkspaceLoader};
