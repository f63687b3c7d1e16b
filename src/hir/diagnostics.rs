//! Diagnostics — validation findings for one document.
//!
//! Every validator reports through a [`DiagnosticCollector`], whose typed
//! helpers own the codes and message wording so each finding is spelled
//! the same way wherever it is raised.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::TextRange;
use crate::syntax::{CaretKind, Discipline};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}

/// Which family of check produced a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Unmatched tag open or close.
    Structural,
    /// Bare operator that must be escaped.
    Lexical,
    /// A refid that does not resolve, or resolves only implicitly.
    Referential,
    /// Duplicate namespace or statement id.
    Identity,
}

/// Extra payload used by code actions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticData {
    /// The operator that the fix should escape.
    Caret(CaretKind),
    /// A namespace the refid can be prefixed with.
    Namespace(SmolStr),
}

/// A diagnostic anchored to a byte range of the validated document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub range: TextRange,
    pub severity: Severity,
    pub code: SmolStr,
    pub message: Arc<str>,
    pub category: Category,
    pub data: Option<DiagnosticData>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(category: Category, range: TextRange, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Error, category, range, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(category: Category, range: TextRange, message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Warning, category, range, message)
    }

    fn new(
        severity: Severity,
        category: Category,
        range: TextRange,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            range,
            severity,
            code: SmolStr::default(),
            message: message.into(),
            category,
            data: None,
        }
    }

    /// Set the diagnostic code.
    pub fn with_code(mut self, code: impl Into<SmolStr>) -> Self {
        self.code = code.into();
        self
    }

    /// Attach code action data.
    pub fn with_data(mut self, data: DiagnosticData) -> Self {
        self.data = Some(data);
        self
    }

    /// The caret operator this diagnostic flags, if any.
    pub fn caret_kind(&self) -> Option<CaretKind> {
        match self.data {
            Some(DiagnosticData::Caret(kind)) => Some(kind),
            _ => None,
        }
    }

    /// The namespace suggested for prefixing a refid, if any.
    pub fn suggested_namespace(&self) -> Option<&str> {
        match &self.data {
            Some(DiagnosticData::Namespace(ns)) => Some(ns.as_str()),
            _ => None,
        }
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Diagnostic codes understood by hosts and code actions.
pub mod codes {
    use smol_str::{SmolStr, format_smolstr};

    /// Suffix of the per-tag balance code, e.g. `ifMissingClosing`.
    pub const MISSING_CLOSING_SUFFIX: &str = "MissingClosing";

    pub const NAMESPACE_MISSING: &str = "namespaceMissing";
    pub const REFID_MISSING: &str = "refIdMissing";
    pub const NO_NAMESPACE: &str = "noNamespace";
    pub const REFID_MISSING_NO_NAMESPACE: &str = "refIdMissingNoNamespace";

    pub const DUPLICATE_NAMESPACE: &str = "duplicateNamespace";
    pub const DUPLICATE_ID: &str = "duplicateId";

    /// The balance code for `tag`.
    pub fn missing_closing(tag: &str) -> SmolStr {
        format_smolstr!("{tag}{MISSING_CLOSING_SUFFIX}")
    }
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during one validation pass.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// A tag open with no terminator at its nesting level.
    pub fn missing_closing(&mut self, tag: &str, discipline: Discipline, range: TextRange) {
        self.add(
            Diagnostic::error(
                Category::Structural,
                range,
                format!(
                    "This tag is missing a closing {}.",
                    discipline.expected_closer(tag)
                ),
            )
            .with_code(codes::missing_closing(tag)),
        );
    }

    /// A closing tag with no open of the same name pending.
    pub fn extra_closing(&mut self, tag: &str, range: TextRange) {
        self.add(
            Diagnostic::error(
                Category::Structural,
                range,
                "This closing tag has no opening pair.",
            )
            .with_code(codes::missing_closing(tag)),
        );
    }

    pub fn bare_operator(&mut self, kind: CaretKind, range: TextRange) {
        let usage = if kind.is_bitwise() {
            "bitwise operations"
        } else {
            "comparison"
        };
        self.add(
            Diagnostic::error(
                Category::Lexical,
                range,
                format!(
                    "{} cannot be used in mapper files for {usage}.",
                    kind.operator()
                ),
            )
            .with_code(kind.code())
            .with_data(DiagnosticData::Caret(kind)),
        );
    }

    pub fn namespace_missing(&mut self, namespace: &str, range: TextRange) {
        self.add(
            Diagnostic::error(
                Category::Referential,
                range,
                format!("The namespace \"{namespace}\" does not exist."),
            )
            .with_code(codes::NAMESPACE_MISSING),
        );
    }

    pub fn refid_missing(&mut self, namespace: &str, id: &str, range: TextRange) {
        self.add(
            Diagnostic::error(
                Category::Referential,
                range,
                format!("The refid \"{id}\" does not exist in the namespace \"{namespace}\"."),
            )
            .with_code(codes::REFID_MISSING),
        );
    }

    /// An unqualified refid that resolved, in `found_in` when that
    /// namespace has a name to prefix with.
    pub fn implicit_namespace(&mut self, found_in: Option<&str>, range: TextRange) {
        let mut diagnostic = Diagnostic::warning(
            Category::Referential,
            range,
            "No namespace is provided in this refid, please add one to avoid confusion.",
        )
        .with_code(codes::NO_NAMESPACE);
        if let Some(namespace) = found_in {
            diagnostic = diagnostic.with_data(DiagnosticData::Namespace(SmolStr::new(namespace)));
        }
        self.add(diagnostic);
    }

    /// An unqualified refid missing from the document's own namespace.
    pub fn refid_missing_in_file(
        &mut self,
        id: &str,
        namespace: &str,
        suggestion: Option<SmolStr>,
        range: TextRange,
    ) {
        let message =
            format!("The refid \"{id}\" does not exist in the namespace of this file, \"{namespace}\".");
        self.unresolved_unqualified(message, suggestion, range);
    }

    /// An unqualified refid missing from every namespace (legacy mode).
    pub fn refid_missing_in_project(&mut self, id: &str, range: TextRange) {
        let message = format!("The refid \"{id}\" does not exist in any namespace of this project.");
        self.unresolved_unqualified(message, None, range);
    }

    fn unresolved_unqualified(
        &mut self,
        message: String,
        suggestion: Option<SmolStr>,
        range: TextRange,
    ) {
        let mut diagnostic = Diagnostic::error(Category::Referential, range, message)
            .with_code(codes::REFID_MISSING_NO_NAMESPACE);
        if let Some(namespace) = suggestion {
            diagnostic = diagnostic.with_data(DiagnosticData::Namespace(namespace));
        }
        self.add(diagnostic);
    }

    pub fn duplicate_namespace(&mut self, namespace: &str, range: TextRange) {
        self.add(
            Diagnostic::warning(
                Category::Identity,
                range,
                format!("The namespace \"{namespace}\" is already in use in another mapper."),
            )
            .with_code(codes::DUPLICATE_NAMESPACE),
        );
    }

    /// The same id declared by statements of different kinds.
    pub fn duplicate_id_across_kinds(&mut self, id: &str, range: TextRange) {
        self.add(
            Diagnostic::warning(
                Category::Identity,
                range,
                format!(
                    "The id \"{id}\" is already used by a different tag, please change one of these to avoid confusion."
                ),
            )
            .with_code(codes::DUPLICATE_ID),
        );
    }

    /// The same id declared twice by statements of one kind.
    pub fn duplicate_id(&mut self, id: &str, range: TextRange) {
        self.add(
            Diagnostic::error(
                Category::Identity,
                range,
                format!("The id \"{id}\" is already used by the same tag type in this namespace."),
            )
            .with_code(codes::DUPLICATE_ID),
        );
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Consume the collector, ordering diagnostics by position.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        self.diagnostics
            .sort_by_key(|d| (d.range.start(), d.range.end()));
        self.diagnostics
    }
}
