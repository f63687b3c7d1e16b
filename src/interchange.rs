//! JSON diagnostic reports for hosts that publish out of process.
//!
//! Positions are 1-indexed, columns in UTF-8 bytes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::base::{Document, LineCol};
use crate::hir::{Category, Diagnostic, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPosition {
    pub line: u32,
    pub column: u32,
}

impl From<LineCol> for ReportPosition {
    fn from(pos: LineCol) -> Self {
        Self {
            line: pos.line_one_indexed(),
            column: pos.col_one_indexed(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportSeverity {
    Error,
    Warning,
}

impl From<Severity> for ReportSeverity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => Self::Error,
            Severity::Warning => Self::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportCategory {
    Structural,
    Lexical,
    Referential,
    Identity,
}

impl From<Category> for ReportCategory {
    fn from(category: Category) -> Self {
        match category {
            Category::Structural => Self::Structural,
            Category::Lexical => Self::Lexical,
            Category::Referential => Self::Referential,
            Category::Identity => Self::Identity,
        }
    }
}

/// One diagnostic as written to the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub code: String,
    pub message: String,
    pub severity: ReportSeverity,
    pub category: ReportCategory,
    pub start: ReportPosition,
    pub end: ReportPosition,
}

/// Every diagnostic of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub path: String,
    pub diagnostics: Vec<ReportEntry>,
}

impl DiagnosticReport {
    pub fn new(doc: &Document, diagnostics: &[Diagnostic]) -> Self {
        let diagnostics = diagnostics
            .iter()
            .map(|diagnostic| {
                let (start, end) = doc.range_positions(diagnostic.range);
                ReportEntry {
                    code: diagnostic.code.to_string(),
                    message: diagnostic.message.to_string(),
                    severity: diagnostic.severity.into(),
                    category: diagnostic.category.into(),
                    start: start.into(),
                    end: end.into(),
                }
            })
            .collect();
        Self {
            path: doc.path().display().to_string(),
            diagnostics,
        }
    }
}

/// Render the diagnostics of `text` at `path` as pretty-printed JSON.
pub fn to_json(
    path: &Path,
    text: &str,
    diagnostics: &[Diagnostic],
) -> Result<String, serde_json::Error> {
    let doc = Document::new(path, text);
    serde_json::to_string_pretty(&DiagnosticReport::new(&doc, diagnostics))
}
