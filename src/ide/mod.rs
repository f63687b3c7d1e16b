//! IDE features — high-level APIs for editor hosts.
//!
//! Each function answers one editor request from a [`Document`] and a
//! registry snapshot. Nothing here depends on a protocol crate; hosts
//! convert ranges with [`Document::range_positions`] at their boundary.
//!
//! The usual entry point is [`AnalysisHost`], which owns the snapshot and
//! publishes diagnostics on open, focus and save.
//!
//! [`Document`]: crate::base::Document
//! [`Document::range_positions`]: crate::base::Document::range_positions

mod analysis;
mod code_actions;
mod completion;
mod document_links;
mod goto;

pub use analysis::{Analysis, AnalysisHost, DiagnosticSink};
pub use code_actions::{
    CodeAction, TextEdit, code_actions, fix_caret_token, prefix_reference_with_namespace,
};
pub use completion::{
    CompletionItem, CompletionKind, NAMESPACE_COMMIT_CHARACTERS, completions,
};
pub use document_links::{DocumentLink, document_links};
pub use goto::{GotoResult, GotoTarget, goto_definition, resolve_reference};
