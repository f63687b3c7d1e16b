//! Quick fixes offered for diagnostics.

use crate::base::TextRange;
use crate::hir::{Diagnostic, codes};
use crate::syntax::{CaretFix, CaretKind};

/// Replace `range` with `new_text`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    pub range: TextRange,
    pub new_text: String,
}

impl TextEdit {
    /// Apply the edit to `text`. Out-of-bounds edits leave it unchanged.
    pub fn apply(&self, text: &str) -> String {
        let (start, end) = (usize::from(self.range.start()), usize::from(self.range.end()));
        match (text.get(..start), text.get(end..)) {
            (Some(before), Some(after)) => format!("{before}{}{after}", self.new_text),
            _ => text.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeAction {
    pub title: String,
    pub edit: TextEdit,
}

/// Escape a bare operator as entities or wrap it in CDATA.
pub fn fix_caret_token(kind: CaretKind, fix: CaretFix, range: TextRange) -> TextEdit {
    TextEdit {
        range,
        new_text: kind.replacement(fix).to_string(),
    }
}

/// Insert `{namespace}.` in front of the refid value at `range`.
pub fn prefix_reference_with_namespace(range: TextRange, namespace: &str) -> TextEdit {
    TextEdit {
        range: TextRange::empty(range.start()),
        new_text: format!("{namespace}."),
    }
}

/// Every fix that applies to `diagnostic`.
pub fn code_actions(diagnostic: &Diagnostic) -> Vec<CodeAction> {
    if let Some(kind) = diagnostic.caret_kind() {
        return [CaretFix::Entity, CaretFix::Cdata]
            .into_iter()
            .map(|fix| CodeAction {
                title: format!("Convert to {}", kind.replacement(fix)),
                edit: fix_caret_token(kind, fix, diagnostic.range),
            })
            .collect();
    }

    let prefixable = diagnostic.code == codes::NO_NAMESPACE
        || diagnostic.code == codes::REFID_MISSING_NO_NAMESPACE;
    match diagnostic.suggested_namespace() {
        Some(namespace) if prefixable => vec![CodeAction {
            title: format!("Prepend {namespace} to this refid"),
            edit: prefix_reference_with_namespace(diagnostic.range, namespace),
        }],
        _ => Vec::new(),
    }
}
