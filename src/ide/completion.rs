//! Completion inside `refid` values.
//!
//! Two trigger points, both on the line being edited:
//! - directly after `refid="`, every known namespace;
//! - directly after `refid="{ns}.`, every `sql` id of `{ns}`.

use smol_str::SmolStr;

use crate::base::{Document, TextSize};
use crate::hir::{NamespaceRegistry, StatementKind};

const REFID_START: &str = "refid=\"";

/// Committing a namespace with `.` moves straight on to its ids.
pub const NAMESPACE_COMMIT_CHARACTERS: &[char] = &['.'];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompletionKind {
    /// A namespace.
    Module,
    /// A `sql` fragment id.
    Reference,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionItem {
    pub label: SmolStr,
    pub kind: CompletionKind,
    pub commit_characters: &'static [char],
}

/// Completions at `offset`, empty when the cursor is not at a trigger.
pub fn completions(
    doc: &Document,
    offset: TextSize,
    registry: &NamespaceRegistry,
) -> Vec<CompletionItem> {
    let Some(typed) = refid_prefix(doc, offset) else {
        return Vec::new();
    };

    if typed.is_empty() {
        return registry
            .unique_namespaces()
            .into_iter()
            .map(|label| CompletionItem {
                label,
                kind: CompletionKind::Module,
                commit_characters: NAMESPACE_COMMIT_CHARACTERS,
            })
            .collect();
    }

    match typed.strip_suffix('.') {
        Some(namespace) if !namespace.is_empty() && is_plain(namespace) => registry
            .unique_identifiers(namespace, StatementKind::Sql)
            .into_iter()
            .map(|label| CompletionItem {
                label,
                kind: CompletionKind::Reference,
                commit_characters: &[],
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// What has been typed of the refid value on the cursor's line.
fn refid_prefix(doc: &Document, offset: TextSize) -> Option<&str> {
    let line = doc.position(offset).line;
    let line_range = doc.line_index().line_range(line)?;
    let before = doc.text().get(usize::from(line_range.start())..usize::from(offset))?;
    let start = before.rfind(REFID_START)? + REFID_START.len();
    Some(&before[start..])
}

fn is_plain(namespace: &str) -> bool {
    !namespace.contains(['"', '<', '>']) && !namespace.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::extract_catalog;

    fn registry() -> NamespaceRegistry {
        let files = [
            (
                "/m/orders.xml",
                r#"<mapper namespace="orders"><sql id="cols">a</sql><sql id="where">b</sql></mapper>"#,
            ),
            (
                "/m/orders_ext.xml",
                r#"<mapper namespace="orders"><sql id="cols">c</sql><select id="find">d</select></mapper>"#,
            ),
            ("/m/users.xml", r#"<mapper namespace="users"></mapper>"#),
        ];
        NamespaceRegistry::from_catalogs(
            files
                .iter()
                .map(|(path, text)| extract_catalog(&Document::new(path, *text), "mapper")),
        )
    }

    fn labels_at(text: &str, marker: &str) -> Vec<(String, CompletionKind)> {
        let doc = Document::new("/m/current.xml", text);
        let offset = TextSize::from((text.find(marker).unwrap() + marker.len()) as u32);
        completions(&doc, offset, &registry())
            .into_iter()
            .map(|item| (item.label.to_string(), item.kind))
            .collect()
    }

    #[test]
    fn test_namespaces_after_refid_quote() {
        let text = "<select id=\"a\">\n  <include refid=\"\n</select>";
        assert_eq!(
            labels_at(text, "refid=\""),
            vec![
                ("orders".to_string(), CompletionKind::Module),
                ("users".to_string(), CompletionKind::Module),
            ]
        );
    }

    #[test]
    fn test_sql_ids_after_namespace_dot() {
        let text = "<select id=\"a\">\n  <include refid=\"orders.\n</select>";
        assert_eq!(
            labels_at(text, "orders."),
            vec![
                ("cols".to_string(), CompletionKind::Reference),
                ("where".to_string(), CompletionKind::Reference),
            ]
        );
    }

    #[test]
    fn test_no_completion_elsewhere() {
        let text = "<select id=\"a\">\n  <include refid=\"ord\n</select>";
        assert!(labels_at(text, "ord").is_empty());
        assert!(labels_at(text, "<select").is_empty());
    }

    #[test]
    fn test_namespace_items_commit_on_dot() {
        let text = "<include refid=\"";
        let doc = Document::new("/m/current.xml", text);
        let items = completions(&doc, TextSize::of(text), &registry());
        assert!(items.iter().all(|item| item.commit_characters == ['.']));
    }
}
