//! Catalog extraction — the namespace and statement ids one mapper declares.
//!
//! Extraction works from the [`MarkupIndex`] event stream, so comments are
//! already gone and attribute values are read from real tag markup rather
//! than from the first textual ` id="` occurrence.

use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{Document, TextRange};
use crate::syntax::{EventKind, MarkupIndex};

/// Name given to documents without a usable `namespace` attribute.
pub const NO_NAMESPACE: &str = "no_namespace";

/// The statement tags whose ids are catalogued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatementKind {
    Sql,
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub const ALL: [StatementKind; 5] = [
        StatementKind::Sql,
        StatementKind::Select,
        StatementKind::Insert,
        StatementKind::Update,
        StatementKind::Delete,
    ];

    /// Match a tag name case-insensitively.
    pub fn from_tag(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag_name().eq_ignore_ascii_case(name))
    }

    pub fn tag_name(self) -> &'static str {
        match self {
            StatementKind::Sql => "sql",
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// One declared statement.
///
/// Two details are equal when their `(id, database_id)` pairs are equal;
/// the ranges and path only locate the declaration.
#[derive(Clone, Debug)]
pub struct TagDetails {
    pub id: SmolStr,
    /// Empty when the tag has no `databaseId` attribute.
    pub database_id: SmolStr,
    /// The `id` attribute value.
    pub id_range: TextRange,
    /// From the opening `<` to the end of the closing tag.
    pub span: TextRange,
    /// The document declaring this statement.
    pub path: Arc<Path>,
}

impl TagDetails {
    pub fn key(&self) -> (&str, &str) {
        (&self.id, &self.database_id)
    }
}

impl PartialEq for TagDetails {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TagDetails {}

impl Hash for TagDetails {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Statement ids grouped by kind, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatementIds {
    by_kind: [Vec<TagDetails>; 5],
}

impl StatementIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: StatementKind) -> &[TagDetails] {
        &self.by_kind[kind.slot()]
    }

    pub fn push(&mut self, kind: StatementKind, details: TagDetails) {
        self.by_kind[kind.slot()].push(details);
    }

    /// Append every id of `other`, keeping kinds apart.
    pub fn extend_from(&mut self, other: &StatementIds) {
        for kind in StatementKind::ALL {
            self.by_kind[kind.slot()].extend(other.get(kind).iter().cloned());
        }
    }

    pub fn contains(&self, kind: StatementKind, id: &str) -> bool {
        self.get(kind).iter().any(|details| details.id == id)
    }

    pub fn find(&self, kind: StatementKind, id: &str) -> Option<&TagDetails> {
        self.get(kind).iter().find(|details| details.id == id)
    }

    /// All ids with their kind, kind by kind.
    pub fn iter(&self) -> impl Iterator<Item = (StatementKind, &TagDetails)> + '_ {
        StatementKind::ALL
            .into_iter()
            .flat_map(move |kind| self.get(kind).iter().map(move |d| (kind, d)))
    }

    pub fn len(&self) -> usize {
        self.by_kind.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.iter().all(Vec::is_empty)
    }
}

/// The catalog of one mapper document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapperNamespace {
    pub path: Arc<Path>,
    pub name: SmolStr,
    /// The `namespace` attribute value, when present.
    pub name_range: Option<TextRange>,
    pub ids: StatementIds,
}

impl MapperNamespace {
    /// An empty catalog under the sentinel name.
    pub fn unnamed(path: Arc<Path>) -> Self {
        Self {
            path,
            name: SmolStr::new_static(NO_NAMESPACE),
            name_range: None,
            ids: StatementIds::new(),
        }
    }

    /// Whether this document declares a real namespace.
    pub fn is_named(&self) -> bool {
        is_named(&self.name)
    }

    /// Extract the catalog from an already scanned document.
    pub fn extract(path: Arc<Path>, index: &MarkupIndex, mapper_tag: &str) -> Self {
        let events = index.events();
        let tag_named = |tag: usize| index.text(index.tags()[tag].name) == mapper_tag;

        let root_start = events.iter().position(|event| match event.kind {
            EventKind::StartTag(tag) => index.tags()[tag].bounded && tag_named(tag),
            _ => false,
        });
        let from = root_start.unwrap_or(0);

        let Some(until) = events.iter().enumerate().skip(from).find_map(|(i, event)| {
            match event.kind {
                EventKind::EndTag { name } if index.text(name) == mapper_tag => Some(i),
                _ => None,
            }
        }) else {
            tracing::debug!(path = %path.display(), "no mapper root, using empty catalog");
            return Self::unnamed(path);
        };
        let root = &events[from..until];

        let mut catalog = Self::unnamed(path);
        // Only the root tag names the namespace; `<cache-ref namespace>` does not.
        let root_tag = root_start.and_then(|i| match events[i].kind {
            EventKind::StartTag(tag) => Some(&index.tags()[tag]),
            _ => None,
        });
        if let Some(attr) = root_tag.and_then(|tag| index.attribute(tag, "namespace")) {
            let value = index.text(attr.value).trim();
            if !value.is_empty() {
                catalog.name = SmolStr::new(value);
                catalog.name_range = Some(attr.value);
            }
        }

        for (offset, event) in root.iter().enumerate() {
            let EventKind::StartTag(tag) = event.kind else {
                continue;
            };
            let start = &index.tags()[tag];
            let name = index.text(start.name);
            let Some(kind) = StatementKind::from_tag(name) else {
                continue;
            };
            let Some(id) = index.attribute(start, "id") else {
                continue;
            };
            let database_id = index
                .attribute(start, "databaseId")
                .map(|attr| SmolStr::new(index.text(attr.value)))
                .unwrap_or_default();

            let end = match start.self_close {
                Some(close) => close.end(),
                None => events[from + offset + 1..]
                    .iter()
                    .find_map(|event| match event.kind {
                        EventKind::EndTag { name: close } if index.text(close) == name => {
                            Some(event.range.end())
                        }
                        _ => None,
                    })
                    .unwrap_or(start.markup.end()),
            };

            catalog.ids.push(
                kind,
                TagDetails {
                    id: SmolStr::new(index.text(id.value)),
                    database_id,
                    id_range: id.value,
                    span: TextRange::new(start.markup.start(), end),
                    path: catalog.path.clone(),
                },
            );
        }

        tracing::debug!(
            path = %catalog.path.display(),
            namespace = %catalog.name,
            ids = catalog.ids.len(),
            "extracted mapper catalog"
        );
        catalog
    }
}

/// Whether `name` is a real namespace rather than the sentinel.
pub fn is_named(name: &str) -> bool {
    name != NO_NAMESPACE
}

/// Scan a document and extract its catalog.
pub fn extract_catalog(doc: &Document, mapper_tag: &str) -> MapperNamespace {
    let index = MarkupIndex::new(doc.text());
    MapperNamespace::extract(doc.shared_path(), &index, mapper_tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::TextSize;

    fn catalog(text: &str) -> MapperNamespace {
        extract_catalog(&Document::new("/m/orders.xml", text), "mapper")
    }

    fn ids(catalog: &MapperNamespace, kind: StatementKind) -> Vec<&str> {
        catalog.ids.get(kind).iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_extracts_namespace_and_ids() {
        let text = r#"<?xml version="1.0"?>
<mapper namespace="orders">
  <sql id="columns">id, total</sql>
  <select id="findOrder" databaseId="mysql">select <include refid="columns"/></select>
  <select id="findOrder">select 1</select>
  <insert id="addOrder">insert</insert>
</mapper>"#;
        let catalog = catalog(text);

        assert_eq!(catalog.name, "orders");
        assert!(catalog.is_named());
        assert_eq!(ids(&catalog, StatementKind::Sql), vec!["columns"]);
        assert_eq!(ids(&catalog, StatementKind::Select), vec!["findOrder", "findOrder"]);
        assert_eq!(ids(&catalog, StatementKind::Insert), vec!["addOrder"]);
        assert_eq!(catalog.ids.get(StatementKind::Select)[0].database_id, "mysql");
        assert_eq!(catalog.ids.get(StatementKind::Select)[1].database_id, "");
        assert_eq!(catalog.ids.len(), 4);
    }

    #[test]
    fn test_statement_span_covers_closing_tag() {
        let text = r#"<mapper namespace="a"><sql id="cols">x</sql></mapper>"#;
        let catalog = catalog(text);
        let sql = &catalog.ids.get(StatementKind::Sql)[0];

        assert_eq!(&text[sql.span], r#"<sql id="cols">x</sql>"#);
        assert_eq!(&text[sql.id_range], "cols");
        assert_eq!(&text[catalog.name_range.unwrap()], "a");
    }

    #[test]
    fn test_missing_root_end_yields_sentinel() {
        let catalog = catalog(r#"<mapper namespace="a"><sql id="x"></sql>"#);
        assert_eq!(catalog.name, NO_NAMESPACE);
        assert!(!catalog.is_named());
        assert!(catalog.ids.is_empty());
    }

    #[test]
    fn test_missing_namespace_attribute_yields_sentinel() {
        let catalog = catalog(r#"<mapper><sql id="x"></sql></mapper>"#);
        assert_eq!(catalog.name, NO_NAMESPACE);
        assert_eq!(ids(&catalog, StatementKind::Sql), vec!["x"]);
    }

    #[test]
    fn test_namespace_only_read_from_root_tag() {
        let catalog = catalog(
            r#"<mapper><cache-ref namespace="other"/><sql id="a">x</sql></mapper>"#,
        );
        assert_eq!(catalog.name, NO_NAMESPACE);
        assert!(catalog.name_range.is_none());
        assert_eq!(ids(&catalog, StatementKind::Sql), vec!["a"]);
    }

    #[test]
    fn test_commented_statements_are_ignored() {
        let text = r#"<mapper namespace="a">
  <!-- <sql id="old"></sql> -->
  <sql id="new"></sql>
</mapper>"#;
        assert_eq!(ids(&catalog(text), StatementKind::Sql), vec!["new"]);
    }

    #[test]
    fn test_other_tags_and_prefixes_are_skipped() {
        let text = r#"<mapper namespace="a">
  <resultMap id="rm" type="Order"/>
  <select id="s">
    <selectKey id="k" keyProperty="id">select 1</selectKey>
  </select>
</mapper>"#;
        let catalog = catalog(text);
        assert_eq!(ids(&catalog, StatementKind::Select), vec!["s"]);
        assert_eq!(catalog.ids.len(), 1);
    }

    #[test]
    fn test_id_on_its_own_line() {
        let text = "<mapper namespace=\"a\">\n<update\n  id=\"touch\">x</update>\n</mapper>";
        assert_eq!(ids(&catalog(text), StatementKind::Update), vec!["touch"]);
    }

    #[test]
    fn test_custom_root_tag() {
        let doc = Document::new("/m/a.xml", r#"<dao namespace="d"><delete id="rm"/></dao>"#);
        let catalog = extract_catalog(&doc, "dao");
        assert_eq!(catalog.name, "d");
        assert_eq!(ids(&catalog, StatementKind::Delete), vec!["rm"]);
    }

    #[test]
    fn test_tag_details_equality_ignores_location() {
        let path: Arc<Path> = Arc::from(Path::new("/a.xml"));
        let at = |start: u32| TagDetails {
            id: SmolStr::new("x"),
            database_id: SmolStr::default(),
            id_range: TextRange::empty(TextSize::from(start)),
            span: TextRange::empty(TextSize::from(start)),
            path: path.clone(),
        };
        assert_eq!(at(1), at(40));
    }

    #[test]
    fn test_statement_kind_from_tag() {
        assert_eq!(StatementKind::from_tag("SELECT"), Some(StatementKind::Select));
        assert_eq!(StatementKind::from_tag("selectKey"), None);
    }
}
