//! Document links — clickable refid values.

use std::borrow::Cow;

use crate::base::{Document, LineCol};
use crate::check::refids;
use crate::hir::{MapperNamespace, NamespaceRegistry};
use crate::syntax::MarkupIndex;

use super::goto::{GotoTarget, resolve_refid};

/// A link from a refid value to the fragment it names.
#[derive(Debug, Clone)]
pub struct DocumentLink {
    /// The span of the refid value in the source file.
    pub start: LineCol,
    pub end: LineCol,
    pub target: GotoTarget,
    /// Tooltip text for the link.
    pub tooltip: Cow<'static, str>,
}

/// Get document links for a file.
///
/// Returns one link per refid value that resolves; unresolved values are
/// already reported by validation and get no link.
pub fn document_links(
    doc: &Document,
    registry: &NamespaceRegistry,
    mapper_tag: &str,
) -> Vec<DocumentLink> {
    let index = MarkupIndex::new(doc.text());
    let catalog = MapperNamespace::extract(doc.shared_path(), &index, mapper_tag);

    refids(&index)
        .filter_map(|(value, range)| {
            let target = resolve_refid(registry, &catalog, value)?;
            let (start, end) = doc.range_positions(range);
            let tooltip = Cow::Owned(format!("Go to {}.{}", target.namespace, target.id));
            Some(DocumentLink {
                start,
                end,
                target,
                tooltip,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::extract_catalog;

    #[test]
    fn test_links_for_resolvable_refids() {
        let shared = r#"<mapper namespace="shared"><sql id="cols">a</sql></mapper>"#;
        let registry = NamespaceRegistry::from_catalogs([extract_catalog(
            &Document::new("/m/shared.xml", shared),
            "mapper",
        )]);
        let text = r#"<mapper namespace="orders">
  <sql id="where">w</sql>
  <select id="s">
    <include refid="shared.cols"/>
    <include refid="where"/>
    <include refid="shared.missing"/>
  </select>
</mapper>"#;
        let doc = Document::new("/m/orders.xml", text);

        let links = document_links(&doc, &registry, "mapper");
        let summary: Vec<_> = links
            .iter()
            .map(|link| (link.start.line, link.tooltip.as_ref()))
            .collect();
        assert_eq!(summary, vec![(3, "Go to shared.cols"), (4, "Go to orders.where")]);
        assert_eq!(links[0].start.col, 20);
        assert_eq!(links[0].end.col, 31);
    }
}
