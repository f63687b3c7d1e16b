//! Go to definition for `refid` values.

use std::path::Path;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{Document, TextRange, TextSize};
use crate::check::{Refid, refids};
use crate::hir::{MapperNamespace, NamespaceRegistry, StatementKind};
use crate::syntax::MarkupIndex;

/// Where a `namespace.id` reference is declared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GotoTarget {
    pub namespace: SmolStr,
    pub id: SmolStr,
    /// The document declaring the `<sql>` fragment.
    pub path: Arc<Path>,
    /// The whole `<sql ...>...</sql>` span in that document.
    pub range: TextRange,
}

/// A refid value under the cursor, resolved or not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GotoResult {
    /// Range of the refid value in the source document.
    pub origin: TextRange,
    pub target: Option<GotoTarget>,
}

/// Resolve `namespace.id` to its `<sql>` declaration.
///
/// `live` is the current catalog of the document asking; it wins over the
/// registry for its own namespace, so unsaved fragments resolve.
pub fn resolve_reference(
    registry: &NamespaceRegistry,
    live: Option<&MapperNamespace>,
    namespace: &str,
    id: &str,
) -> Option<GotoTarget> {
    let own = live
        .filter(|catalog| catalog.is_named() && catalog.name == namespace)
        .and_then(|catalog| catalog.ids.find(StatementKind::Sql, id))
        .map(|details| (details.path.clone(), details.span));

    let (path, range) = own.or_else(|| registry.find_definition(namespace, id))?;
    Some(GotoTarget {
        namespace: SmolStr::new(namespace),
        id: SmolStr::new(id),
        path,
        range,
    })
}

/// Resolve the refid value containing `offset`, if there is one.
///
/// Unqualified values resolve against the document's own namespace.
pub fn goto_definition(
    doc: &Document,
    offset: TextSize,
    registry: &NamespaceRegistry,
    mapper_tag: &str,
) -> Option<GotoResult> {
    let index = MarkupIndex::new(doc.text());
    let (value, origin) = refids(&index).find(|(_, range)| range.contains_inclusive(offset))?;
    let catalog = MapperNamespace::extract(doc.shared_path(), &index, mapper_tag);
    let target = resolve_refid(registry, &catalog, value);
    tracing::debug!(
        path = %doc.path().display(),
        refid = value,
        resolved = target.is_some(),
        "goto definition"
    );
    Some(GotoResult { origin, target })
}

pub(crate) fn resolve_refid(
    registry: &NamespaceRegistry,
    catalog: &MapperNamespace,
    value: &str,
) -> Option<GotoTarget> {
    match Refid::parse(value) {
        Refid::Qualified { namespace, id } => {
            resolve_reference(registry, Some(catalog), namespace, id)
        }
        Refid::Local(id) if catalog.is_named() => {
            resolve_reference(registry, Some(catalog), &catalog.name, id)
        }
        Refid::Local(_) => None,
    }
}
