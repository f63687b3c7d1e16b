//! Refid resolution against the namespace registry.

use crate::base::TextRange;
use crate::hir::{
    DiagnosticCollector, MapperNamespace, NamespaceRegistry, StatementIds, StatementKind,
};
use crate::syntax::MarkupIndex;

/// A parsed `refid` attribute value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refid<'a> {
    /// `namespace.id`, split at the last `.` so dotted namespaces work.
    Qualified { namespace: &'a str, id: &'a str },
    /// A bare id, resolved against the document's own namespace.
    Local(&'a str),
}

impl<'a> Refid<'a> {
    pub fn parse(value: &'a str) -> Self {
        match value.rsplit_once('.') {
            Some((namespace, id)) => Refid::Qualified { namespace, id },
            None => Refid::Local(value),
        }
    }

    pub fn id(&self) -> &'a str {
        match *self {
            Refid::Qualified { id, .. } | Refid::Local(id) => id,
        }
    }
}

/// Every `refid="..."` attribute in the document with its value range.
pub fn refids(index: &MarkupIndex) -> impl Iterator<Item = (&str, TextRange)> + '_ {
    index.tags().iter().filter_map(move |tag| {
        let attr = index.attribute(tag, "refid")?;
        Some((index.text(attr.value), attr.value))
    })
}

/// What references resolve against for one document.
pub struct ReferenceScope<'a> {
    /// The live catalog of the validated document.
    pub catalog: &'a MapperNamespace,
    /// The live catalog merged with the registry's other documents of
    /// the same namespace.
    pub merged: &'a StatementIds,
    pub registry: &'a NamespaceRegistry,
    /// Resolve unqualified refids against every namespace of the project.
    pub legacy_support: bool,
}

impl ReferenceScope<'_> {
    fn is_own(&self, namespace: &str) -> bool {
        self.catalog.is_named() && self.catalog.name == namespace
    }

    fn namespace_exists(&self, namespace: &str) -> bool {
        self.is_own(namespace) || self.registry.has_namespace(namespace)
    }

    fn declares(&self, namespace: &str, id: &str) -> bool {
        if self.is_own(namespace) {
            self.merged.contains(StatementKind::Sql, id)
        } else {
            self.registry
                .merged_catalog_for_namespace(namespace)
                .contains(StatementKind::Sql, id)
        }
    }
}

pub fn check_references(
    index: &MarkupIndex,
    scope: &ReferenceScope<'_>,
    out: &mut DiagnosticCollector,
) {
    for (value, range) in refids(index) {
        match Refid::parse(value) {
            Refid::Qualified { namespace, id } => {
                if !scope.namespace_exists(namespace) {
                    out.namespace_missing(namespace, range);
                } else if !scope.declares(namespace, id) {
                    out.refid_missing(namespace, id, range);
                }
            }
            Refid::Local(id) => check_local(id, range, scope, out),
        }
    }
}

fn check_local(
    id: &str,
    range: TextRange,
    scope: &ReferenceScope<'_>,
    out: &mut DiagnosticCollector,
) {
    let catalog = scope.catalog;
    if scope.merged.contains(StatementKind::Sql, id) {
        let own = catalog.is_named().then_some(catalog.name.as_str());
        out.implicit_namespace(own, range);
        return;
    }

    let declaring = scope.registry.namespaces_declaring(StatementKind::Sql, id);
    if scope.legacy_support {
        match declaring.first() {
            Some(namespace) => out.implicit_namespace(Some(namespace.as_str()), range),
            None => out.refid_missing_in_project(id, range),
        }
    } else {
        let suggestion = declaring.into_iter().next();
        out.refid_missing_in_file(id, &catalog.name, suggestion, range);
    }
}
