//! Duplicate namespaces and statement ids.
//!
//! Ids are compared as `(id, databaseId)` pairs over the document's merged
//! catalog, but findings are only anchored on declarations in the
//! validated document itself; a duplicate living entirely in other files
//! is reported when those files are validated.

use std::path::Path;

use indexmap::{IndexMap, IndexSet};

use crate::hir::{
    DiagnosticCollector, MapperNamespace, NamespaceRegistry, StatementIds, StatementKind,
    TagDetails,
};

pub fn check_duplicates(
    catalog: &MapperNamespace,
    merged: &StatementIds,
    registry: &NamespaceRegistry,
    out: &mut DiagnosticCollector,
) {
    check_duplicate_namespace(catalog, registry, out);
    check_duplicate_ids(&catalog.path, merged, out);
}

/// Warn on the `namespace` value when another document declares it too.
fn check_duplicate_namespace(
    catalog: &MapperNamespace,
    registry: &NamespaceRegistry,
    out: &mut DiagnosticCollector,
) {
    let Some(range) = catalog.name_range else {
        return;
    };
    if !catalog.is_named() {
        return;
    }
    let mut paths: IndexSet<&Path> = registry
        .paths_for_namespace(&catalog.name)
        .into_iter()
        .collect();
    paths.insert(&catalog.path);
    if paths.len() > 1 {
        out.duplicate_namespace(&catalog.name, range);
    }
}

fn check_duplicate_ids(path: &Path, merged: &StatementIds, out: &mut DiagnosticCollector) {
    let is_local = |details: &TagDetails| &*details.path == path;

    // Cross-kind: the kinds each distinct pair appears under.
    let mut kinds: IndexMap<&TagDetails, IndexSet<StatementKind>> = IndexMap::new();
    for (kind, details) in merged.iter() {
        kinds.entry(details).or_default().insert(kind);
    }
    for (key, seen_in) in &kinds {
        if seen_in.len() < 2 {
            continue;
        }
        let first_local = merged
            .iter()
            .map(|(_, details)| details)
            .filter(|details| *details == *key && is_local(*details))
            .min_by_key(|details| details.id_range.start());
        if let Some(details) = first_local {
            out.duplicate_id_across_kinds(&details.id, details.id_range);
        }
    }

    // Same kind: one error per repeated pair, on a local repeat if any.
    for kind in StatementKind::ALL {
        let mut occurrences: IndexMap<&TagDetails, Vec<&TagDetails>> = IndexMap::new();
        for details in merged.get(kind) {
            occurrences.entry(details).or_default().push(details);
        }
        for group in occurrences.values().filter(|group| group.len() > 1) {
            let mut local: Vec<&TagDetails> =
                group.iter().copied().filter(|d| is_local(*d)).collect();
            local.sort_by_key(|details| details.id_range.start());
            if let Some(anchor) = local.get(1).or(local.first()) {
                out.duplicate_id(&anchor.id, anchor.id_range);
            }
        }
    }
}
