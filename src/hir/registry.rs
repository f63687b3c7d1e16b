//! Namespace registry — every catalog under the mapper root.
//!
//! The registry stores one slot per document in parallel vectors and is
//! never deduplicated by namespace: two files may declare the same
//! namespace, and every lookup merges all slots sharing a name through
//! [`NamespaceRegistry::merged_catalog_for_namespace`] or one of its
//! siblings. Nothing else in the crate re-implements that merge.
//!
//! A registry is immutable once built. Rebuilds construct a new registry
//! and the host swaps it in as one unit.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use super::catalog::{MapperNamespace, StatementIds, StatementKind, is_named};
use crate::base::TextRange;

/// Index of a document slot.
type SlotIdx = usize;

// ============================================================================
// REGISTRY
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct NamespaceRegistry {
    /// `names[i]`, `paths[i]` and `details[i]` describe the same document.
    names: Vec<SmolStr>,
    paths: Vec<Arc<Path>>,
    details: Vec<StatementIds>,
    /// Namespace name -> slots declaring it.
    by_name: FxHashMap<SmolStr, Vec<SlotIdx>>,
    /// Document path -> slot.
    by_path: FxHashMap<Arc<Path>, SlotIdx>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from catalogs in slot order.
    pub fn from_catalogs(catalogs: impl IntoIterator<Item = MapperNamespace>) -> Self {
        let mut registry = Self::new();
        for catalog in catalogs {
            registry.add(catalog);
        }
        registry
    }

    /// Add a document's catalog. A path seen before replaces its slot.
    pub fn add(&mut self, catalog: MapperNamespace) {
        let MapperNamespace {
            path, name, ids, ..
        } = catalog;

        if let Some(&slot) = self.by_path.get(&path) {
            let old = std::mem::replace(&mut self.names[slot], name.clone());
            if let Some(slots) = self.by_name.get_mut(&old) {
                slots.retain(|&s| s != slot);
                if slots.is_empty() {
                    self.by_name.remove(&old);
                }
            }
            self.details[slot] = ids;
            self.by_name.entry(name).or_default().push(slot);
            return;
        }

        let slot = self.names.len();
        self.by_name.entry(name.clone()).or_default().push(slot);
        self.by_path.insert(path.clone(), slot);
        self.names.push(name);
        self.paths.push(path);
        self.details.push(ids);
    }

    /// Number of document slots.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Slots in insertion order as `(name, path, ids)`.
    pub fn slots(&self) -> impl Iterator<Item = (&str, &Path, &StatementIds)> + '_ {
        self.names
            .iter()
            .zip(&self.paths)
            .zip(&self.details)
            .map(|((name, path), ids)| (name.as_str(), &**path, ids))
    }

    /// The namespace declared by the document at `path`.
    pub fn namespace_of(&self, path: &Path) -> Option<&str> {
        self.by_path.get(path).map(|&slot| self.names[slot].as_str())
    }

    /// Whether some document declares `name`. Never true for the sentinel.
    pub fn has_namespace(&self, name: &str) -> bool {
        is_named(name) && self.by_name.contains_key(name)
    }

    /// Distinct paths declaring `name`.
    pub fn paths_for_namespace(&self, name: &str) -> Vec<&Path> {
        let mut seen = FxHashSet::default();
        self.slots_named(name)
            .iter()
            .map(|&slot| &*self.paths[slot])
            .filter(|path| seen.insert(*path))
            .collect()
    }

    // ========================================================================
    // MERGED LOOKUP
    // ========================================================================

    /// Union of the ids of every document declaring `name`.
    ///
    /// The sentinel name never merges across documents, so it yields an
    /// empty catalog here.
    pub fn merged_catalog_for_namespace(&self, name: &str) -> StatementIds {
        let mut merged = StatementIds::new();
        if !is_named(name) {
            return merged;
        }
        self.merge_slots(name, None, &mut merged);
        merged
    }

    /// The merged catalog of the namespace declared at `path`.
    ///
    /// A document without a namespace sees only its own ids. Unknown paths
    /// yield an empty catalog.
    pub fn merged_catalog_for_path(&self, path: &Path) -> StatementIds {
        let Some(&slot) = self.by_path.get(path) else {
            return StatementIds::new();
        };
        let name = &self.names[slot];
        if !is_named(name) {
            return self.details[slot].clone();
        }
        self.merged_catalog_for_namespace(name)
    }

    /// Merge a freshly extracted catalog with the registry's other
    /// documents of the same namespace.
    ///
    /// The registry's slot for `base.path` itself is skipped, so the live
    /// text of an edited document wins over its last saved state.
    pub fn merge_with(&self, base: &MapperNamespace) -> StatementIds {
        let mut merged = base.ids.clone();
        if base.is_named() {
            self.merge_slots(&base.name, Some(&*base.path), &mut merged);
        }
        merged
    }

    fn merge_slots(&self, name: &str, skip: Option<&Path>, merged: &mut StatementIds) {
        let mut seen: FxHashSet<&Path> = skip.into_iter().collect();
        for &slot in self.slots_named(name) {
            if seen.insert(&*self.paths[slot]) {
                merged.extend_from(&self.details[slot]);
            }
        }
    }

    fn slots_named(&self, name: &str) -> &[SlotIdx] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    // ========================================================================
    // LISTINGS
    // ========================================================================

    /// Distinct namespace names in first-seen order, sentinel excluded.
    pub fn unique_namespaces(&self) -> IndexSet<SmolStr> {
        self.names
            .iter()
            .filter(|name| is_named(name))
            .cloned()
            .collect()
    }

    /// Distinct ids of one kind across every document declaring `name`.
    pub fn unique_identifiers(&self, name: &str, kind: StatementKind) -> IndexSet<SmolStr> {
        self.merged_catalog_for_namespace(name)
            .get(kind)
            .iter()
            .map(|details| details.id.clone())
            .collect()
    }

    /// Named namespaces declaring `id` under `kind`, in first-seen order.
    pub fn namespaces_declaring(&self, kind: StatementKind, id: &str) -> IndexSet<SmolStr> {
        self.names
            .iter()
            .zip(&self.details)
            .filter(|(name, ids)| is_named(name) && ids.contains(kind, id))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Where the `sql` fragment `namespace.id` is declared.
    pub fn find_definition(&self, namespace: &str, id: &str) -> Option<(Arc<Path>, TextRange)> {
        if !is_named(namespace) {
            return None;
        }
        self.slots_named(namespace).iter().find_map(|&slot| {
            self.details[slot]
                .find(StatementKind::Sql, id)
                .map(|details| (details.path.clone(), details.span))
        })
    }
}
