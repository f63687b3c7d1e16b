//! Document validation.
//!
//! [`validate_document`] scans a document once and runs every validator
//! over the same [`MarkupIndex`]:
//!
//! - [`balance`]: unmatched tag opens and closes
//! - [`caret`]: bare operators that must be escaped
//! - [`reference`]: refids that do not resolve
//! - [`duplicate`]: duplicate namespaces and statement ids
//!
//! Validators never fail; every finding is a [`Diagnostic`].

pub mod balance;
pub mod caret;
pub mod duplicate;
pub mod reference;

use smol_str::SmolStr;

use crate::base::Document;
use crate::hir::{Diagnostic, DiagnosticCollector, MapperNamespace, NamespaceRegistry};
use crate::syntax::{MarkupIndex, TagVocabulary};

pub use reference::{Refid, refids};

/// Settings shared by every validation pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckOptions {
    /// Name of the root element, `mapper` unless configured.
    pub mapper_tag: SmolStr,
    /// Resolve unqualified refids across the whole project.
    pub legacy_support: bool,
    pub vocabulary: TagVocabulary,
}

impl CheckOptions {
    pub fn new(mapper_tag: impl Into<SmolStr>, legacy_support: bool) -> Self {
        let mapper_tag = mapper_tag.into();
        let vocabulary = TagVocabulary::mybatis().with_root_tag(&mapper_tag);
        Self {
            mapper_tag,
            legacy_support,
            vocabulary,
        }
    }
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self::new("mapper", false)
    }
}

/// Validate one document against a registry snapshot.
///
/// The document's own catalog comes from its current text, merged with
/// the registry's other documents of the same namespace, so unsaved edits
/// are seen immediately.
pub fn validate_document(
    doc: &Document,
    registry: &NamespaceRegistry,
    options: &CheckOptions,
) -> Vec<Diagnostic> {
    let index = MarkupIndex::new(doc.text());
    let catalog = MapperNamespace::extract(doc.shared_path(), &index, &options.mapper_tag);
    let merged = registry.merge_with(&catalog);

    let mut out = DiagnosticCollector::new();
    balance::check_balance(&index, &options.vocabulary, &mut out);
    caret::check_carets(&index, &mut out);
    reference::check_references(
        &index,
        &reference::ReferenceScope {
            catalog: &catalog,
            merged: &merged,
            registry,
            legacy_support: options.legacy_support,
        },
        &mut out,
    );
    duplicate::check_duplicates(&catalog, &merged, registry, &mut out);

    tracing::debug!(
        path = %doc.path().display(),
        errors = out.error_count(),
        warnings = out.warning_count(),
        "validated mapper document"
    );
    out.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::{Category, Severity};

    #[test]
    fn test_validators_share_one_pass() {
        let text = r#"<mapper namespace="shop">
  <sql id="cols">id</sql>
  <select id="find">
    select <include refid="cols"/> from t where a < 3
    <if test="b">
  </select>
</mapper>"#;
        let doc = Document::new("/m/shop.xml", text);
        let diags = validate_document(&doc, &NamespaceRegistry::new(), &CheckOptions::default());

        let found: Vec<_> = diags
            .iter()
            .map(|d| (d.category, d.severity, d.code.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                (Category::Referential, Severity::Warning, "noNamespace"),
                (Category::Lexical, Severity::Error, "mustBeLT"),
                (Category::Structural, Severity::Error, "ifMissingClosing"),
            ]
        );
    }

    #[test]
    fn test_custom_root_tag_is_balanced() {
        let options = CheckOptions::new("dao", false);
        let doc = Document::new("/m/a.xml", r#"<dao namespace="d"><sql id="x">1</sql>"#);
        let diags = validate_document(&doc, &NamespaceRegistry::new(), &options);

        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, "daoMissingClosing");
    }
}
