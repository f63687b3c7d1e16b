//! Bare comparison and bitwise operators in mapper text.

use crate::base::{TextRange, TextSize};
use crate::hir::DiagnosticCollector;
use crate::syntax::{CARET_PATTERNS, MarkupIndex};

/// Flag every space-delimited bare operator outside attribute values and
/// CDATA. The range covers the operator only, not the spaces around it.
pub fn check_carets(index: &MarkupIndex, out: &mut DiagnosticCollector) {
    for pattern in CARET_PATTERNS {
        let len = TextSize::from(pattern.operator_len() as u32);
        let mut from = TextSize::from(0);
        while let Some(hit) = index.find(pattern.text, from) {
            let operator = TextRange::at(hit + TextSize::from(1), len);
            if !escaped(index, operator.start()) {
                out.bare_operator(pattern.kind, operator);
            }
            from = operator.end();
        }
    }
}

fn escaped(index: &MarkupIndex, offset: TextSize) -> bool {
    index.in_literal(offset) || index.in_cdata(offset) || index.closes_markup(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::Diagnostic;
    use crate::syntax::CaretKind;

    fn check(text: &str) -> Vec<Diagnostic> {
        let mut out = DiagnosticCollector::new();
        check_carets(&MarkupIndex::new(text), &mut out);
        out.finish()
    }

    fn flagged(text: &str) -> Vec<(&str, CaretKind)> {
        check(text)
            .iter()
            .map(|d| (&text[d.range], d.caret_kind().unwrap()))
            .collect()
    }

    #[test]
    fn test_bare_operators_in_text() {
        let text = "<select>where a <> b and c < d and e >= f and g & h</select>";
        assert_eq!(
            flagged(text),
            vec![
                ("<>", CaretKind::LtGt),
                ("<", CaretKind::Lt),
                (">=", CaretKind::GtEq),
                ("&", CaretKind::Amp),
            ]
        );
    }

    #[test]
    fn test_half_escaped_forms() {
        let text = "<sql>a &lt;> b or c <&gt; d</sql>";
        assert_eq!(
            flagged(text),
            vec![("&lt;>", CaretKind::LtGt), ("<&gt;", CaretKind::LtGt)]
        );
    }

    #[test]
    fn test_attribute_values_and_cdata_are_allowed() {
        let text = r#"<if test="a < b and c >= d"><![CDATA[ x <> y ]]> &lt; z</if>"#;
        assert!(check(text).is_empty());
    }

    #[test]
    fn test_tag_terminator_is_not_an_operator() {
        let text = "<where > id > 3 </where>";
        assert_eq!(flagged(text), vec![(">", CaretKind::Gt)]);
        assert_eq!(u32::from(check(text)[0].range.start()), 12);
    }

    #[test]
    fn test_commented_operators_are_ignored() {
        assert!(check("<sql><!-- a < b --></sql>").is_empty());
    }

    #[test]
    fn test_adjacent_operators() {
        // ` < ` then ` < ` sharing no characters.
        let text = "<sql>a < < b</sql>";
        assert_eq!(check(text).len(), 2);
    }
}
