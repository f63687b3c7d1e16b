//! Structural balance — tags opened without a terminator, and closing
//! tags without an open.
//!
//! One matcher serves all three closing disciplines. Every bounded start
//! tag and every exact `</tag>` of the vocabulary is visited in document
//! order; opens that still need a closing tag are pushed on a per-tag
//! stack and popped by the next `</tag>`, which gives same-name nesting
//! its depth for free:
//!
//! | discipline | open with `/>`    | open without `/>`      | `</tag>`             |
//! |------------|-------------------|------------------------|----------------------|
//! | self       | closed            | missing `/>`           | ignored              |
//! | normal     | push              | push                   | pop, or extra close  |
//! | either     | closed            | push                   | pop, or extra close  |
//!
//! Opens left on a stack at the end are missing their closing tag.
//! CDATA and comments never produce events, so they are skipped here.

use rustc_hash::FxHashMap;

use crate::base::TextRange;
use crate::hir::DiagnosticCollector;
use crate::syntax::{Discipline, EventKind, MarkupIndex, TagVocabulary};

pub fn check_balance(
    index: &MarkupIndex,
    vocabulary: &TagVocabulary,
    out: &mut DiagnosticCollector,
) {
    let mut pending: FxHashMap<&str, Vec<TextRange>> = FxHashMap::default();

    for event in index.events() {
        match event.kind {
            EventKind::StartTag(tag) => {
                let tag = &index.tags()[tag];
                if !tag.bounded {
                    continue;
                }
                let name = index.text(tag.name);
                let Some(discipline) = vocabulary.discipline(name) else {
                    continue;
                };
                match discipline {
                    Discipline::SelfClosing if !tag.is_self_closed() => {
                        out.missing_closing(name, discipline, tag.name);
                    }
                    Discipline::SelfClosing => {}
                    Discipline::EitherClosing if tag.is_self_closed() => {}
                    Discipline::NormalClosing | Discipline::EitherClosing => {
                        pending.entry(name).or_default().push(tag.name);
                    }
                }
            }
            EventKind::EndTag { name: range } => {
                let name = index.text(range);
                match vocabulary.discipline(name) {
                    Some(Discipline::NormalClosing | Discipline::EitherClosing) => {
                        if pending.get_mut(name).and_then(Vec::pop).is_none() {
                            out.extra_closing(name, range);
                        }
                    }
                    Some(Discipline::SelfClosing) | None => {}
                }
            }
            EventKind::SelfClose | EventKind::Cdata | EventKind::Lt => {}
        }
    }

    for (name, opens) in pending {
        let Some(discipline) = vocabulary.discipline(name) else {
            continue;
        };
        for range in opens {
            out.missing_closing(name, discipline, range);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::Diagnostic;

    fn check(text: &str) -> Vec<Diagnostic> {
        let mut out = DiagnosticCollector::new();
        check_balance(&MarkupIndex::new(text), &TagVocabulary::mybatis(), &mut out);
        out.finish()
    }

    fn summary(text: &str) -> Vec<(String, String)> {
        check(text)
            .into_iter()
            .map(|d| (text[d.range].to_string(), d.message.to_string()))
            .collect()
    }

    #[test]
    fn test_balanced_mapper_is_clean() {
        let text = r#"<mapper namespace="a">
  <resultMap id="rm" type="A">
    <id property="id" column="id"/>
    <result property="n" column="n"/>
  </resultMap>
  <select id="find" resultMap="rm">
    select * from a
    <where>
      <if test="x != null">and x = #{x}</if>
      <include refid="a.cols"/>
    </where>
  </select>
</mapper>"#;
        assert!(check(text).is_empty());
    }

    #[test]
    fn test_self_closing_tag_without_terminator() {
        let text = r#"<sql id="a"><bind name="x" value="y"></sql>"#;
        assert_eq!(
            summary(text),
            vec![("bind".to_string(), "This tag is missing a closing />.".to_string())]
        );
    }

    #[test]
    fn test_missing_normal_close() {
        let text = "<select id=\"a\">\n  <where>x\n</select>";
        let diags = check(text);
        assert_eq!(diags.len(), 1);
        assert_eq!(&text[diags[0].range], "where");
        assert_eq!(diags[0].code, "whereMissingClosing");
        assert_eq!(&*diags[0].message, "This tag is missing a closing </where>.");
    }

    #[test]
    fn test_extra_closing_tag() {
        let text = "<trim>a</trim></trim>";
        let diags = check(text);
        assert_eq!(diags.len(), 1);
        assert_eq!(u32::from(diags[0].range.start()), 16);
        assert_eq!(&*diags[0].message, "This closing tag has no opening pair.");
    }

    #[test]
    fn test_nested_same_name_either_closing() {
        let text = r#"<if test="a"><if test="b"><if test="c"/></if><include refid="x"/></if>"#;
        assert!(check(text).is_empty());

        let text = r#"<if test="a"><if test="b"><if test="c"/></if>"#;
        let diags = check(text);
        assert_eq!(diags.len(), 1);
        assert_eq!(u32::from(diags[0].range.start()), 1);
        assert_eq!(&*diags[0].message, "This tag is missing a closing </if> or />.");
    }

    #[test]
    fn test_unterminated_inner_if_reports_outer() {
        // `</if>` closes the most recent open, leaving the outer one pending.
        let text = r#"<if test="a"><if test="b"></if>"#;
        let diags = check(text);
        assert_eq!(diags.len(), 1);
        assert_eq!(u32::from(diags[0].range.start()), 1);
        assert_eq!(diags[0].code, "ifMissingClosing");
        assert_eq!(&*diags[0].message, "This tag is missing a closing </if> or />.");
    }

    #[test]
    fn test_sibling_self_close_is_not_consumed() {
        // The inner include's `/>` must not terminate the outer `if`.
        let text = r#"<if test="a"><include refid="x"/>"#;
        assert_eq!(
            summary(text),
            vec![("if".to_string(), "This tag is missing a closing </if> or />.".to_string())]
        );
    }

    #[test]
    fn test_word_boundary_and_exact_close() {
        // `<selectKey` is not a `<select`, `</selectKey>` is not a `</select>`.
        let text = r#"<select id="a"><selectKey keyProperty="id">x</selectKey></select>"#;
        assert!(check(text).is_empty());
    }

    #[test]
    fn test_cdata_and_comments_are_skipped() {
        let text = r#"<sql id="a"><![CDATA[ <where> </sql> ]]><!-- <trim> --></sql>"#;
        assert!(check(text).is_empty());
    }

    #[test]
    fn test_operators_in_attributes_are_not_tags() {
        let text = r#"<if test="a < b and c > d"><choose><when test="x<y">1</when></choose></if>"#;
        assert!(check(text).is_empty());
    }

    #[test]
    fn test_unknown_tags_are_ignored() {
        assert!(check("<custom><other></custom>").is_empty());
    }
}
