//! The fixed dialect vocabulary: tags with their closing discipline, and
//! the bare operators that must be escaped.

use std::fmt;

use indexmap::IndexMap;
use smol_str::SmolStr;

/// How a tag is allowed to terminate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Discipline {
    /// Must end with `/>` before the next `<`.
    SelfClosing,
    /// Must be closed by `</tag>`; may nest with itself.
    NormalClosing,
    /// Either `/>` or `</tag>`, whichever appears at the right nesting level.
    EitherClosing,
}

impl Discipline {
    /// The closer text shown in "missing closing" messages.
    pub fn expected_closer(self, tag: &str) -> String {
        match self {
            Discipline::SelfClosing => "/>".to_string(),
            Discipline::NormalClosing => format!("</{tag}>"),
            Discipline::EitherClosing => format!("</{tag}> or />"),
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Discipline::SelfClosing => "self-closing",
            Discipline::NormalClosing => "normal-closing",
            Discipline::EitherClosing => "either-closing",
        })
    }
}

const SELF_CLOSING: &[&str] = &[
    "result", "id", "idArg", "arg", "cache-ref", "bind", "typeAlias", "setting", "package",
    "typeHandler",
];

const NORMAL_CLOSING: &[&str] = &[
    "select", "delete", "insert", "update", "selectKey", "sql", "typeAliases", "constructor",
    "discriminator", "foreach", "choose", "when", "otherwise", "where", "trim", "set",
    "dataSource", "typeHandlers", "objectFactory", "plugins", "plugin", "environments",
    "environment", "mappers",
];

const EITHER_CLOSING: &[&str] = &[
    "association", "collection", "include", "case", "cache", "databaseIdProvider", "mapper",
    "transactionManager", "property", "properties", "constructor-arg", "sqlMap", "settings",
    "if", "resultMap",
];

/// Tags checked by the balance checker, in a stable order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagVocabulary {
    tags: IndexMap<SmolStr, Discipline>,
}

impl TagVocabulary {
    /// An empty vocabulary.
    pub fn empty() -> Self {
        Self {
            tags: IndexMap::new(),
        }
    }

    /// The MyBatis mapper and configuration vocabulary.
    pub fn mybatis() -> Self {
        let mut vocabulary = Self::empty();
        for (names, discipline) in [
            (SELF_CLOSING, Discipline::SelfClosing),
            (NORMAL_CLOSING, Discipline::NormalClosing),
            (EITHER_CLOSING, Discipline::EitherClosing),
        ] {
            for name in names {
                vocabulary.insert(name, discipline);
            }
        }
        vocabulary
    }

    /// Make sure a configured root tag is checked; unknown roots close either way.
    pub fn with_root_tag(mut self, root: &str) -> Self {
        if !root.is_empty() && !self.tags.contains_key(root) {
            self.insert(root, Discipline::EitherClosing);
        }
        self
    }

    pub fn insert(&mut self, tag: &str, discipline: Discipline) {
        self.tags.insert(SmolStr::new(tag), discipline);
    }

    pub fn discipline(&self, tag: &str) -> Option<Discipline> {
        self.tags.get(tag).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Discipline)> + '_ {
        self.tags.iter().map(|(name, d)| (name.as_str(), *d))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Default for TagVocabulary {
    fn default() -> Self {
        Self::mybatis()
    }
}

// ============================================================================
// CARET OPERATORS
// ============================================================================

/// A bare operator that is not allowed in mapper text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaretKind {
    LtGt,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Amp,
}

/// The two textual forms a caret fix can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CaretFix {
    /// Entity escaping, e.g. `&lt;&gt;`.
    Entity,
    /// Wrapping in a CDATA block, e.g. `<![CDATA[ <> ]]>`.
    Cdata,
}

impl CaretFix {
    /// Map the host's `1 | 2` option number.
    pub fn from_option(option: u8) -> Option<Self> {
        match option {
            1 => Some(CaretFix::Entity),
            2 => Some(CaretFix::Cdata),
            _ => None,
        }
    }
}

impl CaretKind {
    pub fn code(self) -> &'static str {
        match self {
            CaretKind::LtGt => "mustBeLTGT",
            CaretKind::Lt => "mustBeLT",
            CaretKind::Gt => "mustBeGT",
            CaretKind::LtEq => "mustBeLTEQ",
            CaretKind::GtEq => "mustBeGTEQ",
            CaretKind::Amp => "mustBeAmp",
        }
    }

    /// The operator as written in messages.
    pub fn operator(self) -> &'static str {
        match self {
            CaretKind::LtGt => "<>",
            CaretKind::Lt => "<",
            CaretKind::Gt => ">",
            CaretKind::LtEq => "<=",
            CaretKind::GtEq => ">=",
            CaretKind::Amp => "&",
        }
    }

    pub fn replacement(self, fix: CaretFix) -> &'static str {
        match (self, fix) {
            (CaretKind::LtGt, CaretFix::Entity) => "&lt;&gt;",
            (CaretKind::Lt, CaretFix::Entity) => "&lt;",
            (CaretKind::Gt, CaretFix::Entity) => "&gt;",
            (CaretKind::LtEq, CaretFix::Entity) => "&lt;=",
            (CaretKind::GtEq, CaretFix::Entity) => "&gt;=",
            (CaretKind::Amp, CaretFix::Entity) => "&amp;",
            (CaretKind::LtGt, CaretFix::Cdata) => "<![CDATA[ <> ]]>",
            (CaretKind::Lt, CaretFix::Cdata) => "<![CDATA[ < ]]>",
            (CaretKind::Gt, CaretFix::Cdata) => "<![CDATA[ > ]]>",
            (CaretKind::LtEq, CaretFix::Cdata) => "<![CDATA[ <= ]]>",
            (CaretKind::GtEq, CaretFix::Cdata) => "<![CDATA[ >= ]]>",
            (CaretKind::Amp, CaretFix::Cdata) => "<![CDATA[ & ]]>",
        }
    }

    pub fn is_bitwise(self) -> bool {
        self == CaretKind::Amp
    }
}

/// A literal search pattern: one space, the operator text, one space.
#[derive(Clone, Copy, Debug)]
pub struct CaretPattern {
    pub text: &'static str,
    pub kind: CaretKind,
}

impl CaretPattern {
    /// Length of the operator between the surrounding spaces.
    pub fn operator_len(&self) -> usize {
        self.text.len() - 2
    }
}

/// Patterns in search order; half-escaped forms count as `<>`.
pub const CARET_PATTERNS: &[CaretPattern] = &[
    CaretPattern { text: " <> ", kind: CaretKind::LtGt },
    CaretPattern { text: " < ", kind: CaretKind::Lt },
    CaretPattern { text: " > ", kind: CaretKind::Gt },
    CaretPattern { text: " <= ", kind: CaretKind::LtEq },
    CaretPattern { text: " >= ", kind: CaretKind::GtEq },
    CaretPattern { text: " &lt;> ", kind: CaretKind::LtGt },
    CaretPattern { text: " <&gt; ", kind: CaretKind::LtGt },
    CaretPattern { text: " & ", kind: CaretKind::Amp },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mybatis_vocabulary() {
        let vocabulary = TagVocabulary::mybatis();
        assert_eq!(vocabulary.len(), 49);
        assert_eq!(vocabulary.discipline("bind"), Some(Discipline::SelfClosing));
        assert_eq!(vocabulary.discipline("selectKey"), Some(Discipline::NormalClosing));
        assert_eq!(vocabulary.discipline("if"), Some(Discipline::EitherClosing));
        assert_eq!(vocabulary.discipline("Select"), None);
    }

    #[test]
    fn test_custom_root_tag() {
        let vocabulary = TagVocabulary::mybatis().with_root_tag("dao");
        assert_eq!(vocabulary.discipline("dao"), Some(Discipline::EitherClosing));

        // A known tag keeps its discipline.
        let vocabulary = TagVocabulary::mybatis().with_root_tag("sql");
        assert_eq!(vocabulary.discipline("sql"), Some(Discipline::NormalClosing));
    }

    #[test]
    fn test_expected_closer() {
        assert_eq!(Discipline::SelfClosing.expected_closer("bind"), "/>");
        assert_eq!(Discipline::NormalClosing.expected_closer("where"), "</where>");
        assert_eq!(Discipline::EitherClosing.expected_closer("if"), "</if> or />");
    }

    #[test]
    fn test_caret_patterns() {
        let half_escaped = CARET_PATTERNS
            .iter()
            .find(|p| p.text == " &lt;> ")
            .unwrap();
        assert_eq!(half_escaped.kind, CaretKind::LtGt);
        assert_eq!(half_escaped.operator_len(), 5);
        assert!(CARET_PATTERNS.iter().all(|p| p.text.starts_with(' ') && p.text.ends_with(' ')));
    }

    #[test]
    fn test_caret_replacements() {
        assert_eq!(CaretKind::LtGt.replacement(CaretFix::Entity), "&lt;&gt;");
        assert_eq!(CaretKind::Amp.replacement(CaretFix::Cdata), "<![CDATA[ & ]]>");
        assert_eq!(CaretFix::from_option(2), Some(CaretFix::Cdata));
        assert_eq!(CaretFix::from_option(3), None);
    }
}
