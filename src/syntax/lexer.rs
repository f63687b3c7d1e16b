//! Raw token lexer for mapper markup.
//!
//! The dialect is not well-formed XML, so the lexer does not try to
//! understand nesting. It only splits text into the few shapes the
//! scanner cares about. Comments, CDATA bodies and attribute values are
//! skipped by the scanner with [`logos::Lexer::bump`], so none of their
//! contents are ever tokenized.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawToken {
    #[token("<!--")]
    CommentOpen,

    #[token("<![CDATA[")]
    CdataOpen,

    /// `</name>` with nothing between the name and `>`.
    #[regex(r"</[A-Za-z_][A-Za-z0-9_.:\-]*>")]
    EndTag,

    /// `<name`; whether it is followed by a word boundary is decided by the scanner.
    #[regex(r"<[A-Za-z_][A-Za-z0-9_.:\-]*")]
    StartTag,

    /// Any other `<`: comparison operators, `<?xml`, `<!DOCTYPE`, `</ x>`.
    #[token("<")]
    Lt,

    #[token("/>")]
    SelfClose,

    #[token(">")]
    Gt,

    #[token("/")]
    Slash,

    #[token("=")]
    Eq,

    #[token("\"")]
    Quote,

    #[regex(r"[ \t\r\n\x0C]+")]
    Whitespace,

    #[regex(r#"[^<>/"= \t\r\n\x0C]+"#)]
    Word,
}
