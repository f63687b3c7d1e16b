//! Markup scanning — one pass over a document producing a flat event stream.
//!
//! Every validator and the catalog extractor work from the [`MarkupIndex`]
//! built here instead of re-searching raw text. The scan:
//!
//! 1. blanks comments (`<!-- ... -->`) with same-length whitespace so
//!    offsets stay valid against the original text,
//! 2. records CDATA spans, which are never tag boundaries,
//! 3. records double-quoted attribute values inside tag markup, so a
//!    `<` or `>` in `test="a > b"` is not mistaken for markup,
//! 4. emits start tags, end tags, `/>` terminators and stray `<`.

use std::ops::Range;

use logos::{Lexer, Logos};

use super::lexer::RawToken;
use crate::base::{TextRange, TextSize};

/// One element of the markup event stream, in document order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub range: TextRange,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// `<name` — index into [`MarkupIndex::tags`].
    StartTag(usize),
    /// `</name>`
    EndTag { name: TextRange },
    /// `/>`, wherever it appears outside attribute values.
    SelfClose,
    /// `<![CDATA[ ... ]]>`, or to end of text when unterminated.
    Cdata,
    /// A `<` that starts none of the above.
    Lt,
}

/// A start tag with its attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartTag {
    /// The tag name, without the leading `<`.
    pub name: TextRange,
    /// From `<` to the end of `>`/`/>`, or to where the markup was abandoned.
    pub markup: TextRange,
    /// Followed by whitespace or `>`, so `<select` does not match `<selectKey`.
    pub bounded: bool,
    /// The last `/>` between this tag and the next `<`, if any.
    pub self_close: Option<TextRange>,
    attributes: Range<usize>,
}

impl StartTag {
    pub fn is_self_closed(&self) -> bool {
        self.self_close.is_some()
    }
}

/// A `name="value"` attribute inside start-tag markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: TextRange,
    /// The value between the quotes.
    pub value: TextRange,
}

/// The scanned form of one document.
#[derive(Clone, Debug, Default)]
pub struct MarkupIndex {
    stripped: String,
    events: Vec<Event>,
    tags: Vec<StartTag>,
    attributes: Vec<Attribute>,
    literals: Vec<TextRange>,
    cdata: Vec<TextRange>,
    comments: Vec<TextRange>,
}

impl MarkupIndex {
    /// Scan a document's full text.
    pub fn new(text: &str) -> Self {
        Scanner::new(text).run()
    }

    /// The document text with every comment replaced by whitespace.
    pub fn stripped(&self) -> &str {
        &self.stripped
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn tags(&self) -> &[StartTag] {
        &self.tags
    }

    /// Start tags in document order, paired with their name text.
    pub fn start_tags(&self) -> impl Iterator<Item = (&str, &StartTag)> + '_ {
        self.tags.iter().map(move |tag| (self.text(tag.name), tag))
    }

    pub fn attributes(&self, tag: &StartTag) -> &[Attribute] {
        &self.attributes[tag.attributes.clone()]
    }

    /// First attribute of `tag` whose name is exactly `name`.
    pub fn attribute(&self, tag: &StartTag, name: &str) -> Option<Attribute> {
        self.attributes(tag)
            .iter()
            .find(|attr| self.text(attr.name) == name)
            .copied()
    }

    /// Text covered by `range` in the comment-stripped document.
    pub fn text(&self, range: TextRange) -> &str {
        self.stripped
            .get(usize::from(range.start())..usize::from(range.end()))
            .unwrap_or("")
    }

    /// Next occurrence of `needle` at or after `from`.
    pub fn find(&self, needle: &str, from: TextSize) -> Option<TextSize> {
        let from = usize::from(from);
        let hit = self.stripped.get(from..)?.find(needle)?;
        Some(TextSize::from((from + hit) as u32))
    }

    /// Whether `offset` lies inside a double-quoted attribute value.
    pub fn in_literal(&self, offset: TextSize) -> bool {
        covers(&self.literals, offset)
    }

    /// Whether `offset` lies inside a CDATA block, including one left open.
    pub fn in_cdata(&self, offset: TextSize) -> bool {
        covers(&self.cdata, offset)
    }

    /// Whether `offset` is the `>` that ends a start tag's markup.
    pub fn closes_markup(&self, offset: TextSize) -> bool {
        let idx = self.tags.partition_point(|tag| tag.markup.start() <= offset);
        idx > 0
            && self.tags[idx - 1].markup.end() == offset + TextSize::from(1)
            && self.stripped.as_bytes().get(usize::from(offset)) == Some(&b'>')
    }

    pub fn in_comment(&self, offset: TextSize) -> bool {
        covers(&self.comments, offset)
    }
}

/// Binary search over sorted, non-overlapping spans.
fn covers(spans: &[TextRange], offset: TextSize) -> bool {
    let idx = spans.partition_point(|span| span.start() <= offset);
    idx > 0 && spans[idx - 1].contains(offset)
}

fn span_of(range: Range<usize>) -> TextRange {
    TextRange::new(
        TextSize::from(range.start as u32),
        TextSize::from(range.end as u32),
    )
}

/// State kept while inside `<name ...` markup.
struct OpenMarkup {
    tag: usize,
    pending_name: Option<TextRange>,
    saw_eq: bool,
}

struct Scanner<'t> {
    text: &'t str,
    index: MarkupIndex,
    open: Option<OpenMarkup>,
}

impl<'t> Scanner<'t> {
    fn new(text: &'t str) -> Self {
        Self {
            text,
            index: MarkupIndex::default(),
            open: None,
        }
    }

    fn run(mut self) -> MarkupIndex {
        let mut lex = RawToken::lexer(self.text);

        while let Some(token) = lex.next() {
            let Ok(token) = token else { continue };
            let span = span_of(lex.span());
            if self.open.is_some() && self.markup_token(token, span, &mut lex) {
                continue;
            }
            self.text_token(token, span, &mut lex);
        }

        let end = TextSize::of(self.text);
        self.close_markup(end);
        self.resolve_self_closes();
        self.index.stripped = blank_comments(self.text, &self.index.comments);
        self.index
    }

    /// Handle a token inside start-tag markup. Returns `false` when the
    /// token ends the markup without belonging to it.
    fn markup_token(
        &mut self,
        token: RawToken,
        span: TextRange,
        lex: &mut Lexer<'t, RawToken>,
    ) -> bool {
        let Some(open) = self.open.as_mut() else {
            return false;
        };
        match token {
            RawToken::Whitespace => {}
            RawToken::Word => {
                open.pending_name = Some(span);
                open.saw_eq = false;
            }
            RawToken::Eq => open.saw_eq = open.pending_name.is_some(),
            RawToken::Slash => {
                open.pending_name = None;
                open.saw_eq = false;
            }
            RawToken::Quote => {
                let (literal, value) = skip_past(lex, span, "\"");
                self.index.literals.push(literal);
                if let (Some(name), true) = (open.pending_name.take(), open.saw_eq) {
                    self.index.attributes.push(Attribute { name, value });
                }
                open.saw_eq = false;
            }
            RawToken::Gt => self.close_markup(span.end()),
            RawToken::SelfClose => {
                self.index.events.push(Event {
                    kind: EventKind::SelfClose,
                    range: span,
                });
                self.close_markup(span.end());
            }
            // A `<` inside unquoted markup means the tag was never finished.
            RawToken::CommentOpen
            | RawToken::CdataOpen
            | RawToken::EndTag
            | RawToken::StartTag
            | RawToken::Lt => {
                self.close_markup(span.start());
                return false;
            }
        }
        true
    }

    fn text_token(
        &mut self,
        token: RawToken,
        span: TextRange,
        lex: &mut Lexer<'t, RawToken>,
    ) {
        let kind = match token {
            RawToken::CommentOpen => {
                let (comment, _) = skip_past(lex, span, "-->");
                self.index.comments.push(comment);
                return;
            }
            RawToken::CdataOpen => {
                let (cdata, _) = skip_past(lex, span, "]]>");
                self.index.cdata.push(cdata);
                self.index.events.push(Event {
                    kind: EventKind::Cdata,
                    range: cdata,
                });
                return;
            }
            RawToken::StartTag => {
                let bounded = lex
                    .remainder()
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_whitespace() || c == '>');
                let tag = self.index.tags.len();
                let attrs = self.index.attributes.len();
                self.index.tags.push(StartTag {
                    name: TextRange::new(span.start() + TextSize::from(1), span.end()),
                    markup: span,
                    bounded,
                    self_close: None,
                    attributes: attrs..attrs,
                });
                self.open = Some(OpenMarkup {
                    tag,
                    pending_name: None,
                    saw_eq: false,
                });
                EventKind::StartTag(tag)
            }
            RawToken::EndTag => EventKind::EndTag {
                name: TextRange::new(
                    span.start() + TextSize::from(2),
                    span.end() - TextSize::from(1),
                ),
            },
            RawToken::SelfClose => EventKind::SelfClose,
            RawToken::Lt => EventKind::Lt,
            _ => return,
        };
        self.index.events.push(Event { kind, range: span });
    }

    fn close_markup(&mut self, end: TextSize) {
        if let Some(open) = self.open.take() {
            let attrs_end = self.index.attributes.len();
            let tag = &mut self.index.tags[open.tag];
            tag.markup = TextRange::new(tag.markup.start(), end);
            tag.attributes.end = attrs_end;
        }
    }

    /// A start tag is self-closed by the last `/>` found before the next `<`.
    fn resolve_self_closes(&mut self) {
        let mut pending: Option<usize> = None;
        for event in &self.index.events {
            match event.kind {
                EventKind::StartTag(tag) => pending = Some(tag),
                EventKind::SelfClose => {
                    if let Some(tag) = pending {
                        self.index.tags[tag].self_close = Some(event.range);
                    }
                }
                _ => pending = None,
            }
        }
    }
}

/// Advance the lexer past the next `terminator`, or to the end of text.
///
/// Returns the whole span (opener through terminator) and the inner span.
fn skip_past(
    lex: &mut Lexer<'_, RawToken>,
    opener: TextRange,
    terminator: &str,
) -> (TextRange, TextRange) {
    let rest = lex.remainder();
    let (inner_len, total_len) = match rest.find(terminator) {
        Some(at) => (at, at + terminator.len()),
        None => (rest.len(), rest.len()),
    };
    lex.bump(total_len);
    let inner = TextRange::at(opener.end(), TextSize::from(inner_len as u32));
    let whole = TextRange::new(
        opener.start(),
        opener.end() + TextSize::from(total_len as u32),
    );
    (whole, inner)
}

/// Replace every comment with same-length whitespace, keeping newlines.
fn blank_comments(text: &str, comments: &[TextRange]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for comment in comments {
        let (start, end) = (usize::from(comment.start()), usize::from(comment.end()));
        out.push_str(&text[cursor..start]);
        for c in text[start..end].chars() {
            if c == '\n' {
                out.push('\n');
            } else {
                out.extend(std::iter::repeat_n(' ', c.len_utf8()));
            }
        }
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}
