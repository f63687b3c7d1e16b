//! Lexical layer for mapper documents.
//!
//! Mapper documents are not well-formed XML: conditional expressions may
//! contain bare `<`, `>`, `&`. Instead of a real XML parser this layer
//! provides a tolerant scan ([`MarkupIndex`]) that understands just
//! comments, CDATA blocks, quoted attribute values and tag shapes, plus
//! the fixed tag vocabulary with each tag's closing discipline.

mod lexer;
mod scan;
mod vocabulary;

pub use scan::{Attribute, Event, EventKind, MarkupIndex, StartTag};
pub use vocabulary::{
    CARET_PATTERNS, CaretFix, CaretKind, CaretPattern, Discipline, TagVocabulary,
};
