//! Foundation types for the mapper toolchain.
//!
//! This module provides fundamental types used throughout the engine:
//! - [`TextRange`], [`TextSize`] - Byte offsets into document text
//! - [`LineCol`], [`LineIndex`] - Offset to line/column conversion
//! - [`Document`] - An immutable text buffer with a stable path identity
//!
//! This module has NO dependencies on other mapperlint modules.

mod document;
mod span;

pub use document::Document;
pub(crate) use document::has_xml_extension;
pub use span::{LineCol, LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
