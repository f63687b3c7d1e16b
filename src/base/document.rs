//! Documents handed to the engine by the host.

use std::path::Path;
use std::sync::Arc;

use super::span::{LineCol, LineIndex, TextRange, TextSize};

/// An immutable snapshot of one document's text plus its path identity.
///
/// Cloning is cheap: the path, text and line index are shared.
#[derive(Clone, Debug)]
pub struct Document {
    path: Arc<Path>,
    text: Arc<str>,
    line_index: Arc<LineIndex>,
}

impl Document {
    /// Create a document from a path and its current text.
    pub fn new(path: impl AsRef<Path>, text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let line_index = Arc::new(LineIndex::new(&text));
        Self {
            path: Arc::from(path.as_ref()),
            text,
            line_index,
        }
    }

    /// The stable path identity of this document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Shared handle to the path, for storing in catalogs.
    pub fn shared_path(&self) -> Arc<Path> {
        self.path.clone()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Convert a byte offset to a line/column position.
    pub fn position(&self, offset: TextSize) -> LineCol {
        self.line_index.line_col(offset)
    }

    /// Convert a range to a pair of line/column positions.
    pub fn range_positions(&self, range: TextRange) -> (LineCol, LineCol) {
        (self.position(range.start()), self.position(range.end()))
    }

    /// Text covered by `range`, or `""` when the range is out of bounds.
    pub fn slice(&self, range: TextRange) -> &str {
        self.text
            .get(usize::from(range.start())..usize::from(range.end()))
            .unwrap_or("")
    }

    /// Whether the path carries a case-insensitive `.xml` extension.
    pub fn is_xml(&self) -> bool {
        has_xml_extension(&self.path)
    }
}

/// Case-insensitive `.xml` extension check shared by the loader and the host.
pub(crate) fn has_xml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_positions() {
        let doc = Document::new("/m/a.xml", "<mapper>\n  <sql/>\n</mapper>");
        let sql = TextSize::from(doc.text().find("sql").unwrap() as u32);

        assert_eq!(doc.position(sql), LineCol::new(1, 3));
        assert_eq!(doc.slice(TextRange::at(sql, TextSize::from(3))), "sql");
    }

    #[test]
    fn test_xml_extension_is_case_insensitive() {
        assert!(Document::new("/m/a.XML", "").is_xml());
        assert!(Document::new("/m/a.xml", "").is_xml());
        assert!(!Document::new("/m/a.xmlx", "").is_xml());
        assert!(!Document::new("/m/xml", "").is_xml());
    }
}
