//! Source text positions and ranges.

use std::fmt;

// Re-export from text-size for compatibility
pub use text_size::TextRange;
pub use text_size::TextSize;

/// A line and column position in document text.
///
/// Both line and column are 0-indexed internally, but displayed as 1-indexed.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, PartialOrd, Ord)]
pub struct LineCol {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column (UTF-8 bytes unless produced by [`LineIndex::line_col_utf16`])
    pub col: u32,
}

impl LineCol {
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// Get 1-indexed line number (for display).
    #[inline]
    pub const fn line_one_indexed(self) -> u32 {
        self.line + 1
    }

    /// Get 1-indexed column number (for display).
    #[inline]
    pub const fn col_one_indexed(self) -> u32 {
        self.col + 1
    }
}

impl fmt::Debug for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line_one_indexed(), self.col_one_indexed())
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line_one_indexed(), self.col_one_indexed())
    }
}

/// Index for converting between byte offsets and line/column positions.
///
/// Editors speaking LSP count columns in UTF-16 code units, so the index
/// remembers which lines contain non-ASCII text and only walks those.
#[derive(Clone, Debug)]
pub struct LineIndex {
    /// Byte offset of the start of each line
    line_starts: Vec<TextSize>,
    /// Lines containing at least one multi-byte character
    wide_lines: Vec<u32>,
    len: TextSize,
}

impl LineIndex {
    /// Build a line index from document text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        let mut wide_lines = Vec::new();
        let mut line = 0u32;

        for (offset, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(TextSize::from((offset + 1) as u32));
                line += 1;
            } else if !c.is_ascii() && wide_lines.last() != Some(&line) {
                wide_lines.push(line);
            }
        }

        Self {
            line_starts,
            wide_lines,
            len: TextSize::of(text),
        }
    }

    /// Convert a byte offset to a line/column position (UTF-8 columns).
    ///
    /// Offsets past the end of the text clamp to the end.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);

        let line_start = self.line_starts[line];
        LineCol {
            line: line as u32,
            col: (offset - line_start).into(),
        }
    }

    /// Convert a byte offset to a line/column position with the column
    /// counted in UTF-16 code units.
    ///
    /// `text` must be the text this index was built from.
    pub fn line_col_utf16(&self, text: &str, offset: TextSize) -> LineCol {
        let pos = self.line_col(offset);
        if self.wide_lines.binary_search(&pos.line).is_err() {
            return pos;
        }

        let start = usize::from(self.line_starts[pos.line as usize]);
        let end = start + pos.col as usize;
        let col = text
            .get(start..end)
            .map(|prefix| prefix.encode_utf16().count() as u32)
            .unwrap_or(pos.col);
        LineCol::new(pos.line, col)
    }

    /// Convert a line/column position (UTF-8 columns) to a byte offset.
    pub fn offset(&self, line_col: LineCol) -> Option<TextSize> {
        let line_start = self.line_starts.get(line_col.line as usize)?;
        let offset = *line_start + TextSize::from(line_col.col);
        (offset <= self.len).then_some(offset)
    }

    /// Byte range of a whole line, excluding its trailing newline.
    pub fn line_range(&self, line: u32) -> Option<TextRange> {
        let start = *self.line_starts.get(line as usize)?;
        let end = match self.line_starts.get(line as usize + 1) {
            Some(next) => *next - TextSize::from(1),
            None => self.len,
        };
        Some(TextRange::new(start, end))
    }

    /// Get the number of lines.
    pub fn len(&self) -> usize {
        self.line_starts.len()
    }

    /// Check if there are no lines (never true, an empty text has one line).
    pub fn is_empty(&self) -> bool {
        self.line_starts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_display() {
        assert_eq!(format!("{}", LineCol::new(0, 0)), "1:1");
        assert_eq!(format!("{}", LineCol::new(5, 10)), "6:11");
    }

    #[test]
    fn test_line_index_multi_line() {
        let index = LineIndex::new("<a>\n<b/>\n</a>");

        assert_eq!(index.len(), 3);
        assert_eq!(index.line_col(TextSize::from(0)), LineCol::new(0, 0));
        assert_eq!(index.line_col(TextSize::from(4)), LineCol::new(1, 0));
        assert_eq!(index.line_col(TextSize::from(10)), LineCol::new(2, 1));
    }

    #[test]
    fn test_line_index_clamps_past_end() {
        let index = LineIndex::new("abc");
        assert_eq!(index.line_col(TextSize::from(99)), LineCol::new(0, 3));
    }

    #[test]
    fn test_line_index_offset_round_trip() {
        let index = LineIndex::new("hello\nworld");

        assert_eq!(index.offset(LineCol::new(1, 3)), Some(TextSize::from(9)));
        assert_eq!(index.offset(LineCol::new(1, 9)), None);
        assert_eq!(index.offset(LineCol::new(4, 0)), None);
    }

    #[test]
    fn test_utf16_columns_only_differ_on_wide_lines() {
        let text = "ab\n日本 < x";
        let index = LineIndex::new(text);
        let lt = TextSize::from(text.find('<').unwrap() as u32);

        assert_eq!(index.line_col(lt), LineCol::new(1, 7));
        assert_eq!(index.line_col_utf16(text, lt), LineCol::new(1, 3));
        assert_eq!(
            index.line_col_utf16(text, TextSize::from(1)),
            LineCol::new(0, 1)
        );
    }

    #[test]
    fn test_line_range_excludes_newline() {
        let index = LineIndex::new("one\ntwo");
        assert_eq!(
            index.line_range(0),
            Some(TextRange::new(TextSize::from(0), TextSize::from(3)))
        );
        assert_eq!(
            index.line_range(1),
            Some(TextRange::new(TextSize::from(4), TextSize::from(7)))
        );
    }
}
