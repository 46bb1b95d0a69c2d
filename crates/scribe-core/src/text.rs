//! Text model primitives: byte ranges and line/column lookup.

use serde::{Deserialize, Serialize};

/// A half-open text range `[start, end)` in UTF-8 byte offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "invalid range: {start}..{end}");
        Self { start, end }
    }

    /// Panics if `offset + len` overflows; see [`TextRange::checked_at`].
    pub fn at(offset: usize, len: usize) -> Self {
        Self::checked_at(offset, len)
            .unwrap_or_else(|| panic!("range overflows: {offset} + {len}"))
    }

    /// `None` when `offset + len` does not fit in `usize`.
    pub fn checked_at(offset: usize, len: usize) -> Option<Self> {
        offset.checked_add(len).map(|end| Self { start: offset, end })
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn contains(self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Whether the two ranges share at least one byte.
    ///
    /// Empty ranges never intersect anything.
    pub fn intersects(self, other: TextRange) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }
}

/// Zero-based line and UTF-8 byte column.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Pre-computed line start offsets for a particular text snapshot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    line_ends: Vec<usize>,
    text_len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0];
        let mut line_ends = Vec::new();

        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    line_ends.push(i);
                    line_starts.push(i + 1);
                    i += 1;
                }
                b'\r' => {
                    line_ends.push(i);
                    if bytes.get(i + 1) == Some(&b'\n') {
                        line_starts.push(i + 2);
                        i += 2;
                    } else {
                        line_starts.push(i + 1);
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        }
        line_ends.push(text.len());

        Self {
            line_starts,
            line_ends,
            text_len: text.len(),
        }
    }

    #[inline]
    pub fn text_len(&self) -> usize {
        self.text_len
    }

    #[inline]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Line content range, excluding the terminator.
    pub fn line_range(&self, line: u32) -> Option<TextRange> {
        let start = *self.line_starts.get(line as usize)?;
        let end = *self.line_ends.get(line as usize)?;
        Some(TextRange::new(start, end))
    }

    fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert) => insert.saturating_sub(1),
        }
    }

    /// Convert a byte offset to a line/column pair.
    ///
    /// Offsets past the end clamp to EOF; offsets inside a `\r\n` terminator
    /// clamp to the end of their line.
    pub fn line_col(&self, offset: usize) -> LineCol {
        let offset = offset.min(self.text_len);
        let line = self.line_of(offset);
        let col = offset.min(self.line_ends[line]) - self.line_starts[line];
        LineCol {
            line: line as u32,
            col: col as u32,
        }
    }

    /// Convert a line/column pair back to a byte offset.
    pub fn offset(&self, line_col: LineCol) -> Option<usize> {
        let range = self.line_range(line_col.line)?;
        let offset = range.start + line_col.col as usize;
        (offset <= range.end).then_some(offset)
    }

    /// Text of `line` without its terminator.
    pub fn line_text<'a>(&self, text: &'a str, line: u32) -> Option<&'a str> {
        let range = self.line_range(line)?;
        text.get(range.start..range.end)
    }
}
