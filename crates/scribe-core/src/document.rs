//! Live, mutable document buffers.

use thiserror::Error;

use crate::TextRange;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DocumentError {
    #[error("span {range:?} is out of bounds for document length {len}")]
    OutOfBounds { range: TextRange, len: usize },
    #[error("offset {offset} is not a UTF-8 character boundary")]
    NotCharBoundary { offset: usize },
}

/// An editable text buffer.
///
/// Offsets passed to [`DocumentHandle::replace`] address the buffer's
/// *current* contents, i.e. they already account for earlier replacements.
pub trait DocumentHandle {
    fn text(&self) -> &str;

    fn replace(&mut self, offset: usize, len: usize, text: &str) -> Result<(), DocumentError>;
}

/// In-memory [`DocumentHandle`] backed by a `String`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextDocument {
    text: String,
    version: u64,
}

impl TextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            version: 0,
        }
    }

    /// Number of successful replacements applied so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl DocumentHandle for TextDocument {
    fn text(&self) -> &str {
        &self.text
    }

    fn replace(&mut self, offset: usize, len: usize, text: &str) -> Result<(), DocumentError> {
        let range = match offset.checked_add(len) {
            Some(end) if end <= self.text.len() => TextRange::new(offset, end),
            _ => {
                return Err(DocumentError::OutOfBounds {
                    range: TextRange {
                        start: offset,
                        end: offset.saturating_add(len),
                    },
                    len: self.text.len(),
                })
            }
        };
        for offset in [range.start, range.end] {
            if !self.text.is_char_boundary(offset) {
                return Err(DocumentError::NotCharBoundary { offset });
            }
        }

        self.text.replace_range(range.start..range.end, text);
        self.version += 1;
        Ok(())
    }
}
