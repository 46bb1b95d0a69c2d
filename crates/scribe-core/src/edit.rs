//! Snapshot edit primitives.
//!
//! Unlike [`crate::DocumentHandle::replace`], which mutates live text, these
//! functions compute the result of applying a batch of edits that are all
//! expressed against the same original snapshot.

use thiserror::Error;

use crate::TextRange;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextEdit {
    pub range: TextRange,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(range: TextRange, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(TextRange::new(offset, offset), text)
    }

    pub fn delete(range: TextRange) -> Self {
        Self::new(range, String::new())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum EditError {
    #[error("edit range {range:?} is out of bounds for text length {text_len}")]
    RangeOutOfBounds { range: TextRange, text_len: usize },
    #[error("offset {offset} is not a UTF-8 character boundary")]
    InvalidUtf8Boundary { offset: usize },
    #[error("overlapping edits: {first:?} overlaps {second:?}")]
    OverlappingEdits { first: TextRange, second: TextRange },
}

/// Apply a list of edits to a text snapshot.
///
/// The result does not depend on the order of `edits`: they are sorted by
/// `(start, end)` and applied from the end of the text backwards.
pub fn apply_text_edits(text: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    let mut edits = edits.to_vec();
    normalize_text_edits(text, &mut edits)?;

    let mut out = text.to_string();
    for edit in edits.into_iter().rev() {
        out.replace_range(edit.range.start..edit.range.end, &edit.replacement);
    }
    Ok(out)
}

/// Sort edits and check for overlaps, out-of-bounds ranges and split characters.
pub fn normalize_text_edits(text: &str, edits: &mut Vec<TextEdit>) -> Result<(), EditError> {
    edits.sort_by_key(|e| (e.range.start, e.range.end));

    for edit in edits.iter() {
        if edit.range.end > text.len() {
            return Err(EditError::RangeOutOfBounds {
                range: edit.range,
                text_len: text.len(),
            });
        }
        for offset in [edit.range.start, edit.range.end] {
            if !text.is_char_boundary(offset) {
                return Err(EditError::InvalidUtf8Boundary { offset });
            }
        }
    }

    for pair in edits.windows(2) {
        let (first, second) = (&pair[0], &pair[1]);
        // Two inserts at the same offset have no defined order.
        let same_point_inserts = first.range.is_empty()
            && second.range.is_empty()
            && first.range.start == second.range.start;
        if first.range.end > second.range.start || same_point_inserts {
            return Err(EditError::OverlappingEdits {
                first: first.range,
                second: second.range,
            });
        }
    }

    Ok(())
}
