//! Textual reference search.
//!
//! There is no semantic model here: occurrences are whole-word matches of a
//! name, and results are located by line and column for display.

use std::collections::BTreeMap;

use scribe_core::{DocumentId, LineIndex, TextRange};
use serde::Serialize;

use crate::rename::Occurrence;

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Every whole-word match of `name` in `text`.
pub fn find_text_occurrences(document: &DocumentId, text: &str, name: &str) -> Vec<Occurrence> {
    if name.is_empty() {
        return Vec::new();
    }

    text.match_indices(name)
        .filter(|(offset, _)| {
            let before = text[..*offset].chars().next_back();
            let after = text[offset + name.len()..].chars().next();
            !before.is_some_and(is_ident_char) && !after.is_some_and(is_ident_char)
        })
        .map(|(offset, _)| Occurrence::new(document.clone(), offset, name.len()))
        .collect()
}

/// A located reference, ready to be listed in a results view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub document: DocumentId,
    pub range: TextRange,
    /// Zero-based.
    pub line: u32,
    /// Zero-based byte column.
    pub column: u32,
    pub line_text: String,
}

/// Resolve occurrences to line/column locations.
///
/// Occurrences in documents missing from `texts`, or outside their text, are
/// dropped. Output keeps input order.
pub fn locate_references(
    occurrences: &[Occurrence],
    texts: &BTreeMap<DocumentId, String>,
) -> Vec<SearchResult> {
    let mut indexes: BTreeMap<&DocumentId, LineIndex> = BTreeMap::new();
    let mut results = Vec::with_capacity(occurrences.len());

    for occurrence in occurrences {
        let Some(text) = texts.get(&occurrence.document) else {
            tracing::debug!(
                target: "scribe.refactor",
                document = %occurrence.document,
                "no text for reference"
            );
            continue;
        };
        let Some(range) = occurrence
            .checked_range()
            .filter(|range| text.get(range.start..range.end).is_some())
        else {
            tracing::debug!(
                target: "scribe.refactor",
                document = %occurrence.document,
                offset = occurrence.offset,
                "reference outside document text"
            );
            continue;
        };

        let index = indexes
            .entry(&occurrence.document)
            .or_insert_with(|| LineIndex::new(text));
        let position = index.line_col(range.start);
        let line_text = index
            .line_text(text, position.line)
            .unwrap_or_default()
            .to_string();

        results.push(SearchResult {
            document: occurrence.document.clone(),
            range,
            line: position.line,
            column: position.col,
            line_text,
        });
    }

    results
}
