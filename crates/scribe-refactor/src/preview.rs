use std::collections::BTreeMap;

use scribe_core::DocumentId;
use serde::Serialize;
use similar::TextDiff;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilePreview {
    pub document: DocumentId,
    pub original: String,
    pub modified: String,
    pub unified_diff: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenamePreview {
    pub total_files: usize,
    pub files: Vec<FilePreview>,
}

fn text_or_empty<'a>(texts: &'a BTreeMap<DocumentId, String>, document: &DocumentId) -> &'a str {
    texts.get(document).map(String::as_str).unwrap_or("")
}

/// Unified diffs for every document whose text changed.
pub fn preview_rename(
    original: &BTreeMap<DocumentId, String>,
    modified: &BTreeMap<DocumentId, String>,
) -> RenamePreview {
    let mut files = Vec::new();
    for document in modified.keys() {
        let before = text_or_empty(original, document);
        let after = text_or_empty(modified, document);
        if before == after {
            continue;
        }

        let unified_diff = TextDiff::from_lines(before, after)
            .unified_diff()
            .context_radius(3)
            .header(&format!("a/{document}"), &format!("b/{document}"))
            .to_string();

        files.push(FilePreview {
            document: document.clone(),
            original: before.to_string(),
            modified: after.to_string(),
            unified_diff,
        });
    }

    RenamePreview {
        total_files: files.len(),
        files,
    }
}
