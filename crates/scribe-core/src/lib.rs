//! Core shared types for Scribe.
//!
//! This crate is intentionally small: document identifiers, byte ranges, line
//! lookup, and the text-edit primitives the refactoring crates build on.

mod document;
mod edit;
mod text;

pub use document::{DocumentError, DocumentHandle, TextDocument};
pub use edit::{apply_text_edits, normalize_text_edits, EditError, TextEdit};
pub use text::{LineCol, LineIndex, TextRange};

use serde::{Deserialize, Serialize};

/// Identifier for a document taking part in a refactoring.
///
/// Usually a workspace-relative path, but callers may use any stable key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
