//! Refactoring entrypoints for Scribe.
//!
//! This crate exposes:
//! - Batch renaming of symbol occurrences with offset correction (`rename`)
//! - Whole-word occurrence discovery and reference locations (`references`)
//! - The member context-menu model (`member_menu`)
//! - Unified-diff previews of a rename (`preview`)

mod member_menu;
mod preview;
mod references;
mod rename;
mod workspace;

pub use member_menu::{
    member_commands, JumpTarget, MemberCommand, MemberInfo, MemberLocation, MemberModifiers,
};
pub use preview::{preview_rename, FilePreview, RenamePreview};
pub use references::{find_text_occurrences, locate_references, SearchResult};
pub use rename::{
    rename_all, BatchOffsetRenamer, DocumentStore, DocumentUnavailable, Occurrence,
    OccurrenceOrder, RenameError, RenameOptions, RenameOutcome, SkipReason, SkippedOccurrence,
};
pub use workspace::InMemoryWorkspace;

pub use scribe_core::{DocumentHandle, DocumentId, TextDocument, TextRange};
