//! Batch rename of symbol occurrences with offset correction.
//!
//! Occurrences are recorded against the *original* text of each document, but
//! they are replaced one at a time in live buffers. Every length-changing
//! replacement leaves a [`PendingAdjustment`] behind so later occurrences in
//! the same document can be moved to where their text currently lives, without
//! rescanning the document after each edit.

use std::collections::{BTreeMap, BTreeSet};

use scribe_core::{DocumentError, DocumentHandle, DocumentId, TextRange};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One place the old symbol name appears.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occurrence {
    pub document: DocumentId,
    /// Byte offset into the original, unmodified document.
    pub offset: usize,
    pub len: usize,
}

impl Occurrence {
    pub fn new(document: impl Into<DocumentId>, offset: usize, len: usize) -> Self {
        Self {
            document: document.into(),
            offset,
            len,
        }
    }

    /// The original span, saturating at `usize::MAX`.
    pub fn range(&self) -> TextRange {
        self.checked_range().unwrap_or(TextRange {
            start: self.offset,
            end: usize::MAX,
        })
    }

    /// The original span, or `None` if `offset + len` overflows.
    pub fn checked_range(&self) -> Option<TextRange> {
        TextRange::checked_at(self.offset, self.len)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("document `{document}` is unavailable: {reason}")]
pub struct DocumentUnavailable {
    pub document: DocumentId,
    pub reason: String,
}

impl DocumentUnavailable {
    pub fn new(document: DocumentId, reason: impl Into<String>) -> Self {
        Self {
            document,
            reason: reason.into(),
        }
    }
}

/// Opens (or locates) the editable buffer for a document.
///
/// Implementations may hit the filesystem; failures are reported per document
/// and never abort a rename.
pub trait DocumentStore {
    fn open_document(
        &mut self,
        document: &DocumentId,
    ) -> Result<&mut dyn DocumentHandle, DocumentUnavailable>;
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RenameError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Order in which occurrences are replaced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OccurrenceOrder {
    /// Stable sort by `(document, offset)` before replacing anything.
    #[default]
    Sorted,
    /// Replace in the order the caller supplied.
    Input,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenameOptions {
    pub order: OccurrenceOrder,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    DocumentUnavailable(DocumentUnavailable),
    /// The span intersects an occurrence already replaced in the same document.
    /// `with` is expressed in original-document coordinates.
    Overlapping { with: TextRange },
    /// The corrected offset does not address a valid span of the live buffer.
    InvalidSpan(DocumentError),
    /// Offset correction moved the occurrence before the start of the document.
    OffsetUnderflow,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::DocumentUnavailable(err) => err.fmt(f),
            SkipReason::Overlapping { with } => {
                write!(f, "overlaps already renamed span {}..{}", with.start, with.end)
            }
            SkipReason::InvalidSpan(err) => err.fmt(f),
            SkipReason::OffsetUnderflow => f.write_str("corrected offset is negative"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedOccurrence {
    pub occurrence: Occurrence,
    pub reason: SkipReason,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenameOutcome {
    /// Documents that were opened for editing; callers re-analyse these.
    pub touched: BTreeSet<DocumentId>,
    /// Number of occurrences actually replaced.
    pub replaced: usize,
    pub skipped: Vec<SkippedOccurrence>,
}

impl RenameOutcome {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Length change left behind by one replacement, in current-document coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingAdjustment {
    offset: usize,
    delta: isize,
}

#[derive(Debug, Default)]
struct DocumentState {
    adjustments: Vec<PendingAdjustment>,
    /// Original-coordinate spans replaced so far.
    replaced: Vec<TextRange>,
}

impl DocumentState {
    fn effective_offset(&self, offset: isize) -> Result<usize, SkipReason> {
        // Single left-to-right pass; `effective` grows as adjustments are added,
        // so later comparisons see the partially corrected offset.
        let mut effective = offset;
        for adjustment in &self.adjustments {
            if (adjustment.offset as isize) < effective {
                effective += adjustment.delta;
            }
        }
        usize::try_from(effective).map_err(|_| SkipReason::OffsetUnderflow)
    }

    fn apply(
        &mut self,
        occurrence: &Occurrence,
        new_name: &str,
        handle: &mut dyn DocumentHandle,
    ) -> Result<usize, SkipReason> {
        // Spans that cannot exist in any buffer are rejected before offset math.
        let (Some(original), Ok(offset)) = (
            occurrence.checked_range(),
            isize::try_from(occurrence.offset),
        ) else {
            return Err(SkipReason::InvalidSpan(DocumentError::OutOfBounds {
                range: occurrence.range(),
                len: handle.text().len(),
            }));
        };
        if let Some(with) = self.replaced.iter().find(|span| span.intersects(original)) {
            return Err(SkipReason::Overlapping { with: *with });
        }

        let effective = self.effective_offset(offset)?;
        handle
            .replace(effective, occurrence.len, new_name)
            .map_err(SkipReason::InvalidSpan)?;
        self.replaced.push(original);

        let delta = new_name.len() as isize - occurrence.len as isize;
        if delta != 0 {
            for adjustment in &mut self.adjustments {
                if adjustment.offset > effective {
                    adjustment.offset = adjustment.offset.saturating_add_signed(delta);
                }
            }
            self.adjustments.push(PendingAdjustment {
                offset: effective,
                delta,
            });
        }

        Ok(effective)
    }
}

/// Applies one textual rename across any number of documents.
#[derive(Clone, Debug, Default)]
pub struct BatchOffsetRenamer {
    options: RenameOptions,
}

impl BatchOffsetRenamer {
    pub fn new(options: RenameOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenameOptions {
        &self.options
    }

    /// Replace every occurrence with `new_name`.
    ///
    /// Fails only when the arguments are invalid, and then before touching any
    /// document. Per-occurrence problems (missing documents, overlapping or
    /// invalid spans) are reported in [`RenameOutcome::skipped`]; edits already
    /// applied are never rolled back.
    pub fn rename_all<S>(
        &self,
        occurrences: &[Occurrence],
        new_name: &str,
        store: &mut S,
    ) -> Result<RenameOutcome, RenameError>
    where
        S: DocumentStore + ?Sized,
    {
        if new_name.is_empty() {
            return Err(RenameError::InvalidArgument(
                "replacement name must not be empty".to_string(),
            ));
        }
        if let Some(empty) = occurrences.iter().find(|occurrence| occurrence.len == 0) {
            return Err(RenameError::InvalidArgument(format!(
                "occurrence at {}:{} has zero length",
                empty.document, empty.offset
            )));
        }

        let mut queue: Vec<&Occurrence> = occurrences.iter().collect();
        if self.options.order == OccurrenceOrder::Sorted {
            queue.sort_by(|a, b| {
                a.document
                    .cmp(&b.document)
                    .then_with(|| a.offset.cmp(&b.offset))
            });
        }

        let mut states: BTreeMap<DocumentId, DocumentState> = BTreeMap::new();
        let mut outcome = RenameOutcome::default();

        for occurrence in queue {
            let handle = match store.open_document(&occurrence.document) {
                Ok(handle) => handle,
                Err(err) => {
                    tracing::warn!(
                        target: "scribe.refactor",
                        document = %occurrence.document,
                        offset = occurrence.offset,
                        error = %err,
                        "skipping occurrence in unavailable document"
                    );
                    outcome.skipped.push(SkippedOccurrence {
                        occurrence: occurrence.clone(),
                        reason: SkipReason::DocumentUnavailable(err),
                    });
                    continue;
                }
            };
            outcome.touched.insert(occurrence.document.clone());

            let state = states.entry(occurrence.document.clone()).or_default();
            match state.apply(occurrence, new_name, handle) {
                Ok(effective) => {
                    tracing::trace!(
                        target: "scribe.refactor",
                        document = %occurrence.document,
                        offset = occurrence.offset,
                        effective,
                        "replaced occurrence"
                    );
                    outcome.replaced += 1;
                }
                Err(reason) => {
                    tracing::warn!(
                        target: "scribe.refactor",
                        document = %occurrence.document,
                        offset = occurrence.offset,
                        len = occurrence.len,
                        reason = %reason,
                        "skipping occurrence"
                    );
                    outcome.skipped.push(SkippedOccurrence {
                        occurrence: occurrence.clone(),
                        reason,
                    });
                }
            }
        }

        tracing::debug!(
            target: "scribe.refactor",
            new_name,
            replaced = outcome.replaced,
            skipped = outcome.skipped.len(),
            documents = outcome.touched.len(),
            "rename finished"
        );
        Ok(outcome)
    }
}

/// [`BatchOffsetRenamer::rename_all`] with default options.
pub fn rename_all<S>(
    occurrences: &[Occurrence],
    new_name: &str,
    store: &mut S,
) -> Result<RenameOutcome, RenameError>
where
    S: DocumentStore + ?Sized,
{
    BatchOffsetRenamer::default().rename_all(occurrences, new_name, store)
}
