use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use scribe_refactor::{
    DocumentHandle, DocumentId, DocumentStore, DocumentUnavailable, TextDocument,
};

struct LoadedFile {
    original: String,
    document: TextDocument,
}

/// A [`DocumentStore`] over files on disk.
///
/// Files are read lazily on first open and edited in memory; nothing is
/// written until [`DiskWorkspace::write_back`].
#[derive(Default)]
pub struct DiskWorkspace {
    paths: BTreeMap<DocumentId, PathBuf>,
    loaded: BTreeMap<DocumentId, LoadedFile>,
}

impl DiskWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path`; the returned id is the path as given.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> DocumentId {
        let path = path.into();
        let id = DocumentId::new(path.display().to_string());
        self.paths.insert(id.clone(), path);
        id
    }

    pub fn path(&self, document: &DocumentId) -> Option<&Path> {
        self.paths.get(document).map(PathBuf::as_path)
    }

    /// Current text of `document`, reading it from disk if needed.
    pub fn text(&mut self, document: &DocumentId) -> Result<&str, DocumentUnavailable> {
        Ok(self.ensure_loaded(document)?.document.text())
    }

    /// Text of every loaded document as it was read from disk.
    pub fn original_texts(&self) -> BTreeMap<DocumentId, String> {
        self.loaded
            .iter()
            .map(|(id, file)| (id.clone(), file.original.clone()))
            .collect()
    }

    pub fn current_texts(&self) -> BTreeMap<DocumentId, String> {
        self.loaded
            .iter()
            .map(|(id, file)| (id.clone(), file.document.text().to_string()))
            .collect()
    }

    /// Write every document in `touched` whose text changed back to disk.
    ///
    /// Returns the number of files written.
    pub fn write_back(&self, touched: &BTreeSet<DocumentId>) -> Result<usize> {
        let mut written = 0;
        for id in touched {
            let (Some(file), Some(path)) = (self.loaded.get(id), self.paths.get(id)) else {
                continue;
            };
            if file.document.text() == file.original {
                continue;
            }

            atomic_write(path, file.document.text().as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::debug!(target: "scribe.cli", path = %path.display(), "wrote renamed file");
            written += 1;
        }
        Ok(written)
    }

    fn ensure_loaded(&mut self, document: &DocumentId) -> Result<&mut LoadedFile, DocumentUnavailable> {
        let Some(path) = self.paths.get(document) else {
            return Err(DocumentUnavailable::new(
                document.clone(),
                "not part of the workspace",
            ));
        };

        match self.loaded.entry(document.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let text = fs::read_to_string(path)
                    .map_err(|err| DocumentUnavailable::new(document.clone(), err.to_string()))?;
                tracing::trace!(
                    target: "scribe.cli",
                    path = %path.display(),
                    bytes = text.len(),
                    "loaded file"
                );
                Ok(entry.insert(LoadedFile {
                    document: TextDocument::new(text.clone()),
                    original: text,
                }))
            }
        }
    }
}

impl DocumentStore for DiskWorkspace {
    fn open_document(
        &mut self,
        document: &DocumentId,
    ) -> Result<&mut dyn DocumentHandle, DocumentUnavailable> {
        let file = self.ensure_loaded(document)?;
        Ok(&mut file.document as &mut dyn DocumentHandle)
    }
}

/// Replace `path` with `bytes` via a temporary file in the same directory.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
