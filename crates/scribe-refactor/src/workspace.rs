use std::collections::BTreeMap;

use scribe_core::{DocumentHandle, DocumentId, TextDocument};

use crate::rename::{DocumentStore, DocumentUnavailable};

/// A set of in-memory documents keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InMemoryWorkspace {
    documents: BTreeMap<DocumentId, TextDocument>,
}

impl InMemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, document: impl Into<DocumentId>, text: impl Into<String>) {
        self.documents
            .insert(document.into(), TextDocument::new(text));
    }

    pub fn document(&self, document: &DocumentId) -> Option<&TextDocument> {
        self.documents.get(document)
    }

    pub fn text(&self, document: &DocumentId) -> Option<&str> {
        self.documents.get(document).map(|doc| doc.text())
    }

    /// Current text of every document.
    pub fn texts(&self) -> BTreeMap<DocumentId, String> {
        self.documents
            .iter()
            .map(|(id, doc)| (id.clone(), doc.text().to_string()))
            .collect()
    }

    pub fn into_texts(self) -> BTreeMap<DocumentId, String> {
        self.documents
            .into_iter()
            .map(|(id, doc)| (id, doc.into_text()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for InMemoryWorkspace
where
    K: Into<DocumentId>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut workspace = Self::new();
        for (document, text) in iter {
            workspace.insert(document, text);
        }
        workspace
    }
}

impl DocumentStore for InMemoryWorkspace {
    fn open_document(
        &mut self,
        document: &DocumentId,
    ) -> Result<&mut dyn DocumentHandle, DocumentUnavailable> {
        match self.documents.get_mut(document) {
            Some(doc) => Ok(doc as &mut dyn DocumentHandle),
            None => Err(DocumentUnavailable::new(
                document.clone(),
                "no such document in workspace",
            )),
        }
    }
}
