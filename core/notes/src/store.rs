use async_trait::async_trait;
use notes_schemas::{Note, NoteId};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;

/// Persistence seam for notes. Each method is a single store round trip.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Write a full record, replacing any existing item with the same id
    async fn put(&self, note: &Note) -> Result<()>;

    /// Every stored note, in store-native order
    async fn scan(&self) -> Result<Vec<Note>>;

    async fn get(&self, id: &NoteId) -> Result<Option<Note>>;

    /// Replace title, content and summary of an existing note.
    ///
    /// Returns `None` without writing anything when no note has this id.
    async fn update(
        &self,
        id: &NoteId,
        title: &str,
        content: &str,
        summary: &str,
    ) -> Result<Option<Note>>;

    /// Remove a note; `false` when there was nothing to remove
    async fn delete(&self, id: &NoteId) -> Result<bool>;
}

/// Process-local store for tests and running without AWS
#[derive(Default)]
pub struct InMemoryStore {
    notes: RwLock<HashMap<NoteId, Note>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }
}

#[async_trait]
impl NoteStore for InMemoryStore {
    async fn put(&self, note: &Note) -> Result<()> {
        debug!("Storing note {}", note.id);
        self.notes.write().await.insert(note.id.clone(), note.clone());
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Note>> {
        Ok(self.notes.read().await.values().cloned().collect())
    }

    async fn get(&self, id: &NoteId) -> Result<Option<Note>> {
        Ok(self.notes.read().await.get(id).cloned())
    }

    async fn update(
        &self,
        id: &NoteId,
        title: &str,
        content: &str,
        summary: &str,
    ) -> Result<Option<Note>> {
        let mut notes = self.notes.write().await;
        Ok(notes.get_mut(id).map(|note| {
            note.title = title.to_string();
            note.content = content.to_string();
            note.summary = summary.to_string();
            note.clone()
        }))
    }

    async fn delete(&self, id: &NoteId) -> Result<bool> {
        Ok(self.notes.write().await.remove(id).is_some())
    }
}
