use chrono::Utc;
use notes_schemas::{generate_note_id, summarize, DeleteResponse, Note, NoteId, NoteInput};
use std::sync::Arc;
use tracing::info;

use crate::error::{NotesError, Result};
use crate::store::NoteStore;

/// Notes operations over an injected store.
///
/// Every operation validates first and then performs exactly one store call.
#[derive(Clone)]
pub struct NotesService {
    store: Arc<dyn NoteStore>,
}

impl NotesService {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: NoteInput) -> Result<Note> {
        let valid = input.validate()?;

        let note = Note {
            id: generate_note_id(),
            summary: summarize(&valid.content),
            title: valid.title,
            content: valid.content,
            created_at: Utc::now().to_rfc3339(),
        };

        self.store.put(&note).await?;
        info!("Created note {}", note.id);

        Ok(note)
    }

    pub async fn list(&self) -> Result<Vec<Note>> {
        self.store.scan().await
    }

    pub async fn get(&self, id: &NoteId) -> Result<Note> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| NotesError::NotFound(id.clone()))
    }

    pub async fn update(&self, id: &NoteId, input: NoteInput) -> Result<Note> {
        let valid = input.validate()?;
        let summary = summarize(&valid.content);

        let note = self
            .store
            .update(id, &valid.title, &valid.content, &summary)
            .await?
            .ok_or_else(|| NotesError::NotFound(id.clone()))?;

        info!("Updated note {}", note.id);
        Ok(note)
    }

    /// Deleting an id that is already gone is reported as `NotFound`.
    pub async fn delete(&self, id: &NoteId) -> Result<DeleteResponse> {
        if !self.store.delete(id).await? {
            return Err(NotesError::NotFound(id.clone()));
        }

        info!("Deleted note {}", id);
        Ok(DeleteResponse::deleted(id.clone()))
    }
}
