use axum::{
    extract::{rejection::JsonRejection, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use notes_schemas::{NoteId, ValidationError};
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, NotesError>;

#[derive(Debug, Error)]
pub enum NotesError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Note not found: {0}")]
    NotFound(NoteId),

    #[error("store error: {0}")]
    Store(String),

    /// Body the JSON extractor refused: bad syntax, wrong field types, wrong content type
    #[error("{message}")]
    InvalidBody { status: StatusCode, message: String },
}

impl From<JsonRejection> for NotesError {
    fn from(rejection: JsonRejection) -> Self {
        NotesError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl NotesError {
    pub fn store(operation: &str, err: impl std::fmt::Display) -> Self {
        NotesError::Store(format!("{} failed: {}", operation, err))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            NotesError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            NotesError::NotFound(_) => StatusCode::NOT_FOUND,
            NotesError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            NotesError::InvalidBody { status, .. } => *status,
        }
    }
}

impl IntoResponse for NotesError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let validation = NotesError::from(ValidationError {
            fields: vec!["title"],
        });
        assert_eq!(validation.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let missing = NotesError::NotFound(NoteId("note_x".into()));
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(missing.to_string(), "Note not found: note_x");

        let store = NotesError::store("DynamoDB Scan", "timeout");
        assert_eq!(store.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.to_string(), "store error: DynamoDB Scan failed: timeout");
    }
}
