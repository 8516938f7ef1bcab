use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// ID Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(pub String);

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn generate_note_id() -> NoteId {
    NoteId(format!("note_{}", ulid::Ulid::new()))
}

// ============================================================================
// Note Schema
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub created_at: String, // RFC3339
}

/// Body of create and update requests.
///
/// Both fields are optional at the wire level so a missing field is reported
/// as a validation failure rather than a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// A `NoteInput` whose title and content are both present and non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidNote {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required field(s): {}", .fields.join(", "))]
pub struct ValidationError {
    pub fields: Vec<&'static str>,
}

impl NoteInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
        }
    }

    /// Check that `title` and `content` are present and not blank.
    ///
    /// Every offending field is reported, not just the first one.
    pub fn validate(self) -> Result<ValidNote, ValidationError> {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        let title = present(self.title);
        let content = present(self.content);

        match (title, content) {
            (Some(title), Some(content)) => Ok(ValidNote { title, content }),
            (title, content) => {
                let mut fields = Vec::new();
                if title.is_none() {
                    fields.push("title");
                }
                if content.is_none() {
                    fields.push("content");
                }
                Err(ValidationError { fields })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub status: String,
    pub id: NoteId,
}

impl DeleteResponse {
    pub fn deleted(id: NoteId) -> Self {
        Self {
            status: "deleted".to_string(),
            id,
        }
    }
}

// ============================================================================
// Summary
// ============================================================================

pub const SUMMARY_MAX_CHARS: usize = 120;
const SUMMARY_CUT_CHARS: usize = SUMMARY_MAX_CHARS - 3;

/// Derive a note summary from its content.
///
/// Short content is returned trimmed. Longer content is cut to
/// `SUMMARY_CUT_CHARS`, backed off to the last word boundary, and marked
/// with an ellipsis.
pub fn summarize(content: &str) -> String {
    let text = content.trim();
    if text.chars().count() <= SUMMARY_MAX_CHARS {
        return text.to_string();
    }

    let cut = text
        .char_indices()
        .nth(SUMMARY_CUT_CHARS)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let head = &text[..cut];
    let head = match head.rfind(' ') {
        Some(idx) => &head[..idx],
        None => head,
    };

    format!("{}...", head)
}
