use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use notes_schemas::{NoteId, NoteInput};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::Result;
use crate::service::NotesService;

#[derive(Clone)]
pub struct AppState {
    pub notes: NotesService,
}

pub fn router(notes: NotesService) -> Router {
    let state = AppState { notes };

    // Browser clients call from arbitrary origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/notes", get(list_notes).post(create_note))
        .route(
            "/notes/:note_id",
            get(get_note).put(update_note).delete(delete_note),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "notes",
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn create_note(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NoteInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(input) = payload?;
    let note = state.notes.create(input).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

async fn list_notes(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let notes = state.notes.list().await?;
    info!("Listing {} notes", notes.len());
    Ok(Json(notes))
}

async fn get_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
) -> Result<impl IntoResponse> {
    let note = state.notes.get(&NoteId(note_id)).await?;
    Ok(Json(note))
}

async fn update_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
    payload: std::result::Result<Json<NoteInput>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(input) = payload?;
    let note = state.notes.update(&NoteId(note_id), input).await?;
    Ok(Json(note))
}

async fn delete_note(
    State(state): State<AppState>,
    Path(note_id): Path<String>,
) -> Result<impl IntoResponse> {
    let response = state.notes.delete(&NoteId(note_id)).await?;
    Ok(Json(response))
}
