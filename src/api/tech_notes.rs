//! Tech-note API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::{created, ApiJson, Deleted};
use crate::errors::AppError;
use crate::models::{CreateTechNoteRequest, TechNote, TechNoteList, UpdateTechNoteRequest};
use crate::search::filter_by_text;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TechNoteQuery {
    pub q: Option<String>,
}

/// GET /api/tech-notes - List notes, newest first.
pub async fn list_tech_notes(
    State(state): State<AppState>,
    Query(query): Query<TechNoteQuery>,
) -> Result<Json<TechNoteList>, AppError> {
    let repo = state.db.repo().await?;
    let (tech_notes, matched) = repo.tech_notes().find_and_count(&()).await?;
    let tech_notes = filter_by_text(tech_notes, query.q.as_deref());
    tracing::debug!(matched, returned = tech_notes.len(), "Listed tech notes");

    Ok(Json(TechNoteList {
        total: tech_notes.len(),
        tech_notes,
    }))
}

/// POST /api/tech-notes
pub async fn create_tech_note(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateTechNoteRequest>,
) -> Result<(StatusCode, Json<TechNote>), AppError> {
    let repo = state.db.repo().await?;
    let note = TechNote::new(request)?;
    Ok(created(repo.tech_notes().create(note).await?))
}

/// GET /api/tech-notes/{id}
pub async fn get_tech_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TechNote>, AppError> {
    let repo = state.db.repo().await?;
    Ok(Json(repo.tech_notes().get(&id).await?))
}

/// PUT /api/tech-notes/{id}
pub async fn update_tech_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateTechNoteRequest>,
) -> Result<Json<TechNote>, AppError> {
    let repo = state.db.repo().await?;
    Ok(Json(repo.tech_notes().update_by_id(&id, &request).await?))
}

/// DELETE /api/tech-notes/{id}
pub async fn delete_tech_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    let repo = state.db.repo().await?;
    repo.tech_notes().delete_by_id(&id).await?;
    Ok(Deleted::response())
}
