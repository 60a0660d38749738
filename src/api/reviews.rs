//! Review API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{ApiJson, Deleted};
use crate::errors::AppError;
use crate::models::{Review, UpdateReviewRequest};
use crate::AppState;

/// GET /api/reviews/{id}
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Review>, AppError> {
    let repo = state.db.repo().await?;
    Ok(Json(repo.reviews().get(&id).await?))
}

/// PUT /api/reviews/{id}
pub async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateReviewRequest>,
) -> Result<Json<Review>, AppError> {
    let repo = state.db.repo().await?;
    Ok(Json(repo.reviews().update_by_id(&id, &request).await?))
}

/// DELETE /api/reviews/{id}
pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    let repo = state.db.repo().await?;
    repo.reviews().delete_by_id(&id).await?;
    Ok(Deleted::response())
}
