//! Answer API endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{created, ApiJson, Deleted};
use crate::db::ReviewFilter;
use crate::errors::AppError;
use crate::models::{
    Answer, AnswerWithReviews, CreateReviewRequest, Review, ReviewList, UpdateAnswerRequest,
};
use crate::AppState;

/// GET /api/answers/{id} - Get an answer with its reviews.
pub async fn get_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnswerWithReviews>, AppError> {
    let repo = state.db.repo().await?;
    Ok(Json(repo.answers().get_with_reviews(&id).await?))
}

/// PUT /api/answers/{id} - Update an answer.
pub async fn update_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateAnswerRequest>,
) -> Result<Json<Answer>, AppError> {
    let repo = state.db.repo().await?;
    Ok(Json(repo.answers().update_by_id(&id, &request).await?))
}

/// DELETE /api/answers/{id} - Delete an answer and its reviews.
pub async fn delete_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    let repo = state.db.repo().await?;
    repo.answers().delete_by_id(&id).await?;
    Ok(Deleted::response())
}

/// GET /api/answers/{id}/reviews - Reviews of an answer, newest first.
pub async fn list_answer_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReviewList>, AppError> {
    let repo = state.db.repo().await?;
    let reviews = repo
        .reviews()
        .find_many(&ReviewFilter {
            answer_id: Some(id),
            ..Default::default()
        })
        .await?;
    Ok(Json(ReviewList { reviews }))
}

/// POST /api/answers/{id}/reviews - Review an answer.
pub async fn create_answer_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let repo = state.db.repo().await?;
    if !repo.answers().exists(&id).await? {
        return Err(AppError::not_found());
    }
    let review = Review::new(&id, request)?;
    Ok(created(repo.reviews().create(review).await?))
}
