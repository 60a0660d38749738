//! Question API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::{created, parse_param, text_param, ApiJson, Deleted};
use crate::db::QuestionFilter;
use crate::errors::AppError;
use crate::models::{
    Answer, AnswerList, CreateAnswerRequest, CreateQuestionRequest, Difficulty, Question,
    QuestionList, UpdateQuestionRequest,
};
use crate::search::filter_by_text;
use crate::AppState;

/// Query parameters for listing questions.
#[derive(Debug, Default, Deserialize)]
pub struct QuestionQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

/// GET /api/questions - List questions, newest first.
pub async fn list_questions(
    State(state): State<AppState>,
    Query(query): Query<QuestionQuery>,
) -> Result<Json<QuestionList>, AppError> {
    let repo = state.db.repo().await?;
    let filter = QuestionFilter {
        category: text_param(query.category),
        difficulty: parse_param("difficulty", query.difficulty.as_deref(), Difficulty::parse)?,
    };

    let (questions, matched) = repo.questions().find_and_count(&filter).await?;
    let questions = filter_by_text(questions, query.q.as_deref());
    tracing::debug!(matched, returned = questions.len(), "Listed questions");

    Ok(Json(QuestionList {
        total: questions.len(),
        questions,
    }))
}

/// POST /api/questions - Create a question.
pub async fn create_question(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<Question>), AppError> {
    let repo = state.db.repo().await?;
    let question = Question::new(request)?;
    let question = repo.questions().create(question).await?;

    tracing::debug!(id = %question.id, "Created question");
    Ok(created(question))
}

/// GET /api/questions/{id} - Get a single question.
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Question>, AppError> {
    let repo = state.db.repo().await?;
    Ok(Json(repo.questions().get(&id).await?))
}

/// PUT /api/questions/{id} - Update a question.
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateQuestionRequest>,
) -> Result<Json<Question>, AppError> {
    let repo = state.db.repo().await?;
    Ok(Json(repo.questions().update_by_id(&id, &request).await?))
}

/// DELETE /api/questions/{id} - Delete a question with its answers and reviews.
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    let repo = state.db.repo().await?;
    if repo.questions().delete_by_id(&id).await? {
        tracing::debug!(%id, "Deleted question");
    }
    Ok(Deleted::response())
}

/// GET /api/questions/{id}/answers - Answers with their reviews, newest first.
pub async fn list_question_answers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnswerList>, AppError> {
    let repo = state.db.repo().await?;
    let answers = repo.answers().list_with_reviews(&id).await?;
    Ok(Json(AnswerList { answers }))
}

/// POST /api/questions/{id}/answers - Record a new attempt.
pub async fn create_question_answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<CreateAnswerRequest>,
) -> Result<(StatusCode, Json<Answer>), AppError> {
    let repo = state.db.repo().await?;
    if !repo.questions().exists(&id).await? {
        return Err(AppError::not_found());
    }

    let attempt_number = repo.answers().next_attempt_number(&id).await?;
    let answer = Answer::new(&id, attempt_number, request)?;
    let answer = repo.answers().create(answer).await?;

    tracing::debug!(question_id = %id, attempt_number, "Recorded answer");
    Ok(created(answer))
}
