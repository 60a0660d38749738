//! Tech-stack API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::{created, parse_param, text_param, ApiJson, Deleted};
use crate::db::TechStackFilter;
use crate::errors::AppError;
use crate::models::{
    CreateTechStackRequest, ProficiencyLevel, TechStack, TechStackDetail, TechStackList,
    TechStackStats, UpdateTechStackRequest,
};
use crate::search::filter_by_text;
use crate::AppState;

/// Query parameters for listing tech stacks.
#[derive(Debug, Default, Deserialize)]
pub struct TechStackQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub proficiency: Option<String>,
}

/// GET /api/tech-stack - List stacks, most recently updated first.
pub async fn list_tech_stacks(
    State(state): State<AppState>,
    Query(query): Query<TechStackQuery>,
) -> Result<Json<TechStackList>, AppError> {
    let repo = state.db.repo().await?;
    let filter = TechStackFilter {
        category: text_param(query.category),
        proficiency_level: parse_param(
            "proficiency",
            query.proficiency.as_deref(),
            ProficiencyLevel::parse,
        )?,
    };

    let (tech_stacks, matched) = repo.tech_stacks().find_and_count(&filter).await?;
    let tech_stacks = filter_by_text(tech_stacks, query.q.as_deref());
    tracing::debug!(matched, returned = tech_stacks.len(), "Listed tech stacks");

    Ok(Json(TechStackList {
        total: tech_stacks.len(),
        tech_stacks,
    }))
}

/// POST /api/tech-stack
pub async fn create_tech_stack(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateTechStackRequest>,
) -> Result<(StatusCode, Json<TechStack>), AppError> {
    let repo = state.db.repo().await?;
    let tech_stack = TechStack::new(request)?;
    Ok(created(repo.tech_stacks().create(tech_stack).await?))
}

/// GET /api/tech-stack/stats - Aggregate counts for the dashboard.
pub async fn tech_stack_stats(
    State(state): State<AppState>,
) -> Result<Json<TechStackStats>, AppError> {
    let repo = state.db.repo().await?;
    Ok(Json(repo.tech_stacks().stats().await?))
}

/// GET /api/tech-stack/{id} - A stack with its knowledge notes.
pub async fn get_tech_stack(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TechStackDetail>, AppError> {
    let repo = state.db.repo().await?;
    Ok(Json(repo.tech_stacks().get_detail(&id).await?))
}

/// PUT /api/tech-stack/{id}
pub async fn update_tech_stack(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateTechStackRequest>,
) -> Result<Json<TechStack>, AppError> {
    let repo = state.db.repo().await?;
    Ok(Json(repo.tech_stacks().update_by_id(&id, &request).await?))
}

/// DELETE /api/tech-stack/{id} - Delete a stack and its knowledge notes.
pub async fn delete_tech_stack(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    let repo = state.db.repo().await?;
    if repo.tech_stacks().delete_by_id(&id).await? {
        tracing::debug!(%id, "Deleted tech stack");
    }
    Ok(Deleted::response())
}
