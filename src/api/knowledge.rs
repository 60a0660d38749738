//! Knowledge-note API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::{created, parse_param, ApiJson, Deleted};
use crate::db::KnowledgeFilter;
use crate::errors::AppError;
use crate::models::{
    CreateKnowledgeRequest, KnowledgeList, KnowledgeType, TechKnowledge, UpdateKnowledgeRequest,
};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct KnowledgeQuery {
    #[serde(rename = "type")]
    pub knowledge_type: Option<String>,
}

/// GET /api/tech-stack/{id}/knowledge - Notes for a stack, most important first.
pub async fn list_knowledge(
    State(state): State<AppState>,
    Path(tech_stack_id): Path<String>,
    Query(query): Query<KnowledgeQuery>,
) -> Result<Json<KnowledgeList>, AppError> {
    let repo = state.db.repo().await?;
    let filter = KnowledgeFilter {
        tech_stack_id: Some(tech_stack_id),
        knowledge_type: parse_param("type", query.knowledge_type.as_deref(), KnowledgeType::parse)?,
    };

    let knowledge_notes = repo.knowledge().find_many(&filter).await?;
    Ok(Json(KnowledgeList { knowledge_notes }))
}

/// POST /api/tech-stack/{id}/knowledge
pub async fn create_knowledge(
    State(state): State<AppState>,
    Path(tech_stack_id): Path<String>,
    ApiJson(request): ApiJson<CreateKnowledgeRequest>,
) -> Result<(StatusCode, Json<TechKnowledge>), AppError> {
    let repo = state.db.repo().await?;
    if !repo.tech_stacks().exists(&tech_stack_id).await? {
        return Err(AppError::not_found());
    }
    let note = TechKnowledge::new(&tech_stack_id, request)?;
    Ok(created(repo.knowledge().create(note).await?))
}

/// GET /api/knowledge/{id}
pub async fn get_knowledge(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TechKnowledge>, AppError> {
    let repo = state.db.repo().await?;
    Ok(Json(repo.knowledge().get(&id).await?))
}

/// PUT /api/knowledge/{id}
pub async fn update_knowledge(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateKnowledgeRequest>,
) -> Result<Json<TechKnowledge>, AppError> {
    let repo = state.db.repo().await?;
    Ok(Json(repo.knowledge().update_by_id(&id, &request).await?))
}

/// DELETE /api/knowledge/{id}
pub async fn delete_knowledge(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    let repo = state.db.repo().await?;
    repo.knowledge().delete_by_id(&id).await?;
    Ok(Deleted::response())
}
