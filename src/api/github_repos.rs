//! GitHub repository API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::{created, text_param, ApiJson, Deleted};
use crate::db::GithubRepoFilter;
use crate::errors::AppError;
use crate::models::{CreateGithubRepoRequest, GithubRepo, GithubRepoList, UpdateGithubRepoRequest};
use crate::search::filter_by_text;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct GithubRepoQuery {
    pub q: Option<String>,
    pub language: Option<String>,
}

/// GET /api/github-repos - List repos, most starred first.
pub async fn list_github_repos(
    State(state): State<AppState>,
    Query(query): Query<GithubRepoQuery>,
) -> Result<Json<GithubRepoList>, AppError> {
    let repo = state.db.repo().await?;
    let filter = GithubRepoFilter {
        primary_language: text_param(query.language),
    };

    let (github_repos, matched) = repo.github_repos().find_and_count(&filter).await?;
    let github_repos = filter_by_text(github_repos, query.q.as_deref());
    tracing::debug!(matched, returned = github_repos.len(), "Listed GitHub repos");

    Ok(Json(GithubRepoList {
        total: github_repos.len(),
        github_repos,
    }))
}

/// POST /api/github-repos - Register a repo; names are unique.
pub async fn create_github_repo(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateGithubRepoRequest>,
) -> Result<(StatusCode, Json<GithubRepo>), AppError> {
    let repo = state.db.repo().await?;
    let entry = GithubRepo::new(request)?;
    Ok(created(repo.github_repos().create(entry).await?))
}

/// GET /api/github-repos/{id}
pub async fn get_github_repo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GithubRepo>, AppError> {
    let repo = state.db.repo().await?;
    Ok(Json(repo.github_repos().get(&id).await?))
}

/// PUT /api/github-repos/{id}
pub async fn update_github_repo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateGithubRepoRequest>,
) -> Result<Json<GithubRepo>, AppError> {
    let repo = state.db.repo().await?;
    Ok(Json(repo.github_repos().update_by_id(&id, &request).await?))
}

/// DELETE /api/github-repos/{id}
pub async fn delete_github_repo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    let repo = state.db.repo().await?;
    repo.github_repos().delete_by_id(&id).await?;
    Ok(Deleted::response())
}
