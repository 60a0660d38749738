//! GitHub repository showcased in the portfolio.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    blank_to_none, check_non_negative, new_id, nullable, patch_field, patch_text, require_text,
    require_text_if_present, timestamp, Patch,
};
use crate::errors::AppError;
use crate::search::TextSearchable;

/// A repository entry. `repo_name` is unique across all entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GithubRepo {
    pub id: String,
    pub repo_name: String,
    pub description: Option<String>,
    pub stars: i64,
    pub forks: i64,
    pub primary_language: Option<String>,
    /// Language name to byte count
    pub languages: Option<BTreeMap<String, i64>>,
    pub github_url: String,
    pub homepage: Option<String>,
    pub last_synced_at: String,
    pub created_at: String,
}

impl GithubRepo {
    pub fn new(request: CreateGithubRepoRequest) -> Result<Self, AppError> {
        require_text("repoName", &request.repo_name)?;
        require_text("githubUrl", &request.github_url)?;
        check_non_negative("stars", request.stars)?;
        check_non_negative("forks", request.forks)?;

        let now = timestamp();
        Ok(Self {
            id: new_id(),
            repo_name: request.repo_name,
            description: blank_to_none(request.description),
            stars: request.stars,
            forks: request.forks,
            primary_language: blank_to_none(request.primary_language),
            languages: request.languages,
            github_url: request.github_url,
            homepage: blank_to_none(request.homepage),
            last_synced_at: now.clone(),
            created_at: now,
        })
    }

    pub fn apply(&mut self, patch: &UpdateGithubRepoRequest) -> Result<(), AppError> {
        require_text_if_present("repoName", patch.repo_name.as_ref())?;
        require_text_if_present("githubUrl", patch.github_url.as_ref())?;
        if let Some(stars) = patch.stars {
            check_non_negative("stars", stars)?;
        }
        if let Some(forks) = patch.forks {
            check_non_negative("forks", forks)?;
        }

        if let Some(name) = &patch.repo_name {
            self.repo_name = name.clone();
        }
        if let Some(url) = &patch.github_url {
            self.github_url = url.clone();
        }
        if let Some(stars) = patch.stars {
            self.stars = stars;
        }
        if let Some(forks) = patch.forks {
            self.forks = forks;
        }
        patch_field(&mut self.languages, &patch.languages);
        let optional_text = [
            (&mut self.description, &patch.description),
            (&mut self.primary_language, &patch.primary_language),
            (&mut self.homepage, &patch.homepage),
        ];
        for (field, value) in optional_text {
            patch_text(field, value);
        }
        Ok(())
    }
}

impl TextSearchable for GithubRepo {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.repo_name.as_str()];
        if let Some(description) = &self.description {
            fields.push(description);
        }
        fields
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGithubRepoRequest {
    pub repo_name: String,
    pub github_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stars: i64,
    #[serde(default)]
    pub forks: i64,
    #[serde(default)]
    pub primary_language: Option<String>,
    #[serde(default)]
    pub languages: Option<BTreeMap<String, i64>>,
    #[serde(default)]
    pub homepage: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGithubRepoRequest {
    #[serde(default)]
    pub repo_name: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Patch<String>,
    #[serde(default)]
    pub stars: Option<i64>,
    #[serde(default)]
    pub forks: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub primary_language: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub languages: Patch<BTreeMap<String, i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub homepage: Patch<String>,
}

/// Response for `GET /github-repos`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubRepoList {
    pub github_repos: Vec<GithubRepo>,
    pub total: usize,
}
