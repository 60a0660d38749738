//! GitHub repository table mapping.

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::table::{decode_json, encode_json, Entity, Filter, RowValues};
use crate::errors::AppError;
use crate::models::{GithubRepo, UpdateGithubRepoRequest};

#[derive(Debug, Default, Clone)]
pub struct GithubRepoFilter {
    pub primary_language: Option<String>,
}

impl Filter for GithubRepoFilter {
    fn push_conditions(&self, query: &mut QueryBuilder<'static, Sqlite>) {
        if let Some(language) = &self.primary_language {
            query
                .push(" AND primary_language = ")
                .push_bind(language.clone());
        }
    }
}

impl Entity for GithubRepo {
    const TABLE: &'static str = "github_repos";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "repo_name",
        "description",
        "stars",
        "forks",
        "primary_language",
        "languages",
        "github_url",
        "homepage",
        "last_synced_at",
        "created_at",
    ];
    const ORDER_BY: &'static str = "stars DESC, repo_name ASC";

    type Filter = GithubRepoFilter;
    type Patch = UpdateGithubRepoRequest;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(GithubRepo {
            id: row.try_get("id")?,
            repo_name: row.try_get("repo_name")?,
            description: row.try_get("description")?,
            stars: row.try_get("stars")?,
            forks: row.try_get("forks")?,
            primary_language: row.try_get("primary_language")?,
            languages: decode_json(row, "languages")?,
            github_url: row.try_get("github_url")?,
            homepage: row.try_get("homepage")?,
            last_synced_at: row.try_get("last_synced_at")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn bind_values(&self, row: &mut RowValues<'_>) {
        row.push_bind(self.id.clone())
            .push_bind(self.repo_name.clone())
            .push_bind(self.description.clone())
            .push_bind(self.stars)
            .push_bind(self.forks)
            .push_bind(self.primary_language.clone())
            .push_bind(encode_json(&self.languages))
            .push_bind(self.github_url.clone())
            .push_bind(self.homepage.clone())
            .push_bind(self.last_synced_at.clone())
            .push_bind(self.created_at.clone());
    }

    fn apply_patch(&mut self, patch: &UpdateGithubRepoRequest) -> Result<(), AppError> {
        self.apply(patch)
    }

    /// Repos have no `updated_at`; an edit counts as a sync.
    fn touch(&mut self, now: String) {
        self.last_synced_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_repository;
    use crate::models::CreateGithubRepoRequest;

    fn repo_entry(name: &str, stars: i64, language: &str) -> GithubRepo {
        let mut languages = serde_json::Map::new();
        languages.insert(language.to_string(), serde_json::json!(1000));
        let request: CreateGithubRepoRequest = serde_json::from_value(serde_json::json!({
            "repoName": name,
            "githubUrl": format!("https://github.com/me/{}", name),
            "stars": stars,
            "primaryLanguage": language,
            "languages": languages
        }))
        .unwrap();
        GithubRepo::new(request).unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_name_is_a_conflict() {
        let (_dir, repo) = temp_repository().await;
        repo.github_repos().create(repo_entry("dotfiles", 1, "Shell")).await.unwrap();

        let result = repo.github_repos().create(repo_entry("dotfiles", 2, "Lua")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_ordered_by_stars_then_name() {
        let (_dir, repo) = temp_repository().await;
        let table = repo.github_repos();
        table.create(repo_entry("beta", 10, "Rust")).await.unwrap();
        table.create(repo_entry("alpha", 10, "Go")).await.unwrap();
        table.create(repo_entry("gamma", 50, "Rust")).await.unwrap();

        let names: Vec<_> = table
            .find_many(&GithubRepoFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.repo_name)
            .collect();
        assert_eq!(names, vec!["gamma", "alpha", "beta"]);

        let rust = table
            .find_many(&GithubRepoFilter {
                primary_language: Some("Rust".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(rust.len(), 2);
        assert_eq!(rust[0].languages.as_ref().unwrap()["Rust"], 1000);
    }
}
