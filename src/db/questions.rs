//! Question table mapping.

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::table::{decode_enum, decode_json, encode_json, Entity, Filter, RowValues};
use crate::errors::AppError;
use crate::models::{Difficulty, Question, UpdateQuestionRequest};

/// Exact-match filters for listing questions.
#[derive(Debug, Default, Clone)]
pub struct QuestionFilter {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl Filter for QuestionFilter {
    fn push_conditions(&self, query: &mut QueryBuilder<'static, Sqlite>) {
        if let Some(category) = &self.category {
            query.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(difficulty) = self.difficulty {
            query.push(" AND difficulty = ").push_bind(difficulty.as_str());
        }
    }
}

impl Entity for Question {
    const TABLE: &'static str = "questions";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "title",
        "description",
        "category",
        "difficulty",
        "tags",
        "source",
        "created_at",
        "updated_at",
    ];
    const ORDER_BY: &'static str = "created_at DESC, rowid DESC";

    type Filter = QuestionFilter;
    type Patch = UpdateQuestionRequest;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Question {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            difficulty: decode_enum(row, "difficulty", Difficulty::parse)?,
            tags: decode_json(row, "tags")?,
            source: row.try_get("source")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn bind_values(&self, row: &mut RowValues<'_>) {
        row.push_bind(self.id.clone())
            .push_bind(self.title.clone())
            .push_bind(self.description.clone())
            .push_bind(self.category.clone())
            .push_bind(self.difficulty.as_str())
            .push_bind(encode_json(&self.tags))
            .push_bind(self.source.clone())
            .push_bind(self.created_at.clone())
            .push_bind(self.updated_at.clone());
    }

    fn apply_patch(&mut self, patch: &UpdateQuestionRequest) -> Result<(), AppError> {
        self.apply(patch)
    }

    fn touch(&mut self, now: String) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_repository;
    use crate::models::CreateQuestionRequest;

    fn question(title: &str, category: &str, difficulty: &str) -> Question {
        let request: CreateQuestionRequest = serde_json::from_value(serde_json::json!({
            "title": title,
            "description": format!("About {}", title),
            "category": category,
            "difficulty": difficulty,
            "tags": ["practice"]
        }))
        .unwrap();
        Question::new(request).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_read_back() {
        let (_dir, repo) = temp_repository().await;
        let created = repo
            .questions()
            .create(question("Binary Search", "Algorithms", "medium"))
            .await
            .unwrap();

        let loaded = repo.questions().get(&created.id).await.unwrap();
        assert_eq!(loaded, created);
        assert!(repo.questions().exists(&created.id).await.unwrap());
        assert!(repo.questions().find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_filters_combine_and_order_is_newest_first() {
        let (_dir, repo) = temp_repository().await;
        let table = repo.questions();
        let first = table.create(question("A", "Algorithms", "easy")).await.unwrap();
        let second = table.create(question("B", "Algorithms", "hard")).await.unwrap();
        table.create(question("C", "System Design", "hard")).await.unwrap();

        let (all, total) = table.find_and_count(&QuestionFilter::default()).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(all[0].title, "C");
        assert_eq!(all[2].id, first.id);

        let filter = QuestionFilter {
            category: Some("Algorithms".to_string()),
            difficulty: Some(Difficulty::Hard),
        };
        let (matched, total) = table.find_and_count(&filter).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(matched[0].id, second.id);

        let none = QuestionFilter {
            category: Some("Behavioral".to_string()),
            difficulty: None,
        };
        let (empty, total) = table.find_and_count(&none).await.unwrap();
        assert!(empty.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_update_keeps_created_at_and_bumps_updated_at() {
        let (_dir, repo) = temp_repository().await;
        let created = repo
            .questions()
            .create(question("Two Sum", "Algorithms", "easy"))
            .await
            .unwrap();

        let patch = UpdateQuestionRequest {
            title: Some("Two Sum II".to_string()),
            ..Default::default()
        };
        let updated = repo.questions().update_by_id(&created.id, &patch).await.unwrap();
        assert_eq!(updated.title, "Two Sum II");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.description, created.description);

        let missing = repo.questions().update_by_id("nope", &patch).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
