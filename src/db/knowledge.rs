//! Knowledge-note table mapping.

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::table::{decode_enum, decode_json, encode_json, Entity, Filter, RowValues};
use crate::errors::AppError;
use crate::models::{KnowledgeType, TechKnowledge, UpdateKnowledgeRequest};

#[derive(Debug, Default, Clone)]
pub struct KnowledgeFilter {
    pub tech_stack_id: Option<String>,
    pub knowledge_type: Option<KnowledgeType>,
}

impl Filter for KnowledgeFilter {
    fn push_conditions(&self, query: &mut QueryBuilder<'static, Sqlite>) {
        if let Some(tech_stack_id) = &self.tech_stack_id {
            query
                .push(" AND tech_stack_id = ")
                .push_bind(tech_stack_id.clone());
        }
        if let Some(kind) = self.knowledge_type {
            query.push(" AND knowledge_type = ").push_bind(kind.as_str());
        }
    }
}

impl Entity for TechKnowledge {
    const TABLE: &'static str = "tech_knowledge";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "tech_stack_id",
        "title",
        "knowledge_type",
        "content",
        "code_example",
        "code_language",
        "related_topics",
        "resources",
        "importance",
        "created_at",
        "updated_at",
    ];
    const ORDER_BY: &'static str = "importance DESC, created_at DESC, rowid DESC";

    type Filter = KnowledgeFilter;
    type Patch = UpdateKnowledgeRequest;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(TechKnowledge {
            id: row.try_get("id")?,
            tech_stack_id: row.try_get("tech_stack_id")?,
            title: row.try_get("title")?,
            knowledge_type: decode_enum(row, "knowledge_type", KnowledgeType::parse)?,
            content: row.try_get("content")?,
            code_example: row.try_get("code_example")?,
            code_language: row.try_get("code_language")?,
            related_topics: decode_json(row, "related_topics")?,
            resources: decode_json(row, "resources")?,
            importance: row.try_get("importance")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn bind_values(&self, row: &mut RowValues<'_>) {
        row.push_bind(self.id.clone())
            .push_bind(self.tech_stack_id.clone())
            .push_bind(self.title.clone())
            .push_bind(self.knowledge_type.as_str())
            .push_bind(self.content.clone())
            .push_bind(self.code_example.clone())
            .push_bind(self.code_language.clone())
            .push_bind(encode_json(&self.related_topics))
            .push_bind(encode_json(&self.resources))
            .push_bind(self.importance)
            .push_bind(self.created_at.clone())
            .push_bind(self.updated_at.clone());
    }

    fn apply_patch(&mut self, patch: &UpdateKnowledgeRequest) -> Result<(), AppError> {
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
    use crate::models::{CreateKnowledgeRequest, CreateTechStackRequest, TechStack};

    fn note(stack_id: &str, title: &str, kind: &str, importance: i64) -> TechKnowledge {
        let request: CreateKnowledgeRequest = serde_json::from_value(serde_json::json!({
            "title": title,
            "type": kind,
            "content": "body",
            "importance": importance,
            "resources": [{ "title": "Docs", "url": "https://example.com", "type": "article" }]
        }))
        .unwrap();
        TechKnowledge::new(stack_id, request).unwrap()
    }

    #[tokio::test]
    async fn test_ordered_by_importance_then_newest() {
        let (_dir, repo) = temp_repository().await;
        let request: CreateTechStackRequest =
            serde_json::from_value(serde_json::json!({ "name": "Rust", "category": "language" }))
                .unwrap();
        let stack = repo.tech_stacks().create(TechStack::new(request).unwrap()).await.unwrap();

        let table = repo.knowledge();
        table.create(note(&stack.id, "low", "tip", 2)).await.unwrap();
        table.create(note(&stack.id, "high-old", "concept", 5)).await.unwrap();
        table.create(note(&stack.id, "high-new", "tip", 5)).await.unwrap();

        let filter = KnowledgeFilter {
            tech_stack_id: Some(stack.id.clone()),
            knowledge_type: None,
        };
        let titles: Vec<_> = table
            .find_many(&filter)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["high-new", "high-old", "low"]);

        let tips = table
            .find_many(&KnowledgeFilter {
                tech_stack_id: Some(stack.id.clone()),
                knowledge_type: Some(KnowledgeType::Tip),
            })
            .await
            .unwrap();
        assert_eq!(tips.len(), 2);
        assert!(tips.iter().all(|n| n.knowledge_type == KnowledgeType::Tip));
        assert_eq!(tips[0].resources.as_ref().unwrap()[0].url, "https://example.com");
    }

    #[tokio::test]
    async fn test_schema_rejects_out_of_range_importance() {
        let (_dir, repo) = temp_repository().await;
        let request: CreateTechStackRequest =
            serde_json::from_value(serde_json::json!({ "name": "Go", "category": "language" }))
                .unwrap();
        let stack = repo.tech_stacks().create(TechStack::new(request).unwrap()).await.unwrap();

        let mut bad = note(&stack.id, "bad", "tip", 3);
        bad.importance = 9;
        let result = repo.knowledge().create(bad).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
