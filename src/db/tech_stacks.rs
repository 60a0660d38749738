//! Tech-stack table mapping and aggregate statistics.

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::knowledge::KnowledgeFilter;
use super::table::{decode_enum, decode_json, encode_json, Entity, Filter, RowValues, Table};
use crate::errors::AppError;
use crate::models::{
    ProficiencyLevel, TechKnowledge, TechStack, TechStackDetail, TechStackStats, TopTech,
    UpdateTechStackRequest,
};

/// How many stacks the stats endpoint ranks.
const TOP_TECHS_LIMIT: i64 = 5;

#[derive(Debug, Default, Clone)]
pub struct TechStackFilter {
    pub category: Option<String>,
    pub proficiency_level: Option<ProficiencyLevel>,
}

impl Filter for TechStackFilter {
    fn push_conditions(&self, query: &mut QueryBuilder<'static, Sqlite>) {
        if let Some(category) = &self.category {
            query.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(level) = self.proficiency_level {
            query
                .push(" AND proficiency_level = ")
                .push_bind(level.as_str());
        }
    }
}

impl Entity for TechStack {
    const TABLE: &'static str = "tech_stacks";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "category",
        "subcategory",
        "version",
        "tags",
        "proficiency_level",
        "experience_months",
        "official_website",
        "documentation_url",
        "github_url",
        "description",
        "usage_context",
        "reason_for_choice",
        "alternatives",
        "created_at",
        "updated_at",
    ];
    const ORDER_BY: &'static str = "updated_at DESC, rowid DESC";

    type Filter = TechStackFilter;
    type Patch = UpdateTechStackRequest;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(TechStack {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            subcategory: row.try_get("subcategory")?,
            version: row.try_get("version")?,
            tags: decode_json(row, "tags")?,
            proficiency_level: decode_enum(row, "proficiency_level", ProficiencyLevel::parse)?,
            experience_months: row.try_get("experience_months")?,
            official_website: row.try_get("official_website")?,
            documentation_url: row.try_get("documentation_url")?,
            github_url: row.try_get("github_url")?,
            description: row.try_get("description")?,
            usage_context: row.try_get("usage_context")?,
            reason_for_choice: row.try_get("reason_for_choice")?,
            alternatives: row.try_get("alternatives")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn bind_values(&self, row: &mut RowValues<'_>) {
        row.push_bind(self.id.clone())
            .push_bind(self.name.clone())
            .push_bind(self.category.clone())
            .push_bind(self.subcategory.clone())
            .push_bind(self.version.clone())
            .push_bind(encode_json(&self.tags))
            .push_bind(self.proficiency_level.as_str())
            .push_bind(self.experience_months)
            .push_bind(self.official_website.clone())
            .push_bind(self.documentation_url.clone())
            .push_bind(self.github_url.clone())
            .push_bind(self.description.clone())
            .push_bind(self.usage_context.clone())
            .push_bind(self.reason_for_choice.clone())
            .push_bind(self.alternatives.clone())
            .push_bind(self.created_at.clone())
            .push_bind(self.updated_at.clone());
    }

    fn apply_patch(&mut self, patch: &UpdateTechStackRequest) -> Result<(), AppError> {
        self.apply(patch)
    }

    fn touch(&mut self, now: String) {
        self.updated_at = now;
    }
}

impl Table<'_, TechStack> {
    /// A stack with all of its knowledge notes, failing with `NotFound`.
    pub async fn get_detail(&self, id: &str) -> Result<TechStackDetail, AppError> {
        let tech_stack = self.get(id).await?;
        let knowledge_notes = Table::<TechKnowledge>::new(self.pool)
            .find_many(&KnowledgeFilter {
                tech_stack_id: Some(id.to_string()),
                knowledge_type: None,
            })
            .await?;
        Ok(TechStackDetail {
            tech_stack,
            knowledge_notes,
        })
    }

    /// Counts by category and proficiency plus the most-documented stacks.
    pub async fn stats(&self) -> Result<TechStackStats, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tech_stacks")
            .fetch_one(self.pool)
            .await?;

        let by_category: Vec<(String, i64)> =
            sqlx::query_as("SELECT category, COUNT(*) FROM tech_stacks GROUP BY category")
                .fetch_all(self.pool)
                .await?;

        let by_proficiency: Vec<(String, i64)> = sqlx::query_as(
            "SELECT proficiency_level, COUNT(*) FROM tech_stacks GROUP BY proficiency_level",
        )
        .fetch_all(self.pool)
        .await?;

        let total_knowledge: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tech_knowledge")
            .fetch_one(self.pool)
            .await?;

        let rows = sqlx::query(
            r#"
            SELECT s.id, s.name, s.category, s.proficiency_level, COUNT(k.id) AS knowledge_count
            FROM tech_stacks s
            LEFT JOIN tech_knowledge k ON k.tech_stack_id = s.id
            GROUP BY s.id
            HAVING COUNT(k.id) > 0
            ORDER BY knowledge_count DESC, s.name ASC
            LIMIT ?
            "#,
        )
        .bind(TOP_TECHS_LIMIT)
        .fetch_all(self.pool)
        .await?;

        let top_techs = rows
            .iter()
            .map(|row| {
                Ok(TopTech {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    category: row.try_get("category")?,
                    proficiency_level: decode_enum(
                        row,
                        "proficiency_level",
                        ProficiencyLevel::parse,
                    )?,
                    knowledge_count: row.try_get("knowledge_count")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(TechStackStats {
            total,
            by_category: by_category.into_iter().collect(),
            by_proficiency: by_proficiency.into_iter().collect(),
            total_knowledge,
            top_techs,
        })
    }
}
