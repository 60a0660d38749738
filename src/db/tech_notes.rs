//! Tech-note table mapping.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::table::{Entity, RowValues};
use crate::errors::AppError;
use crate::models::{TechNote, UpdateTechNoteRequest};

impl Entity for TechNote {
    const TABLE: &'static str = "tech_notes";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "technology",
        "reason_for_choice",
        "alternatives",
        "learnings",
        "improvements",
        "github_repo_url",
        "github_repo_name",
        "created_at",
        "updated_at",
    ];
    const ORDER_BY: &'static str = "created_at DESC, rowid DESC";

    type Filter = ();
    type Patch = UpdateTechNoteRequest;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(TechNote {
            id: row.try_get("id")?,
            technology: row.try_get("technology")?,
            reason_for_choice: row.try_get("reason_for_choice")?,
            alternatives: row.try_get("alternatives")?,
            learnings: row.try_get("learnings")?,
            improvements: row.try_get("improvements")?,
            github_repo_url: row.try_get("github_repo_url")?,
            github_repo_name: row.try_get("github_repo_name")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn bind_values(&self, row: &mut RowValues<'_>) {
        row.push_bind(self.id.clone())
            .push_bind(self.technology.clone())
            .push_bind(self.reason_for_choice.clone())
            .push_bind(self.alternatives.clone())
            .push_bind(self.learnings.clone())
            .push_bind(self.improvements.clone())
            .push_bind(self.github_repo_url.clone())
            .push_bind(self.github_repo_name.clone())
            .push_bind(self.created_at.clone())
            .push_bind(self.updated_at.clone());
    }

    fn apply_patch(&mut self, patch: &UpdateTechNoteRequest) -> Result<(), AppError> {
        self.apply(patch)
    }

    fn touch(&mut self, now: String) {
        self.updated_at = now;
    }
}
