//! Review table mapping.

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::table::{Entity, Filter, RowValues};
use crate::errors::AppError;
use crate::models::{Review, UpdateReviewRequest};

/// Reviews of one answer, or of every answer to one question.
#[derive(Debug, Default, Clone)]
pub struct ReviewFilter {
    pub answer_id: Option<String>,
    pub question_id: Option<String>,
}

impl Filter for ReviewFilter {
    fn push_conditions(&self, query: &mut QueryBuilder<'static, Sqlite>) {
        if let Some(answer_id) = &self.answer_id {
            query.push(" AND answer_id = ").push_bind(answer_id.clone());
        }
        if let Some(question_id) = &self.question_id {
            query
                .push(" AND answer_id IN (SELECT id FROM answers WHERE question_id = ")
                .push_bind(question_id.clone())
                .push(")");
        }
    }
}

impl Entity for Review {
    const TABLE: &'static str = "reviews";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "answer_id",
        "self_evaluation",
        "improvements",
        "learnings",
        "ideal_answer",
        "next_review_date",
        "created_at",
        "updated_at",
    ];
    const ORDER_BY: &'static str = "created_at DESC, rowid DESC";

    type Filter = ReviewFilter;
    type Patch = UpdateReviewRequest;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Review {
            id: row.try_get("id")?,
            answer_id: row.try_get("answer_id")?,
            self_evaluation: row.try_get("self_evaluation")?,
            improvements: row.try_get("improvements")?,
            learnings: row.try_get("learnings")?,
            ideal_answer: row.try_get("ideal_answer")?,
            next_review_date: row.try_get("next_review_date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn bind_values(&self, row: &mut RowValues<'_>) {
        row.push_bind(self.id.clone())
            .push_bind(self.answer_id.clone())
            .push_bind(self.self_evaluation)
            .push_bind(self.improvements.clone())
            .push_bind(self.learnings.clone())
            .push_bind(self.ideal_answer.clone())
            .push_bind(self.next_review_date)
            .push_bind(self.created_at.clone())
            .push_bind(self.updated_at.clone());
    }

    fn apply_patch(&mut self, patch: &UpdateReviewRequest) -> Result<(), AppError> {
        self.apply(patch)
    }

    fn touch(&mut self, now: String) {
        self.updated_at = now;
    }
}
