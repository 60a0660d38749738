//! Self-review of an answer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    blank_to_none, check_score, empty_as_none, new_id, nullable, nullable_empty_as_none,
    patch_field, patch_text, timestamp, Patch,
};
use crate::errors::AppError;

/// A self-evaluation written after answering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub answer_id: String,
    /// 1-5 when present
    pub self_evaluation: Option<i64>,
    pub improvements: Option<String>,
    pub learnings: Option<String>,
    pub ideal_answer: Option<String>,
    pub next_review_date: Option<NaiveDate>,
    pub created_at: String,
    pub updated_at: String,
}

impl Review {
    pub fn new(answer_id: &str, request: CreateReviewRequest) -> Result<Self, AppError> {
        if let Some(score) = request.self_evaluation {
            check_score("selfEvaluation", score)?;
        }
        let now = timestamp();
        Ok(Self {
            id: new_id(),
            answer_id: answer_id.to_string(),
            self_evaluation: request.self_evaluation,
            improvements: blank_to_none(request.improvements),
            learnings: blank_to_none(request.learnings),
            ideal_answer: blank_to_none(request.ideal_answer),
            next_review_date: request.next_review_date,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn apply(&mut self, patch: &UpdateReviewRequest) -> Result<(), AppError> {
        if let Some(Some(score)) = patch.self_evaluation {
            check_score("selfEvaluation", score)?;
        }
        patch_field(&mut self.self_evaluation, &patch.self_evaluation);
        patch_text(&mut self.improvements, &patch.improvements);
        patch_text(&mut self.learnings, &patch.learnings);
        patch_text(&mut self.ideal_answer, &patch.ideal_answer);
        patch_field(&mut self.next_review_date, &patch.next_review_date);
        Ok(())
    }
}

/// Request body for `POST /answers/{id}/reviews`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[serde(default)]
    pub self_evaluation: Option<i64>,
    #[serde(default)]
    pub improvements: Option<String>,
    #[serde(default)]
    pub learnings: Option<String>,
    #[serde(default)]
    pub ideal_answer: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub next_review_date: Option<NaiveDate>,
}

/// Request body for updating a review. `null` or `""` clears a field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    #[serde(default, deserialize_with = "nullable")]
    pub self_evaluation: Patch<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub improvements: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub learnings: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub ideal_answer: Patch<String>,
    #[serde(default, deserialize_with = "nullable_empty_as_none")]
    pub next_review_date: Patch<NaiveDate>,
}

/// Response for `GET /answers/{id}/reviews`.
#[derive(Debug, Serialize)]
pub struct ReviewList {
    pub reviews: Vec<Review>,
}
