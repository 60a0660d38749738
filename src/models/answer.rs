//! Answer model: one attempt at a question.

use serde::{Deserialize, Serialize};

use super::{
    blank_to_none, new_id, nullable, patch_text, require_text, require_text_if_present, timestamp,
    Patch, Review,
};
use crate::errors::AppError;

/// Whether an answer is still being worked on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStatus {
    #[default]
    Draft,
    Completed,
}

impl AnswerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerStatus::Draft => "draft",
            AnswerStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(AnswerStatus::Draft),
            "completed" => Some(AnswerStatus::Completed),
            _ => None,
        }
    }
}

/// A recorded attempt at answering a question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: String,
    pub question_id: String,
    pub content: String,
    pub code_snippet: Option<String>,
    pub language: Option<String>,
    pub key_points: Option<String>,
    /// 1-based, assigned by the server per question
    pub attempt_number: i64,
    pub status: AnswerStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Answer {
    /// Build the next attempt for `question_id`.
    pub fn new(
        question_id: &str,
        attempt_number: i64,
        request: CreateAnswerRequest,
    ) -> Result<Self, AppError> {
        require_text("content", &request.content)?;
        let now = timestamp();
        Ok(Self {
            id: new_id(),
            question_id: question_id.to_string(),
            content: request.content,
            code_snippet: blank_to_none(request.code_snippet),
            language: blank_to_none(request.language),
            key_points: blank_to_none(request.key_points),
            attempt_number: attempt_number.max(1),
            status: request.status.unwrap_or_default(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Apply a partial update; the attempt number and owning question never change.
    pub fn apply(&mut self, patch: &UpdateAnswerRequest) -> Result<(), AppError> {
        require_text_if_present("content", patch.content.as_ref())?;

        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        patch_text(&mut self.code_snippet, &patch.code_snippet);
        patch_text(&mut self.language, &patch.language);
        patch_text(&mut self.key_points, &patch.key_points);
        if let Some(status) = patch.status {
            self.status = status;
        }
        Ok(())
    }
}

/// An answer together with its reviews, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerWithReviews {
    #[serde(flatten)]
    pub answer: Answer,
    pub reviews: Vec<Review>,
}

/// Request body for `POST /questions/{id}/answers`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnswerRequest {
    pub content: String,
    #[serde(default)]
    pub code_snippet: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub key_points: Option<String>,
    #[serde(default)]
    pub status: Option<AnswerStatus>,
}

/// Request body for updating an answer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnswerRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub code_snippet: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub language: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub key_points: Patch<String>,
    #[serde(default)]
    pub status: Option<AnswerStatus>,
}

/// Response for `GET /questions/{id}/answers`.
#[derive(Debug, Serialize)]
pub struct AnswerList {
    pub answers: Vec<AnswerWithReviews>,
}
