//! Interview question model.

use serde::{Deserialize, Serialize};

use super::{
    blank_to_none, new_id, nullable, patch_field, patch_text, require_text,
    require_text_if_present, timestamp, Patch,
};
use crate::errors::AppError;
use crate::search::TextSearchable;

/// How hard a question is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// An interview question to practice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub tags: Option<Vec<String>>,
    pub source: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Question {
    /// Build a new question from a validated request.
    pub fn new(request: CreateQuestionRequest) -> Result<Self, AppError> {
        request.validate()?;
        let now = timestamp();
        Ok(Self {
            id: new_id(),
            title: request.title,
            description: request.description,
            category: request.category,
            difficulty: request.difficulty,
            tags: request.tags,
            source: blank_to_none(request.source),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Apply a partial update. Fields absent from the patch are kept.
    pub fn apply(&mut self, patch: &UpdateQuestionRequest) -> Result<(), AppError> {
        require_text_if_present("title", patch.title.as_ref())?;
        require_text_if_present("description", patch.description.as_ref())?;
        require_text_if_present("category", patch.category.as_ref())?;

        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(difficulty) = patch.difficulty {
            self.difficulty = difficulty;
        }
        patch_field(&mut self.tags, &patch.tags);
        patch_text(&mut self.source, &patch.source);
        Ok(())
    }
}

impl TextSearchable for Question {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }
}

/// Request body for creating a new question.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub source: Option<String>,
}

impl CreateQuestionRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("title", &self.title)?;
        require_text("description", &self.description)?;
        require_text("category", &self.category)
    }
}

/// Request body for updating an existing question. `null` clears `tags` or `source`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Patch<Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub source: Patch<String>,
}

/// Response for `GET /questions`.
#[derive(Debug, Serialize)]
pub struct QuestionList {
    pub questions: Vec<Question>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateQuestionRequest {
        serde_json::from_value(serde_json::json!({
            "title": "Binary Search",
            "description": "Find an element in a sorted array",
            "category": "Algorithms",
            "difficulty": "medium",
            "source": ""
        }))
        .unwrap()
    }

    #[test]
    fn test_new_assigns_server_fields() {
        let q = Question::new(request()).unwrap();
        assert!(!q.id.is_empty());
        assert_eq!(q.created_at, q.updated_at);
        assert_eq!(q.difficulty, Difficulty::Medium);
        assert_eq!(q.source, None);
        assert_eq!(q.tags, None);
    }

    #[test]
    fn test_unknown_difficulty_is_rejected() {
        let parsed: Result<CreateQuestionRequest, _> = serde_json::from_value(serde_json::json!({
            "title": "t", "description": "d", "category": "c", "difficulty": "extreme"
        }));
        assert!(parsed.is_err());
        assert_eq!(Difficulty::parse("extreme"), None);
        assert_eq!(Difficulty::parse("hard"), Some(Difficulty::Hard));
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let mut req = request();
        req.title = " ".to_string();
        assert!(matches!(Question::new(req), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_patch_keeps_unsupplied_fields() {
        let mut q = Question::new(request()).unwrap();
        let patch = UpdateQuestionRequest {
            difficulty: Some(Difficulty::Hard),
            tags: Some(Some(vec!["arrays".to_string()])),
            ..Default::default()
        };
        q.apply(&patch).unwrap();
        assert_eq!(q.title, "Binary Search");
        assert_eq!(q.difficulty, Difficulty::Hard);
        assert_eq!(q.tags, Some(vec!["arrays".to_string()]));
    }

    #[test]
    fn test_patch_rejects_blank_required_field() {
        let mut q = Question::new(request()).unwrap();
        let patch = UpdateQuestionRequest {
            category: Some(String::new()),
            ..Default::default()
        };
        assert!(q.apply(&patch).is_err());
        assert_eq!(q.category, "Algorithms");
    }

    #[test]
    fn test_null_patch_clears_tags() {
        let mut q = Question::new(request()).unwrap();
        q.tags = Some(vec!["arrays".to_string()]);

        let patch: UpdateQuestionRequest =
            serde_json::from_value(serde_json::json!({ "tags": null })).unwrap();
        q.apply(&patch).unwrap();
        assert_eq!(q.tags, None);
        assert_eq!(q.title, "Binary Search");
    }
}
