//! Knowledge notes attached to a tech stack.

use serde::{Deserialize, Serialize};

use super::{
    blank_to_none, check_score, new_id, nullable, patch_field, patch_text, require_text,
    require_text_if_present, timestamp, Patch,
};
use crate::errors::AppError;

/// Importance assigned when the client omits one.
pub const DEFAULT_IMPORTANCE: i64 = 3;

/// Kind of knowledge note.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum KnowledgeType {
    Concept,
    BestPractice,
    AntiPattern,
    Troubleshooting,
    Tip,
    Example,
}

impl KnowledgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KnowledgeType::Concept => "concept",
            KnowledgeType::BestPractice => "best-practice",
            KnowledgeType::AntiPattern => "anti-pattern",
            KnowledgeType::Troubleshooting => "troubleshooting",
            KnowledgeType::Tip => "tip",
            KnowledgeType::Example => "example",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "concept" => Some(KnowledgeType::Concept),
            "best-practice" => Some(KnowledgeType::BestPractice),
            "anti-pattern" => Some(KnowledgeType::AntiPattern),
            "troubleshooting" => Some(KnowledgeType::Troubleshooting),
            "tip" => Some(KnowledgeType::Tip),
            "example" => Some(KnowledgeType::Example),
            _ => None,
        }
    }
}

/// Kind of external reference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Article,
    Video,
    Doc,
}

/// An external reference for a knowledge note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
}

/// A note about one aspect of a technology.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TechKnowledge {
    pub id: String,
    pub tech_stack_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub knowledge_type: KnowledgeType,
    /// Markdown
    pub content: String,
    pub code_example: Option<String>,
    pub code_language: Option<String>,
    pub related_topics: Option<Vec<String>>,
    pub resources: Option<Vec<Resource>>,
    /// 1-5
    pub importance: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl TechKnowledge {
    pub fn new(tech_stack_id: &str, request: CreateKnowledgeRequest) -> Result<Self, AppError> {
        require_text("title", &request.title)?;
        require_text("content", &request.content)?;
        check_score("importance", request.importance)?;
        validate_resources(request.resources.as_deref())?;

        let now = timestamp();
        Ok(Self {
            id: new_id(),
            tech_stack_id: tech_stack_id.to_string(),
            title: request.title,
            knowledge_type: request.knowledge_type,
            content: request.content,
            code_example: blank_to_none(request.code_example),
            code_language: blank_to_none(request.code_language),
            related_topics: request.related_topics,
            resources: request.resources,
            importance: request.importance,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn apply(&mut self, patch: &UpdateKnowledgeRequest) -> Result<(), AppError> {
        require_text_if_present("title", patch.title.as_ref())?;
        require_text_if_present("content", patch.content.as_ref())?;
        if let Some(importance) = patch.importance {
            check_score("importance", importance)?;
        }
        validate_resources(patch.resources.as_ref().and_then(Option::as_deref))?;

        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(kind) = patch.knowledge_type {
            self.knowledge_type = kind;
        }
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        patch_text(&mut self.code_example, &patch.code_example);
        patch_text(&mut self.code_language, &patch.code_language);
        patch_field(&mut self.related_topics, &patch.related_topics);
        patch_field(&mut self.resources, &patch.resources);
        if let Some(importance) = patch.importance {
            self.importance = importance;
        }
        Ok(())
    }
}

fn validate_resources(resources: Option<&[Resource]>) -> Result<(), AppError> {
    for resource in resources.unwrap_or_default() {
        require_text("resource title", &resource.title)?;
        require_text("resource url", &resource.url)?;
    }
    Ok(())
}

fn default_importance() -> i64 {
    DEFAULT_IMPORTANCE
}

/// Request body for `POST /tech-stack/{id}/knowledge`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKnowledgeRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub knowledge_type: KnowledgeType,
    pub content: String,
    #[serde(default)]
    pub code_example: Option<String>,
    #[serde(default)]
    pub code_language: Option<String>,
    #[serde(default)]
    pub related_topics: Option<Vec<String>>,
    #[serde(default)]
    pub resources: Option<Vec<Resource>>,
    #[serde(default = "default_importance")]
    pub importance: i64,
}

/// Request body for updating a knowledge note.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateKnowledgeRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub knowledge_type: Option<KnowledgeType>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub code_example: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub code_language: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub related_topics: Patch<Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub resources: Patch<Vec<Resource>>,
    #[serde(default)]
    pub importance: Option<i64>,
}

/// Response for `GET /tech-stack/{id}/knowledge`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeList {
    pub knowledge_notes: Vec<TechKnowledge>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> CreateKnowledgeRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_importance_defaults_to_three() {
        let note = TechKnowledge::new(
            "ts-1",
            request(serde_json::json!({
                "title": "Server Components",
                "type": "concept",
                "content": "Rendered on the server"
            })),
        )
        .unwrap();
        assert_eq!(note.importance, 3);
        assert_eq!(note.knowledge_type, KnowledgeType::Concept);
    }

    #[test]
    fn test_kebab_case_types_and_resources() {
        let note = TechKnowledge::new(
            "ts-1",
            request(serde_json::json!({
                "title": "Avoid prop drilling",
                "type": "anti-pattern",
                "content": "Use context",
                "importance": 5,
                "relatedTopics": ["context", "state"],
                "resources": [{ "title": "Docs", "url": "https://react.dev", "type": "doc" }]
            })),
        )
        .unwrap();

        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["type"], "anti-pattern");
        assert_eq!(value["resources"][0]["type"], "doc");
        assert_eq!(value["relatedTopics"][1], "state");
        assert_eq!(value["techStackId"], "ts-1");
    }

    #[test]
    fn test_out_of_range_importance_is_rejected() {
        for importance in [0, 6] {
            let result = TechKnowledge::new(
                "ts-1",
                request(serde_json::json!({
                    "title": "t", "type": "tip", "content": "c", "importance": importance
                })),
            );
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let parsed: Result<CreateKnowledgeRequest, _> = serde_json::from_value(
            serde_json::json!({ "title": "t", "type": "rumor", "content": "c" }),
        );
        assert!(parsed.is_err());
        assert_eq!(KnowledgeType::parse("best-practice"), Some(KnowledgeType::BestPractice));
    }

    #[test]
    fn test_patch_validates_before_mutating() {
        let mut note = TechKnowledge::new(
            "ts-1",
            request(serde_json::json!({ "title": "t", "type": "tip", "content": "c" })),
        )
        .unwrap();
        let patch = UpdateKnowledgeRequest {
            title: Some("renamed".to_string()),
            importance: Some(10),
            ..Default::default()
        };
        assert!(note.apply(&patch).is_err());
        assert_eq!(note.title, "t");
        assert_eq!(note.importance, 3);
    }

    #[test]
    fn test_null_patch_clears_topics_and_resources() {
        let mut note = TechKnowledge::new(
            "ts-1",
            request(serde_json::json!({
                "title": "Ownership",
                "type": "concept",
                "content": "Each value has one owner",
                "relatedTopics": ["borrowing"],
                "resources": [{ "title": "Book", "url": "https://doc.rust-lang.org/book/", "type": "doc" }]
            })),
        )
        .unwrap();

        let patch: UpdateKnowledgeRequest = serde_json::from_value(
            serde_json::json!({ "relatedTopics": null, "resources": null }),
        )
        .unwrap();
        note.apply(&patch).unwrap();
        assert_eq!(note.related_topics, None);
        assert_eq!(note.resources, None);
        assert_eq!(note.title, "Ownership");
    }
}
