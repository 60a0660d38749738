//! Technology-stack entry for the portfolio.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    blank_to_none, check_non_negative, new_id, nullable, patch_field, patch_text, require_text,
    require_text_if_present, timestamp, Patch, TechKnowledge,
};
use crate::errors::AppError;
use crate::search::TextSearchable;

/// Self-assessed skill level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProficiencyLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ProficiencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProficiencyLevel::Beginner => "beginner",
            ProficiencyLevel::Intermediate => "intermediate",
            ProficiencyLevel::Advanced => "advanced",
            ProficiencyLevel::Expert => "expert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(ProficiencyLevel::Beginner),
            "intermediate" => Some(ProficiencyLevel::Intermediate),
            "advanced" => Some(ProficiencyLevel::Advanced),
            "expert" => Some(ProficiencyLevel::Expert),
            _ => None,
        }
    }
}

/// A technology the user has worked with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TechStack {
    pub id: String,
    pub name: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub version: Option<String>,
    pub tags: Option<Vec<String>>,
    pub proficiency_level: ProficiencyLevel,
    pub experience_months: i64,
    pub official_website: Option<String>,
    pub documentation_url: Option<String>,
    pub github_url: Option<String>,
    pub description: Option<String>,
    pub usage_context: Option<String>,
    pub reason_for_choice: Option<String>,
    pub alternatives: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TechStack {
    pub fn new(request: CreateTechStackRequest) -> Result<Self, AppError> {
        require_text("name", &request.name)?;
        require_text("category", &request.category)?;
        check_non_negative("experienceMonths", request.experience_months)?;

        let now = timestamp();
        Ok(Self {
            id: new_id(),
            name: request.name,
            category: request.category,
            subcategory: blank_to_none(request.subcategory),
            version: blank_to_none(request.version),
            tags: request.tags,
            proficiency_level: request.proficiency_level,
            experience_months: request.experience_months,
            official_website: blank_to_none(request.official_website),
            documentation_url: blank_to_none(request.documentation_url),
            github_url: blank_to_none(request.github_url),
            description: blank_to_none(request.description),
            usage_context: blank_to_none(request.usage_context),
            reason_for_choice: blank_to_none(request.reason_for_choice),
            alternatives: blank_to_none(request.alternatives),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn apply(&mut self, patch: &UpdateTechStackRequest) -> Result<(), AppError> {
        require_text_if_present("name", patch.name.as_ref())?;
        require_text_if_present("category", patch.category.as_ref())?;
        if let Some(months) = patch.experience_months {
            check_non_negative("experienceMonths", months)?;
            self.experience_months = months;
        }

        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(level) = patch.proficiency_level {
            self.proficiency_level = level;
        }
        patch_field(&mut self.tags, &patch.tags);

        let optional_text = [
            (&mut self.subcategory, &patch.subcategory),
            (&mut self.version, &patch.version),
            (&mut self.official_website, &patch.official_website),
            (&mut self.documentation_url, &patch.documentation_url),
            (&mut self.github_url, &patch.github_url),
            (&mut self.description, &patch.description),
            (&mut self.usage_context, &patch.usage_context),
            (&mut self.reason_for_choice, &patch.reason_for_choice),
            (&mut self.alternatives, &patch.alternatives),
        ];
        for (field, value) in optional_text {
            patch_text(field, value);
        }
        Ok(())
    }
}

impl TextSearchable for TechStack {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(description) = &self.description {
            fields.push(description);
        }
        if let Some(tags) = &self.tags {
            fields.extend(tags.iter().map(String::as_str));
        }
        fields
    }
}

/// A tech stack with its knowledge notes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechStackDetail {
    #[serde(flatten)]
    pub tech_stack: TechStack,
    pub knowledge_notes: Vec<TechKnowledge>,
}

/// Request body for creating a new tech stack.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTechStackRequest {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub proficiency_level: ProficiencyLevel,
    #[serde(default)]
    pub experience_months: i64,
    #[serde(default)]
    pub official_website: Option<String>,
    #[serde(default)]
    pub documentation_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub usage_context: Option<String>,
    #[serde(default)]
    pub reason_for_choice: Option<String>,
    #[serde(default)]
    pub alternatives: Option<String>,
}

/// Request body for updating a tech stack.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTechStackRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub subcategory: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub version: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Patch<Vec<String>>,
    #[serde(default)]
    pub proficiency_level: Option<ProficiencyLevel>,
    #[serde(default)]
    pub experience_months: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub official_website: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub documentation_url: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub github_url: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub usage_context: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub reason_for_choice: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub alternatives: Patch<String>,
}

/// Response for `GET /tech-stack`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechStackList {
    pub tech_stacks: Vec<TechStack>,
    pub total: usize,
}

/// A stack ranked by how many knowledge notes it has.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopTech {
    pub id: String,
    pub name: String,
    pub category: String,
    pub proficiency_level: ProficiencyLevel,
    pub knowledge_count: i64,
}

/// Aggregates for `GET /tech-stack/stats`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TechStackStats {
    pub total: i64,
    pub by_category: BTreeMap<String, i64>,
    pub by_proficiency: BTreeMap<String, i64>,
    pub total_knowledge: i64,
    pub top_techs: Vec<TopTech>,
}
