//! Free-form technology decision notes.

use serde::{Deserialize, Serialize};

use super::{
    blank_to_none, new_id, nullable, patch_text, require_text, require_text_if_present, timestamp,
    Patch,
};
use crate::errors::AppError;
use crate::search::TextSearchable;

/// Why a technology was chosen for a project and what was learned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TechNote {
    pub id: String,
    pub technology: String,
    pub reason_for_choice: String,
    pub alternatives: Option<String>,
    pub learnings: Option<String>,
    pub improvements: Option<String>,
    pub github_repo_url: Option<String>,
    pub github_repo_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TechNote {
    pub fn new(request: CreateTechNoteRequest) -> Result<Self, AppError> {
        require_text("technology", &request.technology)?;
        require_text("reasonForChoice", &request.reason_for_choice)?;
        let now = timestamp();
        Ok(Self {
            id: new_id(),
            technology: request.technology,
            reason_for_choice: request.reason_for_choice,
            alternatives: blank_to_none(request.alternatives),
            learnings: blank_to_none(request.learnings),
            improvements: blank_to_none(request.improvements),
            github_repo_url: blank_to_none(request.github_repo_url),
            github_repo_name: blank_to_none(request.github_repo_name),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn apply(&mut self, patch: &UpdateTechNoteRequest) -> Result<(), AppError> {
        require_text_if_present("technology", patch.technology.as_ref())?;
        require_text_if_present("reasonForChoice", patch.reason_for_choice.as_ref())?;

        if let Some(technology) = &patch.technology {
            self.technology = technology.clone();
        }
        if let Some(reason) = &patch.reason_for_choice {
            self.reason_for_choice = reason.clone();
        }
        let optional_text = [
            (&mut self.alternatives, &patch.alternatives),
            (&mut self.learnings, &patch.learnings),
            (&mut self.improvements, &patch.improvements),
            (&mut self.github_repo_url, &patch.github_repo_url),
            (&mut self.github_repo_name, &patch.github_repo_name),
        ];
        for (field, value) in optional_text {
            patch_text(field, value);
        }
        Ok(())
    }
}

impl TextSearchable for TechNote {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.technology.as_str(), self.reason_for_choice.as_str()]
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTechNoteRequest {
    pub technology: String,
    pub reason_for_choice: String,
    #[serde(default)]
    pub alternatives: Option<String>,
    #[serde(default)]
    pub learnings: Option<String>,
    #[serde(default)]
    pub improvements: Option<String>,
    #[serde(default)]
    pub github_repo_url: Option<String>,
    #[serde(default)]
    pub github_repo_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTechNoteRequest {
    #[serde(default)]
    pub technology: Option<String>,
    #[serde(default)]
    pub reason_for_choice: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub alternatives: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub learnings: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub improvements: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub github_repo_url: Patch<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub github_repo_name: Patch<String>,
}

/// Response for `GET /tech-notes`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechNoteList {
    pub tech_notes: Vec<TechNote>,
    pub total: usize,
}
