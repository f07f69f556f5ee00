// Project Domain Model

use crate::domain::error::Result;
use crate::domain::text::bounded_text;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project ID (assigned by the store, monotonic)
pub type ProjectId = i64;

pub const MAX_PROJECT_NAME_LENGTH: usize = 30;
pub const MAX_PROJECT_DESCRIPTION_LENGTH: usize = 150;

/// Project Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Validated field set for creating or editing a project.
///
/// Holding a `ProjectDraft` means both fields are trimmed and within bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    name: String,
    description: String,
}

impl ProjectDraft {
    pub fn new(name: &str, description: &str) -> Result<Self> {
        Ok(Self {
            name: bounded_text("Project name", name, MAX_PROJECT_NAME_LENGTH)?,
            description: bounded_text(
                "Project description",
                description,
                MAX_PROJECT_DESCRIPTION_LENGTH,
            )?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
