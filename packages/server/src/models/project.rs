use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::project;
use crate::error::AppError;

use super::shared::validate_name;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateProjectRequest {
    #[schema(example = "My Travel Blog")]
    pub name: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProjectResponse {
    pub id: i32,
    pub name: String,
    /// Path of the project's SQLite database on disk.
    pub file_path: String,
    pub created_at: DateTime<Utc>,
}

impl From<project::Model> for ProjectResponse {
    fn from(m: project::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            file_path: m.file_path,
            created_at: m.created_at,
        }
    }
}

pub fn validate_create_project(req: &CreateProjectRequest) -> Result<(), AppError> {
    validate_name(&req.name, "Project name")
}
