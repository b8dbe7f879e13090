use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::comment;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCommentRequest {
    pub content: String,
    #[schema(example = "Bob")]
    pub author_name: String,
    #[schema(example = "bob@example.com")]
    pub author_email: String,
    pub author_website: Option<String>,
    /// ID of the parent comment for threaded replies.
    pub parent_id: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CommentResponse {
    pub id: i32,
    pub content: String,
    pub author_name: String,
    pub author_website: Option<String>,
    pub approved: bool,
    pub post_id: i32,
    pub parent_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CommentListResponse {
    pub comments: Vec<CommentResponse>,
}

impl From<comment::Model> for CommentResponse {
    fn from(m: comment::Model) -> Self {
        Self {
            id: m.id,
            content: m.content,
            author_name: m.author_name,
            author_website: m.author_website,
            approved: m.approved,
            post_id: m.post_id,
            parent_id: m.parent_id,
            created_at: m.created_at,
        }
    }
}

pub fn validate_create_comment(req: &CreateCommentRequest) -> Result<(), AppError> {
    if req.content.trim().is_empty() || req.content.chars().count() > 10_000 {
        return Err(AppError::Validation(
            "Comment must be 1-10000 characters".into(),
        ));
    }
    if req.author_name.trim().is_empty() || req.author_name.chars().count() > 64 {
        return Err(AppError::Validation(
            "Author name must be 1-64 characters".into(),
        ));
    }
    let email = req.author_email.trim();
    if email.is_empty() || !email.contains('@') || email.chars().count() > 254 {
        return Err(AppError::Validation(
            "A valid author email is required".into(),
        ));
    }
    Ok(())
}
