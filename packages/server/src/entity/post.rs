use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Post statuses. Flat set, any status may be assigned directly.
pub mod status {
    pub const DRAFT: &str = "DRAFT";
    pub const PUBLISHED: &str = "PUBLISHED";
    pub const SCHEDULED: &str = "SCHEDULED";
    pub const PRIVATE: &str = "PRIVATE";

    pub const ALL: &[&str] = &[DRAFT, PUBLISHED, SCHEDULED, PRIVATE];
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub content: String, // in Markdown
    pub excerpt: Option<String>,

    /// One of: DRAFT, PUBLISHED, SCHEDULED, PRIVATE.
    pub status: String,
    pub featured: bool,
    /// Derived from status on every write: `status == PUBLISHED`.
    pub published: bool,
    /// Set once, on the first transition to PUBLISHED.
    pub published_at: Option<DateTimeUtc>,
    /// Caller-supplied; persisted but never acted upon automatically.
    pub scheduled_at: Option<DateTimeUtc>,

    pub views: i32,
    pub likes: i32,

    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub keywords: Option<String>,

    pub author_id: i32,
    #[sea_orm(belongs_to, from = "author_id", to = "id")]
    pub author: HasOne<super::user::Entity>,

    pub category_id: Option<i32>,
    #[sea_orm(belongs_to, from = "category_id", to = "id")]
    pub category: HasOne<super::category::Entity>,

    #[sea_orm(has_many, via = "post_tag")]
    pub tags: HasMany<super::tag::Entity>,

    #[sea_orm(has_many)]
    pub comments: HasMany<super::comment::Entity>,

    #[sea_orm(has_many)]
    pub view_records: HasMany<super::post_view::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
