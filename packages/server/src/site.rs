//! Schema for per-project site databases.
//!
//! Each project created through `/api/projects` gets its own SQLite file;
//! this module describes the (deliberately minimal) schema that is synced
//! into it. It is registered under `server::site::*` so that it never leaks
//! into the main application schema.

pub mod post {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[sea_orm::model]
    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "post")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,

        pub title: String,
        #[sea_orm(unique)]
        pub slug: String,
        pub content: Option<String>,
        pub published: bool,

        pub created_at: DateTimeUtc,
    }

    impl ActiveModelBehavior for ActiveModel {}
}
