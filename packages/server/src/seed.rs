use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::{category, post, post_view, tag};
use crate::utils::slug::slugify;

/// Sample categories inserted when `database.seed_sample_data` is on.
const SAMPLE_CATEGORIES: &[(&str, &str, &str)] = &[
    (
        "Technology",
        "Posts about technology, programming, and software development",
        "#3182CE",
    ),
    (
        "Lifestyle",
        "Posts about personal development, health, and daily life",
        "#38A169",
    ),
    (
        "Travel",
        "Posts about travel experiences, destinations, and tips",
        "#DD6B20",
    ),
    (
        "Food",
        "Posts about cooking, recipes, and culinary experiences",
        "#D53F8C",
    ),
    (
        "Business",
        "Posts about entrepreneurship, marketing, and business insights",
        "#805AD5",
    ),
];

/// Sample tags inserted when `database.seed_sample_data` is on.
const SAMPLE_TAGS: &[&str] = &[
    "JavaScript",
    "React",
    "Node.js",
    "Python",
    "Machine Learning",
    "Web Development",
    "Mobile Apps",
    "Design",
    "Productivity",
    "Mindfulness",
    "Fitness",
    "Photography",
    "Writing",
    "Marketing",
    "Startups",
    "Remote Work",
    "Leadership",
    "Innovation",
];

/// Seed the starter categories and tags, skipping any that already exist.
pub async fn seed_sample_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now = chrono::Utc::now();

    let mut categories_inserted = 0u32;
    for &(name, description, color) in SAMPLE_CATEGORIES {
        let model = category::ActiveModel {
            name: Set(name.to_string()),
            slug: Set(slugify(name)),
            description: Set(Some(description.to_string())),
            color: Set(Some(color.to_string())),
            created_at: Set(now),
            ..Default::default()
        };

        let result = category::Entity::insert(model)
            .on_conflict(
                OnConflict::column(category::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => categories_inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if categories_inserted > 0 {
        info!("Seeded {} new categories", categories_inserted);
    }

    let mut tags_inserted = 0u32;
    for &name in SAMPLE_TAGS {
        let model = tag::ActiveModel {
            name: Set(name.to_string()),
            slug: Set(slugify(name)),
            created_at: Set(now),
            ..Default::default()
        };

        let result = tag::Entity::insert(model)
            .on_conflict(OnConflict::column(tag::Column::Name).do_nothing().to_owned())
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => tags_inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if tags_inserted > 0 {
        info!("Seeded {} new tags", tags_inserted);
    }

    Ok(())
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Composite index for public listings:
    // SELECT ... FROM post WHERE published ORDER BY published_at DESC
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_post_published_published_at")
        .table(post::Entity)
        .col(post::Column::Published)
        .col(post::Column::PublishedAt)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_post_published_published_at exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_post_published_published_at: {}", e);
        }
    }

    // View rows are only ever queried per post.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_post_view_post_id")
        .table(post_view::Entity)
        .col(post_view::Column::PostId)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&stmt).await {
        Ok(_) => {
            info!("Ensured index idx_post_view_post_id exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_post_view_post_id: {}", e);
        }
    }

    Ok(())
}
