use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Connect to the main PostgreSQL database and sync the application schema.
pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("server::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

/// Create (if needed) and connect a per-project SQLite site database,
/// syncing the site schema into it.
pub async fn init_site_db(db_path: &str) -> Result<DatabaseConnection, DbErr> {
    let url = format!("sqlite://{db_path}?mode=rwc");
    let db = Database::connect(ConnectOptions::new(url)).await?;
    db.get_schema_registry("server::site::*").sync(&db).await?;

    Ok(db)
}
