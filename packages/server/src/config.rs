use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Insert the sample categories/tags on startup.
    pub seed_sample_data: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Token validity in minutes. No refresh flow; tokens simply expire.
    pub token_ttl_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProjectsConfig {
    /// Directory under which per-project SQLite databases are provisioned.
    pub root: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub projects: ProjectsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.seed_sample_data", false)?
            .set_default("auth.token_ttl_minutes", 60)?
            .set_default("projects.root", "./user_projects")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., QUILL__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("QUILL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
