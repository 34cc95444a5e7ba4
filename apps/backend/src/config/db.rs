use std::env;

use super::ConfigError;

/// Where the group store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbProfile {
    /// Postgres, URL assembled from `POSTGRES_*` / `LFG_DB*` variables
    Postgres,
    /// SQLite database file, created on first connect
    SqliteFile { path: String },
    /// Private `sqlite::memory:` database; lives as long as its single connection
    InMemory,
}

impl DbProfile {
    /// Profile named by `LFG_DB_PROFILE` (`postgres`, `sqlite-file`, `memory`).
    ///
    /// `sqlite-file` reads its path from `LFG_SQLITE_PATH`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var("LFG_DB_PROFILE").unwrap_or_else(|_| "memory".to_string());
        match raw.as_str() {
            "postgres" => Ok(DbProfile::Postgres),
            "sqlite-file" => Ok(DbProfile::SqliteFile {
                path: must_var("LFG_SQLITE_PATH")?,
            }),
            "memory" => Ok(DbProfile::InMemory),
            other => Err(ConfigError::InvalidVar {
                name: "LFG_DB_PROFILE",
                detail: format!("expected postgres | sqlite-file | memory, got '{other}'"),
            }),
        }
    }
}

/// Builds a database URL for the profile
pub fn db_url(profile: &DbProfile) -> Result<String, ConfigError> {
    match profile {
        DbProfile::Postgres => {
            let host = host();
            let port = port();
            let db_name = must_var("LFG_DB")?;
            let username = must_var("LFG_DB_USER")?;
            let password = must_var("LFG_DB_PASSWORD")?;
            Ok(format!(
                "postgresql://{username}:{password}@{host}:{port}/{db_name}"
            ))
        }
        DbProfile::SqliteFile { path } => Ok(format!("sqlite://{path}?mode=rwc")),
        DbProfile::InMemory => Ok("sqlite::memory:".to_string()),
    }
}

/// Get database host from environment (defaults to localhost)
fn host() -> String {
    env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string())
}

/// Get database port from environment (defaults to 5432)
fn port() -> String {
    env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string())
}

/// Get required environment variable or return error
fn must_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar { name })
}
