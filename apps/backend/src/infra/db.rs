use std::time::Duration;

use migration::MigrationCommand;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use thiserror::Error;
use tracing::info;

use crate::config::db::{db_url, DbProfile};
use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

fn connect_options(profile: &DbProfile, url: String) -> ConnectOptions {
    let mut options = ConnectOptions::new(url);
    options
        .sqlx_logging(false)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5));
    if matches!(profile, DbProfile::InMemory) {
        // Every pooled connection to sqlite::memory: opens its own empty database.
        options.max_connections(1).min_connections(1);
    }
    options
}

/// Connect to the profile's database.
/// This function does NOT run any migrations
pub async fn connect_db(profile: &DbProfile) -> Result<DatabaseConnection, BootstrapError> {
    let url = db_url(profile)?;
    let conn = Database::connect(connect_options(profile, url)).await?;
    Ok(conn)
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(profile: &DbProfile) -> Result<DatabaseConnection, BootstrapError> {
    let conn = connect_db(profile).await?;
    migration::migrate(&conn, MigrationCommand::Up).await?;
    let applied = migration::count_applied_migrations(&conn).await?;
    info!(profile = ?profile, applied, "group store ready");
    Ok(conn)
}
