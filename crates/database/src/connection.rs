use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Establishes a connection pool to the PostgreSQL database.
///
/// The pool is created once at start-up and shared by every request.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    if settings.host.is_empty() || settings.name.is_empty() {
        return Err(DbError::ConnectionConfigError(
            "POSTGRES_HOST and POSTGRES_DB must be set.".to_string(),
        ));
    }

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&settings.connection_url())
        .await?;

    tracing::info!(host = %settings.host, db = %settings.name, "Connected to database.");
    Ok(pool)
}

/// Applies the embedded migrations under `crates/database/migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
