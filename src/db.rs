//! Database module
//!
//! Pool construction and schema verification.
//! Schema files live in `migrations/<service>/` and are applied out of band.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Open the connection pool described by the configuration
pub async fn connect(config: &Config) -> AppResult<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .ok_or(crate::config::ConfigError::MissingEnv("DATABASE_URL"))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(url)
        .await
        .map_err(AppError::Database)?;

    verify_connection(&pool).await?;
    Ok(pool)
}

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool, required_tables: &[&str]) -> Result<bool, sqlx::Error> {
    for table in required_tables {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(*table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    Ok(true)
}
