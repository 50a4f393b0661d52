//! Database module - PostgreSQL connection and schema

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Create database connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Apply the schema. Idempotent.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // raw_sql: the schema holds several statements
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- Classification history (append-only)
CREATE TABLE IF NOT EXISTS phishing_data (
    id BIGSERIAL PRIMARY KEY,
    url TEXT NOT NULL,
    is_phishing BOOLEAN NOT NULL,
    probability DOUBLE PRECISION NOT NULL,
    timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_phishing_data_timestamp ON phishing_data(timestamp DESC, id DESC);
"#;
