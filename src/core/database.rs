//! Postgres connection pool and the region hierarchy schema.
//!
//! The four region tables live here. Each child table references its parent
//! with `ON DELETE CASCADE`, so deleting a province removes its regencies and,
//! transitively, their districts and villages.

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::core::config::DatabaseConfig;

/// Table definitions in dependency order (parents before children).
pub const SCHEMA: [&str; 7] = [
    r#"CREATE TABLE IF NOT EXISTS provinces (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name VARCHAR(200) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS regencies (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name VARCHAR(200) NOT NULL,
        province_id UUID NOT NULL REFERENCES provinces(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_regencies_province_id ON regencies(province_id)",
    r#"CREATE TABLE IF NOT EXISTS districts (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name VARCHAR(200) NOT NULL,
        regency_id UUID NOT NULL REFERENCES regencies(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_districts_regency_id ON districts(regency_id)",
    r#"CREATE TABLE IF NOT EXISTS villages (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        name VARCHAR(200) NOT NULL,
        district_id UUID NOT NULL REFERENCES districts(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_villages_district_id ON villages(district_id)",
];

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect(&config.url)
        .await
}

/// Create the region tables if they don't exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!("Region schema verified");
    Ok(())
}
