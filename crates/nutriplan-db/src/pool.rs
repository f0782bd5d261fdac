use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use tracing::{debug, info};

use crate::config::DbConfig;

/// Migrations embedded at compile time from `crates/nutriplan-db/migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Tables owned by nutriplan, in the order `db-init` reports them.
pub const TABLES: [&str; 2] = ["plans", "profiles"];

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Open a pool against `url` with at most `max_connections` connections.
pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool> {
    debug!(max_connections, "opening database pool");
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(url)
        .await
        .with_context(|| format!("failed to connect to database at {url}"))
}

/// Create the application connection pool.
pub async fn create_pool(config: &DbConfig) -> Result<PgPool> {
    connect(&config.database_url, 5).await
}

/// Apply pending embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("failed to run database migrations")?;
    info!("migrations applied");
    Ok(())
}

/// Whether `name` can be spliced into DDL unquoted.
///
/// `CREATE DATABASE` takes no bind parameters, so names are restricted to
/// ASCII letters, digits and underscores, not starting with a digit.
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Create the configured database through the `postgres` maintenance
/// database when it does not exist yet.
pub async fn ensure_database_exists(config: &DbConfig) -> Result<()> {
    let db_name = config
        .database_name()
        .context("could not determine database name from URL")?;
    if !is_plain_identifier(db_name) {
        anyhow::bail!("database name {db_name:?} must be letters, digits and underscores");
    }

    let maint_pool = connect(&config.maintenance_url(), 1).await?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(db_name)
            .fetch_one(&maint_pool)
            .await
            .context("failed to query pg_database")?;

    if exists {
        info!(db = db_name, "database already exists");
    } else {
        maint_pool
            .execute(format!("CREATE DATABASE {db_name}").as_str())
            .await
            .with_context(|| format!("failed to create database {db_name}"))?;
        info!(db = db_name, "database created");
    }

    maint_pool.close().await;
    Ok(())
}

/// Row count of each table in [`TABLES`].
pub async fn table_counts(pool: &PgPool) -> Result<Vec<(&'static str, i64)>> {
    let mut counts = Vec::with_capacity(TABLES.len());
    for table in TABLES {
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .with_context(|| format!("failed to count rows in {table}"))?;
        counts.push((table, count));
    }
    Ok(counts)
}
