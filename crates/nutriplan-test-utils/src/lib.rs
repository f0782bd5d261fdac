//! PostgreSQL fixtures for nutriplan integration tests.
//!
//! One server is shared by all tests in a test binary and every test gets a
//! freshly migrated database of its own. The server is either the one named
//! by `NUTRIPLAN_TEST_PG_URL` (a URL without database name) or a
//! testcontainers Postgres started on first use.

use sqlx::{Executor, PgPool};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

use nutriplan_db::pool;

/// Environment variable naming an external test server.
pub const TEST_PG_URL_ENV: &str = "NUTRIPLAN_TEST_PG_URL";

struct Server {
    url: String,
    _container: Option<ContainerAsync<Postgres>>,
}

static SERVER: OnceCell<Server> = OnceCell::const_new();

async fn start_server() -> Server {
    if let Ok(url) = std::env::var(TEST_PG_URL_ENV) {
        return Server {
            url: url.trim_end_matches('/').to_string(),
            _container: None,
        };
    }

    let container = Postgres::default()
        .with_tag("16-alpine")
        .start()
        .await
        .expect("failed to start PostgreSQL container");
    let host = container.get_host().await.expect("container host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("container port");

    Server {
        url: format!("postgresql://postgres:postgres@{host}:{port}"),
        _container: Some(container),
    }
}

async fn server_url() -> &'static str {
    &SERVER.get_or_init(start_server).await.url
}

async fn maintenance_pool() -> PgPool {
    pool::connect(&format!("{}/postgres", server_url().await), 1)
        .await
        .expect("maintenance database reachable")
}

/// Create and migrate a throwaway database.
///
/// Returns the pool and the database name to hand to [`drop_test_db`].
pub async fn create_test_db() -> (PgPool, String) {
    let db_name = format!("nutriplan_test_{}", Uuid::new_v4().simple());

    let maint = maintenance_pool().await;
    maint
        .execute(format!("CREATE DATABASE {db_name}").as_str())
        .await
        .unwrap_or_else(|e| panic!("CREATE DATABASE {db_name}: {e}"));
    maint.close().await;

    let db = pool::connect(&format!("{}/{db_name}", server_url().await), 5)
        .await
        .unwrap_or_else(|e| panic!("connect to {db_name}: {e:#}"));
    pool::run_migrations(&db)
        .await
        .unwrap_or_else(|e| panic!("migrate {db_name}: {e:#}"));

    (db, db_name)
}

/// Drop a database made by [`create_test_db`], kicking any leftover sessions.
pub async fn drop_test_db(db_name: &str) {
    let maint = maintenance_pool().await;
    let _ = sqlx::query(
        "SELECT pg_terminate_backend(pid) FROM pg_stat_activity \
         WHERE datname = $1 AND pid <> pg_backend_pid()",
    )
    .bind(db_name)
    .execute(&maint)
    .await;
    let _ = maint
        .execute(format!("DROP DATABASE IF EXISTS {db_name}").as_str())
        .await;
    maint.close().await;
}
