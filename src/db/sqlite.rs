use crate::db::schema::SQLITE_INIT;
use crate::error::CatalogError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;

/// Connect to `database_url` (creating the file if missing) and apply the bundled schema.
pub async fn open(database_url: &str) -> Result<SqlitePool, CatalogError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let mut pool_opts = SqlitePoolOptions::new().max_connections(5);
    if database_url.contains(":memory:") {
        // Every connection to `:memory:` is its own database; pin to one that never recycles.
        pool_opts = pool_opts
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }
    let pool = pool_opts.connect_with(connect_opts).await?;

    init_schema(&pool).await?;
    info!(database_url = %database_url, "database ready");
    Ok(pool)
}

/// Initialize the schema by executing the bundled DDL.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), CatalogError> {
    // sqlx::query runs one statement at a time
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use tempfile::TempDir;

    /// Fresh database file inside its own temp dir; keep the dir alive for the test's duration.
    pub async fn temp_pool() -> (TempDir, SqlitePool) {
        let dir = TempDir::new().expect("failed to create temp dir");
        let url = format!("sqlite:{}", dir.path().join("catalog.db").display());
        let pool = open(&url).await.expect("failed to open database");
        (dir, pool)
    }
}
