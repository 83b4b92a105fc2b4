//! database (db) union structure.

use std::str::FromStr;

use axum::extract::FromRef;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::AppState;

pub const DEFAULT_URL: &str = "sqlite::memory:";
pub const DEFAULT_POOL_SIZE: u32 = 10;

/// Custom db structure to pass to Axum.
#[derive(Clone)]
pub struct Database {
    pub sqlite: SqlitePool,
}

impl Database {
    /// Init database connection pool.
    pub async fn new(url: &str, pool_size: u32) -> Result<Self, sqlx::Error> {
        // a private in-memory database only lives on its own connection.
        let pool_size = if url.contains(":memory:") { 1 } else { pool_size };

        let options =
            SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let sqlite = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .connect_with(options)
            .await?;

        tracing::info!(%url, "sqlite connected");

        Ok(Self { sqlite })
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(app_state: &AppState) -> Database {
        app_state.db.clone()
    }
}
