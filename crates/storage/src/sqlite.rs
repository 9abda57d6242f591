//! SQLite-backed dedup store.

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use feedhook_core::{Item, MatchOutcome};

use crate::error::Result;
use crate::{SeenStore, StoredEntry};

/// SQLite-based seen-entry store.
pub struct SqliteSeenStore {
    pool: SqlitePool,
}

impl SqliteSeenStore {
    /// Open (creating if missing) the database file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!(path = %path.display(), "opened entry database");
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    ///
    /// Every SQLite in-memory connection is its own database, so the pool is
    /// pinned to a single connection.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                id TEXT PRIMARY KEY,
                author TEXT NOT NULL DEFAULT '',
                title TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL,
                rules_matched TEXT NOT NULL DEFAULT '[]',
                regex_groups_json TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL,
                updated TEXT NOT NULL DEFAULT '',
                published TEXT NOT NULL DEFAULT '',
                post_url TEXT NOT NULL DEFAULT ''
            );

            CREATE INDEX IF NOT EXISTS idx_entries_created_at ON entries(created_at);
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Fetch a stored entry by id.
    pub async fn get(&self, id: &str) -> Result<Option<StoredEntry>> {
        let row = sqlx::query_as::<_, StoredEntry>(
            r#"
            SELECT id, author, title, status, rules_matched, regex_groups_json,
                   created_at, updated, published, post_url
            FROM entries WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Number of recorded entries.
    #[cfg(test)]
    pub(crate) async fn count(&self) -> Result<i64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM entries")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    /// Get the underlying connection pool.
    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl SeenStore for SqliteSeenStore {
    async fn seen(&self, id: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn record(&self, item: &Item, outcome: &MatchOutcome) -> Result<()> {
        let entry = StoredEntry::new(item, outcome);
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO entries
                (id, author, title, status, rules_matched, regex_groups_json,
                 created_at, updated, published, post_url)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.author)
        .bind(&entry.title)
        .bind(&entry.status)
        .bind(&entry.rules_matched)
        .bind(&entry.regex_groups_json)
        .bind(&entry.created_at)
        .bind(&entry.updated)
        .bind(&entry.published)
        .bind(&entry.post_url)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!(item_id = %entry.id, "entry already recorded");
        }
        Ok(())
    }
}
