//! SQLite adapter for durable keyed storage
//!
//! One `kv` table with upsert semantics; writes are last-writer-wins.
//! The stores serialize their own JSON, so values here are opaque text.

#![warn(missing_docs)]
#![warn(clippy::all)]

use async_trait::async_trait;
use lumiere_core::{KeyValueStorage, LumiereError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

fn storage_err(e: sqlx::Error) -> LumiereError {
    LumiereError::storage(e.to_string())
}

/// SQLite-backed keyed storage
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open (creating if missing) the database at the given URL and
    /// ensure the schema exists.
    pub async fn new(database_url: &str) -> Result<Self> {
        info!("Opening SQLite storage at: {}", database_url);

        let opts = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| LumiereError::storage(format!("invalid SQLite URL: {}", e)))?
            .create_if_missing(true);

        // One connection: writes are sequential last-writer-wins, and a
        // pooled `sqlite::memory:` would give every connection its own
        // database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(storage_err)?;

        let storage = Self { pool };
        storage.init_schema().await?;
        Ok(storage)
    }

    async fn init_schema(&self) -> Result<()> {
        debug!("Initializing SQLite schema");
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorage for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(row.map(|r| r.get::<String, _>("value")))
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv (key, value, updated_at)
            VALUES (?1, ?2, strftime('%s', 'now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteStorage {
        SqliteStorage::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn absent_key_reads_as_none() {
        let storage = store().await;
        assert_eq!(storage.get("rtl-mode").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_get_round_trip() {
        let storage = store().await;
        storage
            .put("selected-products", r#"[{"id":1}]"#)
            .await
            .unwrap();
        assert_eq!(
            storage.get("selected-products").await.unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );
    }

    #[tokio::test]
    async fn upsert_replaces_previous_value() {
        let storage = store().await;
        storage.put("rtl-mode", "false").await.unwrap();
        storage.put("rtl-mode", "true").await.unwrap();
        assert_eq!(storage.get("rtl-mode").await.unwrap().as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let storage = store().await;
        storage.put("conversation-history", "[]").await.unwrap();
        storage.remove("conversation-history").await.unwrap();
        storage.remove("conversation-history").await.unwrap();
        assert_eq!(storage.get("conversation-history").await.unwrap(), None);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let storage = store().await;
        storage.put("a", "1").await.unwrap();
        storage.put("b", "2").await.unwrap();
        storage.remove("a").await.unwrap();
        assert_eq!(storage.get("b").await.unwrap().as_deref(), Some("2"));
    }
}
