//! Key-value repository over the `kv_store` table.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::ClientError;

/// Durable string storage keyed by name.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Read the value stored under `key`.
    pub async fn get_item(&self, key: &str) -> Result<Option<String>, ClientError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get("value")))
    }

    /// Store `value` under `key`, replacing any previous value.
    pub async fn set_item(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete the value under `key`. Deleting a missing key is not an error.
    pub async fn remove_item(&self, key: &str) -> Result<(), ClientError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_set_get_remove() {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("kv.sqlite"))
            .await
            .unwrap();
        let repo = Repository::new(pool);

        assert_eq!(repo.get_item("user").await.unwrap(), None);

        repo.set_item("user", "first").await.unwrap();
        repo.set_item("user", "second").await.unwrap();
        assert_eq!(
            repo.get_item("user").await.unwrap().as_deref(),
            Some("second")
        );

        repo.remove_item("user").await.unwrap();
        repo.remove_item("user").await.unwrap();
        assert_eq!(repo.get_item("user").await.unwrap(), None);
    }
}
