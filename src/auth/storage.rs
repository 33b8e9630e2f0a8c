// src/auth/storage.rs

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use tokio::sync::RwLock;

use crate::error::AppError;

/// Key of the persisted current-user record.
pub const USER_KEY: &str = "testhub.auth.user";

/// Key of the persisted current-session record.
pub const SESSION_KEY: &str = "testhub.auth.session";

/// Durable string key-value storage for the signed-in identity.
///
/// Multi-key writes and removals are all-or-nothing.
#[async_trait]
pub trait DurableStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn set_items(&self, entries: &[(&str, String)]) -> Result<(), AppError>;

    async fn remove_items(&self, keys: &[&str]) -> Result<(), AppError>;
}

/// Process-local storage. Clones share the same map, which is how tests
/// simulate a restart over the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl DurableStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_items(&self, entries: &[(&str, String)]) -> Result<(), AppError> {
        let mut items = self.items.write().await;
        for (key, value) in entries {
            items.insert(key.to_string(), value.clone());
        }
        Ok(())
    }

    async fn remove_items(&self, keys: &[&str]) -> Result<(), AppError> {
        let mut items = self.items.write().await;
        for key in keys {
            items.remove(*key);
        }
        Ok(())
    }
}

/// SQLite-backed storage. Each multi-key call runs in one transaction.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Opens (creating if needed) the database at `url`,
    /// e.g. `sqlite://testhub-session.db?mode=rwc` or `sqlite::memory:`.
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl DurableStorage for SqliteStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set_items(&self, entries: &[(&str, String)]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        for (key, value) in entries {
            sqlx::query(
                r#"
                INSERT INTO kv_store (key, value)
                VALUES (?, ?)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value
                "#,
            )
            .bind(*key)
            .bind(value.as_str())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn remove_items(&self, keys: &[&str]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        for key in keys {
            sqlx::query("DELETE FROM kv_store WHERE key = ?")
                .bind(*key)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
