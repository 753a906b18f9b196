// Persisted group display names (SQLite). One row per original group key.

use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

pub struct NameStore {
    pool: SqlitePool,
}

impl NameStore {
    pub async fn connect(path: &str) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new().connect_with(opts).await?;
        Ok(Self { pool })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS group_names (
                original_name TEXT PRIMARY KEY,
                display_name TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Display name for a group key. Falls back to the key itself when no row
    /// exists, the stored name is NULL/empty, or the lookup fails (the error
    /// is logged, never surfaced to the cycle).
    pub async fn resolve(&self, key: &str) -> String {
        match self.lookup(key).await {
            Ok(Some(name)) if !name.is_empty() => name,
            Ok(_) => key.to_string(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    group = %key,
                    operation = "resolve_display_name",
                    "name store lookup failed; using original key"
                );
                key.to_string()
            }
        }
    }

    async fn lookup(&self, key: &str) -> anyhow::Result<Option<String>> {
        let row = sqlx::query("SELECT display_name FROM group_names WHERE original_name = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let name: Option<String> = row.try_get("display_name")?;
        Ok(name)
    }

    /// Upsert the display name for a group key, replacing any prior value.
    #[instrument(skip(self), fields(repo = "name_store", operation = "rename"))]
    pub async fn rename(&self, old_name: &str, new_name: &str) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO group_names (original_name, display_name) VALUES ($1, $2)",
        )
        .bind(old_name)
        .bind(new_name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
