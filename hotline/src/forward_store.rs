use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::warn;

/// Row key of the single forwarding number.
pub const FORWARD_KEY: &str = "forward_number";

/// Who wrote the current forwarding number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardSource {
    /// Periodic refresh from the volunteer schedule
    Schedule,
    /// Administrator override from the phone menu
    Admin,
    /// Configured fallback number
    Default,
}

impl ForwardSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForwardSource::Schedule => "schedule",
            ForwardSource::Admin => "admin",
            ForwardSource::Default => "default",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Durable holder of the number hotline calls are forwarded to.
///
/// Writes overwrite unconditionally; concurrent writers race and the last one wins.
#[async_trait]
pub trait ForwardStore: Send + Sync {
    async fn get(&self) -> Result<Option<String>, StoreError>;

    async fn put(&self, number: &str, source: ForwardSource) -> Result<(), StoreError>;

    /// Write `default` only if nothing is stored yet. Returns true if it wrote.
    async fn init_if_absent(&self, default: &str) -> Result<bool, StoreError>;
}

/// SQLite-backed forward store.
///
/// Schema (created by the `forward_state` migration):
/// ```sql
/// CREATE TABLE IF NOT EXISTS forward_state (
///     key        TEXT PRIMARY KEY,
///     value      TEXT NOT NULL,
///     source     TEXT NOT NULL,
///     updated_at TEXT NOT NULL   -- RFC 3339
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SqliteForwardStore {
    pool: SqlitePool,
}

impl SqliteForwardStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ForwardStore for SqliteForwardStore {
    async fn get(&self) -> Result<Option<String>, StoreError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM forward_state WHERE key = ?")
            .bind(FORWARD_KEY)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    async fn put(&self, number: &str, source: ForwardSource) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO forward_state (key, value, source, updated_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                source = excluded.source,
                updated_at = excluded.updated_at",
        )
        .bind(FORWARD_KEY)
        .bind(number)
        .bind(source.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn init_if_absent(&self, default: &str) -> Result<bool, StoreError> {
        let rows = sqlx::query(
            "INSERT OR IGNORE INTO forward_state (key, value, source, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(FORWARD_KEY)
        .bind(default)
        .bind(ForwardSource::Default.as_str())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(rows > 0)
    }
}

/// Read the forwarding number once, substituting `default` when nothing is
/// stored or the store cannot be read.
pub async fn forward_number_or_default(store: &dyn ForwardStore, default: &str) -> String {
    match store.get().await {
        Ok(Some(number)) if !number.trim().is_empty() => number,
        Ok(_) => default.to_string(),
        Err(e) => {
            warn!(error = %e, "forward store read failed; using default number");
            default.to_string()
        }
    }
}
