use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Open the hotline database and apply migrations.
///
/// Accepts `sqlite:./data/hotline.db`, `sqlite:/abs/hotline.db` or a bare path.
/// The webhook handlers and the periodic refresher write concurrently, so the
/// pool runs in WAL mode with a busy timeout instead of failing on lock contention.
pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let file_path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);

    let abs_path = std::env::current_dir()?.join(file_path);
    if let Some(parent) = abs_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(&abs_path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(Duration::from_secs(5)),
        )
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}
