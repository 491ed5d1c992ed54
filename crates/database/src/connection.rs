use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Location that selects a private in-memory database instead of a file.
pub const MEMORY_URL: &str = ":memory:";

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

static MEMDB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Establishes a connection pool to the SQLite database named by `settings.url`.
///
/// A file database is created if missing, along with its parent directory.
/// `:memory:` gets a uniquely named shared-cache database held by a single
/// connection, so every caller (and every parallel test) sees its own store.
pub async fn connect(settings: &DatabaseSettings) -> Result<SqlitePool, DbError> {
    let url = settings.url.as_str();
    let pool = if url == MEMORY_URL {
        let id = MEMDB_COUNTER.fetch_add(1, Ordering::Relaxed);
        let memdb_uri = format!(
            "file:todo-memdb-{}-{}?mode=memory&cache=shared",
            std::process::id(),
            id
        );
        let options = SqliteConnectOptions::new()
            .filename(&memdb_uri)
            .shared_cache(true)
            .create_if_missing(true);

        SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            // The store lives only as long as its last connection.
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        if let Some(parent) = Path::new(url).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(url)
            .create_if_missing(true);

        SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?
    };

    tracing::info!(url = %url, "Database connected");
    Ok(pool)
}

/// Applies the embedded migrations, creating the `todos` table on a fresh database.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations checked/applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(url: &str, max_connections: u32) -> DatabaseSettings {
        DatabaseSettings {
            url: url.to_string(),
            max_connections,
        }
    }

    #[tokio::test]
    async fn memory_databases_are_isolated() {
        let first = connect(&settings(MEMORY_URL, 1)).await.unwrap();
        let second = connect(&settings(MEMORY_URL, 1)).await.unwrap();
        run_migrations(&first).await.unwrap();

        sqlx::query("INSERT INTO todos (content) VALUES ('only here')")
            .execute(&first)
            .await
            .unwrap();

        // The second store never ran migrations, so it has no table at all.
        let missing = sqlx::query("SELECT COUNT(*) FROM todos")
            .execute(&second)
            .await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn file_database_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("todos.db");

        let pool = connect(&settings(path.to_str().unwrap(), 2)).await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool.close().await;

        assert!(path.exists());
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = connect(&settings(MEMORY_URL, 1)).await.unwrap();
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();
    }
}
