use crate::DbError;
use core_types::{NewToDo, ToDo};
use sqlx::SqlitePool;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries against the `todos` table.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: SqlitePool,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetches every to-do item in insertion order.
    pub async fn list_todos(&self) -> Result<Vec<ToDo>, DbError> {
        let todos = sqlx::query_as::<_, ToDo>("SELECT id, content, completed FROM todos ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(todos)
    }

    /// Fetches a single to-do item, or `None` if no row has that id.
    pub async fn get_todo(&self, id: i64) -> Result<Option<ToDo>, DbError> {
        let todo = sqlx::query_as::<_, ToDo>("SELECT id, content, completed FROM todos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(todo)
    }

    /// Inserts a new, not yet completed item and returns it with its assigned id.
    pub async fn create_todo(&self, new_todo: &NewToDo) -> Result<ToDo, DbError> {
        let todo = sqlx::query_as::<_, ToDo>(
            r#"
            INSERT INTO todos (content, completed)
            VALUES (?, 0)
            RETURNING id, content, completed
            "#,
        )
        .bind(new_todo.content())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = todo.id, "To-do created");
        Ok(todo)
    }

    /// Flips `completed` and returns the updated item.
    ///
    /// The read and the write happen in one statement, so concurrent toggles of the
    /// same row never lose an update. Returns `None` (and writes nothing) when the
    /// id does not exist.
    pub async fn toggle_todo(&self, id: i64) -> Result<Option<ToDo>, DbError> {
        let todo = sqlx::query_as::<_, ToDo>(
            r#"
            UPDATE todos
            SET completed = NOT completed
            WHERE id = ?
            RETURNING id, content, completed
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match &todo {
            Some(todo) => tracing::debug!(id, completed = todo.completed, "To-do toggled"),
            None => tracing::debug!(id, "Toggle skipped, no such to-do"),
        }
        Ok(todo)
    }

    /// Removes the item if present. Returns whether a row was deleted; a missing id is not an error.
    pub async fn delete_todo(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        tracing::debug!(id, deleted, "To-do delete");
        Ok(deleted)
    }

    pub async fn count_todos(&self) -> Result<i64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Closes the pool. Called once, after the server has stopped accepting requests.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection closed");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MEMORY_URL, connect, run_migrations};
    use configuration::DatabaseSettings;

    async fn repo() -> DbRepository {
        let settings = DatabaseSettings {
            url: MEMORY_URL.to_string(),
            max_connections: 1,
        };
        let pool = connect(&settings).await.unwrap();
        run_migrations(&pool).await.unwrap();
        DbRepository::new(pool)
    }

    fn new_todo(content: &str) -> NewToDo {
        NewToDo::new(content).unwrap()
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let repo = repo().await;
        assert!(repo.list_todos().await.unwrap().is_empty());
        assert_eq!(repo.count_todos().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn create_then_list() {
        let repo = repo().await;
        let created = repo.create_todo(&new_todo("buy milk")).await.unwrap();

        assert!(created.id > 0);
        assert_eq!(created.content, "buy milk");
        assert!(!created.completed);

        let todos = repo.list_todos().await.unwrap();
        assert_eq!(todos, vec![created]);
    }

    #[tokio::test]
    async fn ids_are_unique_and_listed_in_insertion_order() {
        let repo = repo().await;
        let first = repo.create_todo(&new_todo("first")).await.unwrap();
        let second = repo.create_todo(&new_todo("second")).await.unwrap();
        assert_ne!(first.id, second.id);

        let contents: Vec<_> = repo
            .list_todos()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.content)
            .collect();
        assert_eq!(contents, ["first", "second"]);
    }

    #[tokio::test]
    async fn get_todo_finds_existing_and_misses_unknown() {
        let repo = repo().await;
        let created = repo.create_todo(&new_todo("walk dog")).await.unwrap();

        assert_eq!(repo.get_todo(created.id).await.unwrap(), Some(created.clone()));
        assert_eq!(repo.get_todo(created.id + 100).await.unwrap(), None);
    }

    #[tokio::test]
    async fn toggle_twice_restores_original_state() {
        let repo = repo().await;
        let created = repo.create_todo(&new_todo("water plants")).await.unwrap();

        let once = repo.toggle_todo(created.id).await.unwrap().unwrap();
        assert!(once.completed);
        assert_eq!(once.content, created.content);

        let twice = repo.toggle_todo(created.id).await.unwrap().unwrap();
        assert!(!twice.completed);
        assert_eq!(repo.get_todo(created.id).await.unwrap(), Some(twice));
    }

    #[tokio::test]
    async fn toggle_unknown_id_writes_nothing() {
        let repo = repo().await;
        assert_eq!(repo.toggle_todo(42).await.unwrap(), None);
        assert_eq!(repo.count_todos().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_removes_and_is_idempotent() {
        let repo = repo().await;
        let keep = repo.create_todo(&new_todo("keep")).await.unwrap();
        let gone = repo.create_todo(&new_todo("drop")).await.unwrap();

        assert!(repo.delete_todo(gone.id).await.unwrap());
        assert!(!repo.delete_todo(gone.id).await.unwrap());
        assert!(!repo.delete_todo(9999).await.unwrap());

        assert_eq!(repo.list_todos().await.unwrap(), vec![keep]);
    }

    #[tokio::test]
    async fn row_count_tracks_creates_minus_effective_deletes() {
        let repo = repo().await;
        let mut ids = Vec::new();
        let mut creates = 0;
        let mut effective_deletes = 0;

        for i in 0..12 {
            match i % 4 {
                0 | 1 => {
                    ids.push(repo.create_todo(&new_todo(&format!("item {i}"))).await.unwrap().id);
                    creates += 1;
                }
                2 => {
                    if let Some(id) = ids.first().copied() {
                        repo.toggle_todo(id).await.unwrap();
                    }
                }
                _ => {
                    // Delete the newest id twice plus an id that never existed.
                    if let Some(id) = ids.pop() {
                        if repo.delete_todo(id).await.unwrap() {
                            effective_deletes += 1;
                        }
                        assert!(!repo.delete_todo(id).await.unwrap());
                    }
                    assert!(!repo.delete_todo(-1).await.unwrap());
                }
            }
        }

        assert_eq!(repo.count_todos().await.unwrap(), creates - effective_deletes);
    }

    #[tokio::test]
    async fn close_rejects_further_queries() {
        let repo = repo().await;
        repo.close().await;

        assert!(repo.is_closed());
        assert!(repo.count_todos().await.is_err());
    }

    #[tokio::test]
    async fn completed_is_stored_as_integer_flag() {
        let repo = repo().await;
        let created = repo.create_todo(&new_todo("check encoding")).await.unwrap();
        repo.toggle_todo(created.id).await.unwrap();

        let raw: i64 = sqlx::query_scalar("SELECT completed FROM todos WHERE id = ?")
            .bind(created.id)
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(raw, 1);
    }
}
