use crate::error::CoreError;
use sqlx::FromRow;

/// A single to-do item as stored in the `todos` table.
///
/// `id` is assigned by the storage engine and never changes. `content` is fixed at
/// creation; only `completed` is ever flipped.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ToDo {
    pub id: i64,
    pub content: String,
    pub completed: bool,
}

/// Validated input for creating a to-do item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewToDo {
    content: String,
}

impl NewToDo {
    /// Builds a creation request, rejecting empty content.
    ///
    /// Only the zero-length string is rejected; whitespace is kept as typed.
    pub fn new(content: impl Into<String>) -> Result<Self, CoreError> {
        let content = content.into();
        if content.is_empty() {
            return Err(CoreError::EmptyContent);
        }
        Ok(Self { content })
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
