use crate::model::{
    Author, AuthorPatch, Id, NewAuthor, NewTask, Task, TaskFilter, TaskPatch, ValidationError,
};

/// Failure of a data-access operation.
///
/// Absence of a record is not a failure: lookups return `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("store operation failed: {0:#}")]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait::async_trait]
pub trait TaskStore: Send + Sync {
    /// Validate and persist a new task with a freshly assigned id
    async fn create_task(&self, new_task: NewTask) -> StoreResult<Task>;
    async fn get_task(&self, id: &Id) -> StoreResult<Option<Task>>;
    /// List tasks in creation order
    async fn list_tasks(&self, filter: TaskFilter) -> StoreResult<Vec<Task>>;
    /// Apply a partial update atomically and return the updated task
    async fn update_task(&self, id: &Id, patch: TaskPatch) -> StoreResult<Option<Task>>;
    /// Remove a task, returning what was deleted
    async fn delete_task(&self, id: &Id) -> StoreResult<Option<Task>>;
}

#[async_trait::async_trait]
pub trait AuthorStore: Send + Sync {
    async fn create_author(&self, new_author: NewAuthor) -> StoreResult<Author>;
    async fn get_author(&self, id: &Id) -> StoreResult<Option<Author>>;
    /// List authors sorted by family name, then first name
    async fn list_authors(&self) -> StoreResult<Vec<Author>>;
    async fn update_author(&self, id: &Id, patch: AuthorPatch) -> StoreResult<Option<Author>>;
    async fn delete_author(&self, id: &Id) -> StoreResult<Option<Author>>;
}

#[async_trait::async_trait]
pub trait Store: TaskStore + AuthorStore + Send + Sync {
    /// Release the underlying connection(s). Called once on shutdown.
    async fn close(&self) {}
}
