use itertools::Itertools;
use parking_lot::RwLock;

use crate::model::{
    Author, AuthorPatch, Id, NewAuthor, NewTask, Task, TaskFilter, TaskPatch,
};
use crate::store::traits::{AuthorStore, Store, StoreResult, TaskStore};

/// In-process document store.
///
/// Each collection sits behind its own lock and every write holds it for the
/// whole read-modify-write, so readers never observe a half-applied update.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: RwLock<Vec<Task>>,
    authors: RwLock<Vec<Author>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.read().len()
    }

    pub fn author_count(&self) -> usize {
        self.authors.read().len()
    }
}

#[async_trait::async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, new_task: NewTask) -> StoreResult<Task> {
        let task = new_task.into_task()?;
        self.tasks.write().push(task.clone());
        log::debug!("created task {}", task.id);
        Ok(task)
    }

    async fn get_task(&self, id: &Id) -> StoreResult<Option<Task>> {
        Ok(self.tasks.read().iter().find(|t| &t.id == id).cloned())
    }

    async fn list_tasks(&self, filter: TaskFilter) -> StoreResult<Vec<Task>> {
        Ok(self
            .tasks
            .read()
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    async fn update_task(&self, id: &Id, patch: TaskPatch) -> StoreResult<Option<Task>> {
        let patch = patch.validate()?;
        let mut tasks = self.tasks.write();
        let Some(task) = tasks.iter_mut().find(|t| &t.id == id) else {
            return Ok(None);
        };
        *task = patch.apply_to(task);
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: &Id) -> StoreResult<Option<Task>> {
        let mut tasks = self.tasks.write();
        let Some(index) = tasks.iter().position(|t| &t.id == id) else {
            return Ok(None);
        };
        let task = tasks.remove(index);
        log::debug!("deleted task {}", task.id);
        Ok(Some(task))
    }
}

#[async_trait::async_trait]
impl AuthorStore for MemoryStore {
    async fn create_author(&self, new_author: NewAuthor) -> StoreResult<Author> {
        let author = new_author.into_author()?;
        self.authors.write().push(author.clone());
        log::debug!("created author {}", author.id);
        Ok(author)
    }

    async fn get_author(&self, id: &Id) -> StoreResult<Option<Author>> {
        Ok(self.authors.read().iter().find(|a| &a.id == id).cloned())
    }

    async fn list_authors(&self) -> StoreResult<Vec<Author>> {
        Ok(self
            .authors
            .read()
            .iter()
            .sorted_by(|a, b| {
                a.family_name
                    .cmp(&b.family_name)
                    .then_with(|| a.first_name.cmp(&b.first_name))
            })
            .cloned()
            .collect())
    }

    async fn update_author(&self, id: &Id, patch: AuthorPatch) -> StoreResult<Option<Author>> {
        let patch = patch.validate()?;
        let mut authors = self.authors.write();
        let Some(author) = authors.iter_mut().find(|a| &a.id == id) else {
            return Ok(None);
        };
        *author = patch.apply_to(author);
        Ok(Some(author.clone()))
    }

    async fn delete_author(&self, id: &Id) -> StoreResult<Option<Author>> {
        let mut authors = self.authors.write();
        let Some(index) = authors.iter().position(|a| &a.id == id) else {
            return Ok(None);
        };
        Ok(Some(authors.remove(index)))
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[tokio::test]
    async fn create_then_find_round_trips() {
        let store = MemoryStore::new();
        let created = store.create_task(NewTask::new("buy milk")).await.unwrap();
        assert_eq!(created.description, "buy milk");
        assert!(!created.completed);

        let found = store.get_task(&created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn created_ids_are_distinct() {
        let store = MemoryStore::new();
        let a = store.create_task(NewTask::new("one")).await.unwrap();
        let b = store.create_task(NewTask::new("one")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn invalid_create_persists_nothing() {
        let store = MemoryStore::new();
        let result = store.create_task(NewTask::default()).await;
        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert_eq!(store.task_count(), 0);
    }

    #[tokio::test]
    async fn missing_id_is_none_not_error() {
        let store = MemoryStore::new();
        let id = "does-not-exist".to_string();
        assert!(store.get_task(&id).await.unwrap().is_none());
        assert!(store
            .update_task(&id, TaskPatch::default())
            .await
            .unwrap()
            .is_none());
        assert!(store.delete_task(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_is_idempotent() {
        let store = MemoryStore::new();
        let task = store.create_task(NewTask::new("buy milk")).await.unwrap();
        let patch = TaskPatch {
            description: None,
            completed: Some(true),
        };

        let once = store.update_task(&task.id, patch.clone()).await.unwrap();
        let twice = store.update_task(&task.id, patch).await.unwrap();
        assert_eq!(once, twice);
        assert!(twice.unwrap().completed);
    }

    #[tokio::test]
    async fn invalid_update_leaves_record_untouched() {
        let store = MemoryStore::new();
        let task = store.create_task(NewTask::new("buy milk")).await.unwrap();
        let patch = TaskPatch {
            description: Some(String::new()),
            completed: Some(true),
        };

        let result = store.update_task(&task.id, patch).await;
        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert_eq!(store.get_task(&task.id).await.unwrap(), Some(task));
    }

    #[tokio::test]
    async fn delete_then_find_is_none() {
        let store = MemoryStore::new();
        let task = store.create_task(NewTask::new("buy milk")).await.unwrap();

        let deleted = store.delete_task(&task.id).await.unwrap();
        assert_eq!(deleted, Some(task.clone()));
        assert!(store.get_task(&task.id).await.unwrap().is_none());

        // Deleting again is a no-op
        assert!(store.delete_task(&task.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_filters_and_keeps_creation_order() {
        let store = MemoryStore::new();
        let first = store.create_task(NewTask::new("first")).await.unwrap();
        let second = store.create_task(NewTask::new("second")).await.unwrap();
        store
            .update_task(
                &second.id,
                TaskPatch {
                    description: None,
                    completed: Some(true),
                },
            )
            .await
            .unwrap();

        let all = store.list_tasks(TaskFilter::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec![first.id.clone(), second.id.clone()]);

        let open = store
            .list_tasks(TaskFilter {
                completed: Some(false),
            })
            .await
            .unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, first.id);
    }

    #[tokio::test]
    async fn authors_are_listed_by_family_name() {
        let store = MemoryStore::new();
        store
            .create_author(NewAuthor::new("Isaac", "Asimov"))
            .await
            .unwrap();
        store
            .create_author(NewAuthor::new("Ben", "Bova"))
            .await
            .unwrap();
        store
            .create_author(NewAuthor::new("Bob", "Billings"))
            .await
            .unwrap();

        let names: Vec<_> = store
            .list_authors()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.family_name)
            .collect();
        assert_eq!(names, vec!["Asimov", "Billings", "Bova"]);
    }

    #[tokio::test]
    async fn author_crud_cycle() {
        let store = MemoryStore::new();
        let author = store
            .create_author(NewAuthor::new("Patrick", "Rothfuss"))
            .await
            .unwrap();

        let renamed = store
            .update_author(
                &author.id,
                AuthorPatch {
                    first_name: Some("Pat".to_string()),
                    ..AuthorPatch::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.first_name, "Pat");
        assert_eq!(renamed.family_name, "Rothfuss");

        assert!(store.delete_author(&author.id).await.unwrap().is_some());
        assert_eq!(store.author_count(), 0);
    }
}
