use anyhow::Context;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    PgPool, Row,
};

use crate::model::{
    Author, AuthorPatch, Id, NewAuthor, NewTask, Task, TaskFilter, TaskPatch,
};
use crate::store::traits::{AuthorStore, Store, StoreResult, TaskStore};

const TASK_COLUMNS: &str = "id, description, completed";
const AUTHOR_COLUMNS: &str = "id, first_name, family_name, date_of_birth, date_of_death";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run the embedded migrations in `migrations/`
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }
}

fn task_from_row(row: &PgRow) -> Task {
    Task {
        id: row.get("id"),
        description: row.get("description"),
        completed: row.get("completed"),
    }
}

fn author_from_row(row: &PgRow) -> Author {
    Author {
        id: row.get("id"),
        first_name: row.get("first_name"),
        family_name: row.get("family_name"),
        date_of_birth: row.get("date_of_birth"),
        date_of_death: row.get("date_of_death"),
    }
}

#[async_trait::async_trait]
impl TaskStore for PostgresStore {
    async fn create_task(&self, new_task: NewTask) -> StoreResult<Task> {
        let task = new_task.into_task()?;
        let row = sqlx::query(&format!(
            "INSERT INTO tasks (id, description, completed) VALUES ($1, $2, $3) RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(&task.id)
        .bind(&task.description)
        .bind(task.completed)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert task")?;

        Ok(task_from_row(&row))
    }

    async fn get_task(&self, id: &Id) -> StoreResult<Option<Task>> {
        let row = sqlx::query(&format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch task")?;

        Ok(row.as_ref().map(task_from_row))
    }

    async fn list_tasks(&self, filter: TaskFilter) -> StoreResult<Vec<Task>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM tasks
            WHERE ($1::BOOLEAN IS NULL OR completed = $1)
            ORDER BY created_at, id
            "#,
            TASK_COLUMNS
        ))
        .bind(filter.completed)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list tasks")?;

        Ok(rows.iter().map(task_from_row).collect())
    }

    async fn update_task(&self, id: &Id, patch: TaskPatch) -> StoreResult<Option<Task>> {
        let patch = patch.validate()?;
        // One statement, so the row is either fully updated or untouched
        let row = sqlx::query(&format!(
            r#"
            UPDATE tasks SET
                description = COALESCE($2, description),
                completed = COALESCE($3, completed)
            WHERE id = $1
            RETURNING {}
            "#,
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(patch.description)
        .bind(patch.completed)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update task")?;

        Ok(row.as_ref().map(task_from_row))
    }

    async fn delete_task(&self, id: &Id) -> StoreResult<Option<Task>> {
        let row = sqlx::query(&format!(
            "DELETE FROM tasks WHERE id = $1 RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to delete task")?;

        Ok(row.as_ref().map(task_from_row))
    }
}

#[async_trait::async_trait]
impl AuthorStore for PostgresStore {
    async fn create_author(&self, new_author: NewAuthor) -> StoreResult<Author> {
        let author = new_author.into_author()?;
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO authors (id, first_name, family_name, date_of_birth, date_of_death)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        ))
        .bind(&author.id)
        .bind(&author.first_name)
        .bind(&author.family_name)
        .bind(author.date_of_birth)
        .bind(author.date_of_death)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert author")?;

        Ok(author_from_row(&row))
    }

    async fn get_author(&self, id: &Id) -> StoreResult<Option<Author>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM authors WHERE id = $1",
            AUTHOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch author")?;

        Ok(row.as_ref().map(author_from_row))
    }

    async fn list_authors(&self) -> StoreResult<Vec<Author>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM authors ORDER BY family_name, first_name",
            AUTHOR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list authors")?;

        Ok(rows.iter().map(author_from_row).collect())
    }

    async fn update_author(&self, id: &Id, patch: AuthorPatch) -> StoreResult<Option<Author>> {
        let patch = patch.validate()?;
        let row = sqlx::query(&format!(
            r#"
            UPDATE authors SET
                first_name = COALESCE($2, first_name),
                family_name = COALESCE($3, family_name),
                date_of_birth = COALESCE($4, date_of_birth),
                date_of_death = COALESCE($5, date_of_death)
            WHERE id = $1
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        ))
        .bind(id)
        .bind(patch.first_name)
        .bind(patch.family_name)
        .bind(patch.date_of_birth)
        .bind(patch.date_of_death)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update author")?;

        Ok(row.as_ref().map(author_from_row))
    }

    async fn delete_author(&self, id: &Id) -> StoreResult<Option<Author>> {
        let row = sqlx::query(&format!(
            "DELETE FROM authors WHERE id = $1 RETURNING {}",
            AUTHOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to delete author")?;

        Ok(row.as_ref().map(author_from_row))
    }
}

#[async_trait::async_trait]
impl Store for PostgresStore {
    async fn close(&self) {
        self.pool.close().await;
    }
}
