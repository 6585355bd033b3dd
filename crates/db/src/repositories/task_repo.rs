//! Repository for the `tasks` table.

use tasker_core::task::{TaskStatus, LIST_LIMIT};
use tasker_core::types::TaskId;

use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::store::{Store, StoreError};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, status";

/// Provides CRUD operations for tasks over a shared [`Store`].
///
/// Cheap to construct; handlers build a fresh one per request.
pub struct TaskRepo<'a> {
    store: &'a Store,
}

impl<'a> TaskRepo<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Insert a new task with a fresh id and status `created`, returning the row.
    pub async fn create(&self, input: &CreateTask) -> Result<Task, StoreError> {
        let id = TaskId::new_v4();
        let query = format!(
            "INSERT INTO tasks (id, title, description, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let task = self
            .store
            .fetch_one(
                sqlx::query_as::<_, Task>(&query)
                    .bind(id)
                    .bind(&input.title)
                    .bind(&input.description)
                    .bind(TaskStatus::Created.as_str()),
            )
            .await?
            .ok_or(StoreError::Query(sqlx::Error::RowNotFound))?;
        tracing::debug!(task_id = %task.id, "Created task");
        Ok(task)
    }

    /// Find a task by its id.
    pub async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        self.store
            .fetch_one(sqlx::query_as::<_, Task>(&query).bind(id))
            .await
    }

    /// List up to [`LIST_LIMIT`] tasks ordered by title, optionally filtered by status.
    pub async fn list(&self, status: Option<TaskStatus>) -> Result<Vec<Task>, StoreError> {
        tracing::debug!(status = ?status, "Listing tasks");
        match status {
            Some(status) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM tasks WHERE status = $1 ORDER BY title ASC LIMIT {LIST_LIMIT}"
                );
                self.store
                    .fetch(sqlx::query_as::<_, Task>(&query).bind(status.as_str()))
                    .await
            }
            None => {
                let query =
                    format!("SELECT {COLUMNS} FROM tasks ORDER BY title ASC LIMIT {LIST_LIMIT}");
                self.store.fetch(sqlx::query_as::<_, Task>(&query)).await
            }
        }
    }

    /// Partially update a task. Only the fields present in `input` are written.
    ///
    /// An empty update is a plain lookup. Returns `None` if no row with the
    /// given `id` exists.
    pub async fn update(&self, id: TaskId, input: &UpdateTask) -> Result<Option<Task>, StoreError> {
        let Some(query) = update_query(input) else {
            return self.find_by_id(id).await;
        };
        tracing::debug!(task_id = %id, sql = %query, "Updating task");

        // Bind order must match the placeholder order produced by `update_query`.
        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);
        if let Some(ref title) = input.title {
            q = q.bind(title);
        }
        if let Some(ref description) = input.description {
            q = q.bind(description);
        }
        if let Some(status) = input.status {
            q = q.bind(status.as_str());
        }

        self.store.fetch_one(q).await
    }

    /// Delete a task by id. Returns `true` only if exactly one row was removed.
    pub async fn delete(&self, id: TaskId) -> Result<bool, StoreError> {
        let result = self
            .store
            .execute(sqlx::query("DELETE FROM tasks WHERE id = $1").bind(id))
            .await?;
        tracing::debug!(task_id = %id, rows = result.rows_affected(), "Deleted task");
        Ok(result.rows_affected() == 1)
    }
}

/// Build the `UPDATE` statement for the fields present in `input`.
///
/// Assignments follow the field order `title`, `description`, `status`.
/// `$1` is the id predicate, so the first assignment uses `$2`. Returns
/// `None` when there is nothing to set.
pub fn update_query(input: &UpdateTask) -> Option<String> {
    if input.is_empty() {
        return None;
    }

    let mut set_clauses: Vec<String> = Vec::new();
    let mut param_idx: usize = 2; // $1 is id

    if input.title.is_some() {
        set_clauses.push(format!("title = ${param_idx}"));
        param_idx += 1;
    }
    if input.description.is_some() {
        set_clauses.push(format!("description = ${param_idx}"));
        param_idx += 1;
    }
    if input.status.is_some() {
        set_clauses.push(format!("status = ${param_idx}"));
    }

    Some(format!(
        "UPDATE tasks SET {} WHERE id = $1 RETURNING {COLUMNS}",
        set_clauses.join(", ")
    ))
}
