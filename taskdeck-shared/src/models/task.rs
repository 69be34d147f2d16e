/// Task model and database operations
///
/// Tasks live under a project and may be assigned to a user. The assignee is
/// joined eagerly on reads so responses can embed an assignee summary.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE RESTRICT,
///     assigned_user_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     priority task_priority NOT NULL DEFAULT 'medium',
///     status VARCHAR(50) NOT NULL DEFAULT 'pending',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `ON DELETE RESTRICT` on `project_id` enforces the no-orphan policy: a
/// project cannot be deleted while tasks still reference it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::UserSummary;

/// Task priority, a closed enumeration
///
/// Unknown values are rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Converts priority to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID (server-assigned)
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Project this task belongs to
    pub project_id: Uuid,

    /// Assigned user, None when unassigned
    pub assigned_user_id: Option<Uuid>,

    /// Priority, defaults to medium
    pub priority: Priority,

    /// Free-form status string, defaults to "pending"
    pub status: String,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Task with its assignee eagerly joined
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithAssignee {
    /// The task row
    #[serde(flatten)]
    pub task: Task,

    /// Assignee summary, None when unassigned
    pub assigned_user: Option<UserSummary>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Project the task belongs to (from the request path)
    pub project_id: Uuid,

    /// Optional assignee
    pub assigned_user_id: Option<Uuid>,

    /// Priority, None for the medium default
    pub priority: Option<Priority>,

    /// Initial status, None for the "pending" default
    pub status: Option<String>,
}

/// Input for partially updating a task
///
/// Only supplied fields are written. `assigned_user_id` is doubly optional:
/// absent leaves the assignee untouched, explicit null clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New assignee (Some(None) clears the assignment)
    #[serde(default, deserialize_with = "deserialize_double_option")]
    pub assigned_user_id: Option<Option<Uuid>>,

    /// New priority
    pub priority: Option<Priority>,

    /// New status
    pub status: Option<String>,
}

/// Distinguishes an absent field from an explicit null
fn deserialize_double_option<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Uuid>::deserialize(deserializer).map(Some)
}

/// Flat row shape produced by the assignee join
#[derive(Debug, sqlx::FromRow)]
struct TaskAssigneeRow {
    id: Uuid,
    title: String,
    description: String,
    project_id: Uuid,
    assigned_user_id: Option<Uuid>,
    priority: Priority,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    assignee_name: Option<String>,
    assignee_email: Option<String>,
}

impl From<TaskAssigneeRow> for TaskWithAssignee {
    fn from(row: TaskAssigneeRow) -> Self {
        let assigned_user = match (row.assigned_user_id, row.assignee_name, row.assignee_email) {
            (Some(id), Some(name), Some(email)) => Some(UserSummary { id, name, email }),
            _ => None,
        };

        TaskWithAssignee {
            task: Task {
                id: row.id,
                title: row.title,
                description: row.description,
                project_id: row.project_id,
                assigned_user_id: row.assigned_user_id,
                priority: row.priority,
                status: row.status,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            assigned_user,
        }
    }
}

const TASK_JOIN_SELECT: &str = r#"
    SELECT t.id, t.title, t.description, t.project_id, t.assigned_user_id,
           t.priority, t.status, t.created_at, t.updated_at,
           u.name AS assignee_name, u.email AS assignee_email
    FROM tasks t
    LEFT JOIN users u ON u.id = t.assigned_user_id
"#;

impl Task {
    /// Creates a new task under a project
    ///
    /// Callers validate that `project_id` and `assigned_user_id` reference
    /// existing rows first; the foreign keys backstop those checks.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, project_id, assigned_user_id, priority, status)
            VALUES ($1, $2, $3, $4, COALESCE($5, 'medium'::task_priority), COALESCE($6, 'pending'))
            RETURNING id, title, description, project_id, assigned_user_id,
                      priority, status, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.project_id)
        .bind(data.assigned_user_id)
        .bind(data.priority)
        .bind(data.status)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists the tasks of a project with assignee summaries, newest first
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<TaskWithAssignee>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskAssigneeRow>(&format!(
            "{TASK_JOIN_SELECT} WHERE t.project_id = $1 ORDER BY t.created_at DESC"
        ))
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Finds a task by ID with its assignee summary
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<TaskWithAssignee>, sqlx::Error> {
        let row = sqlx::query_as::<_, TaskAssigneeRow>(&format!(
            "{TASK_JOIN_SELECT} WHERE t.id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Counts tasks referencing a project
    ///
    /// Project deletion is rejected while this is non-zero.
    pub async fn count_by_project(pool: &PgPool, project_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
                .bind(project_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Partially updates a task
    ///
    /// Only supplied fields are written; unsupplied fields keep their prior
    /// values. Returns the updated row, or None if the task does not exist.
    /// Last writer wins; there is no optimistic concurrency control.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the SET clause dynamically so an explicit null assignee can be
        // distinguished from an untouched one.
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${bind_count}"));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${bind_count}"));
        }
        if data.assigned_user_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assigned_user_id = ${bind_count}"));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${bind_count}"));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${bind_count}"));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, description, project_id, assigned_user_id, \
             priority, status, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(assignee) = data.assigned_user_id {
            q = q.bind(assignee);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// Physical delete. Returns true if a row was removed, false if the task
    /// did not exist.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
