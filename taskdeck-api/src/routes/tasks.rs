/// Task routes
///
/// Tasks are created and listed under their project; updates and deletes
/// address the task directly. Foreign-key references in request bodies are
/// validated before the insert, so a bad reference comes back as a 400
/// rather than a raw constraint violation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use taskdeck_shared::auth::authenticator::Identity;
use taskdeck_shared::auth::authorization::{check, Operation};
use taskdeck_shared::models::project::Project;
use taskdeck_shared::models::task::{CreateTask, Priority, Task, TaskWithAssignee, UpdateTask};
use taskdeck_shared::models::user::User;

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};

/// Request body for POST /api/projects/:id/tasks
///
/// The project comes from the path, never the body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Free-form description, defaults to empty
    #[serde(default)]
    pub description: String,

    /// Optional assignee, must reference an existing user
    pub assigned_user_id: Option<Uuid>,

    /// Priority, defaults to medium
    pub priority: Option<Priority>,

    /// Initial status, defaults to "pending"
    pub status: Option<String>,
}

/// GET /api/projects/:id/tasks
///
/// Lists the tasks of a project with assignee summaries. Any authenticated
/// role. 404 if the project does not exist.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(project_id): Path<Uuid>,
) -> ApiResult<Json<Vec<TaskWithAssignee>>> {
    check(identity.role, Operation::ListTasks)?;

    if !Project::exists(&state.db, project_id).await? {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    let tasks = Task::list_by_project(&state.db, project_id).await?;

    Ok(Json(tasks))
}

/// POST /api/projects/:id/tasks
///
/// Creates a task under a project. Manager or admin. The project and any
/// supplied assignee must exist; either missing is a 400, not a 404, since
/// the failure is about the reference in the request rather than the
/// addressed resource.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Response> {
    check(identity.role, Operation::CreateTask)?;
    req.validate()?;

    if !Project::exists(&state.db, project_id).await? {
        return Err(ApiError::InvalidReference(
            "Project does not exist".to_string(),
        ));
    }

    if let Some(assignee) = req.assigned_user_id {
        if !User::exists(&state.db, assignee).await? {
            return Err(ApiError::InvalidReference(
                "Assigned user does not exist".to_string(),
            ));
        }
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            project_id,
            assigned_user_id: req.assigned_user_id,
            priority: req.priority,
            status: req.status,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, project_id = %project_id, "task created");

    Ok((StatusCode::CREATED, Json(task)).into_response())
}

/// PUT /api/tasks/:id
///
/// Partially updates a task. Any authenticated role. An explicit null
/// `assignedUserId` clears the assignment; an absent field leaves it alone.
/// An empty body is a valid no-op returning the current row. A missing id is
/// always 404.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateTask>,
) -> ApiResult<Json<Task>> {
    check(identity.role, Operation::UpdateTask)?;

    if let Some(Some(assignee)) = update.assigned_user_id {
        if !User::exists(&state.db, assignee).await? {
            return Err(ApiError::InvalidReference(
                "Assigned user does not exist".to_string(),
            ));
        }
    }

    let task = Task::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// DELETE /api/tasks/:id
///
/// Deletes a task. Manager or admin.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    check(identity.role, Operation::DeleteTask)?;

    if !Task::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::info!(task_id = %id, deleted_by = %identity.user_id, "task deleted");

    Ok(Json(json!({ "message": "Task deleted" })).into_response())
}
