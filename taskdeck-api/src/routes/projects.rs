/// Project routes
///
/// All endpoints require authentication; writes additionally pass the role
/// guard. The guard runs before any database access, so a forbidden caller
/// learns nothing about whether the target exists.

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
use taskdeck_shared::models::project::{CreateProject, Project, ProjectWithManager, UpdateProject};
use taskdeck_shared::models::task::Task;

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};

/// Request body for POST /api/projects
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    /// Project name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Free-form description, defaults to empty
    #[serde(default)]
    pub description: String,

    /// Initial status, defaults to "active"
    pub status: Option<String>,
}

/// GET /api/projects
///
/// Lists all projects with manager summaries. Any authenticated role.
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<Vec<ProjectWithManager>>> {
    check(identity.role, Operation::ListProjects)?;

    let projects = Project::list(&state.db).await?;

    Ok(Json(projects))
}

/// POST /api/projects
///
/// Creates a project owned by the caller. Manager or admin. The caller's own
/// ID becomes `manager_id`; it is not accepted from the request body.
pub async fn create_project(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Response> {
    check(identity.role, Operation::CreateProject)?;
    req.validate()?;

    let project = Project::create(
        &state.db,
        CreateProject {
            name: req.name,
            description: req.description,
            status: req.status,
            manager_id: identity.user_id,
        },
    )
    .await?;

    tracing::info!(project_id = %project.id, manager_id = %identity.user_id, "project created");

    Ok((StatusCode::CREATED, Json(project)).into_response())
}

/// GET /api/projects/:id
///
/// Returns one project with its manager summary. Any authenticated role.
pub async fn get_project(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProjectWithManager>> {
    check(identity.role, Operation::ReadProject)?;

    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// PUT /api/projects/:id
///
/// Partially updates a project. Manager or admin. Only supplied fields
/// change; last writer wins. An empty body is a valid no-op returning the
/// current row. A missing id is always 404.
pub async fn update_project(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateProject>,
) -> ApiResult<Json<Project>> {
    check(identity.role, Operation::UpdateProject)?;

    let project = Project::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// DELETE /api/projects/:id
///
/// Deletes a project. Admin only. Rejected with 409 while tasks still
/// reference the project; delete or move them first.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    check(identity.role, Operation::DeleteProject)?;

    if !Project::exists(&state.db, id).await? {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    let task_count = Task::count_by_project(&state.db, id).await?;
    if task_count > 0 {
        return Err(ApiError::Conflict(format!(
            "Project has {} tasks; delete them first",
            task_count
        )));
    }

    // The RESTRICT foreign key backstops the count check against races
    if !Project::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    tracing::info!(project_id = %id, deleted_by = %identity.user_id, "project deleted");

    Ok(Json(json!({ "message": "Project deleted" })).into_response())
}
