/// Project model and database operations
///
/// A project is owned by the user who created it (`manager_id`). Reads join the
/// manager row eagerly so responses can embed a manager summary; the join is a
/// LEFT JOIN, so a project whose manager row has gone missing still lists.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     status VARCHAR(50) NOT NULL DEFAULT 'active',
///     manager_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Deleting a project with tasks still referencing it is rejected; callers
/// check [`crate::models::task::Task::count_by_project`] first, and the
/// `ON DELETE RESTRICT` foreign key on tasks backstops the check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::UserSummary;

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project ID (server-assigned)
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Free-form status string, defaults to "active"
    pub status: String,

    /// User who created the project
    pub manager_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Project with its manager eagerly joined
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWithManager {
    /// The project row
    #[serde(flatten)]
    pub project: Project,

    /// Manager summary, None if the manager row no longer exists
    pub manager: Option<UserSummary>,
}

/// Input for creating a new project
#[derive(Debug, Clone)]
pub struct CreateProject {
    /// Project name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Initial status, None for the "active" default
    pub status: Option<String>,

    /// Creating user's ID
    pub manager_id: Uuid,
}

/// Input for partially updating a project
///
/// Only non-None fields are written; unsupplied fields keep their prior
/// values. An all-None update is a valid no-op. Last writer wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    /// New name
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<String>,
}

/// Flat row shape produced by the manager join
#[derive(Debug, sqlx::FromRow)]
struct ProjectManagerRow {
    id: Uuid,
    name: String,
    description: String,
    status: String,
    manager_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    manager_name: Option<String>,
    manager_email: Option<String>,
}

impl From<ProjectManagerRow> for ProjectWithManager {
    fn from(row: ProjectManagerRow) -> Self {
        let manager = match (row.manager_name, row.manager_email) {
            (Some(name), Some(email)) => Some(UserSummary {
                id: row.manager_id,
                name,
                email,
            }),
            _ => None,
        };

        ProjectWithManager {
            project: Project {
                id: row.id,
                name: row.name,
                description: row.description,
                status: row.status,
                manager_id: row.manager_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            manager,
        }
    }
}

const PROJECT_JOIN_SELECT: &str = r#"
    SELECT p.id, p.name, p.description, p.status, p.manager_id,
           p.created_at, p.updated_at,
           u.name AS manager_name, u.email AS manager_email
    FROM projects p
    LEFT JOIN users u ON u.id = p.manager_id
"#;

impl Project {
    /// Creates a new project
    ///
    /// The manager foreign key must reference an existing user at creation
    /// time; in practice it is always the authenticated creator's ID.
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, status, manager_id)
            VALUES ($1, $2, COALESCE($3, 'active'), $4)
            RETURNING id, name, description, status, manager_id, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.status)
        .bind(data.manager_id)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Lists all projects with manager summaries, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<ProjectWithManager>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProjectManagerRow>(&format!(
            "{PROJECT_JOIN_SELECT} ORDER BY p.created_at DESC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Finds a project by ID with its manager summary
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<ProjectWithManager>, sqlx::Error> {
        let row = sqlx::query_as::<_, ProjectManagerRow>(&format!(
            "{PROJECT_JOIN_SELECT} WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Checks whether a project row exists
    ///
    /// Used to validate `project_id` references before creating tasks.
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let (found,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(found)
    }

    /// Partially updates a project
    ///
    /// Returns the updated row, or None if the project does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name        = COALESCE($2, name),
                description = COALESCE($3, description),
                status      = COALESCE($4, status),
                updated_at  = NOW()
            WHERE id = $1
            RETURNING id, name, description, status, manager_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.status)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Deletes a project by ID
    ///
    /// Physical delete. Returns true if a row was removed, false if the
    /// project did not exist. Fails on the tasks foreign key if tasks still
    /// reference the project.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_project_absent_fields_stay_none() {
        let update: UpdateProject = serde_json::from_str(r#"{"status": "archived"}"#).unwrap();
        assert_eq!(update.status.as_deref(), Some("archived"));
        assert!(update.name.is_none());
        assert!(update.description.is_none());
    }

    #[test]
    fn test_join_row_without_manager_yields_none() {
        let row = ProjectManagerRow {
            id: Uuid::new_v4(),
            name: "Launch".to_string(),
            description: "".to_string(),
            status: "active".to_string(),
            manager_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            manager_name: None,
            manager_email: None,
        };

        let joined = ProjectWithManager::from(row);
        assert!(joined.manager.is_none());
    }

    #[test]
    fn test_join_row_with_manager() {
        let manager_id = Uuid::new_v4();
        let row = ProjectManagerRow {
            id: Uuid::new_v4(),
            name: "Launch".to_string(),
            description: "".to_string(),
            status: "active".to_string(),
            manager_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            manager_name: Some("Alice".to_string()),
            manager_email: Some("alice@example.com".to_string()),
        };

        let joined = ProjectWithManager::from(row);
        let manager = joined.manager.expect("manager should be joined");
        assert_eq!(manager.id, manager_id);
        assert_eq!(manager.name, "Alice");
    }

    #[test]
    fn test_project_serializes_camel_case() {
        let project = Project {
            id: Uuid::new_v4(),
            name: "Launch".to_string(),
            description: "Q3 launch".to_string(),
            status: "active".to_string(),
            manager_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&project).unwrap();
        assert!(json.get("managerId").is_some());
        assert!(json.get("manager_id").is_none());
    }
}
