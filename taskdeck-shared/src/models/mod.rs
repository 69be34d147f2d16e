/// Database models for Taskdeck
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts, roles, and credential storage
/// - `project`: Projects owned by a managing user
/// - `task`: Tasks belonging to a project, optionally assigned to a user
///
/// # Relationships
///
/// ```text
/// users 1 ──< projects (manager_id)
/// users 1 ──< tasks    (assigned_user_id, nullable)
/// projects 1 ──< tasks (project_id)
/// ```

pub mod project;
pub mod task;
pub mod user;
