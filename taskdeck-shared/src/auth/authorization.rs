/// Role guard and per-operation policy table
///
/// Every authenticated operation belongs to one category in the policy table;
/// the guard compares the identity's role against the category's minimum role.
/// The guard runs strictly after authentication succeeds; an unauthenticated
/// request never reaches it.
///
/// # Policy
///
/// | Operation | Minimum role |
/// |---|---|
/// | read own profile, list/read projects, list tasks, update task | employee |
/// | create/update project, create/delete task | manager |
/// | delete project, list all users | admin |
///
/// Updating a task intentionally requires no specific role: any authenticated
/// identity may move a task along.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::authorization::{check, Operation};
/// use taskdeck_shared::models::user::Role;
///
/// assert!(check(Role::Manager, Operation::CreateProject).is_ok());
/// assert!(check(Role::Employee, Operation::CreateProject).is_err());
/// ```

use crate::models::user::Role;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Authenticated but below the operation's minimum role
    #[error("Insufficient role: requires {required:?}, has {actual:?}")]
    InsufficientRole { required: Role, actual: Role },
}

/// Operation categories covered by the policy table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// GET /api/users/profile
    ReadProfile,
    /// GET /api/users
    ListUsers,
    /// GET /api/projects
    ListProjects,
    /// GET /api/projects/:id
    ReadProject,
    /// POST /api/projects
    CreateProject,
    /// PUT /api/projects/:id
    UpdateProject,
    /// DELETE /api/projects/:id
    DeleteProject,
    /// GET /api/projects/:id/tasks
    ListTasks,
    /// POST /api/projects/:id/tasks
    CreateTask,
    /// PUT /api/tasks/:id
    UpdateTask,
    /// DELETE /api/tasks/:id
    DeleteTask,
}

impl Operation {
    /// Minimum role required for this operation
    pub fn min_role(&self) -> Role {
        match self {
            Operation::ReadProfile
            | Operation::ListProjects
            | Operation::ReadProject
            | Operation::ListTasks
            | Operation::UpdateTask => Role::Employee,

            Operation::CreateProject
            | Operation::UpdateProject
            | Operation::CreateTask
            | Operation::DeleteTask => Role::Manager,

            Operation::DeleteProject | Operation::ListUsers => Role::Admin,
        }
    }
}

/// Checks whether a role may perform an operation
///
/// # Errors
///
/// Returns `AuthzError::InsufficientRole` when the role is below the
/// operation's minimum; the boundary maps this to 403.
pub fn check(role: Role, operation: Operation) -> Result<(), AuthzError> {
    let required = operation.min_role();

    if !role.has_permission(required) {
        return Err(AuthzError::InsufficientRole {
            required,
            actual: role,
        });
    }

    Ok(())
}
