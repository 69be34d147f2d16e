/// API route handlers
///
/// - `health`: liveness endpoint
/// - `auth`: register, login, logout
/// - `users`: profile and user listing
/// - `projects`: project CRUD
/// - `tasks`: task CRUD within projects

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;
