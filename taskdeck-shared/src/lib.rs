//! # Taskdeck Shared Library
//!
//! This crate contains the domain models, persistence operations, and
//! authentication/authorization primitives shared by the Taskdeck API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, projects, tasks) and their CRUD operations
//! - `auth`: Credential verification, authenticator strategies, and the role guard
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Taskdeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
