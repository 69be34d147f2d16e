/// Common test utilities for integration tests
///
/// Builds the full router against a lazy database pool: no connection is made
/// until a handler actually queries. Authentication and authorization both
/// run before any query, so those paths are exercised end-to-end here without
/// a live database. Credentials are issued directly through the
/// authenticator, sidestepping the login endpoint (which would need user
/// rows).

use std::sync::Arc;

use axum::Router;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use taskdeck_api::app::{build_router, AppState};
use taskdeck_api::config::{ApiConfig, AuthConfig, AuthStrategy, Config, DatabaseConfig};
use taskdeck_shared::auth::authenticator::{
    Authenticator, IssuedCredential, SessionAuthenticator, TokenAuthenticator, SESSION_COOKIE,
};
use taskdeck_shared::auth::session::SessionStore;
use taskdeck_shared::models::user::{Role, User};

pub const TEST_SECRET: &str = "integration-test-secret-32-bytes-min";

/// Test context holding the router and the live authenticator
pub struct TestContext {
    pub app: Router,
    pub authenticator: Arc<dyn Authenticator>,
}

impl TestContext {
    /// Builds a context running the session strategy
    pub fn session() -> Self {
        let authenticator: Arc<dyn Authenticator> = Arc::new(SessionAuthenticator::new(
            SessionStore::new(),
            Duration::hours(24),
        ));
        Self::with_authenticator(authenticator, AuthStrategy::Session)
    }

    /// Builds a context running the token strategy
    pub fn token() -> Self {
        let authenticator: Arc<dyn Authenticator> =
            Arc::new(TokenAuthenticator::new(TEST_SECRET, Duration::hours(24)));
        Self::with_authenticator(authenticator, AuthStrategy::Token)
    }

    fn with_authenticator(authenticator: Arc<dyn Authenticator>, strategy: AuthStrategy) -> Self {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/taskdeck_test".to_string(),
                max_connections: 1,
            },
            auth: AuthConfig {
                strategy,
                jwt_secret: Some(TEST_SECRET.to_string()),
                ttl_hours: 24,
            },
        };

        // Lazy pool: connects only if a handler queries, which these tests avoid
        let db = PgPool::connect_lazy(&config.database.url)
            .expect("lazy pool construction should not fail");

        let state = AppState {
            db,
            config: Arc::new(config),
            authenticator: authenticator.clone(),
        };

        TestContext {
            app: build_router(state),
            authenticator,
        }
    }

    /// Issues a credential for a synthetic user with the given role
    pub async fn issue_for_role(&self, role: Role) -> IssuedCredential {
        let user = User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: format!("test-{}@example.com", Uuid::new_v4()),
            password_hash: "unused".to_string(),
            role,
            created_at: Utc::now(),
        };

        self.authenticator
            .issue(&user)
            .await
            .expect("issuing a credential should succeed")
    }
}

/// Formats a session reference as a Cookie header value
pub fn cookie_header(reference: &str) -> String {
    format!("{}={}", SESSION_COOKIE, reference)
}

/// Formats a token as an Authorization header value
pub fn bearer_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Unwraps a session credential
pub fn session_reference(issued: IssuedCredential) -> String {
    match issued {
        IssuedCredential::Session(reference) => reference,
        IssuedCredential::Token(_) => panic!("expected a session credential"),
    }
}

/// Unwraps a token credential
pub fn token_value(issued: IssuedCredential) -> String {
    match issued {
        IssuedCredential::Token(token) => token,
        IssuedCredential::Session(_) => panic!("expected a token credential"),
    }
}
