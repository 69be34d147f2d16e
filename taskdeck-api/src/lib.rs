/// Taskdeck API server
///
/// HTTP boundary for the project and task tracker: routing, authentication
/// middleware, request validation, and error mapping. Domain models and the
/// authenticator strategies live in `taskdeck-shared`.

pub mod app;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use chrono::Duration;
use taskdeck_shared::auth::authenticator::{
    Authenticator, SessionAuthenticator, TokenAuthenticator,
};
use taskdeck_shared::auth::session::SessionStore;

use config::{AuthConfig, AuthStrategy, ConfigError};

/// Builds the configured authenticator strategy
///
/// Called once at startup; everything downstream sees only the trait object.
///
/// # Errors
///
/// Returns an error if the token strategy is selected without a signing
/// secret. `Config::from_env` already rejects that combination, so this only
/// fires for hand-built configs.
pub fn build_authenticator(auth: &AuthConfig) -> Result<Arc<dyn Authenticator>, ConfigError> {
    let ttl = Duration::hours(auth.ttl_hours);

    match auth.strategy {
        AuthStrategy::Session => Ok(Arc::new(SessionAuthenticator::new(
            SessionStore::new(),
            ttl,
        ))),
        AuthStrategy::Token => {
            let secret = auth
                .jwt_secret
                .as_deref()
                .ok_or_else(|| ConfigError::MissingVar("JWT_SECRET".to_string()))?;

            Ok(Arc::new(TokenAuthenticator::new(secret, ttl)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_session_authenticator() {
        let auth = AuthConfig {
            strategy: AuthStrategy::Session,
            jwt_secret: None,
            ttl_hours: 24,
        };
        assert!(build_authenticator(&auth).is_ok());
    }

    #[test]
    fn test_build_token_authenticator_requires_secret() {
        let auth = AuthConfig {
            strategy: AuthStrategy::Token,
            jwt_secret: None,
            ttl_hours: 24,
        };
        assert!(build_authenticator(&auth).is_err());

        let auth = AuthConfig {
            strategy: AuthStrategy::Token,
            jwt_secret: Some("test-secret-key-at-least-32-bytes-long".to_string()),
            ttl_hours: 24,
        };
        assert!(build_authenticator(&auth).is_ok());
    }
}
