/// Authenticator strategies behind one capability trait
///
/// Two interchangeable ways to turn verified credentials into an identity
/// assertion and back:
///
/// - [`SessionAuthenticator`]: server-held state, client holds an opaque
///   cookie reference. Logout removes the record.
/// - [`TokenAuthenticator`]: no server state, client holds a self-contained
///   signed token in a bearer header. Logout is a server-side no-op; the
///   token stays valid until its embedded expiry. This weaker revocation
///   property is part of the strategy's contract, not a bug.
///
/// Handlers depend only on `dyn Authenticator`; which variant is active is a
/// configuration switch made once at startup.

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::{Role, User};

use super::session::SessionStore;
use super::token::{self, Claims};

/// Cookie carrying the opaque session reference
pub const SESSION_COOKIE: &str = "taskdeck_session";

/// The resolved identity of an authenticated caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// User ID
    pub user_id: Uuid,

    /// Display name at issuance
    pub name: String,

    /// Email at issuance
    pub email: String,

    /// Role at issuance
    pub role: Role,
}

impl Identity {
    /// Builds an identity from a user row
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// A freshly issued credential, tagged with its delivery channel
///
/// The transport layer turns `Session` into a `Set-Cookie` header and embeds
/// `Token` in the response body.
#[derive(Debug, Clone)]
pub enum IssuedCredential {
    /// Opaque session reference, delivered as a cookie
    Session(String),

    /// Self-contained signed token, delivered in the body
    Token(String),
}

/// Error type for authentication
///
/// Every variant except `Internal` maps to a 401 at the boundary; all of them
/// fire before any guard check or resource access.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credential presented
    #[error("Missing credentials")]
    MissingCredentials,

    /// Credential present but malformed
    #[error("Malformed credentials: {0}")]
    InvalidFormat(String),

    /// Session reference unknown or expired
    #[error("Not authenticated")]
    Unauthenticated,

    /// Token failed signature or expiry checks
    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    /// Credential issuance failed
    #[error("Failed to issue credential: {0}")]
    Internal(String),
}

/// Capability interface both strategies implement
///
/// `issue` converts a verified user into a credential, `resolve` converts a
/// presented credential back into an identity, `invalidate` terminates it
/// where the strategy supports that. `credential` extracts the presented
/// credential from request headers, so callers never branch on the strategy.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Issues a credential for a freshly verified user
    async fn issue(&self, user: &User) -> Result<IssuedCredential, AuthError>;

    /// Resolves a presented credential into an identity
    async fn resolve(&self, presented: &str) -> Result<Identity, AuthError>;

    /// Invalidates a presented credential where possible
    async fn invalidate(&self, presented: &str);

    /// Extracts the presented credential from request headers
    fn credential(&self, headers: &HeaderMap) -> Result<String, AuthError>;
}

/// Stateful session strategy
///
/// Owns a handle to the injected [`SessionStore`]; all state lives there.
#[derive(Debug, Clone)]
pub struct SessionAuthenticator {
    store: SessionStore,
    ttl: Duration,
}

impl SessionAuthenticator {
    /// Creates a session authenticator over an injected store
    pub fn new(store: SessionStore, ttl: Duration) -> Self {
        Self { store, ttl }
    }
}

#[async_trait]
impl Authenticator for SessionAuthenticator {
    async fn issue(&self, user: &User) -> Result<IssuedCredential, AuthError> {
        let reference = self
            .store
            .insert(Identity::from_user(user), self.ttl)
            .await;

        Ok(IssuedCredential::Session(reference))
    }

    async fn resolve(&self, presented: &str) -> Result<Identity, AuthError> {
        self.store
            .get(presented)
            .await
            .ok_or(AuthError::Unauthenticated)
    }

    async fn invalidate(&self, presented: &str) {
        if self.store.remove(presented).await {
            tracing::debug!("session invalidated");
        }
    }

    fn credential(&self, headers: &HeaderMap) -> Result<String, AuthError> {
        parse_cookie(headers, SESSION_COOKIE).ok_or(AuthError::MissingCredentials)
    }
}

/// Stateless token strategy
///
/// Holds only the signing secret; nothing is stored per credential.
#[derive(Debug, Clone)]
pub struct TokenAuthenticator {
    secret: String,
    ttl: Duration,
}

impl TokenAuthenticator {
    /// Creates a token authenticator with the server-held signing secret
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }
}

#[async_trait]
impl Authenticator for TokenAuthenticator {
    async fn issue(&self, user: &User) -> Result<IssuedCredential, AuthError> {
        let claims = Claims::new(
            user.id,
            user.name.clone(),
            user.email.clone(),
            user.role,
            self.ttl,
        );

        let token = token::create_token(&claims, &self.secret)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(IssuedCredential::Token(token))
    }

    async fn resolve(&self, presented: &str) -> Result<Identity, AuthError> {
        let claims = token::validate_token(presented, &self.secret)
            .map_err(|_| AuthError::InvalidOrExpiredToken)?;

        Ok(Identity {
            user_id: claims.sub,
            name: claims.name,
            email: claims.email,
            role: claims.role,
        })
    }

    async fn invalidate(&self, _presented: &str) {
        // Nothing to do: the token stays valid until its embedded expiry.
    }

    fn credential(&self, headers: &HeaderMap) -> Result<String, AuthError> {
        let auth_header = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingCredentials)?;

        auth_header
            .strip_prefix("Bearer ")
            .map(str::to_string)
            .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
    }
}

/// Extracts a named cookie value from a Cookie header
fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie = headers.get(header::COOKIE)?.to_str().ok()?;

    cookie.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}
