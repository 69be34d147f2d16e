/// Stateless signed tokens (JWT, HS256)
///
/// The token strategy embeds the whole identity in a signed claim set so no
/// server-side lookup is needed to resolve it. The role in the claims is the
/// role at issuance time; a token can never resolve to a higher role than it
/// was issued with, because the claims are covered by the signature.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::token::{create_token, validate_token, Claims};
/// use taskdeck_shared::models::user::Role;
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(
///     Uuid::new_v4(),
///     "Alice".to_string(),
///     "alice@example.com".to_string(),
///     Role::Manager,
///     Duration::hours(24),
/// );
/// let secret = "a-secret-key-that-is-at-least-32-bytes";
/// let token = create_token(&claims, secret)?;
///
/// let resolved = validate_token(&token, secret)?;
/// assert_eq!(resolved.role, Role::Manager);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::Role;

const ISSUER: &str = "taskdeck";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to sign a token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature mismatch, wrong issuer, or malformed token
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// Signed claim set embedded in every token
///
/// Standard claims (`sub`, `iss`, `iat`, `exp`) plus the identity fields the
/// server would otherwise have to look up per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user ID
    pub sub: Uuid,

    /// Issuer, always "taskdeck"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Display name at issuance
    pub name: String,

    /// Email at issuance
    pub email: String,

    /// Role at issuance; never upgradable after the fact
    pub role: Role,
}

impl Claims {
    /// Creates a claim set expiring `ttl` from now
    pub fn new(user_id: Uuid, name: String, email: String, role: Role, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            name,
            email,
            role,
        }
    }

    /// Checks if the claim set has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs a claim set with HS256
///
/// # Errors
///
/// Returns `TokenError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies a token's signature, expiry, and issuer, returning its claims
///
/// No server-side state is consulted; the claims are trusted because the
/// signature covers them.
///
/// # Errors
///
/// Returns `TokenError::Expired` past the embedded expiry and
/// `TokenError::Invalid` on any signature, issuer, or format problem.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn sample_claims(role: Role, ttl: Duration) -> Claims {
        Claims::new(
            Uuid::new_v4(),
            "Alice".to_string(),
            "alice@example.com".to_string(),
            role,
            ttl,
        )
    }

    #[test]
    fn test_create_and_validate_token() {
        let claims = sample_claims(Role::Manager, Duration::hours(24));
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, claims.sub);
        assert_eq!(validated.email, "alice@example.com");
        assert_eq!(validated.role, Role::Manager);
        assert_eq!(validated.iss, "taskdeck");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = sample_claims(Role::Employee, Duration::hours(1));
        let token = create_token(&claims, SECRET).unwrap();

        assert!(validate_token(&token, "a-completely-different-secret-key").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = sample_claims(Role::Employee, Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).unwrap();
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let result = validate_token("not.a.jwt", SECRET);
        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_role_fixed_at_issuance() {
        // Resolving yields exactly the role the token was issued with, and a
        // payload swap from another token fails the signature check.
        let employee = sample_claims(Role::Employee, Duration::hours(1));
        let employee_token = create_token(&employee, SECRET).unwrap();
        assert_eq!(
            validate_token(&employee_token, SECRET).unwrap().role,
            Role::Employee
        );

        let admin = sample_claims(Role::Admin, Duration::hours(1));
        let admin_token = create_token(&admin, SECRET).unwrap();

        // Graft the admin payload onto the employee token's signature
        let employee_parts: Vec<&str> = employee_token.split('.').collect();
        let admin_parts: Vec<&str> = admin_token.split('.').collect();
        let forged = format!(
            "{}.{}.{}",
            employee_parts[0], admin_parts[1], employee_parts[2]
        );

        assert!(validate_token(&forged, SECRET).is_err());
    }
}
