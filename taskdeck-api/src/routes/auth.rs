/// Authentication routes: register, login, logout
///
/// Login failures are deliberately uniform: an unknown email and a wrong
/// password return the same 401 body, so the endpoint cannot be used to probe
/// which addresses have accounts.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use taskdeck_shared::auth::authenticator::{IssuedCredential, SESSION_COOKIE};
use taskdeck_shared::auth::password::{hash_password, verify_password};
use taskdeck_shared::models::user::{CreateUser, Role, User};

use crate::app::{AppState, PresentedCredential};
use crate::error::{ApiError, ApiResult};

/// Request body for POST /api/register
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Email address, must be unused
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    /// Plaintext password, hashed before storage
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Role for the new account, defaults to employee
    #[serde(default)]
    pub role: Option<Role>,
}

/// Request body for POST /api/login
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// POST /api/register
///
/// Creates a new user account. The password is hashed with Argon2id; the
/// plaintext is never stored. Returns 201 with the created user (without the
/// hash), 409 if the email is already registered, 422 on validation failure.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Response> {
    req.validate()?;

    let password_hash = hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
            role: req.role.unwrap_or_default(),
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, role = %user.role.as_str(), "user registered");

    Ok((StatusCode::CREATED, Json(user)).into_response())
}

/// POST /api/login
///
/// Verifies the password and issues a credential via the active strategy.
/// Session credentials go out as an HttpOnly cookie, token credentials in the
/// response body; the user object is returned either way.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Response> {
    req.validate()?;

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    let issued = state.authenticator.issue(&user).await?;

    tracing::info!(user_id = %user.id, "user logged in");

    let response = match issued {
        IssuedCredential::Session(reference) => {
            let max_age = state.config.auth.ttl_hours * 3600;
            let cookie = format!(
                "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
                SESSION_COOKIE, reference, max_age
            );

            (
                [(header::SET_COOKIE, cookie)],
                Json(json!({ "user": user })),
            )
                .into_response()
        }
        IssuedCredential::Token(token) => {
            Json(json!({ "token": token, "user": user })).into_response()
        }
    };

    Ok(response)
}

/// POST /api/logout
///
/// Invalidates the presented credential. Under the session strategy the
/// server-side record is removed and the same reference stops resolving;
/// under the token strategy this is an acknowledged no-op and the token
/// remains valid until expiry. The session cookie is cleared either way.
pub async fn logout(
    State(state): State<AppState>,
    Extension(credential): Extension<PresentedCredential>,
) -> ApiResult<Response> {
    state.authenticator.invalidate(&credential.0).await;

    let clear_cookie = format!("{}=; HttpOnly; Path=/; Max-Age=0", SESSION_COOKIE);

    Ok((
        [(header::SET_COOKIE, clear_cookie)],
        Json(json!({ "message": "Logged out" })),
    )
        .into_response())
}
