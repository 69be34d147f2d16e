/// User routes: profile and user listing

use axum::{extract::State, Extension, Json};

use taskdeck_shared::auth::authenticator::Identity;
use taskdeck_shared::auth::authorization::{check, Operation};
use taskdeck_shared::models::user::User;

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};

/// GET /api/users/profile
///
/// Returns the caller's own account, fetched fresh from the database so role
/// or name changes since credential issuance are reflected. 404 if the
/// account was deleted while the credential was still live.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<User>> {
    check(identity.role, Operation::ReadProfile)?;

    let user = User::find_by_id(&state.db, identity.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// GET /api/users
///
/// Lists all users. Admin only.
pub async fn list_users(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<Vec<User>>> {
    check(identity.role, Operation::ListUsers)?;

    let users = User::list(&state.db).await?;

    Ok(Json(users))
}
