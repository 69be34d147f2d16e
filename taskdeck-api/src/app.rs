/// Application state and router construction
///
/// Wires the route tree, shared state, and the authentication middleware.
/// Everything under `/api/` except register and login requires a resolved
/// identity; the middleware rejects with 401 before any handler runs.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskdeck_shared::auth::authenticator::Authenticator;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::error::ApiError;
use crate::routes;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Active authentication strategy
    pub authenticator: Arc<dyn Authenticator>,
}

/// The credential string a request presented, as extracted from its headers
///
/// Stashed in request extensions by the middleware so logout can invalidate
/// the exact credential that authenticated the request.
#[derive(Clone)]
pub struct PresentedCredential(pub String);

/// Builds the complete API router
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/logout", post(routes::auth::logout))
        .route("/api/users/profile", get(routes::users::get_profile))
        .route("/api/users", get(routes::users::list_users))
        .route(
            "/api/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/api/projects/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/api/projects/:id/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/api/tasks/:id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/register", post(routes::auth::register))
        .route("/api/login", post(routes::auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Authentication middleware
///
/// Extracts the credential from the request headers, resolves it to an
/// identity, and inserts both into request extensions. Any failure short
/// circuits with 401 (or 500 for internal faults) without reaching the
/// handler.
async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = state.authenticator.credential(&headers)?;
    let identity = state.authenticator.resolve(&presented).await?;

    tracing::debug!(user_id = %identity.user_id, role = %identity.role.as_str(), "request authenticated");

    request.extensions_mut().insert(identity);
    request
        .extensions_mut()
        .insert(PresentedCredential(presented));

    Ok(next.run(request).await)
}
