/// Integration tests for the authentication and authorization boundary
///
/// These run the real router with the real middleware and both authenticator
/// strategies, verifying:
/// - requests without credentials never reach a handler
/// - role guards reject before any resource access
/// - session logout invalidates the reference, token logout does not
/// - validation failures are reported before touching the database

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::TestContext;
use serde_json::json;
use taskdeck_shared::models::user::Role;
use tower::ServiceExt as _;

#[tokio::test]
async fn test_health_is_public() {
    let ctx = TestContext::session();

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_credentials_rejected() {
    for ctx in [TestContext::session(), TestContext::token()] {
        let request = Request::builder()
            .method("GET")
            .uri("/api/projects")
            .body(Body::empty())
            .unwrap();

        let response = ctx.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_malformed_authorization_header_rejected() {
    let ctx = TestContext::token();

    let request = Request::builder()
        .method("GET")
        .uri("/api/projects")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let ctx = TestContext::token();

    let request = Request::builder()
        .method("GET")
        .uri("/api/projects")
        .header(header::AUTHORIZATION, "Bearer not.a.token")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_session_reference_rejected() {
    let ctx = TestContext::session();

    let request = Request::builder()
        .method("GET")
        .uri("/api/projects")
        .header(header::COOKIE, common::cookie_header("deadbeef"))
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_employee_cannot_create_project() {
    let ctx = TestContext::session();
    let reference = common::session_reference(ctx.issue_for_role(Role::Employee).await);

    let request = Request::builder()
        .method("POST")
        .uri("/api/projects")
        .header(header::COOKIE, common::cookie_header(&reference))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "name": "Launch" }).to_string()))
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_manager_cannot_delete_project() {
    let ctx = TestContext::token();
    let token = common::token_value(ctx.issue_for_role(Role::Manager).await);

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/projects/5d6a7a3e-0d0b-4df1-9f6e-0a4e1f3b2c1d")
        .header(header::AUTHORIZATION, common::bearer_header(&token))
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_employee_cannot_list_users() {
    let ctx = TestContext::token();
    let token = common::token_value(ctx.issue_for_role(Role::Employee).await);

    let request = Request::builder()
        .method("GET")
        .uri("/api/users")
        .header(header::AUTHORIZATION, common::bearer_header(&token))
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_session_logout_invalidates_reference() {
    let ctx = TestContext::session();
    let reference = common::session_reference(ctx.issue_for_role(Role::Manager).await);

    let request = Request::builder()
        .method("POST")
        .uri("/api/logout")
        .header(header::COOKIE, common::cookie_header(&reference))
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Logout clears the cookie
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("logout should clear the session cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("Max-Age=0"));

    // The same reference no longer authenticates
    let request = Request::builder()
        .method("GET")
        .uri("/api/projects")
        .header(header::COOKIE, common::cookie_header(&reference))
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_logout_leaves_token_valid() {
    let ctx = TestContext::token();
    let token = common::token_value(ctx.issue_for_role(Role::Employee).await);

    let request = Request::builder()
        .method("POST")
        .uri("/api/logout")
        .header(header::AUTHORIZATION, common::bearer_header(&token))
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The token still authenticates: 403 from the guard, not 401
    let request = Request::builder()
        .method("POST")
        .uri("/api/projects")
        .header(header::AUTHORIZATION, common::bearer_header(&token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "name": "Launch" }).to_string()))
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_register_validation_failure_is_422() {
    let ctx = TestContext::session();

    let request = Request::builder()
        .method("POST")
        .uri("/api/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "name": "Alice",
                "email": "not-an-email",
                "password": "short"
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let response_json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(response_json["error"], "validation_error");
    let details = response_json["details"].as_array().unwrap();
    assert_eq!(details.len(), 2);
}

#[tokio::test]
async fn test_register_unknown_role_rejected() {
    let ctx = TestContext::session();

    let request = Request::builder()
        .method("POST")
        .uri("/api/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({
                "name": "Alice",
                "email": "alice@example.com",
                "password": "password123",
                "role": "superuser"
            })
            .to_string(),
        ))
        .unwrap();

    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
