// Router-level tests for authentication, the access gate and error envelopes.
//
// Every request here is decided before a handler touches the database.

mod common;

use axum::{
    body::Body,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing, Json, Router,
};
use serde_json::json;
use tower::ServiceExt;

use ott_api::auth::{self, MaybeAccount};
use ott_api::config::Environment;
use ott_api::db::models::{Account, Plan, Role, SubscriptionStatus};
use ott_api::gate::{self, AccessPolicy};
use ott_api::router::build_router;
use ott_api::state::AppState;

use common::*;

async fn call(
    state: &AppState,
    request: axum::http::Request<Body>,
) -> (StatusCode, serde_json::Value) {
    let response = build_router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    (status, json_body(response).await)
}

fn assert_denied(body: &serde_json::Value, message: &str) {
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], message);
    assert!(body.get("stack").is_none());
}

fn assert_error(body: &serde_json::Value, message: &str) {
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], message);
}

#[tokio::test]
async fn test_missing_token_returns_401() {
    let state = state(MemoryAccountStore::default());

    let (status, body) = call(&state, get("/api/auth/me", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_denied(&body, "Not authorized, no token");
}

#[tokio::test]
async fn test_lowercase_scheme_is_not_a_credential() {
    let user = account(Role::User);
    let state = state(MemoryAccountStore::with([user.clone()]));
    let token = token_for(&state, &user);

    let request = axum::http::Request::builder()
        .uri("/api/auth/me")
        .header("authorization", format!("bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(&state, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_denied(&body, "Not authorized, no token");
}

#[tokio::test]
async fn test_valid_token_reaches_handler_without_secrets() {
    let user = account(Role::User);
    let state = state(MemoryAccountStore::with([user.clone()]));
    let token = token_for(&state, &user);

    let (status, body) = call(&state, get("/api/auth/me", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], user.id.to_string());
    assert_eq!(body["data"]["email"], user.email);
    assert!(body["data"].get("password_hash").is_none());
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
async fn test_expired_token_is_not_reported_invalid() {
    let user = account(Role::User);
    let state = state(MemoryAccountStore::with([user.clone()]));
    let token = expired_token_for(&state, &user);

    let (status, body) = call(&state, get("/api/auth/me", Some(&token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_denied(&body, "Token expired");
}

#[tokio::test]
async fn test_tampered_token_is_invalid() {
    let user = account(Role::User);
    let state = state(MemoryAccountStore::with([user.clone()]));
    let token = format!("{}x", token_for(&state, &user));

    let (status, body) = call(&state, get("/api/auth/me", Some(&token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_denied(&body, "Invalid token");
}

#[tokio::test]
async fn test_unknown_subject_returns_user_not_found() {
    let state = state(MemoryAccountStore::default());
    let ghost = account(Role::User);
    let token = token_for(&state, &ghost);

    let (status, body) = call(&state, get("/api/auth/me", Some(&token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_denied(&body, "User not found");
}

#[tokio::test]
async fn test_inactive_and_blocked_accounts() {
    let inactive = Account {
        is_active: false,
        ..account(Role::User)
    };
    let blocked = Account {
        is_blocked: true,
        ..account(Role::Admin)
    };
    let state = state(MemoryAccountStore::with([inactive.clone(), blocked.clone()]));

    let token = token_for(&state, &inactive);
    let (status, body) = call(&state, get("/api/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_denied(&body, "Account is deactivated");

    let token = token_for(&state, &blocked);
    let (status, body) = call(&state, get("/api/db/validate", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_denied(&body, "Account is blocked");
}

#[tokio::test]
async fn test_role_gates() {
    let user = account(Role::User);
    let moderator = account(Role::Moderator);
    let state = state(MemoryAccountStore::with([user.clone(), moderator.clone()]));

    let token = token_for(&state, &moderator);
    let (status, body) = call(&state, get("/api/db/validate", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_denied(
        &body,
        "Role 'moderator' is not authorized to access this resource",
    );

    // Staff may read categories but writing needs admin
    let create = request(
        "POST",
        "/api/admin/categories",
        Some(&token),
        Body::from(json!({"name": "Anime"}).to_string()),
    );
    let (status, body) = call(&state, create).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_denied(
        &body,
        "Role 'moderator' is not authorized to access this resource",
    );

    let token = token_for(&state, &user);
    let (status, body) = call(&state, get("/api/admin/categories", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_denied(&body, "Role 'user' is not authorized to access this resource");
}

#[tokio::test]
async fn test_exclusive_content_denials() {
    let basic = subscriber(Plan::Basic, SubscriptionStatus::Active);
    let lapsed = subscriber(Plan::Premium, SubscriptionStatus::PastDue);
    let unverified = Account {
        is_email_verified: false,
        ..subscriber(Plan::Pro, SubscriptionStatus::Active)
    };
    let never_subscribed = account(Role::User);
    let state = state(MemoryAccountStore::with([
        basic.clone(),
        lapsed.clone(),
        unverified.clone(),
        never_subscribed.clone(),
    ]));

    let cases = [
        (&basic, "Pro plan or higher required"),
        (&lapsed, "Active subscription required"),
        (&unverified, "Please verify your email address"),
        (&never_subscribed, "Active subscription required"),
    ];

    for (viewer, message) in cases {
        let token = token_for(&state, viewer);
        let (status, body) = call(&state, get("/api/content/exclusive", Some(&token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", message);
        assert_denied(&body, message);
    }
}

#[tokio::test]
async fn test_plan_policy_admits_equal_and_premium() {
    let standard = subscriber(Plan::Standard, SubscriptionStatus::Active);
    let pro = subscriber(Plan::Pro, SubscriptionStatus::Active);
    let premium = subscriber(Plan::Premium, SubscriptionStatus::Active);
    let state = state(MemoryAccountStore::with([
        standard.clone(),
        pro.clone(),
        premium.clone(),
    ]));

    let app = Router::new()
        .route("/guarded", routing::get(|| async { "ok" }))
        .route_layer(from_fn_with_state(
            AccessPolicy::plan(Plan::Pro),
            gate::enforce,
        ))
        .route_layer(from_fn_with_state(state.clone(), auth::authenticate));

    for (viewer, expected) in [
        (&standard, StatusCode::FORBIDDEN),
        (&pro, StatusCode::OK),
        (&premium, StatusCode::OK),
    ] {
        let token = token_for(&state, viewer);
        let response = app
            .clone()
            .oneshot(get("/guarded", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), expected, "{:?}", viewer.subscription);
    }
}

#[tokio::test]
async fn test_playback_requires_subscription_then_resolves_id() {
    let never_subscribed = account(Role::User);
    let viewer = subscriber(Plan::Basic, SubscriptionStatus::Active);
    let state = state(MemoryAccountStore::with([
        never_subscribed.clone(),
        viewer.clone(),
    ]));

    let (status, body) = call(&state, get("/api/content/abc/play", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_denied(&body, "Not authorized, no token");

    let token = token_for(&state, &never_subscribed);
    let (status, body) = call(&state, get("/api/content/abc/play", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_denied(&body, "Active subscription required");

    // A malformed identifier names no title
    let token = token_for(&state, &viewer);
    let (status, body) = call(&state, get("/api/content/abc/play", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, "Resource not found");
}

fn optional_echo(state: &AppState) -> Router {
    Router::new()
        .route(
            "/whoami",
            routing::get(|MaybeAccount(account): MaybeAccount| async move {
                Json(json!({ "account": account.map(|a| a.id) }))
            }),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            auth::optional_authenticate,
        ))
}

#[tokio::test]
async fn test_optional_auth_proceeds_anonymously_on_bad_credentials() {
    let user = account(Role::User);
    let inactive = Account {
        is_active: false,
        ..account(Role::User)
    };
    let state = state(MemoryAccountStore::with([user.clone(), inactive.clone()]));
    let app = optional_echo(&state);

    let valid = token_for(&state, &user);
    let expired = expired_token_for(&state, &user);
    let deactivated = token_for(&state, &inactive);

    let cases = [
        (None, serde_json::Value::Null),
        (Some("not-a-jwt"), serde_json::Value::Null),
        (Some(expired.as_str()), serde_json::Value::Null),
        (Some(deactivated.as_str()), serde_json::Value::Null),
        (Some(valid.as_str()), json!(user.id)),
    ];

    for (token, expected) in cases {
        let response = app.clone().oneshot(get("/whoami", token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["account"], expected);
    }
}

#[tokio::test]
async fn test_optional_auth_surfaces_store_failures() {
    let state = state(MemoryAccountStore::offline());
    let user = account(Role::User);
    let token = token_for(&state, &user);

    let response = optional_echo(&state)
        .oneshot(get("/whoami", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "account store offline");
}

#[tokio::test]
async fn test_refresh_issues_verifiable_token() {
    let user = account(Role::User);
    let state = state(MemoryAccountStore::with([user.clone()]));
    let token = token_for(&state, &user);

    let (status, body) = call(
        &state,
        request("POST", "/api/auth/refresh", Some(&token), Body::empty()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "Bearer");
    let fresh = body["data"]["token"].as_str().unwrap();
    let claims = state.verifier.verify(fresh).unwrap();
    assert_eq!(claims.sub, user.id.to_string());
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let state = state(MemoryAccountStore::default());

    let (status, body) = call(&state, get("/api/nope", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, "Not Found - /api/nope");
}

#[tokio::test]
async fn test_category_body_errors_are_bad_requests() {
    let admin = account(Role::Admin);
    let state = state(MemoryAccountStore::with([admin.clone()]));
    let token = token_for(&state, &admin);

    let malformed = request(
        "POST",
        "/api/admin/categories",
        Some(&token),
        Body::from("{not json"),
    );
    let (status, body) = call(&state, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let missing_name = request(
        "POST",
        "/api/admin/categories",
        Some(&token),
        Body::from(json!({"description": "no name"}).to_string()),
    );
    let (status, body) = call(&state, missing_name).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "Category name is required");
}

async fn malformed_playback(environment: Environment) -> (StatusCode, serde_json::Value) {
    let viewer = subscriber(Plan::Basic, SubscriptionStatus::Active);
    let state = state_in(environment, MemoryAccountStore::with([viewer.clone()]));
    let token = token_for(&state, &viewer);
    call(&state, get("/api/content/abc/play", Some(&token))).await
}

#[tokio::test]
async fn test_error_stack_included_outside_production() {
    for environment in [Environment::Development, Environment::Test] {
        let (status, body) = malformed_playback(environment).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_error(&body, "Resource not found");
        let stack = body["stack"].as_str().unwrap();
        assert!(stack.contains("MalformedId"), "{}", stack);
    }
}

#[tokio::test]
async fn test_error_stack_hidden_in_production() {
    let (status, body) = malformed_playback(Environment::Production).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, "Resource not found");
    assert!(body.get("stack").is_none());

    let state = state_in(Environment::Production, MemoryAccountStore::default());
    let (status, body) = call(&state, get("/api/nope", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("stack").is_none());
}

#[tokio::test]
async fn test_denials_never_carry_stack() {
    let state = state_in(Environment::Development, MemoryAccountStore::default());
    let (status, body) = call(&state, get("/api/auth/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_denied(&body, "Not authorized, no token");
}
