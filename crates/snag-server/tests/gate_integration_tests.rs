// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integration tests for the page-navigation route gate.
//!
//! Unauthenticated requests to app pages are redirected to the login page
//! with the original path preserved; API paths and public pages pass through
//! and answer for themselves.

use axum::{
	body::Body,
	http::{header::LOCATION, Request, StatusCode},
};
use snag_server::{create_app_state, create_router, ServerConfig};
use tempfile::tempdir;
use tower::ServiceExt;

async fn setup_test_app() -> (axum::Router, tempfile::TempDir) {
	let dir = tempdir().unwrap();
	let db_path = dir.path().join("test_gate.db");
	let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
	let pool = snag_server_db::create_pool(&db_url).await.unwrap();
	snag_server_db::run_migrations(&pool).await.unwrap();
	let mut config = ServerConfig::default();
	config.auth.jwt_secret = "test-secret".to_string();
	let state = create_app_state(pool, &config);
	(create_router(state), dir)
}

async fn register_and_get_cookie(app: &axum::Router) -> String {
	let body = serde_json::json!({
		"username": "alice",
		"email": "alice@example.com",
		"password": "password123"
	});
	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.uri("/api/auth/register")
				.method("POST")
				.header("content-type", "application/json")
				.body(Body::from(body.to_string()))
				.unwrap(),
		)
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::CREATED);
	response
		.headers()
		.get("set-cookie")
		.unwrap()
		.to_str()
		.unwrap()
		.split(';')
		.next()
		.unwrap()
		.to_string()
}

#[tokio::test]
async fn test_page_navigation_without_session_redirects_to_login() {
	let (app, _dir) = setup_test_app().await;

	let response = app
		.oneshot(
			Request::builder()
				.uri("/dashboard")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(
		response.headers().get(LOCATION).unwrap(),
		"/login?next=/dashboard"
	);
}

#[tokio::test]
async fn test_redirect_preserves_query_worthy_characters() {
	let (app, _dir) = setup_test_app().await;

	let response = app
		.oneshot(
			Request::builder()
				.uri("/issues/42")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(
		response.headers().get(LOCATION).unwrap(),
		"/login?next=/issues/42"
	);
}

#[tokio::test]
async fn test_invalid_token_still_redirects() {
	let (app, _dir) = setup_test_app().await;

	let response = app
		.oneshot(
			Request::builder()
				.uri("/dashboard")
				.header("cookie", "auth_token=tampered.jwt.value")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_public_pages_are_not_redirected() {
	let (app, _dir) = setup_test_app().await;

	for path in ["/", "/login", "/register", "/health"] {
		let response = app
			.clone()
			.oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
			.await
			.unwrap();
		assert_ne!(
			response.status(),
			StatusCode::SEE_OTHER,
			"{path} should not redirect"
		);
	}
}

#[tokio::test]
async fn test_api_paths_answer_with_status_codes_not_redirects() {
	let (app, _dir) = setup_test_app().await;

	let response = app
		.oneshot(
			Request::builder()
				.uri("/api/issues")
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();

	// API callers get a JSON 401, never a login redirect
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	let body = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
	assert_eq!(json["success"], false);
	assert_eq!(json["message"], "Authentication required");
}

#[tokio::test]
async fn test_valid_session_passes_the_gate() {
	let (app, _dir) = setup_test_app().await;
	let cookie = register_and_get_cookie(&app).await;

	let response = app
		.oneshot(
			Request::builder()
				.uri("/dashboard")
				.header("cookie", &cookie)
				.body(Body::empty())
				.unwrap(),
		)
		.await
		.unwrap();

	// No route serves /dashboard here, but the gate must let it through
	assert_ne!(response.status(), StatusCode::SEE_OTHER);
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_asset_prefixes_bypass_the_gate() {
	let (app, _dir) = setup_test_app().await;

	for path in ["/assets/app.js", "/public/logo.svg", "/favicon.ico"] {
		let response = app
			.clone()
			.oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
			.await
			.unwrap();
		assert_ne!(
			response.status(),
			StatusCode::SEE_OTHER,
			"{path} should not redirect"
		);
	}
}
