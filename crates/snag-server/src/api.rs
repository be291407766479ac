// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use axum::{
	middleware::from_fn_with_state,
	routing::{get, post},
	Router,
};
use snag_server_auth::{AuthConfig, TokenCodec};
use snag_server_auth_google::{GoogleOAuthClient, GoogleOAuthConfig};
use snag_server_config::ServerConfig;
use snag_server_db::{CommentRepository, IssueRepository, UserRepository};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth_middleware::{auth_layer, require_auth_layer};
use crate::route_gate::RouteGate;
use crate::routes;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub users: UserRepository,
	pub issues: IssueRepository,
	pub comments: CommentRepository,
	pub token_codec: Arc<TokenCodec>,
	pub auth_config: AuthConfig,
	pub google_oauth: Option<Arc<GoogleOAuthClient>>,
}

/// Build the application state from configuration.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> AppState {
	let token_codec = Arc::new(TokenCodec::new(
		&config.auth.jwt_secret,
		config.auth.session_ttl_secs,
	));

	let auth_config = AuthConfig::new()
		.with_session_ttl_secs(config.auth.session_ttl_secs)
		.with_secure_cookies(config.auth.is_production());

	let google_oauth = initialize_google_oauth(config);

	AppState {
		users: UserRepository::new(pool.clone()),
		issues: IssueRepository::new(pool.clone()),
		comments: CommentRepository::new(pool.clone()),
		pool,
		token_codec,
		auth_config,
		google_oauth,
	}
}

/// Initialize the Google OAuth client if configured.
fn initialize_google_oauth(config: &ServerConfig) -> Option<Arc<GoogleOAuthClient>> {
	match &config.oauth.google {
		Some(google) => {
			tracing::info!("Google OAuth configured");
			Some(Arc::new(GoogleOAuthClient::new(GoogleOAuthConfig {
				client_id: google.client_id.clone(),
				client_secret: google.client_secret.clone(),
				redirect_uri: google.redirect_uri.clone(),
			})))
		}
		None => {
			tracing::info!("Google OAuth not configured");
			None
		}
	}
}

/// Create the API router with all routes.
pub fn create_router(state: AppState) -> Router {
	// Public routes - no authentication required
	let public = Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api/auth/register", post(routes::auth::register))
		.route("/api/auth/login", post(routes::auth::login))
		.route("/api/auth/google", post(routes::auth::google))
		.route("/api/me", get(routes::me::get_me));

	// Authenticated routes - require a valid session
	let authed = Router::new()
		.route("/api/auth/logout", post(routes::auth::logout))
		.route(
			"/api/issues",
			post(routes::issues::create_issue).get(routes::issues::list_issues),
		)
		.route(
			"/api/issues/{id}",
			get(routes::issues::get_issue)
				.patch(routes::issues::update_issue)
				.delete(routes::issues::delete_issue),
		)
		.route(
			"/api/issues/{id}/status",
			post(routes::issues::change_issue_status),
		)
		.route(
			"/api/issues/{id}/comments",
			post(routes::comments::create_comment).get(routes::comments::list_comments),
		)
		.layer(from_fn_with_state(state.clone(), require_auth_layer));

	let gate = RouteGate::new(
		Arc::clone(&state.token_codec),
		state.auth_config.session_cookie_name.clone(),
	);

	Router::new()
		.merge(public)
		.merge(authed)
		.layer(from_fn_with_state(state.clone(), auth_layer))
		.layer(gate)
		.with_state(state)
}
