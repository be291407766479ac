// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Authentication HTTP handlers: register, login, logout, Google sign-in.
//!
//! All success paths end the same way: sign a session token and set the
//! session cookie. Login failures are deliberately indistinguishable between
//! an unknown email and a wrong password.

use axum::{
	extract::State,
	http::{header::SET_COOKIE, StatusCode},
	response::{IntoResponse, Response},
	Json,
};
use serde::Deserialize;
use snag_server_auth::{
	build_clear_cookie, build_session_cookie, hash_password, username_from_display_name,
	verify_password, UserId,
};
use snag_server_db::{DbError, NewUser};

use crate::api::AppState;
use crate::api_response::{self, ActionResponse};
use crate::auth_middleware::RequireAuth;
use crate::validation::{sanitize_email, validate_login, validate_registration};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
	pub username: String,
	pub email: String,
	pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
	pub email: String,
	pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct GoogleAuthRequest {
	pub code: String,
}

/// POST /api/auth/register
pub async fn register(
	State(state): State<AppState>,
	Json(payload): Json<RegisterRequest>,
) -> Response {
	let email = sanitize_email(&payload.email);
	if let Err(errors) = validate_registration(&payload.username, &email, &payload.password) {
		return api_response::validation_failed(errors).into_response();
	}

	let password_hash = match hash_password(&payload.password) {
		Ok(hash) => hash,
		Err(e) => {
			tracing::error!(error = %e, "failed to hash password");
			return api_response::internal_error().into_response();
		}
	};

	let new_user = NewUser {
		username: payload.username,
		email,
		password_hash: Some(password_hash),
		google_id: None,
		avatar_url: None,
	};

	let user = match state.users.create(&new_user).await {
		Ok(user) => user,
		Err(DbError::Conflict(_)) => {
			return api_response::bad_request("User with this email already exists")
				.into_response();
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to create user");
			return api_response::internal_error().into_response();
		}
	};

	tracing::info!(user_id = %user.id, "user registered");
	respond_with_session(&state, user.id, StatusCode::CREATED, "Registration successful")
}

/// POST /api/auth/login
pub async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> Response {
	let email = sanitize_email(&payload.email);
	if let Err(errors) = validate_login(&email, &payload.password) {
		return api_response::validation_failed(errors).into_response();
	}

	let user = match state.users.get_by_email(&email).await {
		Ok(Some(user)) => user,
		Ok(None) => {
			return api_response::unauthorized("Invalid credentials").into_response();
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to look up user for login");
			return api_response::internal_error().into_response();
		}
	};

	// OAuth-only accounts have no hash; they fail the same way as a wrong
	// password.
	let verified = user
		.password_hash
		.as_deref()
		.map(|hash| verify_password(&payload.password, hash))
		.unwrap_or(false);

	if !verified {
		return api_response::unauthorized("Invalid credentials").into_response();
	}

	tracing::info!(user_id = %user.id, "user logged in");
	respond_with_session(&state, user.id, StatusCode::OK, "Login successful")
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>, RequireAuth(current_user): RequireAuth) -> Response {
	tracing::info!(user_id = %current_user.user.id, "user logged out");
	let cookie = build_clear_cookie(&state.auth_config);
	(
		StatusCode::OK,
		[(SET_COOKIE, cookie)],
		Json(ActionResponse::success("Logged out")),
	)
		.into_response()
}

/// POST /api/auth/google
///
/// Exchanges an authorization code, then reconciles the Google profile
/// against existing accounts: match by email or Google ID, link when the
/// match has no Google ID yet, create a password-less account otherwise.
pub async fn google(
	State(state): State<AppState>,
	Json(payload): Json<GoogleAuthRequest>,
) -> Response {
	let Some(client) = state.google_oauth.as_ref() else {
		return api_response::not_implemented("Google sign-in is not configured").into_response();
	};

	let info = match client.exchange_code(&payload.code).await {
		Ok(info) => info,
		Err(e) => {
			tracing::debug!(error = %e, "google code exchange failed");
			return api_response::unauthorized("Google authentication failed").into_response();
		}
	};

	let email = sanitize_email(&info.email);

	let existing = match state.users.find_by_email_or_google_id(&email, &info.sub).await {
		Ok(existing) => existing,
		Err(e) => {
			tracing::error!(error = %e, "failed to reconcile google identity");
			return api_response::internal_error().into_response();
		}
	};

	let user_id = match existing {
		Some(user) => {
			if user.google_id.is_none() {
				if let Err(e) = state
					.users
					.link_google_identity(&user.id, &info.sub, info.picture.as_deref())
					.await
				{
					tracing::error!(error = %e, "failed to link google identity");
					return api_response::internal_error().into_response();
				}
				tracing::info!(user_id = %user.id, "google identity linked to existing account");
			}
			user.id
		}
		None => {
			let username = info
				.name
				.as_deref()
				.map(username_from_display_name)
				.unwrap_or_else(|| {
					username_from_display_name(email.split('@').next().unwrap_or("user"))
				});

			let new_user = NewUser {
				username,
				email,
				password_hash: None,
				google_id: Some(info.sub.clone()),
				avatar_url: info.picture.clone(),
			};

			match state.users.create(&new_user).await {
				Ok(user) => {
					tracing::info!(user_id = %user.id, "account created from google sign-in");
					user.id
				}
				Err(e) => {
					tracing::error!(error = %e, "failed to create user from google sign-in");
					return api_response::internal_error().into_response();
				}
			}
		}
	};

	respond_with_session(&state, user_id, StatusCode::OK, "Login successful")
}

/// Sign a session token and answer with the Set-Cookie header attached.
fn respond_with_session(
	state: &AppState,
	user_id: UserId,
	status: StatusCode,
	message: &str,
) -> Response {
	let token = match state.token_codec.sign(user_id) {
		Ok(token) => token,
		Err(e) => {
			tracing::error!(error = %e, "failed to sign session token");
			return api_response::internal_error().into_response();
		}
	};

	let cookie = build_session_cookie(&state.auth_config, &token);
	(
		status,
		[(SET_COOKIE, cookie)],
		Json(ActionResponse::success(message)),
	)
		.into_response()
}
