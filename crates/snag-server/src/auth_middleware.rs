// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Request authentication middleware and extractors.
//!
//! [`auth_layer`] runs once per request: it reads the session cookie,
//! verifies the token, loads the user row, and stores an [`AuthContext`] in
//! request extensions. Everything downstream ([`RequireAuth`],
//! [`OptionalAuth`], [`require_auth_layer`]) reads that extension instead of
//! re-verifying, so a request hits the token codec and the users table at
//! most once.

use axum::{
	extract::{FromRequestParts, Request, State},
	http::{request::Parts, StatusCode},
	middleware::Next,
	response::Response,
	Json,
};
use snag_server_auth::{
	extract_session_cookie_with_name, AuthContext, CurrentUser as AuthCurrentUser,
};

use crate::api::AppState;
use crate::api_response::{self, ActionResponse};

/// Resolve the session cookie into an [`AuthContext`] request extension.
///
/// Never rejects; unauthenticated requests continue with an
/// unauthenticated context.
pub async fn auth_layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
	let ctx = resolve_auth_context(&state, req.headers()).await;
	req.extensions_mut().insert(ctx);
	next.run(req).await
}

/// Reject unauthenticated requests with a 401 envelope.
///
/// Must run after [`auth_layer`].
pub async fn require_auth_layer(
	State(_state): State<AppState>,
	req: Request,
	next: Next,
) -> Result<Response, (StatusCode, Json<ActionResponse>)> {
	let authenticated = req
		.extensions()
		.get::<AuthContext>()
		.map(|ctx| ctx.is_authenticated)
		.unwrap_or(false);

	if !authenticated {
		return Err(api_response::unauthorized("Authentication required"));
	}

	Ok(next.run(req).await)
}

async fn resolve_auth_context(state: &AppState, headers: &http::HeaderMap) -> AuthContext {
	let Some(token) =
		extract_session_cookie_with_name(headers, &state.auth_config.session_cookie_name)
	else {
		return AuthContext::unauthenticated();
	};

	let Some(user_id) = state.token_codec.verify(&token) else {
		return AuthContext::unauthenticated();
	};

	match state.users.get_by_id(&user_id).await {
		Ok(Some(user)) => AuthContext::authenticated(AuthCurrentUser::from_session(user)),
		Ok(None) => {
			tracing::debug!(user_id = %user_id, "session token for unknown user");
			AuthContext::unauthenticated()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to load session user");
			AuthContext::unauthenticated()
		}
	}
}

/// Extractor that yields the authenticated user or rejects with 401.
pub struct RequireAuth(pub AuthCurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
	S: Send + Sync,
{
	type Rejection = (StatusCode, Json<ActionResponse>);

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		parts
			.extensions
			.get::<AuthContext>()
			.and_then(|ctx| ctx.current_user.clone())
			.map(RequireAuth)
			.ok_or_else(|| api_response::unauthorized("Authentication required"))
	}
}

/// Extractor that yields the authenticated user when present.
pub struct OptionalAuth(pub Option<AuthCurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
	S: Send + Sync,
{
	type Rejection = std::convert::Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		Ok(OptionalAuth(
			parts
				.extensions
				.get::<AuthContext>()
				.and_then(|ctx| ctx.current_user.clone()),
		))
	}
}
