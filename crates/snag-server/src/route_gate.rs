// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Navigation route gate.
//!
//! A Tower layer applied ahead of the router that redirects unauthenticated
//! page navigation to the login screen. API and asset paths are exempt: API
//! routes enforce auth themselves and answer 401 rather than redirecting.
//!
//! The gate checks only that the session cookie carries a verifiable token
//! (signature and expiry); it never touches the database. A token for a
//! since-deleted user passes the gate and is then treated as unauthenticated
//! by the API layer.

use axum::{
	body::Body,
	http::{header::LOCATION, Request, StatusCode},
	response::{IntoResponse, Response},
};
use pin_project_lite::pin_project;
use snag_server_auth::TokenCodec;
use std::{
	future::Future,
	pin::Pin,
	sync::Arc,
	task::{Context, Poll},
};
use tower::{Layer, Service};

/// Paths that are public as exact matches.
const PUBLIC_PATHS: &[&str] = &["/", "/login", "/register", "/health"];

/// Path prefixes that bypass the gate entirely.
const PUBLIC_PREFIXES: &[&str] = &["/api", "/assets", "/public", "/favicon.ico"];

/// Returns true when the gate does not apply to this path.
pub fn is_public_path(path: &str) -> bool {
	PUBLIC_PATHS.contains(&path) || PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Tower layer that redirects unauthenticated page navigation to `/login`.
#[derive(Clone)]
pub struct RouteGate {
	codec: Arc<TokenCodec>,
	cookie_name: String,
}

impl RouteGate {
	/// Create a gate that validates tokens with the given codec.
	pub fn new(codec: Arc<TokenCodec>, cookie_name: impl Into<String>) -> Self {
		Self {
			codec,
			cookie_name: cookie_name.into(),
		}
	}
}

impl<S> Layer<S> for RouteGate {
	type Service = RouteGateService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		RouteGateService {
			inner,
			codec: Arc::clone(&self.codec),
			cookie_name: self.cookie_name.clone(),
		}
	}
}

/// Service wrapper for [`RouteGate`].
#[derive(Clone)]
pub struct RouteGateService<S> {
	inner: S,
	codec: Arc<TokenCodec>,
	cookie_name: String,
}

impl<S> Service<Request<Body>> for RouteGateService<S>
where
	S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
	S::Future: Send,
{
	type Response = Response;
	type Error = S::Error;
	type Future = RouteGateFuture<S::Future>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let path = req.uri().path();

		if is_public_path(path) {
			return RouteGateFuture::Inner {
				fut: self.inner.call(req),
			};
		}

		let has_valid_token =
			snag_server_auth::extract_session_cookie_with_name(req.headers(), &self.cookie_name)
				.and_then(|token| self.codec.verify(&token))
				.is_some();

		if has_valid_token {
			return RouteGateFuture::Inner {
				fut: self.inner.call(req),
			};
		}

		tracing::debug!(path, "gate redirecting unauthenticated navigation");
		RouteGateFuture::Redirected {
			resp: Some(login_redirect(path)),
		}
	}
}

pin_project! {
	/// Future for [`RouteGateService`].
	#[project = RouteGateFutureProj]
	pub enum RouteGateFuture<F> {
		Inner { #[pin] fut: F },
		Redirected { resp: Option<Response> },
	}
}

impl<F, E> Future for RouteGateFuture<F>
where
	F: Future<Output = Result<Response, E>>,
{
	type Output = Result<Response, E>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match self.project() {
			RouteGateFutureProj::Inner { fut } => fut.poll(cx),
			RouteGateFutureProj::Redirected { resp } => {
				Poll::Ready(Ok(resp.take().expect("polled after completion")))
			}
		}
	}
}

/// 303 See Other to `/login?next={path}`, preserving the attempted path.
fn login_redirect(path: &str) -> Response {
	let location = format!("/login?next={}", encode_query_value(path));
	Response::builder()
		.status(StatusCode::SEE_OTHER)
		.header(LOCATION, location)
		.body(Body::empty())
		.unwrap_or_else(|_| StatusCode::SEE_OTHER.into_response())
}

/// Percent-encode the characters that would break a query-string value.
fn encode_query_value(value: &str) -> String {
	let mut out = String::with_capacity(value.len());
	for ch in value.chars() {
		match ch {
			'%' => out.push_str("%25"),
			'?' => out.push_str("%3F"),
			'&' => out.push_str("%26"),
			'=' => out.push_str("%3D"),
			'#' => out.push_str("%23"),
			' ' => out.push_str("%20"),
			_ => out.push(ch),
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_public_exact_paths() {
		assert!(is_public_path("/"));
		assert!(is_public_path("/login"));
		assert!(is_public_path("/register"));
	}

	#[test]
	fn test_public_prefixes() {
		assert!(is_public_path("/api/issues"));
		assert!(is_public_path("/assets/app.js"));
		assert!(is_public_path("/favicon.ico"));
	}

	#[test]
	fn test_protected_paths() {
		assert!(!is_public_path("/dashboard"));
		assert!(!is_public_path("/issues/123"));
		// Exact-match paths do not protect their children the other way round:
		// "/loginx" is not "/login".
		assert!(!is_public_path("/loginx"));
	}

	#[test]
	fn test_encode_query_value() {
		assert_eq!(encode_query_value("/issues/42"), "/issues/42");
		assert_eq!(encode_query_value("/a b&c"), "/a%20b%26c");
	}
}
