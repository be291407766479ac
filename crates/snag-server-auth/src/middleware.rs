// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session-cookie conventions and request auth state.
//!
//! This module provides:
//! - [`CurrentUser`] - authenticated user context extracted from requests
//! - [`AuthContext`] - auth state for request processing
//! - [`AuthConfig`] - cookie/environment configuration
//! - Helper functions for extracting and building the session cookie
//!
//! # Authentication Flow
//!
//! ```text
//! Request → Extract Cookie → Verify JWT → Load User → AuthContext
//! ```
//!
//! # Security Notes
//!
//! - The session cookie is HttpOnly and SameSite=Lax; `Secure` is added in
//!   production.
//! - Token values are never logged.

use http::header::COOKIE;
use http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::user::User;

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "auth_token";

/// The currently authenticated user, extracted from request context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
	/// The authenticated user.
	pub user: User,
}

impl CurrentUser {
	/// Create a new CurrentUser from a verified session.
	pub fn from_session(user: User) -> Self {
		Self { user }
	}
}

/// Authentication context for request processing.
///
/// Inserted into request extensions once per request by the auth middleware;
/// downstream extractors read it instead of re-verifying the token.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
	/// Whether the request is authenticated.
	pub is_authenticated: bool,
	/// The current user, if authenticated.
	pub current_user: Option<CurrentUser>,
}

impl AuthContext {
	/// Create a new unauthenticated context.
	pub fn unauthenticated() -> Self {
		Self {
			is_authenticated: false,
			current_user: None,
		}
	}

	/// Create a new authenticated context.
	pub fn authenticated(current_user: CurrentUser) -> Self {
		Self {
			is_authenticated: true,
			current_user: Some(current_user),
		}
	}

	/// Get the current user, if authenticated.
	pub fn user(&self) -> Option<&CurrentUser> {
		self.current_user.as_ref()
	}

	/// Require authentication, returning the current user or an error.
	pub fn require_user(&self) -> Result<&CurrentUser, AuthRequired> {
		self.current_user.as_ref().ok_or(AuthRequired)
	}
}

/// Error returned when authentication is required but not present.
#[derive(Debug, Clone, Copy)]
pub struct AuthRequired;

impl std::fmt::Display for AuthRequired {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "authentication required")
	}
}

impl std::error::Error for AuthRequired {}

/// Configuration for session-cookie behavior.
#[derive(Debug, Clone)]
pub struct AuthConfig {
	/// Name of the session cookie.
	pub session_cookie_name: String,
	/// Cookie Max-Age and token TTL, in seconds.
	pub session_ttl_secs: u64,
	/// Adds the `Secure` attribute when true (production deployments).
	pub secure_cookies: bool,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			session_cookie_name: SESSION_COOKIE_NAME.to_string(),
			session_ttl_secs: crate::token::DEFAULT_SESSION_TTL_SECS,
			secure_cookies: false,
		}
	}
}

impl AuthConfig {
	/// Create a new AuthConfig with default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the session cookie name.
	pub fn with_session_cookie_name(mut self, name: impl Into<String>) -> Self {
		self.session_cookie_name = name.into();
		self
	}

	/// Set the session TTL.
	pub fn with_session_ttl_secs(mut self, ttl_secs: u64) -> Self {
		self.session_ttl_secs = ttl_secs;
		self
	}

	/// Set whether cookies carry the Secure attribute.
	pub fn with_secure_cookies(mut self, secure: bool) -> Self {
		self.secure_cookies = secure;
		self
	}
}

/// Extract the session token from the Cookie header.
///
/// Returns the token value if the session cookie is present, or `None`.
pub fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
	extract_session_cookie_with_name(headers, SESSION_COOKIE_NAME)
}

/// Extract the session token from the Cookie header with a custom cookie name.
pub fn extract_session_cookie_with_name(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	headers
		.get(COOKIE)?
		.to_str()
		.ok()?
		.split(';')
		.find_map(|cookie| {
			let cookie = cookie.trim();
			let (name, value) = cookie.split_once('=')?;

			if name == cookie_name {
				Some(value.to_string())
			} else {
				None
			}
		})
}

/// Build the Set-Cookie value that establishes a session.
///
/// `auth_token={token}; Path=/; Max-Age={ttl}; HttpOnly; SameSite=Lax`
/// plus `; Secure` when configured.
pub fn build_session_cookie(config: &AuthConfig, token: &str) -> String {
	let mut cookie = format!(
		"{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
		config.session_cookie_name, token, config.session_ttl_secs
	);
	if config.secure_cookies {
		cookie.push_str("; Secure");
	}
	cookie
}

/// Build the Set-Cookie value that clears the session.
pub fn build_clear_cookie(config: &AuthConfig) -> String {
	let mut cookie = format!(
		"{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax",
		config.session_cookie_name
	);
	if config.secure_cookies {
		cookie.push_str("; Secure");
	}
	cookie
}

#[cfg(test)]
mod tests {
	use super::*;
	use http::header::HeaderValue;

	mod cookie_extraction {
		use super::*;

		fn headers_with_cookie(value: &str) -> HeaderMap {
			let mut headers = HeaderMap::new();
			headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
			headers
		}

		#[test]
		fn test_extracts_session_cookie() {
			let headers = headers_with_cookie("auth_token=abc123");
			assert_eq!(extract_session_cookie(&headers), Some("abc123".to_string()));
		}

		#[test]
		fn test_extracts_among_multiple_cookies() {
			let headers = headers_with_cookie("theme=dark; auth_token=tok; lang=en");
			assert_eq!(extract_session_cookie(&headers), Some("tok".to_string()));
		}

		#[test]
		fn test_missing_cookie_header() {
			assert_eq!(extract_session_cookie(&HeaderMap::new()), None);
		}

		#[test]
		fn test_missing_session_cookie() {
			let headers = headers_with_cookie("theme=dark");
			assert_eq!(extract_session_cookie(&headers), None);
		}

		#[test]
		fn test_name_must_match_exactly() {
			let headers = headers_with_cookie("auth_token_2=abc");
			assert_eq!(extract_session_cookie(&headers), None);
		}

		#[test]
		fn test_custom_cookie_name() {
			let headers = headers_with_cookie("my_session=xyz");
			assert_eq!(
				extract_session_cookie_with_name(&headers, "my_session"),
				Some("xyz".to_string())
			);
		}
	}

	mod cookie_building {
		use super::*;

		#[test]
		fn test_session_cookie_attributes() {
			let config = AuthConfig::default();
			let cookie = build_session_cookie(&config, "tok123");
			assert_eq!(
				cookie,
				"auth_token=tok123; Path=/; Max-Age=604800; HttpOnly; SameSite=Lax"
			);
		}

		#[test]
		fn test_secure_added_in_production() {
			let config = AuthConfig::default().with_secure_cookies(true);
			let cookie = build_session_cookie(&config, "tok123");
			assert!(cookie.ends_with("; Secure"));
		}

		#[test]
		fn test_clear_cookie_zeroes_max_age() {
			let config = AuthConfig::default();
			let cookie = build_clear_cookie(&config);
			assert_eq!(
				cookie,
				"auth_token=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"
			);
		}

		#[test]
		fn test_max_age_tracks_ttl() {
			let config = AuthConfig::default().with_session_ttl_secs(3600);
			let cookie = build_session_cookie(&config, "t");
			assert!(cookie.contains("Max-Age=3600"));
		}
	}

	mod auth_context {
		use super::*;
		use crate::types::UserId;
		use chrono::Utc;

		fn make_test_user() -> User {
			User {
				id: UserId::generate(),
				username: "test".to_string(),
				email: "test@example.com".to_string(),
				password_hash: None,
				google_id: None,
				avatar_url: None,
				created_at: Utc::now(),
				updated_at: Utc::now(),
			}
		}

		#[test]
		fn test_unauthenticated_has_no_user() {
			let ctx = AuthContext::unauthenticated();
			assert!(!ctx.is_authenticated);
			assert!(ctx.user().is_none());
			assert!(ctx.require_user().is_err());
		}

		#[test]
		fn test_authenticated_exposes_user() {
			let user = make_test_user();
			let ctx = AuthContext::authenticated(CurrentUser::from_session(user.clone()));
			assert!(ctx.is_authenticated);
			assert_eq!(ctx.require_user().unwrap().user.id, user.id);
		}
	}
}
