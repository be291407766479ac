// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Google OAuth authorization-code exchange.
//!
//! The browser completes the consent flow and posts the resulting code to
//! the server; this crate turns that code into a verified Google profile:
//!
//! 1. POST the code to the token endpoint (form-encoded)
//! 2. GET the OpenID Connect userinfo endpoint with the access token
//!
//! State-parameter validation happens client-side before the code reaches
//! the server; the code is treated as opaque here.

use serde::Deserialize;
use thiserror::Error;

/// Google OAuth token endpoint.
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// OpenID Connect userinfo endpoint.
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Client credentials and redirect URI for the OAuth app.
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
	pub client_id: String,
	pub client_secret: String,
	pub redirect_uri: String,
}

/// Verified Google profile for a signed-in user.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
	/// Stable Google account identifier.
	pub sub: String,
	pub email: String,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub picture: Option<String>,
}

/// Errors from the code-exchange flow.
#[derive(Debug, Error)]
pub enum GoogleOAuthError {
	#[error("HTTP request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("token exchange rejected with status {status}")]
	ExchangeRejected { status: u16 },

	#[error("userinfo request rejected with status {status}")]
	UserInfoRejected { status: u16 },
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
	access_token: String,
}

/// Client for exchanging authorization codes against Google's endpoints.
#[derive(Debug, Clone)]
pub struct GoogleOAuthClient {
	config: GoogleOAuthConfig,
	http: reqwest::Client,
	token_endpoint: String,
	userinfo_endpoint: String,
}

impl GoogleOAuthClient {
	/// Create a client for the given OAuth app.
	pub fn new(config: GoogleOAuthConfig) -> Self {
		Self {
			config,
			http: reqwest::Client::new(),
			token_endpoint: TOKEN_ENDPOINT.to_string(),
			userinfo_endpoint: USERINFO_ENDPOINT.to_string(),
		}
	}

	/// Override the endpoints (test servers).
	pub fn with_endpoints(
		mut self,
		token_endpoint: impl Into<String>,
		userinfo_endpoint: impl Into<String>,
	) -> Self {
		self.token_endpoint = token_endpoint.into();
		self.userinfo_endpoint = userinfo_endpoint.into();
		self
	}

	/// Exchange an authorization code for the user's Google profile.
	#[tracing::instrument(skip(self, code))]
	pub async fn exchange_code(&self, code: &str) -> Result<GoogleUserInfo, GoogleOAuthError> {
		let response = self
			.http
			.post(&self.token_endpoint)
			.form(&[
				("code", code),
				("client_id", self.config.client_id.as_str()),
				("client_secret", self.config.client_secret.as_str()),
				("redirect_uri", self.config.redirect_uri.as_str()),
				("grant_type", "authorization_code"),
			])
			.send()
			.await?;

		if !response.status().is_success() {
			let status = response.status().as_u16();
			tracing::debug!(status, "google token exchange rejected");
			return Err(GoogleOAuthError::ExchangeRejected { status });
		}

		let token: TokenResponse = response.json().await?;

		let response = self
			.http
			.get(&self.userinfo_endpoint)
			.bearer_auth(&token.access_token)
			.send()
			.await?;

		if !response.status().is_success() {
			let status = response.status().as_u16();
			tracing::debug!(status, "google userinfo request rejected");
			return Err(GoogleOAuthError::UserInfoRejected { status });
		}

		let info: GoogleUserInfo = response.json().await?;
		tracing::debug!(sub = %info.sub, "google profile resolved");
		Ok(info)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_userinfo_deserializes_minimal_payload() {
		let info: GoogleUserInfo =
			serde_json::from_str(r#"{"sub":"123","email":"a@example.com"}"#).unwrap();
		assert_eq!(info.sub, "123");
		assert!(info.name.is_none());
		assert!(info.picture.is_none());
	}

	#[test]
	fn test_userinfo_deserializes_full_payload() {
		let info: GoogleUserInfo = serde_json::from_str(
			r#"{"sub":"123","email":"a@example.com","name":"Ada","picture":"https://lh3.example/p"}"#,
		)
		.unwrap();
		assert_eq!(info.name.as_deref(), Some("Ada"));
	}
}
