// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication configuration: environment, JWT secret, session lifetime.

use serde::Deserialize;

/// Default session lifetime: 7 days.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 604_800;

/// Auth configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct AuthConfig {
	/// Deployment environment (`development`, `production`, ...).
	pub environment: String,
	/// Shared secret for signing session tokens.
	pub jwt_secret: String,
	/// Session token and cookie lifetime in seconds.
	pub session_ttl_secs: u64,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			environment: "development".to_string(),
			jwt_secret: String::new(),
			session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
		}
	}
}

impl AuthConfig {
	/// Whether this is a production deployment (Secure cookies, strict checks).
	pub fn is_production(&self) -> bool {
		self.environment.eq_ignore_ascii_case("production")
	}
}

/// Auth configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub environment: Option<String>,
	#[serde(default)]
	pub jwt_secret: Option<String>,
	#[serde(default)]
	pub session_ttl_secs: Option<u64>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.environment.is_some() {
			self.environment = other.environment;
		}
		if other.jwt_secret.is_some() {
			self.jwt_secret = other.jwt_secret;
		}
		if other.session_ttl_secs.is_some() {
			self.session_ttl_secs = other.session_ttl_secs;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			environment: self.environment.unwrap_or_else(|| "development".to_string()),
			jwt_secret: self.jwt_secret.unwrap_or_default(),
			session_ttl_secs: self.session_ttl_secs.unwrap_or(DEFAULT_SESSION_TTL_SECS),
		}
	}
}
