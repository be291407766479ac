// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! OAuth provider configuration.
//!
//! Google sign-in is optional; `finalize()` yields `None` unless all three
//! fields are present.

use serde::Deserialize;

/// Google OAuth configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
	pub client_id: String,
	pub client_secret: String,
	pub redirect_uri: String,
}

/// Google OAuth configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleOAuthConfigLayer {
	#[serde(default)]
	pub client_id: Option<String>,
	#[serde(default)]
	pub client_secret: Option<String>,
	#[serde(default)]
	pub redirect_uri: Option<String>,
}

impl GoogleOAuthConfigLayer {
	pub fn merge(&mut self, other: GoogleOAuthConfigLayer) {
		if other.client_id.is_some() {
			self.client_id = other.client_id;
		}
		if other.client_secret.is_some() {
			self.client_secret = other.client_secret;
		}
		if other.redirect_uri.is_some() {
			self.redirect_uri = other.redirect_uri;
		}
	}

	pub fn finalize(self) -> Option<GoogleOAuthConfig> {
		match (self.client_id, self.client_secret, self.redirect_uri) {
			(Some(client_id), Some(client_secret), Some(redirect_uri)) => Some(GoogleOAuthConfig {
				client_id,
				client_secret,
				redirect_uri,
			}),
			_ => None,
		}
	}
}

/// OAuth configuration (runtime, fully resolved).
#[derive(Debug, Clone, Default)]
pub struct OAuthConfig {
	pub google: Option<GoogleOAuthConfig>,
}

/// OAuth configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthConfigLayer {
	#[serde(default)]
	pub google: GoogleOAuthConfigLayer,
}

impl OAuthConfigLayer {
	pub fn merge(&mut self, other: OAuthConfigLayer) {
		self.google.merge(other.google);
	}

	pub fn finalize(self) -> OAuthConfig {
		OAuthConfig {
			google: self.google.finalize(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_incomplete_google_config_is_none() {
		let layer = GoogleOAuthConfigLayer {
			client_id: Some("id".to_string()),
			..Default::default()
		};
		assert!(layer.finalize().is_none());
	}

	#[test]
	fn test_complete_google_config() {
		let layer = GoogleOAuthConfigLayer {
			client_id: Some("id".to_string()),
			client_secret: Some("secret".to_string()),
			redirect_uri: Some("https://app.example.com/oauth/google".to_string()),
		};
		let config = layer.finalize().unwrap();
		assert_eq!(config.client_id, "id");
	}
}
