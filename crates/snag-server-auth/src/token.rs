// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stateless session tokens (JWT, HS256).
//!
//! A session token carries only the user ID, issue time, and expiry. There is
//! no server-side session table; logout clears the cookie and the token ages
//! out at `exp`.
//!
//! # Security Notes
//!
//! - Verification is fail-closed: any error (signature, expiry, malformed
//!   payload, non-UUID subject) yields `None`.
//! - Token values are never logged.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::types::UserId;

/// Default session lifetime: 7 days.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 604_800;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
	/// User ID as a UUID string.
	pub sub: String,
	/// Issued-at, unix seconds.
	pub iat: u64,
	/// Expiry, unix seconds.
	pub exp: u64,
}

/// Errors that can occur while signing a token.
#[derive(Debug, Error)]
pub enum TokenError {
	#[error("failed to sign session token: {0}")]
	Sign(#[from] jsonwebtoken::errors::Error),
}

/// Signs and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct TokenCodec {
	encoding: EncodingKey,
	decoding: DecodingKey,
	ttl_secs: u64,
}

impl std::fmt::Debug for TokenCodec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TokenCodec")
			.field("ttl_secs", &self.ttl_secs)
			.finish_non_exhaustive()
	}
}

impl TokenCodec {
	/// Create a codec from a shared secret.
	pub fn new(secret: &str, ttl_secs: u64) -> Self {
		Self {
			encoding: EncodingKey::from_secret(secret.as_bytes()),
			decoding: DecodingKey::from_secret(secret.as_bytes()),
			ttl_secs,
		}
	}

	/// Session lifetime in seconds; also used for the cookie Max-Age.
	pub fn ttl_secs(&self) -> u64 {
		self.ttl_secs
	}

	/// Sign a session token for the given user.
	pub fn sign(&self, user_id: UserId) -> Result<String, TokenError> {
		let now = chrono::Utc::now().timestamp() as u64;
		let claims = SessionClaims {
			sub: user_id.to_string(),
			iat: now,
			exp: now + self.ttl_secs,
		};
		let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
		Ok(token)
	}

	/// Verify a session token and extract the user ID.
	///
	/// Fail-closed: returns `None` on any verification failure without
	/// exposing the cause to the caller.
	pub fn verify(&self, token: &str) -> Option<UserId> {
		let validation = Validation::new(Algorithm::HS256);
		let data = match decode::<SessionClaims>(token, &self.decoding, &validation) {
			Ok(data) => data,
			Err(e) => {
				tracing::debug!(error = %e, "session token verification failed");
				return None;
			}
		};
		match Uuid::parse_str(&data.claims.sub) {
			Ok(uuid) => Some(UserId::new(uuid)),
			Err(e) => {
				tracing::debug!(error = %e, "session token subject is not a UUID");
				None
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn codec() -> TokenCodec {
		TokenCodec::new("test-secret", DEFAULT_SESSION_TTL_SECS)
	}

	#[test]
	fn test_sign_verify_round_trip() {
		let user_id = UserId::generate();
		let token = codec().sign(user_id).unwrap();
		assert_eq!(codec().verify(&token), Some(user_id));
	}

	#[test]
	fn test_wrong_secret_fails() {
		let token = codec().sign(UserId::generate()).unwrap();
		let other = TokenCodec::new("different-secret", DEFAULT_SESSION_TTL_SECS);
		assert_eq!(other.verify(&token), None);
	}

	#[test]
	fn test_tampered_token_fails() {
		let mut token = codec().sign(UserId::generate()).unwrap();
		token.push('x');
		assert_eq!(codec().verify(&token), None);
	}

	#[test]
	fn test_garbage_fails() {
		assert_eq!(codec().verify(""), None);
		assert_eq!(codec().verify("not.a.jwt"), None);
	}

	#[test]
	fn test_expired_token_fails() {
		// TTL of zero puts exp at (or before) now; jsonwebtoken's default
		// leeway is 60s, so disable it via a codec that back-dates.
		let now = chrono::Utc::now().timestamp() as u64;
		let claims = SessionClaims {
			sub: UserId::generate().to_string(),
			iat: now - 7200,
			exp: now - 3600,
		};
		let token = encode(
			&Header::new(Algorithm::HS256),
			&claims,
			&EncodingKey::from_secret(b"test-secret"),
		)
		.unwrap();
		assert_eq!(codec().verify(&token), None);
	}

	#[test]
	fn test_non_uuid_subject_fails() {
		let now = chrono::Utc::now().timestamp() as u64;
		let claims = SessionClaims {
			sub: "not-a-uuid".to_string(),
			iat: now,
			exp: now + 3600,
		};
		let token = encode(
			&Header::new(Algorithm::HS256),
			&claims,
			&EncodingKey::from_secret(b"test-secret"),
		)
		.unwrap();
		assert_eq!(codec().verify(&token), None);
	}
}
