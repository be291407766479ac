// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Password hashing and verification.
//!
//! Wraps argon2id in PHC string format. Verification is fail-closed: a hash
//! that cannot be parsed, or a password that does not match, both yield
//! `false` and never an error the caller could branch on.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use thiserror::Error;

/// Errors that can occur while hashing a password.
#[derive(Debug, Error)]
pub enum PasswordError {
	#[error("failed to hash password: {0}")]
	Hash(String),
}

/// Argon2id with the library's current recommended cost parameters.
#[cfg(not(test))]
fn hasher() -> Argon2<'static> {
	Argon2::default()
}

/// Reduced-cost parameters for tests only; never reachable from release
/// builds.
#[cfg(test)]
fn hasher() -> Argon2<'static> {
	use argon2::{Algorithm, Params, Version};
	let params = Params::new(1024, 1, 1, None).expect("test params within argon2 bounds");
	Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

/// Hash a password with argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
	let salt = SaltString::generate(&mut OsRng);
	let hash = hasher()
		.hash_password(password.as_bytes(), &salt)
		.map_err(|e| PasswordError::Hash(e.to_string()))?;
	Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash string.
///
/// Returns `false` for any failure: mismatch, malformed hash, or internal
/// error. Callers cannot distinguish the causes.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
	let parsed = match PasswordHash::new(stored_hash) {
		Ok(h) => h,
		Err(e) => {
			tracing::debug!(error = %e, "stored password hash failed to parse");
			return false;
		}
	};
	hasher()
		.verify_password(password.as_bytes(), &parsed)
		.is_ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_hash_verify_round_trip() {
		let hash = hash_password("correct horse battery staple").unwrap();
		assert!(verify_password("correct horse battery staple", &hash));
	}

	#[test]
	fn test_wrong_password_fails() {
		let hash = hash_password("hunter22").unwrap();
		assert!(!verify_password("hunter23", &hash));
	}

	#[test]
	fn test_malformed_hash_fails_closed() {
		assert!(!verify_password("anything", "not-a-phc-string"));
		assert!(!verify_password("anything", ""));
	}

	#[test]
	fn test_hashes_are_salted() {
		let a = hash_password("same").unwrap();
		let b = hash_password("same").unwrap();
		assert_ne!(a, b);
	}
}
