// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User entity and profile types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// A registered user.
///
/// `password_hash` is `None` for accounts created through Google sign-in that
/// never set a password. Such accounts cannot log in with a password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
	pub id: UserId,
	pub username: String,
	pub email: String,
	/// Argon2id PHC string; absent for OAuth-only accounts.
	#[serde(skip_serializing)]
	pub password_hash: Option<String>,
	/// Google account subject (`sub` claim) once linked.
	pub google_id: Option<String>,
	pub avatar_url: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl User {
	/// Public projection safe to return from the API.
	pub fn to_profile(&self) -> UserProfile {
		UserProfile {
			id: self.id,
			name: self.username.clone(),
			email: self.email.clone(),
		}
	}

	/// Whether the account has a password and can use password login.
	pub fn has_password(&self) -> bool {
		self.password_hash.is_some()
	}
}

/// Public user representation (`/api/me`, comment authors).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
	pub id: UserId,
	pub name: String,
	pub email: String,
}

/// Derive a username from an OAuth display name.
///
/// Lowercases, maps runs of non-alphanumerics to single underscores, and
/// trims to the maximum username length. Falls back to `"user"` when the
/// name contains nothing usable.
pub fn username_from_display_name(name: &str) -> String {
	let mut out = String::new();
	let mut last_was_sep = true;
	for ch in name.chars() {
		if ch.is_ascii_alphanumeric() {
			out.push(ch.to_ascii_lowercase());
			last_was_sep = false;
		} else if !last_was_sep {
			out.push('_');
			last_was_sep = true;
		}
	}
	let trimmed = out.trim_matches('_');
	if trimmed.is_empty() {
		return "user".to_string();
	}
	trimmed.chars().take(30).collect()
}
