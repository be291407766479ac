// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User repository for database operations.
//!
//! Handles account creation, lookup by id/email, and linking Google
//! identities to existing accounts.

use chrono::{DateTime, Utc};
use snag_server_auth::{User, UserId};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::DbError;

/// Fields required to insert a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
	pub username: String,
	pub email: String,
	/// Absent for accounts created via Google sign-in.
	pub password_hash: Option<String>,
	pub google_id: Option<String>,
	pub avatar_url: Option<String>,
}

/// Repository for user database operations.
///
/// All IDs are UUIDs stored as strings in SQLite.
#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a new user.
	///
	/// # Errors
	/// Returns `DbError::Conflict` when the email (or linked Google ID) is
	/// already taken.
	#[tracing::instrument(skip(self, new_user), fields(email = %new_user.email))]
	pub async fn create(&self, new_user: &NewUser) -> Result<User, DbError> {
		let id = UserId::generate();
		let now = Utc::now();
		let result = sqlx::query(
			r#"
			INSERT INTO users (id, username, email, password_hash, google_id, avatar_url, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(id.to_string())
		.bind(&new_user.username)
		.bind(&new_user.email)
		.bind(&new_user.password_hash)
		.bind(&new_user.google_id)
		.bind(&new_user.avatar_url)
		.bind(now.to_rfc3339())
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await;

		match result {
			Ok(_) => {}
			Err(e) if DbError::is_unique_violation(&e) => {
				return Err(DbError::Conflict(format!(
					"user with email {} already exists",
					new_user.email
				)));
			}
			Err(e) => return Err(e.into()),
		}

		tracing::debug!(user_id = %id, "user created");
		Ok(User {
			id,
			username: new_user.username.clone(),
			email: new_user.email.clone(),
			password_hash: new_user.password_hash.clone(),
			google_id: new_user.google_id.clone(),
			avatar_url: new_user.avatar_url.clone(),
			created_at: now,
			updated_at: now,
		})
	}

	/// Get a user by ID.
	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, username, email, password_hash, google_id, avatar_url, created_at, updated_at
			FROM users
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user(&r)).transpose()
	}

	/// Get a user by email (exact match on the stored, lowercased form).
	#[tracing::instrument(skip(self, email))]
	pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, username, email, password_hash, google_id, avatar_url, created_at, updated_at
			FROM users
			WHERE email = ?
			"#,
		)
		.bind(email)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user(&r)).transpose()
	}

	/// Find a user by email or Google subject, whichever matches first.
	///
	/// Used by the OAuth reconciliation flow: a returning Google user may
	/// match on `google_id`, a password user signing in with Google for the
	/// first time matches on email.
	#[tracing::instrument(skip(self, email, google_id))]
	pub async fn find_by_email_or_google_id(
		&self,
		email: &str,
		google_id: &str,
	) -> Result<Option<User>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, username, email, password_hash, google_id, avatar_url, created_at, updated_at
			FROM users
			WHERE email = ? OR google_id = ?
			"#,
		)
		.bind(email)
		.bind(google_id)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_user(&r)).transpose()
	}

	/// Attach a Google identity to an existing account.
	///
	/// Sets `google_id` and, when the account has no avatar yet, the avatar
	/// URL from the Google profile.
	#[tracing::instrument(skip(self, google_id, avatar_url), fields(user_id = %id))]
	pub async fn link_google_identity(
		&self,
		id: &UserId,
		google_id: &str,
		avatar_url: Option<&str>,
	) -> Result<(), DbError> {
		let result = sqlx::query(
			r#"
			UPDATE users
			SET google_id = ?,
			    avatar_url = COALESCE(avatar_url, ?),
			    updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(google_id)
		.bind(avatar_url)
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("user {id}")));
		}

		tracing::debug!(user_id = %id, "google identity linked");
		Ok(())
	}
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User, DbError> {
	let id: String = row.get("id");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(User {
		id: UserId::new(
			Uuid::parse_str(&id).map_err(|e| DbError::Internal(format!("invalid user id: {e}")))?,
		),
		username: row.get("username"),
		email: row.get("email"),
		password_hash: row.get("password_hash"),
		google_id: row.get("google_id"),
		avatar_url: row.get("avatar_url"),
		created_at: parse_timestamp(&created_at)?,
		updated_at: parse_timestamp(&updated_at)?,
	})
}

pub(crate) fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(s)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("invalid timestamp '{s}': {e}")))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{create_test_pool, create_users_table};

	fn new_user(email: &str) -> NewUser {
		NewUser {
			username: "alice".to_string(),
			email: email.to_string(),
			password_hash: Some("$argon2id$fake".to_string()),
			google_id: None,
			avatar_url: None,
		}
	}

	#[tokio::test]
	async fn test_create_and_get_by_id() {
		let pool = create_test_pool().await;
		create_users_table(&pool).await;
		let repo = UserRepository::new(pool);

		let user = repo.create(&new_user("a@example.com")).await.unwrap();
		let found = repo.get_by_id(&user.id).await.unwrap().unwrap();
		assert_eq!(found.email, "a@example.com");
		assert_eq!(found.username, "alice");
		assert!(found.password_hash.is_some());
	}

	#[tokio::test]
	async fn test_duplicate_email_is_conflict() {
		let pool = create_test_pool().await;
		create_users_table(&pool).await;
		let repo = UserRepository::new(pool);

		repo.create(&new_user("dup@example.com")).await.unwrap();
		let err = repo.create(&new_user("dup@example.com")).await.unwrap_err();
		assert!(matches!(err, DbError::Conflict(_)));
	}

	#[tokio::test]
	async fn test_get_by_email_missing() {
		let pool = create_test_pool().await;
		create_users_table(&pool).await;
		let repo = UserRepository::new(pool);

		assert!(repo.get_by_email("nobody@example.com").await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_find_by_email_or_google_id() {
		let pool = create_test_pool().await;
		create_users_table(&pool).await;
		let repo = UserRepository::new(pool);

		let mut nu = new_user("g@example.com");
		nu.google_id = Some("goog-123".to_string());
		let user = repo.create(&nu).await.unwrap();

		let by_email = repo
			.find_by_email_or_google_id("g@example.com", "other")
			.await
			.unwrap()
			.unwrap();
		assert_eq!(by_email.id, user.id);

		let by_google = repo
			.find_by_email_or_google_id("different@example.com", "goog-123")
			.await
			.unwrap()
			.unwrap();
		assert_eq!(by_google.id, user.id);
	}

	#[tokio::test]
	async fn test_link_google_identity_keeps_existing_avatar() {
		let pool = create_test_pool().await;
		create_users_table(&pool).await;
		let repo = UserRepository::new(pool);

		let mut nu = new_user("ava@example.com");
		nu.avatar_url = Some("https://example.com/custom.png".to_string());
		let user = repo.create(&nu).await.unwrap();

		repo.link_google_identity(&user.id, "goog-9", Some("https://lh3.example/pic"))
			.await
			.unwrap();

		let found = repo.get_by_id(&user.id).await.unwrap().unwrap();
		assert_eq!(found.google_id.as_deref(), Some("goog-9"));
		assert_eq!(
			found.avatar_url.as_deref(),
			Some("https://example.com/custom.png")
		);
	}

	#[tokio::test]
	async fn test_link_google_identity_unknown_user() {
		let pool = create_test_pool().await;
		create_users_table(&pool).await;
		let repo = UserRepository::new(pool);

		let err = repo
			.link_google_identity(&UserId::generate(), "goog-1", None)
			.await
			.unwrap_err();
		assert!(matches!(err, DbError::NotFound(_)));
	}
}
