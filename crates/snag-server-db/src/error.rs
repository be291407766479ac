// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Internal: {0}")]
	Internal(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

impl DbError {
	/// Whether the underlying sqlx error is a UNIQUE constraint violation.
	pub fn is_unique_violation(err: &sqlx::Error) -> bool {
		matches!(
			err,
			sqlx::Error::Database(db) if db.message().contains("UNIQUE constraint failed")
		)
	}
}
