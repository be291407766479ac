// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqliteSynchronous};
use std::str::FromStr;

use crate::error::DbError;

/// Create a SqlitePool with WAL mode and common settings.
///
/// # Arguments
/// * `database_url` - SQLite connection string (e.g., "sqlite:./snag.db")
///
/// # Errors
/// Returns `DbError::Internal` if the URL is invalid or connection fails.
#[tracing::instrument(skip(database_url))]
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str(database_url)
		.map_err(|e| DbError::Internal(format!("Invalid database URL: {e}")))?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.create_if_missing(true);

	let pool = SqlitePool::connect_with(options).await?;

	tracing::debug!("database pool created");
	Ok(pool)
}

/// Create the application tables if they do not exist.
///
/// Idempotent; safe to run on every startup.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS users (
			id TEXT PRIMARY KEY,
			username TEXT NOT NULL,
			email TEXT NOT NULL UNIQUE,
			password_hash TEXT,
			google_id TEXT UNIQUE,
			avatar_url TEXT,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS issues (
			id TEXT PRIMARY KEY,
			title TEXT NOT NULL,
			description TEXT NOT NULL,
			status TEXT NOT NULL DEFAULT 'OPEN',
			priority TEXT NOT NULL DEFAULT 'MEDIUM',
			labels TEXT NOT NULL DEFAULT '',
			created_by TEXT NOT NULL REFERENCES users(id),
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS comments (
			id TEXT PRIMARY KEY,
			issue_id TEXT NOT NULL REFERENCES issues(id),
			author_id TEXT NOT NULL REFERENCES users(id),
			content TEXT NOT NULL,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_issues_created_by ON issues(created_by)")
		.execute(pool)
		.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_comments_issue_id ON comments(issue_id)")
		.execute(pool)
		.await?;

	tracing::debug!("migrations applied");
	Ok(())
}
