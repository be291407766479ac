// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Test helpers: in-memory pools and schema setup.

use chrono::Utc;
use snag_server_auth::{IssueId, UserId};
use sqlx::sqlite::SqlitePool;

pub async fn create_test_pool() -> SqlitePool {
	SqlitePool::connect(":memory:").await.unwrap()
}

pub async fn create_users_table(pool: &SqlitePool) {
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
	.await
	.unwrap();
}

pub async fn create_issues_table(pool: &SqlitePool) {
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
	.await
	.unwrap();
}

pub async fn create_comments_table(pool: &SqlitePool) {
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
	.await
	.unwrap();
}

/// Insert a user row directly, returning its ID.
pub async fn insert_test_user(pool: &SqlitePool, username: &str, email: &str) -> UserId {
	let id = UserId::generate();
	let now = Utc::now().to_rfc3339();
	sqlx::query(
		"INSERT INTO users (id, username, email, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
	)
	.bind(id.to_string())
	.bind(username)
	.bind(email)
	.bind("$argon2id$test")
	.bind(&now)
	.bind(&now)
	.execute(pool)
	.await
	.unwrap();
	id
}

/// Insert a minimal issue row directly, returning its ID.
pub async fn insert_test_issue(pool: &SqlitePool, created_by: &UserId) -> IssueId {
	let id = IssueId::generate();
	let now = Utc::now().to_rfc3339();
	sqlx::query(
		r#"
		INSERT INTO issues (id, title, description, status, priority, labels, created_by, created_at, updated_at)
		VALUES (?, ?, ?, 'OPEN', 'MEDIUM', '', ?, ?, ?)
		"#,
	)
	.bind(id.to_string())
	.bind("Test issue")
	.bind("A description long enough to be valid.")
	.bind(created_by.to_string())
	.bind(&now)
	.bind(&now)
	.execute(pool)
	.await
	.unwrap();
	id
}
