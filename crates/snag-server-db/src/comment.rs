// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Comment repository for database operations.

use chrono::{DateTime, Utc};
use serde::Serialize;
use snag_server_auth::{CommentId, IssueId, UserId};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::DbError;
use crate::user::parse_timestamp;

/// A persisted comment.
#[derive(Debug, Clone)]
pub struct Comment {
	pub id: CommentId,
	pub issue_id: IssueId,
	pub author_id: UserId,
	pub content: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// A comment with its author joined in, as listed under an issue.
#[derive(Debug, Clone, Serialize)]
pub struct CommentWithAuthor {
	pub id: CommentId,
	pub content: String,
	pub created_at: DateTime<Utc>,
	pub author: CommentAuthor,
}

/// Author projection attached to listed comments.
#[derive(Debug, Clone, Serialize)]
pub struct CommentAuthor {
	pub id: UserId,
	pub username: String,
}

/// Repository for comment database operations.
#[derive(Clone)]
pub struct CommentRepository {
	pool: SqlitePool,
}

impl CommentRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a new comment on an issue.
	#[tracing::instrument(skip(self, content), fields(issue_id = %issue_id, author_id = %author_id))]
	pub async fn create(
		&self,
		issue_id: &IssueId,
		author_id: &UserId,
		content: &str,
	) -> Result<Comment, DbError> {
		let id = CommentId::generate();
		let now = Utc::now();
		sqlx::query(
			r#"
			INSERT INTO comments (id, issue_id, author_id, content, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(id.to_string())
		.bind(issue_id.to_string())
		.bind(author_id.to_string())
		.bind(content)
		.bind(now.to_rfc3339())
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(comment_id = %id, "comment created");
		Ok(Comment {
			id,
			issue_id: *issue_id,
			author_id: *author_id,
			content: content.to_string(),
			created_at: now,
			updated_at: now,
		})
	}

	/// List the comments on an issue, newest first, with author usernames.
	#[tracing::instrument(skip(self), fields(issue_id = %issue_id))]
	pub async fn list_for_issue(
		&self,
		issue_id: &IssueId,
	) -> Result<Vec<CommentWithAuthor>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT c.id, c.content, c.created_at, c.author_id, u.username
			FROM comments c
			JOIN users u ON u.id = c.author_id
			WHERE c.issue_id = ?
			ORDER BY c.created_at DESC
			"#,
		)
		.bind(issue_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter()
			.map(|row| {
				let id: String = row.get("id");
				let author_id: String = row.get("author_id");
				let created_at: String = row.get("created_at");
				Ok(CommentWithAuthor {
					id: CommentId::new(
						Uuid::parse_str(&id)
							.map_err(|e| DbError::Internal(format!("invalid comment id: {e}")))?,
					),
					content: row.get("content"),
					created_at: parse_timestamp(&created_at)?,
					author: CommentAuthor {
						id: UserId::new(Uuid::parse_str(&author_id).map_err(|e| {
							DbError::Internal(format!("invalid author id: {e}"))
						})?),
						username: row.get("username"),
					},
				})
			})
			.collect()
	}
}
