// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Issue repository for database operations.
//!
//! Status and priority are stored in their uppercase database forms
//! (`OPEN`, `IN_PROGRESS`, ...); labels are stored as a comma-joined TEXT
//! column and exposed as a `Vec<String>`.

use chrono::{DateTime, Utc};
use snag_server_auth::{IssueId, IssuePriority, IssueStatus, UserId};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;

use crate::error::DbError;
use crate::user::parse_timestamp;

/// A persisted issue.
#[derive(Debug, Clone)]
pub struct Issue {
	pub id: IssueId,
	pub title: String,
	pub description: String,
	pub status: IssueStatus,
	pub priority: IssuePriority,
	pub labels: Vec<String>,
	pub created_by: UserId,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Fields required to insert an issue row.
#[derive(Debug, Clone)]
pub struct NewIssue {
	pub title: String,
	pub description: String,
	pub status: IssueStatus,
	pub priority: IssuePriority,
	pub labels: Vec<String>,
	pub created_by: UserId,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct IssueChanges {
	pub title: Option<String>,
	pub description: Option<String>,
	pub status: Option<IssueStatus>,
	pub priority: Option<IssuePriority>,
	pub labels: Option<Vec<String>>,
}

/// Repository for issue database operations.
#[derive(Clone)]
pub struct IssueRepository {
	pool: SqlitePool,
}

impl IssueRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a new issue.
	#[tracing::instrument(skip(self, new_issue), fields(created_by = %new_issue.created_by))]
	pub async fn create(&self, new_issue: &NewIssue) -> Result<Issue, DbError> {
		let id = IssueId::generate();
		let now = Utc::now();
		sqlx::query(
			r#"
			INSERT INTO issues (id, title, description, status, priority, labels, created_by, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(id.to_string())
		.bind(&new_issue.title)
		.bind(&new_issue.description)
		.bind(new_issue.status.as_db_str())
		.bind(new_issue.priority.as_db_str())
		.bind(join_labels(&new_issue.labels))
		.bind(new_issue.created_by.to_string())
		.bind(now.to_rfc3339())
		.bind(now.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(issue_id = %id, "issue created");
		Ok(Issue {
			id,
			title: new_issue.title.clone(),
			description: new_issue.description.clone(),
			status: new_issue.status,
			priority: new_issue.priority,
			labels: new_issue.labels.clone(),
			created_by: new_issue.created_by,
			created_at: now,
			updated_at: now,
		})
	}

	/// Get an issue by ID.
	#[tracing::instrument(skip(self), fields(issue_id = %id))]
	pub async fn get(&self, id: &IssueId) -> Result<Option<Issue>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, title, description, status, priority, labels, created_by, created_at, updated_at
			FROM issues
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_issue(&r)).transpose()
	}

	/// List the issues created by a user, newest first.
	#[tracing::instrument(skip(self), fields(created_by = %created_by))]
	pub async fn list(&self, created_by: &UserId) -> Result<Vec<Issue>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, title, description, status, priority, labels, created_by, created_at, updated_at
			FROM issues
			WHERE created_by = ?
			ORDER BY created_at DESC
			"#,
		)
		.bind(created_by.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_issue).collect()
	}

	/// Apply a partial update and bump `updated_at`.
	///
	/// # Errors
	/// Returns `DbError::NotFound` when no issue has this ID.
	#[tracing::instrument(skip(self, changes), fields(issue_id = %id))]
	pub async fn update(&self, id: &IssueId, changes: &IssueChanges) -> Result<(), DbError> {
		let result = sqlx::query(
			r#"
			UPDATE issues
			SET title = COALESCE(?, title),
			    description = COALESCE(?, description),
			    status = COALESCE(?, status),
			    priority = COALESCE(?, priority),
			    labels = COALESCE(?, labels),
			    updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&changes.title)
		.bind(&changes.description)
		.bind(changes.status.map(|s| s.as_db_str()))
		.bind(changes.priority.map(|p| p.as_db_str()))
		.bind(changes.labels.as_deref().map(join_labels))
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("issue {id}")));
		}

		tracing::debug!(issue_id = %id, "issue updated");
		Ok(())
	}

	/// Set the status of an issue and bump `updated_at`.
	#[tracing::instrument(skip(self), fields(issue_id = %id, status = %status))]
	pub async fn update_status(&self, id: &IssueId, status: IssueStatus) -> Result<(), DbError> {
		let result = sqlx::query(
			r#"
			UPDATE issues SET status = ?, updated_at = ? WHERE id = ?
			"#,
		)
		.bind(status.as_db_str())
		.bind(Utc::now().to_rfc3339())
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("issue {id}")));
		}

		Ok(())
	}

	/// Delete an issue and its comments in one transaction.
	///
	/// # Errors
	/// Returns `DbError::NotFound` when no issue has this ID.
	#[tracing::instrument(skip(self), fields(issue_id = %id))]
	pub async fn delete_cascade(&self, id: &IssueId) -> Result<(), DbError> {
		let mut tx = self.pool.begin().await?;

		sqlx::query("DELETE FROM comments WHERE issue_id = ?")
			.bind(id.to_string())
			.execute(&mut *tx)
			.await?;

		let result = sqlx::query("DELETE FROM issues WHERE id = ?")
			.bind(id.to_string())
			.execute(&mut *tx)
			.await?;

		if result.rows_affected() == 0 {
			tx.rollback().await?;
			return Err(DbError::NotFound(format!("issue {id}")));
		}

		tx.commit().await?;
		tracing::debug!(issue_id = %id, "issue deleted with comments");
		Ok(())
	}
}

fn join_labels(labels: &[String]) -> String {
	labels.join(",")
}

fn split_labels(raw: &str) -> Vec<String> {
	raw.split(',')
		.map(|s| s.trim().to_string())
		.filter(|s| !s.is_empty())
		.collect()
}

fn row_to_issue(row: &sqlx::sqlite::SqliteRow) -> Result<Issue, DbError> {
	let id: String = row.get("id");
	let status: String = row.get("status");
	let priority: String = row.get("priority");
	let labels: String = row.get("labels");
	let created_by: String = row.get("created_by");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(Issue {
		id: IssueId::new(
			Uuid::parse_str(&id).map_err(|e| DbError::Internal(format!("invalid issue id: {e}")))?,
		),
		title: row.get("title"),
		description: row.get("description"),
		status: IssueStatus::parse_db(&status)
			.ok_or_else(|| DbError::Internal(format!("invalid issue status '{status}'")))?,
		priority: IssuePriority::parse_db(&priority)
			.ok_or_else(|| DbError::Internal(format!("invalid issue priority '{priority}'")))?,
		labels: split_labels(&labels),
		created_by: UserId::new(
			Uuid::parse_str(&created_by)
				.map_err(|e| DbError::Internal(format!("invalid creator id: {e}")))?,
		),
		created_at: parse_timestamp(&created_at)?,
		updated_at: parse_timestamp(&updated_at)?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{create_comments_table, create_issues_table, create_test_pool, create_users_table, insert_test_user};
	use crate::CommentRepository;

	async fn setup() -> (SqlitePool, IssueRepository, UserId) {
		let pool = create_test_pool().await;
		create_users_table(&pool).await;
		create_issues_table(&pool).await;
		create_comments_table(&pool).await;
		let user_id = insert_test_user(&pool, "owner", "owner@example.com").await;
		(pool.clone(), IssueRepository::new(pool), user_id)
	}

	fn new_issue(created_by: UserId) -> NewIssue {
		NewIssue {
			title: "Login button unresponsive".to_string(),
			description: "Clicking login does nothing on Firefox 128.".to_string(),
			status: IssueStatus::Open,
			priority: IssuePriority::Medium,
			labels: vec!["bug".to_string(), "frontend".to_string()],
			created_by,
		}
	}

	#[tokio::test]
	async fn test_create_and_get_round_trips_enums_and_labels() {
		let (_pool, repo, user_id) = setup().await;

		let issue = repo.create(&new_issue(user_id)).await.unwrap();
		let found = repo.get(&issue.id).await.unwrap().unwrap();
		assert_eq!(found.status, IssueStatus::Open);
		assert_eq!(found.priority, IssuePriority::Medium);
		assert_eq!(found.labels, vec!["bug", "frontend"]);
		assert_eq!(found.created_by, user_id);
	}

	#[tokio::test]
	async fn test_get_missing_returns_none() {
		let (_pool, repo, _user_id) = setup().await;
		assert!(repo.get(&IssueId::generate()).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_partial_update_leaves_other_fields() {
		let (_pool, repo, user_id) = setup().await;
		let issue = repo.create(&new_issue(user_id)).await.unwrap();

		repo.update(
			&issue.id,
			&IssueChanges {
				priority: Some(IssuePriority::High),
				..Default::default()
			},
		)
		.await
		.unwrap();

		let found = repo.get(&issue.id).await.unwrap().unwrap();
		assert_eq!(found.priority, IssuePriority::High);
		assert_eq!(found.title, issue.title);
		assert_eq!(found.status, IssueStatus::Open);
	}

	#[tokio::test]
	async fn test_update_missing_is_not_found() {
		let (_pool, repo, _user_id) = setup().await;
		let err = repo
			.update(&IssueId::generate(), &IssueChanges::default())
			.await
			.unwrap_err();
		assert!(matches!(err, DbError::NotFound(_)));
	}

	#[tokio::test]
	async fn test_update_status() {
		let (_pool, repo, user_id) = setup().await;
		let issue = repo.create(&new_issue(user_id)).await.unwrap();

		repo.update_status(&issue.id, IssueStatus::Closed).await.unwrap();
		let found = repo.get(&issue.id).await.unwrap().unwrap();
		assert_eq!(found.status, IssueStatus::Closed);
	}

	#[tokio::test]
	async fn test_delete_cascade_removes_comments() {
		let (pool, repo, user_id) = setup().await;
		let issue = repo.create(&new_issue(user_id)).await.unwrap();

		let comments = CommentRepository::new(pool);
		comments
			.create(&issue.id, &user_id, "can reproduce on 129 too")
			.await
			.unwrap();

		repo.delete_cascade(&issue.id).await.unwrap();
		assert!(repo.get(&issue.id).await.unwrap().is_none());
		assert!(comments.list_for_issue(&issue.id).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_delete_missing_is_not_found() {
		let (_pool, repo, _user_id) = setup().await;
		let err = repo.delete_cascade(&IssueId::generate()).await.unwrap_err();
		assert!(matches!(err, DbError::NotFound(_)));
	}

	#[tokio::test]
	async fn test_list_newest_first() {
		let (_pool, repo, user_id) = setup().await;
		let first = repo.create(&new_issue(user_id)).await.unwrap();
		// Distinct created_at values; rfc3339 strings order lexically.
		tokio::time::sleep(std::time::Duration::from_millis(5)).await;
		let second = repo.create(&new_issue(user_id)).await.unwrap();

		let listed = repo.list(&user_id).await.unwrap();
		assert_eq!(listed.len(), 2);
		assert_eq!(listed[0].id, second.id);
		assert_eq!(listed[1].id, first.id);
	}

	#[tokio::test]
	async fn test_list_is_scoped_to_creator() {
		let (pool, repo, user_id) = setup().await;
		let other = insert_test_user(&pool, "other", "other@example.com").await;
		repo.create(&new_issue(user_id)).await.unwrap();
		repo.create(&new_issue(other)).await.unwrap();

		let listed = repo.list(&user_id).await.unwrap();
		assert_eq!(listed.len(), 1);
		assert_eq!(listed[0].created_by, user_id);
		assert!(repo.list(&UserId::generate()).await.unwrap().is_empty());
	}
}
