// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Issue HTTP handlers.
//!
//! Ownership rules: editing and deleting an issue require being its creator;
//! changing the status only requires being signed in.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use snag_server_auth::{IssueId, IssuePriority, IssueStatus, UserId};
use snag_server_db::{DbError, Issue, IssueChanges, NewIssue};

use crate::api::AppState;
use crate::api_response::{self, FieldErrors};
use crate::auth_middleware::RequireAuth;
use crate::error::ErrorResponse;
use crate::validation::{
	parse_issue_id, parse_labels, parse_priority, parse_status, validate_description,
	validate_title,
};

/// JSON projection of an issue: lowercase enums, labels as an array.
#[derive(Debug, Serialize)]
pub struct IssueView {
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

impl From<Issue> for IssueView {
	fn from(issue: Issue) -> Self {
		Self {
			id: issue.id,
			title: issue.title,
			description: issue.description,
			status: issue.status,
			priority: issue.priority,
			labels: issue.labels,
			created_by: issue.created_by,
			created_at: issue.created_at,
			updated_at: issue.updated_at,
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct CreateIssueRequest {
	pub title: String,
	pub description: String,
	#[serde(default)]
	pub status: Option<String>,
	#[serde(default)]
	pub priority: Option<String>,
	/// Comma-separated label list, as typed into the form field.
	#[serde(default)]
	pub labels: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateIssueRequest {
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub status: Option<String>,
	#[serde(default)]
	pub priority: Option<String>,
	#[serde(default)]
	pub labels: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
	pub status: String,
}

#[derive(Debug, Serialize)]
pub struct IssueListResponse {
	pub issues: Vec<IssueView>,
}

#[derive(Debug, Serialize)]
pub struct IssueResponse {
	pub issue: IssueView,
}

/// POST /api/issues
pub async fn create_issue(
	State(state): State<AppState>,
	RequireAuth(current_user): RequireAuth,
	Json(payload): Json<CreateIssueRequest>,
) -> Response {
	let mut errors = FieldErrors::new();

	let title = payload.title.trim().to_string();
	let description = payload.description.trim().to_string();
	validate_title(&mut errors, &title);
	validate_description(&mut errors, &description);

	let status = match payload.status.as_deref() {
		Some(raw) => parse_status(&mut errors, raw).unwrap_or_default(),
		None => IssueStatus::default(),
	};
	let priority = match payload.priority.as_deref() {
		Some(raw) => parse_priority(&mut errors, raw).unwrap_or_default(),
		None => IssuePriority::default(),
	};
	let labels = payload
		.labels
		.as_deref()
		.map(|raw| parse_labels(&mut errors, raw))
		.unwrap_or_default();

	if !errors.is_empty() {
		return api_response::validation_failed(errors).into_response();
	}

	let new_issue = NewIssue {
		title,
		description,
		status,
		priority,
		labels,
		created_by: current_user.user.id,
	};

	match state.issues.create(&new_issue).await {
		Ok(issue) => {
			api_response::created("Issue created successfully", json!({ "id": issue.id }))
				.into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to create issue");
			api_response::internal_error().into_response()
		}
	}
}

/// GET /api/issues
///
/// Listing is scoped to the signed-in user's own issues.
pub async fn list_issues(
	State(state): State<AppState>,
	RequireAuth(current_user): RequireAuth,
) -> Response {
	match state.issues.list(&current_user.user.id).await {
		Ok(issues) => (
			StatusCode::OK,
			Json(IssueListResponse {
				issues: issues.into_iter().map(IssueView::from).collect(),
			}),
		)
			.into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to list issues");
			api_response::internal_error().into_response()
		}
	}
}

/// GET /api/issues/{id}
pub async fn get_issue(
	State(state): State<AppState>,
	RequireAuth(_current_user): RequireAuth,
	Path(id): Path<String>,
) -> Response {
	let issue_id = match parse_issue_id(&id) {
		Ok(issue_id) => issue_id,
		Err(e) => return invalid_id(e),
	};

	match state.issues.get(&issue_id).await {
		Ok(Some(issue)) => (
			StatusCode::OK,
			Json(IssueResponse {
				issue: IssueView::from(issue),
			}),
		)
			.into_response(),
		Ok(None) => api_response::not_found("Issue not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to fetch issue");
			api_response::internal_error().into_response()
		}
	}
}

/// PATCH /api/issues/{id}
pub async fn update_issue(
	State(state): State<AppState>,
	RequireAuth(current_user): RequireAuth,
	Path(id): Path<String>,
	Json(payload): Json<UpdateIssueRequest>,
) -> Response {
	let issue_id = match parse_issue_id(&id) {
		Ok(issue_id) => issue_id,
		Err(e) => return invalid_id(e),
	};

	let issue = match state.issues.get(&issue_id).await {
		Ok(Some(issue)) => issue,
		Ok(None) => return api_response::not_found("Issue not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to fetch issue for update");
			return api_response::internal_error().into_response();
		}
	};

	if issue.created_by != current_user.user.id {
		tracing::info!(
			issue_id = %issue_id,
			user_id = %current_user.user.id,
			"issue update denied: not the creator"
		);
		return api_response::forbidden().into_response();
	}

	let mut errors = FieldErrors::new();
	let mut changes = IssueChanges::default();

	if let Some(raw) = payload.title.as_deref() {
		let title = raw.trim().to_string();
		validate_title(&mut errors, &title);
		changes.title = Some(title);
	}
	if let Some(raw) = payload.description.as_deref() {
		let description = raw.trim().to_string();
		validate_description(&mut errors, &description);
		changes.description = Some(description);
	}
	if let Some(raw) = payload.status.as_deref() {
		changes.status = parse_status(&mut errors, raw);
	}
	if let Some(raw) = payload.priority.as_deref() {
		changes.priority = parse_priority(&mut errors, raw);
	}
	if let Some(raw) = payload.labels.as_deref() {
		changes.labels = Some(parse_labels(&mut errors, raw));
	}

	if !errors.is_empty() {
		return api_response::validation_failed(errors).into_response();
	}

	match state.issues.update(&issue_id, &changes).await {
		Ok(()) => api_response::ok("Issue updated successfully").into_response(),
		Err(DbError::NotFound(_)) => api_response::not_found("Issue not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to update issue");
			api_response::internal_error().into_response()
		}
	}
}

/// POST /api/issues/{id}/status
///
/// Any authenticated user may move an issue through the workflow; creator
/// ownership is required only for edits and deletion.
pub async fn change_issue_status(
	State(state): State<AppState>,
	RequireAuth(_current_user): RequireAuth,
	Path(id): Path<String>,
	Json(payload): Json<ChangeStatusRequest>,
) -> Response {
	let issue_id = match parse_issue_id(&id) {
		Ok(issue_id) => issue_id,
		Err(e) => return invalid_id(e),
	};

	let mut errors = FieldErrors::new();
	let Some(status) = parse_status(&mut errors, &payload.status) else {
		return api_response::validation_failed(errors).into_response();
	};

	match state.issues.update_status(&issue_id, status).await {
		Ok(()) => api_response::ok("Status updated").into_response(),
		Err(DbError::NotFound(_)) => api_response::not_found("Issue not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to change issue status");
			api_response::internal_error().into_response()
		}
	}
}

/// DELETE /api/issues/{id}
pub async fn delete_issue(
	State(state): State<AppState>,
	RequireAuth(current_user): RequireAuth,
	Path(id): Path<String>,
) -> Response {
	let issue_id = match parse_issue_id(&id) {
		Ok(issue_id) => issue_id,
		Err(e) => return invalid_id(e),
	};

	let issue = match state.issues.get(&issue_id).await {
		Ok(Some(issue)) => issue,
		Ok(None) => return api_response::not_found("Issue not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to fetch issue for deletion");
			return api_response::internal_error().into_response();
		}
	};

	if issue.created_by != current_user.user.id {
		tracing::info!(
			issue_id = %issue_id,
			user_id = %current_user.user.id,
			"issue deletion denied: not the creator"
		);
		return api_response::forbidden().into_response();
	}

	match state.issues.delete_cascade(&issue_id).await {
		Ok(()) => api_response::ok("Issue deleted successfully").into_response(),
		Err(DbError::NotFound(_)) => api_response::not_found("Issue not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to delete issue");
			api_response::internal_error().into_response()
		}
	}
}

fn invalid_id(e: ErrorResponse) -> Response {
	(StatusCode::BAD_REQUEST, Json(e)).into_response()
}
