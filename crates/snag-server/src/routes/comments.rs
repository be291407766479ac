// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Comment HTTP handlers.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use snag_server_db::CommentWithAuthor;

use crate::api::AppState;
use crate::api_response;
use crate::auth_middleware::RequireAuth;
use crate::error::ErrorResponse;
use crate::validation::{parse_issue_id, validate_comment};

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
	pub content: String,
}

#[derive(Debug, Serialize)]
pub struct CommentListResponse {
	pub comments: Vec<CommentWithAuthor>,
}

/// POST /api/issues/{id}/comments
pub async fn create_comment(
	State(state): State<AppState>,
	RequireAuth(current_user): RequireAuth,
	Path(id): Path<String>,
	Json(payload): Json<CreateCommentRequest>,
) -> Response {
	let issue_id = match parse_issue_id(&id) {
		Ok(issue_id) => issue_id,
		Err(e) => return invalid_id(e),
	};

	let content = payload.content.trim().to_string();
	if let Err(errors) = validate_comment(&content) {
		return api_response::validation_failed(errors).into_response();
	}

	match state.issues.get(&issue_id).await {
		Ok(Some(_)) => {}
		Ok(None) => return api_response::not_found("Issue not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to fetch issue for comment");
			return api_response::internal_error().into_response();
		}
	}

	match state
		.comments
		.create(&issue_id, &current_user.user.id, &content)
		.await
	{
		Ok(comment) => {
			api_response::created("Comment added", json!({ "id": comment.id })).into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to create comment");
			api_response::internal_error().into_response()
		}
	}
}

/// GET /api/issues/{id}/comments
pub async fn list_comments(
	State(state): State<AppState>,
	RequireAuth(_current_user): RequireAuth,
	Path(id): Path<String>,
) -> Response {
	let issue_id = match parse_issue_id(&id) {
		Ok(issue_id) => issue_id,
		Err(e) => return invalid_id(e),
	};

	match state.issues.get(&issue_id).await {
		Ok(Some(_)) => {}
		Ok(None) => return api_response::not_found("Issue not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to fetch issue for comment listing");
			return api_response::internal_error().into_response();
		}
	}

	match state.comments.list_for_issue(&issue_id).await {
		Ok(comments) => (StatusCode::OK, Json(CommentListResponse { comments })).into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to list comments");
			api_response::internal_error().into_response()
		}
	}
}

fn invalid_id(e: ErrorResponse) -> Response {
	(StatusCode::BAD_REQUEST, Json(e)).into_response()
}
