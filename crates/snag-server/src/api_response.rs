// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! API response envelope and helpers.
//!
//! Mutation endpoints answer with a uniform [`ActionResponse`] envelope:
//! `{ success, message }` plus optional per-field `errors` and `data`. The
//! message strings are part of the API contract and asserted by the client.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-field validation errors, keyed by field name.
pub type FieldErrors = HashMap<String, Vec<String>>;

/// Uniform response envelope for mutation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
	pub success: bool,
	pub message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub errors: Option<FieldErrors>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<serde_json::Value>,
}

impl ActionResponse {
	pub fn success(message: impl Into<String>) -> Self {
		Self {
			success: true,
			message: message.into(),
			errors: None,
			data: None,
		}
	}

	pub fn success_with_data(message: impl Into<String>, data: serde_json::Value) -> Self {
		Self {
			success: true,
			message: message.into(),
			errors: None,
			data: Some(data),
		}
	}

	pub fn failure(message: impl Into<String>) -> Self {
		Self {
			success: false,
			message: message.into(),
			errors: None,
			data: None,
		}
	}
}

/// 200 OK with a success envelope.
pub fn ok(message: impl Into<String>) -> (StatusCode, Json<ActionResponse>) {
	(StatusCode::OK, Json(ActionResponse::success(message)))
}

/// 201 Created with a success envelope and payload.
pub fn created(
	message: impl Into<String>,
	data: serde_json::Value,
) -> (StatusCode, Json<ActionResponse>) {
	(
		StatusCode::CREATED,
		Json(ActionResponse::success_with_data(message, data)),
	)
}

/// 400 Bad Request with per-field validation errors.
pub fn validation_failed(errors: FieldErrors) -> (StatusCode, Json<ActionResponse>) {
	(
		StatusCode::BAD_REQUEST,
		Json(ActionResponse {
			success: false,
			message: "Validation failed".to_string(),
			errors: Some(errors),
			data: None,
		}),
	)
}

/// 400 Bad Request with a plain failure message.
pub fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ActionResponse>) {
	(StatusCode::BAD_REQUEST, Json(ActionResponse::failure(message)))
}

/// 401 Unauthorized.
pub fn unauthorized(message: impl Into<String>) -> (StatusCode, Json<ActionResponse>) {
	(
		StatusCode::UNAUTHORIZED,
		Json(ActionResponse::failure(message)),
	)
}

/// 403 Forbidden with the ownership-denial message.
pub fn forbidden() -> (StatusCode, Json<ActionResponse>) {
	(
		StatusCode::FORBIDDEN,
		Json(ActionResponse::failure("Permission denied")),
	)
}

/// 404 Not Found.
pub fn not_found(message: impl Into<String>) -> (StatusCode, Json<ActionResponse>) {
	(StatusCode::NOT_FOUND, Json(ActionResponse::failure(message)))
}

/// 500 Internal Server Error with an opaque message.
pub fn internal_error() -> (StatusCode, Json<ActionResponse>) {
	(
		StatusCode::INTERNAL_SERVER_ERROR,
		Json(ActionResponse::failure("Something went wrong")),
	)
}

/// 501 Not Implemented (feature not configured).
pub fn not_implemented(message: impl Into<String>) -> (StatusCode, Json<ActionResponse>) {
	(
		StatusCode::NOT_IMPLEMENTED,
		Json(ActionResponse::failure(message)),
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_success_envelope_omits_optionals() {
		let json = serde_json::to_value(ActionResponse::success("Login successful")).unwrap();
		assert_eq!(json["success"], true);
		assert_eq!(json["message"], "Login successful");
		assert!(json.get("errors").is_none());
		assert!(json.get("data").is_none());
	}

	#[test]
	fn test_validation_failed_includes_errors() {
		let mut errors = FieldErrors::new();
		errors.insert("email".to_string(), vec!["Invalid email".to_string()]);
		let (status, Json(body)) = validation_failed(errors);
		assert_eq!(status, StatusCode::BAD_REQUEST);
		assert_eq!(body.message, "Validation failed");
		assert_eq!(body.errors.unwrap()["email"], vec!["Invalid email"]);
	}
}
