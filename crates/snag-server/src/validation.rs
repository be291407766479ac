// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Request validation.
//!
//! Bounds are part of the API contract:
//! - username 3-30 chars
//! - email non-empty, at most 255 chars, must contain `@`
//! - password 8-128 chars on registration, non-empty on login
//! - issue title 1-200 chars after trim
//! - issue description 10-5000 chars after trim
//! - comment content 1-2000 chars after trim
//! - at most 10 labels, each 1-50 chars after trim
//!
//! Validators collect per-field error messages into a [`FieldErrors`] map so
//! a single response can report every failing field.

use snag_server_auth::{IssueId, IssuePriority, IssueStatus};
use uuid::Uuid;

use crate::api_response::FieldErrors;
use crate::error::ErrorResponse;

pub const MAX_LABELS: usize = 10;

/// Normalize an email address: trim whitespace and lowercase.
pub fn sanitize_email(email: &str) -> String {
	email.trim().to_lowercase()
}

fn push_error(errors: &mut FieldErrors, field: &str, message: &str) {
	errors
		.entry(field.to_string())
		.or_default()
		.push(message.to_string());
}

fn validate_email_into(errors: &mut FieldErrors, email: &str) {
	if email.is_empty() {
		push_error(errors, "email", "Email is required");
	} else if email.len() > 255 || !email.contains('@') {
		push_error(errors, "email", "Invalid email address");
	}
}

/// Validate registration input. `email` must already be sanitized.
pub fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), FieldErrors> {
	let mut errors = FieldErrors::new();

	let username_len = username.chars().count();
	if !(3..=30).contains(&username_len) {
		push_error(
			&mut errors,
			"username",
			"Username must be between 3 and 30 characters",
		);
	}

	validate_email_into(&mut errors, email);

	let password_len = password.chars().count();
	if !(8..=128).contains(&password_len) {
		push_error(
			&mut errors,
			"password",
			"Password must be between 8 and 128 characters",
		);
	}

	if errors.is_empty() {
		Ok(())
	} else {
		Err(errors)
	}
}

/// Validate login input. `email` must already be sanitized.
pub fn validate_login(email: &str, password: &str) -> Result<(), FieldErrors> {
	let mut errors = FieldErrors::new();

	validate_email_into(&mut errors, email);

	if password.is_empty() {
		push_error(&mut errors, "password", "Password is required");
	}

	if errors.is_empty() {
		Ok(())
	} else {
		Err(errors)
	}
}

/// Validate an issue title (already trimmed).
pub fn validate_title(errors: &mut FieldErrors, title: &str) {
	let len = title.chars().count();
	if !(1..=200).contains(&len) {
		push_error(errors, "title", "Title must be between 1 and 200 characters");
	}
}

/// Validate an issue description (already trimmed).
pub fn validate_description(errors: &mut FieldErrors, description: &str) {
	let len = description.chars().count();
	if !(10..=5000).contains(&len) {
		push_error(
			errors,
			"description",
			"Description must be between 10 and 5000 characters",
		);
	}
}

/// Validate a comment body (already trimmed).
pub fn validate_comment(content: &str) -> Result<(), FieldErrors> {
	let mut errors = FieldErrors::new();
	let len = content.chars().count();
	if !(1..=2000).contains(&len) {
		push_error(
			&mut errors,
			"content",
			"Comment must be between 1 and 2000 characters",
		);
	}
	if errors.is_empty() {
		Ok(())
	} else {
		Err(errors)
	}
}

/// Parse a status from its lowercase API form.
pub fn parse_status(errors: &mut FieldErrors, raw: &str) -> Option<IssueStatus> {
	match IssueStatus::parse(raw) {
		Some(status) => Some(status),
		None => {
			push_error(errors, "status", "Invalid status");
			None
		}
	}
}

/// Parse a priority from its lowercase API form.
pub fn parse_priority(errors: &mut FieldErrors, raw: &str) -> Option<IssuePriority> {
	match IssuePriority::parse(raw) {
		Some(priority) => Some(priority),
		None => {
			push_error(errors, "priority", "Invalid priority");
			None
		}
	}
}

/// Parse a comma-separated label list.
///
/// Splits on commas, trims, drops empty entries, and keeps at most
/// [`MAX_LABELS`] labels (extra entries are silently dropped). Each surviving
/// label must be 1-50 characters.
pub fn parse_labels(errors: &mut FieldErrors, raw: &str) -> Vec<String> {
	let labels: Vec<String> = raw
		.split(',')
		.map(|s| s.trim().to_string())
		.filter(|s| !s.is_empty())
		.take(MAX_LABELS)
		.collect();

	for label in &labels {
		if label.chars().count() > 50 {
			push_error(
				errors,
				"labels",
				"Each label must be between 1 and 50 characters",
			);
			break;
		}
	}

	labels
}

/// Parse a UUID path segment into an [`IssueId`].
pub fn parse_issue_id(raw: &str) -> Result<IssueId, ErrorResponse> {
	Uuid::parse_str(raw)
		.map(IssueId::new)
		.map_err(|_| ErrorResponse::new("invalid_id", format!("'{raw}' is not a valid issue id")))
}
