// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server error types.

use serde::{Deserialize, Serialize};

/// Machine-readable error body for non-envelope failures (e.g. malformed IDs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Stable error code (e.g. `invalid_id`).
	pub error: String,
	/// Human-readable description.
	pub message: String,
}

impl ErrorResponse {
	pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			error: error.into(),
			message: message.into(),
		}
	}
}
