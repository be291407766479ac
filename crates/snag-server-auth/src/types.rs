// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for the issue tracker.
//!
//! This module defines:
//!
//! - **ID newtypes**: Type-safe wrappers around UUIDs for different entity types
//!   ([`UserId`], [`IssueId`], [`CommentId`]) preventing accidental mixing
//! - **Issue enums**: [`IssueStatus`] and [`IssuePriority`] with lowercase JSON
//!   forms and uppercase database forms
//!
//! All ID types implement transparent serde serialization (as UUID strings) and
//! provide conversion to/from [`uuid::Uuid`].

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(IssueId, "Unique identifier for an issue.");
define_id_type!(CommentId, "Unique identifier for a comment.");

// =============================================================================
// Issue Status
// =============================================================================

/// Workflow state of an issue.
///
/// Serialized as lowercase snake_case in JSON (`open`, `in_progress`,
/// `closed`); stored uppercase in the database (`OPEN`, `IN_PROGRESS`,
/// `CLOSED`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
	Open,
	InProgress,
	Closed,
}

impl IssueStatus {
	/// Returns all statuses.
	pub fn all() -> &'static [IssueStatus] {
		&[
			IssueStatus::Open,
			IssueStatus::InProgress,
			IssueStatus::Closed,
		]
	}

	/// Lowercase form used in the JSON API.
	pub fn as_str(&self) -> &'static str {
		match self {
			IssueStatus::Open => "open",
			IssueStatus::InProgress => "in_progress",
			IssueStatus::Closed => "closed",
		}
	}

	/// Uppercase form used in the database.
	pub fn as_db_str(&self) -> &'static str {
		match self {
			IssueStatus::Open => "OPEN",
			IssueStatus::InProgress => "IN_PROGRESS",
			IssueStatus::Closed => "CLOSED",
		}
	}

	/// Parse the lowercase API form.
	pub fn parse(s: &str) -> Option<Self> {
		match s {
			"open" => Some(IssueStatus::Open),
			"in_progress" => Some(IssueStatus::InProgress),
			"closed" => Some(IssueStatus::Closed),
			_ => None,
		}
	}

	/// Parse the uppercase database form.
	pub fn parse_db(s: &str) -> Option<Self> {
		match s {
			"OPEN" => Some(IssueStatus::Open),
			"IN_PROGRESS" => Some(IssueStatus::InProgress),
			"CLOSED" => Some(IssueStatus::Closed),
			_ => None,
		}
	}
}

impl Default for IssueStatus {
	fn default() -> Self {
		IssueStatus::Open
	}
}

impl fmt::Display for IssueStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

// =============================================================================
// Issue Priority
// =============================================================================

/// Priority of an issue.
///
/// Same serialization convention as [`IssueStatus`]: lowercase in JSON,
/// uppercase in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssuePriority {
	Low,
	Medium,
	High,
}

impl IssuePriority {
	/// Returns all priorities.
	pub fn all() -> &'static [IssuePriority] {
		&[
			IssuePriority::Low,
			IssuePriority::Medium,
			IssuePriority::High,
		]
	}

	/// Lowercase form used in the JSON API.
	pub fn as_str(&self) -> &'static str {
		match self {
			IssuePriority::Low => "low",
			IssuePriority::Medium => "medium",
			IssuePriority::High => "high",
		}
	}

	/// Uppercase form used in the database.
	pub fn as_db_str(&self) -> &'static str {
		match self {
			IssuePriority::Low => "LOW",
			IssuePriority::Medium => "MEDIUM",
			IssuePriority::High => "HIGH",
		}
	}

	/// Parse the lowercase API form.
	pub fn parse(s: &str) -> Option<Self> {
		match s {
			"low" => Some(IssuePriority::Low),
			"medium" => Some(IssuePriority::Medium),
			"high" => Some(IssuePriority::High),
			_ => None,
		}
	}

	/// Parse the uppercase database form.
	pub fn parse_db(s: &str) -> Option<Self> {
		match s {
			"LOW" => Some(IssuePriority::Low),
			"MEDIUM" => Some(IssuePriority::Medium),
			"HIGH" => Some(IssuePriority::High),
			_ => None,
		}
	}
}

impl Default for IssuePriority {
	fn default() -> Self {
		IssuePriority::Medium
	}
}

impl fmt::Display for IssuePriority {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	mod ids {
		use super::*;

		#[test]
		fn test_generate_is_unique() {
			assert_ne!(UserId::generate(), UserId::generate());
		}

		#[test]
		fn test_serde_transparent() {
			let id = IssueId::generate();
			let json = serde_json::to_string(&id).unwrap();
			assert_eq!(json, format!("\"{}\"", id.as_uuid()));
			let back: IssueId = serde_json::from_str(&json).unwrap();
			assert_eq!(back, id);
		}

		#[test]
		fn test_display_matches_uuid() {
			let uuid = Uuid::new_v4();
			let id = CommentId::new(uuid);
			assert_eq!(id.to_string(), uuid.to_string());
		}
	}

	mod status {
		use super::*;
		use proptest::prelude::*;

		#[test]
		fn test_default_is_open() {
			assert_eq!(IssueStatus::default(), IssueStatus::Open);
		}

		#[test]
		fn test_parse_rejects_db_form() {
			assert_eq!(IssueStatus::parse("OPEN"), None);
			assert_eq!(IssueStatus::parse_db("open"), None);
		}

		#[test]
		fn test_serde_lowercase() {
			let json = serde_json::to_string(&IssueStatus::InProgress).unwrap();
			assert_eq!(json, "\"in_progress\"");
		}

		proptest! {
			#[test]
			fn prop_db_round_trip(idx in 0usize..3) {
				let status = IssueStatus::all()[idx];
				prop_assert_eq!(IssueStatus::parse_db(status.as_db_str()), Some(status));
				prop_assert_eq!(IssueStatus::parse(status.as_str()), Some(status));
			}
		}
	}

	mod priority {
		use super::*;
		use proptest::prelude::*;

		#[test]
		fn test_default_is_medium() {
			assert_eq!(IssuePriority::default(), IssuePriority::Medium);
		}

		#[test]
		fn test_parse_unknown() {
			assert_eq!(IssuePriority::parse("urgent"), None);
		}

		proptest! {
			#[test]
			fn prop_db_round_trip(idx in 0usize..3) {
				let priority = IssuePriority::all()[idx];
				prop_assert_eq!(IssuePriority::parse_db(priority.as_db_str()), Some(priority));
				prop_assert_eq!(IssuePriority::parse(priority.as_str()), Some(priority));
			}
		}
	}
}
