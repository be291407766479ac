// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence for the Snag issue tracker.
//!
//! Repositories hold a [`sqlx::SqlitePool`] and expose async CRUD methods.
//! All IDs are UUIDs stored as TEXT; timestamps are RFC 3339 TEXT.

pub mod comment;
pub mod error;
pub mod issue;
pub mod pool;
pub mod testing;
pub mod user;

pub use comment::{Comment, CommentRepository, CommentWithAuthor};
pub use error::{DbError, Result};
pub use issue::{Issue, IssueChanges, IssueRepository, NewIssue};
pub use pool::{create_pool, run_migrations};
pub use user::{NewUser, UserRepository};
