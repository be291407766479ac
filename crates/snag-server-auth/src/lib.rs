// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication primitives for the Snag issue tracker.
//!
//! This crate provides the building blocks the HTTP server composes into its
//! auth flow:
//!
//! - Typed IDs and issue enums ([`UserId`], [`IssueStatus`], [`IssuePriority`])
//! - Password hashing with argon2id ([`hash_password`], [`verify_password`])
//! - Stateless session tokens ([`TokenCodec`])
//! - Session-cookie conventions and request auth state ([`AuthContext`])

pub mod middleware;
pub mod password;
pub mod token;
pub mod types;
pub mod user;

pub use middleware::{
	build_clear_cookie, build_session_cookie, extract_session_cookie,
	extract_session_cookie_with_name, AuthConfig, AuthContext, AuthRequired, CurrentUser,
	SESSION_COOKIE_NAME,
};
pub use password::{hash_password, verify_password, PasswordError};
pub use token::{SessionClaims, TokenCodec, TokenError};
pub use types::{CommentId, IssueId, IssuePriority, IssueStatus, UserId};
pub use user::{username_from_display_name, User, UserProfile};
