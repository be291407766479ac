// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP route handlers.

pub mod auth;
pub mod comments;
pub mod health;
pub mod issues;
pub mod me;
