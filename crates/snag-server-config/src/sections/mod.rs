// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-section configuration types.

mod auth;
mod database;
mod http;
mod logging;
mod oauth;

pub use auth::{AuthConfig, AuthConfigLayer, DEFAULT_SESSION_TTL_SECS};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use oauth::{GoogleOAuthConfig, GoogleOAuthConfigLayer, OAuthConfig, OAuthConfigLayer};
