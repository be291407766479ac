// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Snag issue tracker server.
//!
//! This crate provides the HTTP API for the Snag issue tracker: cookie-based
//! sessions, a navigation route gate, and issue/comment CRUD over SQLite.

pub mod api;
pub mod api_response;
pub mod auth_middleware;
pub mod error;
pub mod route_gate;
pub mod routes;
pub mod validation;

pub use api::{create_app_state, create_router, AppState};
pub use error::ErrorResponse;
pub use route_gate::RouteGate;
pub use snag_server_config::ServerConfig;
