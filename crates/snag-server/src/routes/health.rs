// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health check HTTP handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::api::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	pub database: &'static str,
	pub version: &'static str,
	pub timestamp: String,
}

/// GET /health - liveness and database connectivity check.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let database_ok = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

	let (status, database, http_status) = if database_ok {
		("healthy", "up", StatusCode::OK)
	} else {
		("unhealthy", "down", StatusCode::SERVICE_UNAVAILABLE)
	};

	if !database_ok {
		tracing::error!("health check: database unreachable");
	}

	(
		http_status,
		Json(HealthResponse {
			status,
			database,
			version: env!("CARGO_PKG_VERSION"),
			timestamp: chrono::Utc::now().to_rfc3339(),
		}),
	)
}
