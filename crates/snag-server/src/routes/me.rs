// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Current-user HTTP handler.

use axum::Json;
use serde::Serialize;
use snag_server_auth::UserProfile;

use crate::auth_middleware::OptionalAuth;

#[derive(Debug, Serialize)]
pub struct MeResponse {
	pub user: Option<UserProfile>,
}

/// GET /api/me - the signed-in user's profile, or null.
///
/// Always answers 200; an absent or invalid session degrades to
/// `{ "user": null }` rather than an error.
pub async fn get_me(OptionalAuth(current_user): OptionalAuth) -> Json<MeResponse> {
	Json(MeResponse {
		user: current_user.map(|cu| cu.user.to_profile()),
	})
}
