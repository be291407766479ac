// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mergeable configuration layer spanning all sections.

use serde::Deserialize;

use crate::sections::{
	AuthConfigLayer, DatabaseConfigLayer, HttpConfigLayer, LoggingConfigLayer, OAuthConfigLayer,
};

/// One layer of configuration, as produced by a single source.
///
/// Layers from lower-precedence sources are merged into higher-precedence
/// ones field by field; `None` never overwrites `Some`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub auth: Option<AuthConfigLayer>,
	#[serde(default)]
	pub oauth: Option<OAuthConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl ServerConfigLayer {
	/// Merge a higher-precedence layer into this one.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_section(&mut self.http, other.http, HttpConfigLayer::merge);
		merge_section(&mut self.database, other.database, DatabaseConfigLayer::merge);
		merge_section(&mut self.auth, other.auth, AuthConfigLayer::merge);
		merge_section(&mut self.oauth, other.oauth, OAuthConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: impl FnOnce(&mut T, T)) {
	match (base.as_mut(), other) {
		(Some(base), Some(other)) => merge(base, other),
		(None, Some(other)) => *base = Some(other),
		_ => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_merge_fills_missing_sections() {
		let mut base = ServerConfigLayer::default();
		base.merge(ServerConfigLayer {
			http: Some(HttpConfigLayer {
				port: Some(9000),
				..Default::default()
			}),
			..Default::default()
		});
		assert_eq!(base.http.unwrap().port, Some(9000));
	}

	#[test]
	fn test_merge_overrides_fields_not_sections() {
		let mut base = ServerConfigLayer {
			http: Some(HttpConfigLayer {
				host: Some("0.0.0.0".to_string()),
				port: Some(8080),
				..Default::default()
			}),
			..Default::default()
		};
		base.merge(ServerConfigLayer {
			http: Some(HttpConfigLayer {
				port: Some(9000),
				..Default::default()
			}),
			..Default::default()
		});
		let http = base.http.unwrap();
		assert_eq!(http.host.as_deref(), Some("0.0.0.0"));
		assert_eq!(http.port, Some(9000));
	}

	#[test]
	fn test_toml_deserializes_partial_layer() {
		let layer: ServerConfigLayer = toml::from_str(
			r#"
			[http]
			port = 3000

			[auth]
			jwt_secret = "s3cret"
			"#,
		)
		.unwrap();
		assert_eq!(layer.http.unwrap().port, Some(3000));
		assert_eq!(layer.auth.unwrap().jwt_secret.as_deref(), Some("s3cret"));
		assert!(layer.database.is_none());
	}
}
