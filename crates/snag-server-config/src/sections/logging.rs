// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Logging configuration.

use serde::Deserialize;

/// Logging configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct LoggingConfig {
	/// tracing-subscriber env-filter directive (e.g. `info`, `snag_server=debug`).
	pub level: String,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
		}
	}
}

/// Logging configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfigLayer {
	#[serde(default)]
	pub level: Option<String>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: LoggingConfigLayer) {
		if other.level.is_some() {
			self.level = other.level;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		LoggingConfig {
			level: self.level.unwrap_or_else(|| "info".to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_level() {
		assert_eq!(LoggingConfigLayer::default().finalize().level, "info");
	}
}
