// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

use crate::{
	Error, Result,
	loader::RetryPolicy,
	schema::ident::validate_identifier,
};

/// Bytes buffered before encoded rows are sent to the copy sink.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 64 * 1024;

pub const DEFAULT_STAGING_PREFIX: &str = "tmp";

/// Settings of a [`BulkLoader`](crate::BulkLoader).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
	/// Re-execution of failed distinct loads.
	pub retry: RetryPolicy,
	/// Leading part of staging table names.
	pub staging_prefix: String,
	pub flush_threshold: usize,
	/// Take a `SHARE ROW EXCLUSIVE` lock on the target before the distinct
	/// insert, so concurrent distinct loads into one table cannot both insert
	/// the same key.
	pub lock_target: bool,
}

impl Default for LoaderConfig {
	fn default() -> Self {
		Self {
			retry: RetryPolicy::default(),
			staging_prefix: DEFAULT_STAGING_PREFIX.to_string(),
			flush_threshold: DEFAULT_FLUSH_THRESHOLD,
			lock_target: false,
		}
	}
}

impl LoaderConfig {
	/// Checks settings that end up in generated SQL. The staging prefix is
	/// interpolated unquoted, so it must be a plain identifier.
	pub fn validate(&self) -> Result<()> {
		validate_identifier(&self.staging_prefix)?;
		if self.staging_prefix.starts_with('"') {
			return Err(Error::InvalidIdentifier {
				identifier: self.staging_prefix.clone(),
			});
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = LoaderConfig::default();
		assert_eq!(config.staging_prefix, "tmp");
		assert_eq!(config.flush_threshold, 65536);
		assert!(!config.lock_target);
		assert_eq!(config.retry.max_attempts, 2);
	}

	#[test]
	fn test_deserialize() {
		let config: LoaderConfig =
			serde_json::from_str(r#"{"staging_prefix": "stage", "lock_target": true, "retry": {"max_attempts": 3}}"#)
				.unwrap();
		assert_eq!(config.staging_prefix, "stage");
		assert!(config.lock_target);
		assert_eq!(config.retry.max_attempts, 3);
		assert_eq!(config.flush_threshold, DEFAULT_FLUSH_THRESHOLD);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_deserialized_prefix_is_validated() {
		let config: LoaderConfig = serde_json::from_str(r#"{"staging_prefix": "1x"}"#).unwrap();
		assert!(matches!(config.validate(), Err(Error::InvalidIdentifier { identifier }) if identifier == "1x"));
	}
}
