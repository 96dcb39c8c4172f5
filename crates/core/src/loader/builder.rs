// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::{BulkLoader, RetryPolicy};
use crate::{Result, config::LoaderConfig, schema::TypeRegistry};

pub struct LoaderBuilder {
	registry: Option<TypeRegistry>,
	config: LoaderConfig,
}

impl Default for LoaderBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl LoaderBuilder {
	pub fn new() -> Self {
		Self {
			registry: None,
			config: LoaderConfig::default(),
		}
	}

	/// Share a registry with other loaders. Defaults to a fresh one.
	pub fn registry(mut self, registry: TypeRegistry) -> Self {
		self.registry = Some(registry);
		self
	}

	/// Replace the whole configuration.
	pub fn config(mut self, config: LoaderConfig) -> Self {
		self.config = config;
		self
	}

	pub fn retry(mut self, policy: RetryPolicy) -> Self {
		self.config.retry = policy;
		self
	}

	pub fn staging_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.config.staging_prefix = prefix.into();
		self
	}

	pub fn flush_threshold(mut self, bytes: usize) -> Self {
		self.config.flush_threshold = bytes;
		self
	}

	pub fn lock_target(mut self, lock: bool) -> Self {
		self.config.lock_target = lock;
		self
	}

	pub fn build(self) -> Result<BulkLoader> {
		BulkLoader::new(self.registry.unwrap_or_default(), self.config)
	}
}
