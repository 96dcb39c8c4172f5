// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Bulk loading of record slices.
//!
//! Every operation owns the connection lifecycle: the connection is opened
//! when closed, used for exactly one transaction, and closed afterwards on
//! success and on error.

mod builder;
mod distinct;
mod load;
mod retry;

pub use builder::LoaderBuilder;
pub use retry::{RetryOutcome, RetryPolicy};
use tracing::{debug, warn};

use crate::{
	Result,
	config::LoaderConfig,
	connection::Connection,
	encoder::{CopyChannel, write_row},
	schema::{TypeDescriptor, TypeRegistry},
	sql::CopyTarget,
};

/// Outcome of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
	pub table: String,
	/// Rows transferred through `COPY`.
	pub streamed: u64,
	/// Rows added to the target table.
	pub inserted: u64,
	/// Attempts used, including the successful one.
	pub attempts: u32,
}

#[derive(Clone, Default)]
pub struct BulkLoader {
	registry: TypeRegistry,
	config: LoaderConfig,
}

impl BulkLoader {
	/// Fails when `config` does not pass [`LoaderConfig::validate`].
	pub fn new(registry: TypeRegistry, config: LoaderConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self {
			registry,
			config,
		})
	}

	pub fn builder() -> LoaderBuilder {
		LoaderBuilder::new()
	}

	pub fn registry(&self) -> &TypeRegistry {
		&self.registry
	}

	pub fn config(&self) -> &LoaderConfig {
		&self.config
	}
}

async fn open_if_closed<C: Connection>(conn: &mut C) -> Result<()> {
	if !conn.is_open() {
		conn.open().await?;
		debug!("connection opened");
	}
	Ok(())
}

/// Closes `conn` and returns `result`. A failed close is logged; it never
/// replaces the outcome of the work already done.
async fn close_after<C: Connection, T>(conn: &mut C, result: Result<T>) -> Result<T> {
	if let Err(err) = conn.close().await {
		warn!(error = %err, "failed to close connection");
	}
	result
}

/// Copies `records` into `target`, returning the row count the sink reports.
async fn stream_records<C: Connection, R>(
	conn: &mut C,
	target: &CopyTarget,
	records: &[R],
	descriptor: &TypeDescriptor<R>,
	flush_threshold: usize,
) -> Result<u64> {
	let sink = conn.copy_in(target).await?;
	let mut channel = CopyChannel::new(sink, descriptor.columns().len(), flush_threshold);
	for record in records {
		write_row(&mut channel, record, descriptor).await?;
	}
	channel.finish().await
}
