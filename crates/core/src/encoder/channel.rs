// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use pgbulk_type::{Type, Value};
use tracing::trace;

use super::binary::BinaryCopyEncoder;
use crate::{Result, connection::CopySink};

/// Streams encoded rows into a copy sink.
///
/// Encoded bytes are buffered and handed to the sink in chunks of at least
/// `flush_threshold` bytes, checked at row boundaries.
pub struct CopyChannel<'a> {
	encoder: BinaryCopyEncoder,
	sink: Box<dyn CopySink + 'a>,
	flush_threshold: usize,
}

impl<'a> CopyChannel<'a> {
	pub fn new(sink: Box<dyn CopySink + 'a>, columns: usize, flush_threshold: usize) -> Self {
		Self {
			encoder: BinaryCopyEncoder::new(columns),
			sink,
			flush_threshold,
		}
	}

	pub async fn start_row(&mut self) -> Result<()> {
		if self.encoder.buffered() >= self.flush_threshold {
			self.flush().await?;
		}
		self.encoder.start_row()
	}

	pub fn write_null(&mut self) -> Result<()> {
		self.encoder.write_null()
	}

	pub fn write(&mut self, column: &str, ty: Type, value: &Value) -> Result<()> {
		self.encoder.write(column, ty, value)
	}

	/// Writes the trailer, flushes and completes the transfer. Returns the
	/// row count reported by the sink.
	pub async fn finish(mut self) -> Result<u64> {
		self.encoder.finish()?;
		self.flush().await?;
		self.sink.finish().await
	}

	async fn flush(&mut self) -> Result<()> {
		let chunk = self.encoder.take();
		if chunk.is_empty() {
			return Ok(());
		}
		trace!(bytes = chunk.len(), rows = self.encoder.rows(), "flushing copy chunk");
		self.sink.send(chunk).await
	}
}
