// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use pgbulk_type::Type;

use super::{MemoryConnection, datastore::MemoryTable, fault::FaultPoint};
use crate::{Result, connection::CopySink, encoder::decode_copy};

/// Collects a binary copy stream and decodes it on finish, so a failed
/// transfer leaves no rows behind.
pub(crate) struct MemoryCopySink<'a> {
	conn: &'a mut MemoryConnection,
	table: String,
	schema: MemoryTable,
	layout: Vec<(usize, Type)>,
	buf: BytesMut,
}

impl<'a> MemoryCopySink<'a> {
	pub(crate) fn new(
		conn: &'a mut MemoryConnection,
		table: String,
		schema: MemoryTable,
		layout: Vec<(usize, Type)>,
	) -> Self {
		Self {
			conn,
			table,
			schema,
			layout,
			buf: BytesMut::new(),
		}
	}

	fn load(&mut self) -> Result<u64> {
		let types: Vec<Type> = self.layout.iter().map(|(_, ty)| *ty).collect();
		let rows = decode_copy(&self.buf, &types)?;
		let count = rows.len() as u64;
		let rows = rows.into_iter().map(|values| self.schema.expand(&self.layout, values)).collect();
		self.conn.append(&self.table, rows)?;
		Ok(count)
	}
}

#[async_trait]
impl CopySink for MemoryCopySink<'_> {
	async fn send(&mut self, chunk: Bytes) -> Result<()> {
		self.conn.datastore().check(FaultPoint::CopySend)?;
		self.buf.extend_from_slice(&chunk);
		Ok(())
	}

	async fn finish(mut self: Box<Self>) -> Result<u64> {
		let result = self.conn.datastore().check(FaultPoint::CopyFinish).and_then(|_| self.load());
		self.conn.end_implicit(result.is_ok());
		result
	}
}

impl Drop for MemoryCopySink<'_> {
	fn drop(&mut self) {
		// An abandoned copy outside a transaction loads nothing.
		self.conn.end_implicit(false);
	}
}
