// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::any::type_name;

use tracing::{debug, instrument};

use super::{BulkLoader, LoadReport, close_after, open_if_closed, stream_records};
use crate::{
	Error, Result,
	connection::Connection,
	schema::{Record, TypeDescriptor},
	sql::CopyTarget,
	transaction::Transaction,
};

impl BulkLoader {
	/// Copies all `records` into the record type's table in one transaction.
	///
	/// Either every row is committed or none is. An empty slice commits an
	/// empty transaction.
	#[instrument(name = "loader::load", level = "debug", skip_all, fields(record = type_name::<R>(), rows = records.len()))]
	pub async fn load<R: Record, C: Connection>(&self, conn: &mut C, records: &[R]) -> Result<LoadReport> {
		let descriptor = self.registry.resolve::<R>()?;

		open_if_closed(conn).await?;
		let result = self.copy_into_table(conn, records, &descriptor).await;
		close_after(conn, result).await
	}

	async fn copy_into_table<R: Record, C: Connection>(
		&self,
		conn: &mut C,
		records: &[R],
		descriptor: &TypeDescriptor<R>,
	) -> Result<LoadReport> {
		let target = CopyTarget::table(descriptor.shape());
		let mut tx = Transaction::begin(conn).await?;

		let streamed = match stream_records(
			tx.connection(),
			&target,
			records,
			descriptor,
			self.config.flush_threshold,
		)
		.await
		{
			Ok(rows) => rows,
			Err(err) => {
				return Err(tx
					.abort(Error::Transfer {
						target: target.table,
						source: Box::new(err),
					})
					.await);
			}
		};

		tx.commit().await?;
		debug!(table = descriptor.table(), rows = streamed, "bulk load committed");

		Ok(LoadReport {
			table: descriptor.table().to_string(),
			streamed,
			inserted: streamed,
			attempts: 1,
		})
	}
}
