// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::any::type_name;

use tokio::time::sleep;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::{BulkLoader, LoadReport, RetryOutcome, close_after, open_if_closed, stream_records};
use crate::{
	Error, Result,
	connection::Connection,
	schema::{Record, TypeDescriptor, ident::staging_table_name},
	sql::{CopyTarget, Statement},
	transaction::Transaction,
};

impl BulkLoader {
	/// Inserts the `records` whose distinct key is not yet present in the
	/// target table.
	///
	/// Rows are staged in a temporary table and moved with one set-based
	/// insert. Within a group of equal keys the first record wins. Failed
	/// attempts are re-run under the configured retry policy.
	#[instrument(name = "loader::load_distinct", level = "debug", skip_all, fields(record = type_name::<R>(), rows = records.len()))]
	pub async fn load_distinct<R: Record, C: Connection>(&self, conn: &mut C, records: &[R]) -> Result<LoadReport> {
		let descriptor = self.registry.resolve::<R>()?;
		if descriptor.distinct_keys().is_empty() {
			return Err(Error::MissingDistinctKey {
				table: descriptor.table().to_string(),
			});
		}

		let policy = &self.config.retry;
		let mut first_failure = None;
		let mut attempt = 1;

		loop {
			let result = match open_if_closed(conn).await {
				Ok(()) => self.insert_distinct(conn, records, &descriptor).await,
				Err(err) => Err(err),
			};
			let result = close_after(conn, result).await;

			match result {
				Ok(mut report) => {
					report.attempts = attempt;
					return match (policy.outcome, first_failure) {
						(RetryOutcome::FirstFailure, Some(err)) => Err(err),
						_ => Ok(report),
					};
				}
				Err(err) if policy.should_retry(attempt, &err) => {
					let pause = policy.backoff(attempt);
					warn!(attempt, error = %err, backoff_ms = pause.as_millis() as u64, "distinct load failed, retrying");
					first_failure.get_or_insert(err);
					sleep(pause).await;
					attempt += 1;
				}
				Err(err) => {
					return Err(match (policy.outcome, first_failure) {
						(RetryOutcome::FirstFailure, Some(first)) => first,
						_ => err,
					});
				}
			}
		}
	}

	async fn insert_distinct<R: Record, C: Connection>(
		&self,
		conn: &mut C,
		records: &[R],
		descriptor: &TypeDescriptor<R>,
	) -> Result<LoadReport> {
		let shape = descriptor.shape();
		let staging = staging_table_name(&self.config.staging_prefix, shape.table(), Uuid::new_v4());
		let mut tx = Transaction::begin(conn).await?;

		if let Err(err) = tx.connection().execute(&Statement::create_staging(shape, &staging)).await {
			return Err(tx
				.abort(Error::StagingSetup {
					staging,
					source: Box::new(err),
				})
				.await);
		}

		let target = CopyTarget::staging(shape, &staging);
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
						target: staging,
						source: Box::new(err),
					})
					.await);
			}
		};

		let mut statements = Vec::with_capacity(2);
		if self.config.lock_target {
			statements.push(Statement::lock_table(shape));
		}
		statements.push(Statement::insert_distinct(shape, &staging));

		let mut inserted = 0;
		for statement in &statements {
			match tx.connection().execute(statement).await {
				Ok(rows) => inserted = rows,
				Err(err) => {
					return Err(tx
						.abort(Error::DistinctInsert {
							table: shape.table().to_string(),
							staging,
							source: Box::new(err),
						})
						.await);
				}
			}
		}

		tx.commit().await?;
		debug!(table = shape.table(), staging = %staging, streamed, inserted, "distinct load committed");

		Ok(LoadReport {
			table: shape.table().to_string(),
			streamed,
			inserted,
			attempts: 1,
		})
	}
}
