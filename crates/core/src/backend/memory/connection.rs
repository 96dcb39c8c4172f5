// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::collections::HashMap;

use async_trait::async_trait;
use pgbulk_type::Value;
use tracing::{debug, instrument};

use super::{
	MemoryDatastore,
	datastore::{MemoryError, MemoryTable, table_key},
	fault::FaultPoint,
	sink::MemoryCopySink,
};
use crate::{
	Error, Result,
	connection::{Connection, CopySink},
	sql::{CopyTarget, Statement},
};

/// Writes of an open transaction, invisible to other connections until
/// commit.
#[derive(Debug, Default)]
pub(crate) struct Pending {
	/// Rows appended to committed tables, keyed by table key.
	pub(crate) inserts: HashMap<String, Vec<Vec<Value>>>,
	/// Temporary tables, dropped when the transaction ends.
	pub(crate) temp: HashMap<String, MemoryTable>,
	implicit: bool,
}

pub struct MemoryConnection {
	store: MemoryDatastore,
	open: bool,
	pub(crate) pending: Option<Pending>,
}

impl MemoryConnection {
	pub(crate) fn new(store: MemoryDatastore) -> Self {
		Self {
			store,
			open: false,
			pending: None,
		}
	}

	pub fn datastore(&self) -> &MemoryDatastore {
		&self.store
	}

	pub fn in_transaction(&self) -> bool {
		self.pending.as_ref().is_some_and(|p| !p.implicit)
	}

	pub(crate) fn ensure_open(&self) -> Result<()> {
		if self.open { Ok(()) } else { Err(Error::ConnectionClosed) }
	}

	/// Starts a transaction for a single statement when none is active, as
	/// autocommit does.
	pub(crate) fn ensure_transaction(&mut self) {
		if self.pending.is_none() {
			self.pending = Some(Pending {
				implicit: true,
				..Pending::default()
			});
		}
	}

	/// Commits a transaction started by [`ensure_transaction`](Self::ensure_transaction).
	pub(crate) fn end_implicit(&mut self, success: bool) {
		if self.pending.as_ref().is_some_and(|p| p.implicit) {
			if let Some(pending) = self.pending.take() {
				if success {
					self.apply(pending);
				}
			}
		}
	}

	/// Schema of `table` as visible to this connection: temporary tables
	/// shadow committed ones.
	pub(crate) fn table_schema(&self, table: &str) -> Result<MemoryTable> {
		let key = table_key(table);
		if let Some(temp) = self.pending.as_ref().and_then(|p| p.temp.get(&key)) {
			return Ok(MemoryTable::new(temp.name.clone(), temp.columns.clone()));
		}
		let state = self.store.state.lock();
		match state.tables.get(&key) {
			Some(table) => Ok(MemoryTable::new(table.name.clone(), table.columns.clone())),
			None => Err(MemoryError::UnknownTable(table.to_string()).into()),
		}
	}

	/// Appends full rows to `table` inside the current transaction.
	pub(crate) fn append(&mut self, table: &str, rows: Vec<Vec<Value>>) -> Result<()> {
		let key = table_key(table);
		let pending = self.pending.as_mut().ok_or(MemoryError::NoTransaction)?;
		if let Some(temp) = pending.temp.get_mut(&key) {
			temp.rows.extend(rows);
		} else {
			pending.inserts.entry(key).or_default().extend(rows);
		}
		Ok(())
	}

	/// Rows of `table` visible to this connection: committed rows followed by
	/// this transaction's pending rows.
	fn visible_rows(&self, table: &str) -> Result<Vec<Vec<Value>>> {
		let key = table_key(table);
		if let Some(temp) = self.pending.as_ref().and_then(|p| p.temp.get(&key)) {
			return Ok(temp.rows.clone());
		}

		let mut rows = {
			let state = self.store.state.lock();
			match state.tables.get(&key) {
				Some(table) => table.rows.clone(),
				None => return Err(MemoryError::UnknownTable(table.to_string()).into()),
			}
		};
		if let Some(pending) = self.pending.as_ref().and_then(|p| p.inserts.get(&key)) {
			rows.extend(pending.iter().cloned());
		}
		Ok(rows)
	}

	fn apply(&self, pending: Pending) {
		let mut state = self.store.state.lock();
		for (key, rows) in pending.inserts {
			if let Some(table) = state.tables.get_mut(&key) {
				table.rows.extend(rows);
			}
		}
	}

	fn create_staging(&mut self, staging: &str, table: &str, columns: &[String]) -> Result<u64> {
		let source = self.table_schema(table)?;
		let layout = source.layout(columns)?;
		let columns = columns.iter().cloned().zip(layout.into_iter().map(|(_, ty)| ty)).collect();

		let key = table_key(staging);
		let taken = self.store.state.lock().tables.contains_key(&key);
		let pending = self.pending.as_mut().ok_or(MemoryError::NoTransaction)?;
		if taken || pending.temp.contains_key(&key) {
			return Err(MemoryError::TableExists(staging.to_string()).into());
		}
		pending.temp.insert(key, MemoryTable::new(staging, columns));
		Ok(0)
	}

	/// Evaluates the distinct insert: staged rows grouped by key with the
	/// first row of each group kept, minus groups whose key already exists
	/// in the target. Key comparison follows SQL: `DISTINCT ON` groups nulls
	/// together, while a null never equals anything in the anti-join.
	fn insert_distinct(&mut self, table: &str, staging: &str, columns: &[String], keys: &[String]) -> Result<u64> {
		let target = self.table_schema(table)?;
		let staged = self.table_schema(staging)?;
		let target_layout = target.layout(columns)?;
		let staged_layout = staged.layout(columns)?;
		let target_keys: Vec<usize> = keys.iter().map(|k| target.position(k)).collect::<Result<_>>()?;
		let staged_keys: Vec<usize> = keys.iter().map(|k| staged.position(k)).collect::<Result<_>>()?;

		let existing: Vec<Vec<Value>> = self
			.visible_rows(table)?
			.into_iter()
			.map(|row| target_keys.iter().map(|idx| row[*idx].clone()).collect())
			.collect();

		let mut groups: Vec<Vec<Value>> = Vec::new();
		let mut inserted = Vec::new();
		for row in self.visible_rows(staging)? {
			let key: Vec<Value> = staged_keys.iter().map(|idx| row[*idx].clone()).collect();
			if groups.iter().any(|group| same_key(group, &key)) {
				continue;
			}

			let matched = !key.iter().any(Value::is_undefined) && existing.iter().any(|other| same_key(other, &key));
			groups.push(key);
			if matched {
				continue;
			}

			let values = staged_layout.iter().map(|(idx, _)| row[*idx].clone()).collect();
			inserted.push(target.expand(&target_layout, values));
		}

		let count = inserted.len() as u64;
		self.append(table, inserted)?;
		Ok(count)
	}
}

/// Key equality as PostgreSQL groups and sorts: floats compare by value,
/// so `-0.0` equals `0.0` and NaN equals NaN. Nulls are equal here; the
/// anti-join excludes them before comparing.
fn same_key(left: &[Value], right: &[Value]) -> bool {
	left.len() == right.len()
		&& left.iter().zip(right).all(|pair| match pair {
			(Value::Float4(l), Value::Float4(r)) => l == r || (l.is_nan() && r.is_nan()),
			(Value::Float8(l), Value::Float8(r)) => l == r || (l.is_nan() && r.is_nan()),
			(l, r) => l == r,
		})
}

#[async_trait]
impl Connection for MemoryConnection {
	fn is_open(&self) -> bool {
		self.open
	}

	#[instrument(name = "memory::open", level = "trace", skip(self))]
	async fn open(&mut self) -> Result<()> {
		self.store.check(FaultPoint::Open)?;
		self.open = true;
		self.store.state.lock().stats.opens += 1;
		Ok(())
	}

	#[instrument(name = "memory::close", level = "trace", skip(self))]
	async fn close(&mut self) -> Result<()> {
		if !self.open {
			return Ok(());
		}
		// The session ends even when closing reports an error.
		self.open = false;
		if self.pending.take().is_some() {
			debug!("discarding open transaction on close");
		}
		self.store.state.lock().stats.closes += 1;
		self.store.check(FaultPoint::Close)
	}

	#[instrument(name = "memory::begin", level = "trace", skip(self))]
	async fn begin(&mut self) -> Result<()> {
		self.ensure_open()?;
		if self.in_transaction() {
			return Err(MemoryError::TransactionActive.into());
		}
		self.store.check(FaultPoint::Begin)?;
		self.pending = Some(Pending::default());
		self.store.state.lock().stats.begins += 1;
		Ok(())
	}

	#[instrument(name = "memory::commit", level = "trace", skip(self))]
	async fn commit(&mut self) -> Result<()> {
		self.ensure_open()?;
		let pending = self.pending.take().ok_or(MemoryError::NoTransaction)?;
		self.store.check(FaultPoint::Commit)?;
		self.apply(pending);
		self.store.state.lock().stats.commits += 1;
		Ok(())
	}

	#[instrument(name = "memory::rollback", level = "trace", skip(self))]
	async fn rollback(&mut self) -> Result<()> {
		self.ensure_open()?;
		self.pending.take().ok_or(MemoryError::NoTransaction)?;
		self.store.state.lock().stats.rollbacks += 1;
		self.store.check(FaultPoint::Rollback)
	}

	#[instrument(name = "memory::execute", level = "debug", skip(self), fields(statement = %statement))]
	async fn execute(&mut self, statement: &Statement) -> Result<u64> {
		self.ensure_open()?;
		self.store.record_statement(statement);
		self.ensure_transaction();

		let result = match statement {
			Statement::CreateStaging {
				staging,
				table,
				columns,
			} => self.store.check(FaultPoint::CreateStaging).and_then(|_| self.create_staging(staging, table, columns)),
			Statement::LockTable {
				table,
			} => self.store.check(FaultPoint::LockTable).and_then(|_| self.table_schema(table).map(|_| 0)),
			Statement::InsertDistinct {
				table,
				staging,
				columns,
				keys,
			} => self
				.store
				.check(FaultPoint::InsertDistinct)
				.and_then(|_| self.insert_distinct(table, staging, columns, keys)),
		};

		self.end_implicit(result.is_ok());
		result
	}

	#[instrument(name = "memory::copy_in", level = "debug", skip(self), fields(target = %target.table))]
	async fn copy_in<'a>(&'a mut self, target: &CopyTarget) -> Result<Box<dyn CopySink + 'a>> {
		self.ensure_open()?;
		self.store.check(FaultPoint::CopyIn)?;
		let table = self.table_schema(&target.table)?;
		let layout = table.layout(&target.columns)?;
		self.ensure_transaction();
		self.store.state.lock().stats.copies += 1;
		Ok(Box::new(MemoryCopySink::new(self, target.table.clone(), table, layout)))
	}
}
