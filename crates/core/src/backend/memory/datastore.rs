// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use pgbulk_type::{Type, Value};
use tracing::instrument;

use super::{
	MemoryConnection,
	fault::{FaultPoint, Faults},
};
use crate::{
	Error, Result,
	schema::{
		TableShape,
		ident::{normalize_identifier, split_qualified, validate_identifier, validate_table_name},
	},
	sql::Statement,
};

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
	#[error("relation \"{0}\" does not exist")]
	UnknownTable(String),

	#[error("relation \"{0}\" already exists")]
	TableExists(String),

	#[error("column \"{column}\" of relation \"{table}\" does not exist")]
	UnknownColumn {
		table: String,
		column: String,
	},

	#[error("there is already a transaction in progress")]
	TransactionActive,

	#[error("there is no transaction in progress")]
	NoTransaction,

	#[error("another copy is in progress on this connection")]
	CopyInProgress,

	#[error("injected fault at {0}")]
	Injected(FaultPoint),
}

impl From<MemoryError> for Error {
	fn from(err: MemoryError) -> Self {
		Error::database(err)
	}
}

/// Table key the way the server resolves names: per part, unquoted parts
/// folded to lower case.
pub(crate) fn table_key(name: &str) -> String {
	match split_qualified(name) {
		Some(parts) => parts.iter().map(|part| normalize_identifier(part)).collect::<Vec<_>>().join("."),
		None => name.to_string(),
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTable {
	pub(crate) name: String,
	pub(crate) columns: Vec<(String, Type)>,
	pub(crate) rows: Vec<Vec<Value>>,
}

impl MemoryTable {
	pub(crate) fn new(name: impl Into<String>, columns: Vec<(String, Type)>) -> Self {
		Self {
			name: name.into(),
			columns,
			rows: Vec::new(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn columns(&self) -> &[(String, Type)] {
		&self.columns
	}

	pub fn rows(&self) -> &[Vec<Value>] {
		&self.rows
	}

	pub(crate) fn position(&self, column: &str) -> Result<usize> {
		let wanted = normalize_identifier(column);
		self.columns.iter().position(|(name, _)| normalize_identifier(name) == wanted).ok_or_else(|| {
			MemoryError::UnknownColumn {
				table: self.name.clone(),
				column: column.to_string(),
			}
			.into()
		})
	}

	/// Positions and types of `columns`, in that order.
	pub(crate) fn layout(&self, columns: &[String]) -> Result<Vec<(usize, Type)>> {
		columns
			.iter()
			.map(|column| {
				let idx = self.position(column)?;
				Ok((idx, self.columns[idx].1))
			})
			.collect()
	}

	/// Expands values given for `layout` to a full row; other columns are null.
	pub(crate) fn expand(&self, layout: &[(usize, Type)], values: Vec<Value>) -> Vec<Value> {
		let mut row = vec![Value::Undefined; self.columns.len()];
		for ((idx, _), value) in layout.iter().zip(values) {
			row[*idx] = value;
		}
		row
	}
}

/// Lifecycle counters of a datastore, summed over all its connections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStats {
	pub opens: u64,
	pub closes: u64,
	pub begins: u64,
	pub commits: u64,
	pub rollbacks: u64,
	pub copies: u64,
	pub statements: Vec<String>,
}

#[derive(Default)]
pub(crate) struct State {
	pub(crate) tables: HashMap<String, MemoryTable>,
	pub(crate) faults: Faults,
	pub(crate) stats: MemoryStats,
}

/// An in-process datastore speaking the loader's connection protocol.
///
/// Tables hold typed rows; connections see committed rows plus their own
/// pending writes, which become visible to others on commit.
#[derive(Clone, Default)]
pub struct MemoryDatastore {
	pub(crate) state: Arc<Mutex<State>>,
}

impl MemoryDatastore {
	#[instrument(name = "memory::new", level = "debug")]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn connect(&self) -> MemoryConnection {
		MemoryConnection::new(self.clone())
	}

	pub fn create_table(&self, name: &str, columns: &[(&str, Type)]) -> Result<()> {
		validate_table_name(name)?;
		for (column, _) in columns {
			validate_identifier(column)?;
		}

		let key = table_key(name);
		let mut state = self.state.lock();
		if state.tables.contains_key(&key) {
			return Err(MemoryError::TableExists(name.to_string()).into());
		}
		let columns = columns.iter().map(|(column, ty)| (column.to_string(), *ty)).collect();
		state.tables.insert(key, MemoryTable::new(name, columns));
		Ok(())
	}

	/// Creates the table a record type loads into.
	pub fn create_table_for(&self, shape: &TableShape) -> Result<()> {
		let columns: Vec<(&str, Type)> =
			shape.columns().iter().map(String::as_str).zip(shape.types().iter().copied()).collect();
		self.create_table(shape.table(), &columns)
	}

	/// Committed rows of `table`.
	pub fn rows(&self, table: &str) -> Option<Vec<Vec<Value>>> {
		self.state.lock().tables.get(&table_key(table)).map(|t| t.rows.clone())
	}

	pub fn row_count(&self, table: &str) -> usize {
		self.state.lock().tables.get(&table_key(table)).map_or(0, |t| t.rows.len())
	}

	pub fn table_names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.state.lock().tables.values().map(|t| t.name.clone()).collect();
		names.sort();
		names
	}

	/// Makes the next `times` operations at `point` fail with a database
	/// error.
	pub fn fail_next(&self, point: FaultPoint, times: u32) {
		self.state.lock().faults.arm(point, times);
	}

	pub fn clear_faults(&self) {
		self.state.lock().faults.clear();
	}

	pub fn stats(&self) -> MemoryStats {
		self.state.lock().stats.clone()
	}

	pub(crate) fn check(&self, point: FaultPoint) -> Result<()> {
		if self.state.lock().faults.trip(point) {
			return Err(MemoryError::Injected(point).into());
		}
		Ok(())
	}

	pub(crate) fn record_statement(&self, statement: &Statement) {
		self.state.lock().stats.statements.push(statement.to_string());
	}
}
