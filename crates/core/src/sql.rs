// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Statements issued by the loader.
//!
//! Statements are kept structured so a backend can either render them to SQL
//! text (`Display`) or interpret them directly.

use std::fmt::{self, Display, Formatter};

use crate::schema::TableShape;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
	/// `CREATE TEMP TABLE .. ON COMMIT DROP AS SELECT .. WITH NO DATA`
	CreateStaging {
		staging: String,
		table: String,
		columns: Vec<String>,
	},
	/// `LOCK TABLE .. IN SHARE ROW EXCLUSIVE MODE`
	LockTable {
		table: String,
	},
	/// Moves staged rows whose distinct key is not yet present in `table`.
	InsertDistinct {
		table: String,
		staging: String,
		columns: Vec<String>,
		keys: Vec<String>,
	},
}

impl Statement {
	pub fn create_staging(shape: &TableShape, staging: impl Into<String>) -> Self {
		Statement::CreateStaging {
			staging: staging.into(),
			table: shape.table().to_string(),
			columns: shape.columns().to_vec(),
		}
	}

	pub fn lock_table(shape: &TableShape) -> Self {
		Statement::LockTable {
			table: shape.table().to_string(),
		}
	}

	pub fn insert_distinct(shape: &TableShape, staging: impl Into<String>) -> Self {
		Statement::InsertDistinct {
			table: shape.table().to_string(),
			staging: staging.into(),
			columns: shape.columns().to_vec(),
			keys: shape.distinct_keys().to_vec(),
		}
	}
}

impl Display for Statement {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Statement::CreateStaging {
				staging,
				table,
				columns,
			} => write!(
				f,
				"CREATE TEMP TABLE {staging} ON COMMIT DROP AS SELECT {} FROM {table} WITH NO DATA",
				columns.join(",")
			),
			Statement::LockTable {
				table,
			} => write!(f, "LOCK TABLE {table} IN SHARE ROW EXCLUSIVE MODE"),
			Statement::InsertDistinct {
				table,
				staging,
				columns,
				keys,
			} => {
				let columns = columns.join(",");
				let key_list = keys.join(",");
				let matches =
					keys.iter().map(|key| format!("main.{key} = tmp.{key}")).collect::<Vec<_>>().join(" AND ");
				write!(
					f,
					"INSERT INTO {table} ({columns}) SELECT DISTINCT ON ({key_list}) {columns} FROM {staging} tmp \
					 WHERE NOT EXISTS (SELECT 1 FROM {table} main WHERE {matches}) ORDER BY {key_list}, tmp.ctid"
				)
			}
		}
	}
}

/// Destination of a binary `COPY` transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTarget {
	pub table: String,
	pub columns: Vec<String>,
}

impl CopyTarget {
	pub fn new(table: impl Into<String>, columns: Vec<String>) -> Self {
		Self {
			table: table.into(),
			columns,
		}
	}

	pub fn table(shape: &TableShape) -> Self {
		Self::new(shape.table(), shape.columns().to_vec())
	}

	/// The same columns, copied into `staging` instead of the target table.
	pub fn staging(shape: &TableShape, staging: impl Into<String>) -> Self {
		Self::new(staging, shape.columns().to_vec())
	}
}

impl Display for CopyTarget {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "COPY {} ({}) FROM STDIN (FORMAT BINARY)", self.table, self.columns.join(","))
	}
}
