// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Bulk loading of typed records into PostgreSQL.
//!
//! ```ignore
//! use pgbulk::{BulkLoader, Record, postgres::PostgresConnection};
//!
//! #[derive(Record)]
//! struct Person {
//!     #[record(distinct)]
//!     name: String,
//!     age: i32,
//! }
//!
//! let loader = BulkLoader::builder().build()?;
//! let mut conn = PostgresConnection::from_url("postgres://localhost/app")?;
//! loader.load_distinct(&mut conn, &people).await?;
//! ```

pub use pgbulk_core as core;
pub use pgbulk_core::{
	BoxError, BulkLoader, ColumnSpec, Connection, CopySink, CopyTarget, Error, Field, LoadReport, LoaderBuilder,
	LoaderConfig, Record, RecordSchema, Result, RetryOutcome, RetryPolicy, Statement, TableShape, Transaction,
	TransactionState, TypeDescriptor, TypeRegistry, config, encoder, memory, postgres, schema,
};
pub use pgbulk_derive::Record;
pub use pgbulk_type as r#type;
pub use pgbulk_type::{GetType, ToValue, Type, Value};
