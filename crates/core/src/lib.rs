// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Bulk loading of typed records into PostgreSQL over binary `COPY`.
//!
//! A [`Record`] type describes its table once; the [`TypeRegistry`] turns
//! that into a cached [`TypeDescriptor`]. [`BulkLoader::load`] streams a
//! slice of records into the table in one transaction, and
//! [`BulkLoader::load_distinct`] inserts only records whose distinct key is
//! not present yet, through a transaction-scoped staging table.

#![cfg_attr(not(debug_assertions), deny(warnings))]
// #![cfg_attr(not(debug_assertions), deny(clippy::unwrap_used))]

pub mod backend;
pub mod config;
pub mod connection;
pub mod encoder;
mod error;
pub mod loader;
pub mod schema;
pub mod sql;
pub mod transaction;

pub use backend::{memory, postgres};
pub use config::LoaderConfig;
pub use connection::{Connection, CopySink};
pub use error::{BoxError, Error, Result};
pub use loader::{BulkLoader, LoadReport, LoaderBuilder, RetryOutcome, RetryPolicy};
pub use pgbulk_type::{GetType, ToValue, Type, Value};
pub use schema::{ColumnSpec, Field, Record, RecordSchema, TableShape, TypeDescriptor, TypeRegistry};
pub use sql::{CopyTarget, Statement};
pub use transaction::{Transaction, TransactionState};
