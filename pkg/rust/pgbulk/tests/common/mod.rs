// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![allow(dead_code)]

use std::time::Duration;

use pgbulk::{BulkLoader, Record, RetryPolicy, TypeRegistry, Value, memory::MemoryDatastore};
use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber honouring `RUST_LOG`, once per test binary.
pub fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_test_writer()
		.try_init();
}

#[derive(Record, Debug, Clone, PartialEq)]
pub struct Person {
	#[record(distinct)]
	pub name: String,
	pub age: i32,
}

impl Person {
	pub fn new(name: &str, age: i32) -> Self {
		Self {
			name: name.to_string(),
			age,
		}
	}
}

pub fn people(entries: &[(&str, i32)]) -> Vec<Person> {
	entries.iter().map(|(name, age)| Person::new(name, *age)).collect()
}

/// Committed rows as `(name, age)` pairs, sorted.
pub fn person_rows(store: &MemoryDatastore) -> Vec<(String, i32)> {
	let mut rows: Vec<(String, i32)> = store
		.rows("Person")
		.unwrap_or_default()
		.into_iter()
		.map(|row| match row.as_slice() {
			[Value::Utf8(name), Value::Int4(age)] => (name.clone(), *age),
			other => panic!("unexpected row {other:?}"),
		})
		.collect();
	rows.sort();
	rows
}

/// A datastore with the table of `R` created, and a loader sharing the
/// registry used to create it.
pub fn setup<R: Record>(retry: RetryPolicy) -> (MemoryDatastore, BulkLoader) {
	init_tracing();

	let registry = TypeRegistry::new();
	let store = MemoryDatastore::new();
	store.create_table_for(registry.resolve::<R>().unwrap().shape()).unwrap();

	let loader = BulkLoader::builder().registry(registry).retry(retry).flush_threshold(64).build().unwrap();
	(store, loader)
}

pub fn fast_retry(max_attempts: u32) -> RetryPolicy {
	RetryPolicy::new(max_attempts).with_backoff(Duration::from_millis(1), Duration::from_millis(5))
}
