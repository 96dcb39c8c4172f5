// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Integration tests for the `#[derive(Record)]` macro.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use pgbulk_core::{BulkLoader, Record, Type, TypeDescriptor, TypeRegistry, Value, memory::MemoryDatastore};
use pgbulk_derive::Record;
use uuid::Uuid;

// ============================================================================
// 1. Basic Struct Derivation
// ============================================================================

#[derive(Record, Debug, Clone)]
#[record(crate = "pgbulk_core")]
struct BasicUser {
	id: i64,
	name: String,
}

#[test]
fn test_basic_derivation() {
	let descriptor = TypeDescriptor::<BasicUser>::build().unwrap();

	assert_eq!(descriptor.table(), "BasicUser");
	assert_eq!(descriptor.shape().columns(), &["id", "name"]);
	assert_eq!(descriptor.shape().types(), &[Type::Int8, Type::Utf8]);
	assert!(descriptor.distinct_keys().is_empty());
}

#[test]
fn test_accessors_read_fields() {
	let descriptor = TypeDescriptor::<BasicUser>::build().unwrap();
	let user = BasicUser {
		id: 7,
		name: "Alice".to_string(),
	};

	let values: Vec<Value> = descriptor.columns().iter().map(|c| c.read(&user)).collect();
	assert_eq!(values, vec![Value::int8(7), Value::utf8("Alice")]);
}

// ============================================================================
// 2. Attributes
// ============================================================================

#[derive(Record)]
#[record(crate = "pgbulk_core", table = "people")]
pub struct Person {
	#[record(distinct)]
	pub name: String,
	#[record(column = "age_years")]
	pub age: i32,
	/// Optional contact address.
	pub email: Option<String>,
	#[record(skip)]
	pub cache: Vec<u8>,
}

#[test]
fn test_table_override() {
	assert_eq!(TypeDescriptor::<Person>::build().unwrap().table(), "people");
}

#[test]
fn test_column_override_and_skip() {
	let descriptor = TypeDescriptor::<Person>::build().unwrap();
	assert_eq!(descriptor.shape().columns(), &["name", "age_years", "email"]);
	assert_eq!(descriptor.columns()[1].field(), "age");
}

#[test]
fn test_distinct_key() {
	assert_eq!(TypeDescriptor::<Person>::build().unwrap().distinct_keys(), &["name"]);
}

#[test]
fn test_option_fields_are_nullable() {
	let descriptor = TypeDescriptor::<Person>::build().unwrap();
	let nullable: Vec<bool> = descriptor.columns().iter().map(|c| c.is_nullable()).collect();
	assert_eq!(nullable, vec![false, false, true]);
}

#[derive(Record)]
#[record(crate = "pgbulk_core")]
struct Visit {
	#[record(distinct)]
	site: String,
	#[record(distinct, column = "visit_day")]
	day: NaiveDate,
	hits: i64,
}

#[test]
fn test_composite_distinct_key_uses_column_names() {
	assert_eq!(TypeDescriptor::<Visit>::build().unwrap().distinct_keys(), &["site", "visit_day"]);
}

// ============================================================================
// 3. Field Types
// ============================================================================

#[derive(Record)]
#[record(crate = "pgbulk_core")]
struct AllTypes {
	flag: bool,
	small: i16,
	medium: i32,
	large: i64,
	ratio: f32,
	precise: f64,
	label: String,
	payload: Vec<u8>,
	id: Uuid,
	day: NaiveDate,
	at: NaiveDateTime,
	seen: DateTime<Utc>,
	r#type: Option<String>,
}

#[test]
fn test_column_types() {
	let descriptor = TypeDescriptor::<AllTypes>::build().unwrap();
	assert_eq!(
		descriptor.shape().types(),
		&[
			Type::Boolean,
			Type::Int2,
			Type::Int4,
			Type::Int8,
			Type::Float4,
			Type::Float8,
			Type::Utf8,
			Type::Blob,
			Type::Uuid,
			Type::Date,
			Type::DateTime,
			Type::DateTimeTz,
			Type::Utf8,
		]
	);
	assert_eq!(descriptor.shape().columns().last().map(String::as_str), Some("type"));
}

// ============================================================================
// 4. Registry and Loading
// ============================================================================

#[test]
fn test_registry_resolves_derived_type() {
	let registry = TypeRegistry::new();
	let first = registry.resolve::<Person>().unwrap();
	let second = registry.resolve::<Person>().unwrap();
	assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[test]
fn test_schema_is_static() {
	assert_eq!(Person::schema().record_name(), "Person");
}

#[tokio::test]
async fn test_load_derived_records() {
	let store = MemoryDatastore::new();
	let registry = TypeRegistry::new();
	store.create_table_for(registry.resolve::<Person>().unwrap().shape()).unwrap();

	let loader = BulkLoader::builder().registry(registry).build().unwrap();
	let mut conn = store.connect();

	let people = vec![
		Person {
			name: "A".to_string(),
			age: 30,
			email: None,
			cache: vec![1],
		},
		Person {
			name: "B".to_string(),
			age: 40,
			email: Some("b@example.com".to_string()),
			cache: vec![],
		},
	];

	let report = loader.load(&mut conn, &people).await.unwrap();
	assert_eq!(report.streamed, 2);
	assert_eq!(
		store.rows("people").unwrap(),
		vec![
			vec![Value::utf8("A"), Value::int4(30), Value::Undefined],
			vec![Value::utf8("B"), Value::int4(40), Value::utf8("b@example.com")],
		]
	);
}
