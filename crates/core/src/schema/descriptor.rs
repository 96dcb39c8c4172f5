// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::HashSet, fmt};

use pgbulk_type::{Type, Value};

use super::{
	field::{Accessor, Record, RecordSchema},
	ident::{normalize_identifier, validate_identifier, validate_table_name},
};
use crate::{Error, Result};

/// The table a record type is loaded into: name, persisted columns and the
/// distinct key, in the form statements are generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableShape {
	table: String,
	columns: Vec<String>,
	types: Vec<Type>,
	distinct: Vec<String>,
}

impl TableShape {
	pub fn new(table: impl Into<String>, columns: Vec<(String, Type)>, distinct: Vec<String>) -> Self {
		let (columns, types) = columns.into_iter().unzip();
		Self {
			table: table.into(),
			columns,
			types,
			distinct,
		}
	}

	pub fn table(&self) -> &str {
		&self.table
	}

	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	pub fn types(&self) -> &[Type] {
		&self.types
	}

	pub fn distinct_keys(&self) -> &[String] {
		&self.distinct
	}

	/// Columns joined as they appear in generated statements.
	pub fn column_list(&self) -> String {
		self.columns.join(",")
	}

	pub fn distinct_list(&self) -> String {
		self.distinct.join(",")
	}
}

/// A persisted field.
pub struct ColumnSpec<R> {
	name: String,
	field: &'static str,
	ty: Type,
	nullable: bool,
	read: Accessor<R>,
}

impl<R> ColumnSpec<R> {
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The record field this column is read from.
	pub fn field(&self) -> &'static str {
		self.field
	}

	pub fn ty(&self) -> Type {
		self.ty
	}

	pub fn is_nullable(&self) -> bool {
		self.nullable
	}

	pub fn read(&self, record: &R) -> Value {
		(self.read)(record)
	}
}

impl<R> fmt::Debug for ColumnSpec<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ColumnSpec")
			.field("name", &self.name)
			.field("field", &self.field)
			.field("ty", &self.ty)
			.field("nullable", &self.nullable)
			.finish_non_exhaustive()
	}
}

/// Persistence metadata of one record type, built once from its schema.
pub struct TypeDescriptor<R> {
	record: &'static str,
	shape: TableShape,
	columns: Vec<ColumnSpec<R>>,
}

impl<R: Record> TypeDescriptor<R> {
	pub fn build() -> Result<Self> {
		Self::from_schema(R::schema())
	}
}

impl<R: 'static> TypeDescriptor<R> {
	pub fn from_schema(schema: RecordSchema<R>) -> Result<Self> {
		let record = schema.record;
		let table = schema.table.unwrap_or_else(|| record.to_string());
		validate_table_name(&table)?;

		let mut seen = HashSet::new();
		let mut columns = Vec::with_capacity(schema.fields.len());
		let mut distinct = Vec::new();

		for field in schema.fields {
			if field.ignored || schema.ignored.contains(&field.name) {
				if field.distinct {
					return Err(Error::DistinctKeyIgnored {
						record,
						field: field.name.to_string(),
					});
				}
				continue;
			}

			let name = field.column_name().to_string();
			validate_identifier(&name)?;

			if !seen.insert(normalize_identifier(&name)) {
				return Err(Error::DuplicateColumn {
					record,
					column: name,
				});
			}

			if field.distinct {
				distinct.push(name.clone());
			}

			columns.push(ColumnSpec {
				name,
				field: field.name,
				ty: field.ty,
				nullable: field.nullable,
				read: field.read,
			});
		}

		if columns.is_empty() {
			return Err(Error::EmptySchema {
				record,
			});
		}

		let shape = TableShape::new(table, columns.iter().map(|c| (c.name.clone(), c.ty)).collect(), distinct);

		Ok(Self {
			record,
			shape,
			columns,
		})
	}
}

impl<R> TypeDescriptor<R> {
	pub fn record_name(&self) -> &'static str {
		self.record
	}

	pub fn table(&self) -> &str {
		self.shape.table()
	}

	pub fn columns(&self) -> &[ColumnSpec<R>] {
		&self.columns
	}

	pub fn distinct_keys(&self) -> &[String] {
		self.shape.distinct_keys()
	}

	pub fn shape(&self) -> &TableShape {
		&self.shape
	}
}

impl<R> fmt::Debug for TypeDescriptor<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TypeDescriptor")
			.field("record", &self.record)
			.field("shape", &self.shape)
			.field("columns", &self.columns)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::Field;

	struct Person {
		name: String,
		age: i32,
		email: Option<String>,
		cache: Vec<u8>,
	}

	impl Record for Person {
		fn schema() -> RecordSchema<Self> {
			RecordSchema::new()
				.field(Field::new("name", |p: &Person| &p.name).distinct())
				.field(Field::new("age", |p: &Person| &p.age).column("age_years"))
				.field(Field::new("email", |p: &Person| &p.email))
				.field(Field::new("cache", |p: &Person| &p.cache).ignore())
		}
	}

	#[test]
	fn test_build_from_schema() {
		let descriptor = TypeDescriptor::<Person>::build().unwrap();

		assert_eq!(descriptor.table(), "Person");
		assert_eq!(descriptor.shape().columns(), &["name", "age_years", "email"]);
		assert_eq!(descriptor.shape().types(), &[Type::Utf8, Type::Int4, Type::Utf8]);
		assert_eq!(descriptor.distinct_keys(), &["name"]);
		assert_eq!(descriptor.shape().column_list(), "name,age_years,email");

		let email = &descriptor.columns()[2];
		assert!(email.is_nullable());
		assert_eq!(email.field(), "email");
		assert!(!descriptor.columns()[0].is_nullable());
	}

	#[test]
	fn test_read_columns() {
		let descriptor = TypeDescriptor::<Person>::build().unwrap();
		let person = Person {
			name: "Alice".to_string(),
			age: 30,
			email: None,
			cache: vec![1, 2, 3],
		};

		let values: Vec<Value> = descriptor.columns().iter().map(|c| c.read(&person)).collect();
		assert_eq!(values, vec![Value::utf8("Alice"), Value::int4(30), Value::Undefined]);
	}

	#[test]
	fn test_table_override() {
		let schema = Person::schema().table("public.people");
		let descriptor = TypeDescriptor::from_schema(schema).unwrap();
		assert_eq!(descriptor.table(), "public.people");
	}

	#[test]
	fn test_distinct_on_ignored_field() {
		let schema = RecordSchema::<Person>::new()
			.field(Field::new("name", |p: &Person| &p.name))
			.field(Field::new("cache", |p: &Person| &p.cache).ignore().distinct());

		let err = TypeDescriptor::from_schema(schema).unwrap_err();
		assert!(matches!(err, Error::DistinctKeyIgnored { field, .. } if field == "cache"));
	}

	#[test]
	fn test_schema_level_ignore_excludes_field() {
		let schema = RecordSchema::<Person>::new()
			.field(Field::new("name", |p: &Person| &p.name))
			.field(Field::new("cache", |p: &Person| &p.cache))
			.ignore("cache");

		let descriptor = TypeDescriptor::from_schema(schema).unwrap();
		assert_eq!(descriptor.shape().columns(), &["name"]);
		assert_eq!(descriptor.columns().len(), 1);
	}

	#[test]
	fn test_schema_level_ignore_on_distinct_field() {
		let schema = RecordSchema::<Person>::new()
			.field(Field::new("name", |p: &Person| &p.name))
			.field(Field::new("cache", |p: &Person| &p.cache).distinct())
			.ignore("cache");

		let err = TypeDescriptor::from_schema(schema).unwrap_err();
		assert!(matches!(err, Error::DistinctKeyIgnored { field, .. } if field == "cache"));
	}

	#[test]
	fn test_duplicate_column() {
		let schema = RecordSchema::<Person>::new()
			.field(Field::new("name", |p: &Person| &p.name))
			.field(Field::new("email", |p: &Person| &p.email).column("NAME"));

		let err = TypeDescriptor::from_schema(schema).unwrap_err();
		assert!(matches!(err, Error::DuplicateColumn { column, .. } if column == "NAME"));
	}

	#[test]
	fn test_empty_schema() {
		let schema = RecordSchema::<Person>::new().ignore("cache");
		assert!(matches!(TypeDescriptor::from_schema(schema), Err(Error::EmptySchema { record: "Person" })));
	}

	#[test]
	fn test_invalid_column_name() {
		let schema = RecordSchema::<Person>::new().field(Field::new("name", |p: &Person| &p.name).column("full name"));
		assert!(matches!(TypeDescriptor::from_schema(schema), Err(Error::InvalidIdentifier { .. })));
	}
}
