// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use pgbulk_type::{ToValue, Type, Value};

pub(crate) type Accessor<R> = Arc<dyn Fn(&R) -> Value + Send + Sync>;

/// A record type that can be bulk loaded.
///
/// The schema is static configuration: it must describe the same table and
/// fields every time it is called, since it is read once per registry.
///
/// ```ignore
/// impl Record for Person {
///     fn schema() -> RecordSchema<Self> {
///         RecordSchema::new()
///             .table("people")
///             .field(Field::new("name", |p: &Person| &p.name).distinct())
///             .field(Field::new("age", |p: &Person| &p.age))
///             .ignore("cache")
///     }
/// }
/// ```
pub trait Record: Send + Sync + 'static {
	fn schema() -> RecordSchema<Self>
	where
		Self: Sized;
}

/// Declared persistence configuration of one record type.
pub struct RecordSchema<R> {
	pub(crate) record: &'static str,
	pub(crate) table: Option<String>,
	pub(crate) fields: Vec<Field<R>>,
	pub(crate) ignored: Vec<&'static str>,
}

impl<R: 'static> RecordSchema<R> {
	pub fn new() -> Self {
		Self {
			record: short_type_name::<R>(),
			table: None,
			fields: Vec::new(),
			ignored: Vec::new(),
		}
	}

	/// Target table. Defaults to the record's type name.
	pub fn table(mut self, name: impl Into<String>) -> Self {
		self.table = Some(name.into());
		self
	}

	pub fn field(mut self, field: Field<R>) -> Self {
		self.fields.push(field);
		self
	}

	/// Declares a field that is never persisted.
	pub fn ignore(mut self, name: &'static str) -> Self {
		self.ignored.push(name);
		self
	}

	pub fn record_name(&self) -> &'static str {
		self.record
	}
}

impl<R: 'static> Default for RecordSchema<R> {
	fn default() -> Self {
		Self::new()
	}
}

/// One field of a record and the column it is persisted as.
pub struct Field<R> {
	pub(crate) name: &'static str,
	pub(crate) column: Option<String>,
	pub(crate) ty: Type,
	pub(crate) nullable: bool,
	pub(crate) distinct: bool,
	pub(crate) ignored: bool,
	pub(crate) read: Accessor<R>,
}

impl<R: 'static> Field<R> {
	/// A field read through `get`. Nullability and column type follow `T`,
	/// so only `Option<_>` fields are nullable.
	pub fn new<T: ToValue + 'static>(name: &'static str, get: fn(&R) -> &T) -> Self {
		Self {
			name,
			column: None,
			ty: T::get_type(),
			nullable: T::NULLABLE,
			distinct: false,
			ignored: false,
			read: Arc::new(move |record| get(record).to_value()),
		}
	}

	/// A field whose value is computed from the record rather than borrowed.
	pub fn computed<T: ToValue>(name: &'static str, compute: impl Fn(&R) -> T + Send + Sync + 'static) -> Self {
		Self {
			name,
			column: None,
			ty: T::get_type(),
			nullable: T::NULLABLE,
			distinct: false,
			ignored: false,
			read: Arc::new(move |record| compute(record).to_value()),
		}
	}

	/// Column name override. Defaults to the field name.
	pub fn column(mut self, name: impl Into<String>) -> Self {
		self.column = Some(name.into());
		self
	}

	/// Marks the column as part of the distinct key.
	pub fn distinct(mut self) -> Self {
		self.distinct = true;
		self
	}

	/// Excludes the field from persistence.
	pub fn ignore(mut self) -> Self {
		self.ignored = true;
		self
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn column_name(&self) -> &str {
		self.column.as_deref().unwrap_or(self.name)
	}
}

fn short_type_name<R>() -> &'static str {
	let name = std::any::type_name::<R>();
	let name = name.split('<').next().unwrap_or(name);
	name.rsplit("::").next().unwrap_or(name)
}
