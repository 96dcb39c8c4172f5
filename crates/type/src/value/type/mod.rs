// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

mod get;

pub use get::GetType;

/// All column types a record field can map to
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Type {
	/// A boolean: true or false.
	Boolean,
	/// A 2-byte signed integer
	Int2,
	/// A 4-byte signed integer
	Int4,
	/// An 8-byte signed integer
	Int8,
	/// A 4-byte floating point
	Float4,
	/// An 8-byte floating point
	Float8,
	/// A UTF-8 encoded text.
	Utf8,
	/// A binary large object (BLOB)
	Blob,
	/// A UUID of any version
	Uuid,
	/// A date value (year, month, day)
	Date,
	/// A time of day without time zone
	Time,
	/// A date and time value without time zone
	DateTime,
	/// A date and time value in UTC
	DateTimeTz,
	/// A JSON document
	Json,
}

impl Type {
	/// The PostgreSQL type this column is encoded as on the wire.
	pub fn to_postgres(&self) -> postgres_types::Type {
		use postgres_types::Type as Pg;
		match self {
			Type::Boolean => Pg::BOOL,
			Type::Int2 => Pg::INT2,
			Type::Int4 => Pg::INT4,
			Type::Int8 => Pg::INT8,
			Type::Float4 => Pg::FLOAT4,
			Type::Float8 => Pg::FLOAT8,
			Type::Utf8 => Pg::TEXT,
			Type::Blob => Pg::BYTEA,
			Type::Uuid => Pg::UUID,
			Type::Date => Pg::DATE,
			Type::Time => Pg::TIME,
			Type::DateTime => Pg::TIMESTAMP,
			Type::DateTimeTz => Pg::TIMESTAMPTZ,
			Type::Json => Pg::JSONB,
		}
	}
}

impl Display for Type {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Type::Boolean => f.write_str("BOOLEAN"),
			Type::Int2 => f.write_str("INT2"),
			Type::Int4 => f.write_str("INT4"),
			Type::Int8 => f.write_str("INT8"),
			Type::Float4 => f.write_str("FLOAT4"),
			Type::Float8 => f.write_str("FLOAT8"),
			Type::Utf8 => f.write_str("TEXT"),
			Type::Blob => f.write_str("BYTEA"),
			Type::Uuid => f.write_str("UUID"),
			Type::Date => f.write_str("DATE"),
			Type::Time => f.write_str("TIME"),
			Type::DateTime => f.write_str("TIMESTAMP"),
			Type::DateTimeTz => f.write_str("TIMESTAMPTZ"),
			Type::Json => f.write_str("JSONB"),
		}
	}
}
