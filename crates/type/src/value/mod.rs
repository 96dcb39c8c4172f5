// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

pub mod postgres;
mod temporal;
mod to_value;
mod r#type;

pub use r#type::{GetType, Type};
pub use to_value::ToValue;

/// A column value, represented as a native Rust type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
	/// Value is not defined (written as SQL NULL)
	Undefined,
	/// A boolean: true or false.
	Boolean(bool),
	/// A 2-byte signed integer
	Int2(i16),
	/// A 4-byte signed integer
	Int4(i32),
	/// An 8-byte signed integer
	Int8(i64),
	/// A 4-byte floating point
	Float4(f32),
	/// An 8-byte floating point
	Float8(f64),
	/// A UTF-8 encoded text.
	Utf8(String),
	/// A binary large object (BLOB)
	Blob(Vec<u8>),
	/// A UUID of any version
	Uuid(uuid::Uuid),
	/// A date value (year, month, day)
	Date(NaiveDate),
	/// A time of day without time zone
	Time(NaiveTime),
	/// A date and time value without time zone
	DateTime(NaiveDateTime),
	/// A date and time value in UTC
	DateTimeTz(chrono::DateTime<Utc>),
	/// A JSON document
	Json(serde_json::Value),
}

impl Value {
	pub fn int4(v: impl Into<i32>) -> Self {
		Value::Int4(v.into())
	}

	pub fn int8(v: impl Into<i64>) -> Self {
		Value::Int8(v.into())
	}

	pub fn utf8(v: impl Into<String>) -> Self {
		Value::Utf8(v.into())
	}

	pub fn date(v: impl Into<NaiveDate>) -> Self {
		Value::Date(v.into())
	}

	pub fn datetime(v: impl Into<NaiveDateTime>) -> Self {
		Value::DateTime(v.into())
	}

	pub fn datetime_tz(v: impl Into<chrono::DateTime<Utc>>) -> Self {
		Value::DateTimeTz(v.into())
	}

	pub fn is_undefined(&self) -> bool {
		matches!(self, Value::Undefined)
	}
}
