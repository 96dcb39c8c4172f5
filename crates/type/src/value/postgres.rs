// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! PostgreSQL binary representation of [`Value`].

use std::error::Error;

use bytes::BytesMut;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use postgres_types::{FromSql, IsNull, ToSql, to_sql_checked};

use crate::{Type, Value};

impl ToSql for Value {
	fn to_sql(&self, ty: &postgres_types::Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
		// Each variant checks the target type itself
		match self {
			Value::Undefined => Ok(IsNull::Yes),
			Value::Boolean(v) => v.to_sql_checked(ty, out),
			Value::Int2(v) => v.to_sql_checked(ty, out),
			Value::Int4(v) => v.to_sql_checked(ty, out),
			Value::Int8(v) => v.to_sql_checked(ty, out),
			Value::Float4(v) => v.to_sql_checked(ty, out),
			Value::Float8(v) => v.to_sql_checked(ty, out),
			Value::Utf8(v) => v.to_sql_checked(ty, out),
			Value::Blob(v) => v.to_sql_checked(ty, out),
			Value::Uuid(v) => v.to_sql_checked(ty, out),
			Value::Date(v) => v.to_sql_checked(ty, out),
			Value::Time(v) => v.to_sql_checked(ty, out),
			Value::DateTime(v) => v.to_sql_checked(ty, out),
			Value::DateTimeTz(v) => v.to_sql_checked(ty, out),
			Value::Json(v) => v.to_sql_checked(ty, out),
		}
	}

	fn accepts(_ty: &postgres_types::Type) -> bool {
		true
	}

	to_sql_checked!();
}

#[derive(Debug, thiserror::Error)]
#[error("failed to decode {ty} value: {source}")]
pub struct DecodeError {
	pub ty: Type,
	#[source]
	pub source: Box<dyn Error + Sync + Send>,
}

/// Decodes one binary field of the given type. `None` is SQL NULL.
pub fn decode(ty: Type, raw: Option<&[u8]>) -> Result<Value, DecodeError> {
	let Some(raw) = raw else {
		return Ok(Value::Undefined);
	};

	let pg = ty.to_postgres();
	let result = match ty {
		Type::Boolean => bool::from_sql(&pg, raw).map(Value::Boolean),
		Type::Int2 => i16::from_sql(&pg, raw).map(Value::Int2),
		Type::Int4 => i32::from_sql(&pg, raw).map(Value::Int4),
		Type::Int8 => i64::from_sql(&pg, raw).map(Value::Int8),
		Type::Float4 => f32::from_sql(&pg, raw).map(Value::Float4),
		Type::Float8 => f64::from_sql(&pg, raw).map(Value::Float8),
		Type::Utf8 => String::from_sql(&pg, raw).map(Value::Utf8),
		Type::Blob => Vec::<u8>::from_sql(&pg, raw).map(Value::Blob),
		Type::Uuid => uuid::Uuid::from_sql(&pg, raw).map(Value::Uuid),
		Type::Date => NaiveDate::from_sql(&pg, raw).map(Value::Date),
		Type::Time => NaiveTime::from_sql(&pg, raw).map(Value::Time),
		Type::DateTime => NaiveDateTime::from_sql(&pg, raw).map(Value::DateTime),
		Type::DateTimeTz => chrono::DateTime::<Utc>::from_sql(&pg, raw).map(Value::DateTimeTz),
		Type::Json => serde_json::Value::from_sql(&pg, raw).map(Value::Json),
	};

	result.map_err(|source| DecodeError {
		ty,
		source,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn encode(value: &Value, ty: Type) -> Option<Vec<u8>> {
		let mut buf = BytesMut::new();
		match value.to_sql_checked(&ty.to_postgres(), &mut buf).unwrap() {
			IsNull::Yes => None,
			IsNull::No => Some(buf.to_vec()),
		}
	}

	#[test]
	fn test_int4_wire_format() {
		assert_eq!(encode(&Value::int4(1), Type::Int4), Some(vec![0, 0, 0, 1]));
	}

	#[test]
	fn test_undefined_is_null() {
		assert_eq!(encode(&Value::Undefined, Type::Utf8), None);
	}

	#[test]
	fn test_wrong_type_rejected() {
		let mut buf = BytesMut::new();
		assert!(Value::utf8("x").to_sql_checked(&Type::Int4.to_postgres(), &mut buf).is_err());
	}

	#[test]
	fn test_decode_text() {
		let raw = encode(&Value::utf8("Alice"), Type::Utf8).unwrap();
		assert_eq!(decode(Type::Utf8, Some(&raw)).unwrap(), Value::utf8("Alice"));
		assert_eq!(decode(Type::Utf8, None).unwrap(), Value::Undefined);
	}

	#[test]
	fn test_decode_truncated_int() {
		let err = decode(Type::Int8, Some(&[0, 1])).unwrap_err();
		assert_eq!(err.ty, Type::Int8);
	}
}
