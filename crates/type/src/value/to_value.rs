// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::{GetType, Value};

/// Reads a record field into a [`Value`].
///
/// `NULLABLE` reflects the declared optionality of the field type: it is
/// `true` for `Option<T>` only, so a column is nullable exactly when its
/// field is declared optional.
pub trait ToValue: GetType {
	const NULLABLE: bool = false;

	fn to_value(&self) -> Value;
}

macro_rules! impl_to_value {
	($($t:ty => $variant:ident),* $(,)?) => {
		$(
			impl ToValue for $t {
				fn to_value(&self) -> Value {
					Value::$variant((*self).into())
				}
			}
		)*
	};
}

impl_to_value! {
	bool => Boolean,
	i8 => Int2,
	i16 => Int2,
	i32 => Int4,
	i64 => Int8,
	u8 => Int2,
	u16 => Int4,
	u32 => Int8,
	f32 => Float4,
	f64 => Float8,
	uuid::Uuid => Uuid,
	NaiveDate => Date,
	NaiveTime => Time,
	NaiveDateTime => DateTime,
	chrono::DateTime<Utc> => DateTimeTz,
}

impl ToValue for String {
	fn to_value(&self) -> Value {
		Value::Utf8(self.clone())
	}
}

impl ToValue for Vec<u8> {
	fn to_value(&self) -> Value {
		Value::Blob(self.clone())
	}
}

impl ToValue for serde_json::Value {
	fn to_value(&self) -> Value {
		Value::Json(self.clone())
	}
}

impl<T: ToValue> ToValue for Option<T> {
	const NULLABLE: bool = true;

	fn to_value(&self) -> Value {
		match self {
			Some(v) => v.to_value(),
			None => Value::Undefined,
		}
	}
}
