// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::Type;

pub trait GetType {
	fn get_type() -> Type;
}

impl GetType for bool {
	fn get_type() -> Type {
		Type::Boolean
	}
}

impl GetType for i8 {
	fn get_type() -> Type {
		Type::Int2
	}
}

impl GetType for i16 {
	fn get_type() -> Type {
		Type::Int2
	}
}

impl GetType for i32 {
	fn get_type() -> Type {
		Type::Int4
	}
}

impl GetType for i64 {
	fn get_type() -> Type {
		Type::Int8
	}
}

impl GetType for u8 {
	fn get_type() -> Type {
		Type::Int2
	}
}

impl GetType for u16 {
	fn get_type() -> Type {
		Type::Int4
	}
}

impl GetType for u32 {
	fn get_type() -> Type {
		Type::Int8
	}
}

impl GetType for f32 {
	fn get_type() -> Type {
		Type::Float4
	}
}

impl GetType for f64 {
	fn get_type() -> Type {
		Type::Float8
	}
}

impl GetType for String {
	fn get_type() -> Type {
		Type::Utf8
	}
}

impl GetType for Vec<u8> {
	fn get_type() -> Type {
		Type::Blob
	}
}

impl GetType for uuid::Uuid {
	fn get_type() -> Type {
		Type::Uuid
	}
}

impl GetType for NaiveDate {
	fn get_type() -> Type {
		Type::Date
	}
}

impl GetType for NaiveTime {
	fn get_type() -> Type {
		Type::Time
	}
}

impl GetType for NaiveDateTime {
	fn get_type() -> Type {
		Type::DateTime
	}
}

impl GetType for chrono::DateTime<Utc> {
	fn get_type() -> Type {
		Type::DateTimeTz
	}
}

impl GetType for serde_json::Value {
	fn get_type() -> Type {
		Type::Json
	}
}

impl<T: GetType> GetType for Option<T> {
	fn get_type() -> Type {
		T::get_type()
	}
}
