// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use chrono::{NaiveDateTime, Utc};

use crate::Value;

impl Value {
	/// The minimum representable instant marks a timestamp that was never
	/// set. Such values are written as NULL instead of a literal instant.
	pub fn is_unset_timestamp(&self) -> bool {
		match self {
			Value::DateTime(v) => *v == NaiveDateTime::MIN,
			Value::DateTimeTz(v) => *v == chrono::DateTime::<Utc>::MIN_UTC,
			_ => false,
		}
	}
}

#[cfg(test)]
mod tests {
	use chrono::{DateTime, NaiveDate};

	use super::*;

	#[test]
	fn test_minimum_instants_are_unset() {
		assert!(Value::datetime(NaiveDateTime::MIN).is_unset_timestamp());
		assert!(Value::datetime_tz(DateTime::<Utc>::MIN_UTC).is_unset_timestamp());
	}

	#[test]
	fn test_other_values_are_set() {
		let epoch = DateTime::<Utc>::UNIX_EPOCH;
		assert!(!Value::datetime_tz(epoch).is_unset_timestamp());
		assert!(!Value::datetime(epoch.naive_utc()).is_unset_timestamp());
		assert!(!Value::date(NaiveDate::MIN).is_unset_timestamp());
		assert!(!Value::Undefined.is_unset_timestamp());
	}
}
