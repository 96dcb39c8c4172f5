// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Writer for the PostgreSQL binary copy format.
//!
//! ```text
//! header   PGCOPY\n\377\r\n\0 | flags: i32 = 0 | extension length: i32 = 0
//! row      field count: i16 | per field: length: i32 (-1 = null) | bytes
//! trailer  -1: i16
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use pgbulk_type::{Type, Value};
use postgres_types::{IsNull, ToSql};

use crate::{Error, Result};

pub const SIGNATURE: &[u8; 11] = b"PGCOPY\n\xff\r\n\0";
pub const TRAILER: i16 = -1;
pub const NULL_LENGTH: i32 = -1;

/// Serializes rows into binary copy bytes, enforcing the row protocol: every
/// row is started explicitly and receives exactly one value per column.
#[derive(Debug)]
pub struct BinaryCopyEncoder {
	buf: BytesMut,
	columns: usize,
	rows: u64,
	written: usize,
	in_row: bool,
	finished: bool,
}

impl BinaryCopyEncoder {
	pub fn new(columns: usize) -> Self {
		let mut buf = BytesMut::with_capacity(1024);
		buf.put_slice(SIGNATURE);
		buf.put_i32(0);
		buf.put_i32(0);

		Self {
			buf,
			columns,
			rows: 0,
			written: 0,
			in_row: false,
			finished: false,
		}
	}

	pub fn start_row(&mut self) -> Result<()> {
		self.close_row()?;
		self.buf.put_i16(self.columns as i16);
		self.rows += 1;
		self.written = 0;
		self.in_row = true;
		Ok(())
	}

	pub fn write_null(&mut self) -> Result<()> {
		self.claim_slot()?;
		self.buf.put_i32(NULL_LENGTH);
		Ok(())
	}

	/// Writes `value` as a column of type `ty`. `column` names the column in
	/// encoding errors.
	pub fn write(&mut self, column: &str, ty: Type, value: &Value) -> Result<()> {
		self.claim_slot()?;

		let offset = self.buf.len();
		self.buf.put_i32(0);

		match value.to_sql_checked(&ty.to_postgres(), &mut self.buf) {
			Ok(IsNull::Yes) => {
				self.buf.truncate(offset);
				self.buf.put_i32(NULL_LENGTH);
				Ok(())
			}
			Ok(IsNull::No) => {
				let len = self.buf.len() - offset - 4;
				self.buf[offset..offset + 4].copy_from_slice(&(len as i32).to_be_bytes());
				Ok(())
			}
			Err(source) => {
				self.buf.truncate(offset);
				self.written -= 1;
				Err(Error::Encode {
					column: column.to_string(),
					source,
				})
			}
		}
	}

	/// Closes the last row and appends the trailer.
	pub fn finish(&mut self) -> Result<()> {
		if self.finished {
			return Ok(());
		}
		self.close_row()?;
		self.buf.put_i16(TRAILER);
		self.finished = true;
		Ok(())
	}

	/// Takes the bytes encoded so far.
	pub fn take(&mut self) -> Bytes {
		self.buf.split().freeze()
	}

	/// Number of buffered bytes not yet taken.
	pub fn buffered(&self) -> usize {
		self.buf.len()
	}

	/// Number of rows started.
	pub fn rows(&self) -> u64 {
		self.rows
	}

	fn claim_slot(&mut self) -> Result<()> {
		if !self.in_row {
			return Err(Error::RowNotStarted {
				row: self.rows + 1,
			});
		}
		if self.written == self.columns {
			return Err(Error::ColumnOverflow {
				row: self.rows,
				expected: self.columns,
			});
		}
		self.written += 1;
		Ok(())
	}

	fn close_row(&mut self) -> Result<()> {
		if self.in_row && self.written != self.columns {
			return Err(Error::IncompleteRow {
				row: self.rows,
				written: self.written,
				expected: self.columns,
			});
		}
		self.in_row = false;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn header() -> Vec<u8> {
		let mut bytes = SIGNATURE.to_vec();
		bytes.extend_from_slice(&[0; 8]);
		bytes
	}

	#[test]
	fn test_empty_stream() {
		let mut encoder = BinaryCopyEncoder::new(2);
		encoder.finish().unwrap();

		let mut expected = header();
		expected.extend_from_slice(&[0xff, 0xff]);
		assert_eq!(encoder.take().as_ref(), expected.as_slice());
		assert_eq!(encoder.rows(), 0);
	}

	#[test]
	fn test_single_row() {
		let mut encoder = BinaryCopyEncoder::new(2);
		encoder.start_row().unwrap();
		encoder.write("age", Type::Int4, &Value::int4(30)).unwrap();
		encoder.write_null().unwrap();
		encoder.finish().unwrap();

		let mut expected = header();
		expected.extend_from_slice(&[0, 2]);
		expected.extend_from_slice(&[0, 0, 0, 4, 0, 0, 0, 30]);
		expected.extend_from_slice(&[0xff, 0xff, 0xff, 0xff]);
		expected.extend_from_slice(&[0xff, 0xff]);
		assert_eq!(encoder.take().as_ref(), expected.as_slice());
	}

	#[test]
	fn test_undefined_value_written_as_null() {
		let mut encoder = BinaryCopyEncoder::new(1);
		encoder.take();
		encoder.start_row().unwrap();
		encoder.write("email", Type::Utf8, &Value::Undefined).unwrap();
		assert_eq!(encoder.take().as_ref(), &[0, 1, 0xff, 0xff, 0xff, 0xff]);
	}

	#[test]
	fn test_value_before_row() {
		let mut encoder = BinaryCopyEncoder::new(1);
		assert!(matches!(encoder.write_null(), Err(Error::RowNotStarted { row: 1 })));
	}

	#[test]
	fn test_column_overflow() {
		let mut encoder = BinaryCopyEncoder::new(1);
		encoder.start_row().unwrap();
		encoder.write_null().unwrap();
		assert!(matches!(encoder.write_null(), Err(Error::ColumnOverflow { row: 1, expected: 1 })));
	}

	#[test]
	fn test_incomplete_row() {
		let mut encoder = BinaryCopyEncoder::new(2);
		encoder.start_row().unwrap();
		encoder.write_null().unwrap();
		assert!(matches!(
			encoder.start_row(),
			Err(Error::IncompleteRow {
				row: 1,
				written: 1,
				expected: 2
			})
		));
		assert!(matches!(encoder.finish(), Err(Error::IncompleteRow { .. })));
	}

	#[test]
	fn test_encode_error_leaves_buffer_intact() {
		let mut encoder = BinaryCopyEncoder::new(1);
		encoder.start_row().unwrap();
		let before = encoder.buffered();

		let err = encoder.write("age", Type::Int4, &Value::utf8("thirty")).unwrap_err();
		assert!(matches!(err, Error::Encode { column, .. } if column == "age"));
		assert_eq!(encoder.buffered(), before);
	}
}
