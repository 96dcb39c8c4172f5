// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use bytes::Buf;
use pgbulk_type::{Type, Value, decode};

use super::binary::{NULL_LENGTH, SIGNATURE, TRAILER};
use crate::{Error, Result};

/// Decodes a complete binary copy stream into rows of `types`.
pub fn decode_copy(mut input: &[u8], types: &[Type]) -> Result<Vec<Vec<Value>>> {
	if input.len() < SIGNATURE.len() + 8 || &input[..SIGNATURE.len()] != SIGNATURE {
		return Err(Error::malformed_copy("missing binary copy signature"));
	}
	input.advance(SIGNATURE.len());

	let flags = input.get_i32();
	if flags & (1 << 16) != 0 {
		return Err(Error::malformed_copy("oids are not supported"));
	}

	let extension = read_length(&mut input, "header extension")?;
	if input.remaining() < extension {
		return Err(Error::malformed_copy("truncated header extension"));
	}
	input.advance(extension);

	let mut rows = Vec::new();
	loop {
		if input.remaining() < 2 {
			return Err(Error::malformed_copy("missing trailer"));
		}

		let count = input.get_i16();
		if count == TRAILER {
			break;
		}
		if count as usize != types.len() {
			return Err(Error::malformed_copy(format!(
				"row {} has {} fields, expected {}",
				rows.len() + 1,
				count,
				types.len()
			)));
		}

		let mut row = Vec::with_capacity(types.len());
		for ty in types {
			if input.remaining() < 4 {
				return Err(Error::malformed_copy("truncated field length"));
			}
			let len = input.get_i32();
			if len == NULL_LENGTH {
				row.push(Value::Undefined);
				continue;
			}
			if len < 0 || input.remaining() < len as usize {
				return Err(Error::malformed_copy("truncated field"));
			}
			let (raw, rest) = input.split_at(len as usize);
			row.push(decode(*ty, Some(raw))?);
			input = rest;
		}
		rows.push(row);
	}

	if input.has_remaining() {
		return Err(Error::malformed_copy("data after trailer"));
	}
	Ok(rows)
}

fn read_length(input: &mut &[u8], what: &str) -> Result<usize> {
	if input.remaining() < 4 {
		return Err(Error::malformed_copy(format!("truncated {what}")));
	}
	usize::try_from(input.get_i32()).map_err(|_| Error::malformed_copy(format!("negative {what} length")))
}
