// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use super::channel::CopyChannel;
use crate::{Result, schema::TypeDescriptor};

/// Writes one record as a row, column by column in descriptor order.
///
/// A column is written as null when it is nullable and the value is absent,
/// or when it holds the minimum timestamp, whether nullable or not.
pub async fn write_row<R>(channel: &mut CopyChannel<'_>, record: &R, descriptor: &TypeDescriptor<R>) -> Result<()> {
	channel.start_row().await?;

	for column in descriptor.columns() {
		let value = column.read(record);

		if (column.is_nullable() && value.is_undefined()) || value.is_unset_timestamp() {
			channel.write_null()?;
		} else {
			channel.write(column.name(), column.ty(), &value)?;
		}
	}

	Ok(())
}
