// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{collections::HashMap, fmt};

/// Operation at which a fault can be injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultPoint {
	Open,
	Begin,
	CreateStaging,
	LockTable,
	InsertDistinct,
	CopyIn,
	CopySend,
	CopyFinish,
	Commit,
	Rollback,
	Close,
}

impl fmt::Display for FaultPoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			FaultPoint::Open => "open",
			FaultPoint::Begin => "begin",
			FaultPoint::CreateStaging => "create staging",
			FaultPoint::LockTable => "lock table",
			FaultPoint::InsertDistinct => "insert distinct",
			FaultPoint::CopyIn => "copy in",
			FaultPoint::CopySend => "copy send",
			FaultPoint::CopyFinish => "copy finish",
			FaultPoint::Commit => "commit",
			FaultPoint::Rollback => "rollback",
			FaultPoint::Close => "close",
		};
		f.write_str(name)
	}
}

/// Remaining failures per fault point.
#[derive(Debug, Default)]
pub(crate) struct Faults(HashMap<FaultPoint, u32>);

impl Faults {
	pub(crate) fn arm(&mut self, point: FaultPoint, times: u32) {
		if times == 0 {
			self.0.remove(&point);
		} else {
			self.0.insert(point, times);
		}
	}

	pub(crate) fn clear(&mut self) {
		self.0.clear();
	}

	/// Consumes one armed failure at `point`, if any.
	pub(crate) fn trip(&mut self, point: FaultPoint) -> bool {
		match self.0.get_mut(&point) {
			Some(remaining) => {
				*remaining -= 1;
				if *remaining == 0 {
					self.0.remove(&point);
				}
				true
			}
			None => false,
		}
	}
}
