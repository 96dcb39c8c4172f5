// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod binary;
mod channel;
mod decode;
mod row;

pub use binary::BinaryCopyEncoder;
pub use channel::CopyChannel;
pub use decode::decode_copy;
pub use row::write_row;
