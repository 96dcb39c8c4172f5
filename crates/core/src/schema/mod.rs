// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

mod descriptor;
mod field;
pub mod ident;
mod registry;

pub use descriptor::{ColumnSpec, TableShape, TypeDescriptor};
pub use field::{Field, Record, RecordSchema};
pub use registry::TypeRegistry;
