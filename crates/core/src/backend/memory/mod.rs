// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! In-process datastore implementing the connection protocol.
//!
//! Supports exactly the statements the loader issues: staging tables,
//! target locks, distinct inserts and binary copies. Faults can be injected
//! per operation to exercise the failure paths.

mod connection;
mod datastore;
mod fault;
mod sink;

pub use connection::MemoryConnection;
pub use datastore::{MemoryDatastore, MemoryError, MemoryStats, MemoryTable};
pub use fault::FaultPoint;
