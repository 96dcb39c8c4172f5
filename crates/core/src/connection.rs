// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Capability boundary between the loader and a datastore.

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
	Result,
	sql::{CopyTarget, Statement},
};

/// A single datastore session.
///
/// The loader drives one connection sequentially: at most one transaction
/// and at most one copy transfer are active at any time.
#[async_trait]
pub trait Connection: Send {
	fn is_open(&self) -> bool;

	async fn open(&mut self) -> Result<()>;

	/// Closes the session. Closing a closed connection is a no-op.
	async fn close(&mut self) -> Result<()>;

	async fn begin(&mut self) -> Result<()>;

	async fn commit(&mut self) -> Result<()>;

	async fn rollback(&mut self) -> Result<()>;

	/// Runs a statement, returning the number of affected rows.
	async fn execute(&mut self, statement: &Statement) -> Result<u64>;

	/// Starts a binary copy into `target`.
	///
	/// The sink borrows the connection; no other operation may run until it
	/// is finished or dropped.
	async fn copy_in<'a>(&'a mut self, target: &CopyTarget) -> Result<Box<dyn CopySink + 'a>>;
}

/// Receiving end of a binary copy transfer.
#[async_trait]
pub trait CopySink: Send {
	async fn send(&mut self, chunk: Bytes) -> Result<()>;

	/// Completes the transfer, returning the number of rows copied.
	async fn finish(self: Box<Self>) -> Result<u64>;
}
