// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tracing::{debug, warn};

use crate::{Error, Result, connection::Connection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
	Active,
	Committed,
	RolledBack,
}

/// An open transaction on a borrowed connection.
///
/// Must be ended with [`commit`](Self::commit), [`rollback`](Self::rollback)
/// or [`abort`](Self::abort). A guard dropped while active cannot roll back
/// (that needs an await); the server discards the transaction once the
/// connection is closed.
pub struct Transaction<'a, C: Connection> {
	conn: &'a mut C,
	state: TransactionState,
}

impl<'a, C: Connection> Transaction<'a, C> {
	pub async fn begin(conn: &'a mut C) -> Result<Self> {
		conn.begin().await.map_err(|err| wrap("begin", err))?;
		debug!("transaction started");
		Ok(Self {
			conn,
			state: TransactionState::Active,
		})
	}

	pub fn connection(&mut self) -> &mut C {
		self.conn
	}

	pub fn state(&self) -> TransactionState {
		self.state
	}

	pub async fn commit(mut self) -> Result<()> {
		// A failed COMMIT ends the transaction on the server as well.
		self.state = TransactionState::Committed;
		self.conn.commit().await.map_err(|err| wrap("commit", err))?;
		debug!("transaction committed");
		Ok(())
	}

	pub async fn rollback(mut self) -> Result<()> {
		self.state = TransactionState::RolledBack;
		self.conn.rollback().await.map_err(|err| wrap("rollback", err))?;
		debug!("transaction rolled back");
		Ok(())
	}

	/// Rolls back after `err` and returns `err`. A failing rollback is logged,
	/// the original error is kept.
	pub async fn abort(self, err: Error) -> Error {
		if let Err(rollback) = self.rollback().await {
			warn!(error = %rollback, original = %err, "rollback failed");
		}
		err
	}
}

impl<C: Connection> Drop for Transaction<'_, C> {
	fn drop(&mut self) {
		if self.state == TransactionState::Active {
			warn!("transaction dropped while active");
		}
	}
}

fn wrap(operation: &'static str, err: Error) -> Error {
	Error::Transaction {
		operation,
		source: Box::new(err),
	}
}
