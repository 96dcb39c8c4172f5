// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, Config, NoTls};
use tracing::{debug, error, instrument, warn};

use super::sink::PostgresCopySink;
use crate::{
	Error, Result,
	connection::{Connection, CopySink},
	sql::{CopyTarget, Statement},
};

/// A PostgreSQL session, connected on `open` and dropped on `close`.
pub struct PostgresConnection {
	config: Config,
	client: Option<Client>,
	driver: Option<JoinHandle<()>>,
}

impl PostgresConnection {
	pub fn new(config: Config) -> Self {
		Self {
			config,
			client: None,
			driver: None,
		}
	}

	/// Parses a `postgres://` URL or a key-value connection string.
	pub fn from_url(url: &str) -> Result<Self> {
		let config = url.parse::<Config>().map_err(Error::connection)?;
		Ok(Self::new(config))
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	/// The underlying client while the connection is open.
	pub fn client(&self) -> Option<&Client> {
		self.client.as_ref()
	}

	fn live_client(&self) -> Result<&Client> {
		match &self.client {
			Some(client) if !client.is_closed() => Ok(client),
			_ => Err(Error::ConnectionClosed),
		}
	}
}

impl fmt::Debug for PostgresConnection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PostgresConnection").field("open", &self.is_open()).finish_non_exhaustive()
	}
}

#[async_trait]
impl Connection for PostgresConnection {
	fn is_open(&self) -> bool {
		self.client.as_ref().is_some_and(|client| !client.is_closed())
	}

	#[instrument(name = "postgres::open", level = "debug", skip(self))]
	async fn open(&mut self) -> Result<()> {
		// A client whose driver has stopped is replaced.
		self.close().await?;

		let (client, connection) = self.config.connect(NoTls).await.map_err(Error::connection)?;
		self.driver = Some(tokio::spawn(async move {
			if let Err(err) = connection.await {
				error!(error = %err, "postgres connection driver failed");
			}
		}));
		self.client = Some(client);
		debug!("postgres connection established");
		Ok(())
	}

	#[instrument(name = "postgres::close", level = "debug", skip(self))]
	async fn close(&mut self) -> Result<()> {
		// Dropping the client ends the driver task.
		self.client.take();
		if let Some(driver) = self.driver.take() {
			if let Err(err) = driver.await {
				warn!(error = %err, "postgres connection driver did not shut down cleanly");
			}
		}
		Ok(())
	}

	async fn begin(&mut self) -> Result<()> {
		self.live_client()?.batch_execute("BEGIN").await?;
		Ok(())
	}

	async fn commit(&mut self) -> Result<()> {
		self.live_client()?.batch_execute("COMMIT").await?;
		Ok(())
	}

	async fn rollback(&mut self) -> Result<()> {
		self.live_client()?.batch_execute("ROLLBACK").await?;
		Ok(())
	}

	#[instrument(name = "postgres::execute", level = "debug", skip(self), fields(statement = %statement))]
	async fn execute(&mut self, statement: &Statement) -> Result<u64> {
		let sql = statement.to_string();
		Ok(self.live_client()?.execute(sql.as_str(), &[]).await?)
	}

	#[instrument(name = "postgres::copy_in", level = "debug", skip(self), fields(target = %target.table))]
	async fn copy_in<'a>(&'a mut self, target: &CopyTarget) -> Result<Box<dyn CopySink + 'a>> {
		let sql = target.to_string();
		let sink = self.live_client()?.copy_in::<_, Bytes>(sql.as_str()).await?;
		Ok(Box::new(PostgresCopySink::new(sink)))
	}
}
