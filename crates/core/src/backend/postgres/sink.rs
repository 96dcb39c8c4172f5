// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::SinkExt;
use tokio_postgres::CopyInSink;

use crate::{Result, connection::CopySink};

/// Forwards encoded chunks to a `COPY .. FROM STDIN` stream. Dropping the
/// sink without finishing aborts the copy.
pub(crate) struct PostgresCopySink {
	sink: Pin<Box<CopyInSink<Bytes>>>,
}

impl PostgresCopySink {
	pub(crate) fn new(sink: CopyInSink<Bytes>) -> Self {
		Self {
			sink: Box::pin(sink),
		}
	}
}

#[async_trait]
impl CopySink for PostgresCopySink {
	async fn send(&mut self, chunk: Bytes) -> Result<()> {
		self.sink.send(chunk).await?;
		Ok(())
	}

	async fn finish(mut self: Box<Self>) -> Result<u64> {
		Ok(self.sink.as_mut().finish().await?)
	}
}
