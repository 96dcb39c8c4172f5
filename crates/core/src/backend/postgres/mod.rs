// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! PostgreSQL backend on `tokio-postgres`.

mod connection;
mod sink;

pub use connection::PostgresConnection;
pub use tokio_postgres::Config;
