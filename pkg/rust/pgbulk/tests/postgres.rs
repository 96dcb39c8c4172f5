// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Live PostgreSQL tests. They run only when `PGBULK_TEST_DATABASE_URL`
//! points at a database the tests may create tables in.

mod common;

use chrono::{DateTime, NaiveDateTime, Utc};
use common::*;
use pgbulk::{BulkLoader, Record, postgres::PostgresConnection};

fn database_url() -> Option<String> {
	std::env::var("PGBULK_TEST_DATABASE_URL").ok().filter(|url| !url.is_empty())
}

#[derive(Record, Debug, Clone)]
#[record(table = "pgbulk_live_event")]
struct Event {
	#[record(distinct)]
	code: String,
	note: Option<String>,
	at: NaiveDateTime,
	seen: DateTime<Utc>,
}

async fn reset(url: &str) {
	let (client, connection) = tokio_postgres::connect(url, tokio_postgres::NoTls).await.unwrap();
	tokio::spawn(connection);
	client
		.batch_execute(
			"DROP TABLE IF EXISTS pgbulk_live_event; \
			 CREATE TABLE pgbulk_live_event (code TEXT NOT NULL, note TEXT, at TIMESTAMP, seen TIMESTAMPTZ)",
		)
		.await
		.unwrap();
}

async fn count(url: &str) -> i64 {
	let (client, connection) = tokio_postgres::connect(url, tokio_postgres::NoTls).await.unwrap();
	tokio::spawn(connection);
	client.query_one("SELECT count(*) FROM pgbulk_live_event", &[]).await.unwrap().get(0)
}

fn event(code: &str) -> Event {
	Event {
		code: code.to_string(),
		note: None,
		at: NaiveDateTime::MIN,
		seen: Utc::now(),
	}
}

#[tokio::test]
async fn test_live_load_and_load_distinct() {
	let Some(url) = database_url() else {
		eprintln!("PGBULK_TEST_DATABASE_URL not set, skipping");
		return;
	};
	init_tracing();
	reset(&url).await;

	let loader = BulkLoader::builder().build().unwrap();
	let mut conn = PostgresConnection::from_url(&url).unwrap();

	let report = loader.load(&mut conn, &[event("a"), event("b")]).await.unwrap();
	assert_eq!(report.streamed, 2);
	assert_eq!(count(&url).await, 2);

	let report = loader.load_distinct(&mut conn, &[event("a"), event("c"), event("c")]).await.unwrap();
	assert_eq!(report.inserted, 1);
	assert_eq!(count(&url).await, 3);
}
