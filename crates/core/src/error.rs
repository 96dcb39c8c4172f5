// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use pgbulk_type::DecodeError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("record `{record}` declares no persisted columns")]
	EmptySchema {
		record: &'static str,
	},

	#[error("record `{record}` maps column `{column}` more than once")]
	DuplicateColumn {
		record: &'static str,
		column: String,
	},

	#[error("record `{record}` marks ignored field `{field}` as distinct key")]
	DistinctKeyIgnored {
		record: &'static str,
		field: String,
	},

	#[error("`{identifier}` is not a valid SQL identifier")]
	InvalidIdentifier {
		identifier: String,
	},

	#[error("table `{table}` declares no distinct key columns")]
	MissingDistinctKey {
		table: String,
	},

	#[error("failed to encode column `{column}`: {source}")]
	Encode {
		column: String,
		#[source]
		source: BoxError,
	},

	#[error(transparent)]
	Decode(#[from] DecodeError),

	#[error("malformed binary copy stream: {message}")]
	MalformedCopy {
		message: String,
	},

	#[error("row {row} was not started before writing column values")]
	RowNotStarted {
		row: u64,
	},

	#[error("row {row} has {written} of {expected} column values")]
	IncompleteRow {
		row: u64,
		written: usize,
		expected: usize,
	},

	#[error("row {row} has more than {expected} column values")]
	ColumnOverflow {
		row: u64,
		expected: usize,
	},

	#[error("connection failed: {source}")]
	Connection {
		#[source]
		source: BoxError,
	},

	#[error("connection is closed")]
	ConnectionClosed,

	#[error("database error: {source}")]
	Database {
		#[source]
		source: BoxError,
	},

	#[error("transaction {operation} failed: {source}")]
	Transaction {
		operation: &'static str,
		#[source]
		source: Box<Error>,
	},

	#[error("bulk transfer into `{target}` failed: {source}")]
	Transfer {
		target: String,
		#[source]
		source: Box<Error>,
	},

	#[error("failed to create staging table `{staging}`: {source}")]
	StagingSetup {
		staging: String,
		#[source]
		source: Box<Error>,
	},

	#[error("distinct insert from `{staging}` into `{table}` failed: {source}")]
	DistinctInsert {
		table: String,
		staging: String,
		#[source]
		source: Box<Error>,
	},
}

impl Error {
	pub fn connection(source: impl Into<BoxError>) -> Self {
		Error::Connection {
			source: source.into(),
		}
	}

	pub fn database(source: impl Into<BoxError>) -> Self {
		Error::Database {
			source: source.into(),
		}
	}

	pub fn malformed_copy(message: impl Into<String>) -> Self {
		Error::MalformedCopy {
			message: message.into(),
		}
	}

	/// Whether running the same load again could succeed.
	///
	/// Schema, encoding and row protocol errors are properties of the input
	/// and fail the same way on every attempt.
	pub fn is_retryable(&self) -> bool {
		match self {
			Error::Connection {
				..
			}
			| Error::ConnectionClosed
			| Error::Database {
				..
			} => true,
			Error::Transaction {
				source,
				..
			}
			| Error::Transfer {
				source,
				..
			}
			| Error::StagingSetup {
				source,
				..
			}
			| Error::DistinctInsert {
				source,
				..
			} => source.is_retryable(),
			_ => false,
		}
	}
}

impl From<tokio_postgres::Error> for Error {
	fn from(err: tokio_postgres::Error) -> Self {
		if err.is_closed() {
			Error::connection(err)
		} else {
			Error::database(err)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_database_errors_are_retryable() {
		let err = Error::Transfer {
			target: "person".to_string(),
			source: Box::new(Error::database("connection reset")),
		};
		assert!(err.is_retryable());
	}

	#[test]
	fn test_encoding_errors_are_not_retryable() {
		let err = Error::Transfer {
			target: "person".to_string(),
			source: Box::new(Error::Encode {
				column: "age".to_string(),
				source: "wrong type".into(),
			}),
		};
		assert!(!err.is_retryable());
		assert!(
			!Error::MissingDistinctKey {
				table: "person".to_string()
			}
			.is_retryable()
		);
	}

	#[test]
	fn test_display() {
		let err = Error::StagingSetup {
			staging: "tmp_person_0".to_string(),
			source: Box::new(Error::ConnectionClosed),
		};
		assert_eq!(err.to_string(), "failed to create staging table `tmp_person_0`: connection is closed");
	}
}
