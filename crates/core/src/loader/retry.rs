// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Which result a retried load reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryOutcome {
	/// The result of the final attempt, success included.
	#[default]
	LastAttempt,
	/// The first failure, even when a later attempt succeeded. Retries still
	/// run, so rows may have been inserted when an error is returned.
	FirstFailure,
}

/// Bounded re-execution of a failed distinct load.
///
/// Every attempt runs from scratch: new connection session, new transaction,
/// new staging table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
	/// Total attempts including the first. `1` disables retries.
	pub max_attempts: u32,
	/// Pause before the second attempt, doubled for each further attempt.
	pub initial_backoff: Duration,
	pub max_backoff: Duration,
	pub outcome: RetryOutcome,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_attempts: 2,
			initial_backoff: Duration::from_millis(100),
			max_backoff: Duration::from_secs(5),
			outcome: RetryOutcome::LastAttempt,
		}
	}
}

impl RetryPolicy {
	pub fn none() -> Self {
		Self {
			max_attempts: 1,
			..Self::default()
		}
	}

	pub fn new(max_attempts: u32) -> Self {
		Self {
			max_attempts,
			..Self::default()
		}
	}

	pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
		self.initial_backoff = initial;
		self.max_backoff = max;
		self
	}

	pub fn with_outcome(mut self, outcome: RetryOutcome) -> Self {
		self.outcome = outcome;
		self
	}

	/// Whether attempt number `attempt` (1-based) failing with `err` is
	/// followed by another attempt.
	pub fn should_retry(&self, attempt: u32, err: &Error) -> bool {
		attempt < self.max_attempts && err.is_retryable()
	}

	/// Pause after attempt number `attempt` failed.
	pub fn backoff(&self, attempt: u32) -> Duration {
		let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
		self.initial_backoff.saturating_mul(factor).min(self.max_backoff)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_allows_one_retry() {
		let policy = RetryPolicy::default();
		let err = Error::ConnectionClosed;
		assert!(policy.should_retry(1, &err));
		assert!(!policy.should_retry(2, &err));
		assert_eq!(policy.outcome, RetryOutcome::LastAttempt);
	}

	#[test]
	fn test_non_retryable_error() {
		let policy = RetryPolicy::new(5);
		let err = Error::MissingDistinctKey {
			table: "person".to_string(),
		};
		assert!(!policy.should_retry(1, &err));
	}

	#[test]
	fn test_none() {
		assert!(!RetryPolicy::none().should_retry(1, &Error::ConnectionClosed));
	}

	#[test]
	fn test_backoff_doubles_and_caps() {
		let policy = RetryPolicy::new(10).with_backoff(Duration::from_millis(100), Duration::from_millis(500));
		assert_eq!(policy.backoff(1), Duration::from_millis(100));
		assert_eq!(policy.backoff(2), Duration::from_millis(200));
		assert_eq!(policy.backoff(3), Duration::from_millis(400));
		assert_eq!(policy.backoff(4), Duration::from_millis(500));
		assert_eq!(policy.backoff(64), Duration::from_millis(500));
	}

	#[test]
	fn test_deserialize_partial() {
		let policy: RetryPolicy = serde_json::from_str(r#"{"max_attempts": 4, "outcome": "first_failure"}"#).unwrap();
		assert_eq!(policy.max_attempts, 4);
		assert_eq!(policy.outcome, RetryOutcome::FirstFailure);
		assert_eq!(policy.initial_backoff, Duration::from_millis(100));
	}
}
