// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! SQL identifier rules.
//!
//! Table and column names are interpolated into statements without quoting,
//! so every name is checked against the identifier grammar first. A name is
//! either a plain identifier (`[A-Za-z_][A-Za-z0-9_$]*`, folded to lower case
//! by the server) or a double-quoted identifier without embedded quotes.

use uuid::Uuid;

use crate::{Error, Result};

/// PostgreSQL truncates identifiers longer than this many bytes.
pub const MAX_IDENTIFIER_LEN: usize = 63;

pub fn validate_identifier(identifier: &str) -> Result<()> {
	if is_identifier(identifier) {
		Ok(())
	} else {
		Err(invalid(identifier))
	}
}

/// Validates a table name, optionally qualified by a schema (`schema.table`).
pub fn validate_table_name(table: &str) -> Result<()> {
	match split_qualified(table) {
		Some(parts) if (1..=2).contains(&parts.len()) && parts.iter().all(|part| is_identifier(part)) => Ok(()),
		_ => Err(invalid(table)),
	}
}

/// The name the server resolves an identifier to.
pub fn normalize_identifier(identifier: &str) -> String {
	match identifier.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
		Some(quoted) => quoted.to_string(),
		None => identifier.to_ascii_lowercase(),
	}
}

/// Splits a possibly qualified name on dots outside of quotes.
pub fn split_qualified(name: &str) -> Option<Vec<&str>> {
	let mut parts = Vec::new();
	let mut start = 0;
	let mut quoted = false;

	for (idx, ch) in name.char_indices() {
		match ch {
			'"' => quoted = !quoted,
			'.' if !quoted => {
				parts.push(&name[start..idx]);
				start = idx + 1;
			}
			_ => {}
		}
	}

	if quoted {
		return None;
	}
	parts.push(&name[start..]);
	Some(parts)
}

/// A staging table name unique per invocation.
///
/// Shaped `<prefix>_<table>_<token>`, lower case ASCII, and clipped to the
/// identifier limit by shortening the table part so the token stays whole.
pub fn staging_table_name(prefix: &str, table: &str, token: Uuid) -> String {
	let suffix = format!("_{}", token.simple());
	let mut head = format!("{}_{}", sanitize(prefix), sanitize(table));
	head.truncate(MAX_IDENTIFIER_LEN - suffix.len());
	head.push_str(&suffix);
	head
}

fn sanitize(name: &str) -> String {
	name.chars()
		.filter(|ch| *ch != '"')
		.map(|ch| match ch {
			'a'..='z' | '0'..='9' | '_' => ch,
			'A'..='Z' => ch.to_ascii_lowercase(),
			_ => '_',
		})
		.collect()
}

fn is_identifier(identifier: &str) -> bool {
	if identifier.len() > MAX_IDENTIFIER_LEN + 2 {
		return false;
	}

	if let Some(quoted) = identifier.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
		return !quoted.is_empty() && !quoted.contains('"') && quoted.len() <= MAX_IDENTIFIER_LEN;
	}

	let mut chars = identifier.chars();
	match chars.next() {
		Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
		_ => return false,
	}

	identifier.len() <= MAX_IDENTIFIER_LEN && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$')
}

fn invalid(identifier: &str) -> Error {
	Error::InvalidIdentifier {
		identifier: identifier.to_string(),
	}
}
