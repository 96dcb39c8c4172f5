// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Implementation for pgbulk derive macros.
//!
//! This crate provides the implementation logic used by proc-macro crates.
//! It's not intended for direct use - use `pgbulk-derive` instead.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod generate;
pub mod parse;
pub mod record;

use proc_macro2::TokenStream;

/// Derive `Record` with the default crate path (pgbulk).
pub fn derive_record(input: TokenStream) -> TokenStream {
	derive_record_with_crate(input, "pgbulk")
}

/// Derive `Record` with a custom crate path.
///
/// # Arguments
/// * `input` - The derive macro input TokenStream
/// * `crate_path` - The crate path used unless the struct sets `#[record(crate = "..")]`
pub fn derive_record_with_crate(input: TokenStream, crate_path: &str) -> TokenStream {
	match parse::parse_struct_with_crate(input, crate_path) {
		Ok(parsed) => record::expand(parsed),
		Err(err) => err,
	}
}
