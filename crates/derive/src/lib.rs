// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! `#[derive(Record)]` for pgbulk.
//!
//! ```ignore
//! #[derive(Record)]
//! #[record(table = "people")]
//! struct Person {
//!     #[record(distinct)]
//!     name: String,
//!     #[record(column = "age_years")]
//!     age: i32,
//!     email: Option<String>,
//!     #[record(skip)]
//!     cache: Vec<u8>,
//! }
//! ```
//!
//! The generated impl refers to `::pgbulk`; crates depending on
//! `pgbulk-core` directly set `#[record(crate = "pgbulk_core")]`.

#![cfg_attr(not(debug_assertions), deny(warnings))]

use proc_macro::TokenStream;

#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
	pgbulk_macro_impl::derive_record(input.into()).into()
}
