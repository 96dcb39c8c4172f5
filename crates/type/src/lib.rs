// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Values and column types moved through the binary copy protocol.
//!
//! Record fields are read into [`Value`]s, every column carries a [`Type`]
//! which decides its PostgreSQL wire representation.

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod value;

pub use value::{
	GetType, ToValue, Type, Value,
	postgres::{DecodeError, decode},
};
