// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Code generation for `#[derive(Record)]`.
//!
//! ```ignore
//! impl ::pgbulk::Record for Person {
//!     fn schema() -> ::pgbulk::RecordSchema<Self> {
//!         ::pgbulk::RecordSchema::new()
//!             .table("people")
//!             .field(::pgbulk::Field::<Self>::new::<String>("name", |record: &Self| &record.name).distinct())
//!             .ignore("cache")
//!     }
//! }
//! ```

use proc_macro2::{TokenStream, TokenTree};

use crate::{
	generate::{arrow, braces, crate_item, generics, ident, ident_raw, literal_str, method_call, parens, path_sep, punct},
	parse::{ParsedField, ParsedStruct},
};

pub fn expand(parsed: ParsedStruct) -> TokenStream {
	let krate = parsed.crate_path.as_str();
	let mut body = crate_item(krate, "RecordSchema");
	body.extend(path_sep());
	body.push(ident("new"));
	body.push(parens([]));

	if let Some(table) = &parsed.table {
		body.extend(method_call("table", [literal_str(table)]));
	}

	for field in &parsed.fields {
		if field.skip {
			body.extend(method_call("ignore", [literal_str(field.name())]));
		} else {
			body.extend(method_call("field", field_expr(krate, field)));
		}
	}

	let mut tokens: Vec<TokenTree> = vec![ident("impl")];
	tokens.extend(crate_item(krate, "Record"));
	tokens.push(ident("for"));
	tokens.push(ident(&parsed.name));

	let mut schema_fn = vec![ident("fn"), ident("schema"), parens([])];
	schema_fn.extend(arrow());
	schema_fn.extend(crate_item(krate, "RecordSchema"));
	schema_fn.extend(generics([ident("Self")]));
	schema_fn.push(braces(body));

	tokens.push(braces(schema_fn));
	tokens.into_iter().collect()
}

/// `Field::<Self>::new::<Ty>("name", |record: &Self| &record.name)` plus
/// the column and distinct settings.
fn field_expr(krate: &str, field: &ParsedField) -> Vec<TokenTree> {
	let mut tokens = crate_item(krate, "Field");
	tokens.extend(path_sep());
	tokens.extend(generics([ident("Self")]));
	tokens.extend(path_sep());
	tokens.push(ident("new"));
	tokens.extend(path_sep());
	tokens.extend(generics(field.ty.clone()));

	let mut args = vec![literal_str(field.name()), punct(',')];
	args.extend([punct('|'), ident("record"), punct(':'), punct('&'), ident("Self"), punct('|')]);
	args.extend([punct('&'), ident("record"), punct('.'), ident_raw(&field.ident)]);
	tokens.push(parens(args));

	if let Some(column) = &field.column {
		tokens.extend(method_call("column", [literal_str(column)]));
	}
	if field.distinct {
		tokens.extend(method_call("distinct", []));
	}
	tokens
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parse::parse_struct_with_crate;

	fn expand_source(source: &str) -> String {
		let parsed = parse_struct_with_crate(source.parse().unwrap(), "pgbulk").unwrap();
		expand(parsed).to_string()
	}

	#[test]
	fn test_expand_fields() {
		let code = expand_source(
			r#"
			#[record(table = "people")]
			struct Person {
				#[record(distinct)]
				name: String,
				#[record(column = "age_years")]
				age: i32,
				#[record(skip)]
				cache: Vec<u8>,
			}
			"#,
		);

		assert!(code.starts_with("impl :: pgbulk :: Record for Person"));
		assert!(code.contains(". table (\"people\")"));
		assert!(code.contains("\"name\" , | record : & Self | & record . name"));
		assert!(code.contains(". distinct ()"));
		assert!(code.contains(". column (\"age_years\")"));
		assert!(code.contains(". ignore (\"cache\")"));
		assert!(!code.contains("\"cache\" ,"));
	}

	#[test]
	fn test_expand_crate_override() {
		let code = expand_source("#[record(crate = \"pgbulk_core\")] struct Order { id: i64 }");
		assert!(code.starts_with("impl :: pgbulk_core :: Record for Order"));
		assert!(code.contains(":: pgbulk_core :: Field :: < Self > :: new :: < i64 >"));
	}

	#[test]
	fn test_expand_raw_field() {
		let code = expand_source("struct Item { r#type: String }");
		assert!(code.contains("\"type\""));
		assert!(code.contains("record . r#type"));
	}
}
