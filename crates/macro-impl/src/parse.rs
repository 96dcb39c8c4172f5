// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Struct parsing for `#[derive(Record)]`, on plain token trees.

use proc_macro2::{Delimiter, TokenStream, TokenTree};

use crate::generate::compile_error;

/// A struct with named fields and its `#[record(..)]` configuration.
#[derive(Debug)]
pub struct ParsedStruct {
	pub name: String,
	pub crate_path: String,
	pub table: Option<String>,
	pub fields: Vec<ParsedField>,
}

#[derive(Debug)]
pub struct ParsedField {
	/// Identifier as written, `r#` prefix included.
	pub ident: String,
	pub ty: TokenStream,
	pub column: Option<String>,
	pub distinct: bool,
	pub skip: bool,
}

impl ParsedField {
	/// Field name without the raw identifier prefix.
	pub fn name(&self) -> &str {
		self.ident.strip_prefix("r#").unwrap_or(&self.ident)
	}
}

/// One `key` or `key = "value"` entry of a `#[record(..)]` attribute.
#[derive(Debug, PartialEq)]
struct Setting {
	key: String,
	value: Option<String>,
}

pub fn parse_struct_with_crate(input: TokenStream, default_crate: &str) -> Result<ParsedStruct, TokenStream> {
	let tokens: Vec<TokenTree> = input.into_iter().collect();
	let mut pos = 0;

	let mut crate_path = default_crate.to_string();
	let mut table = None;

	for setting in take_attributes(&tokens, &mut pos)? {
		match (setting.key.as_str(), setting.value) {
			("table", Some(value)) => table = Some(value),
			("crate", Some(value)) => crate_path = value,
			(key, _) => return Err(error(&format!("unknown struct attribute `{key}`, expected `table` or `crate`"))),
		}
	}

	skip_visibility(&tokens, &mut pos);

	match tokens.get(pos) {
		Some(TokenTree::Ident(ident)) if ident == "struct" => pos += 1,
		_ => return Err(error("Record can only be derived for structs")),
	}

	let name = match tokens.get(pos) {
		Some(TokenTree::Ident(ident)) => ident.to_string(),
		_ => return Err(error("expected struct name")),
	};
	pos += 1;

	match tokens.get(pos) {
		Some(TokenTree::Group(group)) if group.delimiter() == Delimiter::Brace => {
			let fields = parse_fields(group.stream())?;
			Ok(ParsedStruct {
				name,
				crate_path,
				table,
				fields,
			})
		}
		Some(TokenTree::Punct(punct)) if punct.as_char() == '<' => {
			Err(error("Record cannot be derived for generic structs"))
		}
		_ => Err(error("Record requires a struct with named fields")),
	}
}

fn parse_fields(input: TokenStream) -> Result<Vec<ParsedField>, TokenStream> {
	let tokens: Vec<TokenTree> = input.into_iter().collect();
	let mut pos = 0;
	let mut fields = Vec::new();

	while pos < tokens.len() {
		let mut column = None;
		let mut distinct = false;
		let mut skip = false;

		for setting in take_attributes(&tokens, &mut pos)? {
			match (setting.key.as_str(), setting.value) {
				("column", Some(value)) => column = Some(value),
				("distinct", None) => distinct = true,
				("skip", None) => skip = true,
				(key, _) => {
					return Err(error(&format!(
						"unknown field attribute `{key}`, expected `column = \"..\"`, `distinct` or `skip`"
					)));
				}
			}
		}

		skip_visibility(&tokens, &mut pos);

		let ident = match tokens.get(pos) {
			Some(TokenTree::Ident(ident)) => ident.to_string(),
			_ => return Err(error("expected field name")),
		};
		pos += 1;

		match tokens.get(pos) {
			Some(TokenTree::Punct(punct)) if punct.as_char() == ':' => pos += 1,
			_ => return Err(error("expected `:` after field name")),
		}

		let ty = take_type(&tokens, &mut pos);
		if ty.is_empty() {
			return Err(error(&format!("missing type for field `{ident}`")));
		}

		if skip && distinct {
			return Err(error(&format!("field `{ident}` cannot be both `skip` and `distinct`")));
		}
		if skip && column.is_some() {
			return Err(error(&format!("field `{ident}` cannot be both `skip` and renamed")));
		}

		fields.push(ParsedField {
			ident,
			ty,
			column,
			distinct,
			skip,
		});
	}

	Ok(fields)
}

/// Consumes leading `#[..]` attributes, returning the settings of the
/// `record` ones. Other attributes (docs, other derives) are skipped.
fn take_attributes(tokens: &[TokenTree], pos: &mut usize) -> Result<Vec<Setting>, TokenStream> {
	let mut settings = Vec::new();

	while let Some(TokenTree::Punct(punct)) = tokens.get(*pos) {
		if punct.as_char() != '#' {
			break;
		}
		let Some(TokenTree::Group(group)) = tokens.get(*pos + 1) else {
			break;
		};
		*pos += 2;

		let inner: Vec<TokenTree> = group.stream().into_iter().collect();
		match inner.as_slice() {
			[TokenTree::Ident(ident), TokenTree::Group(args)]
				if ident == "record" && args.delimiter() == Delimiter::Parenthesis =>
			{
				settings.extend(parse_settings(args.stream())?);
			}
			_ => {}
		}
	}

	Ok(settings)
}

fn parse_settings(input: TokenStream) -> Result<Vec<Setting>, TokenStream> {
	let tokens: Vec<TokenTree> = input.into_iter().collect();
	let mut settings = Vec::new();

	for entry in tokens.split(|tt| matches!(tt, TokenTree::Punct(p) if p.as_char() == ',')) {
		match entry {
			[] => {}
			[key] => settings.push(Setting {
				key: setting_key(key)?,
				value: None,
			}),
			[key, TokenTree::Punct(eq), TokenTree::Literal(lit)] if eq.as_char() == '=' => {
				settings.push(Setting {
					key: setting_key(key)?,
					value: Some(unquote(&lit.to_string())?),
				});
			}
			_ => return Err(error("malformed #[record(..)] attribute")),
		}
	}

	Ok(settings)
}

fn setting_key(token: &TokenTree) -> Result<String, TokenStream> {
	match token {
		TokenTree::Ident(ident) => Ok(ident.to_string()),
		_ => Err(error("malformed #[record(..)] attribute")),
	}
}

fn unquote(literal: &str) -> Result<String, TokenStream> {
	literal
		.strip_prefix('"')
		.and_then(|s| s.strip_suffix('"'))
		.map(|s| s.replace("\\\"", "\""))
		.ok_or_else(|| error("#[record(..)] values must be string literals"))
}

fn skip_visibility(tokens: &[TokenTree], pos: &mut usize) {
	if let Some(TokenTree::Ident(ident)) = tokens.get(*pos) {
		if ident == "pub" {
			*pos += 1;
			if let Some(TokenTree::Group(group)) = tokens.get(*pos) {
				if group.delimiter() == Delimiter::Parenthesis {
					*pos += 1;
				}
			}
		}
	}
}

/// Consumes a field type up to the next comma outside angle brackets.
fn take_type(tokens: &[TokenTree], pos: &mut usize) -> TokenStream {
	let mut depth = 0usize;
	let mut ty = Vec::new();

	while let Some(token) = tokens.get(*pos) {
		*pos += 1;
		if let TokenTree::Punct(punct) = token {
			match punct.as_char() {
				'<' => depth += 1,
				// `->` in fn pointer types closes nothing
				'>' if !matches!(ty.last(), Some(TokenTree::Punct(p)) if p.as_char() == '-') => {
					depth = depth.saturating_sub(1)
				}
				',' if depth == 0 => break,
				_ => {}
			}
		}
		ty.push(token.clone());
	}

	ty.into_iter().collect()
}

fn error(message: &str) -> TokenStream {
	compile_error(message)
}
