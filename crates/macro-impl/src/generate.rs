// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Token generation helpers for building TokenStreams without external dependencies.

use proc_macro2::{Delimiter, Group, Ident, Literal, Punct, Spacing, Span, TokenStream, TokenTree};

/// Creates an identifier token.
pub fn ident(name: &str) -> TokenTree {
	TokenTree::Ident(Ident::new(name, Span::call_site()))
}

/// Creates an identifier token, handling raw identifiers (r#keyword).
pub fn ident_raw(name: &str) -> TokenTree {
	if let Some(stripped) = name.strip_prefix("r#") {
		TokenTree::Ident(Ident::new_raw(stripped, Span::call_site()))
	} else {
		ident(name)
	}
}

pub fn punct(ch: char) -> TokenTree {
	TokenTree::Punct(Punct::new(ch, Spacing::Alone))
}

/// Creates a punctuation token with Joint spacing (for multi-char punctuation like ::).
pub fn punct_joint(ch: char) -> TokenTree {
	TokenTree::Punct(Punct::new(ch, Spacing::Joint))
}

pub fn literal_str(s: &str) -> TokenTree {
	TokenTree::Literal(Literal::string(s))
}

pub fn group(delimiter: Delimiter, tokens: impl IntoIterator<Item = TokenTree>) -> TokenTree {
	TokenTree::Group(Group::new(delimiter, tokens.into_iter().collect()))
}

/// Creates parentheses group: (tokens)
pub fn parens(tokens: impl IntoIterator<Item = TokenTree>) -> TokenTree {
	group(Delimiter::Parenthesis, tokens)
}

/// Creates brace group: {tokens}
pub fn braces(tokens: impl IntoIterator<Item = TokenTree>) -> TokenTree {
	group(Delimiter::Brace, tokens)
}

/// Emits `::` (path separator).
pub fn path_sep() -> impl Iterator<Item = TokenTree> {
	[punct_joint(':'), punct(':')].into_iter()
}

/// Emits `<crate_path>::<item>`.
///
/// `crate_path` is written the way users spell it in `#[record(crate = "..")]`,
/// e.g. `pgbulk` or `my_app::db`. Paths not starting at `crate`, `self` or
/// `super` are emitted as global paths.
pub fn crate_item(crate_path: &str, item: &str) -> Vec<TokenTree> {
	let mut tokens = Vec::new();
	let segments: Vec<&str> = crate_path.split("::").map(str::trim).filter(|s| !s.is_empty()).collect();

	let relative = matches!(segments.first(), Some(&"crate") | Some(&"self") | Some(&"super"));
	if !relative {
		tokens.extend(path_sep());
	}

	for (i, segment) in segments.iter().enumerate() {
		if i > 0 {
			tokens.extend(path_sep());
		}
		tokens.push(ident(segment));
	}

	tokens.extend(path_sep());
	tokens.push(ident(item));
	tokens
}

/// Emits `->` (return type arrow).
pub fn arrow() -> impl Iterator<Item = TokenTree> {
	[punct_joint('-'), punct('>')].into_iter()
}

/// Emits `<` and `>` around tokens for generics.
pub fn generics(inner: impl IntoIterator<Item = TokenTree>) -> Vec<TokenTree> {
	let mut tokens = vec![punct('<')];
	tokens.extend(inner);
	tokens.push(punct('>'));
	tokens
}

/// Emits `.name(args)`.
pub fn method_call(name: &str, args: impl IntoIterator<Item = TokenTree>) -> Vec<TokenTree> {
	vec![punct('.'), ident(name), parens(args)]
}

/// Creates a compile_error!("message") invocation.
pub fn compile_error(message: &str) -> TokenStream {
	let tokens = vec![ident("compile_error"), punct('!'), parens([literal_str(message)])];
	tokens.into_iter().collect()
}
