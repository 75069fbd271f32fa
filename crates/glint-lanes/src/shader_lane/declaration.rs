// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Interface extraction: parsing of top-level `in`/`out` declarations.
//!
//! A declaration has the form
//! `in [precision] type name[array] [: SEMANTIC];`. The parser consumes it up
//! to and including the terminating `;` and resolves the semantic against the
//! fixed table. Malformed declarations are reported and skipped; they never
//! abort the rewrite.

use super::tokenizer::{SourceToken, TokenKind};
use glint_core::renderer::api::{semantic_location, InterfaceSlot, ShaderStage};
use std::iter::Peekable;

const PRECISION_QUALIFIERS: [&str; 3] = ["lowp", "mediump", "highp"];

/// A recovered problem in a shader's interface declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationDiagnostic {
    /// The stage whose source holds the declaration.
    pub stage: ShaderStage,
    /// 1-based source line.
    pub line: u32,
    /// Human-readable description.
    pub message: String,
}

/// Collects declaration diagnostics for one stage and logs each one.
#[derive(Debug)]
pub(crate) struct DiagnosticSink<'n> {
    name: &'n str,
    stage: ShaderStage,
    pub(crate) entries: Vec<DeclarationDiagnostic>,
}

impl<'n> DiagnosticSink<'n> {
    pub(crate) fn new(name: &'n str, stage: ShaderStage) -> Self {
        Self {
            name,
            stage,
            entries: Vec::new(),
        }
    }

    pub(crate) fn warn(&mut self, line: u32, message: String) {
        log::warn!(
            "DialectRewriter: '{}' {} line {}: {}",
            self.name,
            self.stage,
            line,
            message
        );
        self.entries.push(DeclarationDiagnostic {
            stage: self.stage,
            line,
            message,
        });
    }
}

/// Parses the remainder of a declaration whose `in`/`out` keyword (at
/// `keyword_line`) was already consumed.
///
/// `has_semantic` is `true` for the declarations that carry a location
/// (vertex inputs and fragment outputs). Returns `None` when the declaration
/// has no usable type or name.
pub(crate) fn parse_declaration<'a, I>(
    tokens: &mut Peekable<I>,
    keyword_line: u32,
    has_semantic: bool,
    sink: &mut DiagnosticSink<'_>,
) -> Option<InterfaceSlot>
where
    I: Iterator<Item = SourceToken<'a>>,
{
    let Some(ty) = parse_type(tokens, keyword_line, sink) else {
        skip_statement(tokens);
        return None;
    };

    let name = match tokens.next() {
        Some(token) if token.kind == TokenKind::Name => token.text.to_string(),
        Some(token) => {
            sink.warn(
                token.line,
                format!("expected a name after '{ty}', found '{}'", token.text),
            );
            if !token.is(";") {
                skip_statement(tokens);
            }
            return None;
        }
        None => {
            sink.warn(keyword_line, format!("declaration of '{ty}' ends without a name"));
            return None;
        }
    };

    let array_suffix = parse_array_suffix(tokens);

    let mut location = None;
    let mut terminated = false;
    if has_semantic {
        match tokens.next() {
            Some(colon) if colon.is(":") => match tokens.next() {
                Some(semantic) if semantic.kind == TokenKind::Name => {
                    location = semantic_location(semantic.text);
                    if location.is_none() {
                        sink.warn(
                            semantic.line,
                            format!("unknown semantic '{}' for '{name}'", semantic.text),
                        );
                    }
                }
                Some(other) => {
                    terminated = other.is(";");
                    sink.warn(other.line, format!("missing semantic for '{name}'"));
                }
                None => sink.warn(colon.line, format!("missing semantic for '{name}'")),
            },
            Some(other) => {
                terminated = other.is(";");
                sink.warn(other.line, format!("no semantic given for '{name}'"));
            }
            None => sink.warn(keyword_line, format!("no semantic given for '{name}'")),
        }
    }

    if !terminated {
        skip_statement(tokens);
    }

    Some(InterfaceSlot {
        ty,
        name,
        location,
        array_suffix,
    })
}

/// Reads the type, folding a leading precision qualifier into it.
fn parse_type<'a, I>(
    tokens: &mut Peekable<I>,
    keyword_line: u32,
    sink: &mut DiagnosticSink<'_>,
) -> Option<String>
where
    I: Iterator<Item = SourceToken<'a>>,
{
    let first = tokens.next_if(|token| token.kind == TokenKind::Name);
    let Some(first) = first else {
        let line = tokens.peek().map_or(keyword_line, |token| token.line);
        sink.warn(line, "expected a type in interface declaration".to_string());
        return None;
    };

    if !PRECISION_QUALIFIERS.contains(&first.text) {
        return Some(first.text.to_string());
    }
    match tokens.next_if(|token| token.kind == TokenKind::Name) {
        Some(ty) => Some(format!("{} {}", first.text, ty.text)),
        None => {
            sink.warn(
                first.line,
                format!("expected a type after '{}'", first.text),
            );
            None
        }
    }
}

/// Collects `[N]` (or `[]`) verbatim.
fn parse_array_suffix<'a, I>(tokens: &mut Peekable<I>) -> String
where
    I: Iterator<Item = SourceToken<'a>>,
{
    let mut suffix = String::new();
    if tokens.next_if(|token| token.is("[")).is_none() {
        return suffix;
    }
    suffix.push('[');
    for token in tokens.by_ref() {
        suffix.push_str(token.text);
        if token.is("]") {
            break;
        }
    }
    suffix
}

/// Consumes tokens up to and including the next `;`.
pub(crate) fn skip_statement<'a, I>(tokens: &mut Peekable<I>)
where
    I: Iterator<Item = SourceToken<'a>>,
{
    for token in tokens.by_ref() {
        if token.is(";") {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader_lane::tokenizer::Tokenizer;

    fn parse(source: &str, has_semantic: bool) -> (Option<InterfaceSlot>, Vec<String>, Vec<&str>) {
        let mut tokens = Tokenizer::new("test", source).peekable();
        let mut sink = DiagnosticSink::new("test", ShaderStage::Vertex);
        let slot = parse_declaration(&mut tokens, 1, has_semantic, &mut sink);
        let rest = tokens.map(|t| t.text).collect();
        let messages = sink.entries.into_iter().map(|d| d.message).collect();
        (slot, messages, rest)
    }

    #[test]
    fn resolves_semantic() {
        let (slot, diagnostics, rest) = parse("vec3 position : POSITION; next", true);
        let slot = slot.expect("declaration should parse");
        assert_eq!(slot.ty, "vec3");
        assert_eq!(slot.name, "position");
        assert_eq!(slot.location, Some(0));
        assert!(diagnostics.is_empty());
        assert_eq!(rest, vec!["next"]);
    }

    #[test]
    fn precision_is_part_of_the_type() {
        let (slot, _, _) = parse("highp vec4 color : FRAG_COLOR;", true);
        assert_eq!(slot.expect("parsed").ty, "highp vec4");
    }

    #[test]
    fn array_suffix_is_kept() {
        let (slot, _, _) = parse("vec4 colors[2] : FRAG_COLOR0;", true);
        let slot = slot.expect("parsed");
        assert_eq!(slot.name, "colors");
        assert_eq!(slot.array_suffix, "[2]");
        assert!(slot.is_array());
        assert_eq!(slot.location, Some(1));
    }

    #[test]
    fn missing_semantic_is_recovered() {
        let (slot, diagnostics, rest) = parse("vec4 color : ; tail", true);
        let slot = slot.expect("parsed");
        assert_eq!(slot.location, None);
        assert_eq!(slot.raw_location(), -1);
        assert_eq!(diagnostics, vec!["missing semantic for 'color'"]);
        assert_eq!(rest, vec!["tail"]);
    }

    #[test]
    fn unknown_semantic_is_recovered() {
        let (slot, diagnostics, _) = parse("vec4 color : COLOUR;", true);
        assert_eq!(slot.expect("parsed").location, None);
        assert_eq!(diagnostics, vec!["unknown semantic 'COLOUR' for 'color'"]);
    }

    #[test]
    fn semantic_ignored_where_not_expected() {
        let (slot, diagnostics, rest) = parse("vec2 uv : TEXCOORD0; tail", false);
        let slot = slot.expect("parsed");
        assert_eq!(slot.location, None);
        assert!(diagnostics.is_empty());
        assert_eq!(rest, vec!["tail"]);
    }

    #[test]
    fn missing_name_skips_the_statement() {
        let (slot, diagnostics, rest) = parse("vec4 ; tail", true);
        assert!(slot.is_none());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(rest, vec!["tail"]);
    }
}
