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

//! A streaming tokenizer for C-like shader text.
//!
//! The tokenizer does not validate anything. It only splits the text into
//! lexemes and records the layout information (preceding whitespace, crossed
//! line breaks, nesting depth) the rewriter needs to regenerate readable
//! output with the same line structure.

/// Multi-character operators. Anything else is a single-character token.
const PUNCTUATION: [&str; 22] = [
    ">>=", "<<=", "...", "&&", "||", "^^", "==", "!=", "<=", ">=", "+=", "-=", "*=", "/=", "%=",
    "&=", "|=", "^=", "++", "--", "<<", ">>",
];

/// The lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifiers and keywords.
    Name,
    /// Integer and floating-point literals, suffixes included.
    Number,
    /// A double-quoted string, quotes included.
    String,
    /// Operators and separators.
    Punctuation,
    /// `#` or `##`.
    Preprocessor,
}

/// One lexeme with the layout information that preceded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceToken<'a> {
    /// The lexeme, borrowed from the source.
    pub text: &'a str,
    /// Its lexical class.
    pub kind: TokenKind,
    /// Whitespace or a comment separates this token from the previous one.
    pub whitespace_before: bool,
    /// Line breaks between the previous token and this one.
    pub lines_crossed: u32,
    /// Backslash-newline continuations between the previous token and this
    /// one. They join lines logically but still occupy a source line.
    pub continuations: u32,
    /// 1-based line of the token.
    pub line: u32,
    /// Parenthesis nesting outside this token. A `(` and its `)` share a depth.
    pub paren_depth: u32,
    /// Brace nesting outside this token. A `{` and its `}` share a depth.
    pub brace_depth: u32,
}

impl SourceToken<'_> {
    /// `true` if the token is the given punctuation or keyword.
    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }
}

/// Splits a source buffer into [`SourceToken`]s.
///
/// The iterator is lazy, finite and cannot be restarted.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    name: &'a str,
    source: &'a str,
    pos: usize,
    line: u32,
    paren_depth: u32,
    brace_depth: u32,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer over `source`. `name` only appears in diagnostics.
    pub fn new(name: &'a str, source: &'a str) -> Self {
        Self {
            name,
            source,
            pos: 0,
            line: 1,
            paren_depth: 0,
            brace_depth: 0,
        }
    }

    /// The diagnostic name given at construction.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The current 1-based line.
    pub fn line(&self) -> u32 {
        self.line
    }

    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + offset).copied()
    }

    /// Skips whitespace and comments. Returns whether anything was skipped,
    /// how many line breaks were crossed and how many continuations.
    fn skip_whitespace(&mut self) -> (bool, u32, u32) {
        let start = self.pos;
        let mut lines = 0;
        let mut continuations = 0;
        while let Some(byte) = self.peek_byte(0) {
            match byte {
                b'\n' => {
                    lines += 1;
                    self.line += 1;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' | 0x0b | 0x0c => self.pos += 1,
                b'\\' if self.peek_byte(1) == Some(b'\n') => {
                    // Line continuation: the logical line goes on.
                    continuations += 1;
                    self.line += 1;
                    self.pos += 2;
                }
                b'\\' if self.peek_byte(1) == Some(b'\r') && self.peek_byte(2) == Some(b'\n') => {
                    continuations += 1;
                    self.line += 1;
                    self.pos += 3;
                }
                b'/' if self.peek_byte(1) == Some(b'/') => {
                    while let Some(byte) = self.peek_byte(0) {
                        if byte == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                b'/' if self.peek_byte(1) == Some(b'*') => {
                    self.pos += 2;
                    loop {
                        match self.peek_byte(0) {
                            None => break,
                            Some(b'*') if self.peek_byte(1) == Some(b'/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(b'\n') => {
                                lines += 1;
                                self.line += 1;
                                self.pos += 1;
                            }
                            Some(_) => self.pos += 1,
                        }
                    }
                }
                _ => break,
            }
        }
        (self.pos > start, lines, continuations)
    }

    fn scan_name(&mut self) {
        while let Some(byte) = self.peek_byte(0) {
            if byte.is_ascii_alphanumeric() || byte == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn scan_number(&mut self) {
        let mut previous = 0u8;
        while let Some(byte) = self.peek_byte(0) {
            let exponent_sign =
                (byte == b'+' || byte == b'-') && (previous == b'e' || previous == b'E');
            if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'.' || exponent_sign {
                previous = byte;
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn scan_string(&mut self) {
        self.pos += 1;
        while let Some(byte) = self.peek_byte(0) {
            self.pos += 1;
            match byte {
                b'\\' => {
                    let rest = &self.source[self.pos.min(self.source.len())..];
                    self.pos += rest.chars().next().map_or(0, char::len_utf8);
                }
                b'"' => break,
                b'\n' => {
                    self.line += 1;
                }
                _ => {}
            }
        }
        self.pos = self.pos.min(self.source.len());
    }

    fn scan_punctuation(&mut self) {
        let rest = &self.source[self.pos..];
        if let Some(op) = PUNCTUATION
            .iter()
            .filter(|op| rest.starts_with(**op))
            .max_by_key(|op| op.len())
        {
            self.pos += op.len();
            return;
        }
        // Single character, kept on a char boundary for non-ASCII input.
        let width = rest.chars().next().map_or(1, char::len_utf8);
        self.pos += width;
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = SourceToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (whitespace_before, lines_crossed, continuations) = self.skip_whitespace();
        let first = self.peek_byte(0)?;
        let start = self.pos;
        let line = self.line;

        let kind = if first.is_ascii_alphabetic() || first == b'_' {
            self.scan_name();
            TokenKind::Name
        } else if first.is_ascii_digit()
            || (first == b'.' && self.peek_byte(1).is_some_and(|b| b.is_ascii_digit()))
        {
            self.scan_number();
            TokenKind::Number
        } else if first == b'"' {
            self.scan_string();
            TokenKind::String
        } else if first == b'#' {
            self.pos += if self.peek_byte(1) == Some(b'#') { 2 } else { 1 };
            TokenKind::Preprocessor
        } else {
            self.scan_punctuation();
            TokenKind::Punctuation
        };

        let text = &self.source[start..self.pos];

        match text {
            ")" => self.paren_depth = self.paren_depth.saturating_sub(1),
            "}" => self.brace_depth = self.brace_depth.saturating_sub(1),
            _ => {}
        }
        let token = SourceToken {
            text,
            kind,
            whitespace_before,
            lines_crossed,
            continuations,
            line,
            paren_depth: self.paren_depth,
            brace_depth: self.brace_depth,
        };
        match text {
            "(" => self.paren_depth += 1,
            "{" => self.brace_depth += 1,
            _ => {}
        }

        Some(token)
    }
}
