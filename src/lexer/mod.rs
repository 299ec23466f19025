//! Lexical analysis.
//!
//! The lexer is deliberately error-tolerant: a malformed character or
//! unterminated literal produces an `Error` token plus a diagnostic and
//! scanning continues, rather than aborting the whole stream. This is an
//! independent policy from the parser, which still aborts at the first
//! error it sees while consuming that stream.

pub mod token;

use crate::ast::Span;
use crate::diag::{Diag, ErrorKind};
use smol_str::SmolStr;
use token::{Token, TokenKind};

/// Result of lexical analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct LexerResult {
    /// The tokens produced, including a trailing `Eof` token.
    pub tokens: Vec<Token>,
    /// Diagnostics encountered during scanning.
    pub diagnostics: Vec<Diag>,
}

/// Scans `source` into a [`LexerResult`].
pub fn tokenize(source: &str) -> LexerResult {
    Lexer::new(source).tokenize()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
    diagnostics: Vec<Diag>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Lexer {
            source: source.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn tokenize(mut self) -> LexerResult {
        loop {
            self.skip_trivia();
            let start = self.pos;
            let Some(c) = self.peek() else {
                self.tokens
                    .push(Token::without_text(TokenKind::Eof, start..start));
                break;
            };

            if c.is_ascii_alphabetic() || c == b'_' {
                self.scan_identifier_or_keyword(start);
            } else if c.is_ascii_digit() {
                self.scan_number(start);
            } else if c == b'\'' {
                self.scan_char_literal(start);
            } else if c == b'"' {
                self.scan_string_literal(start);
            } else {
                self.scan_operator_or_punctuator(start);
            }
        }

        LexerResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn slice(&self, span: Span) -> &str {
        std::str::from_utf8(&self.source[span]).unwrap_or("")
    }

    fn error(&mut self, span: Span, kind: ErrorKind, message: impl Into<String>) {
        self.diagnostics.push(
            Diag::error(kind, message.into()).with_primary_label(span.clone(), "here"),
        );
        self.tokens.push(Token::without_text(TokenKind::Error, span));
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_whitespace() => {
                    self.pos += 1;
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while !matches!(self.peek(), None | Some(b'\n')) {
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    self.pos += 2;
                    while !(self.peek().is_none()
                        || (self.peek() == Some(b'*') && self.peek_at(1) == Some(b'/')))
                    {
                        self.pos += 1;
                    }
                    if self.peek().is_some() {
                        self.pos += 2;
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_identifier_or_keyword(&mut self, start: usize) {
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'_') {
            self.pos += 1;
        }
        let span = start..self.pos;
        let text = self.slice(span.clone());
        let kind = TokenKind::keyword_from_str(text).unwrap_or(TokenKind::Identifier);
        self.tokens
            .push(Token::new(kind, span, SmolStr::new(text)));
    }

    /// Scans one numeric literal form and returns immediately — unlike a
    /// fallthrough scanner that always re-parses the run as decimal at the
    /// end (clobbering hex/float results), each branch below produces its
    /// token directly.
    fn scan_number(&mut self, start: usize) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }

        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.pos += 1;
            }
            if self.peek() == Some(b'f') {
                self.pos += 1;
            }
            let span = start..self.pos;
            let text = self.slice(span.clone());
            self.tokens
                .push(Token::new(TokenKind::FloatLiteral, span, SmolStr::new(text)));
            return;
        }

        if self.peek() == Some(b'f') {
            self.pos += 1;
            let span = start..self.pos;
            let text = self.slice(span.clone());
            self.tokens
                .push(Token::new(TokenKind::FloatLiteral, span, SmolStr::new(text)));
            return;
        }

        if self.peek() == Some(b'h') {
            self.pos += 1;
            let span = start..self.pos;
            let text = self.slice(span.clone());
            self.tokens
                .push(Token::new(TokenKind::LongLiteral, span, SmolStr::new(text)));
            return;
        }

        let span = start..self.pos;
        let text = self.slice(span.clone());
        self.tokens
            .push(Token::new(TokenKind::LongLiteral, span, SmolStr::new(text)));
    }

    /// Decodes a single escape sequence starting at the current `\`.
    /// Returns the decoded character, or `None` (with a diagnostic already
    /// emitted) on an unknown escape.
    fn scan_escape(&mut self, escape_start: usize) -> Option<char> {
        self.pos += 1; // consume the backslash
        let c = self.advance();
        match c {
            Some(b'n') => Some('\n'),
            Some(b't') => Some('\t'),
            Some(b'r') => Some('\r'),
            Some(b'\\') => Some('\\'),
            Some(b'\'') => Some('\''),
            Some(b'"') => Some('"'),
            Some(b'0') => Some('\0'),
            _ => {
                self.error(
                    escape_start..self.pos,
                    ErrorKind::UnexpectedToken,
                    "unknown escape sequence",
                );
                None
            }
        }
    }

    fn scan_char_literal(&mut self, start: usize) {
        self.pos += 1; // opening quote
        let value = if self.peek() == Some(b'\\') {
            self.scan_escape(self.pos)
        } else {
            let c = self.advance();
            c.map(|byte| byte as char)
        };

        if self.peek() != Some(b'\'') {
            self.error(
                start..self.pos,
                ErrorKind::UnexpectedToken,
                "unterminated char literal",
            );
            return;
        }
        self.pos += 1; // closing quote

        let span = start..self.pos;
        let text = value.map(|c| c.to_string()).unwrap_or_default();
        self.tokens
            .push(Token::new(TokenKind::CharLiteral, span, SmolStr::new(text)));
    }

    fn scan_string_literal(&mut self, start: usize) {
        self.pos += 1; // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    self.error(
                        start..self.pos,
                        ErrorKind::UnexpectedToken,
                        "unterminated string literal",
                    );
                    return;
                }
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    if let Some(c) = self.scan_escape(self.pos) {
                        value.push(c);
                    }
                }
                Some(byte) => {
                    self.pos += 1;
                    value.push(byte as char);
                }
            }
        }

        let span = start..self.pos;
        self.tokens
            .push(Token::new(TokenKind::StringLiteral, span, SmolStr::new(value)));
    }

    fn scan_operator_or_punctuator(&mut self, start: usize) {
        let c = self.advance().expect("peeked Some above");
        let kind = match c {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'#' => TokenKind::Hash,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'*' => {
                if self.peek() == Some(b'*') {
                    self.pos += 1;
                    TokenKind::StarStar
                } else {
                    TokenKind::Star
                }
            }
            b'=' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    TokenKind::EqEq
                } else {
                    TokenKind::Assign
                }
            }
            b'!' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            }
            b'<' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }
            b'>' => {
                if self.peek() == Some(b'=') {
                    self.pos += 1;
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            b'&' if self.peek() == Some(b'&') => {
                self.pos += 1;
                TokenKind::AndAnd
            }
            b'|' if self.peek() == Some(b'|') => {
                self.pos += 1;
                TokenKind::OrOr
            }
            _ => {
                self.error(
                    start..self.pos,
                    ErrorKind::UnexpectedToken,
                    format!("unexpected character '{}'", c as char),
                );
                return;
            }
        };
        self.tokens.push(Token::without_text(kind, start..self.pos));
    }
}
