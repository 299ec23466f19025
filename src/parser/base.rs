//! Shared token-stream navigation used by every parser module.

use crate::ast::Span;
use crate::diag::{Diag, ErrorKind};
use crate::lexer::token::{Token, TokenKind};

/// Common error type for parsing operations.
pub type ParseError = Box<Diag>;

/// Common result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Token stream navigator providing common operations for all parsers.
pub struct TokenStream<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenStream<'a> {
    /// Creates a new token stream from a token slice, which must end with
    /// an `Eof` token.
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Returns the current token. Past the end of the slice, returns the
    /// last token (which is always `Eof`).
    pub fn current(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| self.tokens.last().expect("token stream must be non-empty"))
    }

    /// Returns the next token without consuming the current one.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1)
    }

    /// Advances to the next token. Does nothing at `Eof`.
    pub fn advance(&mut self) {
        if self.pos < self.tokens.len().saturating_sub(1) {
            self.pos += 1;
        }
    }

    /// Checks if the current token matches the given kind.
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Consumes the current token if it matches the given kind.
    pub fn consume(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expects a specific token kind and returns its span, advancing past
    /// it. Returns an `UnexpectedToken` error otherwise.
    pub fn expect(&mut self, kind: TokenKind) -> ParseResult<Span> {
        if self.check(kind) {
            let span = self.current().span.clone();
            self.advance();
            Ok(span)
        } else {
            Err(self.error_here(
                ErrorKind::UnexpectedToken,
                format!("expected {kind}, found {}", self.current().kind),
            ))
        }
    }

    /// Builds a `ParseError` anchored at the current token's span.
    pub fn error_here(&self, kind: ErrorKind, message: impl Into<String>) -> ParseError {
        Box::new(Diag::error(kind, message).with_primary_label(self.current().span.clone(), "here"))
    }

    /// Returns the current position in the token stream, for save/restore
    /// around speculative lookahead.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Restores a previously saved position.
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len().saturating_sub(1));
    }

    /// Returns the span of the previously consumed token.
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span.clone()
        } else {
            self.current().span.clone()
        }
    }
}

/// Merges two spans into a single span covering both.
pub fn merge_spans(start: &Span, end: &Span) -> Span {
    start.start..end.end
}
