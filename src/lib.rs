//! Recursive-descent parser and bidirectional type checker for a small
//! statically typed imperative language.
//!
//! Lexing, parsing, scope resolution, and type checking all happen in a
//! single interleaved pass (§4 of the language design): there is no
//! separate AST-then-typecheck phase. The parser aborts at the first
//! diagnostic rather than attempting error recovery.
//!
//! # Parse
//!
//! ```
//! use staticlang_parser::parse;
//!
//! let source = "long x = 1 + 2; readonly bool done = x == 3;";
//! let result = parse(source);
//! assert!(result.program.is_some());
//! assert!(result.diagnostics.is_empty());
//! ```
//!
//! # Inspect diagnostics
//!
//! ```
//! use staticlang_parser::parse;
//!
//! let result = parse("long x = true;");
//! assert!(result.program.is_none());
//! assert_eq!(result.diagnostics.len(), 1);
//! ```
//!
//! # Override resource limits
//!
//! ```
//! use staticlang_parser::{Parser, ParserLimits};
//!
//! let limits = ParserLimits {
//!     max_frame_depth: 4,
//!     ..ParserLimits::default()
//! };
//! let result = Parser::new("long x = 1;").with_limits(limits).parse();
//! assert!(result.program.is_some());
//! ```

pub mod ast;
pub mod diag;
pub mod lexer;
pub mod limits;
pub mod parser;
pub mod scope;

// Re-export syntax span primitives.
pub use ast::{Span, Spanned};

// Re-export AST types for convenience.
pub use ast::{
    AstValue, AstValueKind, BinaryOperator, CodeBlock, IncludeRequest, Primitive, ProcParam,
    Program, Statement, TypeCheckType, UnaryOperator, VarId, VarInfo,
};

// Re-export diagnostic types for convenience.
pub use diag::{Diag, DiagLabel, DiagSeverity, ErrorKind, LabelRole};

// Re-export lexer types for convenience.
pub use lexer::token::{Token, TokenKind};
pub use lexer::{LexerResult, tokenize};

// Re-export parser types for convenience.
pub use limits::ParserLimits;
pub use parser::{ParseResult, Parser};

/// Parses source text end-to-end (lexing + parsing + type checking).
///
/// This is the recommended API entry point for callers who don't need to
/// override the default resource limits; use [`Parser`] directly for that.
pub fn parse(source: &str) -> ParseResult {
    Parser::new(source).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_accessible() {
        let _span: Span = 0..5;
        let _spanned = Spanned::new(42, 0..5);
    }

    #[test]
    fn parse_reports_a_single_diagnostic_on_first_error() {
        let result = parse("long x = ;");
        assert!(result.program.is_none());
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn parse_succeeds_on_well_typed_source() {
        let result = parse("long x = 1; readonly bool done = x == 1;");
        assert!(result.program.is_some());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn parse_surfaces_lexer_errors_too() {
        let result = parse("long x = @;");
        assert!(result.program.is_none());
        assert!(!result.diagnostics.is_empty());
    }

    #[test]
    fn error_kind_is_reachable_through_diag() {
        let diag = Diag::error(ErrorKind::Undeclared, "'x' is not declared");
        assert_eq!(diag.kind, ErrorKind::Undeclared);
    }
}
