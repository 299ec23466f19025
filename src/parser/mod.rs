//! Parser infrastructure: the single interleaved pass that advances the
//! token stream, mutates the scope frame stack, allocates AST nodes, and
//! unifies types, all at once.
//!
//! The sub-modules mirror the grammar layers of §4 of the language design:
//! [`types`] parses type expressions, [`value`] parses primary expressions
//! and their postfix `[]`/`()`/`<>()` chains, [`expr`] climbs operator
//! precedence over `value`, and [`stmt`] parses declarations, control flow,
//! and blocks, recursing back into `expr` and (for procedure bodies)
//! `value`.

pub mod base;
pub mod expr;
pub mod stmt;
pub mod types;
pub mod value;

use crate::ast::Program;
use crate::diag::{Diag, SourceFile, convert_diagnostics_to_reports};
use crate::lexer::token::{Token, TokenKind};
use crate::lexer::tokenize;
use crate::limits::ParserLimits;
use crate::scope::FrameStack;
use base::TokenStream;
use miette::Report;

/// Shared mutable state threaded through every parsing function: the
/// token cursor, the live scope frame stack, and the program being built.
/// Bundled into one struct so parsing functions take a single `&mut Ctx`
/// instead of three or four separate borrows.
pub struct Ctx<'a> {
    pub stream: TokenStream<'a>,
    pub frames: FrameStack,
    pub program: Program,
    /// Number of `while` bodies currently being parsed, reset to `0` while
    /// parsing a nested procedure literal's body so `continue`/`break`
    /// can never jump across a procedure boundary to an outer loop.
    pub loop_depth: usize,
}

impl<'a> Ctx<'a> {
    fn new(tokens: &'a [Token], limits: ParserLimits) -> Self {
        Ctx {
            stream: TokenStream::new(tokens),
            frames: FrameStack::new(limits),
            program: Program::new(),
            loop_depth: 0,
        }
    }
}

/// Result of parsing a program.
#[derive(Debug)]
pub struct ParseResult {
    /// The parsed, scope-resolved, type-checked program, or `None` if
    /// parsing failed. The parser aborts at the first error (§7 of the
    /// language design: no recovery), so a failure always means a single
    /// diagnostic, not a partial tree.
    pub program: Option<Program>,
    /// Diagnostics from lexing and parsing, rendered as miette reports.
    pub diagnostics: Vec<Report>,
}

/// Builder for a single parse, mirroring this crate's lexer in offering a
/// fluent entry point alongside the plain [`crate::parse`] function.
pub struct Parser<'source> {
    source: &'source str,
    limits: ParserLimits,
}

impl<'source> Parser<'source> {
    /// Creates a parser for `source` with the default resource limits.
    pub fn new(source: &'source str) -> Self {
        Parser {
            source,
            limits: ParserLimits::default(),
        }
    }

    /// Overrides the default resource bounds (frame depth, generic count,
    /// sub-type count) — useful for fuzzing harnesses or sandboxes that
    /// want tighter limits than the language's own defaults.
    pub fn with_limits(mut self, limits: ParserLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Lexes and parses the source, producing a [`ParseResult`].
    pub fn parse(self) -> ParseResult {
        let lex_result = tokenize(self.source);
        let mut diagnostics: Vec<Diag> = lex_result.diagnostics;

        let mut tokens = lex_result.tokens;
        if !matches!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof)) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token::without_text(TokenKind::Eof, end..end));
        }

        let mut ctx = Ctx::new(&tokens, self.limits);
        let program = match stmt::parse_top_level_block(&mut ctx) {
            Ok(body) => {
                ctx.program.body = body;
                Some(ctx.program)
            }
            Err(diag) => {
                diagnostics.push(*diag);
                None
            }
        };

        let source_file = SourceFile::new(self.source);
        let reports = convert_diagnostics_to_reports(&diagnostics, &source_file);

        ParseResult {
            program,
            diagnostics: reports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_program_has_no_statements() {
        let result = Parser::new("").parse();
        let program = result.program.expect("empty input should parse");
        assert!(program.body.statements.is_empty());
        assert_eq!(program.value_count(), 0);
        assert_eq!(program.var_count(), 0);
    }

    #[test]
    fn reports_a_single_diagnostic_on_first_error() {
        let result = Parser::new("long x = ;").parse();
        assert!(result.program.is_none());
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn custom_limits_are_honored() {
        let tight = ParserLimits {
            max_frame_depth: 1,
            ..ParserLimits::default()
        };
        let source = "proc<>() return nothing { proc<>() return nothing {}(); }();";
        let result = Parser::new(source).with_limits(tight).parse();
        assert!(result.program.is_none());
    }
}
