//! Statements and blocks (§4.2, §4.6, §4.7, §4.9): variable declarations,
//! control flow, and the `{ ... }` grouping construct, closing the loop
//! back to [`crate::parser::expr::parse_expr`] for conditions and
//! initializers and to [`crate::parser::value`] for procedure bodies.

use smol_str::SmolStr;

use crate::ast::program::{CodeBlock, IncludeRequest, Statement};
use crate::ast::TypeCheckType;
use crate::diag::{Diag, ErrorKind};
use crate::lexer::token::TokenKind;
use crate::parser::base::ParseResult;
use crate::parser::value;
use crate::parser::{expr, types, Ctx};

/// Parses the whole program: a flat statement list up to end-of-input,
/// with no enclosing braces and no new frame (the caller starts with an
/// empty frame stack, so declarations land directly in the global table).
pub fn parse_top_level_block(ctx: &mut Ctx) -> ParseResult<CodeBlock> {
    let statements = parse_statements_until(ctx, TokenKind::Eof)?;
    Ok(CodeBlock::new(statements))
}

/// Parses a brace-delimited block, in its own scope frame. Used for `if`/
/// `while` bodies and for a procedure literal's body — the latter nests a
/// block frame inside the procedure's own root frame, so body-local
/// declarations can shadow parameters without colliding with them (§4.2).
pub fn parse_block(ctx: &mut Ctx) -> ParseResult<CodeBlock> {
    ctx.stream.expect(TokenKind::LBrace)?;
    push_block_frame(ctx)?;
    let statements = parse_statements_until(ctx, TokenKind::RBrace);
    ctx.frames.pop_frame();
    let statements = statements?;
    ctx.stream.expect(TokenKind::RBrace)?;
    Ok(CodeBlock::new(statements))
}

fn push_block_frame(ctx: &mut Ctx) -> ParseResult<()> {
    ctx.frames.push_block_frame().map_err(|e| scope_error(ctx, e))
}

fn scope_error(ctx: &Ctx, err: crate::scope::ScopeError) -> Box<Diag> {
    let message = match err {
        crate::scope::ScopeError::Redeclaration => "name is already declared in this scope",
        crate::scope::ScopeError::FrameDepthExceeded => "procedure nesting is too deep",
        crate::scope::ScopeError::TooManyGenerics => "too many generic type parameters",
    };
    ctx.stream.error_here(err.into(), message)
}

fn parse_statements_until(ctx: &mut Ctx, stop: TokenKind) -> ParseResult<Vec<Statement>> {
    let mut statements = Vec::new();
    while ctx.stream.current().kind != stop {
        statements.push(parse_statement(ctx)?);
    }
    Ok(statements)
}

fn parse_statement(ctx: &mut Ctx) -> ParseResult<Statement> {
    match ctx.stream.current().kind {
        TokenKind::If => parse_if(ctx),
        TokenKind::While => parse_while(ctx),
        TokenKind::Continue => parse_continue(ctx),
        TokenKind::Break => parse_break(ctx),
        TokenKind::Return => parse_return(ctx),
        TokenKind::Include => parse_include(ctx),
        _ if looks_like_decl_start(ctx) => parse_declaration(ctx),
        _ => parse_expr_statement(ctx),
    }
}

/// Looks ahead to tell a variable declaration apart from an expression
/// statement, without consuming anything.
///
/// Every built-in type keyword and `global`/`readonly` unambiguously start
/// a declaration. A bare identifier starts one only when it names a
/// generic type parameter *and* is itself followed by another identifier
/// (`T x`, not a lone read of `T`-as-a-value, which isn't even legal here
/// since generics name types, not variables). `proc` is genuinely
/// ambiguous — `proc<long, long>` (a type) and `proc<long>(long x) ...`
/// (a literal value) both start the same way — so it's resolved by
/// speculatively parsing a type and checking what follows it.
fn looks_like_decl_start(ctx: &mut Ctx) -> bool {
    match ctx.stream.current().kind {
        TokenKind::Global
        | TokenKind::Readonly
        | TokenKind::Bool
        | TokenKind::Char
        | TokenKind::Long
        | TokenKind::Float
        | TokenKind::Array
        | TokenKind::Auto => true,
        TokenKind::Identifier => {
            let name = ctx.stream.current().text.clone();
            ctx.frames.find_generic(&name).is_some()
                && matches!(ctx.stream.peek().map(|t| t.kind), Some(TokenKind::Identifier))
        }
        TokenKind::Proc => {
            let save = ctx.stream.position();
            let is_decl = types::parse_type(&mut ctx.stream, &ctx.frames, true, false)
                .map(|_| ctx.stream.check(TokenKind::Identifier))
                .unwrap_or(false);
            ctx.stream.set_position(save);
            is_decl
        }
        _ => false,
    }
}

/// `['global'] ['readonly'] type name '=' expr ';'`. Always carries an
/// initializer — an uninitialized `auto` declaration would have nothing
/// to concretize its type from.
fn parse_declaration(ctx: &mut Ctx) -> ParseResult<Statement> {
    let global_span = ctx.stream.current().span.clone();
    let is_global = ctx.stream.consume(TokenKind::Global);
    if is_global && ctx.frames.return_type().is_some() {
        return Err(Box::new(
            Diag::error(ErrorKind::TypeNotAllowed, "'global' is only allowed at the top level")
                .with_primary_label(global_span, "here"),
        ));
    }
    let is_readonly = ctx.stream.consume(TokenKind::Readonly);

    let declared_type = types::parse_type(&mut ctx.stream, &ctx.frames, true, false)?;
    let name = value::expect_identifier(ctx)?;
    ctx.stream.expect(TokenKind::Assign)?;
    let init = expr::parse_expr(ctx, &declared_type)?;
    let final_type = if matches!(declared_type, TypeCheckType::Auto) {
        init.type_.clone()
    } else {
        declared_type
    };
    ctx.stream.expect(TokenKind::Semicolon)?;

    let stored_as_global = is_global || ctx.frames.is_top_level();
    let var = ctx.program.declare_var(final_type, stored_as_global, is_readonly);
    value::declare(ctx, name, var, is_global)?;
    Ok(Statement::DeclVar { var, init: Some(init) })
}

fn parse_if(ctx: &mut Ctx) -> ParseResult<Statement> {
    ctx.stream.expect(TokenKind::If)?;
    ctx.stream.expect(TokenKind::LParen)?;
    let cond = expr::parse_expr(ctx, &TypeCheckType::Bool)?;
    ctx.stream.expect(TokenKind::RParen)?;
    let then_branch = parse_block(ctx)?;
    let else_branch = if ctx.stream.consume(TokenKind::Else) {
        Some(parse_block(ctx)?)
    } else {
        None
    };
    Ok(Statement::If {
        cond,
        then_branch,
        else_branch,
    })
}

fn parse_while(ctx: &mut Ctx) -> ParseResult<Statement> {
    ctx.stream.expect(TokenKind::While)?;
    ctx.stream.expect(TokenKind::LParen)?;
    let cond = expr::parse_expr(ctx, &TypeCheckType::Bool)?;
    ctx.stream.expect(TokenKind::RParen)?;
    ctx.loop_depth += 1;
    let body_result = parse_block(ctx);
    ctx.loop_depth -= 1;
    let body = body_result?;
    Ok(Statement::While { cond, body })
}

fn parse_continue(ctx: &mut Ctx) -> ParseResult<Statement> {
    let span = ctx.stream.current().span.clone();
    ctx.stream.expect(TokenKind::Continue)?;
    if ctx.loop_depth == 0 {
        return Err(Box::new(
            Diag::error(ErrorKind::CannotContinue, "'continue' outside a loop")
                .with_primary_label(span, "here"),
        ));
    }
    ctx.stream.expect(TokenKind::Semicolon)?;
    Ok(Statement::Continue)
}

fn parse_break(ctx: &mut Ctx) -> ParseResult<Statement> {
    let span = ctx.stream.current().span.clone();
    ctx.stream.expect(TokenKind::Break)?;
    if ctx.loop_depth == 0 {
        return Err(Box::new(
            Diag::error(ErrorKind::CannotBreak, "'break' outside a loop").with_primary_label(span, "here"),
        ));
    }
    ctx.stream.expect(TokenKind::Semicolon)?;
    Ok(Statement::Break)
}

/// `'return' [expr] ';'`. The enclosing procedure's return type must
/// already be known (it's set right after the signature is parsed, before
/// the body — see `value::parse_proc_literal`); if that type is still
/// `auto`, this is the statement that concretizes it (§9).
fn parse_return(ctx: &mut Ctx) -> ParseResult<Statement> {
    let span = ctx.stream.current().span.clone();
    ctx.stream.expect(TokenKind::Return)?;

    let Some(declared_return) = ctx.frames.return_type() else {
        return Err(Box::new(
            Diag::error(ErrorKind::CannotReturn, "'return' outside a procedure")
                .with_primary_label(span, "here"),
        ));
    };

    if ctx.stream.check(TokenKind::Semicolon) {
        match declared_return {
            TypeCheckType::Auto => ctx.frames.refine_return_type(TypeCheckType::Nothing),
            TypeCheckType::Nothing => {}
            other => {
                return Err(Box::new(
                    Diag::error(
                        ErrorKind::UnexpectedType,
                        format!("expected a value of type {other}, found nothing"),
                    )
                    .with_primary_label(span, "here"),
                ));
            }
        }
        ctx.stream.expect(TokenKind::Semicolon)?;
        Ok(Statement::Return)
    } else {
        let value = expr::parse_expr(ctx, &declared_return)?;
        if matches!(declared_return, TypeCheckType::Auto) {
            ctx.frames.refine_return_type(value.type_.clone());
        }
        ctx.stream.expect(TokenKind::Semicolon)?;
        Ok(Statement::ReturnValue(value))
    }
}

/// `'include' STRING ';'` (§4.9). Resolving the referenced path and
/// splicing its tokens into the stream is left to the embedding
/// application; this crate only records the request syntactically.
fn parse_include(ctx: &mut Ctx) -> ParseResult<Statement> {
    ctx.stream.expect(TokenKind::Include)?;
    if !ctx.stream.check(TokenKind::StringLiteral) {
        return Err(ctx.stream.error_here(
            ErrorKind::UnexpectedToken,
            format!("expected a string literal path, found {}", ctx.stream.current().kind),
        ));
    }
    let path: SmolStr = ctx.stream.current().text.clone();
    ctx.stream.advance();
    ctx.stream.expect(TokenKind::Semicolon)?;

    let request = IncludeRequest { path };
    ctx.program.record_include(request.clone());
    Ok(Statement::Include(request))
}

fn parse_expr_statement(ctx: &mut Ctx) -> ParseResult<Statement> {
    let value = expr::parse_expr(ctx, &TypeCheckType::Auto)?;
    ctx.stream.expect(TokenKind::Semicolon)?;
    Ok(Statement::ExprStatement(value))
}
