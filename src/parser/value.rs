//! The value parser: primary expressions and their postfix `[]`/`()`/
//! `<>()` chains (§4.3), plus procedure literals (§4.5).
//!
//! Every [`AstValue`] constructed here is given its dense id the moment
//! it's built (see [`make`]), so a node never gets a second id later if
//! it ends up wrapped by a postfix operation. [`parse_value`] only adds
//! the final compatibility check against the caller-supplied expected
//! type. Sub-expressions (array elements, call arguments, operands)
//! recurse back into `parse_value` with their own expected type, which
//! is how an `auto` placeholder threaded down from a declaration gets
//! concretized by the first concrete value parsed against it.

use smol_str::SmolStr;

use crate::ast::{AstValue, AstValueKind, Primitive, ProcParam, TypeCheckType, UnaryOperator};
use crate::diag::{Diag, ErrorKind};
use crate::lexer::token::TokenKind;
use crate::parser::Ctx;
use crate::parser::base::ParseResult;
use crate::parser::{stmt, types};

const THISPROC_NAME: &str = "thisproc";

/// Allocates the next dense value id and builds the node in one step, so
/// every constructed `AstValue` — not just the ones a caller happens to
/// return straight out of `parse_value` — carries a real id.
pub(crate) fn make(ctx: &mut Ctx, type_: TypeCheckType, kind: AstValueKind) -> AstValue {
    let id = ctx.program.alloc_value_id();
    AstValue::new(id, type_, kind)
}

/// Parses a value against `expected`: a primary expression, its postfix
/// chain, then the compatibility check every value undergoes (§4.3).
pub fn parse_value(ctx: &mut Ctx, expected: &TypeCheckType) -> ParseResult<AstValue> {
    let primary = parse_primary(ctx, expected)?;
    let value = parse_postfix(ctx, primary)?;
    if !expected.is_compatible(&value.type_) {
        return Err(ctx.stream.error_here(
            ErrorKind::UnexpectedType,
            format!("expected a value of type {expected}, found {}", value.type_),
        ));
    }
    Ok(value)
}

fn parse_primary(ctx: &mut Ctx, expected: &TypeCheckType) -> ParseResult<AstValue> {
    match ctx.stream.current().kind {
        TokenKind::LongLiteral => parse_long_literal(ctx),
        TokenKind::FloatLiteral => parse_float_literal(ctx),
        TokenKind::CharLiteral => parse_char_literal(ctx),
        TokenKind::StringLiteral => parse_string_literal(ctx),
        TokenKind::True => {
            ctx.stream.advance();
            Ok(make(ctx, TypeCheckType::Bool, AstValueKind::Primitive(Primitive::Bool(true))))
        }
        TokenKind::False => {
            ctx.stream.advance();
            Ok(make(ctx, TypeCheckType::Bool, AstValueKind::Primitive(Primitive::Bool(false))))
        }
        TokenKind::LBracket => parse_array_literal(ctx, expected),
        TokenKind::New => parse_alloc_array(ctx),
        TokenKind::Identifier => parse_identifier(ctx, THISPROC_NAME, false),
        TokenKind::ThisProc => parse_identifier(ctx, THISPROC_NAME, true),
        TokenKind::LParen => {
            ctx.stream.advance();
            let inner = crate::parser::expr::parse_expr(ctx, expected)?;
            ctx.stream.expect(TokenKind::RParen)?;
            Ok(inner)
        }
        TokenKind::Bang => parse_unary(ctx, expected, UnaryOperator::Not),
        TokenKind::Minus => parse_unary(ctx, expected, UnaryOperator::Neg),
        TokenKind::Hash => parse_unary(ctx, expected, UnaryOperator::Len),
        TokenKind::Proc => parse_proc_literal(ctx),
        other => Err(ctx
            .stream
            .error_here(ErrorKind::UnexpectedToken, format!("expected a value, found {other}"))),
    }
}

fn parse_long_literal(ctx: &mut Ctx) -> ParseResult<AstValue> {
    let span = ctx.stream.current().span.clone();
    let text = ctx.stream.current().text.clone();
    ctx.stream.advance();
    let value = if let Some(hex) = text.strip_suffix('h') {
        i64::from_str_radix(hex, 16)
    } else {
        text.parse::<i64>()
    }
    .map_err(|_| {
        Box::new(
            Diag::error(ErrorKind::Internal, format!("invalid long literal '{text}'"))
                .with_primary_label(span.clone(), "here"),
        )
    })?;
    Ok(make(ctx, TypeCheckType::Long, AstValueKind::Primitive(Primitive::Long(value))))
}

fn parse_float_literal(ctx: &mut Ctx) -> ParseResult<AstValue> {
    let span = ctx.stream.current().span.clone();
    let text = ctx.stream.current().text.clone();
    ctx.stream.advance();
    let trimmed = text.strip_suffix('f').unwrap_or(&text);
    let value = trimmed.parse::<f64>().map_err(|_| {
        Box::new(
            Diag::error(ErrorKind::Internal, format!("invalid float literal '{text}'"))
                .with_primary_label(span.clone(), "here"),
        )
    })?;
    Ok(make(ctx, TypeCheckType::Float, AstValueKind::Primitive(Primitive::Float(value))))
}

fn parse_char_literal(ctx: &mut Ctx) -> ParseResult<AstValue> {
    let text = ctx.stream.current().text.clone();
    ctx.stream.advance();
    let c = text.chars().next().unwrap_or('\0');
    Ok(make(ctx, TypeCheckType::Char, AstValueKind::Primitive(Primitive::Char(c))))
}

fn parse_string_literal(ctx: &mut Ctx) -> ParseResult<AstValue> {
    let text = ctx.stream.current().text.clone();
    ctx.stream.advance();
    let elements = text
        .chars()
        .map(|c| make(ctx, TypeCheckType::Char, AstValueKind::Primitive(Primitive::Char(c))))
        .collect();
    Ok(make(
        ctx,
        TypeCheckType::Array(Box::new(TypeCheckType::Char)),
        AstValueKind::ArrayLiteral {
            element_type: TypeCheckType::Char,
            elements,
        },
    ))
}

fn parse_array_literal(ctx: &mut Ctx, expected: &TypeCheckType) -> ParseResult<AstValue> {
    ctx.stream.advance(); // '['
    // Seed the per-element expected type from the outer expectation when it
    // already names a concrete array element type; otherwise start from
    // `auto` and let the first element concretize it (§4.3).
    let mut element_type = expected.array_element().cloned().unwrap_or(TypeCheckType::Auto);
    let mut elements = Vec::new();
    if !ctx.stream.check(TokenKind::RBracket) {
        loop {
            let element = parse_value(ctx, &element_type)?;
            if matches!(element_type, TypeCheckType::Auto) {
                element_type = element.type_.clone();
            }
            elements.push(element);
            if ctx.stream.consume(TokenKind::Comma) {
                continue;
            }
            break;
        }
    }
    ctx.stream.expect(TokenKind::RBracket)?;
    Ok(make(
        ctx,
        TypeCheckType::Array(Box::new(element_type.clone())),
        AstValueKind::ArrayLiteral { element_type, elements },
    ))
}

fn parse_alloc_array(ctx: &mut Ctx) -> ParseResult<AstValue> {
    ctx.stream.advance(); // 'new'
    let element_type = types::parse_type(&mut ctx.stream, &ctx.frames, false, false)?;
    ctx.stream.expect(TokenKind::LBracket)?;
    let size = parse_value(ctx, &TypeCheckType::Long)?;
    ctx.stream.expect(TokenKind::RBracket)?;
    Ok(make(
        ctx,
        TypeCheckType::Array(Box::new(element_type.clone())),
        AstValueKind::AllocArray {
            element_type,
            size: Box::new(size),
        },
    ))
}

/// Parses an identifier (or the reserved `thisproc` keyword, which
/// resolves against the same name every procedure's root frame binds it
/// under) as a variable read or, if followed by `=`, an assignment.
fn parse_identifier(ctx: &mut Ctx, reserved_name: &str, is_reserved: bool) -> ParseResult<AstValue> {
    let span = ctx.stream.current().span.clone();
    let name: SmolStr = if is_reserved {
        reserved_name.into()
    } else {
        ctx.stream.current().text.clone()
    };
    ctx.stream.advance();

    let var_id = ctx.frames.find_var(&name).ok_or_else(|| {
        Box::new(
            Diag::error(ErrorKind::Undeclared, format!("'{name}' is not declared"))
                .with_primary_label(span.clone(), "here"),
        )
    })?;
    let var_info = ctx.program.get_var(var_id).clone();

    if ctx.stream.check(TokenKind::Assign) {
        if var_info.is_readonly {
            return Err(Box::new(
                Diag::error(ErrorKind::ReadOnly, format!("'{name}' is read-only"))
                    .with_primary_label(span, "assigned here"),
            ));
        }
        ctx.stream.advance();
        let value = parse_value(ctx, &var_info.type_)?;
        Ok(make(
            ctx,
            var_info.type_.clone(),
            AstValueKind::SetVar {
                var: var_id,
                value: Box::new(value),
            },
        ))
    } else {
        Ok(make(ctx, var_info.type_.clone(), AstValueKind::Var(var_id)))
    }
}

fn parse_unary(ctx: &mut Ctx, expected: &TypeCheckType, op: UnaryOperator) -> ParseResult<AstValue> {
    let span = ctx.stream.current().span.clone();
    ctx.stream.advance();
    match op {
        UnaryOperator::Not => {
            let operand = parse_value(ctx, expected)?;
            if !TypeCheckType::Bool.is_compatible(&operand.type_) {
                return Err(Box::new(
                    Diag::error(ErrorKind::UnexpectedType, "'!' requires a bool operand")
                        .with_primary_label(span, "here"),
                ));
            }
            Ok(make(
                ctx,
                TypeCheckType::Bool,
                AstValueKind::UnaryOp {
                    op,
                    operand: Box::new(operand),
                },
            ))
        }
        UnaryOperator::Neg => {
            let operand = parse_value(ctx, expected)?;
            if !operand.type_.is_numeric() {
                return Err(Box::new(
                    Diag::error(ErrorKind::UnexpectedType, "'-' requires a numeric operand")
                        .with_primary_label(span, "here"),
                ));
            }
            let type_ = operand.type_.clone();
            Ok(make(
                ctx,
                type_,
                AstValueKind::UnaryOp {
                    op,
                    operand: Box::new(operand),
                },
            ))
        }
        UnaryOperator::Len => {
            let array_expected = TypeCheckType::Array(Box::new(TypeCheckType::Auto));
            let operand = parse_value(ctx, &array_expected)?;
            if operand.type_.array_element().is_none() {
                return Err(Box::new(
                    Diag::error(ErrorKind::UnexpectedType, "'#' requires an array operand")
                        .with_primary_label(span, "here"),
                ));
            }
            Ok(make(
                ctx,
                TypeCheckType::Long,
                AstValueKind::UnaryOp {
                    op,
                    operand: Box::new(operand),
                },
            ))
        }
    }
}

/// Folds the postfix `[index]`, `(args)`, and `<type-args>(args)` chain
/// onto a parsed primary (§4.3). Stops (without consuming) at a `<` that
/// doesn't turn out to introduce a generic instantiation of a callable
/// `Proc` value — that `<` is left for the expression parser to read as a
/// comparison operator.
fn parse_postfix(ctx: &mut Ctx, mut value: AstValue) -> ParseResult<AstValue> {
    loop {
        match ctx.stream.current().kind {
            TokenKind::LBracket => {
                value = parse_index(ctx, value)?;
            }
            TokenKind::LParen => {
                value = parse_call(ctx, value, Vec::new())?;
            }
            TokenKind::Lt => {
                let generic_count = match &value.type_ {
                    TypeCheckType::Proc { generic_count, .. } => *generic_count,
                    _ => 0,
                };
                if generic_count == 0 {
                    break;
                }
                match try_parse_type_args(ctx)? {
                    Some(type_args) => {
                        value = parse_call(ctx, value, type_args)?;
                    }
                    None => break,
                }
            }
            _ => break,
        }
    }
    Ok(value)
}

fn parse_index(ctx: &mut Ctx, array: AstValue) -> ParseResult<AstValue> {
    let span = ctx.stream.current().span.clone();
    ctx.stream.advance(); // '['
    let element_type = array.type_.array_element().cloned().ok_or_else(|| {
        Box::new(
            Diag::error(ErrorKind::UnexpectedType, "indexed value is not an array")
                .with_primary_label(span.clone(), "here"),
        )
    })?;
    let index = parse_value(ctx, &TypeCheckType::Long)?;
    ctx.stream.expect(TokenKind::RBracket)?;

    if ctx.stream.check(TokenKind::Assign) {
        ctx.stream.advance();
        let rhs = parse_value(ctx, &element_type)?;
        Ok(make(
            ctx,
            element_type,
            AstValueKind::SetIndex {
                array: Box::new(array),
                index: Box::new(index),
                value: Box::new(rhs),
            },
        ))
    } else {
        Ok(make(
            ctx,
            element_type,
            AstValueKind::GetIndex {
                array: Box::new(array),
                index: Box::new(index),
            },
        ))
    }
}

/// Speculatively parses `'<' type (',' type)* '>'` followed immediately by
/// `'('`, restoring position and returning `None` if any part fails — the
/// caller falls back to treating the leading `<` as a comparison operator.
fn try_parse_type_args(ctx: &mut Ctx) -> ParseResult<Option<Vec<TypeCheckType>>> {
    let save = ctx.stream.position();
    if !ctx.stream.consume(TokenKind::Lt) {
        return Ok(None);
    }
    let mut args = Vec::new();
    loop {
        match types::parse_type(&mut ctx.stream, &ctx.frames, false, false) {
            Ok(ty) => args.push(ty),
            Err(_) => {
                ctx.stream.set_position(save);
                return Ok(None);
            }
        }
        if ctx.stream.consume(TokenKind::Comma) {
            continue;
        }
        break;
    }
    if !ctx.stream.consume(TokenKind::Gt) || !ctx.stream.check(TokenKind::LParen) {
        ctx.stream.set_position(save);
        return Ok(None);
    }
    Ok(Some(args))
}

fn parse_call(ctx: &mut Ctx, callee: AstValue, type_args: Vec<TypeCheckType>) -> ParseResult<AstValue> {
    let span = ctx.stream.current().span.clone();
    let (mut return_type, mut param_types, generic_count) = match &callee.type_ {
        TypeCheckType::Proc {
            sub_types,
            generic_count,
        } => (sub_types[0].clone(), sub_types[1..].to_vec(), *generic_count),
        _ => {
            return Err(Box::new(
                Diag::error(ErrorKind::UnexpectedType, "callee is not a procedure")
                    .with_primary_label(span, "here"),
            ));
        }
    };

    if !type_args.is_empty() {
        if type_args.len() != generic_count {
            return Err(Box::new(
                Diag::error(
                    ErrorKind::ExpectedSubTypes,
                    format!(
                        "expected {generic_count} type argument(s), found {}",
                        type_args.len()
                    ),
                )
                .with_primary_label(span, "here"),
            ));
        }
        return_type.substitute_type_args(&type_args);
        for param in param_types.iter_mut() {
            param.substitute_type_args(&type_args);
        }
    } else if generic_count > 0 {
        return Err(Box::new(
            Diag::error(
                ErrorKind::ExpectedSubTypes,
                "generic procedure called without explicit type arguments",
            )
            .with_primary_label(span, "here"),
        ));
    }

    ctx.stream.expect(TokenKind::LParen)?;
    let mut args = Vec::new();
    if !ctx.stream.check(TokenKind::RParen) {
        loop {
            let idx = args.len();
            let expected = param_types.get(idx).cloned().unwrap_or(TypeCheckType::Auto);
            args.push(parse_value(ctx, &expected)?);
            if ctx.stream.consume(TokenKind::Comma) {
                continue;
            }
            break;
        }
    }
    let rparen_span = ctx.stream.current().span.clone();
    ctx.stream.expect(TokenKind::RParen)?;

    if args.len() != param_types.len() {
        return Err(Box::new(
            Diag::error(
                ErrorKind::UnexpectedArgumentSize,
                format!("expected {} argument(s), found {}", param_types.len(), args.len()),
            )
            .with_primary_label(rparen_span, "here"),
        ));
    }

    Ok(make(
        ctx,
        return_type,
        AstValueKind::ProcCall {
            callee: Box::new(callee),
            type_args,
            args,
        },
    ))
}

/// Parses a procedure literal (§4.5): a fresh generic scope, an optional
/// `<T, ...>` generic parameter list, a `(type name, ...)` parameter list,
/// a `return T` clause, the implicit `thisproc` self-binding, and finally
/// the body — parsed last because the body is the one place `return`
/// needs the return type this signature just established.
fn parse_proc_literal(ctx: &mut Ctx) -> ParseResult<AstValue> {
    ctx.stream.advance(); // 'proc'
    push_frame(ctx)?;

    let generic_count = parse_generic_params(ctx)?;
    let params = parse_params(ctx)?;

    ctx.stream.expect(TokenKind::Return)?;
    let declared_return = types::parse_type(&mut ctx.stream, &ctx.frames, true, true)?;
    ctx.frames.set_return_type(declared_return.clone());

    let mut sub_types = Vec::with_capacity(params.len() + 1);
    sub_types.push(declared_return);
    sub_types.extend(params.iter().map(|p| p.type_.clone()));
    if sub_types.len() > ctx.frames.limits().max_sub_types {
        return Err(ctx.stream.error_here(
            ErrorKind::Memory,
            format!("procedure has {} sub-types, exceeding the limit", sub_types.len()),
        ));
    }
    let provisional_type = TypeCheckType::Proc {
        sub_types,
        generic_count,
    };

    let thisproc_var = ctx.program.declare_var(provisional_type, false, true);
    declare(ctx, THISPROC_NAME.into(), thisproc_var, false)?;

    // A loop enclosing this literal must not let `continue`/`break` inside
    // this body reach back out to it, so loop tracking is scoped to the
    // body being parsed.
    let outer_loop_depth = std::mem::replace(&mut ctx.loop_depth, 0);
    let body_result = stmt::parse_block(ctx);
    ctx.loop_depth = outer_loop_depth;
    let body = body_result?;

    let final_return = ctx.frames.return_type().unwrap_or(TypeCheckType::Auto);
    ctx.frames.pop_frame();

    let mut final_sub_types = Vec::with_capacity(params.len() + 1);
    final_sub_types.push(final_return.clone());
    final_sub_types.extend(params.iter().map(|p| p.type_.clone()));
    let proc_type = TypeCheckType::Proc {
        sub_types: final_sub_types,
        generic_count,
    };

    Ok(make(
        ctx,
        proc_type,
        AstValueKind::Proc {
            params,
            return_type: final_return,
            body: Box::new(body),
            thisproc_var,
        },
    ))
}

fn push_frame(ctx: &mut Ctx) -> ParseResult<()> {
    ctx.frames
        .push_proc_root_frame()
        .map_err(|e| scope_error(ctx, e))
}

/// Parses an optional `'<' name (',' name)* '>'` generic parameter list.
/// A plain `proc(...) return T {...}` literal with no angle brackets at
/// all introduces zero generics, matching `original_source/ast.c`, which
/// only parses the list when the next token is `<`.
fn parse_generic_params(ctx: &mut Ctx) -> ParseResult<usize> {
    if !ctx.stream.consume(TokenKind::Lt) {
        return Ok(0);
    }
    if ctx.stream.consume(TokenKind::Gt) {
        return Ok(0);
    }
    let mut count = 0;
    loop {
        let name = expect_identifier(ctx)?;
        ctx.frames
            .declare_generic(name)
            .map_err(|e| scope_error(ctx, e))?;
        count += 1;
        if ctx.stream.consume(TokenKind::Comma) {
            continue;
        }
        break;
    }
    ctx.stream.expect(TokenKind::Gt)?;
    Ok(count)
}

/// Parses `(type name, ...)`. Every parameter is declared as a readonly
/// local (§4.5 step 3) — a procedure body cannot reassign its own
/// parameters, matching `original_source/ast.c`'s `.is_readonly = 1`.
fn parse_params(ctx: &mut Ctx) -> ParseResult<Vec<ProcParam>> {
    ctx.stream.expect(TokenKind::LParen)?;
    let mut params = Vec::new();
    if !ctx.stream.check(TokenKind::RParen) {
        loop {
            if params.len() >= ctx.frames.limits().max_proc_params {
                return Err(ctx.stream.error_here(
                    ErrorKind::Memory,
                    "too many procedure parameters",
                ));
            }
            let type_ = types::parse_type(&mut ctx.stream, &ctx.frames, false, false)?;
            let name = expect_identifier(ctx)?;
            let var = ctx.program.declare_var(type_.clone(), false, true);
            declare(ctx, name, var, false)?;
            params.push(ProcParam { type_, var });
            if ctx.stream.consume(TokenKind::Comma) {
                continue;
            }
            break;
        }
    }
    ctx.stream.expect(TokenKind::RParen)?;
    Ok(params)
}

pub(crate) fn expect_identifier(ctx: &mut Ctx) -> ParseResult<SmolStr> {
    if !ctx.stream.check(TokenKind::Identifier) {
        return Err(ctx.stream.error_here(
            ErrorKind::UnexpectedToken,
            format!("expected an identifier, found {}", ctx.stream.current().kind),
        ));
    }
    let name = ctx.stream.current().text.clone();
    ctx.stream.advance();
    Ok(name)
}

/// Declares `name` in the scope frame stack, translating a
/// [`crate::scope::ScopeError`] into a positioned [`Diag`].
pub(crate) fn declare(ctx: &mut Ctx, name: SmolStr, var: crate::ast::VarId, as_global: bool) -> ParseResult<()> {
    ctx.frames
        .declare(name, var, as_global)
        .map_err(|e| scope_error(ctx, e))
}

fn scope_error(ctx: &Ctx, err: crate::scope::ScopeError) -> Box<Diag> {
    let message = match err {
        crate::scope::ScopeError::Redeclaration => "name is already declared in this scope",
        crate::scope::ScopeError::FrameDepthExceeded => "procedure nesting is too deep",
        crate::scope::ScopeError::TooManyGenerics => "too many generic type parameters",
    };
    ctx.stream.error_here(err.into(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::ParserLimits;
    use crate::parser::base::TokenStream;

    fn parse_top(source: &str) -> ParseResult<AstValue> {
        let tokens = crate::lexer::tokenize(source).tokens;
        let leaked: &'static [crate::lexer::token::Token] = Box::leak(tokens.into_boxed_slice());
        let mut ctx = Ctx {
            stream: TokenStream::new(leaked),
            frames: crate::scope::FrameStack::new(ParserLimits::default()),
            program: crate::ast::Program::new(),
            loop_depth: 0,
        };
        parse_value(&mut ctx, &TypeCheckType::Auto)
    }

    #[test]
    fn parses_long_literal() {
        let value = parse_top("42").unwrap();
        assert_eq!(value.type_, TypeCheckType::Long);
        assert_eq!(value.kind, AstValueKind::Primitive(Primitive::Long(42)));
    }

    #[test]
    fn parses_hex_long_literal() {
        let value = parse_top("1ah").unwrap();
        assert_eq!(value.kind, AstValueKind::Primitive(Primitive::Long(26)));
    }

    #[test]
    fn parses_float_literal_with_suffix() {
        let value = parse_top("2f").unwrap();
        assert_eq!(value.type_, TypeCheckType::Float);
        assert_eq!(value.kind, AstValueKind::Primitive(Primitive::Float(2.0)));
    }

    #[test]
    fn parses_float_literal_with_dot() {
        let value = parse_top("3.5").unwrap();
        assert_eq!(value.kind, AstValueKind::Primitive(Primitive::Float(3.5)));
    }

    #[test]
    fn string_literal_expands_to_char_array() {
        let value = parse_top("\"ab\"").unwrap();
        match value.kind {
            AstValueKind::ArrayLiteral { element_type, elements } => {
                assert_eq!(element_type, TypeCheckType::Char);
                assert_eq!(elements.len(), 2);
            }
            other => panic!("expected array literal, got {other:?}"),
        }
    }

    #[test]
    fn array_literal_infers_element_type_from_first_element() {
        let value = parse_top("[1, 2, 3]").unwrap();
        assert_eq!(value.type_, TypeCheckType::Array(Box::new(TypeCheckType::Long)));
    }

    #[test]
    fn array_elements_each_get_a_distinct_id() {
        let value = parse_top("[1, 2, 3]").unwrap();
        match value.kind {
            AstValueKind::ArrayLiteral { elements, .. } => {
                let ids: Vec<usize> = elements.iter().map(|e| e.id).collect();
                assert_eq!(ids.len(), 3);
                assert_ne!(ids[0], ids[1]);
                assert_ne!(ids[1], ids[2]);
            }
            other => panic!("expected array literal, got {other:?}"),
        }
    }

    #[test]
    fn chained_index_nodes_each_get_their_own_id() {
        let tokens = crate::lexer::tokenize("grid[0][1]").tokens;
        let leaked: &'static [crate::lexer::token::Token] = Box::leak(tokens.into_boxed_slice());
        let mut ctx = Ctx {
            stream: TokenStream::new(leaked),
            frames: crate::scope::FrameStack::new(ParserLimits::default()),
            program: crate::ast::Program::new(),
            loop_depth: 0,
        };
        let elem = TypeCheckType::Array(Box::new(TypeCheckType::Long));
        let grid_type = TypeCheckType::Array(Box::new(elem));
        let grid_var = ctx.program.declare_var(grid_type, false, false);
        ctx.frames.declare("grid".into(), grid_var, false).unwrap();

        let value = parse_value(&mut ctx, &TypeCheckType::Auto).unwrap();
        let AstValueKind::GetIndex { array: outer, .. } = value.kind else {
            panic!("expected the outer index to be a GetIndex node");
        };
        assert_ne!(value.id, outer.id, "inner a[0] must keep its own id, not the outer's");
    }

    #[test]
    fn undeclared_identifier_fails() {
        assert!(parse_top("x").is_err());
    }

    #[test]
    fn proc_literal_with_generic_identity() {
        let value = parse_top("proc<T>(T x) return T { return x; }").unwrap();
        match value.type_ {
            TypeCheckType::Proc { generic_count, .. } => assert_eq!(generic_count, 1),
            other => panic!("expected a proc type, got {other}"),
        }
    }

    #[test]
    fn calling_a_non_procedure_fails() {
        let value = parse_top("proc<>() return nothing {}");
        assert!(value.is_ok());
        let call_failure = parse_top("3()");
        assert!(call_failure.is_err());
    }

    #[test]
    fn proc_literal_without_angle_brackets_has_zero_generics() {
        let value = parse_top("proc(long x) return long { return x; }").unwrap();
        match value.type_ {
            TypeCheckType::Proc { generic_count, .. } => assert_eq!(generic_count, 0),
            other => panic!("expected a proc type, got {other}"),
        }
    }

    #[test]
    fn proc_parameter_cannot_be_reassigned_in_the_body() {
        let failure = parse_top("proc<>(long x) return long { x = x + 1; return x; }");
        assert!(failure.is_err());
    }
}
