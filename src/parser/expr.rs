//! Binary operator precedence climbing (§4.4), layered on top of
//! [`crate::parser::value::parse_value`] for the leaves.
//!
//! Operand types aren't threaded down as an "expected" type the way array
//! elements and call arguments are — an operand's type is constrained by
//! its operator, not by the type the whole expression is eventually
//! checked against. Each leaf is parsed against `auto` and the operator's
//! own rule (same-numeric-type arithmetic, same-type equality, bool
//! logical) is checked once both sides are in hand. The expression's
//! overall expected type is only applied once, to the fully-reduced
//! result, by [`parse_expr`].

use crate::ast::{AstValueKind, BinaryOperator, TypeCheckType};
use crate::diag::{Diag, ErrorKind};
use crate::lexer::token::TokenKind;
use crate::parser::Ctx;
use crate::parser::base::ParseResult;
use crate::parser::value::{self, parse_value};

fn operator_for(kind: TokenKind) -> Option<BinaryOperator> {
    Some(match kind {
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Minus => BinaryOperator::Sub,
        TokenKind::Star => BinaryOperator::Mul,
        TokenKind::Slash => BinaryOperator::Div,
        TokenKind::Percent => BinaryOperator::Mod,
        TokenKind::StarStar => BinaryOperator::Pow,
        TokenKind::EqEq => BinaryOperator::Eq,
        TokenKind::NotEq => BinaryOperator::NotEq,
        TokenKind::Gt => BinaryOperator::Gt,
        TokenKind::Lt => BinaryOperator::Lt,
        TokenKind::GtEq => BinaryOperator::GtEq,
        TokenKind::LtEq => BinaryOperator::LtEq,
        TokenKind::AndAnd => BinaryOperator::And,
        TokenKind::OrOr => BinaryOperator::Or,
        _ => return None,
    })
}

/// Parses a full expression (the binary-operator chain over values) and
/// checks its final, reduced type against `expected`.
pub fn parse_expr(ctx: &mut Ctx, expected: &TypeCheckType) -> ParseResult<crate::ast::AstValue> {
    let result = parse_prec(ctx, 1)?;
    if !expected.is_compatible(&result.type_) {
        return Err(ctx.stream.error_here(
            ErrorKind::UnexpectedType,
            format!("expected a value of type {expected}, found {}", result.type_),
        ));
    }
    Ok(result)
}

/// Climbs precedence starting at `min_prec`: reads one operand, then
/// keeps folding in any operator whose precedence is at least `min_prec`.
/// Every operator in this language is left-associative (§4.4), so the
/// recursive call for the right operand uses `min_prec + 1` rather than
/// `min_prec`, which is what makes equal-precedence chains (`a - b - c`)
/// group to the left instead of the right.
fn parse_prec(ctx: &mut Ctx, min_prec: u8) -> ParseResult<crate::ast::AstValue> {
    let mut lhs = parse_value(ctx, &TypeCheckType::Auto)?;
    loop {
        let op = match operator_for(ctx.stream.current().kind) {
            Some(op) if op.precedence() >= min_prec => op,
            _ => break,
        };
        let op_span = ctx.stream.current().span.clone();
        ctx.stream.advance();
        let rhs = parse_prec(ctx, op.precedence() + 1)?;
        lhs = combine(ctx, op, op_span, lhs, rhs)?;
    }
    Ok(lhs)
}

fn combine(
    ctx: &mut Ctx,
    op: BinaryOperator,
    op_span: crate::ast::Span,
    lhs: crate::ast::AstValue,
    rhs: crate::ast::AstValue,
) -> ParseResult<crate::ast::AstValue> {
    let result_type = match op {
        BinaryOperator::Add
        | BinaryOperator::Sub
        | BinaryOperator::Mul
        | BinaryOperator::Div
        | BinaryOperator::Mod
        | BinaryOperator::Pow => {
            if !lhs.type_.is_numeric() || !lhs.type_.is_compatible(&rhs.type_) {
                return Err(Box::new(
                    Diag::error(
                        ErrorKind::UnexpectedType,
                        format!(
                            "'{op:?}' requires two operands of the same numeric type, found {} and {}",
                            lhs.type_, rhs.type_
                        ),
                    )
                    .with_primary_label(op_span, "here"),
                ));
            }
            lhs.type_.clone()
        }
        BinaryOperator::Gt | BinaryOperator::Lt | BinaryOperator::GtEq | BinaryOperator::LtEq => {
            if !lhs.type_.is_numeric() || !lhs.type_.is_compatible(&rhs.type_) {
                return Err(Box::new(
                    Diag::error(
                        ErrorKind::UnexpectedType,
                        format!(
                            "'{op:?}' requires two operands of the same numeric type, found {} and {}",
                            lhs.type_, rhs.type_
                        ),
                    )
                    .with_primary_label(op_span, "here"),
                ));
            }
            TypeCheckType::Bool
        }
        BinaryOperator::Eq | BinaryOperator::NotEq => {
            if !lhs.type_.is_compatible(&rhs.type_) && !rhs.type_.is_compatible(&lhs.type_) {
                return Err(Box::new(
                    Diag::error(
                        ErrorKind::UnexpectedType,
                        format!(
                            "'{op:?}' requires two operands of the same type, found {} and {}",
                            lhs.type_, rhs.type_
                        ),
                    )
                    .with_primary_label(op_span, "here"),
                ));
            }
            TypeCheckType::Bool
        }
        BinaryOperator::And | BinaryOperator::Or => {
            if !TypeCheckType::Bool.is_compatible(&lhs.type_) || !TypeCheckType::Bool.is_compatible(&rhs.type_) {
                return Err(Box::new(
                    Diag::error(
                        ErrorKind::UnexpectedType,
                        format!("'{op:?}' requires two bool operands, found {} and {}", lhs.type_, rhs.type_),
                    )
                    .with_primary_label(op_span, "here"),
                ));
            }
            TypeCheckType::Bool
        }
    };
    Ok(value::make(
        ctx,
        result_type,
        AstValueKind::BinaryOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::ParserLimits;
    use crate::parser::base::TokenStream;

    fn parse_top(source: &str) -> ParseResult<crate::ast::AstValue> {
        let tokens = crate::lexer::tokenize(source).tokens;
        let leaked: &'static [crate::lexer::token::Token] = Box::leak(tokens.into_boxed_slice());
        let mut ctx = Ctx {
            stream: TokenStream::new(leaked),
            frames: crate::scope::FrameStack::new(ParserLimits::default()),
            program: crate::ast::Program::new(),
            loop_depth: 0,
        };
        parse_expr(&mut ctx, &TypeCheckType::Auto)
    }

    #[test]
    fn addition_of_longs() {
        let value = parse_top("1 + 2").unwrap();
        assert_eq!(value.type_, TypeCheckType::Long);
    }

    #[test]
    fn mixed_numeric_types_are_rejected() {
        assert!(parse_top("1 + 2.0").is_err());
    }

    #[test]
    fn comparison_yields_bool() {
        let value = parse_top("1 < 2").unwrap();
        assert_eq!(value.type_, TypeCheckType::Bool);
    }

    #[test]
    fn left_associative_subtraction() {
        // (10 - 3) - 2 == 5, not 10 - (3 - 2) == 9; both well-typed either
        // way, so this only pins down the parse failing to type-check if
        // grouping were flipped with non-associative operands is not
        // possible here — instead check the tree shape directly.
        let value = parse_top("10 - 3 - 2").unwrap();
        let AstValueKind::BinaryOp { op, lhs, .. } = value.kind else {
            panic!("expected a BinaryOp node");
        };
        assert_eq!(op, BinaryOperator::Sub);
        assert!(matches!(lhs.kind, AstValueKind::BinaryOp { op: BinaryOperator::Sub, .. }));
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let value = parse_top("1 + 2 * 3").unwrap();
        let AstValueKind::BinaryOp { op, rhs, .. } = value.kind else {
            panic!("expected a BinaryOp node");
        };
        assert_eq!(op, BinaryOperator::Add);
        assert!(matches!(rhs.kind, AstValueKind::BinaryOp { op: BinaryOperator::Mul, .. }));
    }

    #[test]
    fn logical_and_requires_bool_operands() {
        assert!(parse_top("true && false").is_ok());
        assert!(parse_top("1 && 2").is_err());
    }

    #[test]
    fn less_than_without_generic_callee_is_a_comparison() {
        let value = parse_top("1 < 2").unwrap();
        assert_eq!(value.type_, TypeCheckType::Bool);
    }
}
