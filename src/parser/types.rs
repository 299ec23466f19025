//! Parses type expressions: built-ins, `array<T>`, `proc<R, P...>`, and
//! generic parameter references.

use crate::ast::TypeCheckType;
use crate::diag::ErrorKind;
use crate::lexer::token::TokenKind;
use crate::parser::base::{ParseResult, TokenStream};
use crate::scope::FrameStack;

/// Parses a single type expression.
///
/// ```text
/// type := 'bool' | 'char' | 'long' | 'float'
///       | 'auto'                 (only if allow_auto)
///       | 'nothing'              (only if allow_nothing)
///       | 'array' '<' type '>'
///       | 'proc' '<' type (',' type)* '>'
///       | IDENTIFIER             // generic parameter reference
/// ```
///
/// `allow_auto`/`allow_nothing` gate whether the placeholder and bottom
/// types are accepted at this position — callers pass different flags for
/// a variable's declared type, a procedure's return type, and a procedure
/// parameter or `new T[..]` element type. Every sub-type position (the
/// element of `array<...>`, every slot of `proc<...>`) hardcodes
/// `allow_auto = false` regardless of the caller's own flag — an
/// `array<auto>` or `proc<auto, ...>` annotation would bake an
/// unresolvable placeholder into a declared type with nothing left to
/// concretize it from, and `original_source/ast.c`'s `parse_subtypes`
/// hardcodes the same argument to `0` for every sub-type it parses. The
/// element position also never allows `nothing` (an array of the bottom
/// type is meaningless). Inside `proc<...>` the first sub-type (the
/// return) always allows `nothing` regardless of the caller's flag —
/// that is a property of the `proc` type constructor itself, not of the
/// position this type expression appears in — while parameter sub-types
/// never allow it.
pub fn parse_type(
    stream: &mut TokenStream,
    frames: &FrameStack,
    allow_auto: bool,
    allow_nothing: bool,
) -> ParseResult<TypeCheckType> {
    let current = stream.current().kind;
    match current {
        TokenKind::Bool => {
            stream.advance();
            Ok(TypeCheckType::Bool)
        }
        TokenKind::Char => {
            stream.advance();
            Ok(TypeCheckType::Char)
        }
        TokenKind::Long => {
            stream.advance();
            Ok(TypeCheckType::Long)
        }
        TokenKind::Float => {
            stream.advance();
            Ok(TypeCheckType::Float)
        }
        TokenKind::Auto if allow_auto => {
            stream.advance();
            Ok(TypeCheckType::Auto)
        }
        TokenKind::Nothing if allow_nothing => {
            stream.advance();
            Ok(TypeCheckType::Nothing)
        }
        TokenKind::Auto => Err(stream.error_here(
            ErrorKind::TypeNotAllowed,
            "'auto' is not allowed in this position",
        )),
        TokenKind::Nothing => Err(stream.error_here(
            ErrorKind::TypeNotAllowed,
            "'nothing' is not allowed in this position",
        )),
        TokenKind::Array => {
            stream.advance();
            stream.expect(TokenKind::Lt)?;
            // Sub-type positions never allow `auto`, regardless of the
            // caller's own position — matching `original_source/ast.c`'s
            // `parse_subtypes`, which hardcodes that argument to `0` for
            // every sub-type it parses.
            let element = parse_type(stream, frames, false, false)?;
            let subtypes = vec![element];
            check_sub_type_count(stream, &subtypes)?;
            stream.expect(TokenKind::Gt)?;
            Ok(TypeCheckType::Array(Box::new(
                subtypes.into_iter().next().unwrap(),
            )))
        }
        TokenKind::Proc => {
            stream.advance();
            stream.expect(TokenKind::Lt)?;
            // Sub-type positions never allow `auto` (see above); the return
            // sub-type always allows `nothing`, parameters never do.
            let mut subtypes = vec![parse_type(stream, frames, false, true)?];
            while stream.consume(TokenKind::Comma) {
                subtypes.push(parse_type(stream, frames, false, false)?);
            }
            check_sub_type_count(stream, &subtypes)?;
            stream.expect(TokenKind::Gt)?;
            Ok(TypeCheckType::Proc {
                sub_types: subtypes,
                generic_count: 0,
            })
        }
        TokenKind::Identifier => {
            let name = stream.current().text.clone();
            match frames.find_generic(&name) {
                Some(index) => {
                    stream.advance();
                    Ok(TypeCheckType::TypeArg(index))
                }
                None => Err(stream.error_here(
                    ErrorKind::Undeclared,
                    format!("'{name}' is not a declared type parameter"),
                )),
            }
        }
        other => Err(stream.error_here(
            ErrorKind::UnexpectedToken,
            format!("expected a type, found {other}"),
        )),
    }
}

fn check_sub_type_count(stream: &TokenStream, subtypes: &[TypeCheckType]) -> ParseResult<()> {
    if subtypes.len() > crate::ast::TYPE_MAX_SUBTYPES {
        return Err(stream.error_here(
            ErrorKind::Memory,
            format!(
                "type has {} sub-types, exceeding the limit of {}",
                subtypes.len(),
                crate::ast::TYPE_MAX_SUBTYPES
            ),
        ));
    }
    Ok(())
}
