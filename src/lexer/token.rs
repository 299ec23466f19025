//! Token kinds produced by the lexer.

use std::fmt;

use smol_str::SmolStr;

use crate::ast::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    If,
    Else,
    While,
    Continue,
    Break,
    Return,
    Include,
    New,
    Proc,
    Array,
    Auto,
    Nothing,
    True,
    False,
    Global,
    Readonly,
    Bool,
    Char,
    Long,
    Float,
    /// The reserved `thisproc` self-reference. A dedicated keyword rather
    /// than a plain identifier, so it can never be shadowed by or collide
    /// with a user declaration.
    ThisProc,

    Identifier,
    LongLiteral,
    FloatLiteral,
    CharLiteral,
    StringLiteral,

    // Punctuators
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Lt,
    Gt,
    Assign,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,
    EqEq,
    NotEq,
    GtEq,
    LtEq,
    AndAnd,
    OrOr,
    Bang,
    Hash,

    /// Emitted in place of a token the lexer could not scan, so a single
    /// malformed character doesn't swallow the rest of the stream. Always
    /// paired with a diagnostic.
    Error,
    Eof,
}

impl TokenKind {
    /// Looks up a scanned identifier against the keyword table. Maximal
    /// munch: the lexer always scans the longest possible identifier run
    /// before calling this.
    pub fn keyword_from_str(text: &str) -> Option<TokenKind> {
        Some(match text {
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "continue" => TokenKind::Continue,
            "break" => TokenKind::Break,
            "return" => TokenKind::Return,
            "include" => TokenKind::Include,
            "new" => TokenKind::New,
            "proc" => TokenKind::Proc,
            "array" => TokenKind::Array,
            "auto" => TokenKind::Auto,
            "nothing" => TokenKind::Nothing,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "global" => TokenKind::Global,
            "readonly" => TokenKind::Readonly,
            "bool" => TokenKind::Bool,
            "char" => TokenKind::Char,
            "long" => TokenKind::Long,
            "float" => TokenKind::Float,
            "thisproc" => TokenKind::ThisProc,
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::Continue => "continue",
            TokenKind::Break => "break",
            TokenKind::Return => "return",
            TokenKind::Include => "include",
            TokenKind::New => "new",
            TokenKind::Proc => "proc",
            TokenKind::Array => "array",
            TokenKind::Auto => "auto",
            TokenKind::Nothing => "nothing",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Global => "global",
            TokenKind::Readonly => "readonly",
            TokenKind::Bool => "bool",
            TokenKind::Char => "char",
            TokenKind::Long => "long",
            TokenKind::Float => "float",
            TokenKind::ThisProc => "thisproc",
            TokenKind::Identifier => "identifier",
            TokenKind::LongLiteral => "integer literal",
            TokenKind::FloatLiteral => "float literal",
            TokenKind::CharLiteral => "char literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Assign => "'='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::StarStar => "'**'",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::GtEq => "'>='",
            TokenKind::LtEq => "'<='",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::Bang => "'!'",
            TokenKind::Hash => "'#'",
            TokenKind::Error => "an invalid token",
            TokenKind::Eof => "end of input",
        };
        write!(f, "{name}")
    }
}

/// A scanned lexeme: its kind, source span, and (for identifiers and
/// literals) the text payload needed to reconstruct the value.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Identifier text, string-literal contents (post-escape-processing),
    /// or the raw digit run for numeric literals. Empty for tokens that
    /// carry no payload.
    pub text: SmolStr,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, text: impl Into<SmolStr>) -> Self {
        Token {
            kind,
            span,
            text: text.into(),
        }
    }

    pub fn without_text(kind: TokenKind, span: Span) -> Self {
        Token::new(kind, span, "")
    }
}
