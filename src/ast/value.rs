//! `AstValue` — the expression node of the checked AST.
//!
//! Every variant carries the `TypeCheckType` inferred for it during parsing
//! and a dense `id`, assigned in construction order, used by the §8
//! structural-property tests (`Program::value_count`) and available to a
//! downstream consumer as a stable handle distinct from tree position.

use crate::ast::types::TypeCheckType;
use crate::ast::var::VarId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Len,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
    And,
    Or,
}

impl BinaryOperator {
    /// Tighter binds first: `**` > `* / %` > `+ -` > comparisons > `&& ||`.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Pow => 5,
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => 4,
            BinaryOperator::Add | BinaryOperator::Sub => 3,
            BinaryOperator::Eq
            | BinaryOperator::NotEq
            | BinaryOperator::Gt
            | BinaryOperator::Lt
            | BinaryOperator::GtEq
            | BinaryOperator::LtEq => 2,
            BinaryOperator::And | BinaryOperator::Or => 1,
        }
    }

    /// Every binary operator in this language is left-associative, `**`
    /// included — confirmed against the original source's iterative
    /// precedence-climbing loop.
    pub fn is_left_associative(self) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Bool(bool),
    Char(char),
    Long(i64),
    Float(f64),
}

/// A single parsed procedure parameter: its declared type and the `VarId`
/// bound to it inside the procedure's frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcParam {
    pub type_: TypeCheckType,
    pub var: VarId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AstValueKind {
    Primitive(Primitive),
    ArrayLiteral {
        element_type: TypeCheckType,
        elements: Vec<AstValue>,
    },
    AllocArray {
        element_type: TypeCheckType,
        size: Box<AstValue>,
    },
    Var(VarId),
    SetVar {
        var: VarId,
        value: Box<AstValue>,
    },
    GetIndex {
        array: Box<AstValue>,
        index: Box<AstValue>,
    },
    SetIndex {
        array: Box<AstValue>,
        index: Box<AstValue>,
        value: Box<AstValue>,
    },
    UnaryOp {
        op: UnaryOperator,
        operand: Box<AstValue>,
    },
    BinaryOp {
        op: BinaryOperator,
        lhs: Box<AstValue>,
        rhs: Box<AstValue>,
    },
    Proc {
        params: Vec<ProcParam>,
        return_type: TypeCheckType,
        body: Box<crate::ast::program::CodeBlock>,
        /// The implicit `VarId` bound to `thisproc` inside this procedure's
        /// own frame, letting the body recurse by name without the
        /// procedure needing to already be bound in an enclosing scope.
        thisproc_var: VarId,
    },
    ProcCall {
        callee: Box<AstValue>,
        type_args: Vec<TypeCheckType>,
        args: Vec<AstValue>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AstValue {
    pub kind: AstValueKind,
    pub type_: TypeCheckType,
    pub id: usize,
}

impl AstValue {
    pub fn new(id: usize, type_: TypeCheckType, kind: AstValueKind) -> Self {
        AstValue { kind, type_, id }
    }

    /// Counts this node and every value node reachable from it, matching
    /// the traversal `Program::value_count` relies on for its §8 invariant
    /// check.
    pub fn count_nodes(&self) -> usize {
        let children = match &self.kind {
            AstValueKind::Primitive(_) | AstValueKind::Var(_) => 0,
            AstValueKind::ArrayLiteral { elements, .. } => {
                elements.iter().map(AstValue::count_nodes).sum()
            }
            AstValueKind::AllocArray { size, .. } => size.count_nodes(),
            AstValueKind::SetVar { value, .. } => value.count_nodes(),
            AstValueKind::GetIndex { array, index } => array.count_nodes() + index.count_nodes(),
            AstValueKind::SetIndex { array, index, value } => {
                array.count_nodes() + index.count_nodes() + value.count_nodes()
            }
            AstValueKind::UnaryOp { operand, .. } => operand.count_nodes(),
            AstValueKind::BinaryOp { lhs, rhs, .. } => lhs.count_nodes() + rhs.count_nodes(),
            AstValueKind::Proc { body, .. } => body.count_values(),
            AstValueKind::ProcCall { callee, args, .. } => {
                callee.count_nodes() + args.iter().map(AstValue::count_nodes).sum::<usize>()
            }
        };
        1 + children
    }
}
