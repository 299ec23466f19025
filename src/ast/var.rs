//! Variable identity.
//!
//! Frames never hold a `VarInfo` directly — they hold `(name, VarId)` pairs
//! pointing into the arena owned by the `Program`/`Ast` root. This keeps the
//! AST valid after the frame stack that built it is dropped, since nothing
//! in the tree borrows from the stack.

use crate::ast::types::TypeCheckType;

/// A dense, globally unique handle into a `Program`'s variable arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub usize);

/// Everything known about a declared variable, independent of where in the
/// frame stack it was declared.
#[derive(Debug, Clone, PartialEq)]
pub struct VarInfo {
    pub type_: TypeCheckType,
    pub is_global: bool,
    pub is_readonly: bool,
    pub id: VarId,
}

impl VarInfo {
    pub fn new(id: VarId, type_: TypeCheckType, is_global: bool, is_readonly: bool) -> Self {
        VarInfo {
            type_,
            is_global,
            is_readonly,
            id,
        }
    }
}
