//! Parser resource bounds, expressed as a plain configuration struct rather
//! than hardcoded constants, following this codebase's `ValidationConfig`
//! convention of making resource limits an explicit, overridable value.

use crate::ast::types::TYPE_MAX_SUBTYPES;

/// Bounds enforced while parsing. Defaults match the original numbers
/// exactly, so default behavior is unchanged; embedding contexts that need
/// tighter bounds (fuzzing harnesses, sandboxes) can supply their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserLimits {
    /// Maximum nesting depth of procedure frames (procedure-in-procedure
    /// literals), including the top-level global frame.
    pub max_frame_depth: usize,
    /// Maximum number of generic type parameters a single procedure frame
    /// may declare.
    pub max_generics_per_frame: usize,
    /// Maximum sub-types a single `Array`/`Proc` type may carry.
    pub max_sub_types: usize,
    /// Maximum parameters a single procedure literal may declare
    /// (`max_sub_types - 1`, since a `Proc` type's first sub-type is its
    /// return type).
    pub max_proc_params: usize,
}

impl Default for ParserLimits {
    fn default() -> Self {
        ParserLimits {
            max_frame_depth: 32,
            max_generics_per_frame: 100,
            max_sub_types: TYPE_MAX_SUBTYPES,
            max_proc_params: TYPE_MAX_SUBTYPES - 1,
        }
    }
}
