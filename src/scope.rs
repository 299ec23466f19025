//! Lexical scope: the frame stack walked during parsing to resolve names
//! and generic type parameters.
//!
//! Frames are keyed by the declared name (`SmolStr`) directly rather than
//! a hash, closing off the collision risk a hash-keyed table would carry.
//! A frame started at a procedure literal's root has no parent: local
//! lookup climbs enclosing block frames (`if`/`while` bodies) but stops the
//! moment it reaches a procedure root, then falls through to the separate
//! global table. Generic lookup never walks the block-frame chain at all —
//! it jumps straight to the nearest enclosing procedure root, since that's
//! the only place generics are ever declared.
//!
//! Every frame also carries a shared handle to its procedure's return type
//! (`None` outside any procedure). Block frames nested inside a procedure
//! clone the *same* handle rather than copying the type, so a `return`
//! statement that concretizes an `auto` return type is visible to every
//! sibling block and every later `return` in the same procedure.

use std::cell::RefCell;
use std::rc::Rc;

use smol_str::SmolStr;

use crate::ast::{TypeCheckType, VarId};
use crate::diag::ErrorKind;
use crate::limits::ParserLimits;

type ReturnTypeCell = Rc<RefCell<TypeCheckType>>;

struct Frame {
    vars: Vec<(SmolStr, VarId)>,
    generics: Vec<SmolStr>,
    is_proc_root: bool,
    return_type: Option<ReturnTypeCell>,
}

impl Frame {
    fn new(is_proc_root: bool, return_type: Option<ReturnTypeCell>) -> Self {
        Frame {
            vars: Vec::new(),
            generics: Vec::new(),
            is_proc_root,
            return_type,
        }
    }
}

/// The error a declaration can fail with: a name already bound in the same
/// frame, or a resource bound exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeError {
    Redeclaration,
    FrameDepthExceeded,
    TooManyGenerics,
}

impl From<ScopeError> for ErrorKind {
    fn from(err: ScopeError) -> Self {
        match err {
            ScopeError::Redeclaration => ErrorKind::Redeclaration,
            ScopeError::FrameDepthExceeded | ScopeError::TooManyGenerics => ErrorKind::Memory,
        }
    }
}

/// The live frame stack maintained while parsing. Block frames (`if`/
/// `while` bodies) and procedure-root frames both live here; globals are
/// tracked separately since they're visible from anywhere.
pub struct FrameStack {
    frames: Vec<Frame>,
    globals: Vec<(SmolStr, VarId)>,
    limits: ParserLimits,
}

impl FrameStack {
    pub fn new(limits: ParserLimits) -> Self {
        FrameStack {
            frames: Vec::new(),
            globals: Vec::new(),
            limits,
        }
    }

    /// The resource bounds this stack enforces.
    pub fn limits(&self) -> ParserLimits {
        self.limits
    }

    /// `true` at the top level, outside any block or procedure frame.
    pub fn is_top_level(&self) -> bool {
        self.frames.is_empty()
    }

    /// Pushes a block frame (`if`/`while` body) that inherits its parent's
    /// return-type handle — `None` if there is no enclosing procedure.
    pub fn push_block_frame(&mut self) -> Result<(), ScopeError> {
        let inherited = self.frames.last().and_then(|f| f.return_type.clone());
        self.push_frame(false, inherited)
    }

    /// Pushes a fresh procedure-root frame. Its return type starts
    /// unset (`None`, same as "outside any procedure") until
    /// [`Self::set_return_type`] is called once the `return T` clause of
    /// the procedure signature has been parsed.
    pub fn push_proc_root_frame(&mut self) -> Result<(), ScopeError> {
        self.push_frame(true, None)
    }

    fn push_frame(
        &mut self,
        is_proc_root: bool,
        return_type: Option<ReturnTypeCell>,
    ) -> Result<(), ScopeError> {
        if self.frames.len() >= self.limits.max_frame_depth {
            return Err(ScopeError::FrameDepthExceeded);
        }
        self.frames.push(Frame::new(is_proc_root, return_type));
        Ok(())
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
    }

    /// Activates the return-type handle of the innermost frame, which must
    /// be a freshly pushed procedure-root frame. Called once, right after
    /// a procedure literal's `return T` clause is parsed, before its body
    /// is parsed — every block frame pushed for the body inherits this
    /// same handle.
    pub fn set_return_type(&mut self, ty: TypeCheckType) {
        if let Some(frame) = self.frames.last_mut() {
            frame.return_type = Some(Rc::new(RefCell::new(ty)));
        }
    }

    /// The return type of the innermost enclosing procedure, or `None`
    /// outside any procedure. `Some` even when that type is still `auto`
    /// and not yet concretized by a `return` statement.
    pub fn return_type(&self) -> Option<TypeCheckType> {
        self.frames
            .last()
            .and_then(|f| f.return_type.as_ref())
            .map(|cell| cell.borrow().clone())
    }

    /// Concretizes the innermost enclosing procedure's `auto` return type
    /// in place, visible to every block frame sharing the same handle.
    pub fn refine_return_type(&mut self, ty: TypeCheckType) {
        if let Some(cell) = self.frames.last().and_then(|f| f.return_type.clone()) {
            *cell.borrow_mut() = ty;
        }
    }

    /// Declares `name` for a plain (non-`global`) statement declaration:
    /// into the innermost frame if one exists, otherwise into the global
    /// table (there is no frame at the very top level to hold a local).
    /// `as_global` forces the global table regardless.
    pub fn declare(&mut self, name: SmolStr, id: VarId, as_global: bool) -> Result<(), ScopeError> {
        if as_global || self.frames.is_empty() {
            self.declare_global(name, id)
        } else {
            self.declare_local(name, id)
        }
    }

    /// Declares `name` as a global.
    fn declare_global(&mut self, name: SmolStr, id: VarId) -> Result<(), ScopeError> {
        if self.globals.iter().any(|(n, _)| *n == name) {
            return Err(ScopeError::Redeclaration);
        }
        self.globals.push((name, id));
        Ok(())
    }

    /// Declares `name` in the innermost active frame. Only the frame's own
    /// bindings are checked for collisions — shadowing an outer frame's
    /// binding of the same name is permitted.
    fn declare_local(&mut self, name: SmolStr, id: VarId) -> Result<(), ScopeError> {
        let frame = self.frames.last_mut().expect("declare_local outside any frame");
        if frame.vars.iter().any(|(n, _)| *n == name) {
            return Err(ScopeError::Redeclaration);
        }
        frame.vars.push((name, id));
        Ok(())
    }

    /// Resolves `name`, walking the block-frame chain up to (and
    /// including) the nearest enclosing procedure root, then falling
    /// through to the globals if nothing local matched.
    pub fn find_var(&self, name: &str) -> Option<VarId> {
        for frame in self.frames.iter().rev() {
            if let Some((_, id)) = frame.vars.iter().find(|(n, _)| n == name) {
                return Some(*id);
            }
            if frame.is_proc_root {
                break;
            }
        }
        self.globals
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
    }

    /// Declares a generic type parameter in the nearest enclosing
    /// procedure-root frame (the frame being declared, when called while
    /// parsing a `proc<...>` signature). Returns its `TypeArg` index.
    pub fn declare_generic(&mut self, name: SmolStr) -> Result<usize, ScopeError> {
        let frame = self.frames.last_mut().expect("declare_generic outside any frame");
        if frame.generics.len() >= self.limits.max_generics_per_frame {
            return Err(ScopeError::TooManyGenerics);
        }
        let index = frame.generics.len();
        frame.generics.push(name);
        Ok(index)
    }

    /// Resolves a generic name to its `TypeArg` index, always ascending
    /// straight to the nearest enclosing procedure-root frame (generics
    /// are never declared in a plain block frame).
    pub fn find_generic(&self, name: &str) -> Option<usize> {
        for frame in self.frames.iter().rev() {
            if frame.is_proc_root {
                return frame.generics.iter().position(|n| n == name);
            }
        }
        None
    }
}
