//! Lexical scope tracking and the symbol table.
//!
//! Scopes form a strict LIFO stack of frames: the analyzer pushes one
//! frame per function and one per block, and pops it on the way out.
//! Lookup walks innermost-first, which is what makes shadowing across
//! frames work; declaring the same name twice *within* one frame is an
//! error.
//!
//! Frames use [`IndexMap`] so that any iteration over a frame's symbols
//! is deterministic, keeping the analyzer's output byte-identical
//! across runs.

use hexc_par::ast::Mutability;
use hexc_util::{Span, Symbol};
use indexmap::IndexMap;
use thiserror::Error;

use crate::types::Type;

/// What kind of construct opened a scope frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// A function; records the declared return type for `return`
    /// checking anywhere in the body.
    Function { return_type: Type },
    /// A `{ … }` block (statement or expression position alike).
    Block,
}

/// Everything the analyzer knows about one declared variable.
#[derive(Debug, Clone)]
pub struct SymbolInfo {
    pub name: Symbol,
    /// Declared (always concrete) type; `Unresolved` if the declaration
    /// itself failed, so later uses do not cascade.
    pub ty: Type,
    pub mutability: Mutability,
    /// `val` symbols are born initialized; `mut … = undef` symbols flip
    /// to initialized on their first assignment.
    pub initialized: bool,
    /// Where the symbol was declared
    pub span: Span,
}

/// One scope frame.
#[derive(Debug)]
struct ScopeFrame {
    kind: ScopeKind,
    symbols: IndexMap<Symbol, SymbolInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeclareError {
    #[error("`{name}` is already declared in this scope")]
    Duplicate { name: Symbol, original: Span },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AssignError {
    #[error("assignment to undeclared variable `{name}`")]
    Unknown { name: Symbol },
    #[error("cannot assign to immutable variable `{name}`")]
    Immutable { name: Symbol, decl_span: Span },
    #[error("expected `{expected}`, found `{found}`")]
    TypeMismatch { expected: Type, found: Type },
}

/// The symbol table: a stack of scope frames.
pub struct SymbolTable {
    frames: Vec<ScopeFrame>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Push a new frame.
    pub fn enter(&mut self, kind: ScopeKind) {
        self.frames.push(ScopeFrame {
            kind,
            symbols: IndexMap::new(),
        });
    }

    /// Pop the innermost frame.
    ///
    /// # Panics
    ///
    /// Panics if no frame is open; enter/leave imbalance is an internal
    /// analyzer bug, never a user error.
    pub fn leave(&mut self) {
        self.frames
            .pop()
            .expect("scope stack imbalance: leave() without matching enter()");
    }

    /// Number of open frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Declare a symbol in the innermost frame.
    ///
    /// Fails if the frame already holds a symbol with the same name;
    /// shadowing an *outer* frame's symbol is fine.
    pub fn declare(&mut self, info: SymbolInfo) -> Result<(), DeclareError> {
        let frame = self
            .frames
            .last_mut()
            .expect("declare() outside of any scope");
        if let Some(existing) = frame.symbols.get(&info.name) {
            return Err(DeclareError::Duplicate {
                name: info.name,
                original: existing.span,
            });
        }
        frame.symbols.insert(info.name, info);
        Ok(())
    }

    /// Find a symbol, innermost frame first.
    pub fn lookup(&self, name: Symbol) -> Option<&SymbolInfo> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.symbols.get(&name))
    }

    /// Mark the innermost symbol with this name as initialized.
    pub fn mark_initialized(&mut self, name: Symbol) {
        if let Some(info) = self
            .frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.symbols.get_mut(&name))
        {
            info.initialized = true;
        }
    }

    /// Record an assignment `name = value`.
    ///
    /// Fails on unknown names, on `val` bindings, and on a value type
    /// that does not match the declared type. On success the symbol is
    /// marked initialized.
    pub fn assign(&mut self, name: Symbol, value_ty: Type) -> Result<(), AssignError> {
        let info = self
            .frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.symbols.get_mut(&name))
            .ok_or(AssignError::Unknown { name })?;

        if info.mutability == Mutability::Val {
            return Err(AssignError::Immutable {
                name,
                decl_span: info.span,
            });
        }
        if value_ty != info.ty && value_ty != Type::Unresolved && info.ty != Type::Unresolved {
            return Err(AssignError::TypeMismatch {
                expected: info.ty,
                found: value_ty,
            });
        }
        info.initialized = true;
        Ok(())
    }

    /// Return type of the innermost enclosing function frame.
    pub fn return_type(&self) -> Option<Type> {
        self.frames.iter().rev().find_map(|frame| match frame.kind {
            ScopeKind::Function { return_type } => Some(return_type),
            ScopeKind::Block => None,
        })
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
