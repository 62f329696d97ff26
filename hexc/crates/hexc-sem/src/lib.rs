//! hexc-sem - Semantic analyzer for Hexen.
//!
//! ============================================================================
//! OVERVIEW
//! ============================================================================
//!
//! This crate is the heart of the compiler: it consumes the parser's
//! AST and produces a typed tree plus a batch of diagnostics. An empty
//! batch means the program is semantically valid.
//!
//! ```text
//! AST ──► SemanticAnalyzer ──► (typed HIR, [Diagnostic])
//!               │
//!               ├── types:  comptime lattice, operator and conversion rules
//!               ├── scope:  frame stack, shadowing, mutability, init state
//!               ├── block:  expression/statement/body classification
//!               └── hir:    the typed output tree
//! ```
//!
//! The two load-bearing ideas, which the modules above implement
//! together:
//!
//! 1. **Comptime literals.** `42` is `comptime_int` until a context
//!    (annotation, assignment target, return type, parameter) settles
//!    it on a concrete type; `comptime_float` works the same for float
//!    literals. No concrete type ever converts implicitly.
//! 2. **Unified blocks.** Every `{ … }` is classified from its
//!    syntactic position as a function body, a statement block, or an
//!    expression block; expression blocks produce a value through their
//!    final `return`, and the expected type is propagated into it.
//!
//! Analysis is deterministic and single-threaded: given the same AST,
//! the diagnostic list is byte-identical across runs. Each compilation
//! owns its own [`SemanticAnalyzer`], so parallel compilations need no
//! coordination.

pub mod analysis;
pub mod block;
pub mod hir;
pub mod scope;
pub mod types;

#[cfg(test)]
mod edge_cases;

pub use analysis::{FnSig, SemanticAnalyzer};
pub use block::BlockContext;
pub use scope::{ScopeKind, SymbolInfo, SymbolTable};
pub use types::Type;

use hexc_par::ast;
use hexc_util::{Diagnostic, Handler};

/// Analyze a parsed program.
///
/// Pure in the sense that matters: the same AST yields the same typed
/// tree and the same diagnostics, in source order, every time. An empty
/// diagnostic list means the program is valid.
pub fn analyze(program: &ast::Program) -> (hir::Program, Vec<Diagnostic>) {
    let handler = Handler::new();
    let mut analyzer = SemanticAnalyzer::new(&handler);
    let typed = analyzer.analyze_program(program);
    (typed, handler.take())
}
