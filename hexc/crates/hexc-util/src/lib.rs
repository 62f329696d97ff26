//! hexc-util - Shared infrastructure for the Hexen compiler.
//!
//! Every phase of the pipeline depends on this crate for:
//!
//! - [`span`]: source locations (`Span`, `FileId`) attached to tokens,
//!   AST nodes and diagnostics.
//! - [`symbol`]: interned strings (`Symbol`) for identifiers and
//!   literal lexemes, giving O(1) comparison.
//! - [`diagnostic`]: batched error reporting (`Diagnostic`, `Handler`,
//!   `DiagnosticBuilder`, `DiagnosticCode`).
//! - [`error`]: `UtilError` for infrastructure failures, which are not
//!   user errors and never become diagnostics.
//!
//! The compiler never aborts on the first user error; phases report
//! into a shared [`Handler`] and keep going. Internal invariant
//! violations, by contrast, panic: they are compiler bugs, not user
//! errors.

pub mod diagnostic;
pub mod error;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Handler, Level};
pub use error::{UtilError, UtilResult};
pub use span::{FileId, Span};
pub use symbol::Symbol;

// Re-export commonly used hash collections
pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
