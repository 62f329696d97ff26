//! Diagnostic module - batched error reporting.
//!
//! The compiler collects every user-facing failure as a [`Diagnostic`]
//! in a [`Handler`] and keeps analyzing; callers drain the handler once
//! at the end of a run. There is no exception-style control flow for
//! user errors, and there are no severity levels beyond error/warning
//! in practice (the semantic core only ever emits errors).
//!
//! # Examples
//!
//! ```
//! use hexc_util::diagnostic::{DiagnosticBuilder, DiagnosticCode, Handler};
//! use hexc_util::Span;
//!
//! let handler = Handler::new();
//! DiagnosticBuilder::error("undefined variable `y`")
//!     .code(DiagnosticCode::UNKNOWN_SYMBOL)
//!     .span(Span::new(12, 13, 2, 5))
//!     .emit(&handler);
//!
//! let errors = handler.take();
//! assert_eq!(errors.len(), 1);
//! ```

mod builder;
mod codes;

pub use builder::DiagnosticBuilder;
pub use codes::DiagnosticCode;

use crate::Span;
use std::cell::RefCell;
use std::fmt;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// Prevents compilation
    Error,
    /// Does not prevent compilation
    Warning,
    /// Additional information attached to another diagnostic
    Note,
    /// A suggestion for fixing an issue
    Help,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
            Level::Help => write!(f, "help"),
        }
    }
}

/// A single structured diagnostic.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    /// Main message; names the offending construct and, where relevant,
    /// the expected vs actual type.
    pub message: String,
    pub span: Span,
    pub code: Option<DiagnosticCode>,
    /// Contextual notes
    pub notes: Vec<String>,
    /// Remedial suggestions
    pub helps: Vec<String>,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            message: message.into(),
            span,
            code: None,
            notes: Vec::new(),
            helps: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, message, span)
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Warning, message, span)
    }
}

/// Collects diagnostics for one compilation.
///
/// Each compilation owns its own handler; there is no global state, so
/// parallel compilations cannot observe each other. Interior mutability
/// lets phases that only hold `&Handler` report while traversing.
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Record a diagnostic.
    pub fn emit_diagnostic(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// True if any error-level diagnostic has been recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Warning)
            .count()
    }

    /// Snapshot of all recorded diagnostics, in emission order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Drain all diagnostics, sorted into source order.
    ///
    /// The sort is stable, so diagnostics at the same position keep
    /// their emission order; the result is deterministic for a given
    /// input.
    pub fn take(&self) -> Vec<Diagnostic> {
        let mut diags = std::mem::take(&mut *self.diagnostics.borrow_mut());
        diags.sort_by_key(|d| (d.span.file_id, d.span.start));
        diags
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}
