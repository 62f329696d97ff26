//! Fluent construction of diagnostics.

use super::{Diagnostic, DiagnosticCode, Handler, Level, Span};

/// Builder for constructing diagnostics with a fluent API.
///
/// # Examples
///
/// ```
/// use hexc_util::diagnostic::{DiagnosticBuilder, DiagnosticCode, Handler};
/// use hexc_util::Span;
///
/// let handler = Handler::new();
/// DiagnosticBuilder::error("cannot assign to immutable variable `x`")
///     .code(DiagnosticCode::IMMUTABLE_ASSIGN)
///     .span(Span::DUMMY)
///     .help("declare it with `mut` to allow reassignment")
///     .emit(&handler);
///
/// assert_eq!(handler.error_count(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct DiagnosticBuilder {
    level: Level,
    message: String,
    span: Span,
    code: Option<DiagnosticCode>,
    notes: Vec<String>,
    helps: Vec<String>,
}

impl DiagnosticBuilder {
    /// Start an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    /// Start a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            span: Span::DUMMY,
            code: None,
            notes: Vec::new(),
            helps: Vec::new(),
        }
    }

    /// Set the source location.
    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Set the diagnostic code.
    pub fn code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach a contextual note (e.g. "expected `i64`, found `i32`").
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Attach a remedial suggestion (e.g. "add an explicit conversion `: i64`").
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.helps.push(help.into());
        self
    }

    /// Finish building without emitting.
    pub fn build(self) -> Diagnostic {
        Diagnostic {
            level: self.level,
            message: self.message,
            span: self.span,
            code: self.code,
            notes: self.notes,
            helps: self.helps,
        }
    }

    /// Finish building and hand the diagnostic to a handler.
    pub fn emit(self, handler: &Handler) {
        handler.emit_diagnostic(self.build());
    }
}
