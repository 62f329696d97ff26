//! hexc-drv - Compiler driver.
//!
//! ============================================================================
//! PIPELINE
//! ============================================================================
//!
//! ```text
//! source (.hxn)
//!      │
//!      ▼
//!   [hexc-lex]  ──► tokens
//!      │
//!      ▼
//!   [hexc-par]  ──► AST
//!      │
//!      ▼
//!   [hexc-sem]  ──► typed HIR + diagnostics
//! ```
//!
//! The driver owns the [`Session`] (one shared diagnostic handler per
//! compilation) and the thin `hexc` CLI on top of it:
//!
//! ```text
//! hexc parse <file.hxn>   print the AST; exit 0 unless syntax errors
//! hexc check <file.hxn>   parse + analyze; one line per error, source
//!                         order; exit 0 iff the program is valid
//! ```
//!
//! Exit codes: 0 success, 1 compile errors, 2 usage or I/O failure.
//! Diagnostics go to stderr, program output (the AST dump) to stdout.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use hexc_lex::Lexer;
use hexc_par::{ast, Parser};
use hexc_sem::{hir, SemanticAnalyzer};
use hexc_util::{Diagnostic, Handler};

/// One compilation: a shared handler that every phase reports into.
pub struct Session {
    handler: Handler,
}

impl Session {
    pub fn new() -> Self {
        Self {
            handler: Handler::new(),
        }
    }

    /// Lex and parse one source string.
    pub fn parse_source(&self, source: &str) -> ast::Program {
        let tokens = Lexer::new(source, &self.handler).tokenize();
        Parser::new(tokens, &self.handler).parse()
    }

    /// Full front-end: parse, then analyze if the syntax was clean.
    ///
    /// Syntax errors are the one fatal condition for the semantic
    /// phase - an AST with holes would only produce noise - so `None`
    /// is returned for the typed program in that case.
    pub fn check_source(&self, source: &str) -> (ast::Program, Option<hir::Program>) {
        let program = self.parse_source(source);
        if self.handler.has_errors() {
            return (program, None);
        }

        let mut analyzer = SemanticAnalyzer::new(&self.handler);
        let typed = analyzer.analyze_program(&program);
        (program, Some(typed))
    }

    pub fn has_errors(&self) -> bool {
        self.handler.has_errors()
    }

    /// Drain all diagnostics, in source order.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.handler.take()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Render one diagnostic the way the CLI prints it:
///
/// ```text
/// demo.hxn:3:9: error[E3004]: cannot assign to immutable variable `x`
///   help: declare it with `mut` to allow reassignment
/// ```
pub fn render_diagnostic(diag: &Diagnostic, path: &Path) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "{}:{}:{}: {}",
        path.display(),
        diag.span.line,
        diag.span.column,
        diag.level
    );
    if let Some(code) = diag.code {
        let _ = write!(out, "[{}]", code);
    }
    let _ = write!(out, ": {}", diag.message);
    for note in &diag.notes {
        let _ = write!(out, "\n  note: {}", note);
    }
    for help in &diag.helps {
        let _ = write!(out, "\n  help: {}", help);
    }
    out
}

/// The CLI surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `hexc parse <file>`
    Parse(PathBuf),
    /// `hexc check <file>`
    Check(PathBuf),
}

impl Command {
    pub fn from_args(args: &[String]) -> Result<Command> {
        match args {
            [cmd, file] if cmd == "parse" => Ok(Command::Parse(PathBuf::from(file))),
            [cmd, file] if cmd == "check" => Ok(Command::Check(PathBuf::from(file))),
            [cmd] if cmd == "parse" || cmd == "check" => {
                bail!("usage: hexc {} <file.hxn>", cmd)
            }
            [] => bail!("usage: hexc <parse|check> <file.hxn>"),
            [cmd, ..] => bail!("unknown command `{}`; expected `parse` or `check`", cmd),
        }
    }
}

/// Run the CLI; returns the process exit code.
pub fn run() -> Result<i32> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::from_args(&args)?;

    match command {
        Command::Parse(path) => {
            let source = read_source(&path)?;
            let session = Session::new();
            let program = session.parse_source(&source);
            let diagnostics = session.finish();

            for diag in &diagnostics {
                eprintln!("{}", render_diagnostic(diag, &path));
            }
            if diagnostics.is_empty() {
                println!("{:#?}", program);
                Ok(0)
            } else {
                Ok(1)
            }
        }
        Command::Check(path) => {
            let source = read_source(&path)?;
            let session = Session::new();
            session.check_source(&source);
            let diagnostics = session.finish();

            for diag in &diagnostics {
                eprintln!("{}", render_diagnostic(diag, &path));
            }
            Ok(if diagnostics.is_empty() { 0 } else { 1 })
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("cannot read `{}`", path.display()))
}
