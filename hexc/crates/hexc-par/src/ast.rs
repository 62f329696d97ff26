//! hexc-par - AST node definitions.
//!
//! The tree produced by the parser and consumed by the semantic
//! analyzer. Nodes record syntax only: numeric literals keep their
//! lexeme, type annotations are surface type names, and no node carries
//! a resolved type (the analyzer produces a typed tree separately,
//! leaving this one structurally untouched).

use std::cell::Cell;
use std::fmt;

use hexc_util::{Span, Symbol};

/// AST root - a source file is a sequence of function definitions.
#[derive(Debug, Clone)]
pub struct Program {
    pub functions: Vec<FnDecl>,
}

/// Function definition
///
/// `func name(params) : ret_type = { body }`
#[derive(Debug, Clone)]
pub struct FnDecl {
    pub name: Symbol,
    pub params: Vec<Param>,
    pub ret_type: TypeExpr,
    pub body: Block,
    pub span: Span,
}

/// Function parameter
#[derive(Debug, Clone)]
pub struct Param {
    pub name: Symbol,
    pub ty: TypeExpr,
    pub span: Span,
}

/// A surface type name.
///
/// Only concrete types can be written in source; the comptime types
/// exist purely inside the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeExpr {
    I32,
    I64,
    F32,
    F64,
    Bool,
    String,
    Void,
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeExpr::I32 => "i32",
            TypeExpr::I64 => "i64",
            TypeExpr::F32 => "f32",
            TypeExpr::F64 => "f64",
            TypeExpr::Bool => "bool",
            TypeExpr::String => "string",
            TypeExpr::Void => "void",
        };
        f.write_str(name)
    }
}

/// Brace-delimited statement sequence.
///
/// Whether a block is a function body, a statement or an expression is
/// not recorded here: the analyzer classifies each block from the
/// position it is reached in, never from its content.
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
    /// Analyzer-filled cache for the comptime-evaluability predicate;
    /// `None` until the block is first inspected.
    pub comptime_evaluable: Cell<Option<bool>>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>, span: Span) -> Self {
        Self {
            stmts,
            span,
            comptime_evaluable: Cell::new(None),
        }
    }
}

/// Statement
#[derive(Debug, Clone)]
pub enum Stmt {
    /// `val`/`mut` declaration
    Decl(DeclStmt),
    /// `name = expr`
    Assign(AssignStmt),
    /// `return expr?`
    Return(ReturnStmt),
    /// Bare expression in statement position
    Expr(Expr),
    /// Nested `{ … }` in statement position
    Block(Block),
}

/// Binding mutability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    /// `val` - immutable, initialized at declaration
    Val,
    /// `mut` - reassignable, may start as `undef`
    Mut,
}

impl fmt::Display for Mutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutability::Val => f.write_str("val"),
            Mutability::Mut => f.write_str("mut"),
        }
    }
}

/// `val name (: type)? = expr` or `mut name (: type)? = undef`
#[derive(Debug, Clone)]
pub struct DeclStmt {
    pub mutability: Mutability,
    pub name: Symbol,
    pub ty: Option<TypeExpr>,
    pub init: DeclInit,
    pub span: Span,
}

/// Right-hand side of a declaration
#[derive(Debug, Clone)]
pub enum DeclInit {
    Expr(Expr),
    Undef(Span),
}

/// `name = expr`
#[derive(Debug, Clone)]
pub struct AssignStmt {
    pub name: Symbol,
    pub value: Expr,
    pub span: Span,
}

/// `return expr?`
#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// Expression
#[derive(Debug, Clone)]
pub enum Expr {
    /// Numeric literal, lexeme preserved verbatim
    Number(NumberLit),
    /// String literal
    Str(StrLit),
    /// Boolean literal
    Bool(BoolLit),
    /// Variable reference
    Ident(IdentExpr),
    /// Prefix operation
    Unary(UnaryExpr),
    /// Infix operation
    Binary(BinaryExpr),
    /// Explicit conversion `expr : type`
    Conversion(ConversionExpr),
    /// `{ … }` in expression position
    Block(Block),
    /// `name(args)`
    Call(CallExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Number(n) => n.span,
            Expr::Str(s) => s.span,
            Expr::Bool(b) => b.span,
            Expr::Ident(i) => i.span,
            Expr::Unary(u) => u.span,
            Expr::Binary(b) => b.span,
            Expr::Conversion(c) => c.span,
            Expr::Block(b) => b.span,
            Expr::Call(c) => c.span,
        }
    }
}

/// Numeric literal
#[derive(Debug, Clone)]
pub struct NumberLit {
    /// The exact source text, e.g. `42` or `3.14e2`
    pub lexeme: Symbol,
    pub span: Span,
}

/// String literal (escapes already decoded by the lexer)
#[derive(Debug, Clone)]
pub struct StrLit {
    pub value: Symbol,
    pub span: Span,
}

/// Boolean literal
#[derive(Debug, Clone)]
pub struct BoolLit {
    pub value: bool,
    pub span: Span,
}

/// Variable reference
#[derive(Debug, Clone)]
pub struct IdentExpr {
    pub name: Symbol,
    pub span: Span,
}

/// Prefix operation
#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub op: UnOp,
    pub expr: Box<Expr>,
    pub span: Span,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    /// `-`
    Neg,
    /// `!`
    Not,
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Not => "!",
        }
    }
}

/// Infix operation
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub op: BinOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/` float division
    Div,
    /// `\` integer division
    IntDiv,
    /// `%`
    Rem,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::IntDiv => "\\",
            BinOp::Rem => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }

    /// True for `+ - * / \ %`.
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::IntDiv | BinOp::Rem
        )
    }

    /// True for `== != < <= > >=`.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge
        )
    }

    /// True for `&& ||`.
    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }

    /// True for `==` and `!=` specifically.
    pub fn is_equality(self) -> bool {
        matches!(self, BinOp::Eq | BinOp::Ne)
    }
}

/// Explicit conversion `expr : type`
#[derive(Debug, Clone)]
pub struct ConversionExpr {
    pub expr: Box<Expr>,
    pub ty: TypeExpr,
    pub span: Span,
}

/// Function call `name(args)`
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: Symbol,
    pub args: Vec<Expr>,
    pub span: Span,
}
