//! Typed tree produced by the semantic analyzer.
//!
//! The HIR mirrors the AST's shape, but every expression node carries
//! its resolved [`Type`]. For a well-typed program each of those types
//! is concrete on exit from analysis; `Unresolved` appears only where
//! an error was already reported.
//!
//! Expression blocks surface their produced value explicitly: the
//! `return expr` that terminates an expression block in source becomes
//! the block node's `value`, while non-final `return`s stay ordinary
//! statements (they return from the enclosing function).

use hexc_par::ast::{BinOp, Mutability, UnOp};
use hexc_util::Symbol;

use crate::types::Type;

/// HIR root.
#[derive(Debug, Clone)]
pub struct Program {
    pub functions: Vec<Function>,
}

/// A fully analyzed function.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: Symbol,
    pub params: Vec<Param>,
    pub ret_type: Type,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Symbol,
    pub ty: Type,
}

/// A typed statement.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// `val`/`mut` declaration; `init` is `None` for `undef`
    Decl {
        name: Symbol,
        mutability: Mutability,
        ty: Type,
        init: Option<Expr>,
    },
    /// `name = value`
    Assign { name: Symbol, value: Expr },
    /// Function return
    Return(Option<Expr>),
    /// Expression in statement position
    Expr(Expr),
    /// `{ … }` in statement position; produces no value
    Block(Vec<Stmt>),
}

/// A typed expression.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal {
        lit: Literal,
        ty: Type,
    },
    Var {
        name: Symbol,
        ty: Type,
    },
    Unary {
        op: UnOp,
        expr: Box<Expr>,
        ty: Type,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        ty: Type,
    },
    /// Explicit conversion; `ty` is the conversion target
    Convert {
        expr: Box<Expr>,
        ty: Type,
    },
    /// Expression block; `value` is what the final `return` produced
    Block {
        stmts: Vec<Stmt>,
        value: Option<Box<Expr>>,
        ty: Type,
    },
    Call {
        callee: Symbol,
        args: Vec<Expr>,
        ty: Type,
    },
}

/// Literal payloads. Numbers keep their source lexeme; the front-end
/// validates, it does not evaluate.
#[derive(Debug, Clone)]
pub enum Literal {
    Number(Symbol),
    Str(Symbol),
    Bool(bool),
}

impl Expr {
    /// The resolved type of this expression node.
    pub fn ty(&self) -> Type {
        match self {
            Expr::Literal { ty, .. }
            | Expr::Var { ty, .. }
            | Expr::Unary { ty, .. }
            | Expr::Binary { ty, .. }
            | Expr::Convert { ty, .. }
            | Expr::Block { ty, .. }
            | Expr::Call { ty, .. } => *ty,
        }
    }
}

/// Rewrite a comptime-typed expression to the concrete type its context
/// settled on.
///
/// When a whole subtree is still comptime (e.g. `40 + 2` under a
/// `: i64` annotation), the finalized type flows down through every
/// node so that no comptime type survives analysis. The walk follows
/// the operator rules:
///
/// - arithmetic and float division pass the context straight down;
/// - integer division and remainder keep integer operands: under a
///   float context (reachable because `comptime_int` coerces to
///   floats) the operands settle on the default `i32`;
/// - an expression block passes the context into its produced value.
///
/// Nodes that are already concrete are left untouched.
pub fn adapt_comptime(expr: &mut Expr, ctx: Type) {
    if !expr.ty().is_comptime() {
        return;
    }
    debug_assert!(ctx.is_concrete(), "adapting to non-concrete type {ctx}");

    match expr {
        Expr::Literal { ty, .. } => *ty = ctx,
        Expr::Var { .. } | Expr::Call { .. } | Expr::Convert { .. } => {
            unreachable!("node kind can never carry a comptime type")
        }
        Expr::Unary { expr: inner, ty, .. } => {
            *ty = ctx;
            adapt_comptime(inner, ctx);
        }
        Expr::Binary {
            op,
            left,
            right,
            ty,
        } => {
            let operand_ctx = match op {
                BinOp::IntDiv | BinOp::Rem if ctx.is_float() => Type::I32,
                _ => ctx,
            };
            *ty = ctx;
            adapt_comptime(left, operand_ctx);
            adapt_comptime(right, operand_ctx);
        }
        Expr::Block { value, ty, .. } => {
            *ty = ctx;
            if let Some(value) = value {
                adapt_comptime(value, ctx);
            }
        }
    }
}
