//! Unified block analysis.
//!
//! Every `{ … }` in Hexen is one of three things, decided purely by the
//! position it appears in - never by its content:
//!
//! - **Function body**: the block after `func … =`. Non-void functions
//!   must return on every path through it.
//! - **Statement block**: a block in statement position. Scoping only;
//!   produces no value, and a `return` inside it returns from the
//!   enclosing function.
//! - **Expression block**: a block in expression position. Its final
//!   statement must be `return expr`, which produces the block's value;
//!   the target type the context expects is propagated into that final
//!   expression, which is how `val x : i64 = { return 42 }` adapts the
//!   literal. A `return` *before* the final statement still returns
//!   from the enclosing function.
//!
//! Classification is compositional: an expression block nested inside a
//! statement block is still an expression block.
//!
//! Each block pushes exactly one scope frame on entry and pops it on
//! exit, so shadowing works the same in all three forms.

use hexc_par::ast;
use hexc_util::{DiagnosticBuilder, DiagnosticCode, FxHashSet, Symbol};

use crate::analysis::SemanticAnalyzer;
use crate::hir;
use crate::scope::ScopeKind;
use crate::types::Type;

/// The syntactic position a block is analyzed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockContext {
    /// Direct child of a `func` definition
    FunctionBody,
    /// Statement position
    Statement,
    /// Expression position, with the type the context expects (if any)
    Expression { target: Option<Type> },
}

/// What analyzing a block produced.
pub(crate) struct BlockResult {
    pub stmts: Vec<hir::Stmt>,
    /// The produced value; `Some` only for expression blocks that ended
    /// in `return expr`
    pub value: Option<hir::Expr>,
    /// `Void` for statement blocks and function bodies
    pub ty: Type,
}

impl SemanticAnalyzer<'_> {
    pub(crate) fn analyze_block(&mut self, block: &ast::Block, ctx: BlockContext) -> BlockResult {
        self.table.enter(ScopeKind::Block);

        let target = match ctx {
            BlockContext::Expression { target } => target,
            _ => None,
        };
        let is_expression = matches!(ctx, BlockContext::Expression { .. });

        let mut stmts = Vec::new();
        let mut value = None;
        let mut ty = Type::Void;

        let count = block.stmts.len();
        for (index, stmt) in block.stmts.iter().enumerate() {
            let is_final = index + 1 == count;

            if is_expression && is_final {
                match stmt {
                    ast::Stmt::Return(ret) if ret.value.is_some() => {
                        let produced =
                            self.analyze_expr(ret.value.as_ref().expect("checked"), target);
                        ty = produced.ty();
                        value = Some(produced);
                    }
                    other => {
                        DiagnosticBuilder::error(
                            "expression block must end with `return <expr>` producing its value",
                        )
                        .code(DiagnosticCode::BLOCK_REQUIRES_FINAL_RETURN)
                        .span(stmt_span(other))
                        .help("add a final `return` with the value this block evaluates to")
                        .emit(self.handler);
                        stmts.push(self.analyze_stmt(other));
                        ty = Type::Unresolved;
                    }
                }
            } else {
                stmts.push(self.analyze_stmt(stmt));
            }
        }

        if is_expression && block.stmts.is_empty() {
            DiagnosticBuilder::error("empty expression block produces no value")
                .code(DiagnosticCode::BLOCK_REQUIRES_FINAL_RETURN)
                .span(block.span)
                .help("add a final `return` with the value this block evaluates to")
                .emit(self.handler);
            ty = Type::Unresolved;
        }

        self.table.leave();

        BlockResult { stmts, value, ty }
    }
}

fn stmt_span(stmt: &ast::Stmt) -> hexc_util::Span {
    match stmt {
        ast::Stmt::Decl(d) => d.span,
        ast::Stmt::Assign(a) => a.span,
        ast::Stmt::Return(r) => r.span,
        ast::Stmt::Expr(e) => e.span(),
        ast::Stmt::Block(b) => b.span,
    }
}

/// Does a linear statement sequence reach a `return` on every path?
///
/// Hexen has no branching statements, so a body terminates exactly when
/// it contains a top-level `return`, or a nested statement block that
/// does. Expression blocks are not inspected: their final `return`
/// produces a value instead of leaving the function.
pub(crate) fn block_terminates(stmts: &[ast::Stmt]) -> bool {
    stmts.iter().any(|stmt| match stmt {
        ast::Stmt::Return(_) => true,
        ast::Stmt::Block(inner) => block_terminates(&inner.stmts),
        _ => false,
    })
}

/// Is this block evaluable entirely at compile time?
///
/// True when the block contains no function calls and references no
/// symbols declared outside the block itself. Used to decide whether an
/// unannotated declaration initialized from an expression block may
/// fall back to default comptime resolution.
///
/// The verdict is cached on the AST node; the predicate is pure, so the
/// cache is write-once.
pub(crate) fn is_comptime_evaluable(block: &ast::Block) -> bool {
    if let Some(cached) = block.comptime_evaluable.get() {
        return cached;
    }
    let mut locals = FxHashSet::default();
    let verdict = block_is_comptime(block, &mut locals);
    block.comptime_evaluable.set(Some(verdict));
    verdict
}

fn block_is_comptime(block: &ast::Block, locals: &mut FxHashSet<Symbol>) -> bool {
    block
        .stmts
        .iter()
        .all(|stmt| stmt_is_comptime(stmt, locals))
}

fn stmt_is_comptime(stmt: &ast::Stmt, locals: &mut FxHashSet<Symbol>) -> bool {
    match stmt {
        ast::Stmt::Decl(decl) => {
            let ok = match &decl.init {
                ast::DeclInit::Expr(expr) => expr_is_comptime(expr, locals),
                // `undef` means a runtime write will follow
                ast::DeclInit::Undef(_) => false,
            };
            locals.insert(decl.name);
            ok
        }
        ast::Stmt::Assign(assign) => {
            locals.contains(&assign.name) && expr_is_comptime(&assign.value, locals)
        }
        ast::Stmt::Return(ret) => ret
            .value
            .as_ref()
            .is_none_or(|value| expr_is_comptime(value, locals)),
        ast::Stmt::Expr(expr) => expr_is_comptime(expr, locals),
        ast::Stmt::Block(inner) => block_is_comptime(inner, locals),
    }
}

fn expr_is_comptime(expr: &ast::Expr, locals: &mut FxHashSet<Symbol>) -> bool {
    match expr {
        ast::Expr::Number(_) | ast::Expr::Str(_) | ast::Expr::Bool(_) => true,
        ast::Expr::Ident(ident) => locals.contains(&ident.name),
        ast::Expr::Unary(unary) => expr_is_comptime(&unary.expr, locals),
        ast::Expr::Binary(binary) => {
            expr_is_comptime(&binary.left, locals) && expr_is_comptime(&binary.right, locals)
        }
        ast::Expr::Conversion(conv) => expr_is_comptime(&conv.expr, locals),
        ast::Expr::Call(_) => false,
        ast::Expr::Block(inner) => block_is_comptime(inner, locals),
    }
}
