//! The semantic analyzer driver.
//!
//! One traversal per function: signatures are collected first (so calls
//! can reference functions defined later in the file), then each body
//! is analyzed statement by statement. Expression analysis threads an
//! explicit `target: Option<Type>` down the tree - never ambient state -
//! which is what drives comptime literal adaptation.
//!
//! Failure is never fatal: an expression that cannot be typed yields
//! `Type::Unresolved` and analysis keeps going. An operation that sees
//! an `Unresolved` operand is silently `Unresolved` itself, so only the
//! root cause of a type error is reported. Malformed input that the
//! parser could never produce (and scope imbalance) panics: those are
//! compiler bugs, not user errors.

use hexc_par::ast;
use hexc_util::{DiagnosticBuilder, DiagnosticCode, FxHashMap, Handler, Span, Symbol};

use crate::block::{block_terminates, is_comptime_evaluable, BlockContext};
use crate::hir::{self, adapt_comptime};
use crate::scope::{AssignError, DeclareError, ScopeKind, SymbolInfo, SymbolTable};
use crate::types::{self, BinaryTypeError, Type};

/// A collected function signature, available to every call site.
#[derive(Debug, Clone)]
pub struct FnSig {
    pub name: Symbol,
    pub params: Vec<Type>,
    pub ret_type: Type,
    pub span: Span,
}

/// The semantic analyzer for one compilation.
///
/// Owns the scope stack and the function table; holds no global state,
/// so independent compilations may run in parallel with one analyzer
/// each.
pub struct SemanticAnalyzer<'h> {
    pub(crate) handler: &'h Handler,
    pub(crate) table: SymbolTable,
    functions: FxHashMap<Symbol, FnSig>,
}

impl<'h> SemanticAnalyzer<'h> {
    pub fn new(handler: &'h Handler) -> Self {
        Self {
            handler,
            table: SymbolTable::new(),
            functions: FxHashMap::default(),
        }
    }

    /// Analyze a whole program, producing the typed tree.
    pub fn analyze_program(&mut self, program: &ast::Program) -> hir::Program {
        self.collect_signatures(program);

        let functions = program
            .functions
            .iter()
            .map(|func| self.analyze_fn(func))
            .collect();

        debug_assert_eq!(self.table.depth(), 0, "scope stack not drained");
        hir::Program { functions }
    }

    /// First pass: record every function's signature so forward calls
    /// resolve.
    fn collect_signatures(&mut self, program: &ast::Program) {
        for func in &program.functions {
            let params = func
                .params
                .iter()
                .map(|param| {
                    let ty = type_of(param.ty);
                    if ty == Type::Void {
                        DiagnosticBuilder::error(format!(
                            "parameter `{}` cannot have type `void`",
                            param.name
                        ))
                        .code(DiagnosticCode::TYPE_MISMATCH)
                        .span(param.span)
                        .help("`void` is only meaningful as a function return type")
                        .emit(self.handler);
                        Type::Unresolved
                    } else {
                        ty
                    }
                })
                .collect();

            let sig = FnSig {
                name: func.name,
                params,
                ret_type: type_of(func.ret_type),
                span: func.span,
            };

            if let Some(existing) = self.functions.get(&func.name) {
                DiagnosticBuilder::error(format!(
                    "function `{}` is already defined",
                    func.name
                ))
                .code(DiagnosticCode::DUPLICATE_SYMBOL)
                .span(func.span)
                .note(format!("first defined on line {}", existing.span.line))
                .emit(self.handler);
            } else {
                self.functions.insert(func.name, sig);
            }
        }
    }

    fn analyze_fn(&mut self, func: &ast::FnDecl) -> hir::Function {
        let ret_type = type_of(func.ret_type);
        self.table.enter(ScopeKind::Function { return_type: ret_type });

        let mut params = Vec::new();
        for param in &func.params {
            let ty = match type_of(param.ty) {
                Type::Void => Type::Unresolved, // reported during collection
                ty => ty,
            };
            let declared = self.table.declare(SymbolInfo {
                name: param.name,
                ty,
                mutability: ast::Mutability::Val,
                initialized: true,
                span: param.span,
            });
            if let Err(DeclareError::Duplicate { name, .. }) = declared {
                DiagnosticBuilder::error(format!("parameter `{}` is declared twice", name))
                    .code(DiagnosticCode::DUPLICATE_SYMBOL)
                    .span(param.span)
                    .emit(self.handler);
            }
            params.push(hir::Param {
                name: param.name,
                ty,
            });
        }

        let body = self.analyze_block(&func.body, BlockContext::FunctionBody);

        if ret_type != Type::Void && !block_terminates(&func.body.stmts) {
            DiagnosticBuilder::error(format!(
                "function `{}` returning `{}` does not return on all paths",
                func.name, ret_type
            ))
            .code(DiagnosticCode::MISSING_RETURN)
            .span(func.body.span)
            .help("add a `return` statement at the end of the body")
            .emit(self.handler);
        }

        self.table.leave();

        hir::Function {
            name: func.name,
            params,
            ret_type,
            body: body.stmts,
        }
    }

    // =========================================================================
    // STATEMENTS
    // =========================================================================

    pub(crate) fn analyze_stmt(&mut self, stmt: &ast::Stmt) -> hir::Stmt {
        match stmt {
            ast::Stmt::Decl(decl) => self.analyze_decl(decl),
            ast::Stmt::Assign(assign) => self.analyze_assign(assign),
            ast::Stmt::Return(ret) => self.analyze_return(ret),
            ast::Stmt::Expr(expr) => {
                let mut value = self.analyze_expr(expr, None);
                finalize_defaults(&mut value);
                hir::Stmt::Expr(value)
            }
            ast::Stmt::Block(block) => {
                let result = self.analyze_block(block, BlockContext::Statement);
                hir::Stmt::Block(result.stmts)
            }
        }
    }

    fn analyze_decl(&mut self, decl: &ast::DeclStmt) -> hir::Stmt {
        let mut annotation = None;
        let mut annotation_invalid = false;
        if let Some(ty_expr) = decl.ty {
            match type_of(ty_expr) {
                Type::Void => {
                    DiagnosticBuilder::error(format!(
                        "variable `{}` cannot be declared `void`",
                        decl.name
                    ))
                    .code(DiagnosticCode::TYPE_MISMATCH)
                    .span(decl.span)
                    .help("`void` is only meaningful as a function return type")
                    .emit(self.handler);
                    annotation_invalid = true;
                }
                ty => annotation = Some(ty),
            }
        }

        let (declared_ty, init, initialized) = match &decl.init {
            ast::DeclInit::Undef(undef_span) => {
                if annotation.is_none() && !annotation_invalid {
                    DiagnosticBuilder::error(format!(
                        "`undef` requires an explicit type annotation on `{}`",
                        decl.name
                    ))
                    .code(DiagnosticCode::UNDEF_REQUIRES_ANNOTATION)
                    .span(*undef_span)
                    .help("annotate the declaration, e.g. `: i32`")
                    .emit(self.handler);
                }
                if decl.mutability == ast::Mutability::Val {
                    DiagnosticBuilder::error(format!(
                        "`val {}` cannot be initialized with `undef`",
                        decl.name
                    ))
                    .code(DiagnosticCode::UNDEF_REQUIRES_MUT)
                    .span(decl.span)
                    .help("use `mut` for variables that are assigned later")
                    .emit(self.handler);
                }
                (annotation.unwrap_or(Type::Unresolved), None, false)
            }
            ast::DeclInit::Expr(expr) => {
                let mut value = self.analyze_expr(expr, annotation);
                let value_ty = value.ty();

                let declared = if let Some(ann) = annotation {
                    // Errors against the annotation were reported while
                    // analyzing the initializer; the symbol keeps the
                    // annotated type either way so later uses resolve.
                    ann
                } else if annotation_invalid || value_ty == Type::Unresolved {
                    Type::Unresolved
                } else if value_ty == Type::Void {
                    DiagnosticBuilder::error(format!(
                        "initializer of `{}` has type `void`",
                        decl.name
                    ))
                    .code(DiagnosticCode::TYPE_MISMATCH)
                    .span(expr.span())
                    .help("a call to a `void` function produces no value to bind")
                    .emit(self.handler);
                    Type::Unresolved
                } else if value_ty.is_comptime() {
                    self.finalize_comptime_initializer(decl, expr, &mut value, value_ty)
                } else {
                    value_ty
                };

                // Error paths above can leave the initializer comptime;
                // settle it so no comptime type leaks out of analysis.
                finalize_defaults(&mut value);

                (declared, Some(value), true)
            }
        };

        self.declare_symbol(decl, declared_ty, initialized);

        hir::Stmt::Decl {
            name: decl.name,
            mutability: decl.mutability,
            ty: declared_ty,
            init,
        }
    }

    /// Default-resolve an unannotated declaration whose initializer is
    /// still comptime. An expression-block initializer must be
    /// compile-time evaluable for the default rule to apply.
    fn finalize_comptime_initializer(
        &mut self,
        decl: &ast::DeclStmt,
        expr: &ast::Expr,
        value: &mut hir::Expr,
        value_ty: Type,
    ) -> Type {
        if let ast::Expr::Block(block) = expr {
            if !is_comptime_evaluable(block) {
                DiagnosticBuilder::error(format!(
                    "cannot infer a type for `{}` from this block",
                    decl.name
                ))
                .code(DiagnosticCode::TYPE_MISMATCH)
                .span(decl.span)
                .note("the block is not compile-time evaluable")
                .help("add a type annotation, e.g. `: i32`")
                .emit(self.handler);
                return Type::Unresolved;
            }
        }
        let resolved = value_ty.default_concrete();
        adapt_comptime(value, resolved);
        resolved
    }

    fn declare_symbol(&mut self, decl: &ast::DeclStmt, ty: Type, initialized: bool) {
        let result = self.table.declare(SymbolInfo {
            name: decl.name,
            ty,
            mutability: decl.mutability,
            initialized,
            span: decl.span,
        });
        if let Err(DeclareError::Duplicate { name, original }) = result {
            DiagnosticBuilder::error(format!("`{}` is already declared in this scope", name))
                .code(DiagnosticCode::DUPLICATE_SYMBOL)
                .span(decl.span)
                .note(format!("first declared on line {}", original.line))
                .help("shadowing is only allowed in a nested scope")
                .emit(self.handler);
        }
    }

    fn analyze_assign(&mut self, assign: &ast::AssignStmt) -> hir::Stmt {
        let Some(info) = self.table.lookup(assign.name).cloned() else {
            DiagnosticBuilder::error(format!(
                "assignment to undeclared variable `{}`",
                assign.name
            ))
            .code(DiagnosticCode::UNKNOWN_SYMBOL)
            .span(assign.span)
            .help("declare it first with `val` or `mut`")
            .emit(self.handler);

            let mut value = self.analyze_expr(&assign.value, None);
            finalize_defaults(&mut value);
            return hir::Stmt::Assign {
                name: assign.name,
                value,
            };
        };

        let target = (info.ty != Type::Unresolved).then_some(info.ty);
        let mut value = self.analyze_expr(&assign.value, target);
        if target.is_none() {
            finalize_defaults(&mut value);
        }

        if info.mutability == ast::Mutability::Val {
            DiagnosticBuilder::error(format!(
                "cannot assign to immutable variable `{}`",
                assign.name
            ))
            .code(DiagnosticCode::IMMUTABLE_ASSIGN)
            .span(assign.span)
            .note(format!("declared with `val` on line {}", info.span.line))
            .help("declare it with `mut` to allow reassignment")
            .emit(self.handler);
        } else {
            match self.table.assign(assign.name, value.ty()) {
                Ok(()) => {}
                Err(AssignError::TypeMismatch { expected, found }) => {
                    // Contextual analysis normally reports this first;
                    // kept as a backstop for unannotatable values.
                    DiagnosticBuilder::error(format!(
                        "mismatched types in assignment to `{}`: expected `{}`, found `{}`",
                        assign.name, expected, found
                    ))
                    .code(DiagnosticCode::TYPE_MISMATCH)
                    .span(assign.span)
                    .emit(self.handler);
                }
                Err(AssignError::Unknown { .. } | AssignError::Immutable { .. }) => {
                    unreachable!("checked before calling assign")
                }
            }
        }

        hir::Stmt::Assign {
            name: assign.name,
            value,
        }
    }

    fn analyze_return(&mut self, ret: &ast::ReturnStmt) -> hir::Stmt {
        let ret_type = self
            .table
            .return_type()
            .expect("return statement outside of a function body");

        match (&ret.value, ret_type) {
            (None, Type::Void) => hir::Stmt::Return(None),
            (Some(value), Type::Void) => {
                let mut value = self.analyze_expr(value, None);
                finalize_defaults(&mut value);
                DiagnosticBuilder::error("function returns `void` but this `return` has a value")
                    .code(DiagnosticCode::VOID_RETURNS_VALUE)
                    .span(ret.span)
                    .help("drop the value, or give the function a return type")
                    .emit(self.handler);
                hir::Stmt::Return(Some(value))
            }
            (None, expected) => {
                DiagnosticBuilder::error(format!(
                    "bare `return` in a function returning `{}`",
                    expected
                ))
                .code(DiagnosticCode::TYPE_MISMATCH)
                .span(ret.span)
                .help(format!("return a value of type `{}`", expected))
                .emit(self.handler);
                hir::Stmt::Return(None)
            }
            (Some(value), expected) => {
                let target = (expected != Type::Unresolved).then_some(expected);
                let value = self.analyze_expr(value, target);
                hir::Stmt::Return(Some(value))
            }
        }
    }

    // =========================================================================
    // EXPRESSIONS
    // =========================================================================

    /// Type an expression, adapting comptime results to `target` when
    /// one is given. With no target the result may stay comptime; every
    /// binding point either supplies a target or applies default
    /// resolution.
    pub(crate) fn analyze_expr(&mut self, expr: &ast::Expr, target: Option<Type>) -> hir::Expr {
        match expr {
            ast::Expr::Number(number) => {
                let ty = types::classify_number(number.lexeme.as_str());
                let lit = hir::Expr::Literal {
                    lit: hir::Literal::Number(number.lexeme),
                    ty,
                };
                self.finish(lit, target, number.span)
            }
            ast::Expr::Str(string) => {
                let lit = hir::Expr::Literal {
                    lit: hir::Literal::Str(string.value),
                    ty: Type::String,
                };
                self.finish(lit, target, string.span)
            }
            ast::Expr::Bool(boolean) => {
                let lit = hir::Expr::Literal {
                    lit: hir::Literal::Bool(boolean.value),
                    ty: Type::Bool,
                };
                self.finish(lit, target, boolean.span)
            }
            ast::Expr::Ident(ident) => self.analyze_ident(ident, target),
            ast::Expr::Unary(unary) => self.analyze_unary(unary, target),
            ast::Expr::Binary(binary) => self.analyze_binary(binary, target),
            ast::Expr::Conversion(conv) => self.analyze_conversion(conv, target),
            ast::Expr::Block(block) => {
                let result = self.analyze_block(block, BlockContext::Expression { target });
                hir::Expr::Block {
                    stmts: result.stmts,
                    value: result.value.map(Box::new),
                    ty: result.ty,
                }
            }
            ast::Expr::Call(call) => self.analyze_call(call, target),
        }
    }

    fn analyze_ident(&mut self, ident: &ast::IdentExpr, target: Option<Type>) -> hir::Expr {
        let Some(info) = self.table.lookup(ident.name).cloned() else {
            DiagnosticBuilder::error(format!("undefined variable `{}`", ident.name))
                .code(DiagnosticCode::UNKNOWN_SYMBOL)
                .span(ident.span)
                .help("declare it with `val` or `mut` before use")
                .emit(self.handler);
            return hir::Expr::Var {
                name: ident.name,
                ty: Type::Unresolved,
            };
        };

        if !info.initialized {
            DiagnosticBuilder::error(format!(
                "use of uninitialized variable `{}`",
                ident.name
            ))
            .code(DiagnosticCode::UNINITIALIZED_READ)
            .span(ident.span)
            .note(format!("declared with `undef` on line {}", info.span.line))
            .help(format!("assign to `{}` before reading it", ident.name))
            .emit(self.handler);
        }

        let var = hir::Expr::Var {
            name: ident.name,
            ty: info.ty,
        };
        self.finish(var, target, ident.span)
    }

    fn analyze_unary(&mut self, unary: &ast::UnaryExpr, target: Option<Type>) -> hir::Expr {
        let operand = self.analyze_expr(&unary.expr, None);
        let operand_ty = operand.ty();

        let ty = if operand_ty == Type::Unresolved {
            Type::Unresolved
        } else {
            match unary.op {
                ast::UnOp::Neg if operand_ty.is_numeric() => operand_ty,
                ast::UnOp::Neg => {
                    DiagnosticBuilder::error(format!("cannot negate `{}`", operand_ty))
                        .code(DiagnosticCode::TYPE_MISMATCH)
                        .span(unary.span)
                        .help("`-` applies to numeric operands")
                        .emit(self.handler);
                    Type::Unresolved
                }
                ast::UnOp::Not if operand_ty == Type::Bool => Type::Bool,
                ast::UnOp::Not => {
                    DiagnosticBuilder::error(format!(
                        "`!` requires a `bool` operand, found `{}`",
                        operand_ty
                    ))
                    .code(DiagnosticCode::NON_BOOL_IN_LOGICAL)
                    .span(unary.span)
                    .emit(self.handler);
                    Type::Unresolved
                }
            }
        };

        let node = hir::Expr::Unary {
            op: unary.op,
            expr: Box::new(operand),
            ty,
        };
        self.finish(node, target, unary.span)
    }

    fn analyze_binary(&mut self, binary: &ast::BinaryExpr, target: Option<Type>) -> hir::Expr {
        // Children first, without a target: operand types are inspected
        // before any comptime side is re-resolved against the other.
        let mut left = self.analyze_expr(&binary.left, None);
        let mut right = self.analyze_expr(&binary.right, None);
        let left_ty = left.ty();
        let right_ty = right.ty();

        let ty = if left_ty == Type::Unresolved || right_ty == Type::Unresolved {
            // Root cause already reported; stay silent.
            Type::Unresolved
        } else {
            self.binary_op_type(binary, left_ty, right_ty, target, &mut left, &mut right)
        };

        let node = hir::Expr::Binary {
            op: binary.op,
            left: Box::new(left),
            right: Box::new(right),
            ty,
        };
        self.finish(node, target, binary.span)
    }

    fn binary_op_type(
        &mut self,
        binary: &ast::BinaryExpr,
        left_ty: Type,
        right_ty: Type,
        target: Option<Type>,
        left: &mut hir::Expr,
        right: &mut hir::Expr,
    ) -> Type {
        use ast::BinOp::*;

        let op = binary.op;

        if op.is_logical() {
            let mut ok = true;
            if left_ty != Type::Bool {
                self.non_bool_operand(op, "left", left_ty, binary.left.span());
                ok = false;
            }
            if right_ty != Type::Bool {
                self.non_bool_operand(op, "right", right_ty, binary.right.span());
                ok = false;
            }
            return if ok { Type::Bool } else { Type::Unresolved };
        }

        let result = match op {
            Add | Sub | Mul => types::arithmetic_result(left_ty, right_ty),
            Div => types::float_division_result(left_ty, right_ty, target),
            IntDiv | Rem => types::integer_division_result(left_ty, right_ty),
            Eq | Ne => types::comparison_result(left_ty, right_ty, true),
            Lt | Le | Gt | Ge => types::comparison_result(left_ty, right_ty, false),
            And | Or => unreachable!("handled above"),
        };

        match result {
            Ok(ty) => {
                // Settle comptime operand nodes on the unified operand
                // type. When both sides are comptime the parent context
                // adapts through this node instead; comparisons have no
                // such parent flow (their result is bool), so they
                // settle on the default right here.
                if let Ok(unified) = types::unify_operands(left_ty, right_ty) {
                    let operand_ty = if op.is_comparison() {
                        unified.default_concrete()
                    } else {
                        unified
                    };
                    if operand_ty.is_concrete() {
                        adapt_comptime(left, operand_ty);
                        adapt_comptime(right, operand_ty);
                    }
                }
                ty
            }
            Err(error) => {
                self.report_binary_error(binary, error);
                Type::Unresolved
            }
        }
    }

    fn non_bool_operand(&mut self, op: ast::BinOp, side: &str, found: Type, span: Span) {
        DiagnosticBuilder::error(format!(
            "{} operand of `{}` must be `bool`, found `{}`",
            side,
            op.symbol(),
            found
        ))
        .code(DiagnosticCode::NON_BOOL_IN_LOGICAL)
        .span(span)
        .emit(self.handler);
    }

    fn report_binary_error(&mut self, binary: &ast::BinaryExpr, error: BinaryTypeError) {
        let op = binary.op.symbol();
        match error {
            BinaryTypeError::MixedConcrete { left, right } => {
                let suggest = if right.is_concrete() { right } else { left };
                DiagnosticBuilder::error(format!(
                    "operator `{}` mixes `{}` and `{}`",
                    op, left, right
                ))
                .code(DiagnosticCode::TYPE_MISMATCH)
                .span(binary.span)
                .help(format!(
                    "add an explicit conversion so both operands share one type, e.g. `: {}`",
                    suggest
                ))
                .emit(self.handler);
            }
            BinaryTypeError::NonNumeric { found } => {
                DiagnosticBuilder::error(format!(
                    "operator `{}` requires numeric operands, found `{}`",
                    op, found
                ))
                .code(DiagnosticCode::TYPE_MISMATCH)
                .span(binary.span)
                .emit(self.handler);
            }
            BinaryTypeError::NonInteger { found } => {
                let help = if binary.op == ast::BinOp::IntDiv {
                    "use `/` if a float result is intended, or convert the operand to an integer type"
                } else {
                    "convert the operand to an integer type first"
                };
                DiagnosticBuilder::error(format!(
                    "operator `{}` requires integer operands, found `{}`",
                    op, found
                ))
                .code(DiagnosticCode::NON_INTEGER_IN_INT_DIVISION)
                .span(binary.span)
                .help(help)
                .emit(self.handler);
            }
            BinaryTypeError::Incomparable { left, right } => {
                DiagnosticBuilder::error(format!(
                    "cannot compare `{}` with `{}`",
                    left, right
                ))
                .code(DiagnosticCode::TYPE_MISMATCH)
                .span(binary.span)
                .emit(self.handler);
            }
        }
    }

    fn analyze_conversion(
        &mut self,
        conv: &ast::ConversionExpr,
        target: Option<Type>,
    ) -> hir::Expr {
        let mut inner = self.analyze_expr(&conv.expr, None);
        let inner_ty = inner.ty();
        let to = type_of(conv.ty);

        let ty = if inner_ty == Type::Unresolved {
            Type::Unresolved
        } else {
            match types::conversion_result(inner_ty, to) {
                Ok((source, result)) => {
                    adapt_comptime(&mut inner, source);
                    result
                }
                Err(error) => {
                    DiagnosticBuilder::error(format!(
                        "cannot convert `{}` to `{}`",
                        error.from, error.to
                    ))
                    .code(DiagnosticCode::INVALID_COERCION)
                    .span(conv.span)
                    .help("conversions are only defined between numeric types")
                    .emit(self.handler);
                    finalize_defaults(&mut inner);
                    Type::Unresolved
                }
            }
        };

        let node = hir::Expr::Convert {
            expr: Box::new(inner),
            ty,
        };
        self.finish(node, target, conv.span)
    }

    fn analyze_call(&mut self, call: &ast::CallExpr, target: Option<Type>) -> hir::Expr {
        let Some(sig) = self.functions.get(&call.callee).cloned() else {
            DiagnosticBuilder::error(format!("call to undefined function `{}`", call.callee))
                .code(DiagnosticCode::UNKNOWN_SYMBOL)
                .span(call.span)
                .help("functions must be defined in the same program")
                .emit(self.handler);

            let args = call
                .args
                .iter()
                .map(|arg| {
                    let mut value = self.analyze_expr(arg, None);
                    finalize_defaults(&mut value);
                    value
                })
                .collect();
            return hir::Expr::Call {
                callee: call.callee,
                args,
                ty: Type::Unresolved,
            };
        };

        if sig.params.len() != call.args.len() {
            DiagnosticBuilder::error(format!(
                "function `{}` expects {} argument(s), {} supplied",
                call.callee,
                sig.params.len(),
                call.args.len()
            ))
            .code(DiagnosticCode::TYPE_MISMATCH)
            .span(call.span)
            .note(format!("defined on line {}", sig.span.line))
            .emit(self.handler);
        }

        let args = call
            .args
            .iter()
            .enumerate()
            .map(|(index, arg)| {
                let param = sig.params.get(index).copied().filter(|ty| ty.is_concrete());
                let mut value = self.analyze_expr(arg, param);
                if param.is_none() {
                    finalize_defaults(&mut value);
                }
                value
            })
            .collect();

        let node = hir::Expr::Call {
            callee: call.callee,
            args,
            ty: sig.ret_type,
        };
        self.finish(node, target, call.span)
    }

    /// Apply a target type to a just-analyzed expression.
    ///
    /// Comptime results adapt through the whole subtree; a concrete
    /// result must already match (there are no implicit concrete
    /// conversions). `Unresolved` passes through silently - the root
    /// cause was reported where it happened.
    fn finish(&mut self, mut expr: hir::Expr, target: Option<Type>, span: Span) -> hir::Expr {
        let found = expr.ty();
        let Some(expected) = target else {
            return expr;
        };
        if found == Type::Unresolved {
            return expr;
        }

        if types::can_coerce(found, expected) {
            if found.is_comptime() {
                adapt_comptime(&mut expr, expected);
            }
            return expr;
        }

        if found.is_comptime() {
            let help = if expected.is_numeric() {
                format!("use an explicit conversion `: {}`", expected)
            } else {
                "numeric literals only adapt to numeric types".to_string()
            };
            DiagnosticBuilder::error(format!(
                "cannot coerce `{}` to `{}`",
                found, expected
            ))
            .code(DiagnosticCode::INVALID_COERCION)
            .span(span)
            .help(help)
            .emit(self.handler);
            // Settle the literal on its default so no comptime type
            // leaks out of analysis.
            finalize_defaults(&mut expr);
        } else {
            let mut builder = DiagnosticBuilder::error(format!(
                "mismatched types: expected `{}`, found `{}`",
                expected, found
            ))
            .code(DiagnosticCode::TYPE_MISMATCH)
            .span(span);
            if found.is_numeric() && expected.is_numeric() {
                builder = builder.help(format!("add an explicit conversion `: {}`", expected));
            }
            builder.emit(self.handler);
        }
        expr
    }
}

/// Lower a surface type name to a semantic type.
fn type_of(ty: ast::TypeExpr) -> Type {
    match ty {
        ast::TypeExpr::I32 => Type::I32,
        ast::TypeExpr::I64 => Type::I64,
        ast::TypeExpr::F32 => Type::F32,
        ast::TypeExpr::F64 => Type::F64,
        ast::TypeExpr::Bool => Type::Bool,
        ast::TypeExpr::String => Type::String,
        ast::TypeExpr::Void => Type::Void,
    }
}

/// Settle any remaining comptime type on its default resolution.
fn finalize_defaults(expr: &mut hir::Expr) {
    let ty = expr.ty();
    if ty.is_comptime() {
        adapt_comptime(expr, ty.default_concrete());
    }
}
