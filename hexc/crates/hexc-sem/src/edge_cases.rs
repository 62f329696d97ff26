//! End-to-end analyzer coverage: whole programs in, diagnostics out.

use hexc_lex::Lexer;
use hexc_par::Parser;
use hexc_util::{Diagnostic, DiagnosticCode, Handler};

use crate::hir;
use crate::types::Type;

fn check(source: &str) -> (hir::Program, Vec<Diagnostic>) {
    let handler = Handler::new();
    let tokens = Lexer::new(source, &handler).tokenize();
    let program = Parser::new(tokens, &handler).parse();
    let diags = handler.take();
    assert!(diags.is_empty(), "fixture has syntax errors: {:?}", diags);
    crate::analyze(&program)
}

fn check_ok(source: &str) -> hir::Program {
    let (typed, diags) = check(source);
    assert!(diags.is_empty(), "unexpected errors: {:?}", diags);
    typed
}

fn codes(diags: &[Diagnostic]) -> Vec<DiagnosticCode> {
    diags.iter().filter_map(|d| d.code).collect()
}

/// Find the declared type of `name` anywhere in a function body.
fn decl_type(stmts: &[hir::Stmt], name: &str) -> Option<Type> {
    for stmt in stmts {
        match stmt {
            hir::Stmt::Decl {
                name: decl_name,
                ty,
                init,
                ..
            } => {
                if decl_name.as_str() == name {
                    return Some(*ty);
                }
                if let Some(hir::Expr::Block { stmts, .. }) = init {
                    if let Some(found) = decl_type(stmts, name) {
                        return Some(found);
                    }
                }
            }
            hir::Stmt::Block(inner) => {
                if let Some(found) = decl_type(inner, name) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}

/// Every expression node in a well-typed program must carry a concrete
/// type on exit from analysis.
fn assert_all_concrete(expr: &hir::Expr) {
    assert!(
        expr.ty().is_concrete(),
        "non-concrete type {} on {:?}",
        expr.ty(),
        expr
    );
    match expr {
        hir::Expr::Unary { expr, .. } | hir::Expr::Convert { expr, .. } => {
            assert_all_concrete(expr);
        }
        hir::Expr::Binary { left, right, .. } => {
            assert_all_concrete(left);
            assert_all_concrete(right);
        }
        hir::Expr::Block { stmts, value, .. } => {
            stmts.iter().for_each(assert_stmt_concrete);
            if let Some(value) = value {
                assert_all_concrete(value);
            }
        }
        hir::Expr::Call { args, .. } => args.iter().for_each(assert_all_concrete),
        hir::Expr::Literal { .. } | hir::Expr::Var { .. } => {}
    }
}

fn assert_stmt_concrete(stmt: &hir::Stmt) {
    match stmt {
        hir::Stmt::Decl { init, .. } => {
            if let Some(init) = init {
                assert_all_concrete(init);
            }
        }
        hir::Stmt::Assign { value, .. } => assert_all_concrete(value),
        hir::Stmt::Return(Some(value)) => assert_all_concrete(value),
        hir::Stmt::Return(None) => {}
        hir::Stmt::Expr(expr) => assert_all_concrete(expr),
        hir::Stmt::Block(stmts) => stmts.iter().for_each(assert_stmt_concrete),
    }
}

// ============================================================================
// Baseline scenarios
// ============================================================================

#[test]
fn test_unannotated_literal_defaults_to_i32() {
    let typed = check_ok("func main() : i32 = { val x = 42 return x }");
    assert_eq!(decl_type(&typed.functions[0].body, "x"), Some(Type::I32));
}

#[test]
fn test_annotation_adapts_comptime_int_to_i64() {
    let typed = check_ok("func main() : i64 = { val x : i64 = 42 return x }");
    assert_eq!(decl_type(&typed.functions[0].body, "x"), Some(Type::I64));
}

#[test]
fn test_comptime_int_cannot_become_bool() {
    let (_, diags) = check("func main() : i32 = { val x : bool = 42 return 0 }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::INVALID_COERCION]);
    assert!(diags[0].message.contains("cannot coerce `comptime_int` to `bool`"));
}

#[test]
fn test_assign_to_val_is_rejected() {
    let (_, diags) = check("func main() : i32 = { val x = 42 x = 100 return x }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::IMMUTABLE_ASSIGN]);
}

#[test]
fn test_read_of_undef_before_write() {
    let (typed, diags) =
        check("func main() : i32 = { mut y : i32 = undef val z = y return z }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::UNINITIALIZED_READ]);
    // Analysis continues past the error: z still resolves.
    assert_eq!(decl_type(&typed.functions[0].body, "z"), Some(Type::I32));
}

#[test]
fn test_mixed_concrete_operands_need_conversion() {
    let (_, diags) = check(
        "func main() : i32 = { val a : i32 = 1 val b : i64 = 2 val c = a + b return 0 }",
    );
    assert_eq!(codes(&diags), vec![DiagnosticCode::TYPE_MISMATCH]);
    assert!(diags[0].message.contains("i32"));
    assert!(diags[0].message.contains("i64"));
    assert!(diags[0].helps.iter().any(|h| h.contains("conversion")));
}

#[test]
fn test_void_function_returning_value() {
    let (_, diags) = check("func f() : void = { return 0 }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::VOID_RETURNS_VALUE]);
}

#[test]
fn test_expression_block_produces_value() {
    let typed = check_ok("func main() : i32 = { val r = { val t = 42 return t } return r }");
    assert_eq!(decl_type(&typed.functions[0].body, "r"), Some(Type::I32));
    assert_eq!(decl_type(&typed.functions[0].body, "t"), Some(Type::I32));
}

// ============================================================================
// Comptime adaptation
// ============================================================================

#[test]
fn test_comptime_idempotence_across_targets() {
    // The same literal adapts to every member of its coercion set, and
    // the declared type always equals the annotation.
    for target in ["i32", "i64", "f32", "f64"] {
        let source = format!("func main() : i32 = {{ val x : {target} = 42 return 0 }}");
        let typed = check_ok(&source);
        let expected = match target {
            "i32" => Type::I32,
            "i64" => Type::I64,
            "f32" => Type::F32,
            "f64" => Type::F64,
            _ => unreachable!(),
        };
        assert_eq!(decl_type(&typed.functions[0].body, "x"), Some(expected));
    }
}

#[test]
fn test_float_literal_defaults_to_f64() {
    let typed = check_ok("func main() : i32 = { val pi = 3.14 return 0 }");
    assert_eq!(decl_type(&typed.functions[0].body, "pi"), Some(Type::F64));
}

#[test]
fn test_comptime_float_rejected_by_integer_annotation() {
    let (_, diags) = check("func main() : i32 = { val x : i32 = 3.14 return 0 }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::INVALID_COERCION]);
}

#[test]
fn test_comptime_arithmetic_adapts_as_a_whole() {
    let typed = check_ok("func main() : i64 = { val x : i64 = 40 + 2 return x }");
    assert_eq!(decl_type(&typed.functions[0].body, "x"), Some(Type::I64));
}

#[test]
fn test_annotation_propagates_into_expression_block() {
    let typed = check_ok("func main() : i64 = { val x : i64 = { return 42 } return x }");
    assert_eq!(decl_type(&typed.functions[0].body, "x"), Some(Type::I64));
}

#[test]
fn test_comptime_adapts_to_concrete_operand() {
    let typed = check_ok(
        "func main() : i64 = { val wide : i64 = 10 val sum = wide + 1 return sum }",
    );
    assert_eq!(decl_type(&typed.functions[0].body, "sum"), Some(Type::I64));
}

#[test]
fn test_return_type_is_context_for_return_values() {
    check_ok("func f() : f32 = { return 42 }");
}

#[test]
fn test_no_comptime_types_survive_analysis() {
    let typed = check_ok(
        "func helper(n : i64) : i64 = { return n }\n\
         func main() : i64 = {\n\
             val a = 1 + 2 * 3\n\
             val b : f64 = 1 / 2\n\
             mut c : i64 = undef\n\
             c = 7 \\ 2\n\
             val d = { val t = 2.5 return t < 3.0 }\n\
             return helper(40 + 2)\n\
         }",
    );
    for function in &typed.functions {
        function.body.iter().for_each(assert_stmt_concrete);
    }
}

// ============================================================================
// Division rules
// ============================================================================

#[test]
fn test_float_division_of_integers_with_float_target() {
    let typed = check_ok(
        "func ratio(hits : i32, total : i32) : f32 = { return hits / total }",
    );
    match typed.functions[0].body.last() {
        Some(hir::Stmt::Return(Some(value))) => assert_eq!(value.ty(), Type::F32),
        other => panic!("expected return, got {:?}", other),
    }
}

#[test]
fn test_float_division_defaults_to_f64() {
    let typed = check_ok("func main() : i32 = { val a : i32 = 7 val q = a / 2 return 0 }");
    assert_eq!(decl_type(&typed.functions[0].body, "q"), Some(Type::F64));
}

#[test]
fn test_integer_division_rejects_float_operand() {
    let (_, diags) = check("func main() : i32 = { val q = 7.0 \\ 2 return 0 }");
    assert_eq!(
        codes(&diags),
        vec![DiagnosticCode::NON_INTEGER_IN_INT_DIVISION]
    );
}

#[test]
fn test_integer_division_rejects_concrete_float() {
    let (_, diags) =
        check("func main() : i32 = { val f : f64 = 1.5 val q = f \\ 2 return 0 }");
    assert_eq!(
        codes(&diags),
        vec![DiagnosticCode::NON_INTEGER_IN_INT_DIVISION]
    );
}

#[test]
fn test_remainder_requires_integers() {
    let (_, diags) = check("func main() : i32 = { val r = 7.5 % 2 return 0 }");
    assert_eq!(
        codes(&diags),
        vec![DiagnosticCode::NON_INTEGER_IN_INT_DIVISION]
    );
}

#[test]
fn test_integer_division_of_comptime_stays_integer() {
    let typed = check_ok("func main() : i32 = { val q = 7 \\ 2 return q }");
    assert_eq!(decl_type(&typed.functions[0].body, "q"), Some(Type::I32));
}

// ============================================================================
// Scoping and symbols
// ============================================================================

#[test]
fn test_duplicate_declaration_in_same_scope() {
    let (_, diags) = check("func main() : i32 = { val x = 1 val x = 2 return 0 }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::DUPLICATE_SYMBOL]);
}

#[test]
fn test_shadowing_in_nested_block_is_fine() {
    check_ok("func main() : i32 = { val x = 1 { val x = true } return x }");
}

#[test]
fn test_inner_symbol_not_visible_outside() {
    let (_, diags) =
        check("func main() : i32 = { { val hidden = 1 } return hidden }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::UNKNOWN_SYMBOL]);
}

#[test]
fn test_undefined_variable() {
    let (_, diags) = check("func main() : i32 = { return nope }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::UNKNOWN_SYMBOL]);
}

#[test]
fn test_assignment_to_undeclared() {
    let (_, diags) = check("func main() : i32 = { ghost = 1 return 0 }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::UNKNOWN_SYMBOL]);
}

#[test]
fn test_mut_reassignment_is_fine() {
    check_ok("func main() : i32 = { mut x = 1 x = 2 x = 3 return x }");
}

#[test]
fn test_undef_requires_annotation() {
    let (_, diags) = check("func main() : i32 = { mut y = undef return 0 }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::UNDEF_REQUIRES_ANNOTATION]);
}

#[test]
fn test_undef_requires_mut() {
    let (_, diags) = check("func main() : i32 = { val y : i32 = undef return 0 }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::UNDEF_REQUIRES_MUT]);
}

#[test]
fn test_undef_then_write_then_read_is_fine() {
    check_ok("func main() : i32 = { mut y : i32 = undef y = 5 return y }");
}

#[test]
fn test_duplicate_function_names() {
    let (_, diags) = check(
        "func f() : i32 = { return 1 }\n\
         func f() : i32 = { return 2 }",
    );
    assert_eq!(codes(&diags), vec![DiagnosticCode::DUPLICATE_SYMBOL]);
}

// ============================================================================
// Returns and termination
// ============================================================================

#[test]
fn test_missing_return_in_non_void_function() {
    let (_, diags) = check("func f() : i32 = { val x = 1 }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::MISSING_RETURN]);
}

#[test]
fn test_void_function_needs_no_return() {
    check_ok("func f() : void = { val x = 1 }");
}

#[test]
fn test_bare_return_in_non_void_function() {
    let (_, diags) = check("func f() : i32 = { return }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::TYPE_MISMATCH]);
}

#[test]
fn test_return_through_nested_statement_block() {
    check_ok("func f() : i32 = { { return 1 } }");
}

#[test]
fn test_return_value_must_match_return_type() {
    let (_, diags) = check("func f() : bool = { return 42 }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::INVALID_COERCION]);
}

// ============================================================================
// Blocks
// ============================================================================

#[test]
fn test_expression_block_without_final_return() {
    let (_, diags) = check("func f() : i32 = { val r = { val t = 1 } return 0 }");
    assert_eq!(
        codes(&diags),
        vec![DiagnosticCode::BLOCK_REQUIRES_FINAL_RETURN]
    );
}

#[test]
fn test_empty_expression_block() {
    let (_, diags) = check("func f() : i32 = { val r = { } return 0 }");
    assert_eq!(
        codes(&diags),
        vec![DiagnosticCode::BLOCK_REQUIRES_FINAL_RETURN]
    );
}

#[test]
fn test_non_final_return_in_expression_block_targets_function() {
    // The early `return true` leaves the function, so it is checked
    // against the function's `bool`; the final return produces `r`.
    check_ok(
        "func f() : bool = { val r = { return true return 1 } return r == 1 }",
    );
}

#[test]
fn test_statement_block_return_targets_function() {
    let (_, diags) = check("func f() : i32 = { { return true } }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::TYPE_MISMATCH]);
}

#[test]
fn test_unannotated_runtime_block_needs_annotation() {
    // The block calls a function, so it is not comptime-evaluable and
    // its comptime result cannot fall back to default resolution.
    let (_, diags) = check(
        "func g() : i32 = { return 1 }\n\
         func f() : i32 = { val r = { g() return 42 } return r }",
    );
    assert_eq!(codes(&diags), vec![DiagnosticCode::TYPE_MISMATCH]);
    assert!(diags[0].message.contains("cannot infer"));
}

#[test]
fn test_annotated_runtime_block_is_fine() {
    check_ok(
        "func g() : i32 = { return 1 }\n\
         func f() : i32 = { val r : i32 = { g() return 42 } return r }",
    );
}

// ============================================================================
// Logical operators and comparisons
// ============================================================================

#[test]
fn test_logical_requires_bool() {
    let (_, diags) = check("func f() : bool = { return 1 && true }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::NON_BOOL_IN_LOGICAL]);
}

#[test]
fn test_not_requires_bool() {
    let (_, diags) = check("func f() : bool = { return !1 }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::NON_BOOL_IN_LOGICAL]);
}

#[test]
fn test_comparison_produces_bool() {
    check_ok("func f() : bool = { val a : i64 = 1 return a < 2 }");
}

#[test]
fn test_comparison_result_is_not_numeric() {
    let (_, diags) = check("func f() : i32 = { return 1 < 2 }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::TYPE_MISMATCH]);
}

#[test]
fn test_equality_on_strings() {
    check_ok(r#"func f() : bool = { val s = "a" return s == "b" }"#);
}

// ============================================================================
// Conversions
// ============================================================================

#[test]
fn test_widening_requires_explicit_conversion() {
    let (_, diags) =
        check("func f() : i64 = { val narrow : i32 = 1 return narrow }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::TYPE_MISMATCH]);
    assert!(diags[0].helps.iter().any(|h| h.contains(": i64")));
}

#[test]
fn test_explicit_widening_conversion() {
    check_ok("func f() : i64 = { val narrow : i32 = 1 return narrow : i64 }");
}

#[test]
fn test_explicit_narrowing_conversion() {
    check_ok("func f() : i32 = { val wide : i64 = 1 return wide : i32 }");
}

#[test]
fn test_float_to_int_conversion() {
    check_ok("func f() : i32 = { val x : f64 = 2.5 return x : i32 }");
}

#[test]
fn test_bool_conversion_is_rejected() {
    let (_, diags) = check("func f() : i32 = { val b = true return b : i32 }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::INVALID_COERCION]);
}

#[test]
fn test_mixed_operands_fixed_by_conversion() {
    check_ok(
        "func f() : i64 = { val a : i32 = 1 val b : i64 = 2 return (a : i64) + b }",
    );
}

// ============================================================================
// Calls
// ============================================================================

#[test]
fn test_call_adapts_comptime_arguments() {
    check_ok(
        "func scale(base : i64) : i64 = { return base * 2 }\n\
         func main() : i64 = { return scale(21) }",
    );
}

#[test]
fn test_call_to_undefined_function() {
    let (_, diags) = check("func main() : i32 = { return missing() }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::UNKNOWN_SYMBOL]);
}

#[test]
fn test_call_arity_mismatch() {
    let (_, diags) = check(
        "func g(a : i32) : i32 = { return a }\n\
         func main() : i32 = { return g(1, 2) }",
    );
    assert_eq!(codes(&diags), vec![DiagnosticCode::TYPE_MISMATCH]);
    assert!(diags[0].message.contains("expects 1 argument"));
}

#[test]
fn test_call_argument_type_mismatch() {
    let (_, diags) = check(
        "func g(flag : bool) : i32 = { return 0 }\n\
         func main() : i32 = { return g(1) }",
    );
    assert_eq!(codes(&diags), vec![DiagnosticCode::INVALID_COERCION]);
}

#[test]
fn test_void_call_as_statement_is_fine() {
    check_ok(
        "func log() : void = { return }\n\
         func main() : i32 = { log() return 0 }",
    );
}

#[test]
fn test_void_call_cannot_be_bound() {
    let (_, diags) = check(
        "func log() : void = { return }\n\
         func main() : i32 = { val x = log() return 0 }",
    );
    assert_eq!(codes(&diags), vec![DiagnosticCode::TYPE_MISMATCH]);
}

#[test]
fn test_forward_call_resolves() {
    check_ok(
        "func main() : i32 = { return later() }\n\
         func later() : i32 = { return 1 }",
    );
}

// ============================================================================
// Failure semantics
// ============================================================================

#[test]
fn test_unresolved_operand_does_not_cascade() {
    // Only the unknown symbol is reported; the additions over the
    // failed operand stay silent.
    let (_, diags) = check("func main() : i32 = { return nope + 1 + 2 }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::UNKNOWN_SYMBOL]);
}

#[test]
fn test_failed_declaration_does_not_poison_uses() {
    // `x`'s declaration fails, but reading `x` afterwards is silent;
    // one root cause, one diagnostic.
    let (_, diags) = check("func main() : i32 = { val x = nope val y = x + 1 return 0 }");
    assert_eq!(codes(&diags), vec![DiagnosticCode::UNKNOWN_SYMBOL]);
}

#[test]
fn test_multiple_independent_errors_all_reported() {
    let (_, diags) = check(
        "func main() : i32 = {\n\
             val a : bool = 42\n\
             val b = 1 \\ 2.0\n\
             ghost = 3\n\
             return 0\n\
         }",
    );
    assert_eq!(
        codes(&diags),
        vec![
            DiagnosticCode::INVALID_COERCION,
            DiagnosticCode::NON_INTEGER_IN_INT_DIVISION,
            DiagnosticCode::UNKNOWN_SYMBOL,
        ]
    );
}

#[test]
fn test_errors_come_out_in_source_order() {
    let (_, diags) = check(
        "func a() : i32 = { return nope }\n\
         func b() : i32 = { return 1 && 2 }",
    );
    assert_eq!(
        codes(&diags),
        vec![
            DiagnosticCode::UNKNOWN_SYMBOL,
            DiagnosticCode::NON_BOOL_IN_LOGICAL,
            DiagnosticCode::NON_BOOL_IN_LOGICAL,
        ]
    );
}

#[test]
fn test_analysis_is_deterministic() {
    let source = "func main() : i32 = {\n\
                      val a : bool = 42\n\
                      ghost = 1\n\
                      mut y : i32 = undef\n\
                      val z = y\n\
                      return 0\n\
                  }";
    let handler = Handler::new();
    let tokens = Lexer::new(source, &handler).tokenize();
    let program = Parser::new(tokens, &handler).parse();
    assert!(!handler.has_errors());

    let (_, first) = crate::analyze(&program);
    let (_, second) = crate::analyze(&program);

    let render = |diags: &[Diagnostic]| {
        diags
            .iter()
            .map(|d| format!("{:?} {} {}", d.code, d.span.start, d.message))
            .collect::<Vec<_>>()
    };
    assert_eq!(render(&first), render(&second));
}
