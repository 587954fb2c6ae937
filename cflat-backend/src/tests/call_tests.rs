//! cdecl call tests: right-to-left argument evaluation, caller
//! cleanup, and the direct/indirect call forms.

use super::fixtures::*;
use cflat_ast::{Callee, Expr, ExprKind, Stmt};
use cflat_common::Type;

fn funcall(callee: Callee, args: Vec<Expr>) -> Expr {
    Expr::new(ExprKind::Funcall { callee, args }, Type::Int)
}

fn static_call(name: &str, defined: bool, args: Vec<Expr>) -> Expr {
    funcall(
        Callee::Static {
            name: name.to_string(),
            defined,
        },
        args,
    )
}

#[test]
fn arguments_push_right_to_left_then_caller_cleans() {
    // f(1, 2, 3)
    let out = compile_ints(&[], |_, _| {
        vec![Stmt::Expr(static_call(
            "f",
            false,
            vec![Expr::int(1), Expr::int(2), Expr::int(3)],
        ))]
    });

    assert_contains_lines(
        &out,
        &[
            "\tmovl\t$3, %eax",
            "\tpushq\t%eax",
            "\tmovl\t$2, %eax",
            "\tpushq\t%eax",
            "\tmovl\t$1, %eax",
            "\tpushq\t%eax",
            "\tcall\tf",
            "\tsubq\t$-12, %esp",
        ],
    );
}

#[test]
fn zero_argument_call_skips_cleanup() {
    let out = compile_ints(&[], |_, _| vec![Stmt::Expr(static_call("f", false, vec![]))]);

    assert_contains_lines(&out, &["\tcall\tf"]);
    assert!(!out.contains("\tsubq"));
    assert!(!out.contains("\tpushq\t%eax"));
}

#[test]
fn defined_and_undefined_callees_both_call_by_symbol() {
    let out = compile_ints(&[], |_, _| {
        vec![
            Stmt::Expr(static_call("local_fn", true, vec![])),
            Stmt::Expr(static_call("extern_fn", false, vec![])),
        ]
    });

    assert_lines_in_order(&out, &["\tcall\tlocal_fn", "\tcall\textern_fn"]);
}

#[test]
fn pointer_call_goes_through_the_accumulator() {
    let out = compile_typed(&[("fp", Type::Pointer)], |_, ids| {
        vec![Stmt::Expr(funcall(
            Callee::Pointer(Box::new(Expr::var(ids[0], Type::Pointer))),
            vec![Expr::int(1)],
        ))]
    });

    assert_contains_lines(
        &out,
        &[
            "\tmovl\t$1, %eax",
            "\tpushq\t%eax",
            "\tmovl\t-4(%ebp), %eax",
            "\tcall\t*%eax",
            "\tsubq\t$-4, %esp",
        ],
    );
}

#[test]
fn call_result_lands_in_the_accumulator() {
    // a = f();
    let out = compile_ints(&["a"], |_, ids| {
        vec![Stmt::Expr(Expr::assign(
            Expr::var(ids[0], Type::Int),
            static_call("f", false, vec![]),
        ))]
    });

    assert_contains_lines(&out, &["\tcall\tf", "\tmovl\t%eax, -4(%ebp)"]);
}

#[test]
fn nested_call_evaluates_inner_first() {
    // f(g())
    let out = compile_ints(&[], |_, _| {
        vec![Stmt::Expr(static_call(
            "f",
            false,
            vec![static_call("g", false, vec![])],
        ))]
    });

    assert_contains_lines(
        &out,
        &[
            "\tcall\tg",
            "\tpushq\t%eax",
            "\tcall\tf",
            "\tsubq\t$-4, %esp",
        ],
    );
}
