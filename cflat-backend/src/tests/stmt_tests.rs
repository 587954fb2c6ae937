//! Statement lowerer tests: branch shapes, loop shapes, switch
//! dispatch with fall-through, and resolved jump statements.

use super::fixtures::*;
use cflat_asm::Label;
use cflat_ast::{BinaryOp, Callee, Case, Expr, ExprKind, Stmt};
use cflat_common::{LabelGenerator, Type};

fn call(name: &str) -> Expr {
    Expr::new(
        ExprKind::Funcall {
            callee: Callee::Static {
                name: name.to_string(),
                defined: false,
            },
            args: vec![],
        },
        Type::Int,
    )
}

#[test]
fn if_else_branches_through_labels() {
    // if (x) y = 1; else y = 2;
    let out = compile_ints(&["x", "y"], |_, ids| {
        vec![Stmt::If {
            cond: Expr::var(ids[0], Type::Int),
            then: Box::new(Stmt::Expr(Expr::assign(
                Expr::var(ids[1], Type::Int),
                Expr::int(1),
            ))),
            els: Some(Box::new(Stmt::Expr(Expr::assign(
                Expr::var(ids[1], Type::Int),
                Expr::int(2),
            )))),
            else_label: Label::new(".L0"),
            end_label: Label::new(".L1"),
        }]
    });

    assert_contains_lines(
        &out,
        &[
            "\tmovl\t-4(%ebp), %eax",
            "\ttestl\t%eax, %eax",
            "\tjz\t.L0",
            "\tmovl\t$1, %eax",
            "\tmovl\t%eax, -8(%ebp)",
            "\tjmp\t.L1",
            ".L0:",
            "\tmovl\t$2, %eax",
            "\tmovl\t%eax, -8(%ebp)",
            ".L1:",
        ],
    );
}

#[test]
fn if_without_else_falls_through_to_end() {
    let out = compile_ints(&["x"], |_, ids| {
        vec![Stmt::If {
            cond: Expr::var(ids[0], Type::Int),
            then: Box::new(Stmt::Expr(Expr::int(1))),
            els: None,
            else_label: Label::new(".L0"),
            end_label: Label::new(".L1"),
        }]
    });

    assert_contains_lines(&out, &["\tjz\t.L1", "\tmovl\t$1, %eax", ".L1:"]);
    assert!(!out.contains("\tjmp\t.L1"));
    assert!(!out.contains(".L0:"));
}

#[test]
fn while_loop_shape() {
    // while (i < 10) i++;
    let out = compile_ints(&["i"], |_, ids| {
        vec![Stmt::While {
            cond: Expr::binary(BinaryOp::Lt, Expr::var(ids[0], Type::Int), Expr::int(10)),
            body: Box::new(Stmt::Expr(Expr::new(
                ExprKind::SuffixInc {
                    expr: Box::new(Expr::var(ids[0], Type::Int)),
                },
                Type::Int,
            ))),
            beg_label: Label::new(".L0"),
            end_label: Label::new(".L1"),
        }]
    });

    assert_contains_lines(
        &out,
        &[
            ".L0:",
            "\tmovl\t$10, %eax",
            "\tpushq\t%eax",
            "\tmovl\t-4(%ebp), %eax",
            "\tpopq\t%ecx",
            "\tcmpl\t%ecx, %eax",
            "\tsetl\t%al",
            "\tmovzbl\t%al, %eax",
            "\ttestl\t%eax, %eax",
            "\tjz\t.L1",
            "\tmovl\t-4(%ebp), %eax",
            "\tincl\t-4(%ebp)",
            "\tjmp\t.L0",
            ".L1:",
        ],
    );
}

#[test]
fn do_while_tests_at_the_bottom() {
    let out = compile_ints(&["i"], |_, ids| {
        vec![Stmt::DoWhile {
            body: Box::new(Stmt::Expr(Expr::new(
                ExprKind::SuffixInc {
                    expr: Box::new(Expr::var(ids[0], Type::Int)),
                },
                Type::Int,
            ))),
            cond: Expr::var(ids[0], Type::Int),
            beg_label: Label::new(".L0"),
            continue_label: Label::new(".L1"),
            end_label: Label::new(".L2"),
        }]
    });

    assert_contains_lines(
        &out,
        &[
            ".L0:",
            "\tmovl\t-4(%ebp), %eax",
            "\tincl\t-4(%ebp)",
            ".L1:",
            "\tmovl\t-4(%ebp), %eax",
            "\ttestl\t%eax, %eax",
            "\tjnz\t.L0",
            ".L2:",
        ],
    );
}

#[test]
fn for_loop_shape() {
    // for (i = 0; i < 3; i++) ;
    let mut labels = LabelGenerator::new();
    let beg = Label::new(labels.new_label());
    let cont = Label::new(labels.new_label());
    let end = Label::new(labels.new_label());
    let out = compile_ints(&["i"], |_, ids| {
        vec![Stmt::For {
            init: Some(Expr::assign(Expr::var(ids[0], Type::Int), Expr::int(0))),
            cond: Expr::binary(BinaryOp::Lt, Expr::var(ids[0], Type::Int), Expr::int(3)),
            incr: Some(Expr::new(
                ExprKind::SuffixInc {
                    expr: Box::new(Expr::var(ids[0], Type::Int)),
                },
                Type::Int,
            )),
            body: Box::new(Stmt::Block(cflat_ast::Block::of(vec![]))),
            beg_label: beg,
            continue_label: cont,
            end_label: end,
        }]
    });

    assert_lines_in_order(
        &out,
        &[
            "\tmovl\t$0, %eax",
            "\tmovl\t%eax, -4(%ebp)",
            ".L0:",
            "\tjz\t.L2",
            ".L1:",
            "\tincl\t-4(%ebp)",
            "\tjmp\t.L0",
            ".L2:",
        ],
    );
}

#[test]
fn switch_compares_then_falls_through() {
    // switch (x) { case 1: f(); case 2: g(); }
    let out = compile_ints(&["x"], |_, ids| {
        vec![Stmt::Switch {
            cond: Expr::var(ids[0], Type::Int),
            cases: vec![
                Case {
                    values: vec![Expr::int(1)],
                    begin_label: Label::new(".L0"),
                    body: Box::new(Stmt::Expr(call("f"))),
                },
                Case {
                    values: vec![Expr::int(2)],
                    begin_label: Label::new(".L1"),
                    body: Box::new(Stmt::Expr(call("g"))),
                },
            ],
        }]
    });

    assert_contains_lines(
        &out,
        &[
            "\tmovl\t-4(%ebp), %eax",
            "\tmovq\t$1, %ecx",
            "\tcmpl\t%ecx, %eax",
            "\tje\t.L0",
            "\tmovq\t$2, %ecx",
            "\tcmpl\t%ecx, %eax",
            "\tje\t.L1",
            ".L0:",
            "\tcall\tf",
            ".L1:",
            "\tcall\tg",
        ],
    );
}

#[test]
fn switch_case_with_multiple_values() {
    let out = compile_ints(&["x"], |_, ids| {
        vec![Stmt::Switch {
            cond: Expr::var(ids[0], Type::Int),
            cases: vec![Case {
                values: vec![Expr::int(1), Expr::int(2)],
                begin_label: Label::new(".L0"),
                body: Box::new(Stmt::Expr(call("f"))),
            }],
        }]
    });

    assert_contains_lines(
        &out,
        &[
            "\tmovq\t$1, %ecx",
            "\tcmpl\t%ecx, %eax",
            "\tje\t.L0",
            "\tmovq\t$2, %ecx",
            "\tcmpl\t%ecx, %eax",
            "\tje\t.L0",
        ],
    );
}

#[test]
fn switch_ties_break_in_source_order() {
    // two cases carrying the same value: the earlier one wins
    let out = compile_ints(&["x"], |_, ids| {
        vec![Stmt::Switch {
            cond: Expr::var(ids[0], Type::Int),
            cases: vec![
                Case {
                    values: vec![Expr::int(1)],
                    begin_label: Label::new(".L0"),
                    body: Box::new(Stmt::Expr(call("f"))),
                },
                Case {
                    values: vec![Expr::int(1)],
                    begin_label: Label::new(".L1"),
                    body: Box::new(Stmt::Expr(call("g"))),
                },
            ],
        }]
    });

    assert_lines_in_order(&out, &["\tje\t.L0", "\tje\t.L1"]);
}

#[test]
fn jump_statements_use_their_resolved_labels() {
    let out = compile_ints(&[], |_, _| {
        vec![
            Stmt::Break {
                target: Some(Label::new(".L7")),
            },
            Stmt::Continue {
                target: Some(Label::new(".L8")),
            },
            Stmt::Goto {
                target: Some(Label::new(".L9")),
            },
        ]
    });

    assert_lines_in_order(&out, &["\tjmp\t.L7", "\tjmp\t.L8", "\tjmp\t.L9"]);
}

#[test]
fn labeled_statement_emits_label_then_body() {
    let out = compile_ints(&[], |_, _| {
        vec![Stmt::Label {
            label: Label::new(".Lagain"),
            stmt: Box::new(Stmt::Return { expr: None }),
        }]
    });

    assert_contains_lines(&out, &[".Lagain:", "\tjmp\t.Lf$epilogue"]);
}

#[test]
fn nested_blocks_lower_in_order() {
    let out = compile_ints(&["a"], |_, ids| {
        vec![
            Stmt::Block(cflat_ast::Block::of(vec![Stmt::Expr(Expr::int(1))])),
            Stmt::Expr(Expr::var(ids[0], Type::Int)),
        ]
    });

    assert_lines_in_order(&out, &["\tmovl\t$1, %eax", "\tmovl\t-4(%ebp), %eax"]);
}
