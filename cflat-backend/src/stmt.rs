//! Statement lowerer
//!
//! Blocks evaluate their scope's initializers and then their
//! statements in order. Control-flow statements jump between the
//! labels the semantic phase minted for them; `break`, `continue` and
//! `goto` use the pre-resolved target label carried by the node.

use crate::module::CodeGenerator;
use cflat_asm::{Operand, Reg};
use cflat_ast::{Block, Case, Expr, ExprKind, Stmt};
use cflat_common::CodegenError;
use log::debug;

impl<'a> CodeGenerator<'a> {
    pub(crate) fn compile_stmt(&mut self, stmt: &Stmt) -> Result<(), CodegenError> {
        match stmt {
            Stmt::Expr(expr) => self.compile_expr(expr)?,

            Stmt::Block(block) => self.compile_block(block)?,

            Stmt::If {
                cond,
                then,
                els,
                else_label,
                end_label,
            } => {
                self.compile_expr(cond)?;
                self.test_cond(cond.ty, Reg::Ax);
                if let Some(els) = els {
                    self.asm.jz(else_label);
                    self.compile_stmt(then)?;
                    self.asm.jmp(end_label);
                    self.asm.label(else_label);
                    self.compile_stmt(els)?;
                    self.asm.label(end_label);
                } else {
                    self.asm.jz(end_label);
                    self.compile_stmt(then)?;
                    self.asm.label(end_label);
                }
            }

            Stmt::Switch { cond, cases } => {
                self.compile_expr(cond)?;
                let t = self.ast.type_table().signed_int();
                // jump table first: cases match in source order
                for case in cases {
                    for value in &case.values {
                        let v = self.case_value(value)?;
                        self.asm.movq(Operand::Imm(v), Reg::Cx.widest());
                        self.asm.cmp(t, Reg::Cx.for_type(t), Reg::Ax.for_type(t));
                        self.asm.je(&case.begin_label);
                    }
                }
                // bodies in source order; no implicit break, control
                // falls through to the next case
                for case in cases {
                    self.compile_case(case)?;
                }
            }

            Stmt::While {
                cond,
                body,
                beg_label,
                end_label,
            } => {
                self.asm.label(beg_label);
                self.compile_expr(cond)?;
                self.test_cond(cond.ty, Reg::Ax);
                self.asm.jz(end_label);
                self.compile_stmt(body)?;
                self.asm.jmp(beg_label);
                self.asm.label(end_label);
            }

            Stmt::DoWhile {
                body,
                cond,
                beg_label,
                continue_label,
                end_label,
            } => {
                self.asm.label(beg_label);
                self.compile_stmt(body)?;
                self.asm.label(continue_label);
                self.compile_expr(cond)?;
                self.test_cond(cond.ty, Reg::Ax);
                self.asm.jnz(beg_label);
                self.asm.label(end_label);
            }

            Stmt::For {
                init,
                cond,
                incr,
                body,
                beg_label,
                continue_label,
                end_label,
            } => {
                if let Some(init) = init {
                    self.compile_expr(init)?;
                }
                self.asm.label(beg_label);
                self.compile_expr(cond)?;
                self.test_cond(cond.ty, Reg::Ax);
                self.asm.jz(end_label);
                self.compile_stmt(body)?;
                self.asm.label(continue_label);
                if let Some(incr) = incr {
                    self.compile_expr(incr)?;
                }
                self.asm.jmp(beg_label);
                self.asm.label(end_label);
            }

            Stmt::Break { target } => {
                let target = target
                    .as_ref()
                    .ok_or_else(|| CodegenError::unresolved_label("break statement"))?;
                self.asm.jmp(target);
            }

            Stmt::Continue { target } => {
                let target = target
                    .as_ref()
                    .ok_or_else(|| CodegenError::unresolved_label("continue statement"))?;
                self.asm.jmp(target);
            }

            Stmt::Label { label, stmt } => {
                self.asm.label(label);
                self.compile_stmt(stmt)?;
            }

            Stmt::Goto { target } => {
                let target = target
                    .as_ref()
                    .ok_or_else(|| CodegenError::unresolved_label("goto statement"))?;
                self.asm.jmp(target);
            }

            Stmt::Return { expr } => {
                if let Some(expr) = expr {
                    self.compile_expr(expr)?;
                }
                self.jmp_epilogue();
            }
        }
        Ok(())
    }

    /// Lower a block: initializers for the scope's variables, then the
    /// statements in order.
    pub(crate) fn compile_block(&mut self, block: &Block) -> Result<(), CodegenError> {
        debug!(
            "lowering block: {} locals, {} statements",
            block.vars.len(),
            block.stmts.len()
        );
        let ast = self.ast;
        for &vid in &block.vars {
            let var = ast.variable(vid);
            if let Some(init) = &var.initializer {
                self.compile_expr(init)?;
                let addr = self.address(vid);
                self.save_words(var.ty, Reg::Ax, addr);
            }
        }
        for stmt in &block.stmts {
            self.compile_stmt(stmt)?;
        }
        Ok(())
    }

    fn compile_case(&mut self, case: &Case) -> Result<(), CodegenError> {
        self.asm.label(&case.begin_label);
        self.compile_stmt(&case.body)
    }

    fn case_value(&self, node: &Expr) -> Result<i64, CodegenError> {
        match &node.kind {
            ExprKind::IntLiteral(v) => Ok(*v),
            kind => Err(CodegenError::UnsupportedCaseValue {
                found: kind.name().to_string(),
            }),
        }
    }
}
