//! Expression lowerer (rvalue walk)
//!
//! Every expression leaves its result in the `ax` family sized to the
//! expression's type. Binary operands are staged through the machine
//! stack: evaluate the right operand, push it, evaluate the left, pop
//! the right back into `cx`, apply the operator.

use crate::frame::STACK_WORD_SIZE;
use crate::module::{csymbol, tmpsymbol, CodeGenerator};
use cflat_asm::{Operand, Reg};
use cflat_ast::{BinaryOp, Callee, Expr, ExprKind, UnaryOp};
use cflat_common::{CodegenError, Type};
use log::trace;

impl<'a> CodeGenerator<'a> {
    /// Lower an expression; the result ends up in the accumulator.
    pub(crate) fn compile_expr(&mut self, expr: &Expr) -> Result<(), CodegenError> {
        trace!("compiling {}", expr.kind.name());
        match &expr.kind {
            ExprKind::IntLiteral(v) | ExprKind::CharLiteral(v) => {
                self.asm
                    .mov(expr.ty, Operand::Imm(*v), Reg::Ax.for_type(expr.ty));
            }

            ExprKind::StringLiteral { value, entry } => {
                let label = entry
                    .and_then(|id| self.ast.constant_table().get(id))
                    .map(|ent| ent.label().clone())
                    .ok_or_else(|| CodegenError::UnresolvedConstant {
                        value: value.clone(),
                    })?;
                self.load_words(expr.ty, Operand::Ref(label), Reg::Ax);
            }

            ExprKind::Variable(id) => {
                let addr = self.address(*id);
                self.load_words(expr.ty, addr, Reg::Ax);
            }

            ExprKind::Aref { expr: base, index } => {
                self.compile_lhs(base)?;
                self.asm.pushq(Reg::Bx.widest());
                self.compile_expr(index)?;
                self.asm.movq(Reg::Ax.widest(), Reg::Cx.widest());
                self.asm.popq(Reg::Bx.widest());
                let size = self.type_size(expr.ty, "array element")?;
                self.asm.imulq(Operand::Imm(size as i64), Reg::Cx.widest());
                self.asm.addq(Reg::Cx.widest(), Reg::Bx.widest());
                self.load_words(expr.ty, Operand::Mem(Reg::Bx.widest()), Reg::Ax);
            }

            ExprKind::Member { expr: base, offset } => {
                self.compile_lhs(base)?;
                self.load_words(expr.ty, Operand::Ind(*offset, Reg::Bx.widest()), Reg::Ax);
            }

            ExprKind::PtrMember { expr: base, offset } => {
                self.compile_lhs(base)?;
                self.asm
                    .movq(Operand::Mem(Reg::Bx.widest()), Reg::Bx.widest());
                self.load_words(expr.ty, Operand::Ind(*offset, Reg::Bx.widest()), Reg::Ax);
            }

            ExprKind::Dereference { expr: inner } => {
                self.compile_lhs(inner)?;
                self.asm
                    .movq(Operand::Mem(Reg::Bx.widest()), Reg::Ax.widest());
                self.load_words(expr.ty, Operand::Mem(Reg::Ax.widest()), Reg::Ax);
            }

            ExprKind::Address { expr: inner } => {
                self.compile_lhs(inner)?;
                self.asm.movq(Reg::Bx.widest(), Reg::Ax.widest());
            }

            ExprKind::Assign { lhs, rhs } => {
                if has_constant_address(lhs) {
                    self.compile_expr(rhs)?;
                    let addr = self.constant_address(lhs)?;
                    self.save_words(expr.ty, Reg::Ax, addr);
                } else {
                    self.compile_expr(rhs)?;
                    self.asm.pushq(Reg::Ax.widest());
                    self.compile_lhs(lhs)?;
                    // reload the rhs value, leaving it on the stack
                    self.asm
                        .movq(Operand::Mem(Reg::Sp.widest()), Reg::Ax.widest());
                    self.save_words(expr.ty, Reg::Ax, Operand::Mem(Reg::Bx.widest()));
                }
            }

            ExprKind::OpAssign { op, lhs, rhs } => {
                let addr = self.constant_address(lhs)?;
                self.compile_expr(rhs)?;
                self.asm.movq(Reg::Ax.widest(), Reg::Cx.widest());
                self.load_words(expr.ty, addr.clone(), Reg::Ax);
                self.apply_binary_op(*op, expr.ty);
                self.save_words(expr.ty, Reg::Ax, addr);
            }

            ExprKind::Binary { op, left, right } => {
                self.compile_expr(right)?;
                self.asm.pushq(Reg::Ax.widest());
                self.compile_expr(left)?;
                self.asm.popq(Reg::Cx.widest());
                self.apply_binary_op(*op, expr.ty);
            }

            ExprKind::LogicalAnd {
                left,
                right,
                end_label,
            } => {
                self.compile_expr(left)?;
                self.test_cond(left.ty, Reg::Ax);
                self.asm.jz(end_label);
                self.compile_expr(right)?;
                self.asm.label(end_label);
            }

            ExprKind::LogicalOr {
                left,
                right,
                end_label,
            } => {
                self.compile_expr(left)?;
                self.test_cond(left.ty, Reg::Ax);
                self.asm.jnz(end_label);
                self.compile_expr(right)?;
                self.asm.label(end_label);
            }

            ExprKind::Unary { op, expr: inner } => match op {
                UnaryOp::Plus => {
                    self.compile_expr(inner)?;
                }
                UnaryOp::Minus => {
                    self.compile_expr(inner)?;
                    self.asm.neg(inner.ty, Reg::Ax.for_type(inner.ty));
                }
                UnaryOp::BitwiseNot => {
                    self.compile_expr(inner)?;
                    self.asm.not(inner.ty, Reg::Ax.for_type(inner.ty));
                }
                UnaryOp::LogicalNot => {
                    self.compile_expr(inner)?;
                    self.test_cond(inner.ty, Reg::Ax);
                    self.asm.sete(Reg::Ax.byte());
                    self.asm.movzbl(Reg::Ax.byte(), Reg::Ax.dword());
                }
            },

            ExprKind::PrefixInc { expr: e } => {
                let addr = self.constant_address(e)?;
                self.asm.inc(e.ty, addr.clone());
                self.load_words(e.ty, addr, Reg::Ax);
            }

            ExprKind::PrefixDec { expr: e } => {
                let addr = self.constant_address(e)?;
                self.asm.dec(e.ty, addr.clone());
                self.load_words(e.ty, addr, Reg::Ax);
            }

            ExprKind::SuffixInc { expr: e } => {
                let addr = self.constant_address(e)?;
                self.load_words(e.ty, addr.clone(), Reg::Ax);
                self.asm.inc(e.ty, addr);
            }

            ExprKind::SuffixDec { expr: e } => {
                let addr = self.constant_address(e)?;
                self.load_words(e.ty, addr.clone(), Reg::Ax);
                self.asm.dec(e.ty, addr);
            }

            ExprKind::Cond {
                cond,
                then,
                els,
                else_label,
                end_label,
            } => {
                self.compile_expr(cond)?;
                self.test_cond(cond.ty, Reg::Ax);
                self.asm.jz(else_label);
                self.compile_expr(then)?;
                self.asm.jmp(end_label);
                self.asm.label(else_label);
                self.compile_expr(els)?;
                self.asm.label(end_label);
            }

            ExprKind::Funcall { callee, args } => {
                self.compile_funcall(callee, args)?;
            }

            ExprKind::Cast { expr: inner } => {
                self.compile_expr(inner)?;
            }
        }
        Ok(())
    }

    /// cdecl call: all arguments on the stack right to left, stack
    /// rolled back by the caller.
    fn compile_funcall(&mut self, callee: &Callee, args: &[Expr]) -> Result<(), CodegenError> {
        for arg in args.iter().rev() {
            self.compile_expr(arg)?;
            self.asm.pushq(Reg::Ax.widest());
        }
        match callee {
            Callee::Static { name, defined } => {
                if *defined {
                    self.asm.call(csymbol(name));
                } else {
                    self.asm.call(tmpsymbol(name));
                }
            }
            Callee::Pointer(func) => {
                self.compile_expr(func)?;
                self.asm.ptrcall(Reg::Ax.widest());
            }
        }
        if !args.is_empty() {
            self.shrink_stack(args.len() as i64 * STACK_WORD_SIZE);
        }
        Ok(())
    }

    /// Apply a binary operator with `cx` as source and the accumulator
    /// as destination. Division and comparison always use the signed
    /// forms; unsigned selection is a deferred concern.
    pub(crate) fn apply_binary_op(&mut self, op: BinaryOp, t: Type) {
        match op {
            BinaryOp::Add => self.asm.add(t, Reg::Cx.for_type(t), Reg::Ax.for_type(t)),
            BinaryOp::Sub => self.asm.sub(t, Reg::Cx.for_type(t), Reg::Ax.for_type(t)),
            BinaryOp::Mul => self.asm.imul(t, Reg::Cx.for_type(t), Reg::Ax.for_type(t)),
            BinaryOp::Div => {
                self.asm.movq(Operand::Imm(0), Reg::Dx.widest());
                self.asm.idiv(t, Reg::Cx.for_type(t));
            }
            BinaryOp::Mod => {
                self.asm.movq(Operand::Imm(0), Reg::Dx.widest());
                self.asm.idiv(t, Reg::Cx.for_type(t));
                self.asm.movq(Reg::Dx.widest(), Reg::Ax.widest());
            }
            BinaryOp::BitAnd => self.asm.and(t, Reg::Cx.for_type(t), Reg::Ax.for_type(t)),
            BinaryOp::BitOr => self.asm.or(t, Reg::Cx.for_type(t), Reg::Ax.for_type(t)),
            BinaryOp::BitXor => self.asm.xor(t, Reg::Cx.for_type(t), Reg::Ax.for_type(t)),
            BinaryOp::LShift => self.asm.sal(t, Reg::Cx.byte(), Reg::Ax.for_type(t)),
            BinaryOp::RShift => self.asm.sar(t, Reg::Cx.byte(), Reg::Ax.for_type(t)),
            BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Lt
            | BinaryOp::Gt
            | BinaryOp::LtEq
            | BinaryOp::GtEq => {
                self.asm.cmp(t, Reg::Cx.for_type(t), Reg::Ax.for_type(t));
                match op {
                    BinaryOp::Eq => self.asm.sete(Reg::Ax.byte()),
                    BinaryOp::NotEq => self.asm.setne(Reg::Ax.byte()),
                    BinaryOp::Lt => self.asm.setl(Reg::Ax.byte()),
                    BinaryOp::Gt => self.asm.setg(Reg::Ax.byte()),
                    BinaryOp::LtEq => self.asm.setle(Reg::Ax.byte()),
                    BinaryOp::GtEq => self.asm.setge(Reg::Ax.byte()),
                    _ => unreachable!(),
                }
                self.asm.movzb(t, Reg::Ax.byte(), Reg::Ax.for_type(t));
            }
        }
    }

    /// test the register against itself; sets ZF for the conditional
    /// jumps and set-condition ops
    pub(crate) fn test_cond(&mut self, ty: Type, reg: Reg) {
        self.asm.test(ty, reg.for_type(ty), reg.for_type(ty));
    }

    /// Width-dispatching load: sub-word types widen into the 32-bit
    /// register with the signedness-matching move.
    pub(crate) fn load_words(&mut self, ty: Type, addr: Operand, reg: Reg) {
        match ty.size() {
            Some(1) => {
                if ty.is_signed() {
                    self.asm.movsbl(addr, reg.dword());
                } else {
                    self.asm.movzbl(addr, reg.dword());
                }
            }
            Some(2) => {
                if ty.is_signed() {
                    self.asm.movswl(addr, reg.dword());
                } else {
                    self.asm.movzwl(addr, reg.dword());
                }
            }
            _ => self.asm.mov(ty, addr, reg.for_type(ty)),
        }
    }

    /// Store the type-sized form of `reg` to `addr`
    pub(crate) fn save_words(&mut self, ty: Type, reg: Reg, addr: Operand) {
        self.asm.mov(ty, reg.for_type(ty), addr);
    }

    /// The lhs address for the forms that bypass the lvalue walk
    /// (compound assignment, prefix/suffix increment and decrement).
    /// Only named variables have a constant address.
    pub(crate) fn constant_address(&self, expr: &Expr) -> Result<Operand, CodegenError> {
        match &expr.kind {
            ExprKind::Variable(id) => Ok(self.address(*id)),
            kind => Err(CodegenError::unsupported_lvalue(kind.name())),
        }
    }
}

pub(crate) fn has_constant_address(expr: &Expr) -> bool {
    matches!(expr.kind, ExprKind::Variable(_))
}
