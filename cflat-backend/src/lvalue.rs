//! Lvalue walk
//!
//! Produces the address of the designated object in the pointer
//! register (`bx`) for every node that may appear on the left of an
//! assignment or under `&`, `[]`, `.`, `->`, `*`, `++`, `--`. Any
//! other shape is a fatal diagnostic.

use crate::module::CodeGenerator;
use cflat_asm::{Operand, Reg};
use cflat_ast::{Expr, ExprKind};
use cflat_common::CodegenError;
use log::trace;

impl<'a> CodeGenerator<'a> {
    pub(crate) fn compile_lhs(&mut self, node: &Expr) -> Result<(), CodegenError> {
        trace!("lvalue walk: {}", node.kind.name());
        match &node.kind {
            ExprKind::Variable(id) => {
                let addr = self.address(*id);
                self.asm.leaq(addr, Reg::Bx.widest());
            }

            // array references in lvalue position accept only literal
            // indices
            ExprKind::Aref { expr, index } => {
                let value = match index.kind {
                    ExprKind::IntLiteral(v) => v,
                    _ => {
                        return Err(CodegenError::unsupported_lvalue(
                            "array reference with a computed index",
                        ))
                    }
                };
                self.asm.movq(Operand::Imm(value), Reg::Bx.widest());
                let size = self.type_size(node.ty, "array element")?;
                self.asm.imulq(Operand::Imm(size as i64), Reg::Bx.widest());
                self.asm.pushq(Reg::Bx.widest());
                self.compile_lhs(expr)?;
                self.asm.popq(Reg::Cx.widest());
                self.asm.addq(Reg::Cx.widest(), Reg::Bx.widest());
            }

            ExprKind::Member { expr, offset } => {
                self.compile_lhs(expr)?;
                self.asm.addq(Operand::Imm(*offset), Reg::Bx.widest());
            }

            ExprKind::Dereference { expr } => {
                self.compile_lhs(expr)?;
                self.asm
                    .movq(Operand::Mem(Reg::Bx.widest()), Reg::Bx.widest());
            }

            ExprKind::PtrMember { expr, offset } => {
                self.compile_lhs(expr)?;
                self.asm
                    .movq(Operand::Mem(Reg::Bx.widest()), Reg::Bx.widest());
                self.asm.addq(Operand::Imm(*offset), Reg::Bx.widest());
            }

            // ++e as an lvalue designates the element one past e
            ExprKind::PrefixInc { expr } => {
                self.compile_lhs(expr)?;
                let size = self.type_size(expr.ty, "increment operand")?;
                self.asm.addq(Operand::Imm(size as i64), Reg::Bx.widest());
            }

            ExprKind::PrefixDec { expr } => {
                self.compile_lhs(expr)?;
                let size = self.type_size(expr.ty, "decrement operand")?;
                self.asm.subq(Operand::Imm(size as i64), Reg::Bx.widest());
            }

            kind => return Err(CodegenError::unsupported_lvalue(kind.name())),
        }
        Ok(())
    }
}
