//! Register and operand value objects
//!
//! The IA-32 register file as the code generator sees it: six named
//! registers projected to one of four widths, plus the operand sum
//! type covering immediates, label references, and the two memory
//! addressing forms the generator emits.

use cflat_common::Type;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Register names used by the accumulator-and-stack lowering model.
///
/// `Ax` is the accumulator (all expression results), `Bx` the pointer
/// register (all lvalue-walk results), `Cx` the scratch second operand,
/// `Dx` the division remainder, `Bp`/`Sp` the frame registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    Ax,
    Bx,
    Cx,
    Dx,
    Bp,
    Sp,
}

/// Operand widths of the IA-32 register file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegWidth {
    Byte,
    Word,
    Long,
    Quad,
}

impl RegWidth {
    /// Width for a value of the given type, by byte size.
    pub fn for_type(ty: Type) -> RegWidth {
        match ty.size() {
            Some(1) => RegWidth::Byte,
            Some(2) => RegWidth::Word,
            Some(8) => RegWidth::Quad,
            _ => RegWidth::Long,
        }
    }
}

impl Reg {
    /// The widest form of this register on the 32-bit target (`%eax`).
    pub fn widest(self) -> Register {
        Register::new(self, RegWidth::Long)
    }

    /// The register sized to carry a value of `ty`.
    pub fn for_type(self, ty: Type) -> Register {
        Register::new(self, RegWidth::for_type(ty))
    }

    /// The low byte form (`%al`), used by the set-condition family.
    pub fn byte(self) -> Register {
        Register::new(self, RegWidth::Byte)
    }

    /// The 32-bit form (`%eax`), the target of widening loads.
    pub fn dword(self) -> Register {
        Register::new(self, RegWidth::Long)
    }
}

/// A register projected to a concrete width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Register {
    pub reg: Reg,
    pub width: RegWidth,
}

impl Register {
    pub fn new(reg: Reg, width: RegWidth) -> Self {
        Register { reg, width }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match (self.reg, self.width) {
            (Reg::Ax, RegWidth::Byte) => "al",
            (Reg::Bx, RegWidth::Byte) => "bl",
            (Reg::Cx, RegWidth::Byte) => "cl",
            (Reg::Dx, RegWidth::Byte) => "dl",
            (Reg::Ax, RegWidth::Word) => "ax",
            (Reg::Bx, RegWidth::Word) => "bx",
            (Reg::Cx, RegWidth::Word) => "cx",
            (Reg::Dx, RegWidth::Word) => "dx",
            (Reg::Ax, RegWidth::Long) => "eax",
            (Reg::Bx, RegWidth::Long) => "ebx",
            (Reg::Cx, RegWidth::Long) => "ecx",
            (Reg::Dx, RegWidth::Long) => "edx",
            (Reg::Ax, RegWidth::Quad) => "rax",
            (Reg::Bx, RegWidth::Quad) => "rbx",
            (Reg::Cx, RegWidth::Quad) => "rcx",
            (Reg::Dx, RegWidth::Quad) => "rdx",
            (Reg::Bp, RegWidth::Long) => "ebp",
            (Reg::Sp, RegWidth::Long) => "esp",
            (Reg::Bp, RegWidth::Quad) => "rbp",
            (Reg::Sp, RegWidth::Quad) => "rsp",
            // bp/sp have no sub-word forms; fall back to the 16-bit name
            (Reg::Bp, _) => "bp",
            (Reg::Sp, _) => "sp",
        };
        write!(f, "%{}", name)
    }
}

/// A named symbol: a function, a global, or a local control-flow label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    name: String,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Label { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Instruction operands
///
/// `Ref` is a label used as an immediate (the address of a symbol),
/// `Sym` a label used as a direct memory operand, `Mem` the simple
/// `(%reg)` form and `Ind` the displaced `off(%reg)` form.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Imm(i64),
    Ref(Label),
    Reg(Register),
    Mem(Register),
    Ind(i64, Register),
    Sym(Label),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Imm(n) => write!(f, "${}", n),
            Operand::Ref(label) => write!(f, "${}", label),
            Operand::Reg(r) => write!(f, "{}", r),
            Operand::Mem(base) => write!(f, "({})", base),
            Operand::Ind(offset, base) => write!(f, "{}({})", offset, base),
            Operand::Sym(label) => write!(f, "{}", label),
        }
    }
}

impl From<Register> for Operand {
    fn from(r: Register) -> Self {
        Operand::Reg(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_register_display() {
        assert_eq!(format!("{}", Reg::Ax.widest()), "%eax");
        assert_eq!(format!("{}", Reg::Bx.widest()), "%ebx");
        assert_eq!(format!("{}", Reg::Ax.byte()), "%al");
        assert_eq!(format!("{}", Reg::Cx.byte()), "%cl");
        assert_eq!(format!("{}", Reg::Bp.widest()), "%ebp");
        assert_eq!(format!("{}", Reg::Sp.widest()), "%esp");
    }

    #[test]
    fn test_register_for_type() {
        use cflat_common::Type;

        assert_eq!(format!("{}", Reg::Ax.for_type(Type::Char)), "%al");
        assert_eq!(format!("{}", Reg::Ax.for_type(Type::Short)), "%ax");
        assert_eq!(format!("{}", Reg::Ax.for_type(Type::Int)), "%eax");
        assert_eq!(format!("{}", Reg::Ax.for_type(Type::Pointer)), "%eax");
        assert_eq!(format!("{}", Reg::Ax.for_type(Type::LongLong)), "%rax");
        assert_eq!(format!("{}", Reg::Cx.for_type(Type::UChar)), "%cl");
    }

    #[test]
    fn test_operand_display() {
        assert_eq!(format!("{}", Operand::Imm(42)), "$42");
        assert_eq!(format!("{}", Operand::Imm(-4)), "$-4");
        assert_eq!(format!("{}", Operand::Ref(Label::new(".LC0"))), "$.LC0");
        assert_eq!(format!("{}", Operand::Sym(Label::new("counter"))), "counter");
        assert_eq!(format!("{}", Operand::Mem(Reg::Bx.widest())), "(%ebx)");
        assert_eq!(format!("{}", Operand::Ind(-8, Reg::Bp.widest())), "-8(%ebp)");
        assert_eq!(format!("{}", Operand::Ind(12, Reg::Bp.widest())), "12(%ebp)");
    }

    #[test]
    fn test_label_name() {
        let label = Label::new(".Lmain$epilogue");
        assert_eq!(label.name(), ".Lmain$epilogue");
        assert_eq!(format!("{}", label), ".Lmain$epilogue");
    }
}
