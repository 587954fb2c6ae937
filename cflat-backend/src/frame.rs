//! Frame manager
//!
//! Standard IA-32 stack frame layout (after the prologue):
//!
//! ```text
//! ======================= esp (stack top)
//! temporary
//! variables...
//! ---------------------   ebp-(4*2)
//! lvar 2
//! ---------------------   ebp-(4*1)
//! lvar 1
//! ======================= ebp
//! saved ebp
//! ---------------------   ebp+(4*1)
//! return address
//! ---------------------   ebp+(4*2)
//! arg 1
//! ---------------------   ebp+(4*3)
//! arg 2
//! ...
//! ======================= stack bottom
//! ```

use crate::module::{csymbol, CodeGenerator};
use cflat_asm::{Label, Operand, Reg};
use cflat_ast::DefinedFunction;
use cflat_common::CodegenError;
use log::debug;

/// Stack grows toward lower addresses
pub(crate) const STACK_DIRECTION: i64 = -1;
pub(crate) const STACK_WORD_SIZE: i64 = 4;
/// Slot 0 holds the saved bp, slot 1 the return address
const PARAM_START_OFFSET: i64 = 2;
/// Caller-reserved stack words below the locals
const USED_STACK_WORDS: i64 = 0;

impl<'a> CodeGenerator<'a> {
    /// Compiles a function: symbol directives, prologue, slot
    /// assignment, body, epilogue.
    pub(crate) fn compile_function(&mut self, idx: usize) -> Result<(), CodegenError> {
        self.current_function = Some(idx);
        let ast = self.ast;
        let func = &ast.functions()[idx];
        debug!("compiling function '{}'", func.name);

        let symbol = csymbol(&func.name).to_string();
        if !func.private {
            self.asm._globl(&symbol);
        }
        self.asm._type(&symbol, "@function");
        self.asm.label(&Label::new(symbol.clone()));
        self.prologue();
        self.allocate_parameters(func);
        self.allocate_local_variables(func)?;
        self.compile_block(&func.body)?;
        self.epilogue(func);
        self.asm._size(&symbol, format!(".-{}", symbol));

        self.current_function = None;
        Ok(())
    }

    fn prologue(&mut self) {
        self.asm.pushq(Reg::Bp.widest());
        self.asm.movq(Reg::Sp.widest(), Reg::Bp.widest());
    }

    fn epilogue(&mut self, func: &DefinedFunction) {
        self.asm.label(&epilogue_label(func));
        self.asm.movq(Reg::Bp.widest(), Reg::Sp.widest());
        self.asm.popq(Reg::Bp.widest());
        self.asm.ret();
    }

    /// Jump to the current function's epilogue; every `return` inside
    /// a body funnels through this label.
    pub(crate) fn jmp_epilogue(&mut self) {
        let ast = self.ast;
        let func = match self.current_function {
            Some(idx) => &ast.functions()[idx],
            None => panic!("COMPILER BUG: return statement outside of a function"),
        };
        let label = epilogue_label(func);
        self.asm.jmp(&label);
    }

    /// Assigns parameter i the address bp + (2+i)*word, in
    /// declaration order.
    fn allocate_parameters(&mut self, func: &DefinedFunction) {
        for (i, &pid) in func.params.parameters().iter().enumerate() {
            let word = PARAM_START_OFFSET + i as i64;
            self.bind_address(pid, lvar_address_by_word(word));
        }
    }

    /// Assigns every local a slot below bp, rounding the running frame
    /// size up to a word multiple per variable, then extends the stack
    /// once for the whole frame.
    fn allocate_local_variables(&mut self, func: &DefinedFunction) -> Result<(), CodegenError> {
        let ast = self.ast;
        let mut len = USED_STACK_WORDS * STACK_WORD_SIZE;
        for &lid in &func.locals {
            let var = ast.variable(lid);
            let size = self.type_size(var.ty, &var.name)? as i64;
            if STACK_DIRECTION < 0 {
                len = align(len + size, STACK_WORD_SIZE);
                self.bind_address(lid, Operand::Ind(-len, Reg::Bp.widest()));
            } else {
                self.bind_address(lid, Operand::Ind(len, Reg::Bp.widest()));
                len = align(len + size, STACK_WORD_SIZE);
            }
        }
        if len != 0 {
            self.extend_stack(len);
        }
        Ok(())
    }

    pub(crate) fn extend_stack(&mut self, len: i64) {
        self.asm
            .addq(Operand::Imm(STACK_DIRECTION * len), Reg::Sp.widest());
    }

    pub(crate) fn shrink_stack(&mut self, len: i64) {
        self.asm
            .subq(Operand::Imm(STACK_DIRECTION * len), Reg::Sp.widest());
    }
}

fn epilogue_label(func: &DefinedFunction) -> Label {
    Label::new(format!(".L{}$epilogue", func.name))
}

fn lvar_address_by_word(offset: i64) -> Operand {
    Operand::Ind(offset * STACK_WORD_SIZE, Reg::Bp.widest())
}

fn align(n: i64, alignment: i64) -> i64 {
    (n + alignment - 1) / alignment * alignment
}
