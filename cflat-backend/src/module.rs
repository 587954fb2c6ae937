//! Module emitter
//!
//! Drives the whole `generate` pass: binds addresses for globals and
//! common symbols, then walks the sections in their fixed order —
//! `.file`, `.data`, `.rodata` (when any string constants exist),
//! `.text` (when any function is defined), and `.bss`.

use cflat_asm::{Assembler, Label, Operand};
use cflat_ast::{Ast, Expr, ExprKind};
use cflat_common::{CodegenError, Type, VarId};
use log::{debug, info};

/// Compile `ast` and return the assembly module as one string.
///
/// All errors are fatal: the AST was outside the supported subset and
/// no partial assembly is returned.
pub fn generate(ast: &Ast) -> Result<String, CodegenError> {
    CodeGenerator::new(ast).generate_assembly()
}

/// Mangle a global symbol name for the platform. Identity on Linux.
pub(crate) fn csymbol(sym: &str) -> &str {
    sym
}

/// Mangle an undefined (extern) symbol name. Identity on Linux.
pub(crate) fn tmpsymbol(sym: &str) -> &str {
    sym
}

/// The code generator: one assembler, one AST, one address table.
///
/// Addresses are bound once — at module prologue for globals, commons
/// and constants, at function entry for parameters and locals — and
/// never rebound. The AST itself is only read.
pub struct CodeGenerator<'a> {
    pub(crate) asm: Assembler,
    pub(crate) ast: &'a Ast,
    addresses: Vec<Option<Operand>>,
    pub(crate) current_function: Option<usize>,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        CodeGenerator {
            asm: Assembler::new(),
            ast,
            addresses: vec![None; ast.variable_count()],
            current_function: None,
        }
    }

    /// Compile the AST and generate assembly code
    pub fn generate_assembly(mut self) -> Result<String, CodegenError> {
        info!("generating assembly for \"{}\"", self.ast.file_name());
        self.allocate_global_variables();
        self.allocate_common_symbols();

        self.asm._file(self.ast.file_name());
        // .data
        self.compile_global_variables()?;
        if !self.ast.constant_table().is_empty() {
            self.compile_constants();
        }
        // .text
        if self.ast.function_defined() {
            self.compile_functions()?;
        }
        // .bss
        self.compile_common_symbols()?;

        Ok(self.asm.into_string())
    }

    // ===== Address binding =====

    /// Sets addresses for public and private global variables
    fn allocate_global_variables(&mut self) {
        let ast = self.ast;
        for &id in ast.global_variables() {
            let addr = global_variable_address(&ast.variable(id).name);
            self.bind_address(id, addr);
        }
    }

    /// Sets addresses for public and private common symbols
    fn allocate_common_symbols(&mut self) {
        let ast = self.ast;
        for &id in ast.common_symbols() {
            let addr = common_symbol_address(&ast.variable(id).name);
            self.bind_address(id, addr);
        }
    }

    pub(crate) fn bind_address(&mut self, id: VarId, addr: Operand) {
        debug_assert!(
            self.addresses[id as usize].is_none(),
            "address of '{}' bound twice",
            self.ast.variable(id).name
        );
        self.addresses[id as usize] = Some(addr);
    }

    /// The bound address of an entity. Every entity reachable from a
    /// function body has its address set before lowering touches it.
    pub(crate) fn address(&self, id: VarId) -> Operand {
        match &self.addresses[id as usize] {
            Some(addr) => addr.clone(),
            None => panic!(
                "COMPILER BUG: variable '{}' referenced before address allocation",
                self.ast.variable(id).name
            ),
        }
    }

    // ===== Type queries =====

    pub(crate) fn type_size(&self, ty: Type, context: &str) -> Result<u32, CodegenError> {
        ty.size().ok_or_else(|| CodegenError::TypeQueryOnFunction {
            context: context.to_string(),
        })
    }

    pub(crate) fn type_alignment(&self, ty: Type, context: &str) -> Result<u32, CodegenError> {
        ty.alignment().ok_or_else(|| CodegenError::TypeQueryOnFunction {
            context: context.to_string(),
        })
    }

    // ===== .data =====

    /// Generates static variable entries
    fn compile_global_variables(&mut self) -> Result<(), CodegenError> {
        self.asm._data();
        let ast = self.ast;
        for &id in ast.global_variables() {
            self.data_entry(id)?;
        }
        Ok(())
    }

    /// Generates one initialized entry
    fn data_entry(&mut self, id: VarId) -> Result<(), CodegenError> {
        let ast = self.ast;
        let var = ast.variable(id);
        debug!("data entry '{}'", var.name);
        if !var.private {
            self.asm._globl(csymbol(&var.name));
        }
        let size = self.type_size(var.ty, &var.name)?;
        self.asm._align(size);
        self.asm._type(csymbol(&var.name), "@object");
        self.asm._size(csymbol(&var.name), size);
        self.asm.label(&Label::new(csymbol(&var.name)));
        self.compile_immediate(var.ty, var.initializer.as_ref(), &var.name)
    }

    /// Generates an immediate value for the .data section. Static data
    /// accepts only integer-literal initializers.
    fn compile_immediate(
        &mut self,
        ty: Type,
        init: Option<&Expr>,
        symbol: &str,
    ) -> Result<(), CodegenError> {
        let value = match init.map(|e| &e.kind) {
            Some(ExprKind::IntLiteral(v)) => *v,
            _ => {
                return Err(CodegenError::UnsupportedInitializer {
                    symbol: symbol.to_string(),
                })
            }
        };
        match self.type_size(ty, symbol)? {
            1 => self.asm._byte(value),
            2 => self.asm._value(value),
            4 => self.asm._long(value),
            8 => self.asm._quad(value),
            size => {
                return Err(CodegenError::InvalidDataEntrySize {
                    symbol: symbol.to_string(),
                    size,
                })
            }
        }
        Ok(())
    }

    // ===== .rodata =====

    /// Generates .rodata entries (constant strings)
    fn compile_constants(&mut self) {
        self.asm._section(".rodata");
        let ast = self.ast;
        for ent in ast.constant_table().entries() {
            self.asm.label(ent.label());
            self.asm._string(ent.value());
        }
    }

    // ===== .text =====

    /// Compiles all defined functions
    fn compile_functions(&mut self) -> Result<(), CodegenError> {
        self.asm._text();
        for idx in 0..self.ast.functions().len() {
            self.compile_function(idx)?;
        }
        Ok(())
    }

    // ===== .bss =====

    /// Generates BSS entries
    fn compile_common_symbols(&mut self) -> Result<(), CodegenError> {
        let ast = self.ast;
        for &id in ast.common_symbols() {
            let var = ast.variable(id);
            if var.private {
                self.asm._local(csymbol(&var.name));
            }
            let size = self.type_size(var.ty, &var.name)?;
            let alignment = self.type_alignment(var.ty, &var.name)?;
            self.asm._comm(csymbol(&var.name), size, alignment);
        }
        Ok(())
    }
}

fn global_variable_address(sym: &str) -> Operand {
    Operand::Sym(Label::new(csymbol(sym)))
}

fn common_symbol_address(sym: &str) -> Operand {
    Operand::Sym(Label::new(csymbol(sym)))
}
