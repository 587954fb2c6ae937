//! The AST root handed to the code generator
//!
//! Owns the entity arena, the constant table, and the top-level
//! declaration lists. The accessors here are the whole input surface
//! of the code generator.

use crate::entity::{DefinedFunction, Variable};
use cflat_asm::Label;
use cflat_common::{ConstId, TypeTable, VarId};
use serde::{Deserialize, Serialize};

/// A string literal interned to a `.rodata` label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantEntry {
    label: Label,
    value: String,
}

impl ConstantEntry {
    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Interned string literals, labeled `.LC0`, `.LC1`, ...
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstantTable {
    entries: Vec<ConstantEntry>,
}

impl ConstantTable {
    pub fn new() -> Self {
        ConstantTable::default()
    }

    /// Intern a string value, reusing the entry of an equal value
    pub fn intern(&mut self, value: impl Into<String>) -> ConstId {
        let value = value.into();
        if let Some(id) = self.entries.iter().position(|e| e.value == value) {
            return id as ConstId;
        }
        let id = self.entries.len() as ConstId;
        self.entries.push(ConstantEntry {
            label: Label::new(format!(".LC{}", id)),
            value,
        });
        id
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ConstantEntry] {
        &self.entries
    }

    pub fn get(&self, id: ConstId) -> Option<&ConstantEntry> {
        self.entries.get(id as usize)
    }
}

/// The compilation unit consumed by `generate`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ast {
    file_name: String,
    type_table: TypeTable,
    variables: Vec<Variable>,
    globals: Vec<VarId>,
    commons: Vec<VarId>,
    constants: ConstantTable,
    functions: Vec<DefinedFunction>,
}

impl Ast {
    pub fn new(file_name: impl Into<String>) -> Self {
        Ast {
            file_name: file_name.into(),
            ..Ast::default()
        }
    }

    // ===== Construction (driven by the semantic phase or fixtures) =====

    /// Add an entity to the arena without listing it anywhere; used for
    /// parameters and function locals.
    pub fn add_variable(&mut self, var: Variable) -> VarId {
        let id = self.variables.len() as VarId;
        self.variables.push(var);
        id
    }

    /// Add an initialized global destined for `.data`
    pub fn add_global(&mut self, var: Variable) -> VarId {
        let id = self.add_variable(var);
        self.globals.push(id);
        id
    }

    /// Add an uninitialized common symbol destined for `.bss`
    pub fn add_common(&mut self, var: Variable) -> VarId {
        let id = self.add_variable(var);
        self.commons.push(id);
        id
    }

    pub fn add_function(&mut self, func: DefinedFunction) {
        self.functions.push(func);
    }

    pub fn constant_table_mut(&mut self) -> &mut ConstantTable {
        &mut self.constants
    }

    // ===== Accessors (the generator's input surface) =====

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn type_table(&self) -> &TypeTable {
        &self.type_table
    }

    pub fn global_variables(&self) -> &[VarId] {
        &self.globals
    }

    pub fn common_symbols(&self) -> &[VarId] {
        &self.commons
    }

    pub fn constant_table(&self) -> &ConstantTable {
        &self.constants
    }

    pub fn function_defined(&self) -> bool {
        !self.functions.is_empty()
    }

    pub fn functions(&self) -> &[DefinedFunction] {
        &self.functions
    }

    pub fn variable(&self, id: VarId) -> &Variable {
        &self.variables[id as usize]
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }
}
