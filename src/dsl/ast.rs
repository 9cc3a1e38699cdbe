//! Abstract Syntax Tree (AST) for netlists.

use crate::circuit::Designator;

/// A parsed netlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircuitAst {
    /// Circuit name from `.ic`, if given
    pub name: Option<String>,
    /// Top-level inputs in declaration order
    pub inputs: Vec<String>,
    /// Top-level outputs in declaration order
    pub outputs: Vec<String>,
    /// Stage definitions in declaration order
    pub cascades: Vec<CascadeDef>,
    /// Stage output wiring
    pub links: Vec<LinkDef>,
}

impl CircuitAst {
    /// Create an empty AST.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cascade definition by name.
    pub fn cascade(&self, name: &str) -> Option<&CascadeDef> {
        self.cascades.iter().find(|c| c.name == name)
    }
}

/// One `.cascade` ... `.ends` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeDef {
    pub name: String,
    pub inputs: Vec<StageInputDef>,
    pub transistors: Vec<TransistorDef>,
    pub line: usize,
}

/// `.in NAME n...` inside a cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageInputDef {
    pub name: String,
    /// Transistor pair numbers whose gates this input drives
    pub numbers: Vec<u32>,
    pub line: usize,
}

/// A transistor line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransistorDef {
    pub designator: Designator,
    /// Top-level input driving the gate directly
    pub gate: Option<String>,
    pub width: Option<u32>,
    pub length: Option<u32>,
    /// Transistors whose sources this drain feeds; empty means the stage output
    pub downstream: Vec<Designator>,
    pub line: usize,
}

/// `.link CASCADE -> target...`
///
/// A target is either `STAGE.input` or a top-level output name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDef {
    pub from: String,
    pub targets: Vec<String>,
    pub line: usize,
}
