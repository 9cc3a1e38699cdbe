//! Truth table snapshots.

use crate::circuit::Designator;
use crate::signal::Level;

/// One evaluated input state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Input levels in declaration order
    pub inputs: Vec<Level>,
    /// Output levels in declaration order
    pub outputs: Vec<Level>,
    /// Transistors conducting in this state
    pub open: Vec<Designator>,
    /// Conducting transistors on a live path to an output
    pub active: Vec<Designator>,
}

/// All rows of an exhaustive run, in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    pub input_names: Vec<String>,
    pub output_names: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl TruthTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column index of an output.
    pub fn output_index(&self, name: &str) -> Option<usize> {
        self.output_names.iter().position(|n| n == name)
    }

    /// Levels of one output across all rows.
    pub fn output_column(&self, name: &str) -> Option<Vec<Level>> {
        let idx = self.output_index(name)?;
        Some(self.rows.iter().map(|row| row.outputs[idx]).collect())
    }
}
