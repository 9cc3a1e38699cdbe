//! Plain-text tables for truth tables and load reports.

use std::fmt;

use crate::circuit::Designator;
use crate::ic::{Ic, TruthTable};

/// A bordered text table with a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Missing cells render empty, extra cells are dropped.
    pub fn add_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .take(self.header.len())
            .map(|c| c.to_string())
            .collect();
        row.resize(self.header.len(), String::new());
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.header.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }
}

impl fmt::Display for TextTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();

        let rule = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            for width in &widths {
                write!(f, "+{}", "-".repeat(width + 2))?;
            }
            writeln!(f, "+")
        };
        let line = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            for (cell, width) in cells.iter().zip(&widths) {
                write!(f, "| {:<width$} ", cell, width = *width)?;
            }
            writeln!(f, "|")
        };

        rule(f)?;
        line(f, &self.header)?;
        rule(f)?;
        for row in &self.rows {
            line(f, row)?;
        }
        rule(f)
    }
}

fn join(designators: &[Designator]) -> String {
    designators
        .iter()
        .map(Designator::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Inputs, outputs, then open and active transistors per state.
pub fn truth_table(table: &TruthTable) -> TextTable {
    let mut text = TextTable::new(
        table
            .input_names
            .iter()
            .chain(&table.output_names)
            .map(String::as_str)
            .chain(["Open transistors", "Active transistors"]),
    );
    for row in &table.rows {
        let levels = row.inputs.iter().chain(&row.outputs).map(|l| l.to_string());
        text.add_row(levels.chain([join(&row.open), join(&row.active)]));
    }
    text
}

/// Output load of every cascade, in declaration order.
pub fn capacity_table(ic: &Ic) -> TextTable {
    let mut text = TextTable::new(["Cascade", "Out capacity", "Gate load"]);
    for cascade in ic.cascades() {
        text.add_row([
            cascade.name().to_string(),
            cascade.out_capacity(ic.graph()).to_string(),
            cascade.gate_load(ic.graph()).to_string(),
        ]);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Polarity;
    use crate::ic::TableRow;
    use crate::signal::Level;

    #[test]
    fn test_render_pads_columns() {
        let mut table = TextTable::new(["A", "Long header"]);
        table.add_row(["xyz", "1"]);
        table.add_row(["only one"]);
        let expected = "\
+----------+-------------+
| A        | Long header |
+----------+-------------+
| xyz      | 1           |
| only one |             |
+----------+-------------+
";
        assert_eq!(table.to_string(), expected);
    }

    #[test]
    fn test_truth_table_cells() {
        let table = TruthTable {
            input_names: vec!["A".to_string()],
            output_names: vec!["Q".to_string()],
            rows: vec![TableRow {
                inputs: vec![Level::Low],
                outputs: vec![Level::High],
                open: vec![Designator::new(Polarity::P, 1), Designator::new(Polarity::N, 2)],
                active: vec![Designator::new(Polarity::P, 1)],
            }],
        };
        let text = truth_table(&table);
        assert_eq!(
            text.rows()[0],
            vec!["0", "1", "Tp1, Tn2", "Tp1"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }
}
