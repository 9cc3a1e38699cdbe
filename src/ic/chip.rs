//! The integrated circuit: top-level I/O plus cascades over one graph.

use std::time::Instant;

use tracing::{debug, info, warn};

use super::filter::TransistorFilter;
use super::states::States;
use super::table::{TableRow, TruthTable};
use crate::circuit::{validate_ic, Designator, Graph, NodeId, NodeRole, Polarity};
use crate::components::{Cascade, Transistor};
use crate::error::{IcError, Result};
use crate::signal::Level;

/// An integrated circuit ready for evaluation.
///
/// The IC owns its graph. It keeps no signal state of its own: every level
/// it reports is read from, or resolved through, the graph.
#[derive(Debug)]
pub struct Ic {
    name: String,
    graph: Graph,
    inputs: Vec<(String, NodeId)>,
    outputs: Vec<(String, NodeId)>,
    cascades: Vec<Cascade>,
}

impl Ic {
    /// Assemble an IC and put it in the all-LOW state.
    pub fn new(
        name: impl Into<String>,
        graph: Graph,
        inputs: Vec<NodeId>,
        outputs: Vec<NodeId>,
        cascades: Vec<Cascade>,
    ) -> Result<Self> {
        validate_ic(&graph, &inputs, &outputs, &cascades)?;

        let inputs = inputs
            .into_iter()
            .map(|id| (io_name(&graph, id), id))
            .collect();
        let outputs = outputs
            .into_iter()
            .map(|id| (io_name(&graph, id), id))
            .collect();

        let mut ic = Self {
            name: name.into(),
            graph,
            inputs,
            outputs,
            cascades,
        };
        ic.change_state(std::iter::empty::<(&str, Level)>())?;

        info!(
            ic = %ic.name,
            inputs = ic.inputs.len(),
            outputs = ic.outputs.len(),
            cascades = ic.cascades.len(),
            transistors = ic.graph.transistors().len(),
            "built IC"
        );
        Ok(ic)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Input names in declaration order.
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|(n, _)| n.as_str())
    }

    /// Output names in declaration order.
    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.outputs.iter().map(|(n, _)| n.as_str())
    }

    /// Current level of an input.
    pub fn input_level(&self, name: &str) -> Option<Level> {
        self.find_input(name)
            .map(|id| self.graph.node(id).level())
    }

    /// Level of an output as of the last state change.
    pub fn output_level(&self, name: &str) -> Option<Level> {
        self.outputs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| self.graph.node(*id).level())
    }

    pub fn cascades(&self) -> &[Cascade] {
        &self.cascades
    }

    pub fn cascade(&self, name: &str) -> Option<&Cascade> {
        self.cascades.iter().find(|c| c.name() == name)
    }

    fn find_input(&self, name: &str) -> Option<NodeId> {
        self.inputs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
    }

    /// Assign input levels, then re-resolve every output.
    ///
    /// An empty assignment sets every input LOW. All names are checked before
    /// anything is assigned. If resolution fails the previous input levels
    /// are restored and the outputs resolved again, so a failing call
    /// changes nothing.
    pub fn change_state<I, K>(&mut self, assignments: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Level)>,
        K: AsRef<str>,
    {
        let mut resolved = Vec::new();
        for (name, level) in assignments {
            let name = name.as_ref();
            let id = self.find_input(name).ok_or_else(|| IcError::UnknownInputName {
                name: name.to_string(),
                expected: self.input_names().map(str::to_string).collect(),
            })?;
            resolved.push((id, level));
        }
        if resolved.is_empty() {
            resolved = self.inputs.iter().map(|(_, id)| (*id, Level::Low)).collect();
        }

        let previous: Vec<(NodeId, Level)> = self
            .inputs
            .iter()
            .map(|(_, id)| (*id, self.graph.node(*id).level()))
            .collect();
        for (id, level) in resolved {
            self.graph.set_level(id, level)?;
        }

        if let Err(err) = self.refresh() {
            for (id, level) in previous {
                self.graph.set_level(id, level)?;
            }
            if let Err(restore) = self.refresh() {
                warn!(ic = %self.name, error = %restore, "previous state no longer resolves");
            }
            return Err(err);
        }
        Ok(())
    }

    /// Re-resolve every output in declaration order.
    fn refresh(&self) -> Result<()> {
        for (name, id) in &self.outputs {
            let level = self.graph.resolve(*id)?;
            debug!(output = %name, %level, "resolved output");
        }
        Ok(())
    }

    /// Every full input assignment, first input as most significant bit.
    pub fn all_states(&self) -> States {
        States::new(self.input_names().map(str::to_string).collect())
    }

    /// Evaluate every input state and snapshot I/O and transistor activity.
    pub fn get_table(&mut self) -> Result<TruthTable> {
        let started = Instant::now();
        let open_filter = TransistorFilter::any().open();
        let active_filter = TransistorFilter::any().open().active();

        let mut rows = Vec::new();
        for state in self.all_states() {
            self.change_state(state.iter())?;
            rows.push(TableRow {
                inputs: self
                    .inputs
                    .iter()
                    .map(|(_, id)| self.graph.node(*id).level())
                    .collect(),
                outputs: self
                    .outputs
                    .iter()
                    .map(|(_, id)| self.graph.node(*id).level())
                    .collect(),
                open: self.designators(&open_filter)?,
                active: self.designators(&active_filter)?,
            });
        }

        info!(
            ic = %self.name,
            rows = rows.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
            "truth table computed"
        );

        Ok(TruthTable {
            input_names: self.input_names().map(str::to_string).collect(),
            output_names: self.output_names().map(str::to_string).collect(),
            rows,
        })
    }

    /// Transistors of every cascade matching `filter`, in cascade order.
    pub fn transistors(&self, filter: &TransistorFilter) -> Result<Vec<&Transistor>> {
        let mut matched = Vec::new();
        for cascade in &self.cascades {
            for &t in cascade.transistors() {
                let transistor = self.graph.transistor(t);
                if filter.matches(transistor, &self.graph)? {
                    matched.push(transistor);
                }
            }
        }
        Ok(matched)
    }

    /// First transistor with the given polarity and number, in cascade order.
    pub fn transistor(&self, polarity: Polarity, number: u32) -> Option<&Transistor> {
        self.cascades
            .iter()
            .find_map(|c| c.transistor(&self.graph, polarity, number))
            .map(|t| self.graph.transistor(t))
    }

    fn designators(&self, filter: &TransistorFilter) -> Result<Vec<Designator>> {
        Ok(self
            .transistors(filter)?
            .into_iter()
            .map(Transistor::designator)
            .collect())
    }
}

fn io_name(graph: &Graph, id: NodeId) -> String {
    match graph.node(id).role() {
        NodeRole::Input(name) | NodeRole::Output(name) => name.clone(),
        _ => graph.describe(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{ContentionPolicy, ResolveConfig};
    use crate::components::{Channel, Scheme, StageInputs};

    fn d(polarity: Polarity, number: u32) -> Designator {
        Designator::new(polarity, number)
    }

    /// Two-input NAND: P1 ∥ P2 to HIGH, N1 → N2 in series to LOW.
    fn nand() -> Ic {
        let mut graph = Graph::new();
        let rails = graph.rails();
        let a = graph.add_input("A");
        let b = graph.add_input("B");
        let q = graph.add_output("Q");
        let mut add = |polarity, number, gate| {
            graph
                .add_transistor(polarity, number, Channel::default(), Some(gate))
                .unwrap()
        };
        let p1 = add(Polarity::P, 1, a);
        let p2 = add(Polarity::P, 2, b);
        let n1 = add(Polarity::N, 1, a);
        let n2 = add(Polarity::N, 2, b);
        let scheme = Scheme::new()
            .terminal(p1)
            .terminal(p2)
            .entry(n1, [n2])
            .terminal(n2);
        let cascade =
            Cascade::build(&mut graph, rails, "NAND", &StageInputs::new(), &scheme).unwrap();
        cascade.connect_to(&mut graph, q).unwrap();
        Ic::new("NAND2", graph, vec![a, b], vec![q], vec![cascade]).unwrap()
    }

    #[test]
    fn test_new_ic_starts_all_low() {
        let ic = nand();
        assert_eq!(ic.input_level("A"), Some(Level::Low));
        assert_eq!(ic.input_level("B"), Some(Level::Low));
        assert_eq!(ic.output_level("Q"), Some(Level::High));
    }

    #[test]
    fn test_nand_truth_table() {
        let mut ic = nand();
        let table = ic.get_table().unwrap();
        assert_eq!(table.input_names, vec!["A", "B"]);
        assert_eq!(
            table.output_column("Q").unwrap(),
            vec![Level::High, Level::High, Level::High, Level::Low]
        );

        let row = &table.rows[0];
        assert_eq!(row.open, vec![d(Polarity::P, 1), d(Polarity::P, 2)]);
        assert_eq!(row.active, row.open);

        // A=1, B=0: N1 conducts but the series chain is broken at N2.
        let row = &table.rows[2];
        assert_eq!(row.inputs, vec![Level::High, Level::Low]);
        assert_eq!(row.open, vec![d(Polarity::P, 2), d(Polarity::N, 1)]);
        assert_eq!(row.active, vec![d(Polarity::P, 2)]);

        let row = &table.rows[3];
        assert_eq!(row.active, vec![d(Polarity::N, 1), d(Polarity::N, 2)]);
    }

    #[test]
    fn test_get_table_is_idempotent() {
        let mut ic = nand();
        let first = ic.get_table().unwrap();
        let second = ic.get_table().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_change_state_and_reset() {
        let mut ic = nand();
        ic.change_state([("A", Level::High), ("B", Level::High)]).unwrap();
        assert_eq!(ic.output_level("Q"), Some(Level::Low));

        ic.change_state(Vec::<(&str, Level)>::new()).unwrap();
        assert_eq!(ic.input_level("A"), Some(Level::Low));
        assert_eq!(ic.input_level("B"), Some(Level::Low));
        assert_eq!(ic.output_level("Q"), Some(Level::High));
    }

    #[test]
    fn test_unknown_input_name_leaves_state_untouched() {
        let mut ic = nand();
        ic.change_state([("A", Level::High)]).unwrap();
        let err = ic
            .change_state([("B", Level::High), ("bogus", Level::High)])
            .unwrap_err();
        assert_eq!(
            err,
            IcError::UnknownInputName {
                name: "bogus".to_string(),
                expected: vec!["A".to_string(), "B".to_string()],
            }
        );
        assert_eq!(ic.input_level("B"), Some(Level::Low));
        assert_eq!(ic.output_level("Q"), Some(Level::High));
    }

    #[test]
    fn test_contention_rolls_back_inputs() {
        let config = ResolveConfig::new().with_contention(ContentionPolicy::Reject);
        let mut graph = Graph::with_config(config);
        let rails = graph.rails();
        let a = graph.add_input("A");
        let b = graph.add_input("B");
        let q = graph.add_output("Q");
        let r = graph.add_output("R");

        // Inverters of A and B both drive Q; a second inverter of A drives R.
        let mut inverter = |name: &str, number: u32, gate: NodeId, target: NodeId| {
            let p = graph
                .add_transistor(Polarity::P, number, Channel::default(), Some(gate))
                .unwrap();
            let n = graph
                .add_transistor(Polarity::N, number, Channel::default(), Some(gate))
                .unwrap();
            let scheme = Scheme::new().terminal(p).terminal(n);
            let cascade =
                Cascade::build(&mut graph, rails, name, &StageInputs::new(), &scheme).unwrap();
            cascade.connect_to(&mut graph, target).unwrap();
            cascade
        };
        let cascades = vec![
            inverter("IA", 1, a, q),
            inverter("IB", 2, b, q),
            inverter("IR", 3, a, r),
        ];
        let mut ic = Ic::new("WIRED", graph, vec![a, b], vec![q, r], cascades).unwrap();

        let err = ic.change_state([("A", Level::High)]).unwrap_err();
        assert_eq!(
            err,
            IcError::DriverContention {
                node: "output Q".to_string()
            }
        );
        assert_eq!(ic.input_level("A"), Some(Level::Low));
        assert_eq!(ic.output_level("Q"), Some(Level::High));
        assert_eq!(ic.output_level("R"), Some(Level::High));

        ic.change_state([("A", Level::High), ("B", Level::High)]).unwrap();
        assert_eq!(ic.output_level("Q"), Some(Level::Low));
        assert_eq!(ic.output_level("R"), Some(Level::Low));
    }

    #[test]
    fn test_transistor_queries() {
        let mut ic = nand();
        assert_eq!(
            ic.transistor(Polarity::N, 2).map(Transistor::designator),
            Some(d(Polarity::N, 2))
        );
        assert!(ic.transistor(Polarity::N, 9).is_none());

        ic.change_state([("A", Level::High), ("B", Level::High)]).unwrap();
        let closed_p = ic
            .transistors(&TransistorFilter::any().polarity(Polarity::P).closed())
            .unwrap();
        assert_eq!(closed_p.len(), 2);
        let inactive = ic.transistors(&TransistorFilter::any().inactive()).unwrap();
        assert_eq!(inactive.len(), 2);
    }

    #[test]
    fn test_unconnected_output_blocks_construction() {
        let mut graph = Graph::new();
        let a = graph.add_input("A");
        let q = graph.add_output("Q");
        let err = Ic::new("BROKEN", graph, vec![a], vec![q], Vec::new()).unwrap_err();
        assert!(matches!(err, IcError::NotConnected { .. }));
    }

    #[test]
    fn test_undriven_gate_blocks_construction() {
        let mut graph = Graph::new();
        let rails = graph.rails();
        let q = graph.add_output("Q");
        let p = graph
            .add_transistor(Polarity::P, 1, Channel::default(), None)
            .unwrap();
        let scheme = Scheme::new().terminal(p);
        let cascade = Cascade::build(&mut graph, rails, "I", &StageInputs::new(), &scheme).unwrap();
        cascade.connect_to(&mut graph, q).unwrap();
        let err = Ic::new("IC", graph, Vec::new(), vec![q], vec![cascade]).unwrap_err();
        assert_eq!(
            err,
            IcError::NotConnected {
                node: "gate of Tp1".to_string()
            }
        );
    }

    #[test]
    fn test_inputs_must_be_input_nodes() {
        let mut graph = Graph::new();
        let q = graph.add_output("Q");
        let rails = graph.rails();
        assert!(matches!(
            Ic::new("IC", graph, vec![rails.high], vec![q], Vec::new()),
            Err(IcError::Construction { .. })
        ));
    }
}
