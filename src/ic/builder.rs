//! Building an [`Ic`] from a parsed netlist.

use std::collections::HashMap;

use tracing::debug;

use super::Ic;
use crate::circuit::{Designator, Graph, NodeId, ResolveConfig, TransistorId};
use crate::components::{
    Cascade, Channel, Scheme, StageInputs, DEFAULT_CHANNEL_LENGTH, DEFAULT_CHANNEL_WIDTH,
};
use crate::dsl::{CascadeDef, CircuitAst, LinkDef};
use crate::error::{IcError, Result};

/// Name used when the netlist has no `.ic` line.
pub const DEFAULT_IC_NAME: &str = "IC";

impl Ic {
    /// Build an IC from a netlist AST with the default resolution config.
    pub fn from_ast(ast: &CircuitAst) -> Result<Self> {
        Self::from_ast_with_config(ast, ResolveConfig::default())
    }

    /// Build an IC from a netlist AST.
    pub fn from_ast_with_config(ast: &CircuitAst, config: ResolveConfig) -> Result<Self> {
        let mut graph = Graph::with_config(config);

        let inputs = declare(&mut graph, &ast.inputs, "input", |g, n| g.add_input(n))?;
        let outputs = declare(&mut graph, &ast.outputs, "output", |g, n| g.add_output(n))?;

        let mut cascades = Vec::with_capacity(ast.cascades.len());
        for def in &ast.cascades {
            cascades.push(build_cascade(&mut graph, &inputs, def)?);
        }

        for link in &ast.links {
            wire_link(&mut graph, &cascades, &outputs, link)?;
        }

        let name = ast.name.as_deref().unwrap_or(DEFAULT_IC_NAME);
        Ic::new(
            name,
            graph,
            inputs.into_iter().map(|(_, id)| id).collect(),
            outputs.into_iter().map(|(_, id)| id).collect(),
            cascades,
        )
    }
}

/// Add named I/O nodes in order, rejecting repeats.
fn declare<'a>(
    graph: &mut Graph,
    names: &'a [String],
    kind: &str,
    add: fn(&mut Graph, String) -> NodeId,
) -> Result<Vec<(&'a str, NodeId)>> {
    let mut declared: Vec<(&str, NodeId)> = Vec::with_capacity(names.len());
    for name in names {
        if lookup(&declared, name).is_some() {
            return Err(IcError::construction(format!("duplicate {} '{}'", kind, name)));
        }
        declared.push((name.as_str(), add(graph, name.clone())));
    }
    Ok(declared)
}

fn build_cascade(
    graph: &mut Graph,
    inputs: &[(&str, NodeId)],
    def: &CascadeDef,
) -> Result<Cascade> {
    let mut members: HashMap<Designator, TransistorId> = HashMap::new();
    for t in &def.transistors {
        if members.contains_key(&t.designator) {
            return Err(IcError::construction(format!(
                "cascade {}: {} declared twice (line {})",
                def.name, t.designator, t.line
            )));
        }
        let gate = match &t.gate {
            Some(name) => Some(lookup(inputs, name).ok_or_else(|| {
                IcError::construction(format!(
                    "cascade {}: gate of {} names unknown input '{}' (line {})",
                    def.name, t.designator, name, t.line
                ))
            })?),
            None => None,
        };
        let channel = Channel::new(
            t.width.unwrap_or(DEFAULT_CHANNEL_WIDTH),
            t.length.unwrap_or(DEFAULT_CHANNEL_LENGTH),
        );
        let id = graph.add_transistor(t.designator.polarity, t.designator.number, channel, gate)?;
        members.insert(t.designator, id);
    }

    let mut scheme = Scheme::new();
    for t in &def.transistors {
        let key = members[&t.designator];
        let mut downstream = Vec::with_capacity(t.downstream.len());
        for target in &t.downstream {
            let id = members.get(target).copied().ok_or_else(|| {
                IcError::construction(format!(
                    "cascade {}: {} feeds undeclared transistor {} (line {})",
                    def.name, t.designator, target, t.line
                ))
            })?;
            downstream.push(id);
        }
        scheme.push(key, downstream);
    }

    let mut stage_inputs = StageInputs::new();
    for input in &def.inputs {
        stage_inputs.push(input.name.clone(), input.numbers.iter().copied());
    }

    let rails = graph.rails();
    Cascade::build(graph, rails, def.name.clone(), &stage_inputs, &scheme)
}

fn wire_link(
    graph: &mut Graph,
    cascades: &[Cascade],
    outputs: &[(&str, NodeId)],
    link: &LinkDef,
) -> Result<()> {
    let from = cascades
        .iter()
        .find(|c| c.name() == link.from)
        .ok_or_else(|| {
            IcError::construction(format!(
                "link from unknown cascade '{}' (line {})",
                link.from, link.line
            ))
        })?;

    for target in &link.targets {
        let node = match target.split_once('.') {
            Some((stage, input)) => cascades
                .iter()
                .find(|c| c.name() == stage)
                .and_then(|c| c.input(input)),
            None => lookup(outputs, target),
        }
        .ok_or_else(|| {
            IcError::construction(format!(
                "link target '{}' is neither an output nor a cascade input (line {})",
                target, link.line
            ))
        })?;
        from.connect_to(graph, node)?;
        debug!(from = %link.from, to = %target, "linked cascade output");
    }
    Ok(())
}

fn lookup(declared: &[(&str, NodeId)], name: &str) -> Option<NodeId> {
    declared
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, id)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{ContentionPolicy, Polarity};
    use crate::dsl::parse;
    use crate::signal::Level;

    const INVERTER: &str = "
        .ic INV
        .input A
        .output Q
        .cascade I
        P1 A w=4
        N1 A
        .ends
        .link I -> Q
    ";

    #[test]
    fn test_inverter_from_netlist() {
        let mut ic = Ic::from_ast(&parse(INVERTER).unwrap()).unwrap();
        assert_eq!(ic.name(), "INV");
        assert_eq!(ic.output_level("Q"), Some(Level::High));
        ic.change_state([("A", Level::High)]).unwrap();
        assert_eq!(ic.output_level("Q"), Some(Level::Low));

        let p1 = ic.transistor(Polarity::P, 1).unwrap();
        assert_eq!(p1.channel().width, 4);
        assert_eq!(p1.channel().length, DEFAULT_CHANNEL_LENGTH);
        assert_eq!(p1.owner(), Some("I"));
    }

    #[test]
    fn test_default_name_and_config() {
        let netlist = INVERTER.replace(".ic INV", "");
        let config = ResolveConfig::new().with_contention(ContentionPolicy::Reject);
        let ic = Ic::from_ast_with_config(&parse(&netlist).unwrap(), config).unwrap();
        assert_eq!(ic.name(), DEFAULT_IC_NAME);
        assert_eq!(ic.graph().config().contention, ContentionPolicy::Reject);
    }

    #[test]
    fn test_construction_errors() {
        let cases = [
            (".input A A\n", "duplicate input 'A'"),
            (
                ".cascade I\nP1 B\n.ends\n",
                "cascade I: gate of Tp1 names unknown input 'B' (line 2)",
            ),
            (
                ".input A\n.cascade I\nP1 A -> N2\n.ends\n",
                "cascade I: Tp1 feeds undeclared transistor Tn2 (line 3)",
            ),
            (
                ".input A\n.cascade I\nP1 A\nP1 A\n.ends\n",
                "cascade I: Tp1 declared twice (line 4)",
            ),
            (
                ".input A\n.cascade I\nP1 A\n.ends\n.link J -> I.x\n",
                "link from unknown cascade 'J' (line 5)",
            ),
            (
                ".input A\n.cascade I\nP1 A\n.ends\n.link I -> I.x\n",
                "link target 'I.x' is neither an output nor a cascade input (line 5)",
            ),
        ];
        for (netlist, message) in cases {
            let err = Ic::from_ast(&parse(netlist).unwrap()).unwrap_err();
            assert_eq!(err, IcError::construction(message), "netlist: {:?}", netlist);
        }
    }

    #[test]
    fn test_gate_driven_twice_is_rejected() {
        let netlist = "
            .input A
            .output Q
            .cascade I
            .in x 1
            P1 A
            N1 A
            .ends
            .link I -> Q
        ";
        let err = Ic::from_ast(&parse(netlist).unwrap()).unwrap_err();
        assert!(matches!(err, IcError::ConnectionLimit { .. }));
    }
}
