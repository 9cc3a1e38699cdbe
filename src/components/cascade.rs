//! Cascades: one logic stage built from a declarative transistor scheme.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::circuit::{validate, Graph, NodeId, NodeRole, Polarity, Rails, TransistorId};
use crate::error::{IcError, Result};
use crate::signal::Level;

/// An element that may appear in a scheme.
///
/// Only transistors are valid; other nodes are rejected at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Transistor(TransistorId),
    Node(NodeId),
}

impl From<TransistorId> for Element {
    fn from(id: TransistorId) -> Self {
        Element::Transistor(id)
    }
}

impl From<NodeId> for Element {
    fn from(id: NodeId) -> Self {
        Element::Node(id)
    }
}

/// Ordered map of transistor → downstream transistors.
///
/// An empty downstream list terminates the transistor at the stage output.
#[derive(Debug, Clone, Default)]
pub struct Scheme {
    entries: Vec<(Element, Vec<Element>)>,
}

impl Scheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain of `key` feeds the sources of every `downstream` transistor.
    pub fn entry<E, I>(mut self, key: impl Into<Element>, downstream: I) -> Self
    where
        E: Into<Element>,
        I: IntoIterator<Item = E>,
    {
        self.push(key, downstream);
        self
    }

    /// Drain of `key` feeds the stage output.
    pub fn terminal(mut self, key: impl Into<Element>) -> Self {
        self.entries.push((key.into(), Vec::new()));
        self
    }

    /// Append an entry in place.
    pub fn push<E, I>(&mut self, key: impl Into<Element>, downstream: I)
    where
        E: Into<Element>,
        I: IntoIterator<Item = E>,
    {
        let downstream = downstream.into_iter().map(Into::into).collect();
        self.entries.push((key.into(), downstream));
    }

    pub fn entries(&self) -> &[(Element, Vec<Element>)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Named stage inputs, each driving the gates of one or more P/N pairs.
#[derive(Debug, Clone, Default)]
pub struct StageInputs {
    entries: Vec<(String, Vec<u32>)>,
}

impl StageInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input `name` drives the gates of the P and N transistors with these numbers.
    pub fn input(
        mut self,
        name: impl Into<String>,
        numbers: impl IntoIterator<Item = u32>,
    ) -> Self {
        self.push(name, numbers);
        self
    }

    /// Append an input in place.
    pub fn push(&mut self, name: impl Into<String>, numbers: impl IntoIterator<Item = u32>) {
        self.entries
            .push((name.into(), numbers.into_iter().collect()));
    }

    pub fn entries(&self) -> &[(String, Vec<u32>)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A named logic stage with named inputs and a single output.
#[derive(Debug, Clone)]
pub struct Cascade {
    name: String,
    inputs: Vec<(String, NodeId)>,
    output: NodeId,
    transistors: Vec<TransistorId>,
}

impl Cascade {
    /// Wire a cascade into `graph` from its scheme.
    ///
    /// Each stage input drives the gates of the member transistors carrying
    /// one of its numbers. Sources left without a driver are tied to
    /// the rail of their polarity. Everything is checked before the graph is
    /// touched, so a failed build leaves `graph` as it was.
    pub fn build(
        graph: &mut Graph,
        rails: Rails,
        name: impl Into<String>,
        inputs: &StageInputs,
        scheme: &Scheme,
    ) -> Result<Self> {
        let name = name.into();
        let edges = collect_edges(graph, &name, scheme)?;
        validate::check_scheme_acyclic(graph, &name, &edges)?;

        // Keys first, then transistors that only appear downstream.
        let mut members: Vec<TransistorId> = edges.iter().map(|(key, _)| *key).collect();
        for (_, downstream) in &edges {
            for t in downstream {
                if !members.contains(t) {
                    members.push(*t);
                }
            }
        }
        check_members(graph, &name, &members)?;
        let gates = plan_stage_inputs(graph, &name, inputs, &members)?;

        let output = graph.add_node(NodeRole::StageOutput {
            stage: name.clone(),
        });

        for (key, downstream) in &edges {
            let drain = graph.transistor(*key).drain();
            if downstream.is_empty() {
                graph.connect(drain, output)?;
                continue;
            }
            for t in downstream {
                let source = graph.transistor(*t).source();
                graph.connect(drain, source)?;
            }
        }

        for &t in &members {
            let transistor = graph.transistor(t);
            let source = transistor.source();
            if graph.node(source).inputs().is_empty() {
                let rail = rails.for_polarity(transistor.polarity());
                graph.connect(rail, source)?;
            }
        }

        let mut stage_inputs: Vec<(String, NodeId)> = Vec::with_capacity(gates.len());
        for (input_name, driven) in gates {
            let node = graph.add_node(NodeRole::StageInput {
                stage: name.clone(),
                name: input_name.clone(),
            });
            for t in driven {
                let gate = graph.transistor(t).gate();
                graph.connect(node, gate)?;
            }
            stage_inputs.push((input_name, node));
        }

        for &t in &members {
            graph.transistor_mut(t).set_owner(&name);
        }

        debug!(
            cascade = %name,
            transistors = members.len(),
            inputs = stage_inputs.len(),
            "built cascade"
        );

        Ok(Self {
            name,
            inputs: stage_inputs,
            output,
            transistors: members,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stage input node by name.
    pub fn input(&self, name: &str) -> Option<NodeId> {
        self.inputs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
    }

    /// Stage input names in declaration order.
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|(n, _)| n.as_str())
    }

    /// The stage output node.
    pub fn output(&self) -> NodeId {
        self.output
    }

    /// Last resolved level of the stage output.
    pub fn output_level(&self, graph: &Graph) -> Level {
        graph.node(self.output).level()
    }

    /// Member transistors in scheme order.
    pub fn transistors(&self) -> &[TransistorId] {
        &self.transistors
    }

    /// Find a member transistor by polarity and number.
    pub fn transistor(
        &self,
        graph: &Graph,
        polarity: Polarity,
        number: u32,
    ) -> Option<TransistorId> {
        self.transistors.iter().copied().find(|t| {
            let t = graph.transistor(*t);
            t.polarity() == polarity && t.number() == number
        })
    }

    /// A cascade without named inputs.
    pub fn is_autonomous(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Drive `target` from this stage's output.
    pub fn connect_to(&self, graph: &mut Graph, target: NodeId) -> Result<()> {
        graph.connect(self.output, target)
    }

    /// Sum of channel widths of every transistor whose source is directly fed
    /// by this stage's output. Zero when the output drives nothing.
    pub fn out_capacity(&self, graph: &Graph) -> u32 {
        let loaded: HashSet<TransistorId> = graph
            .node(self.output)
            .outputs()
            .iter()
            .filter_map(|&next| match graph.node(next).role() {
                NodeRole::Source(t) => Some(*t),
                _ => None,
            })
            .collect();
        width_sum(graph, loaded)
    }

    /// Sum of channel widths of every transistor whose gate hangs on this
    /// output, directly or through a stage input of the next cascade.
    pub fn gate_load(&self, graph: &Graph) -> u32 {
        let mut seen = HashSet::new();
        let mut loaded = HashSet::new();
        let mut stack = vec![self.output];
        while let Some(id) = stack.pop() {
            for &next in graph.node(id).outputs() {
                if !seen.insert(next) {
                    continue;
                }
                match graph.node(next).role() {
                    NodeRole::Gate(t) => {
                        loaded.insert(*t);
                    }
                    NodeRole::StageInput { .. } => stack.push(next),
                    _ => {}
                }
            }
        }
        width_sum(graph, loaded)
    }
}

fn width_sum(graph: &Graph, transistors: HashSet<TransistorId>) -> u32 {
    transistors
        .into_iter()
        .map(|t| graph.transistor(t).channel().width)
        .sum()
}

/// Check every scheme element is a transistor and collect the edge list.
fn collect_edges(
    graph: &Graph,
    stage: &str,
    scheme: &Scheme,
) -> Result<Vec<(TransistorId, Vec<TransistorId>)>> {
    let as_transistor = |element: &Element| match element {
        Element::Transistor(t) if t.0 < graph.transistors().len() => Ok(*t),
        Element::Transistor(t) => Err(IcError::construction(format!(
            "cascade {}: {} is not a transistor of this circuit",
            stage, t
        ))),
        Element::Node(n) => Err(IcError::construction(format!(
            "cascade {}: {} is not a transistor",
            stage,
            graph.describe(*n)
        ))),
    };

    let mut edges: Vec<(TransistorId, Vec<TransistorId>)> =
        Vec::with_capacity(scheme.entries().len());
    for (key, downstream) in scheme.entries() {
        let key = as_transistor(key)?;
        if edges.iter().any(|(k, _)| *k == key) {
            return Err(IcError::construction(format!(
                "cascade {}: {} appears twice as a scheme key",
                stage,
                graph.transistor(key).designator()
            )));
        }
        let downstream = downstream
            .iter()
            .map(as_transistor)
            .collect::<Result<Vec<_>>>()?;
        edges.push((key, downstream));
    }
    Ok(edges)
}

/// Designators must be unique and transistors unowned.
fn check_members(graph: &Graph, stage: &str, members: &[TransistorId]) -> Result<()> {
    let mut designators = HashMap::new();
    for &t in members {
        let transistor = graph.transistor(t);
        if let Some(owner) = transistor.owner() {
            return Err(IcError::construction(format!(
                "{} already belongs to cascade {}",
                transistor.designator(),
                owner
            )));
        }
        if designators.insert(transistor.designator(), t).is_some() {
            return Err(IcError::construction(format!(
                "cascade {}: duplicate transistor {}",
                stage,
                transistor.designator()
            )));
        }
    }
    Ok(())
}

/// Map every stage input to the member transistors whose gates it drives.
///
/// Names must be unique, every number must match a member, and each gate
/// must be free: no existing driver and no other stage input claiming it.
fn plan_stage_inputs(
    graph: &Graph,
    stage: &str,
    inputs: &StageInputs,
    members: &[TransistorId],
) -> Result<Vec<(String, Vec<TransistorId>)>> {
    let mut planned: Vec<(String, Vec<TransistorId>)> = Vec::with_capacity(inputs.len());
    let mut claimed: HashSet<TransistorId> = HashSet::new();
    for (input_name, numbers) in inputs.entries() {
        if planned.iter().any(|(n, _)| n == input_name) {
            return Err(IcError::construction(format!(
                "cascade {} declares input '{}' twice",
                stage, input_name
            )));
        }
        let input_label = format!("input {} of cascade {}", input_name, stage);
        let mut driven = Vec::new();
        for &number in numbers {
            let matching: Vec<TransistorId> = members
                .iter()
                .copied()
                .filter(|t| graph.transistor(*t).number() == number)
                .collect();
            if matching.is_empty() {
                return Err(IcError::construction(format!(
                    "cascade {} input '{}' refers to missing transistor pair {}",
                    stage, input_name, number
                )));
            }
            for t in matching {
                if driven.contains(&t) {
                    continue;
                }
                let gate = graph.transistor(t).gate();
                if !graph.node(gate).inputs().is_empty() || claimed.contains(&t) {
                    return Err(IcError::connection_limit(
                        input_label.clone(),
                        graph.describe(gate),
                        format!("{} cannot accept more drivers", graph.describe(gate)),
                    ));
                }
                claimed.insert(t);
                driven.push(t);
            }
        }
        planned.push((input_name.clone(), driven));
    }
    Ok(planned)
}
