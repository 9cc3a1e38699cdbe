//! Circuit graph structure.
//!
//! The graph is an arena of [`Node`]s addressed by [`NodeId`], plus the
//! [`Transistor`]s whose terminals live in it. Edges are plain indices, so
//! one output may fan out to any number of inputs without shared ownership.

use std::cell::Cell;

use tracing::trace;

use super::resolve::ResolveConfig;
use super::types::{Capabilities, NodeId, NodeRole, Polarity, TransistorId};
use crate::components::{Channel, Transistor};
use crate::error::{IcError, Result};
use crate::signal::{Level, Signal, HIGH_RAIL, LOW_RAIL};

/// A vertex of the connection graph.
#[derive(Debug)]
pub struct Node {
    role: NodeRole,
    caps: Capabilities,
    signal: Cell<Signal>,
    inputs: Vec<NodeId>,
    outputs: Vec<NodeId>,
}

impl Node {
    fn new(role: NodeRole, signal: Signal) -> Self {
        let caps = role.capabilities();
        Self {
            role,
            caps,
            signal: Cell::new(signal),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Role of this node.
    pub fn role(&self) -> &NodeRole {
        &self.role
    }

    /// Capabilities derived from the role.
    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    /// Last stored level.
    pub fn level(&self) -> Level {
        self.signal.get().level()
    }

    /// Nodes driving this one.
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Nodes driven by this one.
    pub fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }

    pub(crate) fn store(&self, level: Level) -> Result<()> {
        let mut signal = self.signal.get();
        signal.set(level)?;
        self.signal.set(signal);
        Ok(())
    }
}

/// The two power rail nodes of one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rails {
    pub high: NodeId,
    pub low: NodeId,
}

impl Rails {
    /// The rail a source of the given polarity defaults to.
    pub fn for_polarity(&self, polarity: Polarity) -> NodeId {
        match polarity {
            Polarity::P => self.high,
            Polarity::N => self.low,
        }
    }
}

/// Arena holding every node and transistor of a circuit.
#[derive(Debug)]
pub struct Graph {
    nodes: Vec<Node>,
    transistors: Vec<Transistor>,
    rails: Rails,
    config: ResolveConfig,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Create an empty graph with its own HIGH and LOW rails.
    pub fn new() -> Self {
        Self::with_config(ResolveConfig::default())
    }

    /// Create an empty graph with a custom resolution configuration.
    pub fn with_config(config: ResolveConfig) -> Self {
        let nodes = vec![
            Node::new(NodeRole::Rail(Level::High), HIGH_RAIL),
            Node::new(NodeRole::Rail(Level::Low), LOW_RAIL),
        ];
        Self {
            nodes,
            transistors: Vec::new(),
            rails: Rails {
                high: NodeId(0),
                low: NodeId(1),
            },
            config,
        }
    }

    /// Rail nodes of this graph.
    pub fn rails(&self) -> Rails {
        self.rails
    }

    /// Resolution configuration.
    pub fn config(&self) -> &ResolveConfig {
        &self.config
    }

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes, rails included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get a transistor by ID.
    pub fn transistor(&self, id: TransistorId) -> &Transistor {
        &self.transistors[id.0]
    }

    pub(crate) fn transistor_mut(&mut self, id: TransistorId) -> &mut Transistor {
        &mut self.transistors[id.0]
    }

    /// All transistors in creation order.
    pub fn transistors(&self) -> &[Transistor] {
        &self.transistors
    }

    pub(crate) fn add_node(&mut self, role: NodeRole) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(role, Signal::default()));
        id
    }

    /// Add a top-level input node.
    pub fn add_input(&mut self, name: impl Into<String>) -> NodeId {
        self.add_node(NodeRole::Input(name.into()))
    }

    /// Add a top-level output node.
    pub fn add_output(&mut self, name: impl Into<String>) -> NodeId {
        self.add_node(NodeRole::Output(name.into()))
    }

    /// Create a transistor and its three terminal nodes.
    ///
    /// If `gate` is given it becomes the sole driver of the gate terminal.
    pub fn add_transistor(
        &mut self,
        polarity: Polarity,
        number: u32,
        channel: Channel,
        gate: Option<NodeId>,
    ) -> Result<TransistorId> {
        channel.validate()?;
        let id = TransistorId(self.transistors.len());
        let gate_node = self.add_node(NodeRole::Gate(id));
        let source = self.add_node(NodeRole::Source(id));
        let drain = self.add_node(NodeRole::Drain(id));
        self.transistors.push(Transistor::new(
            polarity, number, channel, gate_node, source, drain,
        ));
        if let Some(driver) = gate {
            self.connect(driver, gate_node)?;
        }
        Ok(id)
    }

    /// Connect `from` as a driver of `to`.
    ///
    /// Connecting the same pair twice is a no-op.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Result<()> {
        if self.nodes[from.0].outputs.contains(&to) {
            return Ok(());
        }

        let out_fan = self.nodes[from.0].caps.outputs;
        let in_fan = self.nodes[to.0].caps.inputs;
        if !out_fan.admits(self.nodes[from.0].outputs.len()) {
            return Err(IcError::connection_limit(
                self.describe(from),
                self.describe(to),
                format!("{} cannot drive more nodes", self.describe(from)),
            ));
        }
        if !in_fan.admits(self.nodes[to.0].inputs.len()) {
            return Err(IcError::connection_limit(
                self.describe(from),
                self.describe(to),
                format!("{} cannot accept more drivers", self.describe(to)),
            ));
        }

        trace!(from = %self.describe(from), to = %self.describe(to), "connect");
        self.nodes[from.0].outputs.push(to);
        self.nodes[to.0].inputs.push(from);
        Ok(())
    }

    /// Assign the level of an input node.
    pub(crate) fn set_level(&self, id: NodeId, level: Level) -> Result<()> {
        self.nodes[id.0].store(level)
    }

    /// Human-readable description of a node for messages.
    pub fn describe(&self, id: NodeId) -> String {
        match &self.nodes[id.0].role {
            NodeRole::Rail(Level::High) => "HIGH rail".to_string(),
            NodeRole::Rail(_) => "LOW rail".to_string(),
            NodeRole::Input(name) => format!("input {}", name),
            NodeRole::Output(name) => format!("output {}", name),
            NodeRole::Gate(t) => format!("gate of {}", self.transistor_label(*t)),
            NodeRole::Source(t) => format!("source of {}", self.transistor_label(*t)),
            NodeRole::Drain(t) => format!("drain of {}", self.transistor_label(*t)),
            NodeRole::StageInput { stage, name } => {
                format!("input {} of cascade {}", name, stage)
            }
            NodeRole::StageOutput { stage } => format!("output of cascade {}", stage),
        }
    }

    fn transistor_label(&self, id: TransistorId) -> String {
        // Terminals are created before the transistor is pushed.
        self.transistors
            .get(id.0)
            .map(|t| t.designator().to_string())
            .unwrap_or_else(|| id.to_string())
    }
}
