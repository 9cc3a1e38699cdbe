//! MOS transistor model.

use std::collections::HashSet;

use crate::circuit::{Designator, Graph, NodeId, NodeRole, Polarity};
use crate::error::{IcError, Result};
use crate::signal::{potential_difference, Level};

/// Default channel width.
pub const DEFAULT_CHANNEL_WIDTH: u32 = 6;

/// Default channel length.
pub const DEFAULT_CHANNEL_LENGTH: u32 = 9999;

/// Physical channel dimensions.
///
/// Only used for load estimation; switching ignores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub width: u32,
    pub length: u32,
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            width: DEFAULT_CHANNEL_WIDTH,
            length: DEFAULT_CHANNEL_LENGTH,
        }
    }
}

impl Channel {
    /// Create a channel with the given width and length.
    pub fn new(width: u32, length: u32) -> Self {
        Self { width, length }
    }

    /// Create a channel with the given width and the default length.
    pub fn with_width(width: u32) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.width == 0 || self.length == 0 {
            return Err(IcError::construction(format!(
                "channel width and length must be positive (got {}x{})",
                self.width, self.length
            )));
        }
        Ok(())
    }
}

/// A three-terminal MOS switch.
///
/// The channel conducts (is *open*) when gate and source sit at different
/// defined levels. An open transistor passes its source level to the drain.
#[derive(Debug, Clone)]
pub struct Transistor {
    polarity: Polarity,
    number: u32,
    channel: Channel,
    gate: NodeId,
    source: NodeId,
    drain: NodeId,
    owner: Option<String>,
}

impl Transistor {
    pub(crate) fn new(
        polarity: Polarity,
        number: u32,
        channel: Channel,
        gate: NodeId,
        source: NodeId,
        drain: NodeId,
    ) -> Self {
        Self {
            polarity,
            number,
            channel,
            gate,
            source,
            drain,
            owner: None,
        }
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn designator(&self) -> Designator {
        Designator::new(self.polarity, self.number)
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn gate(&self) -> NodeId {
        self.gate
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn drain(&self) -> NodeId {
        self.drain
    }

    /// Name of the cascade this transistor belongs to, if any.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub(crate) fn set_owner(&mut self, cascade: &str) {
        self.owner = Some(cascade.to_string());
    }

    /// Whether the channel conducts.
    pub fn is_open(&self, graph: &Graph) -> Result<bool> {
        let gate = graph.resolve(self.gate)?;
        let source = graph.resolve(self.source)?;
        Ok(potential_difference(gate, source))
    }

    /// Resolved drain level.
    pub fn drain_level(&self, graph: &Graph) -> Result<Level> {
        graph.resolve(self.drain)
    }

    /// Whether this transistor is open and its drain reaches a declared
    /// output through a chain of open transistors.
    pub fn is_connected_to_output(&self, graph: &Graph) -> Result<bool> {
        if !self.is_open(graph)? {
            return Ok(false);
        }
        let mut visited = HashSet::new();
        reaches_output(graph, self.drain, &mut visited)
    }
}

fn reaches_output(graph: &Graph, id: NodeId, visited: &mut HashSet<NodeId>) -> Result<bool> {
    if !visited.insert(id) {
        return Ok(false);
    }

    let node = graph.node(id);
    match node.role() {
        NodeRole::Output(_) => return Ok(true),
        NodeRole::Source(t) => {
            // Conduction continues through the channel only while it is open.
            let next = graph.transistor(*t);
            if next.is_open(graph)? {
                return reaches_output(graph, next.drain(), visited);
            }
            return Ok(false);
        }
        _ => {}
    }

    for &next in node.outputs() {
        if reaches_output(graph, next, visited)? {
            return Ok(true);
        }
    }
    Ok(false)
}
