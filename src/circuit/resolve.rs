//! Pull-based signal resolution.
//!
//! Resolving a node walks its upstream fan-in and stores the merged level on
//! every node it visits. Nothing is cached between calls: each call sees the
//! current input assignments. Within one call every node is resolved at most
//! once, and a node that is re-entered while still being resolved (a cycle)
//! contributes its previously stored level.

use std::collections::{HashMap, HashSet};

use super::graph::Graph;
use super::types::{NodeId, NodeRole, TransistorId};
use crate::error::{IcError, Result};
use crate::signal::{potential_difference, Level};

/// How to merge simultaneous LOW and HIGH drivers on one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentionPolicy {
    /// Take the maximum of all drivers, so HIGH wins over LOW.
    #[default]
    WiredOr,
    /// Fail with [`IcError::DriverContention`].
    Reject,
}

/// Configuration for signal resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolveConfig {
    /// Conflicting-driver behavior.
    pub contention: ContentionPolicy,
}

impl ResolveConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the contention policy.
    pub fn with_contention(mut self, contention: ContentionPolicy) -> Self {
        self.contention = contention;
        self
    }
}

/// State of a single resolution call.
struct Resolution<'g> {
    graph: &'g Graph,
    resolved: HashMap<NodeId, Level>,
    in_progress: HashSet<NodeId>,
}

impl<'g> Resolution<'g> {
    fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            resolved: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    fn resolve(&mut self, id: NodeId) -> Result<Level> {
        let graph = self.graph;
        let node = graph.node(id);
        match node.role() {
            NodeRole::Rail(level) => return Ok(*level),
            NodeRole::Input(_) => return Ok(node.level()),
            _ => {}
        }

        if let Some(level) = self.resolved.get(&id) {
            return Ok(*level);
        }
        if !self.in_progress.insert(id) {
            return Ok(node.level());
        }

        let level = match node.role() {
            NodeRole::Drain(t) => self.resolve_drain(*t)?,
            _ => self.resolve_drivers(id)?,
        };

        self.in_progress.remove(&id);
        node.store(level)?;
        self.resolved.insert(id, level);
        Ok(level)
    }

    fn resolve_drivers(&mut self, id: NodeId) -> Result<Level> {
        let graph = self.graph;
        let inputs = graph.node(id).inputs();
        if inputs.is_empty() {
            return Err(IcError::NotConnected {
                node: graph.describe(id),
            });
        }

        let mut level = Level::Undefined;
        let mut saw_low = false;
        let mut saw_high = false;
        for &input in inputs {
            let driven = self.resolve(input)?;
            saw_low |= driven == Level::Low;
            saw_high |= driven == Level::High;
            level = level.max(driven);
        }

        if saw_low && saw_high && graph.config().contention == ContentionPolicy::Reject {
            return Err(IcError::DriverContention {
                node: graph.describe(id),
            });
        }
        Ok(level)
    }

    fn resolve_drain(&mut self, t: TransistorId) -> Result<Level> {
        let graph = self.graph;
        let transistor = graph.transistor(t);
        let source = self.resolve(transistor.source())?;
        let gate = self.resolve(transistor.gate())?;
        if potential_difference(gate, source) {
            Ok(source)
        } else {
            Ok(Level::Undefined)
        }
    }
}

impl Graph {
    /// Resolve the level of a node from its drivers, storing it on the way.
    pub fn resolve(&self, id: NodeId) -> Result<Level> {
        Resolution::new(self).resolve(id)
    }
}
