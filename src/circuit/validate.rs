//! Structural validation.

use std::collections::{HashMap, HashSet};

use crate::components::Cascade;
use crate::error::{IcError, Result};

use super::{Graph, NodeId, NodeRole, TransistorId};

/// Maximum number of top-level inputs an IC can enumerate.
pub const MAX_INPUTS: usize = 63;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Reject schemes whose drain → source edges form a cycle.
pub fn check_scheme_acyclic(
    graph: &Graph,
    stage: &str,
    edges: &[(TransistorId, Vec<TransistorId>)],
) -> Result<()> {
    let adjacency: HashMap<TransistorId, &[TransistorId]> = edges
        .iter()
        .map(|(key, downstream)| (*key, downstream.as_slice()))
        .collect();
    let mut marks: HashMap<TransistorId, Mark> = HashMap::new();

    for (start, _) in edges {
        if marks.contains_key(start) {
            continue;
        }
        // Iterative DFS: (node, index of next child to visit)
        let mut stack = vec![(*start, 0usize)];
        marks.insert(*start, Mark::Visiting);
        while let Some((current, child)) = stack.pop() {
            let children = adjacency.get(&current).copied().unwrap_or(&[]);
            if child == children.len() {
                marks.insert(current, Mark::Done);
                continue;
            }
            stack.push((current, child + 1));
            let next = children[child];
            match marks.get(&next) {
                Some(Mark::Visiting) => {
                    return Err(IcError::construction(format!(
                        "cascade {}: scheme has a cycle through {}",
                        stage,
                        graph.transistor(next).designator()
                    )));
                }
                Some(Mark::Done) => {}
                None => {
                    marks.insert(next, Mark::Visiting);
                    stack.push((next, 0));
                }
            }
        }
    }
    Ok(())
}

/// Validate the top-level structure of an IC.
///
/// Checks:
/// - Inputs and outputs have the right roles and unique names
/// - The input count can be enumerated
/// - Cascade names are unique
/// - Every cascade transistor has a gate driver
pub fn validate_ic(
    graph: &Graph,
    inputs: &[NodeId],
    outputs: &[NodeId],
    cascades: &[Cascade],
) -> Result<()> {
    let mut names = HashSet::new();
    for &id in inputs {
        match graph.node(id).role() {
            NodeRole::Input(name) => {
                if !names.insert(name.as_str()) {
                    return Err(IcError::construction(format!("duplicate input '{}'", name)));
                }
            }
            _ => {
                return Err(IcError::construction(format!(
                    "{} cannot be used as an IC input",
                    graph.describe(id)
                )));
            }
        }
    }

    if inputs.len() > MAX_INPUTS {
        return Err(IcError::construction(format!(
            "too many inputs to enumerate ({} > {})",
            inputs.len(),
            MAX_INPUTS
        )));
    }

    let mut names = HashSet::new();
    for &id in outputs {
        match graph.node(id).role() {
            NodeRole::Output(name) => {
                if !names.insert(name.as_str()) {
                    return Err(IcError::construction(format!("duplicate output '{}'", name)));
                }
            }
            _ => {
                return Err(IcError::construction(format!(
                    "{} cannot be used as an IC output",
                    graph.describe(id)
                )));
            }
        }
    }

    let mut names = HashSet::new();
    for cascade in cascades {
        if !names.insert(cascade.name()) {
            return Err(IcError::construction(format!(
                "duplicate cascade '{}'",
                cascade.name()
            )));
        }
        for &t in cascade.transistors() {
            let gate = graph.transistor(t).gate();
            if graph.node(gate).inputs().is_empty() {
                return Err(IcError::NotConnected {
                    node: graph.describe(gate),
                });
            }
        }
    }

    Ok(())
}
