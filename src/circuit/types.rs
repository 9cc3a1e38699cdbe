//! Core types for circuit representation.

use std::fmt;
use std::str::FromStr;

use crate::error::{IcError, Result};
use crate::signal::Level;

/// A unique identifier for a node in the circuit graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// A unique identifier for a transistor in the circuit graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransistorId(pub usize);

impl fmt::Display for TransistorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// Transistor channel polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Polarity {
    /// PMOS: pulls toward the HIGH rail
    P,
    /// NMOS: pulls toward the LOW rail
    N,
}

impl Polarity {
    /// The rail level this polarity's network pulls toward.
    pub fn rail_level(self) -> Level {
        match self {
            Polarity::P => Level::High,
            Polarity::N => Level::Low,
        }
    }

    /// Parse a polarity from its letter.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(Polarity::P),
            'n' => Some(Polarity::N),
            _ => None,
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::P => write!(f, "p"),
            Polarity::N => write!(f, "n"),
        }
    }
}

/// Scheme designation of a transistor: polarity plus number (e.g. `Tp3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Designator {
    pub polarity: Polarity,
    pub number: u32,
}

impl Designator {
    pub fn new(polarity: Polarity, number: u32) -> Self {
        Self { polarity, number }
    }
}

impl fmt::Display for Designator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}{}", self.polarity, self.number)
    }
}

impl FromStr for Designator {
    type Err = IcError;

    /// Accepts `P3`, `n12`, `Tp3`.
    fn from_str(s: &str) -> Result<Self> {
        let body = s
            .strip_prefix('T')
            .filter(|rest| rest.starts_with(|c: char| Polarity::from_char(c).is_some()))
            .unwrap_or(s);
        let mut chars = body.chars();
        let polarity = chars
            .next()
            .and_then(Polarity::from_char)
            .ok_or_else(|| IcError::construction(format!("'{}' is not a transistor", s)))?;
        let number = chars
            .as_str()
            .parse::<u32>()
            .map_err(|_| IcError::construction(format!("'{}' is not a transistor", s)))?;
        Ok(Designator { polarity, number })
    }
}

/// How many edges a node accepts in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fan {
    /// The direction is not allowed at all
    Forbidden,
    /// Up to the given number of edges
    AtMost(usize),
    /// No limit
    Unlimited,
}

impl Fan {
    /// Whether one more edge fits when `current` edges already exist.
    pub fn admits(self, current: usize) -> bool {
        match self {
            Fan::Forbidden => false,
            Fan::AtMost(limit) => current < limit,
            Fan::Unlimited => true,
        }
    }
}

/// Capability flags derived from a node role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub inputs: Fan,
    pub outputs: Fan,
    pub locked: bool,
}

/// What a node stands for in the circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRole {
    /// Fixed power rail
    Rail(Level),
    /// Top-level IC input
    Input(String),
    /// Top-level IC output
    Output(String),
    /// Transistor gate terminal
    Gate(TransistorId),
    /// Transistor source terminal
    Source(TransistorId),
    /// Transistor drain terminal
    Drain(TransistorId),
    /// Named input of a cascade
    StageInput { stage: String, name: String },
    /// The single output of a cascade
    StageOutput { stage: String },
}

impl NodeRole {
    /// Capabilities allowed for this role.
    pub fn capabilities(&self) -> Capabilities {
        let (inputs, outputs) = match self {
            NodeRole::Rail(_) | NodeRole::Input(_) | NodeRole::Drain(_) => {
                (Fan::Forbidden, Fan::Unlimited)
            }
            NodeRole::Output(_) | NodeRole::Source(_) => (Fan::Unlimited, Fan::Forbidden),
            NodeRole::Gate(_) => (Fan::AtMost(1), Fan::Forbidden),
            NodeRole::StageInput { .. } | NodeRole::StageOutput { .. } => {
                (Fan::Unlimited, Fan::Unlimited)
            }
        };
        Capabilities {
            inputs,
            outputs,
            locked: matches!(self, NodeRole::Rail(_)),
        }
    }

    /// Short label of the role kind.
    pub fn kind(&self) -> &'static str {
        match self {
            NodeRole::Rail(_) => "rail",
            NodeRole::Input(_) => "input",
            NodeRole::Output(_) => "output",
            NodeRole::Gate(_) => "gate",
            NodeRole::Source(_) => "source",
            NodeRole::Drain(_) => "drain",
            NodeRole::StageInput { .. } => "stage input",
            NodeRole::StageOutput { .. } => "stage output",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_designator_parse_and_display() {
        let d: Designator = "P3".parse().unwrap();
        assert_eq!(d, Designator::new(Polarity::P, 3));
        assert_eq!(d.to_string(), "Tp3");
        assert_eq!("Tn12".parse::<Designator>().unwrap(), Designator::new(Polarity::N, 12));
        assert!("X".parse::<Designator>().is_err());
        assert!("P".parse::<Designator>().is_err());
    }

    #[test]
    fn test_gate_fan_in_limit() {
        let caps = NodeRole::Gate(TransistorId(0)).capabilities();
        assert!(caps.inputs.admits(0));
        assert!(!caps.inputs.admits(1));
        assert!(!caps.outputs.admits(0));
    }

    #[test]
    fn test_rail_is_locked_source() {
        let caps = NodeRole::Rail(Level::High).capabilities();
        assert!(caps.locked);
        assert!(!caps.inputs.admits(0));
        assert!(caps.outputs.admits(100));
    }
}
