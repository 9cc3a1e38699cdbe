//! Transistor selection predicates.

use crate::circuit::{Graph, Polarity};
use crate::components::Transistor;
use crate::error::Result;

/// Composable filter over polarity, conduction and activity.
///
/// Unset criteria match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransistorFilter {
    polarity: Option<Polarity>,
    open: Option<bool>,
    active: Option<bool>,
}

impl TransistorFilter {
    /// Match every transistor.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = Some(polarity);
        self
    }

    pub fn open(mut self) -> Self {
        self.open = Some(true);
        self
    }

    pub fn closed(mut self) -> Self {
        self.open = Some(false);
        self
    }

    /// On a conducting path to an output.
    pub fn active(mut self) -> Self {
        self.active = Some(true);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = Some(false);
        self
    }

    /// Whether `transistor` passes every set criterion.
    pub fn matches(&self, transistor: &Transistor, graph: &Graph) -> Result<bool> {
        if let Some(polarity) = self.polarity {
            if transistor.polarity() != polarity {
                return Ok(false);
            }
        }
        if let Some(open) = self.open {
            if transistor.is_open(graph)? != open {
                return Ok(false);
            }
        }
        if let Some(active) = self.active {
            if transistor.is_connected_to_output(graph)? != active {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
