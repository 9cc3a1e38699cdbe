//! Transistor-level building blocks.
//!
//! - [`Transistor`]: a P or N channel switch with gate, source and drain
//! - [`Cascade`]: a logic stage wired from a [`Scheme`] of transistors

mod cascade;
mod transistor;

pub use cascade::{Cascade, Element, Scheme, StageInputs};
pub use transistor::{Channel, Transistor, DEFAULT_CHANNEL_LENGTH, DEFAULT_CHANNEL_WIDTH};
