//! Circuit graph representation, resolution and validation.
//!
//! This module provides the connection graph every circuit is built on.
//! The [`Graph`] arena holds all nodes and transistors; each [`Node`] carries
//! a role that fixes how many drivers and loads it may have, and
//! [`Graph::resolve`] pulls levels through it on demand.

mod graph;
mod resolve;
mod types;
pub mod validate;

pub use graph::{Graph, Node, Rails};
pub use resolve::{ContentionPolicy, ResolveConfig};
pub use types::*;
pub use validate::validate_ic;
