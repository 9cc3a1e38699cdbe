//! # cmos_ic
//!
//! A transistor-level simulator for static CMOS logic.
//!
//! This library provides:
//! - A connection graph of rails, I/O, transistor terminals and stage nodes
//! - Three-valued signals (`-`, `0`, `1`) resolved on demand through the graph
//! - Cascades: logic stages wired from a declarative transistor scheme
//! - Integrated circuits that enumerate every input state into a truth table,
//!   annotated with the transistors that conduct and the ones that matter
//! - A line-oriented netlist language for describing all of the above
//!
//! ## Architecture
//!
//! - [`signal`] - Levels and lockable signals
//! - [`circuit`] - Graph arena, node roles, resolution and validation
//! - [`components`] - Transistors and cascades
//! - [`ic`] - Integrated circuits, state enumeration and truth tables
//! - [`dsl`] - Parser for the netlist language
//! - [`report`] - Text rendering of tables
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! cmos-ic demos/full_adder.ic
//! cmos-ic demos/full_adder.ic --set X=1 --set Y=1
//! ```
//!
//! ### Library
//!
//! ```
//! use cmos_ic::{dsl, Ic, Level};
//!
//! let netlist = "
//!     .input A
//!     .output Q
//!     .cascade INV
//!     P1 A
//!     N1 A
//!     .ends
//!     .link INV -> Q
//! ";
//! let mut ic = Ic::from_ast(&dsl::parse(netlist)?)?;
//! ic.change_state([("A", Level::High)])?;
//! assert_eq!(ic.output_level("Q"), Some(Level::Low));
//! # Ok::<(), cmos_ic::IcError>(())
//! ```
//!
//! ### WASM
//!
//! ```javascript
//! import { WasmIc } from 'cmos_ic';
//!
//! const ic = new WasmIc(netlist);
//! console.log(ic.truth_table());
//! ```
//!
//! ## Resolution Model
//!
//! Nothing is pushed. Asking for a node's level walks its drivers back to the
//! rails and inputs; a drain takes its source's level only while gate and
//! source sit at different defined levels. Several drivers on one node merge
//! by taking the maximum (`-` < `0` < `1`) unless
//! [`ContentionPolicy::Reject`](circuit::ContentionPolicy) is configured.

pub mod circuit;
pub mod components;
pub mod dsl;
pub mod error;
pub mod ic;
pub mod report;
pub mod signal;

// Re-export main types for convenience
pub use circuit::{ContentionPolicy, Graph, ResolveConfig};
pub use components::{Cascade, Scheme, StageInputs, Transistor};
pub use error::{IcError, Result};
pub use ic::{Ic, TransistorFilter, TruthTable};
pub use signal::{Level, Signal};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmIc;

/// The bundled full adder netlist.
pub const FULL_ADDER: &str = include_str!("../demos/full_adder.ic");
