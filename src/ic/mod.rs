//! Integrated circuits: named I/O over a set of cascades.
//!
//! An [`Ic`] owns the graph its cascades were built in. Input levels are
//! assigned with [`Ic::change_state`], every output is re-resolved eagerly,
//! and [`Ic::get_table`] walks all input combinations in
//! [`Ic::all_states`] order to produce a [`TruthTable`].

mod builder;
mod chip;
mod filter;
mod states;
mod table;

pub use builder::DEFAULT_IC_NAME;
pub use chip::Ic;
pub use filter::TransistorFilter;
pub use states::{InputState, States};
pub use table::{TableRow, TruthTable};
