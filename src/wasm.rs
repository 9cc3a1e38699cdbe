//! WASM bindings for cmos_ic.
//!
//! Exposes an IC built from a netlist string so a web page can render its
//! truth table or poke individual inputs.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmIc } from 'cmos_ic';
//!
//! await init();
//!
//! const ic = new WasmIc(`
//!   .input A
//!   .output Q
//!   .cascade INV
//!   P1 A
//!   N1 A
//!   .ends
//!   .link INV -> Q
//! `);
//!
//! ic.set_input('A', 1);
//! ic.output('Q');        // 0
//! ic.truth_table();      // rendered text table
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::{ContentionPolicy, ResolveConfig};
use crate::dsl;
use crate::ic::Ic;
use crate::report;
use crate::signal::Level;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-compatible integrated circuit.
#[wasm_bindgen]
pub struct WasmIc {
    ic: Ic,
}

#[wasm_bindgen]
impl WasmIc {
    /// Build an IC from a netlist string.
    #[wasm_bindgen(constructor)]
    pub fn new(netlist: &str) -> Result<WasmIc, JsValue> {
        Self::with_config(netlist, false)
    }

    /// Build an IC, optionally failing on driver contention.
    #[wasm_bindgen]
    pub fn with_config(netlist: &str, reject_contention: bool) -> Result<WasmIc, JsValue> {
        let ast = dsl::parse(netlist).map_err(to_js)?;
        let contention = if reject_contention {
            ContentionPolicy::Reject
        } else {
            ContentionPolicy::WiredOr
        };
        let config = ResolveConfig::new().with_contention(contention);
        let ic = Ic::from_ast_with_config(&ast, config).map_err(to_js)?;
        Ok(WasmIc { ic })
    }

    /// IC name.
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.ic.name().to_string()
    }

    /// Rendered truth table followed by the output capacity table.
    #[wasm_bindgen]
    pub fn truth_table(&mut self) -> Result<String, JsValue> {
        let table = self.ic.get_table().map_err(to_js)?;
        Ok(format!(
            "{}\n{}",
            report::truth_table(&table),
            report::capacity_table(&self.ic)
        ))
    }

    /// Set one input (-1, 0 or 1) and re-resolve the outputs.
    #[wasm_bindgen]
    pub fn set_input(&mut self, name: &str, value: i32) -> Result<(), JsValue> {
        let level = Level::try_from(value).map_err(to_js)?;
        self.ic.change_state([(name, level)]).map_err(to_js)
    }

    /// Current value of an output, or `undefined` if no such output exists.
    #[wasm_bindgen]
    pub fn output(&self, name: &str) -> Option<i8> {
        self.ic.output_level(name).map(Level::value)
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
