//! WASM bindings for Gatesim Core.
//!
//! Browsers have no circuit directory, so every definition file is handed
//! over up front as a name/text pair.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCircuitSim } from 'gatesim_core';
//!
//! await init();
//!
//! const sim = new WasmCircuitSim('HALF', ['HALF', 'XOR', 'AND'], [halfText, xorText, andText]);
//! const outputs = sim.simulate(new Uint8Array([1, 1]));
//! const delays = sim.propagation_delays();
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::{Library, MemorySource};
use crate::error::GatesimError;
use crate::sim::{run_test_cases, Instance};

fn to_js(error: GatesimError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// WASM-compatible circuit simulator.
///
/// Holds the loaded library and one root instance, so sequential circuits
/// keep their state between calls to `simulate`.
#[wasm_bindgen]
pub struct WasmCircuitSim {
    library: Library<MemorySource>,
    instance: Instance,
}

#[wasm_bindgen]
impl WasmCircuitSim {
    /// Load `root` from the given definition files.
    ///
    /// # Arguments
    /// * `root` - Circuit type to instantiate
    /// * `names` - Circuit type of each file
    /// * `texts` - Definition text of each file, in the same order
    #[wasm_bindgen(constructor)]
    pub fn new(root: &str, names: Vec<String>, texts: Vec<String>) -> Result<WasmCircuitSim, JsValue> {
        if names.len() != texts.len() {
            return Err(to_js(GatesimError::WasmError {
                message: format!("{} names given for {} files", names.len(), texts.len()),
            }));
        }

        let source: MemorySource = names.into_iter().zip(texts).collect();
        let mut library = Library::new(source);
        let instance = library.instantiate(root).map_err(to_js)?;

        Ok(WasmCircuitSim { library, instance })
    }

    /// Simulate once and return the outputs (one byte per output).
    ///
    /// Missing inputs keep their previous value; any non-zero byte is a 1.
    #[wasm_bindgen]
    pub fn simulate(&mut self, inputs: &[u8]) -> Vec<u8> {
        let values: Vec<u32> = inputs.iter().map(|b| u32::from(*b != 0)).collect();
        self.instance.set_inputs(&values);
        self.instance.simulate();
        self.instance.outputs().iter().map(|v| (*v & 1) as u8).collect()
    }

    /// Worst-case delay of each output. Clears any held state.
    #[wasm_bindgen]
    pub fn propagation_delays(&mut self) -> Vec<u32> {
        self.instance.propagation_delays()
    }

    /// Run a test-vector file and return the number of mismatching bits.
    #[wasm_bindgen]
    pub fn run_tests(&mut self, name: &str, text: &str) -> Result<usize, JsValue> {
        let report = run_test_cases(&mut self.instance, name, text).map_err(to_js)?;
        Ok(report.total_errors())
    }

    /// Input names in bit order.
    #[wasm_bindgen(getter)]
    pub fn input_names(&self) -> Vec<String> {
        self.instance.definition().input_names.clone()
    }

    /// Output names in bit order.
    #[wasm_bindgen(getter)]
    pub fn output_names(&self) -> Vec<String> {
        self.instance.definition().output_names.clone()
    }

    /// Number of distinct circuit types loaded.
    #[wasm_bindgen(getter)]
    pub fn definition_count(&self) -> usize {
        self.library.len()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
