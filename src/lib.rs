//! # Gatesim Core
//!
//! A hierarchical digital logic simulator.
//!
//! This library provides:
//! - A small text language where each circuit type is either a truth table or
//!   a composition of named sub-circuits
//! - A loader that resolves wiring by name and shares each definition between
//!   all of its instances
//! - Logic simulation by table lookup or by walking the hierarchy
//! - Worst-case propagation delay estimation
//! - Truth table synthesis that flattens combinatorial sub-trees
//! - A test-vector runner
//!
//! ## Architecture
//!
//! - [`dsl`] - Lexer and parser for definition files
//! - [`circuit`] - Definitions, wiring resolution and the loading [`Library`]
//! - [`sim`] - Instances, simulation, synthesis and test vectors
//! - [`report`] - Console formatting (CLI only)
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! gatesim ADDER4                  # truth table
//! gatesim ADDER4 0101 0011 0      # one simulation
//! gatesim ADDER4 ADDER4_TEST      # run a test file
//! ```
//!
//! ### Library
//!
//! ```
//! use gatesim_core::{Library, MemorySource};
//!
//! let source = MemorySource::new()
//!     .with("NOT", "inputNames { a } outputNames { y } truthTable { 0 1 1 0 }")
//!     .with("BUF", "inputNames { a } outputNames { y } circuit NOT n1 { a } circuit NOT n2 { n1 } outputs { n2 }");
//! let mut library = Library::new(source);
//! let mut buf = library.instantiate("BUF")?;
//!
//! buf.set_inputs(&[1]);
//! buf.simulate();
//! assert_eq!(buf.outputs(), &[1]);
//! assert_eq!(buf.propagation_delays(), vec![2]);
//! # Ok::<(), gatesim_core::GatesimError>(())
//! ```

pub mod circuit;
pub mod dsl;
pub mod error;
pub mod sim;

#[cfg(feature = "cli")]
pub mod report;

#[cfg(test)]
mod test_utils;

// Re-export main types for convenience
pub use circuit::{Definition, DefinitionSource, Library, LoaderConfig, MemorySource};
pub use error::{GatesimError, Result};
pub use sim::{Instance, TestReport};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::WasmCircuitSim;

/// Largest input count for a truth table (declared or synthesized)
pub const MAX_TRUTH_TABLE_INPUTS: usize = 16;

/// Largest output count for a truth table; rows are packed into a `u32`
pub const MAX_TRUTH_TABLE_OUTPUTS: usize = 32;

/// Default number of truth table rows printed by the CLI
pub const DEFAULT_MAX_ROWS: usize = 1024;
