//! Error types for the Gatesim circuit simulator.
//!
//! This module provides a unified error type [`GatesimError`] that covers
//! every failure during definition loading, wiring resolution, simulation
//! and test-vector replay. All of them are fatal for the current run; only
//! the binary decides how to report them.

use thiserror::Error;

/// Result type alias using [`GatesimError`].
pub type Result<T> = std::result::Result<T, GatesimError>;

/// Unified error type for all Gatesim operations.
#[derive(Error, Debug)]
pub enum GatesimError {
    // ============ Syntax Errors ============
    /// Unexpected token or misplaced section
    #[error("Syntax error in '{origin}' at line {line}: {message}")]
    SyntaxError {
        origin: String,
        line: usize,
        message: String,
    },

    /// Malformed `[n]` or `[a:b]` shorthand
    #[error("Illegal repeater '{text}' in '{origin}' at line {line}")]
    IllegalRepeater {
        origin: String,
        line: usize,
        text: String,
    },

    /// Word in keyword position that is not a section keyword
    #[error("Unknown command '{keyword}' in '{origin}' at line {line}")]
    UnknownKeyword {
        origin: String,
        line: usize,
        keyword: String,
    },

    /// A circuit that (indirectly) instantiates itself
    #[error("Circuit '{circuit}' instantiates itself: {chain}")]
    RecursiveDefinition { circuit: String, chain: String },

    // ============ Resolution Errors ============
    /// Identifier matches no input, sub-circuit output or constant
    #[error("Could not find '{identifier}' in circuit '{circuit}' at line {line}")]
    Unresolved {
        circuit: String,
        line: usize,
        identifier: String,
    },

    /// Bare sub-circuit name used for a sub-circuit with several outputs
    #[error("Unqualified circuit output for circuit with multiple outputs: '{identifier}' in circuit '{circuit}' at line {line}")]
    UnqualifiedOutput {
        circuit: String,
        line: usize,
        identifier: String,
    },

    // ============ Arity Errors ============
    /// Wrong number of inputs, outputs, delays or truth table rows
    #[error("Arity error in circuit '{circuit}' at line {line}: {message}")]
    ArityError {
        circuit: String,
        line: usize,
        message: String,
    },

    /// Test vector ended before all input and expected output bits were read
    #[error("Incomplete test case in '{origin}' at line {line}")]
    IncompleteTestCase { origin: String, line: usize },

    // ============ Simulation Errors ============
    /// A synthesized table disagrees with walking the hierarchy
    #[error("Synthesized truth table of '{circuit}' differs from its sub-circuits at row {row}")]
    FlatteningMismatch { circuit: String, row: usize },

    // ============ I/O Errors ============
    /// Error reading a circuit or test file
    #[error("Failed to read circuit file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// No text available for a circuit type
    #[error("No definition found for circuit '{circuit}'")]
    MissingDefinition { circuit: String },

    /// Error writing a report
    #[error("Output error: {message}")]
    OutputError { message: String },

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

impl GatesimError {
    /// Create a syntax error
    pub fn syntax(origin: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::SyntaxError {
            origin: origin.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an arity error
    pub fn arity(circuit: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::ArityError {
            circuit: circuit.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an unresolved reference error
    pub fn unresolved(circuit: impl Into<String>, line: usize, identifier: impl Into<String>) -> Self {
        Self::Unresolved {
            circuit: circuit.into(),
            line,
            identifier: identifier.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_circuit_and_construct() {
        let err = GatesimError::unresolved("ADDER", 7, "g3.x");
        assert_eq!(
            err.to_string(),
            "Could not find 'g3.x' in circuit 'ADDER' at line 7"
        );

        let err = GatesimError::arity("AND2", 3, "not enough inputs for XOR x1");
        assert!(err.to_string().contains("AND2"));
        assert!(err.to_string().contains("not enough inputs"));
    }
}
