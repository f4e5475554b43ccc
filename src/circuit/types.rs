//! Core types for circuit representation.

use std::fmt;

/// Contents of one input or output cell.
///
/// Holds a logic level (0 or 1) during logic simulation and an accumulated
/// delay during propagation-delay simulation.
pub type Value = u32;

/// A cell reachable from inside one composite circuit.
///
/// Slots are indices relative to the owning circuit, never references, so a
/// whole instance tree can be cloned or rebuilt without dangling wires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Input cell of the owning circuit
    Input(usize),
    /// Output cell of one of the owner's sub-circuits
    ChildOutput { child: usize, output: usize },
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Input(i) => write!(f, "in{}", i),
            Slot::ChildOutput { child, output } => write!(f, "c{}.out{}", child, output),
        }
    }
}

/// What feeds an input or output cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Literal `0` or `1`
    Constant(Value),
    /// Another cell in the same scope
    Slot(Slot),
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Constant(v) => write!(f, "{}", v),
            Binding::Slot(slot) => write!(f, "{}", slot),
        }
    }
}

/// How a truth table came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableOrigin {
    /// Written in the definition file
    Declared,
    /// Baked from the sub-circuits by the synthesizer
    Synthesized,
}

/// Flat lookup table from input row to packed outputs.
///
/// Bit `i` of the row index is input `i`; bit `i` of an entry is output `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    rows: Vec<u32>,
    origin: TableOrigin,
}

impl TruthTable {
    /// Table written in a definition file.
    pub fn declared(rows: Vec<u32>) -> Self {
        Self {
            rows,
            origin: TableOrigin::Declared,
        }
    }

    /// Table computed by simulation.
    pub fn synthesized(rows: Vec<u32>) -> Self {
        Self {
            rows,
            origin: TableOrigin::Synthesized,
        }
    }

    /// Packed outputs for the given input row.
    pub fn lookup(&self, row: usize) -> u32 {
        self.rows[row]
    }

    /// Number of rows (`2^inputs`).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in index order.
    pub fn rows(&self) -> &[u32] {
        &self.rows
    }

    /// Where the table came from.
    pub fn origin(&self) -> TableOrigin {
        self.origin
    }
}
