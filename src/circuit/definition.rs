//! Circuit definitions shared by every instance of a type.

use std::rc::Rc;

use super::types::{Binding, TableOrigin, TruthTable, Value};

/// A sub-circuit placed inside a composite definition.
#[derive(Debug, Clone)]
pub struct ChildDef {
    /// Instance name, unique within the parent
    pub name: String,
    /// Shared definition of the sub-circuit type
    pub definition: Rc<Definition>,
    /// Source of each input; `None` when left unbound with `...`
    pub inputs: Vec<Option<Binding>>,
}

/// A loaded circuit type.
///
/// Built once per type name by the [`Library`](super::Library) and shared
/// through `Rc` by every parent that instantiates it.
#[derive(Debug, Clone)]
pub struct Definition {
    /// Circuit type, also the file name
    pub type_name: String,
    /// Input names in bit order
    pub input_names: Vec<String>,
    /// Output names in bit order
    pub output_names: Vec<String>,
    /// Declared or synthesized lookup table
    pub truth_table: Option<TruthTable>,
    /// Sub-circuits in declaration (and evaluation) order
    pub children: Vec<ChildDef>,
    /// Source of each output; empty for declared truth tables
    pub outputs: Vec<Binding>,
    /// Outputs depend only on current inputs
    pub combinatorial: bool,
    /// Per-output delay overriding the default of 1
    pub propagation_delay: Option<Vec<Value>>,
}

impl Definition {
    /// Number of inputs.
    pub fn num_inputs(&self) -> usize {
        self.input_names.len()
    }

    /// Number of outputs.
    pub fn num_outputs(&self) -> usize {
        self.output_names.len()
    }

    /// Index of the named input.
    pub fn input_index(&self, name: &str) -> Option<usize> {
        self.input_names.iter().position(|n| n == name)
    }

    /// Index of the named output.
    pub fn output_index(&self, name: &str) -> Option<usize> {
        self.output_names.iter().position(|n| n == name)
    }

    /// Find a sub-circuit by instance name.
    pub fn child(&self, name: &str) -> Option<(usize, &ChildDef)> {
        self.children.iter().enumerate().find(|(_, c)| c.name == name)
    }

    /// Defined directly by a truth table in its file.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self.truth_table.as_ref().map(TruthTable::origin),
            Some(TableOrigin::Declared)
        )
    }

    /// Has a synthesized table standing in for its sub-circuits.
    pub fn is_flattened(&self) -> bool {
        matches!(
            self.truth_table.as_ref().map(TruthTable::origin),
            Some(TableOrigin::Synthesized)
        )
    }

    /// Number of primitive circuits in the fully expanded hierarchy.
    pub fn primitive_count(&self) -> usize {
        if self.children.is_empty() {
            return 1;
        }
        self.children
            .iter()
            .map(|c| c.definition.primitive_count())
            .sum()
    }
}
