//! Runtime instance tree and its evaluation modes.

use std::rc::Rc;

use crate::circuit::{Binding, Definition, Slot, TableOrigin, TruthTable, Value};

/// How [`Instance::evaluate`] treats the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Use any truth table, declared or synthesized
    Lookup,
    /// Use declared tables only; recurse through synthesized ones
    Hierarchical,
    /// Accumulate delays instead of logic levels
    Delay,
}

/// One placed circuit together with its cell values.
///
/// The root instance is created by [`Library::instantiate`](crate::Library::instantiate);
/// its sub-circuit instances are built on first use, so a circuit served by
/// a truth table never allocates its children.
#[derive(Debug, Clone)]
pub struct Instance {
    name: String,
    definition: Rc<Definition>,
    inputs: Vec<Value>,
    outputs: Vec<Value>,
    children: Vec<Instance>,
}

impl Instance {
    /// Create an instance with every cell at 0.
    pub fn new(definition: Rc<Definition>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: vec![0; definition.num_inputs()],
            outputs: vec![0; definition.num_outputs()],
            children: Vec::new(),
            definition,
        }
    }

    /// Instance name within the parent (the type name for a root).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared definition of this instance's type.
    pub fn definition(&self) -> &Rc<Definition> {
        &self.definition
    }

    pub fn inputs(&self) -> &[Value] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Value] {
        &self.outputs
    }

    /// Sub-circuit instances built so far; empty until hierarchical evaluation.
    pub fn children(&self) -> &[Instance] {
        &self.children
    }

    /// Copy `values` into the input cells, starting at input 0.
    ///
    /// Extra values are ignored; inputs beyond `values.len()` keep their value.
    pub fn set_inputs(&mut self, values: &[Value]) {
        for (cell, value) in self.inputs.iter_mut().zip(values) {
            *cell = *value;
        }
    }

    /// Set input `i` to bit `i` of `row`.
    pub fn set_inputs_from_row(&mut self, row: usize) {
        for (i, cell) in self.inputs.iter_mut().enumerate() {
            *cell = ((row >> i) & 1) as Value;
        }
    }

    /// Outputs packed into one integer, output `i` at bit `i`.
    pub fn output_row(&self) -> u32 {
        self.outputs
            .iter()
            .enumerate()
            .fold(0, |acc, (i, v)| acc | ((v & 1) << i))
    }

    /// Zero every cell in the tree.
    pub fn reset(&mut self) {
        self.inputs.iter_mut().for_each(|v| *v = 0);
        self.outputs.iter_mut().for_each(|v| *v = 0);
        self.children.iter_mut().for_each(Instance::reset);
    }

    /// Compute outputs from inputs, using truth tables wherever present.
    pub fn simulate(&mut self) {
        self.evaluate(Mode::Lookup);
    }

    /// Compute outputs by walking the sub-circuits, ignoring synthesized tables.
    ///
    /// Produces the same logic values as [`simulate`](Self::simulate) for any
    /// correctly flattened circuit.
    pub fn simulate_hierarchical(&mut self) {
        self.evaluate(Mode::Hierarchical);
    }

    /// Propagate delays instead of logic levels.
    ///
    /// Input cells must already hold the delay at which each input settles.
    /// A circuit without sub-circuits sets every output to its declared delay
    /// (1 by default) plus the largest input value; composites recurse.
    pub fn simulate_propagation_delay(&mut self) {
        self.evaluate(Mode::Delay);
    }

    /// Worst-case delay of each output with every input settled at time 0.
    ///
    /// All cells are zeroed before and after, so any held state is cleared.
    pub fn propagation_delays(&mut self) -> Vec<Value> {
        self.reset();
        self.simulate_propagation_delay();
        let delays = self.outputs.clone();
        self.reset();
        delays
    }

    fn evaluate(&mut self, mode: Mode) {
        let definition = Rc::clone(&self.definition);

        match (&definition.truth_table, mode) {
            _ if mode == Mode::Delay && definition.children.is_empty() => {
                self.apply_delay(&definition);
                return;
            }
            (Some(table), Mode::Lookup) => {
                self.apply_table(table);
                return;
            }
            (Some(table), Mode::Hierarchical) if table.origin() == TableOrigin::Declared => {
                self.apply_table(table);
                return;
            }
            _ => {}
        }

        self.materialize_children();
        for index in 0..self.children.len() {
            self.gather_inputs(&definition, index);
            self.children[index].evaluate(mode);
        }
        for (output, binding) in definition.outputs.iter().enumerate() {
            self.outputs[output] = self.read(binding);
        }
    }

    fn apply_table(&mut self, table: &TruthTable) {
        let row = self
            .inputs
            .iter()
            .enumerate()
            .fold(0usize, |acc, (i, v)| acc | (((v & 1) as usize) << i));
        let packed = table.lookup(row);
        for (i, cell) in self.outputs.iter_mut().enumerate() {
            *cell = (packed >> i) & 1;
        }
    }

    fn apply_delay(&mut self, definition: &Definition) {
        let latest = self.inputs.iter().copied().max().unwrap_or(0);
        for (i, cell) in self.outputs.iter_mut().enumerate() {
            let own = definition
                .propagation_delay
                .as_ref()
                .map_or(1, |delays| delays[i]);
            *cell = own.saturating_add(latest);
        }
    }

    fn materialize_children(&mut self) {
        if self.children.len() == self.definition.children.len() {
            return;
        }
        self.children = self
            .definition
            .children
            .iter()
            .map(|c| Instance::new(Rc::clone(&c.definition), c.name.as_str()))
            .collect();
    }

    /// Pull the bound inputs of child `index` from their source cells.
    fn gather_inputs(&mut self, definition: &Definition, index: usize) {
        for (input, binding) in definition.children[index].inputs.iter().enumerate() {
            // unbound cells keep whatever they last held
            if let Some(binding) = binding {
                let value = self.read(binding);
                self.children[index].inputs[input] = value;
            }
        }
    }

    /// Constants read as their logic level in every mode.
    fn read(&self, binding: &Binding) -> Value {
        match *binding {
            Binding::Constant(value) => value,
            Binding::Slot(Slot::Input(i)) => self.inputs[i],
            Binding::Slot(Slot::ChildOutput { child, output }) => self.children[child].outputs[output],
        }
    }
}
