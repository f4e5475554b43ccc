//! Truth-table synthesis for combinatorial composite circuits.

use std::rc::Rc;

use super::instance::Instance;
use crate::circuit::{Definition, TruthTable};

/// Evaluate every input row of `definition` and collect the packed outputs.
///
/// The definition must be combinatorial; sub-circuits are evaluated with
/// their own tables where they have one.
pub fn synthesize(definition: &Rc<Definition>) -> TruthTable {
    let mut instance = Instance::new(Rc::clone(definition), definition.type_name.as_str());
    let rows = (0..1usize << definition.num_inputs())
        .map(|row| {
            instance.set_inputs_from_row(row);
            instance.simulate();
            instance.output_row()
        })
        .collect();
    TruthTable::synthesized(rows)
}

/// First input row where the table disagrees with walking the hierarchy.
///
/// Returns `None` when every row agrees or the definition has no table.
pub fn find_flattening_mismatch(definition: &Rc<Definition>) -> Option<usize> {
    let table = definition.truth_table.as_ref()?;
    let mut instance = Instance::new(Rc::clone(definition), definition.type_name.as_str());

    (0..table.len()).find(|&row| {
        instance.set_inputs_from_row(row);
        instance.simulate_hierarchical();
        instance.output_row() != table.lookup(row)
    })
}
