//! Wiring resolution: mapping an identifier to the cell it names.

use super::definition::ChildDef;
use super::types::{Binding, Slot};

/// Outcome of resolving one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The identifier names this cell or constant
    Found(Binding),
    /// Nothing in scope matches
    NotFound,
    /// A bare sub-circuit name whose sub-circuit has several outputs
    Unqualified,
}

/// Resolve `identifier` against the owner's inputs and its sub-circuits.
///
/// Lookup order:
/// 1. an owner input with exactly this name;
/// 2. the first sub-circuit named `identifier`, or named `name` where the
///    identifier is `name.suffix`. Without a suffix the sub-circuit must have a
///    single output. A suffix is an output name, else a decimal output index;
/// 3. the literals `0` and `1`.
pub fn resolve(identifier: &str, input_names: &[String], children: &[ChildDef]) -> Resolution {
    if let Some(index) = input_names.iter().position(|n| n == identifier) {
        return Resolution::Found(Binding::Slot(Slot::Input(index)));
    }

    for (child_index, child) in children.iter().enumerate() {
        let suffix = if identifier == child.name {
            None
        } else if let Some(suffix) = identifier
            .strip_prefix(child.name.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
        {
            Some(suffix)
        } else {
            continue;
        };

        let definition = &child.definition;
        let output = match suffix {
            None if definition.num_outputs() == 1 => 0,
            None => return Resolution::Unqualified,
            Some(suffix) => match definition.output_index(suffix) {
                Some(index) => index,
                None => match suffix.parse::<usize>() {
                    Ok(index) if index < definition.num_outputs() => index,
                    _ => return Resolution::NotFound,
                },
            },
        };

        return Resolution::Found(Binding::Slot(Slot::ChildOutput {
            child: child_index,
            output,
        }));
    }

    match identifier {
        "0" => Resolution::Found(Binding::Constant(0)),
        "1" => Resolution::Found(Binding::Constant(1)),
        _ => Resolution::NotFound,
    }
}
