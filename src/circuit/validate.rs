//! Structural checks on a freshly built definition.

use std::fmt;

use super::definition::Definition;
use super::types::{Binding, Slot};

/// Why a definition cannot be treated as combinatorial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequentialCause {
    /// Inputs explicitly left unbound with `...`
    UnboundInputs,
    /// An input reads the output of its own sub-circuit or of a later one
    Feedback {
        child: String,
        input: usize,
        source: String,
    },
    /// A sub-circuit is itself sequential
    SequentialChild { child: String },
}

impl fmt::Display for SequentialCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundInputs => write!(f, "inputs left unbound with '...'"),
            Self::Feedback {
                child,
                input,
                source,
            } => write!(f, "input {} of '{}' is fed back from '{}'", input, child, source),
            Self::SequentialChild { child } => write!(f, "sub-circuit '{}' is sequential", child),
        }
    }
}

/// Decide whether `definition` is combinatorial.
///
/// Sub-circuits are evaluated once each, in declaration order, so a
/// combinatorial circuit may only feed a sub-circuit from owner inputs,
/// constants, or outputs of sub-circuits declared before it.
pub fn sequential_cause(definition: &Definition, left_unbound: bool) -> Option<SequentialCause> {
    if left_unbound {
        return Some(SequentialCause::UnboundInputs);
    }

    for (index, child) in definition.children.iter().enumerate() {
        for (input, binding) in child.inputs.iter().enumerate() {
            match binding {
                None => return Some(SequentialCause::UnboundInputs),
                Some(Binding::Slot(Slot::ChildOutput { child: source, .. })) if *source >= index => {
                    return Some(SequentialCause::Feedback {
                        child: child.name.clone(),
                        input,
                        source: definition.children[*source].name.clone(),
                    });
                }
                Some(_) => {}
            }
        }
    }

    definition
        .children
        .iter()
        .find(|c| !c.definition.combinatorial)
        .map(|c| SequentialCause::SequentialChild {
            child: c.name.clone(),
        })
}
