//! Circuit definitions and their loading.
//!
//! A [`Definition`] is built once per circuit type by the [`Library`] and
//! shared by every instance of that type. Wiring inside a definition uses
//! owner-relative [`Slot`]s, resolved from names by [`resolve`].

mod definition;
mod library;
mod resolve;
mod source;
mod types;
mod validate;

pub use definition::{ChildDef, Definition};
pub use library::{Library, LoaderConfig};
pub use resolve::{resolve, Resolution};
#[cfg(feature = "cli")]
pub use source::DirectorySource;
pub use source::{DefinitionSource, MemorySource};
pub use types::*;
pub use validate::{sequential_cause, SequentialCause};
