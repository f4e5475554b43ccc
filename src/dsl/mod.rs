//! Parser for the circuit definition language.
//!
//! Each circuit type lives in its own file, `<type>.txt`. A file declares the
//! circuit interface and then either a truth table or a composition of
//! sub-circuits.
//!
//! # Grammar Overview
//!
//! ```text
//! file        = { section }
//! section     = names | instance | outputs | table | delays
//! names       = ("inputNames" | "outputNames") "{" { identifier } "}"
//! instance    = ("circuit" | "circuitInputs") type name "{" { source } ["..."] "}"
//! outputs     = "outputs" "{" { source } "}"
//! table       = "truthTable" "{" { bits bits } "}"
//! delays      = "propagationDelay" "{" { integer } "}"
//! source      = input_name | instance_name ["." (output_name | index)] | "0" | "1"
//! ```
//!
//! Spaces, tabs, newlines, `,`, `;`, `=` and `{` all separate tokens. `#`
//! starts a comment; `##` starts a caption that is shown next to test results.
//!
//! # Repeat Shorthand
//!
//! | Written | Expands to |
//! |---------|------------|
//! | `x[3]` | `x x x` |
//! | `[1:3]y` | `1y 2y 3y` |
//! | `a[2:0]b` | `a2b a1b a0b` |
//!
//! # Example
//!
//! ```text
//! # Half adder
//! inputNames { a b }
//! outputNames { sum carry }
//! circuit XOR x { a b }
//! circuit AND n { a b }
//! outputs { x n }
//! ```

mod ast;
mod bits;
mod lexer;
mod parser;

pub use ast::*;
pub use bits::{pack, BitReader};
pub use lexer::{Lexer, Token};
pub use parser::Parser;

use crate::error::Result;

/// Parse the text of the definition file for circuit `type_name`.
pub fn parse(type_name: &str, input: &str) -> Result<DefinitionAst> {
    let lexer = Lexer::new(input, type_name);
    let mut parser = Parser::new(lexer);
    parser.parse()
}
