//! Shared fixtures for unit tests.

use std::rc::Rc;

use crate::circuit::{ChildDef, Definition, Library, MemorySource, TruthTable};

/// A small gate library, one definition file per entry.
pub const GATES: &[(&str, &str)] = &[
    (
        "AND",
        "inputNames { a b }\noutputNames { out }\ntruthTable {\n 00 0\n 01 0\n 10 0\n 11 1\n}\n",
    ),
    (
        "OR",
        "inputNames { a b }\noutputNames { out }\ntruthTable {\n 00 0\n 01 1\n 10 1\n 11 1\n}\n",
    ),
    (
        "XOR",
        "inputNames { a b }\noutputNames { out }\ntruthTable { 00 0 01 1 10 1 11 0 }\n",
    ),
    (
        "NAND",
        "inputNames { a b }\noutputNames { out }\ntruthTable { 00 1 01 1 10 1 11 0 }\n",
    ),
    (
        "NOR",
        "inputNames { a b }\noutputNames { out }\ntruthTable { 00 1 01 0 10 0 11 0 }\n",
    ),
    (
        "NOT",
        "inputNames { a }\noutputNames { out }\ntruthTable { 0 1 1 0 }\n",
    ),
    (
        "HALFADDER",
        "# sum and carry of two bits\n\
         inputNames { a b }\noutputNames { s c }\n\
         circuit XOR x { a b }\n\
         circuit AND n { a b }\n\
         outputs { x n }\n",
    ),
    (
        "FULLADDER",
        "inputNames { a b cin }\noutputNames { s cout }\n\
         circuit HALFADDER h1 { a b }\n\
         circuit HALFADDER h2 { h1.s cin }\n\
         circuit OR o { h1.c h2.c }\n\
         outputs { h2.s o }\n",
    ),
    (
        "ADDER4",
        "inputNames { a[0:3] b[0:3] cin }\noutputNames { s[0:3] cout }\n\
         circuit FULLADDER f0 { a0 b0 cin }\n\
         circuit FULLADDER f1 { a1 b1 f0.cout }\n\
         circuit FULLADDER f2 { a2 b2 f1.1 }\n\
         circuit FULLADDER f3 { a3 b3 f2.cout }\n\
         outputs { f[0:3].s f3.cout }\n",
    ),
    (
        "XOR_NAND",
        "inputNames { a b }\noutputNames { y }\n\
         circuit NAND n1 { a b }\n\
         circuit NAND n2 { a n1 }\n\
         circuit NAND n3 { b n1 }\n\
         circuit NAND n4 { n2 n3 }\n\
         outputs { n4 }\n",
    ),
    (
        "LATCH",
        "# set/reset latch from cross-coupled NOR gates\n\
         inputNames { s r }\noutputNames { q qn }\n\
         circuit NOR n1 { r ... }\n\
         circuit NOR n2 { s n1 }\n\
         circuitInputs NOR n1 { r n2 }\n\
         outputs { n1 n2 }\n",
    ),
];

/// Library over [`GATES`].
pub fn gate_library() -> Library<MemorySource> {
    library(&[])
}

/// Library over [`GATES`] plus `extra` files.
pub fn library(extra: &[(&str, &str)]) -> Library<MemorySource> {
    let source: MemorySource = GATES.iter().chain(extra).copied().collect();
    Library::new(source)
}

/// A primitive with an all-zero declared table.
pub fn primitive(type_name: &str, inputs: &[&str], outputs: &[&str]) -> Rc<Definition> {
    Rc::new(Definition {
        type_name: type_name.to_string(),
        input_names: inputs.iter().map(|s| s.to_string()).collect(),
        output_names: outputs.iter().map(|s| s.to_string()).collect(),
        truth_table: Some(TruthTable::declared(vec![0; 1 << inputs.len()])),
        children: Vec::new(),
        outputs: Vec::new(),
        combinatorial: true,
        propagation_delay: None,
    })
}

/// A sub-circuit with every input unbound.
pub fn child(name: &str, definition: Rc<Definition>) -> ChildDef {
    ChildDef {
        name: name.to_string(),
        inputs: vec![None; definition.num_inputs()],
        definition,
    }
}
