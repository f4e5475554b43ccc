//! Parsed form of a single circuit definition file.

use crate::circuit::Value;

/// Token that leaves the remaining inputs of a sub-circuit unbound.
pub const ELLIPSIS: &str = "...";

/// Section keywords of the definition language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// `inputNames { ... }`
    InputNames,
    /// `outputNames { ... }`
    OutputNames,
    /// `outputs { ... }`
    Outputs,
    /// `truthTable { ... }`
    TruthTable,
    /// `circuit TYPE NAME { ... }`
    Circuit,
    /// `circuitInputs TYPE NAME { ... }`
    CircuitInputs,
    /// `propagationDelay { ... }`
    PropagationDelay,
}

impl Section {
    /// Every section, in keyword-table order.
    pub const ALL: [Section; 7] = [
        Section::InputNames,
        Section::OutputNames,
        Section::Outputs,
        Section::TruthTable,
        Section::Circuit,
        Section::CircuitInputs,
        Section::PropagationDelay,
    ];

    /// Parse a section from its keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.keyword() == keyword)
    }

    /// The keyword introducing this section.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::InputNames => "inputNames",
            Self::OutputNames => "outputNames",
            Self::Outputs => "outputs",
            Self::TruthTable => "truthTable",
            Self::Circuit => "circuit",
            Self::CircuitInputs => "circuitInputs",
            Self::PropagationDelay => "propagationDelay",
        }
    }

    /// Check whether a word is a section keyword.
    pub fn is_keyword(word: &str) -> bool {
        Self::from_keyword(word).is_some()
    }

    /// Sections that declare the circuit interface.
    pub fn is_header(&self) -> bool {
        matches!(self, Self::InputNames | Self::OutputNames)
    }
}

/// Complete parse of one definition file.
#[derive(Debug, Clone, Default)]
pub struct DefinitionAst {
    /// Circuit type (the file name without `.txt`)
    pub type_name: String,
    /// Declared input names, in bit order
    pub input_names: Vec<String>,
    /// Declared output names, in bit order
    pub output_names: Vec<String>,
    /// Body sections in file order
    pub statements: Vec<Statement>,
}

impl DefinitionAst {
    /// The declared truth table, if any.
    pub fn truth_table(&self) -> Option<&[u32]> {
        self.statements.iter().find_map(|s| match s {
            Statement::TruthTable { rows, .. } => Some(rows.as_slice()),
            _ => None,
        })
    }
}

/// A body section of a definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `circuit` or `circuitInputs`
    Instance(InstanceDecl),
    /// `outputs { ... }`
    Outputs { sources: Vec<String>, line: usize },
    /// `truthTable { ... }`, one packed output word per input row
    TruthTable { rows: Vec<u32>, line: usize },
    /// `propagationDelay { ... }`, one delay per output
    PropagationDelay { delays: Vec<Value>, line: usize },
}

/// A sub-circuit instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDecl {
    /// Sub-circuit type
    pub type_name: String,
    /// Instance name, unique within the parent
    pub name: String,
    /// Positional input sources; may end with [`ELLIPSIS`]
    pub inputs: Vec<String>,
    /// `circuitInputs`: may rebind an earlier instance of the same name
    pub rebind: bool,
    /// Source line number for error reporting
    pub line: usize,
}
