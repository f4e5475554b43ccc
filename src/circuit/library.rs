//! Loading circuit definitions and caching them by type name.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, trace};

use super::definition::{ChildDef, Definition};
use super::resolve::{resolve, Resolution};
use super::source::DefinitionSource;
use super::types::{Binding, TruthTable};
use super::validate::sequential_cause;
use crate::dsl::{self, DefinitionAst, InstanceDecl, Statement, ELLIPSIS};
use crate::error::{GatesimError, Result};
use crate::sim::{synthesize, Instance};
use crate::{MAX_TRUTH_TABLE_INPUTS, MAX_TRUTH_TABLE_OUTPUTS};

/// Configuration for the definition loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Bake truth tables for combinatorial composite circuits
    pub synthesize: bool,
    /// Largest input count that gets a synthesized table
    pub max_table_inputs: usize,
    /// Largest output count that gets a synthesized table
    pub max_table_outputs: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            synthesize: true,
            max_table_inputs: MAX_TRUTH_TABLE_INPUTS,
            max_table_outputs: MAX_TRUTH_TABLE_OUTPUTS,
        }
    }
}

impl LoaderConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable truth table synthesis.
    pub fn with_synthesis(mut self, synthesize: bool) -> Self {
        self.synthesize = synthesize;
        self
    }

    /// Set the input limit for synthesis.
    ///
    /// Values above [`MAX_TRUTH_TABLE_INPUTS`] are clamped; tables grow as
    /// `2^inputs`.
    pub fn with_max_table_inputs(mut self, max_inputs: usize) -> Self {
        self.max_table_inputs = max_inputs.min(MAX_TRUTH_TABLE_INPUTS);
        self
    }

    /// Set the output limit for synthesis, clamped to [`MAX_TRUTH_TABLE_OUTPUTS`].
    pub fn with_max_table_outputs(mut self, max_outputs: usize) -> Self {
        self.max_table_outputs = max_outputs.min(MAX_TRUTH_TABLE_OUTPUTS);
        self
    }

    fn allows_synthesis(&self, definition: &Definition) -> bool {
        self.synthesize
            && definition.combinatorial
            && definition.truth_table.is_none()
            && definition.num_inputs() <= self.max_table_inputs
            && definition.num_outputs() <= self.max_table_outputs
    }
}

/// Loads definitions on demand and keeps one shared copy per type.
pub struct Library<S> {
    source: S,
    config: LoaderConfig,
    definitions: HashMap<String, Rc<Definition>>,
    /// Types currently being loaded, outermost first
    loading: Vec<String>,
}

impl<S: DefinitionSource> Library<S> {
    /// Create a library with the default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, LoaderConfig::default())
    }

    /// Create a library with a custom configuration.
    pub fn with_config(source: S, config: LoaderConfig) -> Self {
        Self {
            source,
            config,
            definitions: HashMap::new(),
            loading: Vec::new(),
        }
    }

    /// The text source definitions are read from.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The loader configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// A definition that has already been loaded.
    pub fn get(&self, type_name: &str) -> Option<&Rc<Definition>> {
        self.definitions.get(type_name)
    }

    /// All loaded definitions, in no particular order.
    pub fn definitions(&self) -> impl Iterator<Item = &Rc<Definition>> {
        self.definitions.values()
    }

    /// Number of loaded definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Load `type_name` and, recursively, every type it uses.
    ///
    /// Each type is parsed at most once; later calls return the cached
    /// definition.
    pub fn load(&mut self, type_name: &str) -> Result<Rc<Definition>> {
        if let Some(definition) = self.definitions.get(type_name) {
            return Ok(Rc::clone(definition));
        }

        if self.loading.iter().any(|t| t == type_name) {
            let mut chain = self.loading.clone();
            chain.push(type_name.to_string());
            return Err(GatesimError::RecursiveDefinition {
                circuit: type_name.to_string(),
                chain: chain.join(" -> "),
            });
        }

        let text = self.source.read(type_name)?;
        self.loading.push(type_name.to_string());
        let built = dsl::parse(type_name, &text).and_then(|ast| self.build(ast));
        self.loading.pop();

        let mut definition = Rc::new(built?);
        if self.config.allows_synthesis(&definition) {
            let table = synthesize(&definition);
            trace!(circuit = type_name, rows = table.len(), "synthesized truth table");
            Rc::make_mut(&mut definition).truth_table = Some(table);
        }

        debug!(
            circuit = type_name,
            inputs = definition.num_inputs(),
            outputs = definition.num_outputs(),
            children = definition.children.len(),
            combinatorial = definition.combinatorial,
            flattened = definition.is_flattened(),
            "loaded circuit definition"
        );

        self.definitions
            .insert(type_name.to_string(), Rc::clone(&definition));
        Ok(definition)
    }

    /// Load `type_name` and create a root instance of it.
    pub fn instantiate(&mut self, type_name: &str) -> Result<Instance> {
        let definition = self.load(type_name)?;
        Ok(Instance::new(definition, type_name))
    }

    fn build(&mut self, ast: DefinitionAst) -> Result<Definition> {
        let mut definition = Definition {
            type_name: ast.type_name,
            input_names: ast.input_names,
            output_names: ast.output_names,
            truth_table: None,
            children: Vec::new(),
            outputs: Vec::new(),
            combinatorial: true,
            propagation_delay: None,
        };
        let mut left_unbound = false;

        for statement in ast.statements {
            match statement {
                Statement::Instance(decl) => {
                    left_unbound |= self.declare_instance(&mut definition, &decl)?;
                }
                Statement::Outputs { sources, line } => {
                    definition.outputs = bind_outputs(&definition, &sources, line)?;
                }
                Statement::TruthTable { rows, .. } => {
                    definition.truth_table = Some(TruthTable::declared(rows));
                }
                Statement::PropagationDelay { delays, .. } => {
                    definition.propagation_delay = Some(delays);
                }
            }
        }

        if let Some(cause) = sequential_cause(&definition, left_unbound) {
            debug!(circuit = %definition.type_name, %cause, "circuit is not combinatorial");
            definition.combinatorial = false;
        }

        Ok(definition)
    }

    /// Handle `circuit` / `circuitInputs`; returns whether `...` was used.
    fn declare_instance(&mut self, definition: &mut Definition, decl: &InstanceDecl) -> Result<bool> {
        let circuit = definition.type_name.clone();

        if definition.input_index(&decl.name).is_some() {
            return Err(GatesimError::syntax(
                &circuit,
                decl.line,
                format!("subcircuit has same name as input: {}", decl.name),
            ));
        }

        let index = match definition.child(&decl.name) {
            Some(_) if !decl.rebind => {
                return Err(GatesimError::syntax(
                    &circuit,
                    decl.line,
                    format!("duplicate subcircuit name: {}", decl.name),
                ));
            }
            Some((index, existing)) => {
                if existing.definition.type_name != decl.type_name {
                    return Err(GatesimError::syntax(
                        &circuit,
                        decl.line,
                        format!(
                            "'{}' was declared as {}, not {}",
                            decl.name, existing.definition.type_name, decl.type_name
                        ),
                    ));
                }
                index
            }
            None => {
                let child_definition = self.load(&decl.type_name)?;
                let num_inputs = child_definition.num_inputs();
                definition.children.push(ChildDef {
                    name: decl.name.clone(),
                    definition: child_definition,
                    inputs: vec![None; num_inputs],
                });
                definition.children.len() - 1
            }
        };

        let num_inputs = definition.children[index].definition.num_inputs();
        let describe = || format!("{} {}", decl.type_name, decl.name);
        let mut left_unbound = false;

        for (position, source) in decl.inputs.iter().enumerate() {
            if position >= num_inputs || left_unbound {
                return Err(GatesimError::arity(
                    &circuit,
                    decl.line,
                    format!("too many inputs for {}", describe()),
                ));
            }
            if source == ELLIPSIS {
                left_unbound = true;
                continue;
            }

            let binding = match resolve(source, &definition.input_names, &definition.children) {
                Resolution::Found(binding) => binding,
                Resolution::NotFound => {
                    return Err(GatesimError::unresolved(&circuit, decl.line, source))
                }
                Resolution::Unqualified => {
                    return Err(GatesimError::UnqualifiedOutput {
                        circuit,
                        line: decl.line,
                        identifier: source.clone(),
                    })
                }
            };
            definition.children[index].inputs[position] = Some(binding);
        }

        if !left_unbound && decl.inputs.len() < num_inputs {
            return Err(GatesimError::arity(
                &circuit,
                decl.line,
                format!("not enough inputs for {}", describe()),
            ));
        }

        Ok(left_unbound)
    }
}

/// Resolve the `outputs` section, one source per declared output.
fn bind_outputs(definition: &Definition, sources: &[String], line: usize) -> Result<Vec<Binding>> {
    let circuit = &definition.type_name;
    let expected = definition.num_outputs();

    if sources.len() < expected {
        return Err(GatesimError::arity(
            circuit,
            line,
            format!("incomplete circuit outputs: {} of {} bound", sources.len(), expected),
        ));
    }
    if sources.len() > expected {
        return Err(GatesimError::arity(
            circuit,
            line,
            format!("too many outputs for circuit: {} given, {} declared", sources.len(), expected),
        ));
    }

    sources
        .iter()
        .map(|source| match resolve(source, &definition.input_names, &definition.children) {
            Resolution::Found(binding) => Ok(binding),
            Resolution::NotFound => Err(GatesimError::unresolved(circuit, line, source)),
            Resolution::Unqualified => Err(GatesimError::UnqualifiedOutput {
                circuit: circuit.clone(),
                line,
                identifier: source.clone(),
            }),
        })
        .collect()
}
