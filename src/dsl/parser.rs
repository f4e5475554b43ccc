//! Parser for circuit definition files.

use super::ast::*;
use super::bits::{pack, BitReader};
use super::lexer::{Lexer, Token};
use crate::circuit::Value;
use crate::error::{GatesimError, Result};
use crate::{MAX_TRUTH_TABLE_INPUTS, MAX_TRUTH_TABLE_OUTPUTS};

/// Which sections have been seen so far; decides the legal transitions.
#[derive(Debug, Default)]
struct SectionState {
    inputs: bool,
    outputs: bool,
    body: bool,
    has_outputs: bool,
    has_table: bool,
    has_instances: bool,
    has_delay: bool,
}

impl SectionState {
    /// Enter `section`, or explain why it is not allowed here.
    fn enter(&mut self, section: Section) -> std::result::Result<(), String> {
        use Section::*;

        let keyword = section.keyword();
        let rejected = match section {
            InputNames | OutputNames if self.body => Some(format!(
                "'{}' must come before circuits, outputs and truth tables",
                keyword
            )),
            InputNames if self.inputs => Some(format!("'{}' given more than once", keyword)),
            OutputNames if self.outputs => Some(format!("'{}' given more than once", keyword)),
            InputNames => {
                self.inputs = true;
                None
            }
            OutputNames => {
                self.outputs = true;
                None
            }
            _ if !(self.inputs && self.outputs) => Some(format!(
                "inputNames and outputNames must come before '{}'",
                keyword
            )),
            Outputs | TruthTable if self.has_outputs || self.has_table => {
                Some("only one 'outputs' or 'truthTable' section is allowed".to_string())
            }
            TruthTable if self.has_instances => {
                Some("'truthTable' cannot be combined with sub-circuits".to_string())
            }
            Circuit | CircuitInputs if self.has_table => {
                Some(format!("'{}' cannot be combined with 'truthTable'", keyword))
            }
            PropagationDelay if self.has_delay => {
                Some(format!("'{}' given more than once", keyword))
            }
            Outputs => {
                self.has_outputs = true;
                None
            }
            TruthTable => {
                self.has_table = true;
                None
            }
            Circuit | CircuitInputs => {
                self.has_instances = true;
                None
            }
            PropagationDelay => {
                self.has_delay = true;
                None
            }
        };

        match rejected {
            Some(message) => Err(message),
            None => {
                if !section.is_header() {
                    self.body = true;
                }
                Ok(())
            }
        }
    }

    fn defines_outputs(&self) -> bool {
        self.has_outputs || self.has_table
    }
}

/// Parser for one circuit definition file.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    bits: BitReader,
    state: SectionState,
    ast: DefinitionAst,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    ///
    /// The lexer's origin is taken as the circuit type name.
    pub fn new(lexer: Lexer<'a>) -> Self {
        let ast = DefinitionAst {
            type_name: lexer.origin().to_string(),
            ..DefinitionAst::default()
        };
        Self {
            lexer,
            bits: BitReader::new(),
            state: SectionState::default(),
            ast,
        }
    }

    /// Parse the entire definition.
    pub fn parse(&mut self) -> Result<DefinitionAst> {
        while let Some(token) = self.lexer.next_token()? {
            let section = Section::from_keyword(&token.text).ok_or_else(|| {
                GatesimError::UnknownKeyword {
                    origin: self.origin(),
                    line: token.line,
                    keyword: token.text.clone(),
                }
            })?;

            self.state
                .enter(section)
                .map_err(|message| GatesimError::syntax(self.origin(), token.line, message))?;

            match section {
                Section::InputNames => {
                    self.ast.input_names = self.parse_name_list(section)?;
                }
                Section::OutputNames => {
                    self.ast.output_names = self.parse_name_list(section)?;
                }
                Section::Circuit | Section::CircuitInputs => {
                    let decl = self.parse_instance(section == Section::CircuitInputs, token.line)?;
                    self.ast.statements.push(Statement::Instance(decl));
                }
                Section::Outputs => {
                    let sources = self.parse_until_close("outputs", token.line)?;
                    self.ast.statements.push(Statement::Outputs {
                        sources,
                        line: token.line,
                    });
                }
                Section::TruthTable => {
                    let rows = self.parse_truth_table(token.line)?;
                    self.ast.statements.push(Statement::TruthTable {
                        rows,
                        line: token.line,
                    });
                }
                Section::PropagationDelay => {
                    let delays = self.parse_delays(token.line)?;
                    self.ast.statements.push(Statement::PropagationDelay {
                        delays,
                        line: token.line,
                    });
                }
            }
        }

        if !self.state.defines_outputs() {
            return Err(GatesimError::syntax(
                self.origin(),
                self.lexer.line(),
                "'outputs' or 'truthTable' required",
            ));
        }

        Ok(std::mem::take(&mut self.ast))
    }

    fn origin(&self) -> String {
        self.lexer.origin().to_string()
    }

    fn expect_word(&mut self, what: &str, line: usize) -> Result<Token> {
        match self.lexer.next_token()? {
            Some(token) if !token.is_close() => Ok(token),
            Some(token) => Err(GatesimError::syntax(
                self.origin(),
                token.line,
                format!("expected {}, found '}}'", what),
            )),
            None => Err(GatesimError::syntax(
                self.origin(),
                line,
                format!("expected {}, found end of file", what),
            )),
        }
    }

    /// Identifiers up to `}` or the next keyword.
    fn parse_name_list(&mut self, section: Section) -> Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();

        while let Some(token) = self.lexer.next_token()? {
            if Section::is_keyword(&token.text) {
                self.lexer.unget(token);
                break;
            }
            if token.is_close() {
                break;
            }
            if token.text == ELLIPSIS || names.contains(&token.text) {
                return Err(GatesimError::syntax(
                    self.origin(),
                    token.line,
                    format!("invalid or duplicate name '{}' in {}", token.text, section.keyword()),
                ));
            }
            names.push(token.text);
        }

        Ok(names)
    }

    /// Every token up to the closing `}`.
    fn parse_until_close(&mut self, what: &str, line: usize) -> Result<Vec<String>> {
        let mut items = Vec::new();
        loop {
            match self.lexer.next_token()? {
                Some(token) if token.is_close() => return Ok(items),
                Some(token) => items.push(token.text),
                None => {
                    return Err(GatesimError::syntax(
                        self.origin(),
                        line,
                        format!("missing '}}' after {}", what),
                    ))
                }
            }
        }
    }

    fn parse_instance(&mut self, rebind: bool, line: usize) -> Result<InstanceDecl> {
        let type_name = self.expect_word("a circuit type", line)?.text;
        let name = self.expect_word("an instance name", line)?.text;
        let what = format!("{} {}", type_name, name);
        let inputs = self.parse_until_close(&what, line)?;

        Ok(InstanceDecl {
            type_name,
            name,
            inputs,
            rebind,
            line,
        })
    }

    fn parse_truth_table(&mut self, line: usize) -> Result<Vec<u32>> {
        let num_inputs = self.ast.input_names.len();
        let num_outputs = self.ast.output_names.len();

        if num_inputs > MAX_TRUTH_TABLE_INPUTS || num_outputs > MAX_TRUTH_TABLE_OUTPUTS {
            return Err(GatesimError::arity(
                self.origin(),
                line,
                format!(
                    "truth tables support at most {} inputs and {} outputs, found {} and {}",
                    MAX_TRUTH_TABLE_INPUTS, MAX_TRUTH_TABLE_OUTPUTS, num_inputs, num_outputs
                ),
            ));
        }

        let num_rows = 1usize << num_inputs;
        let mut rows = vec![0u32; num_rows];
        let mut seen = vec![false; num_rows];
        let is_stop = |text: &str| text == "}" || Section::is_keyword(text);

        for row in 0..num_rows {
            let inputs = self.bits.read(&mut self.lexer, num_inputs, is_stop)?;
            let outputs = self.bits.read(&mut self.lexer, num_outputs, is_stop)?;
            if inputs.len() < num_inputs || outputs.len() < num_outputs {
                return Err(GatesimError::arity(
                    self.origin(),
                    line,
                    format!("truth table has {} complete rows, expected {}", row, num_rows),
                ));
            }

            let index = pack(&inputs) as usize;
            if seen[index] {
                let pattern: String = inputs.iter().map(|b| if *b == 1 { '1' } else { '0' }).collect();
                return Err(GatesimError::syntax(
                    self.origin(),
                    self.lexer.line(),
                    format!("duplicate truth table row '{}'", pattern),
                ));
            }
            seen[index] = true;
            rows[index] = pack(&outputs);
        }

        let origin = self.origin();
        let surplus = || {
            GatesimError::arity(
                origin.clone(),
                line,
                format!("truth table has more than {} rows", num_rows),
            )
        };
        if self.bits.has_pending() {
            return Err(surplus());
        }
        match self.lexer.next_token()? {
            Some(token) if token.is_close() => Ok(rows),
            Some(token) if token.text.contains(|c| c == '0' || c == '1') => Err(surplus()),
            Some(token) => Err(GatesimError::syntax(
                self.origin(),
                token.line,
                format!("expected '}}' after truth table, found '{}'", token.text),
            )),
            None => Err(GatesimError::syntax(
                self.origin(),
                line,
                "missing '}' after truthTable",
            )),
        }
    }

    fn parse_delays(&mut self, line: usize) -> Result<Vec<Value>> {
        let mut delays = Vec::new();

        while let Some(token) = self.lexer.next_token()? {
            if Section::is_keyword(&token.text) {
                self.lexer.unget(token);
                break;
            }
            if token.is_close() {
                break;
            }
            let delay = token.text.parse::<Value>().map_err(|_| {
                GatesimError::syntax(
                    self.origin(),
                    token.line,
                    format!("invalid propagation delay '{}'", token.text),
                )
            })?;
            delays.push(delay);
        }

        let num_outputs = self.ast.output_names.len();
        if delays.len() != num_outputs {
            return Err(GatesimError::arity(
                self.origin(),
                line,
                format!(
                    "propagationDelay lists {} values for {} outputs",
                    delays.len(),
                    num_outputs
                ),
            ));
        }

        Ok(delays)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(name: &str, text: &str) -> Result<DefinitionAst> {
        super::super::parse(name, text)
    }

    #[test]
    fn test_parse_truth_table() {
        let ast = parse(
            "XOR",
            "inputNames { a b }\noutputNames { out }\ntruthTable { 00 0  01 1  10 1  11 0 }",
        )
        .unwrap();
        assert_eq!(ast.type_name, "XOR");
        assert_eq!(ast.input_names, vec!["a", "b"]);
        assert_eq!(ast.output_names, vec!["out"]);
        assert_eq!(ast.truth_table(), Some(&[0, 1, 1, 0][..]));
    }

    #[test]
    fn test_truth_table_bit_order() {
        // First character is input 0; row index bit i = input i
        let ast = parse(
            "A_AND_NOT_B",
            "inputNames { a b } outputNames { y x }\n\
             truthTable { 00 00 10 11 01 00 11 00 }",
        )
        .unwrap();
        assert_eq!(ast.truth_table(), Some(&[0, 0b11, 0, 0][..]));
    }

    #[test]
    fn test_compact_truth_table_rows() {
        let ast = parse(
            "XOR",
            "inputNames { a b } outputNames { out } truthTable { 000 011 101 110 }",
        )
        .unwrap();
        assert_eq!(ast.truth_table(), Some(&[0, 1, 1, 0][..]));
    }

    #[test]
    fn test_parse_composite() {
        let ast = parse(
            "HALF",
            "# half adder\ninputNames { a b }\noutputNames { s c }\n\
             circuit XOR x { a b }\ncircuitInputs AND n { a b }\n\
             outputs { x n }\npropagationDelay { 1 2 }",
        )
        .unwrap();
        assert_eq!(ast.statements.len(), 4);
        match &ast.statements[1] {
            Statement::Instance(decl) => {
                assert_eq!(decl.type_name, "AND");
                assert_eq!(decl.name, "n");
                assert_eq!(decl.inputs, vec!["a", "b"]);
                assert!(decl.rebind);
                assert_eq!(decl.line, 5);
            }
            other => panic!("unexpected statement {:?}", other),
        }
        assert!(matches!(
            &ast.statements[3],
            Statement::PropagationDelay { delays, .. } if delays == &vec![1, 2]
        ));
    }

    #[test]
    fn test_name_list_with_ranges() {
        let ast = parse(
            "REG",
            "inputNames { d[0:3] clk }\noutputNames q[3:0]}\noutputs { 0[4] }",
        )
        .unwrap();
        assert_eq!(ast.input_names, vec!["d0", "d1", "d2", "d3", "clk"]);
        assert_eq!(ast.output_names, vec!["q3", "q2", "q1", "q0"]);
        assert!(matches!(
            &ast.statements[0],
            Statement::Outputs { sources, .. } if sources.len() == 4
        ));
    }

    #[test]
    fn test_unknown_keyword() {
        let err = parse("BAD", "inputNames { a }\nwires { a }").unwrap_err();
        assert!(matches!(
            err,
            GatesimError::UnknownKeyword { ref keyword, line: 2, .. } if keyword == "wires"
        ));
    }

    #[test]
    fn test_missing_outputs_is_fatal() {
        let err = parse("EMPTY", "inputNames { a }\noutputNames { b }\n").unwrap_err();
        assert!(matches!(err, GatesimError::SyntaxError { .. }));
        assert!(err.to_string().contains("'outputs' or 'truthTable' required"));
    }

    #[test]
    fn test_section_transitions() {
        let cases = [
            "outputNames { y } circuit AND g { a b } outputs { g }",
            "inputNames { a } outputNames { y } outputs { a } inputNames { b }",
            "inputNames { a } outputNames { y } outputs { a } truthTable { 0 0 1 1 }",
            "inputNames { a } outputNames { y } circuit NOT n { a } truthTable { 0 1 1 0 }",
            "inputNames { a } inputNames { b } outputNames { y } outputs { a }",
            "inputNames { a a } outputNames { y } outputs { a }",
        ];
        for text in cases {
            let err = parse("T", text).unwrap_err();
            assert!(
                matches!(err, GatesimError::SyntaxError { .. }),
                "{} gave {:?}",
                text,
                err
            );
        }
    }

    #[test]
    fn test_truth_table_row_count() {
        let err = parse("T", "inputNames { a b } outputNames { y } truthTable { 00 0 01 1 }")
            .unwrap_err();
        assert!(matches!(err, GatesimError::ArityError { .. }));

        let err = parse("T", "inputNames { a } outputNames { y } truthTable { 0 1 1 0 0 1 }")
            .unwrap_err();
        assert!(matches!(err, GatesimError::ArityError { .. }));

        let err = parse("T", "inputNames { a } outputNames { y } truthTable { 0 1 0 0 }")
            .unwrap_err();
        assert!(err.to_string().contains("duplicate truth table row"));
    }

    #[test]
    fn test_propagation_delay_count() {
        let err = parse(
            "T",
            "inputNames { a } outputNames { y z } truthTable { 0 00 1 11 } propagationDelay { 2 }",
        )
        .unwrap_err();
        assert!(matches!(err, GatesimError::ArityError { .. }));

        let err = parse(
            "T",
            "inputNames { a } outputNames { y } truthTable { 0 0 1 1 } propagationDelay { x }",
        )
        .unwrap_err();
        assert!(matches!(err, GatesimError::SyntaxError { .. }));
    }

    #[test]
    fn test_unclosed_instance() {
        let err = parse("T", "inputNames { a } outputNames { y } circuit NOT n { a").unwrap_err();
        assert!(err.to_string().contains("missing '}'"));
    }
}
