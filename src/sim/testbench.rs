//! Replaying test-vector files against an instance.
//!
//! A test file is a sequence of `testCase` blocks, each holding the input bits
//! followed by the expected output bits:
//!
//! ```text
//! ## carry out of the top bit
//! testCase { 1111 0001 0  0000 1 }
//! ```
//!
//! `##` captions are attached to the next case that completes.

use tracing::trace;

use super::instance::Instance;
use crate::circuit::{Definition, Value};
use crate::dsl::{BitReader, Lexer};
use crate::error::{GatesimError, Result};

/// Keyword that starts a test vector.
pub const TEST_CASE_KEYWORD: &str = "testCase";

/// Outcome of one test vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    /// Line of the `testCase` keyword
    pub line: usize,
    /// `##` captions read since the previous case
    pub captions: Vec<String>,
    pub inputs: Vec<Value>,
    pub expected: Vec<Value>,
    pub actual: Vec<Value>,
    /// Indices of outputs where `actual` differs from `expected`
    pub failing: Vec<usize>,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.failing.is_empty()
    }

    /// Names of the failing outputs.
    pub fn failing_names<'d>(&self, definition: &'d Definition) -> Vec<&'d str> {
        self.failing
            .iter()
            .filter_map(|&i| definition.output_names.get(i).map(String::as_str))
            .collect()
    }
}

/// Results of a whole test file.
#[derive(Debug, Clone, Default)]
pub struct TestReport {
    /// Name of the test file
    pub origin: String,
    pub cases: Vec<CaseResult>,
}

impl TestReport {
    /// Mismatching output bits over all cases.
    pub fn total_errors(&self) -> usize {
        self.cases.iter().map(|c| c.failing.len()).sum()
    }

    pub fn passed(&self) -> bool {
        self.total_errors() == 0
    }
}

/// Run every test case in `text` against `instance`.
///
/// `origin` names the test file in error messages. Any malformed vector
/// aborts the run.
pub fn run_test_cases(instance: &mut Instance, origin: &str, text: &str) -> Result<TestReport> {
    let num_inputs = instance.definition().num_inputs();
    let num_outputs = instance.definition().num_outputs();

    let mut lexer = Lexer::new(text, origin);
    let mut bits = BitReader::new();
    let mut report = TestReport {
        origin: origin.to_string(),
        cases: Vec::new(),
    };
    let is_stop = |text: &str| text == "}" || text == TEST_CASE_KEYWORD;

    while let Some(token) = lexer.next_token()? {
        if token.is_close() {
            continue;
        }
        if token.text != TEST_CASE_KEYWORD {
            return Err(GatesimError::UnknownKeyword {
                origin: origin.to_string(),
                line: token.line,
                keyword: token.text,
            });
        }

        let to_values = |bits: Vec<u8>| bits.into_iter().map(Value::from).collect::<Vec<_>>();
        let inputs = to_values(bits.read(&mut lexer, num_inputs, is_stop)?);
        let expected = to_values(bits.read(&mut lexer, num_outputs, is_stop)?);
        if inputs.len() < num_inputs || expected.len() < num_outputs {
            return Err(GatesimError::IncompleteTestCase {
                origin: origin.to_string(),
                line: token.line,
            });
        }
        if bits.has_pending() {
            return Err(GatesimError::arity(
                origin,
                token.line,
                format!(
                    "test case has more than {} input and {} output bits",
                    num_inputs, num_outputs
                ),
            ));
        }

        instance.set_inputs(&inputs);
        instance.simulate();
        let actual = instance.outputs().to_vec();
        let failing: Vec<usize> = (0..num_outputs).filter(|&i| actual[i] != expected[i]).collect();
        trace!(line = token.line, errors = failing.len(), "ran test case");

        report.cases.push(CaseResult {
            line: token.line,
            captions: lexer.take_annotations(),
            inputs,
            expected,
            actual,
            failing,
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::gate_library;

    const XOR_TESTS: &str = "\
# exhaustive
testCase { 00 0 }
testCase { 01 1 }
testCase { 1 0 1 }
testCase { 11 0 }
";

    #[test]
    fn test_all_cases_pass() {
        let mut lib = gate_library();
        let mut xor = lib.instantiate("XOR").unwrap();
        let report = run_test_cases(&mut xor, "XOR_TEST", XOR_TESTS).unwrap();
        assert_eq!(report.cases.len(), 4);
        assert_eq!(report.total_errors(), 0);
        assert!(report.passed());
        assert_eq!(report.cases[2].inputs, vec![1, 0]);
        assert_eq!(report.cases[3].line, 5);
    }

    #[test]
    fn test_failures_are_named() {
        let mut lib = gate_library();
        let mut and = lib.instantiate("AND").unwrap();
        let text = "testCase { 00 0 }\ntestCase { 11 0 }";
        let report = run_test_cases(&mut and, "AND_TEST", text).unwrap();
        assert_eq!(report.total_errors(), 1);
        assert!(!report.passed());

        let failed = &report.cases[1];
        assert!(!failed.passed());
        assert_eq!(failed.expected, vec![0]);
        assert_eq!(failed.actual, vec![1]);
        assert_eq!(failed.failing_names(and.definition()), vec!["out"]);
    }

    #[test]
    fn test_multi_output_vectors() {
        let mut lib = gate_library();
        let mut adder = lib.instantiate("ADDER4").unwrap();
        let text = "testCase { 1111 1000 0  0000 1 }\ntestCase { 1010 0101 1  0000 0 }";
        let report = run_test_cases(&mut adder, "ADDER4_TEST", text).unwrap();
        assert!(report.cases[0].passed());
        // 5 + 10 + 1 = 16, not 0
        assert_eq!(report.cases[1].failing, vec![4]);
        assert_eq!(report.total_errors(), 1);
    }

    #[test]
    fn test_captions_attach_to_next_case() {
        let mut lib = gate_library();
        let mut xor = lib.instantiate("XOR").unwrap();
        let text = "## both low\ntestCase { 00 0 }\ntestCase { 01 1 }\n## both high\n## still zero\ntestCase { 11 0 }";
        let report = run_test_cases(&mut xor, "CAPTIONS", text).unwrap();
        assert_eq!(report.cases[0].captions, vec!["both low"]);
        assert!(report.cases[1].captions.is_empty());
        assert_eq!(report.cases[2].captions, vec!["both high", "still zero"]);
    }

    #[test]
    fn test_malformed_files() {
        let mut lib = gate_library();
        let mut xor = lib.instantiate("XOR").unwrap();

        let err = run_test_cases(&mut xor, "T", "testCase { 00 0 }\ntestCase { 01 }").unwrap_err();
        assert!(matches!(err, GatesimError::IncompleteTestCase { line: 2, .. }));

        let err = run_test_cases(&mut xor, "T", "testCase { 01 }\ntestCase { 11 0 }").unwrap_err();
        assert!(matches!(err, GatesimError::IncompleteTestCase { line: 1, .. }));

        let err = run_test_cases(&mut xor, "T", "check { 00 0 }").unwrap_err();
        assert!(matches!(
            err,
            GatesimError::UnknownKeyword { ref keyword, .. } if keyword == "check"
        ));

        let err = run_test_cases(&mut xor, "T", "testCase { 0001 }").unwrap_err();
        assert!(matches!(err, GatesimError::ArityError { .. }));
    }
}
