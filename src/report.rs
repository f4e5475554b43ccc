//! Console output for the CLI frontend.
//!
//! Everything is written to a caller-supplied [`Write`], so the same code
//! serves stdout and the tests.

use std::io::Write;

use crate::circuit::{Definition, Value};
use crate::error::{GatesimError, Result};
use crate::sim::{CaseResult, Instance, TestReport};

fn output_error(e: std::io::Error) -> GatesimError {
    GatesimError::OutputError {
        message: e.to_string(),
    }
}

/// Bits with a space after every fourth one.
fn io_bits(values: &[Value]) -> String {
    let mut text = String::with_capacity(values.len() * 5 / 4);
    for (i, v) in values.iter().enumerate() {
        text.push_str(&v.to_string());
        if i % 4 == 3 {
            text.push(' ');
        }
    }
    text
}

/// Bits with a space before every group of four, wrapping every 32 when `wrap`.
fn case_bits(values: &[Value], wrap: bool) -> String {
    let mut text = String::new();
    for (i, v) in values.iter().enumerate() {
        if i % 4 == 0 {
            text.push(' ');
        }
        if wrap && i % 32 == 0 && i > 0 {
            text.push_str("\n         ");
        }
        text.push_str(&v.to_string());
    }
    text
}

/// `Propagation Delays: d0 d1 ...`, after a blank line.
pub fn write_delays(out: &mut impl Write, delays: &[Value]) -> Result<()> {
    let listed: Vec<String> = delays.iter().map(Value::to_string).collect();
    writeln!(out, "\nPropagation Delays: {}", listed.join(" ")).map_err(output_error)
}

/// Header line naming inputs and outputs: `a b | s c`.
pub fn write_names(out: &mut impl Write, definition: &Definition) -> Result<()> {
    writeln!(
        out,
        "{} | {}",
        definition.input_names.join(" "),
        definition.output_names.join(" ")
    )
    .map_err(output_error)
}

/// Current input and output cells of `instance`.
pub fn write_io(out: &mut impl Write, instance: &Instance) -> Result<()> {
    writeln!(
        out,
        "{} | {}",
        io_bits(instance.inputs()),
        io_bits(instance.outputs())
    )
    .map_err(output_error)
}

/// Names and cells of `instance` after a single simulation.
pub fn write_simulation(out: &mut impl Write, instance: &Instance) -> Result<()> {
    writeln!(out).map_err(output_error)?;
    write_names(out, instance.definition())?;
    write_io(out, instance)
}

/// Simulate and print up to `max_rows` rows of the truth table.
///
/// Rows count up with input 0 as the most significant bit, in blocks of
/// eight separated by blank lines.
pub fn write_truth_table(out: &mut impl Write, instance: &mut Instance, max_rows: usize) -> Result<()> {
    let num_inputs = instance.definition().num_inputs();
    let rows = u32::try_from(num_inputs)
        .ok()
        .and_then(|n| 1usize.checked_shl(n))
        .map_or(max_rows, |all| all.min(max_rows));

    writeln!(out, "\nTRUTH TABLE:").map_err(output_error)?;
    write_names(out, instance.definition())?;

    let mut inputs = vec![0; num_inputs];
    for row in 0..rows {
        for (i, cell) in inputs.iter_mut().enumerate() {
            let shift = (num_inputs - 1 - i) as u32;
            *cell = (row.checked_shr(shift).unwrap_or(0) & 1) as Value;
        }
        instance.set_inputs(&inputs);
        instance.simulate();
        if row % 8 == 0 {
            writeln!(out).map_err(output_error)?;
        }
        write_io(out, instance)?;
    }
    Ok(())
}

fn write_case(out: &mut impl Write, definition: &Definition, case: &CaseResult) -> Result<()> {
    writeln!(out).map_err(output_error)?;
    for caption in &case.captions {
        writeln!(out, "## {}", caption).map_err(output_error)?;
    }
    write!(
        out,
        "Input  : {}\nDesired: {}\nActual : {}",
        case_bits(&case.inputs, true),
        case_bits(&case.expected, false),
        case_bits(&case.actual, false)
    )
    .map_err(output_error)?;

    if !case.passed() {
        let marks: Vec<Value> = (0..case.expected.len())
            .map(|i| u32::from(case.failing.contains(&i)))
            .collect();
        let marks = case_bits(&marks, false).replace('1', "^").replace('0', " ");
        write!(
            out,
            "\nErrors : {}\nError Names: {}",
            marks,
            case.failing_names(definition).join(" ")
        )
        .map_err(output_error)?;
    }
    writeln!(out).map_err(output_error)
}

/// Every case of `report` followed by the pass/fail banner.
pub fn write_test_report(out: &mut impl Write, definition: &Definition, report: &TestReport) -> Result<()> {
    writeln!(out, "\nRunning test cases from {}.txt\n", report.origin).map_err(output_error)?;
    write_names(out, definition)?;

    for case in &report.cases {
        write_case(out, definition, case)?;
    }

    let total = report.total_errors();
    if total > 0 {
        writeln!(out, "\n***** {} ERRORS FOUND. *****", total).map_err(output_error)
    } else {
        writeln!(out, "\n***** ALL TEST CASES PASSED. *****").map_err(output_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::run_test_cases;
    use crate::test_utils::gate_library;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_truth_table_rows_are_msb_first() {
        let mut lib = gate_library();
        let mut half = lib.instantiate("HALFADDER").unwrap();
        let text = render(|out| write_truth_table(out, &mut half, 1024));
        assert_eq!(
            text,
            "\nTRUTH TABLE:\na b | s c\n\n00 | 00\n01 | 10\n10 | 10\n11 | 01\n"
        );
    }

    #[test]
    fn test_truth_table_row_limit_and_grouping() {
        let mut lib = gate_library();
        let mut adder = lib.instantiate("ADDER4").unwrap();
        let text = render(|out| write_truth_table(out, &mut adder, 10));
        let lines: Vec<&str> = text.lines().collect();
        // blank, title, names, then two blocks of 8 and 2 rows
        assert_eq!(lines.len(), 3 + 1 + 8 + 1 + 2);
        assert_eq!(lines[4], "0000 0000 0 | 0000 0");
        // row 9 sets b1 and cin: 2 + 1 = 3
        assert_eq!(lines[14], "0000 0100 1 | 1100 0");
    }

    #[test]
    fn test_delays_line() {
        let text = render(|out| write_delays(out, &[2, 3]));
        assert_eq!(text, "\nPropagation Delays: 2 3\n");
    }

    #[test]
    fn test_single_simulation() {
        let mut lib = gate_library();
        let mut adder = lib.instantiate("ADDER4").unwrap();
        adder.set_inputs(&[1, 1, 1, 1, 1, 0, 0, 0, 0]);
        adder.simulate();
        let text = render(|out| write_simulation(out, &adder));
        assert_eq!(
            text,
            "\na0 a1 a2 a3 b0 b1 b2 b3 cin | s0 s1 s2 s3 cout\n1111 1000 0 | 0000 1\n"
        );
    }

    #[test]
    fn test_report_format() {
        let mut lib = gate_library();
        let mut and = lib.instantiate("AND").unwrap();
        let report = run_test_cases(
            &mut and,
            "AND_TEST",
            "## low\ntestCase { 00 0 }\ntestCase { 11 0 }",
        )
        .unwrap();
        let text = render(|out| write_test_report(out, and.definition(), &report));
        assert_eq!(
            text,
            "\nRunning test cases from AND_TEST.txt\n\n\
             a b | out\n\
             \n## low\nInput  :  00\nDesired:  0\nActual :  0\n\
             \nInput  :  11\nDesired:  0\nActual :  1\nErrors :  ^\nError Names: out\n\
             \n***** 1 ERRORS FOUND. *****\n"
        );
    }

    #[test]
    fn test_passing_banner() {
        let mut lib = gate_library();
        let mut xor = lib.instantiate("XOR").unwrap();
        let report = run_test_cases(&mut xor, "XOR_TEST", "testCase { 10 1 }").unwrap();
        let text = render(|out| write_test_report(out, xor.definition(), &report));
        assert!(text.ends_with("\n***** ALL TEST CASES PASSED. *****\n"));
    }
}
