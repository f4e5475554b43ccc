//! Gatesim - Hierarchical Logic Circuit Simulator
//!
//! Loads `<CIRCUIT>.txt` (and every circuit it uses) from the circuit
//! directory, prints its propagation delays, then one of:
//!
//! - the truth table, when no further arguments are given;
//! - a single simulation, when the arguments are input bits;
//! - a test report, when the argument names a test-vector file.
//!
//! Load, syntax and test-file errors end the process with a non-zero exit
//! status after printing the error.
//!
//! # Usage
//!
//! ```bash
//! gatesim FULLADDER
//! gatesim FULLADDER 1 1 0
//! gatesim FULLADDER FULLADDER_TEST.txt -d circuits -vv
//! ```

use std::io;
use std::path::PathBuf;

use clap::Parser;
use gatesim_core::{
    circuit::{DirectorySource, Library, LoaderConfig},
    error::{GatesimError, Result},
    report,
    sim::{find_flattening_mismatch, run_test_cases},
    DefinitionSource, Instance, DEFAULT_MAX_ROWS,
};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Hierarchical truth-table circuit simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Circuit to load (`.txt` is optional)
    #[arg(value_name = "CIRCUIT")]
    circuit: String,

    /// Input bits, or the name of a test-vector file
    #[arg(value_name = "ARGS")]
    args: Vec<String>,

    /// Directory holding the circuit and test files
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Maximum number of truth table rows to print
    #[arg(long, default_value_t = DEFAULT_MAX_ROWS)]
    max_rows: usize,

    /// Always simulate sub-circuits instead of synthesizing truth tables
    #[arg(long)]
    no_synthesis: bool,

    /// Check every synthesized table against hierarchical simulation
    #[arg(long)]
    verify: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn strip_txt(name: &str) -> &str {
    name.strip_suffix(".txt").unwrap_or(name)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: logging disabled: {}", e);
    }
}

fn verify<S: DefinitionSource>(library: &Library<S>) -> Result<()> {
    let mut checked = 0;
    for definition in library.definitions().filter(|d| d.is_flattened()) {
        if let Some(row) = find_flattening_mismatch(definition) {
            return Err(GatesimError::FlatteningMismatch {
                circuit: definition.type_name.clone(),
                row,
            });
        }
        checked += 1;
    }
    info!(checked, "synthesized tables match hierarchical simulation");
    Ok(())
}

fn simulate_bits(out: &mut impl io::Write, instance: &mut Instance, args: &[String]) -> Result<()> {
    let bits: Vec<u32> = args
        .iter()
        .flat_map(|arg| arg.chars())
        .filter_map(|c| c.to_digit(2))
        .take(instance.definition().num_inputs())
        .collect();
    instance.set_inputs(&bits);
    instance.simulate();
    report::write_simulation(out, instance)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let circuit = strip_txt(&args.circuit);
    let config = LoaderConfig::new().with_synthesis(!args.no_synthesis);
    let mut library = Library::with_config(DirectorySource::new(&args.dir), config);
    let mut instance = library.instantiate(circuit)?;
    info!(
        circuit,
        definitions = library.len(),
        primitives = instance.definition().primitive_count(),
        "circuit loaded"
    );

    if args.verify {
        verify(&library)?;
    }

    let mut out = io::stdout().lock();
    report::write_delays(&mut out, &instance.propagation_delays())?;

    match args.args.first() {
        None => report::write_truth_table(&mut out, &mut instance, args.max_rows),
        Some(first) if first.starts_with('0') || first.starts_with('1') => {
            simulate_bits(&mut out, &mut instance, &args.args)
        }
        Some(test_file) => {
            let test_name = strip_txt(test_file);
            let text = library.source().read(test_name)?;
            let results = run_test_cases(&mut instance, test_name, &text)?;
            info!(
                cases = results.cases.len(),
                errors = results.total_errors(),
                "test run complete"
            );
            report::write_test_report(&mut out, instance.definition(), &results)
        }
    }
}
