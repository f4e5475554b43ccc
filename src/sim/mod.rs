//! Logic and propagation-delay simulation.
//!
//! An [`Instance`] is evaluated in one of three ways:
//!
//! - [`Instance::simulate`] uses the truth table of any circuit that has one,
//!   declared or synthesized, and walks the sub-circuits otherwise;
//! - [`Instance::simulate_hierarchical`] ignores synthesized tables, so the
//!   result can be checked against the flattened one;
//! - [`Instance::simulate_propagation_delay`] moves delay numbers through the
//!   same cells instead of logic levels.
//!
//! Sub-circuits are always evaluated once each, in declaration order.

mod instance;
mod synthesize;
mod testbench;

pub use instance::Instance;
pub use synthesize::{find_flattening_mismatch, synthesize};
pub use testbench::{run_test_cases, CaseResult, TestReport, TEST_CASE_KEYWORD};
