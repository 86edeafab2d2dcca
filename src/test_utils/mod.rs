//! Shared test utilities for hm.
//!
//! Compiled for the crate's own tests and, through the `test-utils`
//! feature, for the integration suites and benches.

pub mod fixtures;

use std::fmt::Debug;
use std::time::Instant;

/// One row of a table-driven test.
#[derive(Debug, Clone)]
pub struct TestCase<I, E> {
    pub name: &'static str,
    pub input: I,
    pub expected: E,
}

/// Run every case through `test_fn` and report all mismatches at once.
pub fn run_table_tests<I, E, F>(cases: Vec<TestCase<I, E>>, test_fn: F) -> Result<(), String>
where
    I: Debug,
    E: Debug + PartialEq,
    F: Fn(I) -> E,
{
    let total = cases.len();
    let mut failures = Vec::new();

    for TestCase {
        name,
        input,
        expected,
    } in cases
    {
        let shown = format!("{input:?}");
        let start = Instant::now();
        let actual = test_fn(input);
        println!("[case] {name}: {shown} -> {actual:?} ({:?})", start.elapsed());
        if actual != expected {
            failures.push(format!("{name}: input {shown}, expected {expected:?}, got {actual:?}"));
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "{} of {total} cases failed:\n{}",
            failures.len(),
            failures.join("\n")
        ))
    }
}
