//! Shared test helpers to reduce duplication across integration tests.

#![allow(dead_code)]

#[allow(clippy::duplicate_mod)]
#[path = "fixtures/mod.rs"]
mod fixtures;

#[allow(unused_imports)]
pub use fixtures::{Event, Level, MockSink, SEED_CALLS, init_logging, test_hierarchy};
use trie_shell::{LineOutcome, Shell};

// ============================================================================
// Shell Creation Helpers
// ============================================================================

/// Create an activated shell over a fresh test hierarchy, with the welcome
/// banner already cleared from the sink.
pub fn create_test_shell() -> Shell<MockSink> {
    init_logging();
    let mut shell = Shell::new(test_hierarchy(), MockSink::new());
    shell.activate().unwrap();
    shell.sink_mut().clear();
    shell
}

// ============================================================================
// Command Execution Helpers
// ============================================================================

/// Execute a line and return its outcome plus every event it produced.
pub fn execute(shell: &mut Shell<MockSink>, line: &str) -> (LineOutcome, Vec<Event>) {
    let outcome = shell.execute(line).unwrap();
    (outcome, shell.sink_mut().take())
}

/// Execute a line and return only the printed lines.
pub fn execute_lines(shell: &mut Shell<MockSink>, line: &str) -> Vec<String> {
    let outcome = shell.execute(line).unwrap();
    let lines = shell.sink().lines();
    shell.sink_mut().clear();
    assert!(
        matches!(outcome, LineOutcome::Executed(_)),
        "'{}' did not execute: {:?}",
        line,
        outcome
    );
    lines
}

/// Autocomplete a line and return the new line plus every event produced.
pub fn autocomplete(shell: &mut Shell<MockSink>, line: &str) -> (Option<String>, Vec<Event>) {
    let completed = shell.autocomplete(line).unwrap();
    (completed, shell.sink_mut().take())
}
