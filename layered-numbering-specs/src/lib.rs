#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Fixture-driven regression harness for layered-numbering.
//!
//! Each fixture is a small TOML document: a list of paragraphs and the
//! numbering issues the analyzer must report for them. The harness runs
//! every fixture, checks each expected issue, flags unexpected ones and
//! verifies that applying all corrections leaves a clean document.
//!
//! ## Modules
//!
//! - [`fixture`] - Fixture format and parsing
//! - [`loader`] - Fixture discovery on disk
//! - [`runner`] - Runs fixtures through the analyzer
//! - [`failures`] - Expected failures tracking via TOML
//! - [`formatter`] - Report lines and summary
//! - [`errors`] - Error types for the harness

pub mod errors;
pub mod failures;
pub mod fixture;
pub mod formatter;
pub mod loader;
pub mod runner;

pub use errors::{SpecError, SpecResult};
pub use failures::{ExpectedFailures, FailureEntry, FailureState, HarnessResult};
pub use fixture::{parse_fixture, ExpectedIssue, NumberingFixture};
pub use formatter::{format_failure, format_summary};
pub use loader::{load_all_fixtures, load_fixture};
pub use runner::{run_fixture, run_harness, FixtureRun, IssueMismatch};
