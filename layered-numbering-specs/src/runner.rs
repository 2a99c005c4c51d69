//! Runs fixtures through the analyzer and compares the reported issues.

use std::collections::BTreeMap;
use std::path::Path;

use layered_numbering::{AnalysisReport, NumberingAnalyzer, NumberingCache};

use crate::failures::{ExpectedFailures, FailureState, HarnessResult};
use crate::fixture::NumberingFixture;
use crate::loader::load_all_fixtures;
use crate::SpecResult;

/// A single way a fixture run disagreed with its expectations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueMismatch {
    /// Expected an issue at `index`, analyzer reported none.
    Missing { index: usize, marker: String },
    /// Analyzer reported an issue the fixture does not list.
    Unexpected { index: usize, marker: String },
    /// Both agree there is an issue but not on the expected marker.
    WrongMarker {
        index: usize,
        expected: String,
        found: String,
    },
    WrongReplacement {
        index: usize,
        expected: String,
        found: String,
    },
    /// Issues left after applying every correction.
    NotClean { remaining: Vec<usize> },
}

impl IssueMismatch {
    /// Stable reference used in the expected-failures file: `B<index>` for
    /// per-block checks, `clean` for the correction round trip.
    pub fn assertion_ref(&self) -> String {
        match self {
            IssueMismatch::Missing { index, .. }
            | IssueMismatch::Unexpected { index, .. }
            | IssueMismatch::WrongMarker { index, .. }
            | IssueMismatch::WrongReplacement { index, .. } => ExpectedFailures::format_ref(*index),
            IssueMismatch::NotClean { .. } => "clean".to_string(),
        }
    }
}

/// Outcome of running one fixture.
#[derive(Debug, Clone)]
pub struct FixtureRun {
    pub report: AnalysisReport,
    /// Checks performed: one per expected or reported issue, plus the
    /// correction round trip when enabled.
    pub checks: usize,
    pub mismatches: Vec<IssueMismatch>,
}

impl FixtureRun {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Analyze a fixture and compare the reported issues with its expectations.
pub fn run_fixture(fixture: &NumberingFixture) -> FixtureRun {
    let analyzer = NumberingAnalyzer::with_config(fixture.config.clone());
    let mut blocks = fixture.to_blocks();
    let report = analyzer.analyze(&blocks);

    let reported: BTreeMap<usize, (&str, String)> = report
        .issues
        .iter()
        .map(|i| (i.index, (i.expected_marker.as_str(), i.replacement_text())))
        .collect();

    let mut mismatches = Vec::new();
    let mut checks = 0;

    for expected in &fixture.expected {
        checks += 1;
        match reported.get(&expected.index) {
            None => mismatches.push(IssueMismatch::Missing {
                index: expected.index,
                marker: expected.marker.clone(),
            }),
            Some((marker, _)) if *marker != expected.marker => {
                mismatches.push(IssueMismatch::WrongMarker {
                    index: expected.index,
                    expected: expected.marker.clone(),
                    found: marker.to_string(),
                })
            }
            Some((_, replacement)) => {
                if let Some(want) = &expected.replacement {
                    if want != replacement {
                        mismatches.push(IssueMismatch::WrongReplacement {
                            index: expected.index,
                            expected: want.clone(),
                            found: replacement.clone(),
                        });
                    }
                }
            }
        }
    }

    for (index, (marker, _)) in &reported {
        if fixture.expected_at(*index).is_none() {
            checks += 1;
            mismatches.push(IssueMismatch::Unexpected {
                index: *index,
                marker: marker.to_string(),
            });
        }
    }

    if fixture.clean_after_correction {
        checks += 1;
        let mut cache = NumberingCache::new();
        analyzer.apply_corrections(&report, &mut blocks, &mut cache);
        let rerun = analyzer.analyze(&blocks);
        if rerun.has_issues() {
            mismatches.push(IssueMismatch::NotClean {
                remaining: rerun.issues.iter().map(|i| i.index).collect(),
            });
        }
    }

    FixtureRun {
        report,
        checks,
        mismatches,
    }
}

/// Run every fixture under `dir` and classify each mismatch against
/// `failures`.
///
/// Returns the tally plus `(fixture, mismatch, state)` for every failed check.
pub fn run_harness(
    dir: &Path,
    failures: &ExpectedFailures,
) -> SpecResult<(HarnessResult, Vec<(String, IssueMismatch, FailureState)>)> {
    let mut result = HarnessResult::new();
    let mut failed = Vec::new();

    for (name, fixture) in load_all_fixtures(dir)? {
        let run = run_fixture(&fixture);
        for _ in run.mismatches.len()..run.checks {
            result.record_pass();
        }
        for mismatch in run.mismatches {
            let state = failures.is_expected(&name, &mismatch.assertion_ref());
            result.record_failure(state);
            failed.push((name.clone(), mismatch, state));
        }
    }

    Ok((result, failed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::parse_fixture;

    fn run(content: &str) -> FixtureRun {
        run_fixture(&parse_fixture(content, "inline").unwrap())
    }

    #[test]
    fn matching_expectations_pass() {
        let run = run(
            r#"
blocks = ["1. Scope", "3. Term"]

[[expect]]
index = 1
marker = "2."
replacement = "2. Term"
"#,
        );
        assert!(run.passed(), "{:?}", run.mismatches);
        assert_eq!(run.checks, 2);
    }

    #[test]
    fn reports_each_kind_of_mismatch() {
        let run = run(
            r#"
blocks = ["1. Scope", "3. Term", "(b) Item", "5. Fees"]

[[expect]]
index = 0
marker = "1."

[[expect]]
index = 1
marker = "4."

[[expect]]
index = 2
marker = "(a)"
replacement = "(a)  Item"
"#,
        );

        assert_eq!(
            run.mismatches,
            vec![
                IssueMismatch::Missing {
                    index: 0,
                    marker: "1.".to_string(),
                },
                IssueMismatch::WrongMarker {
                    index: 1,
                    expected: "4.".to_string(),
                    found: "2.".to_string(),
                },
                IssueMismatch::WrongReplacement {
                    index: 2,
                    expected: "(a)  Item".to_string(),
                    found: "(a) Item".to_string(),
                },
                IssueMismatch::Unexpected {
                    index: 3,
                    marker: "3.".to_string(),
                },
            ]
        );
        assert_eq!(run.mismatches[1].assertion_ref(), "B1");
    }

    #[test]
    fn unclean_correction_is_reported() {
        // the corrected "(i)" reads as a roman numeral, so "(j)" is off again
        let letters: Vec<String> = "abcdefghjk"
            .chars()
            .map(|c| format!("\"({}) item\"", c))
            .collect();
        let content = format!(
            "blocks = [{}]\n\
             [[expect]]\nindex = 8\nmarker = \"(i)\"\n\
             [[expect]]\nindex = 9\nmarker = \"(j)\"\n",
            letters.join(", ")
        );

        let run = run(&content);
        assert_eq!(
            run.mismatches,
            vec![IssueMismatch::NotClean { remaining: vec![9] }]
        );
        assert_eq!(run.mismatches[0].assertion_ref(), "clean");
    }
}
