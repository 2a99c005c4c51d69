//! Human-readable harness output.

use crate::failures::{FailureState, HarnessResult};
use crate::runner::IssueMismatch;

/// One line per failed check.
pub fn format_failure(fixture_name: &str, mismatch: &IssueMismatch, state: FailureState) -> String {
    let tag = match state {
        FailureState::Known => "KNOWN",
        FailureState::Pending => "PENDING",
        FailureState::Regression => "FAIL",
    };

    let detail = match mismatch {
        IssueMismatch::Missing { index, marker } => {
            format!("block {}: expected an issue ({}), none reported", index, marker)
        }
        IssueMismatch::Unexpected { index, marker } => {
            format!("block {}: unexpected issue, analyzer wants {}", index, marker)
        }
        IssueMismatch::WrongMarker {
            index,
            expected,
            found,
        } => format!("block {}: expected marker {}, got {}", index, expected, found),
        IssueMismatch::WrongReplacement {
            index,
            expected,
            found,
        } => format!(
            "block {}: expected replacement {:?}, got {:?}",
            index, expected, found
        ),
        IssueMismatch::NotClean { remaining } => {
            format!("issues remain after correction at blocks {:?}", remaining)
        }
    };

    format!("{}: {} [{}] {}", tag, fixture_name, mismatch.assertion_ref(), detail)
}

pub fn format_summary(result: &HarnessResult) -> String {
    format!(
        "{} checks: {} passed, {} expected failures, {} regressions",
        result.total, result.passed, result.expected_failures, result.regressions
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_mismatch() {
        let lines = vec![
            format_failure(
                "decimals.toml",
                &IssueMismatch::WrongMarker {
                    index: 2,
                    expected: "1.2".to_string(),
                    found: "1.3".to_string(),
                },
                FailureState::Regression,
            ),
            format_failure(
                "letters.toml",
                &IssueMismatch::NotClean { remaining: vec![9] },
                FailureState::Pending,
            ),
            format_failure(
                "letters.toml",
                &IssueMismatch::WrongReplacement {
                    index: 1,
                    expected: "(b) x".to_string(),
                    found: "(b)  x".to_string(),
                },
                FailureState::Known,
            ),
        ];
        insta::assert_snapshot!(lines.join("\n"), @r###"
        FAIL: decimals.toml [B2] block 2: expected marker 1.2, got 1.3
        PENDING: letters.toml [clean] issues remain after correction at blocks [9]
        KNOWN: letters.toml [B1] block 1: expected replacement "(b) x", got "(b)  x"
        "###);
    }

    #[test]
    fn summary_line() {
        let result = HarnessResult {
            total: 10,
            passed: 8,
            expected_failures: 1,
            regressions: 1,
        };
        assert_eq!(
            format_summary(&result),
            "10 checks: 8 passed, 1 expected failures, 1 regressions"
        );
    }
}
