//! Fixture format.
//!
//! A fixture is a TOML file listing the paragraphs of a small document and
//! the issues the analyzer is expected to report for it:
//!
//! ```toml
//! title = "Skipped section"
//! blocks = ["1. Scope", "3. Term"]
//!
//! [[expect]]
//! index = 1
//! marker = "2."
//! replacement = "2. Term"
//! ```

use layered_numbering::{AnalyzerConfig, Block};
use serde::Deserialize;

use crate::errors::{SpecError, SpecResult};

/// One expected numbering issue.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExpectedIssue {
    pub index: usize,
    /// Expected marker, without separator.
    pub marker: String,
    /// Full corrected text, when the fixture pins it.
    #[serde(default)]
    pub replacement: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NumberingFixture {
    #[serde(default)]
    pub title: Option<String>,
    pub blocks: Vec<String>,
    #[serde(default, rename = "expect")]
    pub expected: Vec<ExpectedIssue>,
    /// Whether applying every correction must leave a clean document.
    #[serde(default = "default_clean_after_correction")]
    pub clean_after_correction: bool,
    #[serde(default)]
    pub config: AnalyzerConfig,
}

fn default_clean_after_correction() -> bool {
    true
}

impl NumberingFixture {
    pub fn to_blocks(&self) -> Vec<Block> {
        Block::from_texts(self.blocks.as_slice())
    }

    pub fn expected_at(&self, index: usize) -> Option<&ExpectedIssue> {
        self.expected.iter().find(|e| e.index == index)
    }
}

/// Parse fixture content. `origin` names the source in error messages.
pub fn parse_fixture(content: &str, origin: &str) -> SpecResult<NumberingFixture> {
    let fixture: NumberingFixture = toml::from_str(content).map_err(|e| SpecError::Parse {
        path: origin.to_string(),
        message: e.to_string(),
    })?;

    if let Some(bad) = fixture
        .expected
        .iter()
        .find(|e| e.index >= fixture.blocks.len())
    {
        return Err(SpecError::Parse {
            path: origin.to_string(),
            message: format!(
                "expected issue at block {} but fixture has {} blocks",
                bad.index,
                fixture.blocks.len()
            ),
        });
    }

    Ok(fixture)
}
