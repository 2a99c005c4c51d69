//! Analyzer configuration.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{NumberingError, NumberingResult};

/// Tunables for analysis and caching.
///
/// Every field has a default, so a TOML file only needs the keys it
/// changes:
///
/// ```
/// use layered_numbering::AnalyzerConfig;
///
/// let config = AnalyzerConfig::from_toml_str("rebuild_ratio = 0.5").unwrap();
/// assert_eq!(config.rebuild_ratio, 0.5);
/// assert_eq!(config.section_max_level, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// How long a cached analysis stays trustworthy.
    pub freshness_secs: u64,
    /// Fraction of the previous block count that may change before the
    /// cache is discarded instead of patched.
    pub rebuild_ratio: f64,
    /// Graphemes kept in content previews.
    pub preview_len: usize,
    /// Deepest level included in the sections projection.
    pub section_max_level: u8,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            freshness_secs: 300,
            rebuild_ratio: 0.3,
            preview_len: 60,
            section_max_level: 2,
        }
    }
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn freshness(&self) -> Duration {
        Duration::from_secs(self.freshness_secs)
    }

    pub fn from_toml_str(content: &str) -> NumberingResult<Self> {
        toml::from_str(content).map_err(|e| NumberingError::Config {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> NumberingResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| NumberingError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| NumberingError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
