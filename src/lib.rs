#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Outline numbering analysis for legal documents.
//!
//! Given the paragraphs of a contract, this crate recognizes their outline
//! markers (`ARTICLE IV`, `Section 2`, `3.1.2`, `(a)`, `(iv)`, ...), builds
//! the implied hierarchy and computes what each marker *should* be. Blocks
//! whose marker disagrees become [`NumberingIssue`]s carrying a ready-made
//! replacement text.
//!
//! ## Pipeline
//!
//! - [`PatternRegistry`] - Priority-ordered catalog of marker grammars
//! - [`PatternDetector`] - Classifies a block and splits prefix from content
//! - [`StructureTreeBuilder`] - Builds the hierarchy from marker levels
//! - [`NumberingCalculator`] - Computes expected markers in document order
//! - [`NumberingAnalyzer`] - Runs the pipeline, with optional [`NumberingCache`]
//!
//! ## Corrections
//!
//! Corrections are applied through a caller-provided [`BlockWriter`] in
//! descending index order, see [`apply_corrections`].
//!
//! ## Example
//!
//! ```
//! use layered_numbering::{Block, NumberingAnalyzer};
//!
//! let blocks = Block::from_texts(&[
//!     "ARTICLE I Definitions",
//!     "1.1 Scope",
//!     "1.3 Term",
//! ]);
//! let report = NumberingAnalyzer::new().analyze(&blocks);
//! assert_eq!(report.issues[0].replacement_text(), "1.2 Term");
//! ```

mod analyzer;
mod block;
mod cache;
mod calculator;
mod config;
mod correction;
mod detector;
mod errors;
mod pattern;
mod registry;
mod roman;
mod structure;

pub use analyzer::{AnalysisReport, AnalysisStats, NumberingAnalyzer, NumberingIssue, SectionEntry};
pub use block::{Block, ParsedBlock};
pub use cache::{CacheDecision, ChangeSet, Fingerprint, FullRebuildReason, NumberingCache};
pub use calculator::{markers_equal, CounterKey, CounterState, NumberingCalculator};
pub use config::AnalyzerConfig;
pub use correction::{
    apply_corrections, BlockWriter, Correction, CorrectionFailure, CorrectionOutcome,
};
pub use detector::{detect_pattern, Detection, PatternDetector};
pub use errors::{NumberingError, NumberingResult};
pub use pattern::{
    FormatContext, MarkerStyle, MarkerValue, Pattern, PatternId, PatternMatch, MAX_OUTLINE_VALUE,
};
pub use registry::PatternRegistry;
pub use roman::{from_roman, parse_roman, to_roman, MAX_ROMAN};
pub use structure::{NodeId, StructureTree, StructureTreeBuilder, TreeNode};

#[cfg(test)]
mod tests {
    mod cache;
    mod corrections;
    mod scenarios;
}
