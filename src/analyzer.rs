//! The detection → tree → calculation pipeline and its report.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::block::{Block, ParsedBlock};
use crate::cache::{CacheDecision, Fingerprint, NumberingCache};
use crate::calculator::NumberingCalculator;
use crate::config::AnalyzerConfig;
use crate::correction::{apply_corrections, BlockWriter, Correction, CorrectionOutcome};
use crate::detector::PatternDetector;
use crate::pattern::PatternId;
use crate::registry::PatternRegistry;
use crate::structure::{StructureTree, StructureTreeBuilder, TreeNode};

/// A block whose marker disagrees with the computed numbering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberingIssue {
    pub index: usize,
    pub level: u8,
    pub pattern_id: PatternId,
    pub actual_prefix: String,
    pub expected_prefix: String,
    pub actual_marker: String,
    pub expected_marker: String,
    pub content: String,
    pub preview: String,
}

impl NumberingIssue {
    /// The corrected block text.
    pub fn replacement_text(&self) -> String {
        format!("{}{}", self.expected_prefix, self.content)
    }

    pub fn to_correction(&self) -> Correction {
        Correction {
            index: self.index,
            actual_prefix: self.actual_prefix.clone(),
            expected_prefix: self.expected_prefix.clone(),
            replacement: self.replacement_text(),
        }
    }
}

/// Counts gathered during one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisStats {
    pub total_blocks: usize,
    pub numbered_blocks: usize,
    pub issue_count: usize,
    pub by_level: BTreeMap<u8, usize>,
    pub by_pattern: BTreeMap<PatternId, usize>,
    pub elapsed: Duration,
}

/// Lightweight outline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionEntry {
    pub index: usize,
    pub level: u8,
    /// The marker as written (`ARTICLE II`, `2.1`).
    pub number: String,
    pub preview: String,
}

/// Output of one analysis call.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub tree: StructureTree,
    /// Issues in document order.
    pub issues: Vec<NumberingIssue>,
    pub stats: AnalysisStats,
    /// How the cache was used, when one was supplied.
    #[serde(skip)]
    pub cache_decision: Option<CacheDecision>,
}

impl AnalysisReport {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// All corrections, highest index first, ready for position-stable
    /// application.
    pub fn corrections(&self) -> Vec<Correction> {
        let mut corrections: Vec<Correction> =
            self.issues.iter().map(NumberingIssue::to_correction).collect();
        corrections.sort_by(|a, b| b.index.cmp(&a.index));
        corrections
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs the numbering pipeline over a document's blocks.
///
/// ```
/// use layered_numbering::{Block, NumberingAnalyzer};
///
/// let blocks = Block::from_texts(&["1. Scope", "3. Term"]);
/// let report = NumberingAnalyzer::new().analyze(&blocks);
/// assert_eq!(report.issues.len(), 1);
/// assert_eq!(report.issues[0].expected_marker, "2.");
/// ```
#[derive(Debug, Clone)]
pub struct NumberingAnalyzer<'r> {
    registry: &'r PatternRegistry,
    config: AnalyzerConfig,
}

impl NumberingAnalyzer<'static> {
    /// Analyzer over the shared legal registry with default settings.
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self::with_registry(PatternRegistry::shared(), config)
    }
}

impl Default for NumberingAnalyzer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> NumberingAnalyzer<'r> {
    pub fn with_registry(registry: &'r PatternRegistry, config: AnalyzerConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Full pass without a cache.
    pub fn analyze(&self, blocks: &[Block]) -> AnalysisReport {
        let started = Instant::now();
        let parsed = PatternDetector::new(self.registry).parse_all(blocks);
        let tree = self.build_tree(&parsed);
        self.report(tree, blocks.len(), started, None)
    }

    /// Pass that consults and then refreshes `cache`.
    ///
    /// A reused tree is returned as-is. A partial pass re-detects only the
    /// changed blocks; tree building and calculation always cover the whole
    /// document.
    pub fn analyze_with_cache(
        &self,
        blocks: &[Block],
        cache: &mut NumberingCache,
    ) -> AnalysisReport {
        let started = Instant::now();
        let fingerprints = Fingerprint::all(blocks);
        let decision = cache.decide(&fingerprints, &self.config);
        debug!(?decision, blocks = blocks.len(), "numbering cache decision");

        let detector = PatternDetector::new(self.registry);
        let (parsed, tree) = match (&decision, cache.tree()) {
            (CacheDecision::Reuse, Some(tree)) => (cache.parsed().to_vec(), tree.clone()),
            (CacheDecision::Partial(changes), _) => {
                let mut reusable = vec![false; blocks.len()];
                for &i in &changes.unchanged {
                    reusable[i] = true;
                }

                let parsed: Vec<ParsedBlock> = blocks
                    .iter()
                    .enumerate()
                    .map(|(i, block)| {
                        match cache.parsed().get(i).filter(|_| reusable[i]) {
                            Some(previous) => ParsedBlock {
                                index: block.index,
                                ..previous.clone()
                            },
                            None => detector.parse(block),
                        }
                    })
                    .collect();
                let tree = self.build_tree(&parsed);
                (parsed, tree)
            }
            _ => {
                let parsed = detector.parse_all(blocks);
                let tree = self.build_tree(&parsed);
                (parsed, tree)
            }
        };

        cache.store(fingerprints, parsed, tree.clone());
        self.report(tree, blocks.len(), started, Some(decision))
    }

    /// Apply every correction in `report` to `writer` and invalidate `cache`
    /// if any block text changed.
    pub fn apply_corrections<W>(
        &self,
        report: &AnalysisReport,
        writer: &mut W,
        cache: &mut NumberingCache,
    ) -> CorrectionOutcome
    where
        W: BlockWriter + ?Sized,
    {
        let outcome = apply_corrections(&report.corrections(), writer);
        if outcome.applied > 0 {
            cache.invalidate();
        }
        outcome
    }

    /// Nodes at or above the configured section level, in document order.
    pub fn sections(&self, report: &AnalysisReport) -> Vec<SectionEntry> {
        report
            .tree
            .nodes()
            .iter()
            .filter(|node| node.level() <= self.config.section_max_level)
            .map(|node| SectionEntry {
                index: node.index(),
                level: node.level(),
                number: node.block.actual_marker.clone().unwrap_or_default(),
                preview: preview(&node.block.content, self.config.preview_len),
            })
            .collect()
    }

    fn build_tree(&self, parsed: &[ParsedBlock]) -> StructureTree {
        let mut tree = StructureTreeBuilder::new().build(parsed);
        NumberingCalculator::new(self.registry).calculate(&mut tree);
        tree
    }

    fn report(
        &self,
        tree: StructureTree,
        total_blocks: usize,
        started: Instant,
        cache_decision: Option<CacheDecision>,
    ) -> AnalysisReport {
        let issues: Vec<NumberingIssue> = tree
            .issues()
            .filter_map(|node| self.issue(node))
            .collect();

        let mut stats = AnalysisStats {
            total_blocks,
            numbered_blocks: tree.len(),
            issue_count: issues.len(),
            ..AnalysisStats::default()
        };
        for node in tree.nodes() {
            *stats.by_level.entry(node.level()).or_insert(0) += 1;
            if let Some(pattern) = node.block.pattern_id {
                *stats.by_pattern.entry(pattern).or_insert(0) += 1;
            }
        }
        stats.elapsed = started.elapsed();

        debug!(
            blocks = stats.total_blocks,
            numbered = stats.numbered_blocks,
            issues = stats.issue_count,
            elapsed = ?stats.elapsed,
            "numbering analysis finished"
        );

        AnalysisReport {
            tree,
            issues,
            stats,
            cache_decision,
        }
    }

    fn issue(&self, node: &TreeNode) -> Option<NumberingIssue> {
        let block = &node.block;
        Some(NumberingIssue {
            index: block.index,
            level: block.level,
            pattern_id: block.pattern_id?,
            actual_prefix: block.actual_prefix.clone()?,
            expected_prefix: node.expected_prefix.clone()?,
            actual_marker: block.actual_marker.clone()?,
            expected_marker: node.expected_marker.clone()?,
            content: block.content.clone(),
            preview: preview(&block.content, self.config.preview_len),
        })
    }
}

/// First `max` graphemes of `text`, with an ellipsis when cut.
pub(crate) fn preview(text: &str, max: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(max).collect();
    if graphemes.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}
