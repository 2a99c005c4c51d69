//! Incremental analysis cache.
//!
//! One [`NumberingCache`] per document, owned by the caller. The cache only
//! decides how much detection work can be skipped; the tree builder and
//! calculator always rerun over the whole document on a miss, because
//! counters cannot be patched locally.

use std::hash::{Hash, Hasher};
use std::time::Instant;

use rustc_hash::FxHasher;
use serde::Serialize;

use crate::block::{Block, ParsedBlock};
use crate::config::AnalyzerConfig;
use crate::structure::StructureTree;

/// Fast content hash of a block's text and formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    pub fn of(block: &Block) -> Self {
        let mut hasher = FxHasher::default();
        block.text.hash(&mut hasher);
        block.indent.to_bits().hash(&mut hasher);
        block.style.hash(&mut hasher);
        Fingerprint(hasher.finish())
    }

    pub fn all(blocks: &[Block]) -> Vec<Fingerprint> {
        blocks.iter().map(Fingerprint::of).collect()
    }
}

/// Position-wise difference between two fingerprint lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub added: Vec<usize>,
    pub removed: Vec<usize>,
    pub modified: Vec<usize>,
    pub unchanged: Vec<usize>,
}

impl ChangeSet {
    pub fn diff(previous: &[Fingerprint], current: &[Fingerprint]) -> Self {
        let mut changes = ChangeSet::default();
        let shared = previous.len().min(current.len());

        for i in 0..shared {
            if previous[i] == current[i] {
                changes.unchanged.push(i);
            } else {
                changes.modified.push(i);
            }
        }
        changes.added.extend(shared..current.len());
        changes.removed.extend(shared..previous.len());
        changes
    }

    /// Added, removed and modified positions together.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }

    pub fn is_unchanged(&self) -> bool {
        self.change_count() == 0
    }
}

/// Why a full rebuild was chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum FullRebuildReason {
    /// Nothing cached, or the cache was invalidated.
    Empty,
    /// The cached entry is older than the freshness window.
    Expired,
    /// More blocks changed than the configured ratio allows.
    TooManyChanges { changed: usize, previous: usize },
}

/// What an analysis pass should do with the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheDecision {
    /// Every fingerprint matches: the cached tree is current.
    Reuse,
    /// Re-detect only the changed positions, then rebuild the tree.
    Partial(ChangeSet),
    /// Detect everything from scratch.
    Full(FullRebuildReason),
}

/// Per-document cache of fingerprints, parsed blocks and the last tree.
#[derive(Debug, Clone, Default)]
pub struct NumberingCache {
    fingerprints: Vec<Fingerprint>,
    parsed: Vec<ParsedBlock>,
    tree: Option<StructureTree>,
    stored_at: Option<Instant>,
}

impl NumberingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_none()
    }

    /// Forget everything. Call after changing block text outside the
    /// analyzer, e.g. after applying corrections.
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }

    pub fn fingerprint(&self, index: usize) -> Option<Fingerprint> {
        self.fingerprints.get(index).copied()
    }

    pub fn fingerprints(&self) -> &[Fingerprint] {
        &self.fingerprints
    }

    pub fn tree(&self) -> Option<&StructureTree> {
        self.tree.as_ref()
    }

    pub(crate) fn parsed(&self) -> &[ParsedBlock] {
        &self.parsed
    }

    /// Decide how to treat the cache for a document with `current`
    /// fingerprints.
    pub fn decide(&self, current: &[Fingerprint], config: &AnalyzerConfig) -> CacheDecision {
        let stored_at = match (self.tree.as_ref(), self.stored_at) {
            (Some(_), Some(stored_at)) => stored_at,
            _ => return CacheDecision::Full(FullRebuildReason::Empty),
        };

        if stored_at.elapsed() >= config.freshness() {
            return CacheDecision::Full(FullRebuildReason::Expired);
        }

        let changes = ChangeSet::diff(&self.fingerprints, current);
        if changes.is_unchanged() {
            return CacheDecision::Reuse;
        }

        let previous = self.fingerprints.len();
        let changed = changes.change_count();
        if changed as f64 > config.rebuild_ratio * previous as f64 {
            return CacheDecision::Full(FullRebuildReason::TooManyChanges { changed, previous });
        }

        CacheDecision::Partial(changes)
    }

    pub(crate) fn store(
        &mut self,
        fingerprints: Vec<Fingerprint>,
        parsed: Vec<ParsedBlock>,
        tree: StructureTree,
    ) {
        self.fingerprints = fingerprints;
        self.parsed = parsed;
        self.tree = Some(tree);
        self.stored_at = Some(Instant::now());
    }
}
