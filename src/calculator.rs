//! Expected-numbering computation.
//!
//! A single pre-order walk over the [`StructureTree`] with one
//! [`CounterState`]. Decimal grammars count within their open ancestry
//! chain; every other grammar counts per `(pattern, level)` and clears the
//! counters it dominates.

use std::collections::BTreeMap;

use crate::pattern::{FormatContext, MarkerStyle, Pattern, PatternId};
use crate::registry::PatternRegistry;
use crate::structure::{NodeId, StructureTree};

/// Composite counter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CounterKey {
    pub pattern: PatternId,
    pub level: u8,
}

impl CounterKey {
    pub fn new(pattern: PatternId, level: u8) -> Self {
        Self { pattern, level }
    }
}

/// Counters and decimal ancestry for one calculation pass.
///
/// Created empty at the start of a pass and dropped at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterState {
    counts: BTreeMap<CounterKey, u32>,
    ancestry: Vec<u32>,
}

impl CounterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pattern: PatternId, level: u8) -> Option<u32> {
        self.counts.get(&CounterKey::new(pattern, level)).copied()
    }

    /// Open decimal integers, outermost first.
    pub fn ancestry(&self) -> &[u32] {
        &self.ancestry
    }

    pub fn increment(&mut self, key: CounterKey) -> u32 {
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        *count
    }

    /// Drop every counter belonging to `pattern`, at any level.
    pub fn clear_pattern(&mut self, pattern: PatternId) {
        self.counts.retain(|key, _| key.pattern != pattern);
    }

    /// Drop every counter deeper than `level`.
    pub fn clear_deeper_than(&mut self, level: u8) {
        self.counts.retain(|key, _| key.level <= level);
    }

    pub fn truncate_ancestry(&mut self, len: usize) {
        self.ancestry.truncate(len);
    }
}

/// Computes the expected marker of every node and flags mismatches.
#[derive(Debug, Clone, Copy)]
pub struct NumberingCalculator<'r> {
    registry: &'r PatternRegistry,
}

impl<'r> NumberingCalculator<'r> {
    pub fn new(registry: &'r PatternRegistry) -> Self {
        Self { registry }
    }

    /// Fill in `expected_marker`, `expected_prefix` and `has_issue` for every
    /// node and return the number of issues.
    ///
    /// Starts from an empty [`CounterState`] each time, so repeated runs on
    /// the same tree produce identical results.
    pub fn calculate(&self, tree: &mut StructureTree) -> usize {
        let mut state = CounterState::new();
        let mut issues = 0;

        for id in tree.preorder() {
            if self.visit(tree, id, &mut state) {
                issues += 1;
            }
        }

        issues
    }

    fn visit(&self, tree: &mut StructureTree, id: NodeId, state: &mut CounterState) -> bool {
        let node = tree.node_mut(id);
        node.expected_marker = None;
        node.expected_prefix = None;
        node.has_issue = false;

        let pattern = match node.block.pattern_id.and_then(|p| self.registry.get(p)) {
            Some(pattern) => pattern,
            None => return false,
        };

        let expected = if pattern.is_decimal() {
            let actual_parts = node
                .block
                .actual_value
                .as_ref()
                .map(|v| v.parts())
                .unwrap_or_default();
            self.expect_decimal(pattern, &actual_parts, &node.block.style, state)
        } else {
            self.expect_scalar(pattern, &node.block.style, state)
        };

        let expected_prefix = format!("{}{}", expected, node.block.style.separator);
        let has_issue = match &node.block.actual_prefix {
            Some(actual) => !markers_equal(actual, &expected_prefix),
            None => true,
        };

        node.expected_marker = Some(expected);
        node.expected_prefix = Some(expected_prefix);
        node.has_issue = has_issue;
        has_issue
    }

    fn expect_decimal(
        &self,
        pattern: &Pattern,
        actual_parts: &[u32],
        style: &MarkerStyle,
        state: &mut CounterState,
    ) -> String {
        let level = pattern.level;
        let depth = usize::from(level.saturating_sub(1));

        state.clear_deeper_than(level);
        state.truncate_ancestry(depth);

        // no open parent for a segment: trust the block's own segment
        let mut ancestry = state.ancestry.clone();
        while ancestry.len() < depth {
            let segment = actual_parts.get(ancestry.len()).copied().unwrap_or(1);
            ancestry.push(segment);
        }

        let count = state.increment(CounterKey::new(pattern.id, level));
        let marker = pattern.format(
            count,
            &FormatContext {
                ancestry: &ancestry,
                style,
            },
        );

        ancestry.push(count);
        state.ancestry = ancestry;
        marker
    }

    fn expect_scalar(
        &self,
        pattern: &Pattern,
        style: &MarkerStyle,
        state: &mut CounterState,
    ) -> String {
        let level = pattern.level;

        for reset in &pattern.resets {
            state.clear_pattern(*reset);
        }

        state.counts.retain(|key, _| {
            key.level < level || key.pattern == pattern.id || pattern.keeps.contains(&key.pattern)
        });

        // ancestry segments live as long as the deepest open decimal counter
        let registry = self.registry;
        let open_depth = state
            .counts
            .keys()
            .filter(|key| registry.get(key.pattern).map_or(false, |p| p.is_decimal()))
            .map(|key| usize::from(key.level))
            .max()
            .unwrap_or(0);
        state.truncate_ancestry(open_depth.min(usize::from(level.saturating_sub(1))));

        let count = state.increment(CounterKey::new(pattern.id, level));
        pattern.format(
            count,
            &FormatContext {
                ancestry: &[],
                style,
            },
        )
    }
}

/// Whitespace-normalized, trailing-punctuation-insensitive comparison.
pub fn markers_equal(actual: &str, expected: &str) -> bool {
    normalize_marker(actual) == normalize_marker(expected)
}

fn normalize_marker(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(|c: char| matches!(c, '.' | ':' | ';' | ',' | '-' | '–' | '—'))
        .trim_end()
        .to_string()
}
