//! The ordered catalog of numbering grammars.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::pattern::{Pattern, PatternId};

static DEFAULT_REGISTRY: Lazy<PatternRegistry> = Lazy::new(PatternRegistry::legal);

/// Read-only ordered list of [`Pattern`]s plus an id index.
///
/// Patterns are kept sorted by descending priority; ties keep registration
/// order. The detector relies on this order: deeper decimal grammars must
/// precede shallower ones, and parenthesized Roman numerals must precede
/// parenthesized letters.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    patterns: Vec<Pattern>,
    by_id: FxHashMap<PatternId, usize>,
}

impl PatternRegistry {
    /// Build a registry from patterns in registration order.
    pub fn new(patterns: Vec<Pattern>) -> Self {
        let mut patterns = patterns;
        // stable: equal priorities keep registration order
        patterns.sort_by(|a, b| b.priority.cmp(&a.priority));

        let by_id = patterns
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id, i))
            .collect();

        Self { patterns, by_id }
    }

    /// The shared legal-outline registry, built once per process.
    pub fn shared() -> &'static PatternRegistry {
        &DEFAULT_REGISTRY
    }

    /// The legal-outline catalog.
    pub fn legal() -> Self {
        use PatternId::*;

        Self::new(vec![
            Pattern::new(ArticleRoman, 1, 100).with_keeps(&[SectionWord]),
            Pattern::new(ArticleNumber, 1, 99).with_keeps(&[SectionWord]),
            Pattern::new(SectionWord, 2, 95),
            Pattern::new(Decimal4, 4, 90).with_parent(Decimal3),
            Pattern::new(Decimal3, 3, 89).with_parent(Decimal2),
            Pattern::new(Decimal2, 2, 88).with_parent(Decimal1),
            Pattern::new(Decimal1, 1, 87),
            Pattern::new(RomanDotted, 1, 80),
            Pattern::new(UpperLetterDotted, 2, 70),
            Pattern::new(ParenRoman, 4, 60).with_resets(&[ParenNumber, ParenUpperLetter]),
            Pattern::new(ParenLetter, 3, 50).with_resets(&[
                ParenRoman,
                ParenNumber,
                ParenUpperLetter,
            ]),
            Pattern::new(ParenUpperLetter, 5, 45).with_resets(&[ParenNumber]),
            Pattern::new(ParenNumber, 5, 40),
            Pattern::new(LowerLetterDotted, 3, 30).with_resets(&[ParenRoman, ParenNumber]),
        ])
    }

    pub fn get(&self, id: PatternId) -> Option<&Pattern> {
        self.by_id.get(&id).map(|&i| &self.patterns[i])
    }

    /// Patterns in detection order.
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::legal()
    }
}
