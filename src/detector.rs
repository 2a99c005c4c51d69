//! Single-block pattern detection.

use crate::block::{Block, ParsedBlock};
use crate::pattern::{Pattern, PatternId, PatternMatch};
use crate::registry::PatternRegistry;

/// The best-matching grammar for one block.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub pattern_id: PatternId,
    pub level: u8,
    pub matched: PatternMatch,
    /// Text after the matched prefix.
    pub content: String,
}

/// Finds the first grammar (in registry order) that matches at the start
/// of a block.
#[derive(Debug, Clone, Copy)]
pub struct PatternDetector<'r> {
    registry: &'r PatternRegistry,
}

impl PatternDetector<'static> {
    /// A detector over the shared legal registry.
    pub fn shared() -> Self {
        Self::new(PatternRegistry::shared())
    }
}

impl<'r> PatternDetector<'r> {
    pub fn new(registry: &'r PatternRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r PatternRegistry {
        self.registry
    }

    /// Classify `text`. Leading and trailing whitespace is ignored.
    ///
    /// Exactly one grammar can win; a grammar whose value fails validation
    /// falls through to the next one.
    pub fn detect(&self, text: &str) -> Option<Detection> {
        let trimmed = text.trim();
        self.registry.iter().find_map(|pattern| {
            pattern
                .recognize(trimmed)
                .map(|matched| Self::detection(pattern, trimmed, matched))
        })
    }

    fn detection(pattern: &Pattern, trimmed: &str, matched: PatternMatch) -> Detection {
        let content = trimmed[matched.prefix.len()..].to_string();
        Detection {
            pattern_id: pattern.id,
            level: pattern.level,
            matched,
            content,
        }
    }

    /// Detect one block.
    pub fn parse(&self, block: &Block) -> ParsedBlock {
        match self.detect(&block.text) {
            Some(detection) => ParsedBlock {
                index: block.index,
                raw_text: block.text.clone(),
                indent: block.indent,
                pattern_id: Some(detection.pattern_id),
                level: detection.level,
                actual_value: Some(detection.matched.value),
                actual_marker: Some(detection.matched.marker),
                actual_prefix: Some(detection.matched.prefix),
                style: detection.matched.style,
                content: detection.content,
            },
            None => ParsedBlock {
                index: block.index,
                raw_text: block.text.clone(),
                indent: block.indent,
                pattern_id: None,
                level: 0,
                actual_value: None,
                actual_marker: None,
                actual_prefix: None,
                style: Default::default(),
                content: block.text.trim().to_string(),
            },
        }
    }

    /// Detect every block, preserving order.
    pub fn parse_all(&self, blocks: &[Block]) -> Vec<ParsedBlock> {
        blocks.iter().map(|block| self.parse(block)).collect()
    }
}

/// Classify a single block of text against the shared legal registry.
///
/// ```
/// use layered_numbering::{detect_pattern, PatternId};
///
/// let found = detect_pattern("1.1.1 Scope").unwrap();
/// assert_eq!(found.pattern_id, PatternId::Decimal3);
/// assert_eq!(found.content, "Scope");
/// ```
pub fn detect_pattern(text: &str) -> Option<Detection> {
    PatternDetector::shared().detect(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::MarkerValue;

    fn id_of(text: &str) -> Option<PatternId> {
        detect_pattern(text).map(|d| d.pattern_id)
    }

    #[test]
    fn deepest_decimal_wins() {
        assert_eq!(id_of("1.1.1 Foo"), Some(PatternId::Decimal3));
        assert_eq!(id_of("1.1 Foo"), Some(PatternId::Decimal2));
        assert_eq!(id_of("1. Foo"), Some(PatternId::Decimal1));
        assert_eq!(id_of("1.2.3.4 Foo"), Some(PatternId::Decimal4));
    }

    #[test]
    fn roman_before_letter() {
        assert_eq!(id_of("(i) Foo"), Some(PatternId::ParenRoman));
        assert_eq!(id_of("(v) Foo"), Some(PatternId::ParenRoman));
        assert_eq!(id_of("(a) Foo"), Some(PatternId::ParenLetter));
        // C = 100 is out of outline range, so it falls through to the letter grammar
        assert_eq!(id_of("(c) Foo"), Some(PatternId::ParenLetter));
        assert_eq!(id_of("I. Introduction"), Some(PatternId::RomanDotted));
        assert_eq!(id_of("C. Payment"), Some(PatternId::UpperLetterDotted));
    }

    #[test]
    fn keywords() {
        assert_eq!(id_of("ARTICLE I Definitions"), Some(PatternId::ArticleRoman));
        assert_eq!(id_of("Article 3 Term"), Some(PatternId::ArticleNumber));
        assert_eq!(id_of("Section 4. Notices"), Some(PatternId::SectionWord));
    }

    #[test]
    fn unnumbered_text() {
        assert_eq!(id_of("This Agreement is made between the parties."), None);
        assert_eq!(id_of("e.g. something"), None);
        assert_eq!(id_of(""), None);
    }

    #[test]
    fn anchored_at_start() {
        assert_eq!(id_of("See Section 3 for details"), None);
        assert_eq!(id_of("as set out in (a) above"), None);
    }

    #[test]
    fn extracts_prefix_and_content() {
        let found = detect_pattern("   (iii)  Third item ").unwrap();
        assert_eq!(found.matched.prefix, "(iii)  ");
        assert_eq!(found.matched.marker, "(iii)");
        assert_eq!(found.matched.value, MarkerValue::Scalar(3));
        assert_eq!(found.content, "Third item");
    }

    #[test]
    fn parse_keeps_unmatched_blocks() {
        let detector = PatternDetector::shared();
        let parsed = detector.parse_all(&Block::from_texts(&["Recitals", "1. Scope"]));
        assert!(!parsed[0].is_numbered());
        assert_eq!(parsed[0].level, 0);
        assert_eq!(parsed[1].pattern_id, Some(PatternId::Decimal1));
        assert_eq!(parsed[1].index, 1);
    }
}
