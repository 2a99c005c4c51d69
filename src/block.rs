//! Input blocks and their detected form.

use serde::{Deserialize, Serialize};

use crate::pattern::{MarkerStyle, MarkerValue, PatternId};

/// One paragraph as supplied by the document source.
///
/// The engine never fetches blocks itself; callers materialize every
/// block before a pass starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Stable position in the document.
    pub index: usize,
    pub text: String,
    /// Left indent in the host document's unit.
    #[serde(default)]
    pub indent: f32,
    /// Paragraph style name.
    #[serde(default)]
    pub style: String,
}

impl Block {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            indent: 0.0,
            style: String::new(),
        }
    }

    pub fn with_indent(mut self, indent: f32) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Build blocks from plain strings, indexed by position.
    pub fn from_texts<S: AsRef<str>>(texts: &[S]) -> Vec<Block> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Block::new(i, t.as_ref()))
            .collect()
    }
}

/// A block after pattern detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedBlock {
    pub index: usize,
    pub raw_text: String,
    pub indent: f32,
    pub pattern_id: Option<PatternId>,
    /// Level claimed by the matched grammar; 0 when unnumbered.
    pub level: u8,
    pub actual_value: Option<MarkerValue>,
    /// The marker without its separator (`1.3`, `(c)`).
    pub actual_marker: Option<String>,
    /// The literal marker text including its trailing separator.
    pub actual_prefix: Option<String>,
    pub style: MarkerStyle,
    /// Text after the prefix.
    pub content: String,
}

impl ParsedBlock {
    pub fn is_numbered(&self) -> bool {
        self.pattern_id.is_some()
    }
}
