//! Numbering grammars.
//!
//! Each [`Pattern`] recognizes one marker family at the start of a block
//! (`ARTICLE IV`, `1.2.3`, `(b)`, ...), extracts its [`MarkerValue`], and can
//! format the marker it *should* carry for a given count.
//!
//! Grammars are a closed set ([`PatternId`]); recognition, extraction and
//! formatting all dispatch on the grammar kind rather than on stored
//! closures.

use std::fmt;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::roman::{parse_roman, to_roman};

/// Roman markers above this value are rejected as implausible outline
/// positions.
pub const MAX_OUTLINE_VALUE: u32 = 50;

/// Identifier of a numbering grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternId {
    /// `ARTICLE IV`
    ArticleRoman,
    /// `Article 4`
    ArticleNumber,
    /// `Section 3`, `Sec. 3`, `§ 3`
    SectionWord,
    /// `1.2.3.4`
    #[serde(rename = "decimal_4")]
    Decimal4,
    /// `1.2.3`
    #[serde(rename = "decimal_3")]
    Decimal3,
    /// `1.2`
    #[serde(rename = "decimal_2")]
    Decimal2,
    /// `1.`
    #[serde(rename = "decimal_1")]
    Decimal1,
    /// `IV.`
    RomanDotted,
    /// `B.`
    UpperLetterDotted,
    /// `(iv)`
    ParenRoman,
    /// `(b)`
    ParenLetter,
    /// `(B)`
    ParenUpperLetter,
    /// `(2)`
    ParenNumber,
    /// `b.`
    LowerLetterDotted,
}

impl PatternId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternId::ArticleRoman => "article_roman",
            PatternId::ArticleNumber => "article_number",
            PatternId::SectionWord => "section_word",
            PatternId::Decimal4 => "decimal_4",
            PatternId::Decimal3 => "decimal_3",
            PatternId::Decimal2 => "decimal_2",
            PatternId::Decimal1 => "decimal_1",
            PatternId::RomanDotted => "roman_dotted",
            PatternId::UpperLetterDotted => "upper_letter_dotted",
            PatternId::ParenRoman => "paren_roman",
            PatternId::ParenLetter => "paren_letter",
            PatternId::ParenUpperLetter => "paren_upper_letter",
            PatternId::ParenNumber => "paren_number",
            PatternId::LowerLetterDotted => "lower_letter_dotted",
        }
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The numeric value carried by a marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerValue {
    /// Single position: `IV` = 4, `(b)` = 2.
    Scalar(u32),
    /// Dot-separated chain: `2.4.1` = parts \[2, 4, 1\], current 1.
    Decimal {
        full_text: String,
        parts: Vec<u32>,
        current: u32,
    },
}

impl MarkerValue {
    pub fn decimal(parts: Vec<u32>) -> Self {
        let full_text = join_parts(&parts);
        let current = parts.last().copied().unwrap_or(0);
        MarkerValue::Decimal {
            full_text,
            parts,
            current,
        }
    }

    /// The position of this marker among its siblings.
    pub fn current(&self) -> u32 {
        match self {
            MarkerValue::Scalar(value) => *value,
            MarkerValue::Decimal { current, .. } => *current,
        }
    }

    /// Decimal segments, or a single segment for scalar values.
    pub fn parts(&self) -> Vec<u32> {
        match self {
            MarkerValue::Scalar(value) => vec![*value],
            MarkerValue::Decimal { parts, .. } => parts.clone(),
        }
    }
}

impl fmt::Display for MarkerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerValue::Scalar(value) => write!(f, "{}", value),
            MarkerValue::Decimal { full_text, .. } => f.write_str(full_text),
        }
    }
}

pub(crate) fn join_parts(parts: &[u32]) -> String {
    parts
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Literal spelling details of a detected marker, reused when formatting
/// the expected marker so that only the numbering can differ.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerStyle {
    /// Keyword as written (`ARTICLE`, `Article`, `Sec.`, `§`).
    pub keyword: Option<String>,
    /// Whitespace between keyword and number.
    pub gap: String,
    /// Whether a decimal marker ended in a dot (`1.2.`).
    pub trailing_dot: bool,
    /// Text between the marker and the block content.
    pub separator: String,
}

/// Inputs to [`Pattern::format`] besides the count.
#[derive(Debug, Clone, Copy)]
pub struct FormatContext<'a> {
    /// Open decimal ancestry, outermost first.
    pub ancestry: &'a [u32],
    pub style: &'a MarkerStyle,
}

/// A successful recognition at the start of a block.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    /// The marker itself (`ARTICLE II`, `1.2`, `(b)`).
    pub marker: String,
    /// The marker plus its trailing separator, as written.
    pub prefix: String,
    pub value: MarkerValue,
    pub style: MarkerStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grammar {
    ArticleRoman,
    ArticleNumber,
    SectionWord,
    Decimal { depth: usize },
    RomanDotted,
    LetterDotted { upper: bool },
    ParenRoman,
    ParenLetter { upper: bool },
    ParenNumber,
}

impl Grammar {
    fn for_id(id: PatternId) -> Self {
        match id {
            PatternId::ArticleRoman => Grammar::ArticleRoman,
            PatternId::ArticleNumber => Grammar::ArticleNumber,
            PatternId::SectionWord => Grammar::SectionWord,
            PatternId::Decimal4 => Grammar::Decimal { depth: 4 },
            PatternId::Decimal3 => Grammar::Decimal { depth: 3 },
            PatternId::Decimal2 => Grammar::Decimal { depth: 2 },
            PatternId::Decimal1 => Grammar::Decimal { depth: 1 },
            PatternId::RomanDotted => Grammar::RomanDotted,
            PatternId::UpperLetterDotted => Grammar::LetterDotted { upper: true },
            PatternId::LowerLetterDotted => Grammar::LetterDotted { upper: false },
            PatternId::ParenRoman => Grammar::ParenRoman,
            PatternId::ParenLetter => Grammar::ParenLetter { upper: false },
            PatternId::ParenUpperLetter => Grammar::ParenLetter { upper: true },
            PatternId::ParenNumber => Grammar::ParenNumber,
        }
    }

    fn source(&self) -> String {
        const SEP: &str = r"(?P<sep>\s*[-–—:.]\s*|\s+|$)";
        const WORD_SEP: &str = r"(?P<sep>\s*[-–—:]\s*|\s+|$)";
        const PAREN_SEP: &str = r"(?P<sep>\s*)";

        match self {
            Grammar::ArticleRoman => {
                format!(r"^(?P<kw>ARTICLE|Article)(?P<gap>\s+)(?P<num>[IVXLCDM]+){}", SEP)
            }
            Grammar::ArticleNumber => {
                format!(r"^(?P<kw>ARTICLE|Article)(?P<gap>\s+)(?P<num>\d+){}", SEP)
            }
            Grammar::SectionWord => format!(
                r"^(?P<kw>Section|SECTION|Sec\.|SEC\.|§)(?P<gap>\s*)(?P<num>\d+)(?P<trail>\.)?{}",
                WORD_SEP
            ),
            Grammar::Decimal { depth: 1 } => r"^(?P<num>\d+)(?P<trail>\.)(?P<sep>\s+|$)".to_string(),
            Grammar::Decimal { depth } => format!(
                r"^(?P<num>\d+(?:\.\d+){{{}}})(?P<trail>\.)?(?P<sep>\s+|$)",
                depth - 1
            ),
            Grammar::RomanDotted => r"^(?P<num>[IVXLCDM]+)\.(?P<sep>\s+|$)".to_string(),
            Grammar::LetterDotted { upper: true } => {
                r"^(?P<num>[A-Z]+)\.(?P<sep>\s+|$)".to_string()
            }
            Grammar::LetterDotted { upper: false } => {
                r"^(?P<num>[a-z]+)\.(?P<sep>\s+|$)".to_string()
            }
            Grammar::ParenRoman => format!(r"^\((?P<num>[ivxlcdm]+)\){}", PAREN_SEP),
            Grammar::ParenLetter { upper: true } => {
                format!(r"^\((?P<num>[A-Z]+)\){}", PAREN_SEP)
            }
            Grammar::ParenLetter { upper: false } => {
                format!(r"^\((?P<num>[a-z]+)\){}", PAREN_SEP)
            }
            Grammar::ParenNumber => format!(r"^\((?P<num>\d+)\){}", PAREN_SEP),
        }
    }
}

/// A numbering grammar with its hierarchy metadata.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub id: PatternId,
    /// Nominal hierarchy depth, 1 = top level.
    pub level: u8,
    /// Higher wins when several grammars could match.
    pub priority: u16,
    /// Next shallower grammar in a decimal chain.
    pub parent: Option<PatternId>,
    /// Counters cleared whenever this grammar's marker appears.
    pub resets: Vec<PatternId>,
    /// Counters this grammar never clears through the level rule.
    pub keeps: Vec<PatternId>,
    grammar: Grammar,
    recognizer: Regex,
}

impl Pattern {
    pub fn new(id: PatternId, level: u8, priority: u16) -> Self {
        let grammar = Grammar::for_id(id);
        let recognizer = Regex::new(&grammar.source()).expect("Invalid numbering pattern regex");

        Self {
            id,
            level,
            priority,
            parent: None,
            resets: Vec::new(),
            keeps: Vec::new(),
            grammar,
            recognizer,
        }
    }

    pub fn with_parent(mut self, parent: PatternId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_resets(mut self, resets: &[PatternId]) -> Self {
        self.resets = resets.to_vec();
        self
    }

    pub fn with_keeps(mut self, keeps: &[PatternId]) -> Self {
        self.keeps = keeps.to_vec();
        self
    }

    /// Whether this grammar belongs to the dot-separated integer family.
    pub fn is_decimal(&self) -> bool {
        matches!(self.grammar, Grammar::Decimal { .. })
    }

    /// Try to recognize this grammar at the very start of `text`.
    ///
    /// Returns `None` when the text does not match or when the extracted
    /// value fails validation (non-canonical Roman numeral, out-of-range
    /// letter, zero decimal segment).
    pub fn recognize(&self, text: &str) -> Option<PatternMatch> {
        let caps = self.recognizer.captures(text)?;
        let whole = caps.get(0)?;
        let value = self.extract_value(&caps)?;

        let separator = caps.name("sep").map_or("", |m| m.as_str());
        let marker = whole.as_str()[..whole.as_str().len() - separator.len()].to_string();

        let style = MarkerStyle {
            keyword: caps.name("kw").map(|m| m.as_str().to_string()),
            gap: caps.name("gap").map_or(String::new(), |m| m.as_str().to_string()),
            trailing_dot: caps.name("trail").is_some(),
            separator: separator.to_string(),
        };

        Some(PatternMatch {
            marker,
            prefix: whole.as_str().to_string(),
            value,
            style,
        })
    }

    fn extract_value(&self, caps: &Captures<'_>) -> Option<MarkerValue> {
        let num = caps.name("num")?.as_str();

        match self.grammar {
            Grammar::ArticleRoman | Grammar::RomanDotted => {
                parse_outline_roman(num, true).map(MarkerValue::Scalar)
            }
            Grammar::ParenRoman => parse_outline_roman(num, false).map(MarkerValue::Scalar),
            Grammar::ArticleNumber | Grammar::SectionWord | Grammar::ParenNumber => {
                parse_positive(num).map(MarkerValue::Scalar)
            }
            Grammar::Decimal { .. } => {
                let parts = num
                    .split('.')
                    .map(parse_positive)
                    .collect::<Option<Vec<u32>>>()?;
                Some(MarkerValue::decimal(parts))
            }
            Grammar::LetterDotted { .. } | Grammar::ParenLetter { .. } => {
                parse_letter_label(num).map(MarkerValue::Scalar)
            }
        }
    }

    /// Format the marker this grammar produces for `count`.
    ///
    /// Decimal grammars prepend the ancestry from `ctx`; every grammar reuses
    /// the keyword spelling and trailing-dot style recorded in `ctx.style`.
    /// The separator is not included.
    pub fn format(&self, count: u32, ctx: &FormatContext<'_>) -> String {
        let style = ctx.style;
        match self.grammar {
            Grammar::ArticleRoman => format!(
                "{}{}{}",
                style.keyword.as_deref().unwrap_or("ARTICLE"),
                gap_or_space(&style.gap),
                to_roman(count)
            ),
            Grammar::ArticleNumber => format!(
                "{}{}{}",
                style.keyword.as_deref().unwrap_or("ARTICLE"),
                gap_or_space(&style.gap),
                count
            ),
            Grammar::SectionWord => format!(
                "{}{}{}{}",
                style.keyword.as_deref().unwrap_or("Section"),
                style.gap,
                count,
                if style.trailing_dot { "." } else { "" }
            ),
            Grammar::Decimal { depth } => {
                let mut parts = ctx.ancestry.to_vec();
                parts.push(count);
                let mut out = join_parts(&parts);
                if depth == 1 || style.trailing_dot {
                    out.push('.');
                }
                out
            }
            Grammar::RomanDotted => format!("{}.", to_roman(count)),
            Grammar::LetterDotted { upper } => format!("{}.", letter_label(count, upper)),
            Grammar::ParenRoman => format!("({})", to_roman(count).to_lowercase()),
            Grammar::ParenLetter { upper } => format!("({})", letter_label(count, upper)),
            Grammar::ParenNumber => format!("({})", count),
        }
    }
}

fn gap_or_space(gap: &str) -> &str {
    if gap.is_empty() {
        " "
    } else {
        gap
    }
}

fn parse_positive(text: &str) -> Option<u32> {
    text.parse::<u32>().ok().filter(|n| *n > 0)
}

fn parse_outline_roman(text: &str, uppercase: bool) -> Option<u32> {
    let (value, is_upper) = parse_roman(text)?;
    if is_upper != uppercase || value > MAX_OUTLINE_VALUE {
        return None;
    }
    Some(value)
}

/// `a` = 1 ... `z` = 26, `aa` = 27 ... `zz` = 52, `aaa` = 53 and so on.
/// Labels mixing letters are rejected.
fn parse_letter_label(text: &str) -> Option<u32> {
    let mut chars = text.chars();
    let first = chars.next()?;
    let repeat = 1 + chars.clone().count() as u32;
    if !chars.all(|c| c == first) {
        return None;
    }

    let offset = u32::from(first.to_ascii_lowercase()) - u32::from('a') + 1;
    (repeat - 1).checked_mul(26)?.checked_add(offset)
}

/// Inverse of [`parse_letter_label`]; counts past `z` repeat the letter.
pub(crate) fn letter_label(count: u32, upper: bool) -> String {
    if count == 0 {
        return count.to_string();
    }
    let base = if upper { b'A' } else { b'a' };
    let letter = (base + ((count - 1) % 26) as u8) as char;
    let repeat = ((count - 1) / 26 + 1) as usize;
    std::iter::repeat(letter).take(repeat).collect()
}
