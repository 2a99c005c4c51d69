//! Batch correction of numbering issues.
//!
//! The engine only produces replacement texts. Writing them back is done by
//! the caller through a [`BlockWriter`]; a failing write is skipped and
//! recorded, and the rest of the batch is still attempted.

use serde::Serialize;
use tracing::{debug, warn};

use crate::block::Block;
use crate::errors::{NumberingError, NumberingResult};

/// A single replacement: block `index` becomes `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Correction {
    pub index: usize,
    pub actual_prefix: String,
    pub expected_prefix: String,
    /// `expected_prefix` followed by the block content.
    pub replacement: String,
}

/// Write access to the caller's document.
pub trait BlockWriter {
    /// Replace the full text of the block at `index`.
    fn replace_text(&mut self, index: usize, text: &str) -> NumberingResult<()>;
}

/// An in-memory document.
impl BlockWriter for Vec<Block> {
    fn replace_text(&mut self, index: usize, text: &str) -> NumberingResult<()> {
        let len = self.len();
        let block = self
            .iter_mut()
            .find(|b| b.index == index)
            .ok_or(NumberingError::BlockOutOfRange { index, len })?;
        block.text = text.to_string();
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrectionFailure {
    pub index: usize,
    pub message: String,
}

/// How many corrections were requested and how many actually landed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorrectionOutcome {
    pub requested: usize,
    pub applied: usize,
    pub failures: Vec<CorrectionFailure>,
}

impl CorrectionOutcome {
    pub fn is_complete(&self) -> bool {
        self.applied == self.requested
    }
}

/// Apply `corrections` in descending index order.
///
/// Position-stable application: a later block is always rewritten before
/// an earlier one, so no pending correction refers to a shifted position.
pub fn apply_corrections<W>(corrections: &[Correction], writer: &mut W) -> CorrectionOutcome
where
    W: BlockWriter + ?Sized,
{
    let mut ordered: Vec<&Correction> = corrections.iter().collect();
    ordered.sort_by(|a, b| b.index.cmp(&a.index));

    let mut outcome = CorrectionOutcome {
        requested: corrections.len(),
        ..CorrectionOutcome::default()
    };

    for correction in ordered {
        match writer.replace_text(correction.index, &correction.replacement) {
            Ok(()) => outcome.applied += 1,
            Err(err) => {
                warn!(index = correction.index, error = %err, "skipping numbering correction");
                outcome.failures.push(CorrectionFailure {
                    index: correction.index,
                    message: err.to_string(),
                });
            }
        }
    }

    debug!(
        requested = outcome.requested,
        applied = outcome.applied,
        "applied numbering corrections"
    );
    outcome
}
