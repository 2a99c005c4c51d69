//! Error types.
//!
//! Detection, tree building, calculation and caching never fail; errors
//! only come from configuration loading and from applying corrections to
//! the caller's document.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NumberingError {
    /// Configuration could not be read or parsed.
    #[error("failed to load config: {path}: {message}")]
    Config { path: String, message: String },

    /// A correction referenced a block the document does not have.
    #[error("block {index} is out of range (document has {len} blocks)")]
    BlockOutOfRange { index: usize, len: usize },

    /// The document writer rejected a correction.
    #[error("correction for block {index} failed: {message}")]
    Correction { index: usize, message: String },
}

pub type NumberingResult<T> = Result<T, NumberingError>;
