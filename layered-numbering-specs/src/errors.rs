//! Error types for the fixture harness.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    /// Fixture content is not valid TOML or is internally inconsistent.
    #[error("parse error in {path}: {message}")]
    Parse { path: String, message: String },

    /// Fixture or expected-failures file could not be read.
    #[error("failed to load fixture: {path}: {message}")]
    Load { path: String, message: String },

    /// A fixture check did not hold.
    #[error("assertion failed: {message}")]
    Assertion { message: String },
}

pub type SpecResult<T> = Result<T, SpecError>;
