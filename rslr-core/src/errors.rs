use std::path::PathBuf;
use thiserror::Error;

/// Error type for sea-level projections.
///
/// Every variant is a precondition failure. None of them are retried: a failure aborts
/// the scenario that raised it.
#[derive(Error, Debug)]
pub enum RSLRError {
    #[error("{0}")]
    Error(String),
    #[error("{0}")]
    Validation(String),
    #[error("missing input file: {}", .0.display())]
    MissingInput(PathBuf),
    #[error("{what} has the wrong shape. Expected {expected:?}, got {found:?}")]
    ShapeMismatch {
        what: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    #[error("{0} is not available for Levermann")]
    UnsupportedFit(String),
    #[error("output directory not writable: {}", .0.display())]
    OutputDirectory(PathBuf),
    #[error("I/O error for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl RSLRError {
    pub fn validation(msg: impl Into<String>) -> Self {
        RSLRError::Validation(msg.into())
    }
}

/// Convenience type for `Result<T, RSLRError>`.
pub type RSLRResult<T> = Result<T, RSLRError>;
