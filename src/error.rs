use thiserror::Error;

/// Error type used by operations in this crate.
#[derive(Debug, Error)]
pub enum KMeansError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
    /// Declared and actual amount of vectors (or vector components) differ.
    #[error("input shape mismatch: {0}")]
    Shape(String),
    #[error("line {line}: '{token}' is not a valid real number")]
    Parse {
        line: usize,
        token: String,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error("line {line}: '{token}' is not a valid count")]
    ParseCount {
        line: usize,
        token: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenient alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, KMeansError>;
