//! Error handling for libscaffolder.
use std::fmt;

/// A custom error type to represent various errors in libscaffolder.
#[derive(Debug)]
pub enum ScaffoldError {
    /// An IO error occurred.
    IoError(std::io::Error),

    /// A PAF record could not be parsed.
    PafParseError(String),

    /// A FASTA/FASTQ record could not be parsed.
    SeqParseError(String),

    /// A path referenced a node that has no corresponding sequence record.
    MissingSequence(String),

    /// Invalid platform or parameter string.
    InvalidParameter(String),
}

impl fmt::Display for ScaffoldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaffoldError::IoError(err) => write!(f, "IO error: {}", err),
            ScaffoldError::PafParseError(msg) => write!(f, "PAF parse error: {}", msg),
            ScaffoldError::SeqParseError(msg) => write!(f, "FASTA/FASTQ parse error: {}", msg),
            ScaffoldError::MissingSequence(msg) => write!(f, "missing sequence: {}", msg),
            ScaffoldError::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
        }
    }
}

impl std::error::Error for ScaffoldError {}

/// Converts a `std::io::Error` into a [`ScaffoldError`].
impl From<std::io::Error> for ScaffoldError {
    fn from(error: std::io::Error) -> Self {
        ScaffoldError::IoError(error)
    }
}

/// Converts a `csv::Error` into a [`ScaffoldError`].
impl From<csv::Error> for ScaffoldError {
    fn from(error: csv::Error) -> Self {
        ScaffoldError::PafParseError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;
