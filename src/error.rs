use std::io;
use thiserror::Error;

/// Errors produced while reading or reshaping sampler output.
///
/// Every variant is fatal to the read that raised it; no partially
/// populated extract is ever returned alongside one of these.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The caller handed us something unusable before any I/O happened.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Underlying file I/O failed.
    #[error("failed to read output file: {0}")]
    Io(#[from] io::Error),

    /// A comment line contained `=` but did not split into one key and one value.
    #[error("malformed metadata line: {line:?}")]
    MalformedMetadataLine { line: String },

    /// A required attribute was absent from the comment preamble.
    #[error("attribute {key:?} not found in comment preamble")]
    MissingAttribute { key: String },

    /// An attribute was present but its value is not an integer.
    #[error("attribute {key:?} has non-integer value {value:?}")]
    InvalidAttribute { key: String, value: String },

    /// A data row did not have one value per header column.
    #[error("row {row} has {got} values, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        got: usize,
    },

    /// A data cell could not be parsed as a number.
    #[error("unparsable value {value:?} in row {row}")]
    InvalidNumber { row: usize, value: String },

    /// A parameter's columns carry more than two indices, or disagree on
    /// how many they carry.
    #[error("parameter {name:?} uses {rank} indices; at most 2 consistent indices are supported")]
    Dimension { name: String, rank: usize },

    /// A header column could not be assigned to any base parameter.
    #[error("column {column:?} does not belong to any parameter")]
    UnknownBase { column: String },

    /// The files yielded a different number of draws than the preamble promised.
    #[error("expected {expected} draws but found {got}")]
    DrawCountMismatch { expected: usize, got: usize },
}
