//! The [`BedSimError`] `enum` definition and error messages.
//!
use crate::Position;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// The [`BedSimError`] defines the standard set of errors that should
/// be passed to the user.
#[derive(Debug, Error)]
pub enum BedSimError {
    // IO related errors
    #[error("File reading error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Delimited file error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Invalid replicate file pattern: {0}")]
    GlobPatternError(#[from] glob::PatternError),
    #[error("Could not read replicate file while globbing: {0}")]
    GlobError(#[from] glob::GlobError),

    // Startup errors
    #[error("Command '{0}' not callable. Install {0} to continue.")]
    EngineNotCallable(String),

    // Overlap engine process errors
    #[error("Could not run overlap engine '{0}': {1}")]
    EngineSpawn(String, std::io::Error),
    #[error("Overlap engine '{program}' exited with {status}: {stderr}")]
    EngineFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("Overlap engine '{0}' did not finish within {1:?}")]
    EngineTimeout(String, Duration),
    #[error("Overlap engine output has unexpected framing: {0}")]
    EngineOutputFraming(String),
    #[error("Overlap engine output row has too few columns (need at least 4).\nLine: {0}")]
    EngineOutputTooFewColumns(String),
    #[error("Overlap engine output could not be parsed ({0}).\nLine: {1}")]
    EngineOutputParse(ParseIntError, String),
    #[error("Overlap engine returned {found} rows, but the keyed file only has {expected} ranges")]
    EngineRowCountMismatch { expected: usize, found: usize },

    // File format errors
    #[error("Integer parsing error: {0}")]
    ParseIntError(#[from] ParseIntError),
    #[error("Bed-like file has too few columns. The first three columns must be sequence name, and start and end positions.\nLine: {0}")]
    BedlikeTooFewColumns(String),
    #[error("Segmentation file '{0}' has too few columns. The first three columns must be sequence name, and start and end positions.")]
    SegmentationTooFewColumns(PathBuf),
    #[error("Segmentation file has an invalid row (start and end must be integers).\nLine: {0}")]
    InvalidSegmentationRow(String),
    #[error("Range invalid: start ({0}) must be less than end ({1})")]
    InvalidGenomicRange(Position, Position),
    #[error("File '{0}' has no ranges")]
    EmptyRangesFile(PathBuf),
    #[error("Project manifest is invalid: {0}")]
    InvalidManifest(String),
    #[error("Sample '{0}' appears more than once in the project manifest")]
    DuplicateSample(String),
    #[error("Sample '{0}' is not in the project manifest")]
    UnknownSample(String),

    // Metric errors
    #[error("Vector dimensions do not match ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },
    #[error("Vector of length {vector} was compared over a segmentation of length {segmentation}")]
    SegmentationLengthMismatch { vector: usize, segmentation: usize },
    #[error("Division by zero: {0}")]
    DivisionByZero(String),
}
