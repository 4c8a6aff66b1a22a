//! Genomic range records and range containers.
//!

use crate::{
    error::BedSimError,
    traits::{GenericRange, TsvSerialize},
    Position,
};

pub mod coitrees;

/// A 0-indexed, right-exclusive range on a named sequence.
///
/// The derived ordering is by sequence name, then start, then end, which is
/// the `(chrom, start, end)` sort order used throughout bedsim.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenomicRange {
    pub seqname: String,
    pub start: Position,
    pub end: Position,
}

impl GenomicRange {
    /// Create a new range, without validation.
    pub fn new(seqname: impl Into<String>, start: Position, end: Position) -> Self {
        Self {
            seqname: seqname.into(),
            start,
            end,
        }
    }

    /// Create a new range, checking that it has a positive width.
    pub fn try_new(
        seqname: impl Into<String>,
        start: Position,
        end: Position,
    ) -> Result<Self, BedSimError> {
        validate_range(start, end)?;
        Ok(Self::new(seqname, start, end))
    }

    /// The `(seqname, start, end)` key used to join ranges across tables.
    pub fn key(&self) -> (&str, Position, Position) {
        (self.seqname.as_str(), self.start, self.end)
    }
}

impl GenericRange for GenomicRange {
    fn start(&self) -> Position {
        self.start
    }
    fn end(&self) -> Position {
        self.end
    }
}

impl TsvSerialize for GenomicRange {
    fn to_tsv(&self) -> String {
        format!("{}\t{}\t{}", self.seqname, self.start, self.end)
    }
}

/// Validates that a range has `start < end`.
pub fn validate_range(start: Position, end: Position) -> Result<(), BedSimError> {
    if start >= end {
        return Err(BedSimError::InvalidGenomicRange(start, end));
    }
    Ok(())
}
