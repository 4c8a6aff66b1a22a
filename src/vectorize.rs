//! Binary occupancy vectors of a BED file over a [`Segmentation`].
//!
//! Entry `i` of an [`OccupancyVector`] is 1 if any range in the BED file
//! overlaps the `i`-th segment of the segmentation, and 0 otherwise. Vectors
//! always have one entry per segment, in segmentation file order, so vectors
//! of different BED files over the same segmentation can be compared.

use std::path::Path;

use crate::{
    error::BedSimError,
    io::Segmentation,
    overlaps::{OutputKey, OverlapEngine, OverlapTable},
};

/// A {0, 1} vector with one entry per segment of a segmentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyVector {
    values: Vec<u8>,
}

impl OccupancyVector {
    /// Build a vector from values, which must all be 0 or 1.
    pub fn new(values: Vec<u8>) -> Self {
        debug_assert!(values.iter().all(|&v| v <= 1));
        Self { values }
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The number of occupied segments.
    pub fn num_occupied(&self) -> usize {
        self.values.iter().filter(|&&v| v == 1).count()
    }
}

impl From<Vec<u8>> for OccupancyVector {
    fn from(values: Vec<u8>) -> Self {
        Self::new(values)
    }
}

/// Left-join the segmentation to an overlap table keyed by segments: a segment
/// is occupied if its row has an overlap count of at least one. Segments with no
/// row are unoccupied.
pub fn occupancy_from_table(segmentation: &Segmentation, mut table: OverlapTable) -> OccupancyVector {
    table.sort();
    let values = segmentation
        .ranges()
        .iter()
        .map(|segment| u8::from(table.has_overlap(segment.key())))
        .collect();
    OccupancyVector::new(values)
}

/// Compute the [`OccupancyVector`] of the BED file at `filepath` over `segmentation`.
pub fn vectorize(
    engine: &OverlapEngine,
    filepath: impl AsRef<Path>,
    segmentation: &Segmentation,
) -> Result<OccupancyVector, BedSimError> {
    let table = engine.query(filepath.as_ref(), segmentation.path(), OutputKey::Database)?;
    table.check_row_count(segmentation.len())?;
    Ok(occupancy_from_table(segmentation, table))
}
