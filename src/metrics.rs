//! Similarity scores between two BED files.
//!
//! - [`jaccard()`]: overlapping ranges over the union of ranges, through the overlap engine.
//! - [`coverage()`]: mean fraction of each range covered by the other file, in both directions.
//! - [`euclidean_similarity()`]: one minus the normalized L2 distance of occupancy vectors.
//! - [`cosine_similarity()`]: cosine similarity of occupancy vectors.
//!
//! All scores are 1.0 for identical inputs.

use log::debug;
use std::cmp::Ordering;
use std::path::Path;

use crate::{
    error::BedSimError,
    io::{count_ranges, read_bed3},
    overlaps::{OutputKey, OverlapEngine},
    ranges::{coitrees::COITreesBySequence, GenomicRange},
    vectorize::OccupancyVector,
};

/// The Jaccard index of two BED files: the number of ranges with an overlap,
/// divided by the total number of ranges less those overlapping.
///
/// The overlap engine is run with the larger file as the indexed database,
/// so the rows counted are those of the smaller file. When both files have
/// the same number of ranges, the engine is run both ways and the larger
/// overlap count is used, so the index does not depend on argument order.
///
/// Two empty files have no defined Jaccard index, and fail with
/// [`BedSimError::DivisionByZero`].
pub fn jaccard(
    engine: &OverlapEngine,
    f1: impl AsRef<Path>,
    f2: impl AsRef<Path>,
) -> Result<f64, BedSimError> {
    let (f1, f2) = (f1.as_ref(), f2.as_ref());
    let num_ranges_f1 = count_ranges(f1)?;
    let num_ranges_f2 = count_ranges(f2)?;

    if num_ranges_f1 + num_ranges_f2 == 0 {
        return Err(BedSimError::DivisionByZero(format!(
            "Jaccard index of two empty files, '{}' and '{}'",
            f1.display(),
            f2.display()
        )));
    }
    if num_ranges_f1.min(num_ranges_f2) == 0 {
        return Ok(0.0);
    }

    let overlaps = match num_ranges_f1.cmp(&num_ranges_f2) {
        Ordering::Greater => overlapping_ranges(engine, f1, f2, num_ranges_f2)?,
        Ordering::Less => overlapping_ranges(engine, f2, f1, num_ranges_f1)?,
        Ordering::Equal => {
            let keyed_by_f2 = overlapping_ranges(engine, f1, f2, num_ranges_f2)?;
            let keyed_by_f1 = overlapping_ranges(engine, f2, f1, num_ranges_f1)?;
            keyed_by_f1.max(keyed_by_f2)
        }
    };
    debug!(
        "jaccard: {} overlapping ranges ({} and {} ranges)",
        overlaps, num_ranges_f1, num_ranges_f2
    );
    Ok(overlaps as f64 / (num_ranges_f1 + num_ranges_f2 - overlaps) as f64)
}

/// The number of ranges in `keyed` overlapping any range in `database`.
fn overlapping_ranges(
    engine: &OverlapEngine,
    database: &Path,
    keyed: &Path,
    num_keyed: usize,
) -> Result<usize, BedSimError> {
    let table = engine.query(database, keyed, OutputKey::Database)?;
    table.check_row_count(num_keyed)?;
    Ok(table.num_overlapping())
}

/// The mean over `ranges` of the fraction of each range covered by `trees`.
fn mean_covered_fraction(
    ranges: &[GenomicRange],
    trees: &COITreesBySequence,
) -> Result<f64, BedSimError> {
    let mut total = 0.0;
    for range in ranges {
        total += trees.covered_fraction(range)?;
    }
    Ok(total / ranges.len() as f64)
}

/// The coverage score of two BED files: the mean fraction of each range in
/// `f1` covered by `f2`, averaged with the same quantity for `f2` over `f1`.
///
/// This is symmetric by construction. An empty file fails with
/// [`BedSimError::EmptyRangesFile`], since the mean is undefined.
pub fn coverage(f1: impl AsRef<Path>, f2: impl AsRef<Path>) -> Result<f64, BedSimError> {
    let (f1, f2) = (f1.as_ref(), f2.as_ref());
    let ranges_f1 = read_bed3(f1)?;
    let ranges_f2 = read_bed3(f2)?;
    if ranges_f1.is_empty() {
        return Err(BedSimError::EmptyRangesFile(f1.to_path_buf()));
    }
    if ranges_f2.is_empty() {
        return Err(BedSimError::EmptyRangesFile(f2.to_path_buf()));
    }

    let trees_f1 = COITreesBySequence::from_ranges(&ranges_f1)?;
    let trees_f2 = COITreesBySequence::from_ranges(&ranges_f2)?;

    let f1_over_f2 = mean_covered_fraction(&ranges_f1, &trees_f2)?;
    let f2_over_f1 = mean_covered_fraction(&ranges_f2, &trees_f1)?;
    Ok((f1_over_f2 + f2_over_f1) / 2.0)
}

fn check_dimensions(v1: &OccupancyVector, v2: &OccupancyVector) -> Result<(), BedSimError> {
    if v1.len() != v2.len() {
        return Err(BedSimError::DimensionMismatch {
            left: v1.len(),
            right: v2.len(),
        });
    }
    Ok(())
}

/// One minus the L2 distance of two occupancy vectors, normalized by
/// `sqrt(segmentation_len)`, the largest possible distance between two {0, 1}
/// vectors of that length.
pub fn euclidean_similarity(
    v1: &OccupancyVector,
    v2: &OccupancyVector,
    segmentation_len: usize,
) -> Result<f64, BedSimError> {
    check_dimensions(v1, v2)?;
    if v1.len() != segmentation_len {
        return Err(BedSimError::SegmentationLengthMismatch {
            vector: v1.len(),
            segmentation: segmentation_len,
        });
    }
    if segmentation_len == 0 {
        return Err(BedSimError::DivisionByZero(
            "Euclidean similarity over an empty segmentation".to_string(),
        ));
    }

    let squared_distance: u64 = v1
        .values()
        .iter()
        .zip(v2.values())
        .map(|(&a, &b)| {
            let diff = a.abs_diff(b) as u64;
            diff * diff
        })
        .sum();
    let distance = (squared_distance as f64).sqrt();
    Ok(1.0 - distance / (segmentation_len as f64).sqrt())
}

/// The cosine similarity of two occupancy vectors.
///
/// If both vectors are all-zero they are identical, and the similarity is 1.0.
/// If only one is all-zero the similarity is 0.0.
pub fn cosine_similarity(v1: &OccupancyVector, v2: &OccupancyVector) -> Result<f64, BedSimError> {
    check_dimensions(v1, v2)?;

    let (dot, norm1, norm2) = v1.values().iter().zip(v2.values()).fold(
        (0u64, 0u64, 0u64),
        |(dot, norm1, norm2), (&a, &b)| {
            let (a, b) = (a as u64, b as u64);
            (dot + a * b, norm1 + a * a, norm2 + b * b)
        },
    );

    match (norm1, norm2) {
        (0, 0) => Ok(1.0),
        (0, _) | (_, 0) => Ok(0.0),
        // sqrt(norm1 * norm2) rather than sqrt(norm1) * sqrt(norm2) keeps
        // cosine_similarity(v, v) exactly 1.0
        _ => Ok(dot as f64 / ((norm1 * norm2) as f64).sqrt()),
    }
}
