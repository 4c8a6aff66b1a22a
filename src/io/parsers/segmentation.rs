//! The [`Segmentation`] type: an ordered reference partition of the genome
//! (a "universe") that occupancy vectors are aligned to.

use std::path::{Path, PathBuf};

use crate::{
    error::BedSimError,
    io::parsers::{
        tsv::build_tsv_reader,
        utils::{is_position_like, parse_column},
    },
    ranges::GenomicRange,
    Position,
};

/// The segmentation ranges, in file order.
#[derive(Clone, Debug, PartialEq)]
pub struct Segmentation {
    filepath: PathBuf,
    ranges: Vec<GenomicRange>,
}

impl Segmentation {
    /// Read a segmentation from a TSV file (plaintext or gzip-compressed).
    ///
    /// Only the first three columns are used. If the second column of the first
    /// row is not purely numeric, the first row is taken to be a header and skipped.
    pub fn from_path(filepath: impl Into<PathBuf>) -> Result<Self, BedSimError> {
        let filepath = filepath.into();
        let mut reader = build_tsv_reader(&filepath)?;

        let mut ranges = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let record = result?;
            let line = || record.iter().collect::<Vec<_>>().join("\t");
            if record.len() < 3 {
                return Err(BedSimError::SegmentationTooFewColumns(filepath.clone()));
            }
            if i == 0 && !is_position_like(&record[1]) {
                // header row of column labels
                continue;
            }
            let start: Position = parse_column(&record[1])
                .map_err(|_| BedSimError::InvalidSegmentationRow(line()))?;
            let end: Position = parse_column(&record[2])
                .map_err(|_| BedSimError::InvalidSegmentationRow(line()))?;
            ranges.push(GenomicRange::try_new(record[0].trim(), start, end)?);
        }
        Ok(Self { filepath, ranges })
    }

    /// Build a segmentation directly from ranges, e.g. for testing.
    pub fn from_ranges(filepath: impl Into<PathBuf>, ranges: Vec<GenomicRange>) -> Self {
        Self {
            filepath: filepath.into(),
            ranges,
        }
    }

    pub fn path(&self) -> &Path {
        &self.filepath
    }

    /// The segmentation ranges, in file order.
    pub fn ranges(&self) -> &[GenomicRange] {
        &self.ranges
    }

    /// The number of segments, which is the dimensionality of occupancy vectors.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::temp_file_with_contents;

    #[test]
    fn test_segmentation_without_header() {
        let file = temp_file_with_contents("chr1\t0\t10\tA\nchr1\t10\t20\tB\n");
        let seg = Segmentation::from_path(file.path()).unwrap();
        assert_eq!(seg.len(), 2);
        assert_eq!(seg.ranges()[1], GenomicRange::new("chr1", 10, 20));
    }

    #[test]
    fn test_segmentation_header_is_skipped() {
        let file = temp_file_with_contents("chrom\tstart\tend\nchr1\t0\t10\nchr2\t0\t5\n");
        let seg = Segmentation::from_path(file.path()).unwrap();
        assert_eq!(
            seg.ranges(),
            &[
                GenomicRange::new("chr1", 0, 10),
                GenomicRange::new("chr2", 0, 5)
            ]
        );
    }

    #[test]
    fn test_segmentation_keeps_file_order() {
        let file = temp_file_with_contents("chr2\t0\t5\nchr1\t10\t20\nchr1\t0\t10\n");
        let seg = Segmentation::from_path(file.path()).unwrap();
        assert_eq!(seg.ranges()[0], GenomicRange::new("chr2", 0, 5));
        assert_eq!(seg.ranges()[2], GenomicRange::new("chr1", 0, 10));
    }

    #[test]
    fn test_segmentation_too_few_columns() {
        let file = temp_file_with_contents("chr1\t0\nchr1\t10\n");
        let result = Segmentation::from_path(file.path());
        assert!(matches!(
            result,
            Err(BedSimError::SegmentationTooFewColumns(_))
        ));
    }

    #[test]
    fn test_segmentation_non_integer_row() {
        let file = temp_file_with_contents("chr1\t0\t10\nchr1\t10\tend\n");
        let result = Segmentation::from_path(file.path());
        assert!(matches!(result, Err(BedSimError::InvalidSegmentationRow(_))));
    }
}
