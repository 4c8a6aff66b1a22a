//! BED3 Parsers, which yield [`GenomicRange`] entries.
//!

use csv::{StringRecord, StringRecordsIntoIter};
use std::io::Read;
use std::path::PathBuf;

use crate::{
    error::BedSimError,
    io::parsers::{
        tsv::build_tsv_reader,
        utils::{is_bed_metadata_line, parse_column},
    },
    ranges::GenomicRange,
    Position,
};

/// Parses the first three columns of a BED-like record into a [`GenomicRange`].
/// Any additional columns are ignored.
pub fn parse_bed3(record: &StringRecord) -> Result<GenomicRange, BedSimError> {
    let line = || record.iter().collect::<Vec<_>>().join("\t");
    if record.len() < 3 {
        return Err(BedSimError::BedlikeTooFewColumns(line()));
    }
    let seqname = record[0].trim().to_string();
    let start: Position = parse_column(&record[1])?;
    let end: Position = parse_column(&record[2])?;
    GenomicRange::try_new(seqname, start, end)
}

/// An iterator over BED3 entries (the first three columns of any BED-like file).
pub struct Bed3Iterator {
    iter: StringRecordsIntoIter<Box<dyn Read>>,
}

impl std::fmt::Debug for Bed3Iterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bed3Iterator").finish_non_exhaustive()
    }
}

impl Bed3Iterator {
    /// Creates a parsing iterator over a BED-like file.
    pub fn new(filepath: impl Into<PathBuf>) -> Result<Self, BedSimError> {
        let iter = build_tsv_reader(filepath)?.into_records();
        Ok(Self { iter })
    }
}

impl Iterator for Bed3Iterator {
    type Item = Result<GenomicRange, BedSimError>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.iter.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(e.into())),
            };
            if record.get(0).map_or(false, is_bed_metadata_line) {
                continue;
            }
            return Some(parse_bed3(&record));
        }
    }
}

/// Read all ranges of a BED-like file into memory, in file order.
pub fn read_bed3(filepath: impl Into<PathBuf>) -> Result<Vec<GenomicRange>, BedSimError> {
    Bed3Iterator::new(filepath)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::temp_file_with_contents;

    #[test]
    fn test_bed3_iterator_ignores_extra_columns_and_comments() {
        let file = temp_file_with_contents(
            "#track name=test\nchr1\t0\t10\tpeak1\t5\nchr2\t3\t8\n",
        );
        let ranges = read_bed3(file.path()).unwrap();
        assert_eq!(
            ranges,
            vec![
                GenomicRange::new("chr1", 0, 10),
                GenomicRange::new("chr2", 3, 8)
            ]
        );
    }

    #[test]
    fn test_bed3_iterator_skips_track_and_browser_lines() {
        let file = temp_file_with_contents(
            "browser hide all\ntrack name=peaks visibility=2\nchr1\t0\t10\n",
        );
        let ranges = read_bed3(file.path()).unwrap();
        assert_eq!(ranges, vec![GenomicRange::new("chr1", 0, 10)]);
    }

    #[test]
    fn test_bed3_too_few_columns() {
        let file = temp_file_with_contents("chr1\t0\n");
        let result = read_bed3(file.path());
        assert!(matches!(result, Err(BedSimError::BedlikeTooFewColumns(_))));
    }

    #[test]
    fn test_bed3_invalid_position() {
        let file = temp_file_with_contents("chr1\tzero\t10\n");
        let result = read_bed3(file.path());
        assert!(matches!(result, Err(BedSimError::ParseIntError(_))));
    }

    #[test]
    fn test_bed3_invalid_range() {
        let file = temp_file_with_contents("chr1\t10\t5\n");
        let result = read_bed3(file.path());
        assert!(matches!(
            result,
            Err(BedSimError::InvalidGenomicRange(10, 5))
        ));
    }
}
