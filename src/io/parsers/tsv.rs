//! Essential TSV parsing functionality, which wraps the [`csv`] crate's
//! record reader.

use csv::{Reader, ReaderBuilder};
use std::io::Read;
use std::path::PathBuf;

use crate::error::BedSimError;
use crate::io::file::InputFile;

/// Build a TSV reader which ignores comment lines, works on gzip-compressed
/// files, and allows rows with differing numbers of columns.
///
/// Headers are not interpreted here; callers that need to detect a header row
/// do so from the first record.
pub fn build_tsv_reader(
    filepath: impl Into<PathBuf>,
) -> Result<Reader<Box<dyn Read>>, BedSimError> {
    let stream: Box<dyn Read> = Box::new(InputFile::new(filepath).reader()?);
    let reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(stream);
    Ok(reader)
}
