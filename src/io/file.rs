//! Input/Output file handling with [`InputFile`] and [`OutputFile`].
//!
//! These types abstract over reading/writing both plaintext and gzip-compressed
//! input/output.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;
use std::io::{self, BufWriter};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use crate::{error::BedSimError, io::parsers::utils::is_bed_metadata_line};

/// Check if a file is a gzipped by looking for the magic numbers.
///
/// Files shorter than the two magic bytes (including empty files) are plaintext.
pub fn is_gzipped_file(file_path: impl AsRef<Path>) -> io::Result<bool> {
    let file = File::open(file_path.as_ref())?;
    let mut buffer = Vec::with_capacity(2);
    file.take(2).read_to_end(&mut buffer)?;
    Ok(buffer == [0x1f, 0x8b])
}

/// Count the ranges in a BED-like file with a full scan. Empty lines, `#`
/// comment lines, and `track`/`browser` lines are not counted.
pub fn count_ranges(filepath: impl Into<PathBuf>) -> Result<usize, BedSimError> {
    let reader = InputFile::new(filepath).reader()?;
    let mut count = 0;
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() && !line.starts_with('#') && !is_bed_metadata_line(&line) {
            count += 1;
        }
    }
    Ok(count)
}

/// Represents an input file.
///
/// This abstracts how data is read in, allowing for both plaintext and gzip-compressed input
/// to be read through a common interface.
#[derive(Clone, Debug)]
pub struct InputFile {
    pub filepath: PathBuf,
}

impl InputFile {
    /// Constructs a new `InputFile`.
    ///
    /// # Arguments
    ///
    /// * `filepath` - the path to the file. If the file starts with the gzip magic
    ///   numbers, `InputFile` will automatically uncompress the input.
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            filepath: filepath.into(),
        }
    }

    /// Opens the file and returns a buffered reader.
    pub fn reader(&self) -> io::Result<BufReader<Box<dyn Read>>> {
        let file = File::open(&self.filepath)?;
        let is_gzipped = is_gzipped_file(&self.filepath)?;
        let reader: Box<dyn Read> = if is_gzipped {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Ok(BufReader::new(reader))
    }
}

/// Represents an output file.
///
/// This abstracts writing both plaintext and gzip-compressed files.
pub struct OutputFile {
    filepath: PathBuf,
}

impl OutputFile {
    /// Constructs a new `OutputFile`. If the file extension is `.gz`, the
    /// output will be gzip-compressed.
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            filepath: filepath.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.filepath
    }

    /// Creates the file and returns a buffered writer.
    pub fn writer(&self) -> io::Result<Box<dyn Write>> {
        let is_gzip = self
            .filepath
            .extension()
            .map_or(false, |ext| ext == "gz");
        let file = File::create(&self.filepath)?;
        let writer: Box<dyn Write> = if is_gzip {
            Box::new(BufWriter::new(GzEncoder::new(file, Compression::default())))
        } else {
            Box::new(BufWriter::new(file))
        };
        Ok(writer)
    }
}
