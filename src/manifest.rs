//! The project manifest: a PEP-style sample table listing each sample's
//! original BED file and segmentation ("universe") file.
//!
//! The manifest is a comma-separated table with a header row, e.g.
//!
//! ```text
//! sample_name,base_path,file,universe
//! k562,data,k562_peaks.bed,universes/tiles_1kb.bed
//! ```
//!
//! The `sample_name`, `file`, and `universe` columns are required; `base_path`
//! is optional. Other columns are ignored. Relative paths are resolved against
//! the directory containing the manifest.

use csv::{ReaderBuilder, Trim};
use indexmap::IndexSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::BedSimError;

const REQUIRED_COLUMNS: [&str; 3] = ["sample_name", "file", "universe"];

#[derive(Debug, Deserialize)]
struct SampleRecord {
    sample_name: String,
    base_path: Option<String>,
    file: String,
    universe: String,
}

/// A sample: an original BED file, and the segmentation its replicates are
/// compared over.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub name: String,
    pub original_file: PathBuf,
    pub segmentation_file: PathBuf,
}

impl Sample {
    pub fn new(
        name: impl Into<String>,
        original_file: impl Into<PathBuf>,
        segmentation_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            original_file: original_file.into(),
            segmentation_file: segmentation_file.into(),
        }
    }

    /// The glob pattern of this sample's replicate files,
    /// `<input_dir>/<name>/<name>_rep*.bed`.
    pub fn replicate_pattern(&self, input_dir: impl AsRef<Path>) -> String {
        let escaped_dir = glob::Pattern::escape(&input_dir.as_ref().to_string_lossy());
        let escaped_name = glob::Pattern::escape(&self.name);
        format!(
            "{}/{}/{}_rep*.bed",
            escaped_dir.trim_end_matches('/'),
            escaped_name,
            escaped_name
        )
    }

    /// Find this sample's replicate files, sorted lexicographically.
    pub fn replicate_files(&self, input_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, BedSimError> {
        let pattern = self.replicate_pattern(input_dir);
        let mut files = glob::glob(&pattern)?.collect::<Result<Vec<_>, _>>()?;
        files.sort();
        Ok(files)
    }
}

fn resolve(dir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}

/// Read the samples of a project manifest, in manifest order.
pub fn read_manifest(filepath: impl AsRef<Path>) -> Result<Vec<Sample>, BedSimError> {
    let filepath = filepath.as_ref();
    let manifest_dir = filepath
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut reader = ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(Trim::All)
        .from_path(filepath)?;

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(BedSimError::InvalidManifest(format!(
                "missing required column '{}' in '{}'",
                column,
                filepath.display()
            )));
        }
    }

    let mut seen = IndexSet::new();
    let mut samples = Vec::new();
    for result in reader.deserialize() {
        let record: SampleRecord = result?;
        if record.sample_name.is_empty() {
            return Err(BedSimError::InvalidManifest(
                "a sample has an empty sample_name".to_string(),
            ));
        }
        if !seen.insert(record.sample_name.clone()) {
            return Err(BedSimError::DuplicateSample(record.sample_name));
        }

        let base_path = match record.base_path.as_deref() {
            Some(base_path) if !base_path.is_empty() => resolve(manifest_dir, base_path),
            _ => manifest_dir.to_path_buf(),
        };
        samples.push(Sample::new(
            record.sample_name,
            base_path.join(&record.file),
            resolve(manifest_dir, &record.universe),
        ));
    }
    Ok(samples)
}
