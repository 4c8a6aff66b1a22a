//! Test cases and test utility functions.
//!
//! These are public so the integration tests in `tests/` can share them.

use rand::{thread_rng, Rng};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::{overlaps::OverlapEngine, ranges::GenomicRange, traits::TsvSerialize, Position};

// Stochastic test ranges defaults
//
// range length
pub const MIN_LEN: Position = 1;
pub const MAX_LEN: Position = 1000;

// number of chromosome sequences
pub const NCHROM: usize = 3;

// chromosome length
pub const CHROM_LEN: Position = 100_000;

/// A stand-in for `ailist`, written in POSIX sh and awk. It is called as
/// `ailist <first> <second>` and prints, between a two-line preamble and a
/// two-line summary, one row per range in `<second>` with the number of ranges
/// in `<first>` overlapping it. Lines whose start is not a number (comments,
/// header rows) are skipped in both files.
pub const FAKE_AILIST: &str = r#"awk -F'\t' '
BEGIN {
    while ((getline line < ARGV[1]) > 0) {
        if (line ~ /^#/) continue
        nf = split(line, f, "\t")
        if (nf < 3 || f[2] !~ /^[0-9]+$/) continue
        n++; chrom[n] = f[1]; start[n] = f[2] + 0; end[n] = f[3] + 0
    }
    close(ARGV[1])
    ARGV[1] = ""
    print "AIList overlap counts"
    print "query\tcount"
}
/^#/ || NF < 3 || $2 !~ /^[0-9]+$/ { next }
{
    k = 0
    for (i = 1; i <= n; i++)
        if (chrom[i] == $1 && start[i] < $3 + 0 && $2 + 0 < end[i]) k++
    printf "%s:\t%s\t%s\t%d\n", $1, $2, $3, k
    total += k
}
END {
    print "Total overlaps: " (total + 0)
    print "done"
}
' "$1" "$2"
"#;

/// Create a temporary file with some contents.
pub fn temp_file_with_contents(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("could not create temporary file");
    file.write_all(contents.as_bytes())
        .expect("could not write temporary file");
    file.flush().expect("could not flush temporary file");
    file
}

/// Write ranges as a BED3 file.
pub fn write_bedfile(path: impl AsRef<Path>, ranges: &[GenomicRange]) {
    let mut file = File::create(path.as_ref()).expect("could not create BED file");
    for range in ranges {
        writeln!(file, "{}", range.to_tsv()).expect("could not write BED file");
    }
}

/// Write an executable shell script `name` into `dir`, returning its path.
pub fn write_script(dir: impl AsRef<Path>, name: &str, body: &str) -> PathBuf {
    let path = dir.as_ref().join(name);
    {
        let mut file = File::create(&path).expect("could not create script");
        write!(file, "#!/bin/sh\n{}", body).expect("could not write script");
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("could not make script executable");
    }
    path
}

/// Write the fake `ailist` into `dir` (as `dir/ailist`) and return an engine running it.
pub fn fake_engine(dir: impl AsRef<Path>) -> OverlapEngine {
    OverlapEngine::new(write_script(dir, "ailist", FAKE_AILIST))
}

/// Build a random range start/end on a sequence of `chrom_len`.
/// 0-indexed, right exclusive
pub fn random_range(chrom_len: Position) -> (Position, Position) {
    let mut rng = thread_rng();
    let len = rng.gen_range(MIN_LEN..MAX_LEN);
    let start = rng.gen_range(0..chrom_len - len + 1);
    (start, start + len)
}

/// Sample a random chromosome
pub fn random_chrom() -> String {
    let mut rng = thread_rng();
    format!("chr{}", rng.gen_range(1..NCHROM + 1))
}

/// Build `n` random ranges over [`NCHROM`] chromosomes.
pub fn random_ranges(n: usize) -> Vec<GenomicRange> {
    (0..n)
        .map(|_| {
            let (start, end) = random_range(CHROM_LEN);
            GenomicRange::new(random_chrom(), start, end)
        })
        .collect()
}

/// A tiling of each of the [`NCHROM`] chromosomes into `width`-sized segments.
pub fn tiled_segmentation(width: Position) -> Vec<GenomicRange> {
    let mut ranges = Vec::new();
    for chrom in 1..=NCHROM {
        let mut start = 0;
        while start < CHROM_LEN {
            let end = (start + width).min(CHROM_LEN);
            ranges.push(GenomicRange::new(format!("chr{}", chrom), start, end));
            start = end;
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ranges_are_valid() {
        for range in random_ranges(1000) {
            assert!(range.start < range.end);
            assert!(range.end <= CHROM_LEN);
        }
    }

    #[test]
    fn test_tiled_segmentation_covers_chromosomes() {
        let tiles = tiled_segmentation(30_000);
        // 4 tiles per chromosome, the last one shorter
        assert_eq!(tiles.len(), 4 * NCHROM);
        assert_eq!(tiles[3], GenomicRange::new("chr1", 90_000, 100_000));
    }
}
