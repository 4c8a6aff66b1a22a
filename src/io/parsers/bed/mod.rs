//! BED Types and Functionality
//!
//! The BED (Browser Extensible Format) is a TSV format in bioinformatics.
//! It has a fairly strict [specification](https://samtools.github.io/hts-specs/BEDv1.pdf),
//! but in practice it is quite permissive, and in bioinformatics one encounters lots
//! of "BED-like" files. bedsim only ever needs the first three columns, so any
//! BED-like file is read as BED3.

pub mod bed3;

pub use bed3::{parse_bed3, read_bed3, Bed3Iterator};
