//! Types and methods for reading and parsing input and writing output.

pub mod file;
pub mod parsers;

pub use file::{count_ranges, InputFile, OutputFile};
pub use parsers::{read_bed3, Bed3Iterator, Segmentation};
