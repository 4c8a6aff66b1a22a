//! Parsing iterators and readers for range formats.
//!
//! To work with genomic data in bedsim, one first needs to read it off disk and parse it.
//! These parsers work on both plaintext and gzip-compressed files. Under the hood,
//! this uses the [`csv`] crate's record reader, with tab delimiters and `#` comments.
//!
//! There are two inputs bedsim reads:
//!
//!  1. BED-like files, of which only the BED3 columns are used, through
//!     [`Bed3Iterator`].
//!
//!  2. Segmentation ("universe") files, which are BED3-like but may carry a
//!     header row, through [`Segmentation`].

pub mod bed;
pub mod segmentation;
pub mod tsv;
pub mod utils;

pub use bed::{read_bed3, Bed3Iterator};
pub use segmentation::Segmentation;
