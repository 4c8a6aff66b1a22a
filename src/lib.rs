pub mod commands;
pub mod error;
pub mod io;
pub mod manifest;
pub mod metrics;
pub mod overlaps;
pub mod ranges;
pub mod reporting;
pub mod test_utilities;
pub mod traits;
pub mod vectorize;

pub type Position = u32;

pub mod prelude {
    pub use crate::commands::{bedsim_score, ScoreAccumulators};
    pub use crate::error::BedSimError;
    pub use crate::io::{count_ranges, Bed3Iterator, Segmentation};
    pub use crate::manifest::{read_manifest, Sample};
    pub use crate::metrics::{coverage, cosine_similarity, euclidean_similarity, jaccard};
    pub use crate::overlaps::{OverlapEngine, OverlapRow, OverlapTable, OutputKey};
    pub use crate::ranges::GenomicRange;
    pub use crate::vectorize::{vectorize, OccupancyVector};
}
