//! Per-sequence [`coitrees`] interval trees, used for coverage calculations.
//!
//! Note that [`coitrees`] uses `i32` coordinates with a right-inclusive
//! `last` position, whereas bedsim ranges are `u32`, 0-indexed and right-exclusive.
//! Conversion happens here, and nowhere else.

use coitrees::{BasicCOITree, GenericInterval, Interval, IntervalNode, IntervalTree};
use indexmap::IndexMap;

use crate::{error::BedSimError, traits::GenericRange, Position};

use super::GenomicRange;

fn to_coitrees_position(position: Position) -> Result<i32, BedSimError> {
    position
        .try_into()
        .map_err(|_| BedSimError::InvalidGenomicRange(position, position))
}

/// A [`coitrees::BasicCOITree`] interval tree for a single sequence's ranges.
pub struct COITrees {
    pub(crate) ranges: BasicCOITree<(), usize>,
}

impl std::fmt::Debug for COITrees {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("COITrees")
            .field("number of ranges:", &self.ranges.len())
            .finish()
    }
}

impl GenericRange for IntervalNode<(), usize> {
    // the tree only holds ranges converted from u32, so these are non-negative
    fn start(&self) -> Position {
        self.first() as Position
    }
    fn end(&self) -> Position {
        (self.last() + 1) as Position
    }
}

impl COITrees {
    /// Build the interval tree from ranges all on the same sequence.
    pub fn new<'a, R: GenericRange + 'a>(
        ranges: impl IntoIterator<Item = &'a R>,
    ) -> Result<Self, BedSimError> {
        let mut nodes = Vec::new();
        for range in ranges {
            let first = to_coitrees_position(range.start())?;
            // internally coitrees uses 0-indexed, right-inclusive "last"
            let last = to_coitrees_position(range.end())? - 1;
            nodes.push(Interval::new(first, last, ()));
        }
        let ranges = BasicCOITree::new(&nodes);
        Ok(Self { ranges })
    }

    /// Query this range container for a particular range, and call a visit function on
    /// all overlapping ranges.
    pub fn query<F>(&self, start: Position, end: Position, visit: F) -> Result<(), BedSimError>
    where
        F: FnMut(&IntervalNode<(), usize>),
    {
        let first = to_coitrees_position(start)?;
        // internally coitrees uses 0-indexed, right-inclusive "last"
        let last = to_coitrees_position(end)? - 1;
        self.ranges.query(first, last, visit);
        Ok(())
    }

    /// Return the number of ranges in this container.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Return whether the container is empty (contains no ranges).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interval trees keyed by sequence name.
#[derive(Debug, Default)]
pub struct COITreesBySequence {
    trees: IndexMap<String, COITrees>,
}

impl COITreesBySequence {
    /// Group the ranges by sequence name and build one tree per sequence.
    pub fn from_ranges(ranges: &[GenomicRange]) -> Result<Self, BedSimError> {
        let mut grouped: IndexMap<&str, Vec<&GenomicRange>> = IndexMap::new();
        for range in ranges {
            grouped.entry(range.seqname.as_str()).or_default().push(range);
        }
        let mut trees = IndexMap::with_capacity(grouped.len());
        for (seqname, seq_ranges) in grouped {
            trees.insert(seqname.to_string(), COITrees::new(seq_ranges)?);
        }
        Ok(Self { trees })
    }

    pub fn get(&self, seqname: &str) -> Option<&COITrees> {
        self.trees.get(seqname)
    }

    /// Number of basepairs of `range` covered by the union of the ranges in
    /// these trees. Overlapping ranges are merged, so no base is counted twice.
    pub fn covered_bases(&self, range: &GenomicRange) -> Result<Position, BedSimError> {
        let tree = match self.get(&range.seqname) {
            Some(tree) => tree,
            None => return Ok(0),
        };

        let mut pieces: Vec<(Position, Position)> = Vec::new();
        tree.query(range.start, range.end, |hit| {
            if let Some(piece) = range.overlap_range(hit) {
                pieces.push(piece);
            }
        })?;
        pieces.sort_unstable();

        let mut covered = 0;
        let mut current: Option<(Position, Position)> = None;
        for (start, end) in pieces {
            match current {
                Some((cur_start, cur_end)) if start <= cur_end => {
                    current = Some((cur_start, cur_end.max(end)));
                }
                Some((cur_start, cur_end)) => {
                    covered += cur_end - cur_start;
                    current = Some((start, end));
                }
                None => current = Some((start, end)),
            }
        }
        if let Some((cur_start, cur_end)) = current {
            covered += cur_end - cur_start;
        }
        Ok(covered)
    }

    /// Fraction of `range` covered by these trees, as in the last column of
    /// `bedtools coverage`.
    pub fn covered_fraction(&self, range: &GenomicRange) -> Result<f64, BedSimError> {
        let covered = self.covered_bases(range)?;
        Ok(covered as f64 / range.width() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trees() -> COITreesBySequence {
        let ranges = vec![
            GenomicRange::new("chr1", 0, 5),
            GenomicRange::new("chr1", 4, 7),
            GenomicRange::new("chr1", 10, 17),
            GenomicRange::new("chr2", 100, 200),
        ];
        COITreesBySequence::from_ranges(&ranges).unwrap()
    }

    #[test]
    fn test_query_returns_right_exclusive_coordinates() {
        let trees = trees();
        let mut found = Vec::new();
        trees
            .get("chr1")
            .unwrap()
            .query(5, 11, |hit| found.push((hit.start(), hit.end())))
            .unwrap();
        found.sort();
        assert_eq!(found, vec![(4, 7), (10, 17)]);
    }

    #[test]
    fn test_adjacent_ranges_do_not_overlap() {
        let trees = trees();
        let mut found = 0;
        trees
            .get("chr1")
            .unwrap()
            .query(7, 10, |_| found += 1)
            .unwrap();
        assert_eq!(found, 0);
    }

    #[test]
    fn test_covered_bases_merges_overlapping_ranges() {
        let trees = trees();
        // chr1:0-7 is covered by [0,5) and [4,7); the union is 7bp, not 8bp
        assert_eq!(trees.covered_bases(&GenomicRange::new("chr1", 0, 20)).unwrap(), 14);
        assert_eq!(trees.covered_bases(&GenomicRange::new("chr1", 2, 12)).unwrap(), 7);
    }

    #[test]
    fn test_covered_fraction() {
        let trees = trees();
        let fraction = trees
            .covered_fraction(&GenomicRange::new("chr2", 150, 250))
            .unwrap();
        assert_eq!(fraction, 0.5);
        let missing = trees
            .covered_fraction(&GenomicRange::new("chrX", 0, 10))
            .unwrap();
        assert_eq!(missing, 0.0);
    }
}
