//! In-memory pairing of a header with a sequence of position records.

use fin_core::Position;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::header::Header;

/// A transient working set of records, e.g. one shuffle bucket's contents.
///
/// Never the sole representation of a full corpus — corpora may not fit
/// in memory.
#[derive(Clone, Debug, Default)]
pub struct DataSet {
    /// The header the records were read with (or will be written with).
    pub header: Header,
    /// The records themselves.
    pub positions: Vec<Position>,
}

impl DataSet {
    /// Create an empty data set under the given header.
    pub fn new(header: Header) -> DataSet {
        DataSet {
            header,
            positions: Vec::new(),
        }
    }

    /// Number of records held in memory.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Return `true` if no records are held.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Permute the records uniformly at random (Fisher-Yates).
    ///
    /// Every ordering of a k-record set is equally likely. The generator
    /// is passed in rather than created here so callers control seeding.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.positions.shuffle(rng);
    }
}
