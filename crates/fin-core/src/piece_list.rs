//! Dense piece storage: 4-bit piece codes packed into 64-bit blocks.

use crate::bitboard::Bitboard;
use crate::piece::Piece;

/// Maximum number of pieces a legal position can hold.
pub const MAX_PIECES: usize = 32;

/// Number of 4-bit slots per 64-bit block.
const SLOTS_PER_BLOCK: usize = 16;

/// Number of 64-bit blocks in the wire format.
const BLOCKS: usize = 4;

/// A compacted list of piece codes, one 4-bit slot per occupied square.
///
/// Slots are addressed by compacted index: the piece on square `s` of an
/// occupancy bitboard lives at slot `occupancy.count_below(s)`. Only the
/// first [`MAX_PIECES`] slots are ever populated; the wire format
/// nevertheless reserves four full blocks.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct PieceList {
    blocks: [u64; BLOCKS],
}

impl PieceList {
    /// An empty piece list (all slots zero).
    pub const EMPTY: PieceList = PieceList { blocks: [0; BLOCKS] };

    /// Return the raw 4-bit code at the given compacted index.
    #[inline]
    pub const fn get_raw(&self, index: usize) -> u8 {
        debug_assert!(index < MAX_PIECES);
        let block = index / SLOTS_PER_BLOCK;
        let shift = 4 * (index % SLOTS_PER_BLOCK);
        ((self.blocks[block] >> shift) & Bitboard::low_mask(4)) as u8
    }

    /// Return the piece at the given compacted index.
    ///
    /// Returns `None` if the slot holds an unused piece code, which only
    /// happens for slots beyond the occupancy count.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Piece> {
        Piece::from_raw(self.get_raw(index))
    }

    /// Store a piece code at the given compacted index.
    #[inline]
    pub fn set(&mut self, index: usize, piece: Piece) {
        debug_assert!(index < MAX_PIECES);
        let block = index / SLOTS_PER_BLOCK;
        let shift = 4 * (index % SLOTS_PER_BLOCK);

        self.blocks[block] &= !(Bitboard::low_mask(4) << shift);
        self.blocks[block] |= (piece.raw() as u64) << shift;
    }

    /// Return the raw blocks for serialization.
    #[inline]
    pub const fn blocks(&self) -> [u64; BLOCKS] {
        self.blocks
    }

    /// Reconstruct a piece list from raw blocks.
    #[inline]
    pub const fn from_blocks(blocks: [u64; BLOCKS]) -> PieceList {
        PieceList { blocks }
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_PIECES, PieceList};
    use crate::piece::Piece;

    #[test]
    fn empty_slots_are_zero() {
        let list = PieceList::EMPTY;
        for i in 0..MAX_PIECES {
            assert_eq!(list.get_raw(i), 0);
        }
    }

    #[test]
    fn set_get_roundtrip_all_slots() {
        for piece in Piece::ALL {
            let mut list = PieceList::EMPTY;
            for i in 0..MAX_PIECES {
                list.set(i, piece);
            }
            for i in 0..MAX_PIECES {
                assert_eq!(list.get(i), Some(piece), "slot {i} lost {piece:?}");
            }
        }
    }

    #[test]
    fn set_does_not_disturb_neighbors() {
        let mut list = PieceList::EMPTY;
        let pieces = Piece::ALL;
        for (i, piece) in pieces.iter().enumerate() {
            list.set(i, *piece);
        }
        // Overwrite a middle slot and check the rest survive.
        list.set(5, pieces[0]);
        assert_eq!(list.get(5), Some(pieces[0]));
        for (i, piece) in pieces.iter().enumerate() {
            if i != 5 {
                assert_eq!(list.get(i), Some(*piece));
            }
        }
    }

    #[test]
    fn block_boundary_slots() {
        // Slots 15 and 16 straddle the first block boundary.
        let mut list = PieceList::EMPTY;
        let a = Piece::ALL[3];
        let b = Piece::ALL[9];
        list.set(15, a);
        list.set(16, b);
        assert_eq!(list.get(15), Some(a));
        assert_eq!(list.get(16), Some(b));
        assert_eq!(list.blocks()[2], 0);
        assert_eq!(list.blocks()[3], 0);
    }

    #[test]
    fn blocks_roundtrip() {
        let mut list = PieceList::EMPTY;
        for (i, piece) in Piece::ALL.iter().enumerate() {
            list.set(i * 2, *piece);
        }
        assert_eq!(PieceList::from_blocks(list.blocks()), list);
    }
}
