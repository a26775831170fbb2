//! Bitboard representation — a 64-bit integer where each bit maps to a square.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use crate::square::Square;

/// A 64-bit board where each bit represents a square (LERF mapping).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(u64);

impl Bitboard {
    /// Empty bitboard (no squares set).
    pub const EMPTY: Bitboard = Bitboard(0);

    /// Full bitboard (all 64 squares set).
    pub const FULL: Bitboard = Bitboard(!0);

    /// Create a bitboard from a raw `u64`.
    #[inline]
    pub const fn new(bits: u64) -> Bitboard {
        Bitboard(bits)
    }

    /// Return the underlying `u64`.
    #[inline]
    pub const fn inner(self) -> u64 {
        self.0
    }

    /// Return `true` if no bits are set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Count the number of set bits.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Return `true` if the given square's bit is set.
    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        (self.0 & (1u64 << sq.index())) != 0
    }

    /// Return a new bitboard with the given square set.
    #[inline]
    pub const fn with(self, sq: Square) -> Bitboard {
        Bitboard(self.0 | (1u64 << sq.index()))
    }

    /// Return a new bitboard with the given square cleared.
    #[inline]
    pub const fn without(self, sq: Square) -> Bitboard {
        Bitboard(self.0 & !(1u64 << sq.index()))
    }

    /// Return the mask of all squares strictly below the given square.
    #[inline]
    pub const fn below(sq: Square) -> Bitboard {
        Bitboard((1u64 << sq.index()) - 1)
    }

    /// Count the set bits strictly below the given square.
    ///
    /// This is the compacted-index formula: for an occupancy bitboard, the
    /// result is the dense piece-list slot of the piece on `sq`.
    #[inline]
    pub const fn count_below(self, sq: Square) -> u32 {
        (self.0 & Self::below(sq).0).count_ones()
    }

    /// Return a mask of the low `n` bits of a `u64` (`n` must be < 64).
    #[inline]
    pub const fn low_mask(n: u32) -> u64 {
        (1u64 << n) - 1
    }
}

// --- Operator impls ---

impl BitAnd for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Bitboard) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Bitboard) {
        self.0 |= rhs.0;
    }
}

impl BitXor for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitxor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Bitboard) {
        self.0 ^= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

// --- Iterator ---

impl Iterator for Bitboard {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            let sq = Square::from_index_unchecked(self.0.trailing_zeros() as u8);
            self.0 &= self.0 - 1;
            Some(sq)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.count() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for Bitboard {}

// --- Debug (8x8 grid) ---

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for rank in (0..8).rev() {
            write!(f, "  {} ", rank + 1)?;
            for file in 0..8 {
                let sq_index = rank * 8 + file;
                if (self.0 >> sq_index) & 1 == 1 {
                    write!(f, "1 ")?;
                } else {
                    write!(f, ". ")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "    a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::Bitboard;
    use crate::square::Square;

    #[test]
    fn empty_and_full() {
        assert!(Bitboard::EMPTY.is_empty());
        assert!(!Bitboard::FULL.is_empty());
        assert_eq!(!Bitboard::EMPTY, Bitboard::FULL);
        assert_eq!(!Bitboard::FULL, Bitboard::EMPTY);
    }

    #[test]
    fn set_contains_clear() {
        let bb = Bitboard::EMPTY.with(Square::E4);
        assert!(bb.contains(Square::E4));
        assert!(!bb.contains(Square::D4));
        assert_eq!(bb.count(), 1);

        let bb2 = bb.without(Square::E4);
        assert!(!bb2.contains(Square::E4));
        assert!(bb2.is_empty());
    }

    #[test]
    fn count() {
        assert_eq!(Bitboard::EMPTY.count(), 0);
        assert_eq!(Bitboard::FULL.count(), 64);
        assert_eq!(Bitboard::new(0xFF).count(), 8);
    }

    #[test]
    fn below_masks() {
        assert_eq!(Bitboard::below(Square::A1), Bitboard::EMPTY);
        assert_eq!(Bitboard::below(Square::B1).count(), 1);
        assert_eq!(Bitboard::below(Square::H8).count(), 63);
    }

    #[test]
    fn count_below_is_prefix_popcount() {
        let bb = Bitboard::EMPTY
            .with(Square::A1)
            .with(Square::E4)
            .with(Square::H8);
        assert_eq!(bb.count_below(Square::A1), 0);
        assert_eq!(bb.count_below(Square::E4), 1);
        assert_eq!(bb.count_below(Square::H8), 2);
    }

    #[test]
    fn count_below_full_board() {
        for sq in Square::all() {
            assert_eq!(Bitboard::FULL.count_below(sq), sq.index() as u32);
        }
    }

    #[test]
    fn low_mask() {
        assert_eq!(Bitboard::low_mask(0), 0);
        assert_eq!(Bitboard::low_mask(4), 0xF);
        assert_eq!(Bitboard::low_mask(8), 0xFF);
    }

    #[test]
    fn iterator_order_and_count() {
        let bb = Bitboard::EMPTY
            .with(Square::A1)
            .with(Square::E4)
            .with(Square::H8);
        let squares: Vec<_> = bb.collect();
        assert_eq!(squares, vec![Square::A1, Square::E4, Square::H8]);
    }

    #[test]
    fn exact_size_iterator() {
        assert_eq!(Bitboard::new(0xFF).len(), 8);
    }

    #[test]
    fn assign_operators() {
        let mut bb = Bitboard::new(0xFF);
        bb |= Bitboard::new(0xFF00);
        assert_eq!(bb.count(), 16);

        bb &= Bitboard::new(0x0101_0101_0101_0101);
        assert_eq!(bb.count(), 2);

        bb ^= Bitboard::EMPTY.with(Square::A1);
        assert_eq!(bb.count(), 1);
    }

    #[test]
    fn default_is_empty() {
        assert_eq!(Bitboard::default(), Bitboard::EMPTY);
    }
}
