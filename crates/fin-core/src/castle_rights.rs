//! Castling rights stored as a 4-bit field within a `u8`.
//!
//! The bit order (`color * 2 + side`) is the same order the packed
//! position meta byte stores on disk.

use std::fmt;

use crate::color::Color;
use crate::error::ParseError;

/// Which side of the board to castle toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CastleSide {
    KingSide = 0,
    QueenSide = 1,
}

impl CastleSide {
    /// Both castle sides in index order.
    pub const ALL: [CastleSide; 2] = [CastleSide::KingSide, CastleSide::QueenSide];

    /// Return the index (0 for king side, 1 for queen side).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Castling rights encoded as a 4-bit field: bit 0 = WK, 1 = WQ, 2 = BK, 3 = BQ.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastleRights(u8);

impl CastleRights {
    /// No castling rights.
    pub const NONE: CastleRights = CastleRights(0);
    /// All castling rights.
    pub const ALL: CastleRights = CastleRights(0b1111);

    /// White king-side castling.
    pub const WHITE_KING: CastleRights = CastleRights(0b0001);
    /// White queen-side castling.
    pub const WHITE_QUEEN: CastleRights = CastleRights(0b0010);
    /// Black king-side castling.
    pub const BLACK_KING: CastleRights = CastleRights(0b0100);
    /// Black queen-side castling.
    pub const BLACK_QUEEN: CastleRights = CastleRights(0b1000);

    /// Create castling rights from a raw `u8`, masking to the lower 4 bits.
    #[inline]
    pub const fn new(bits: u8) -> CastleRights {
        CastleRights(bits & 0b1111)
    }

    /// Return the raw bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Return `true` if no castling rights remain.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check whether a specific color and side can castle.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        (self.0 >> Self::bit(color, side)) & 1 != 0
    }

    /// Return new rights with the given color/side flag set or cleared.
    #[inline]
    pub const fn set(self, color: Color, side: CastleSide, value: bool) -> CastleRights {
        let bit = Self::bit(color, side);
        if value {
            CastleRights(self.0 | (1 << bit))
        } else {
            CastleRights(self.0 & !(1 << bit))
        }
    }

    /// Return the bit index for a color and side (`color * 2 + side`).
    #[inline]
    const fn bit(color: Color, side: CastleSide) -> u8 {
        (color as u8) * 2 + (side as u8)
    }

    /// Parse castling rights from the FEN castling field (e.g. "KQkq", "Kq", "-").
    pub fn from_fen(s: &str) -> Result<CastleRights, ParseError> {
        if s == "-" {
            return Ok(CastleRights::NONE);
        }

        let mut rights = CastleRights::NONE;
        for c in s.chars() {
            rights = match c {
                'K' => CastleRights(rights.0 | Self::WHITE_KING.0),
                'Q' => CastleRights(rights.0 | Self::WHITE_QUEEN.0),
                'k' => CastleRights(rights.0 | Self::BLACK_KING.0),
                'q' => CastleRights(rights.0 | Self::BLACK_QUEEN.0),
                _ => return Err(ParseError::InvalidCastlingChar { character: c }),
            };
        }
        Ok(rights)
    }
}

impl fmt::Display for CastleRights {
    /// Format as the FEN castling field.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for (flag, c) in [
            (Self::WHITE_KING, 'K'),
            (Self::WHITE_QUEEN, 'Q'),
            (Self::BLACK_KING, 'k'),
            (Self::BLACK_QUEEN, 'q'),
        ] {
            if self.0 & flag.0 != 0 {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastleRights({})", self)
    }
}
