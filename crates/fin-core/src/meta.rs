//! Packed per-position metadata: side to move, castling, en passant, clocks.

use crate::castle_rights::{CastleRights, CastleSide};
use crate::color::Color;
use crate::error::EncodingError;
use crate::square::Square;

/// Sentinel en-passant byte meaning "no en-passant square".
pub const EP_NONE: u8 = 64;

/// Bit of the flags byte holding the active player.
const ACTIVE_PLAYER_BIT: u8 = 7;

/// Four bytes of position metadata.
///
/// `flags` packs the active player into bit 7 and the four castling
/// rights into bits 0-3 (`color * 2 + side`). The en-passant byte is a
/// square index 0-63 or [`EP_NONE`]. The clock bytes are stored as-is.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PositionMeta {
    flags: u8,
    en_passant: u8,
    halfmove_clock: u8,
    fullmove: u8,
}

impl Default for PositionMeta {
    fn default() -> PositionMeta {
        PositionMeta {
            flags: 0,
            en_passant: EP_NONE,
            halfmove_clock: 0,
            fullmove: 1,
        }
    }
}

impl PositionMeta {
    /// Build metadata from unpacked fields.
    pub fn new(
        active_player: Color,
        castling: CastleRights,
        en_passant: Option<Square>,
        halfmove_clock: u8,
        fullmove: u8,
    ) -> PositionMeta {
        let mut meta = PositionMeta {
            flags: castling.bits(),
            en_passant: en_passant.map_or(EP_NONE, |sq| sq.index() as u8),
            halfmove_clock,
            fullmove,
        };
        meta.set_active_player(active_player);
        meta
    }

    /// Return the side to move.
    #[inline]
    pub const fn active_player(&self) -> Color {
        if (self.flags >> ACTIVE_PLAYER_BIT) & 1 != 0 {
            Color::Black
        } else {
            Color::White
        }
    }

    /// Set the side to move.
    #[inline]
    pub fn set_active_player(&mut self, color: Color) {
        match color {
            Color::White => self.flags &= !(1 << ACTIVE_PLAYER_BIT),
            Color::Black => self.flags |= 1 << ACTIVE_PLAYER_BIT,
        }
    }

    /// Return the full castling rights field.
    #[inline]
    pub const fn castling(&self) -> CastleRights {
        CastleRights::new(self.flags)
    }

    /// Check a single castling right.
    #[inline]
    pub const fn castling_right(&self, color: Color, side: CastleSide) -> bool {
        self.castling().has(color, side)
    }

    /// Set a single castling right.
    #[inline]
    pub fn set_castling_right(&mut self, color: Color, side: CastleSide, value: bool) {
        let rights = self.castling().set(color, side, value);
        self.flags = (self.flags & !0b1111) | rights.bits();
    }

    /// Return the en-passant target square, if any.
    #[inline]
    pub const fn en_passant(&self) -> Option<Square> {
        Square::from_index(self.en_passant)
    }

    /// Set the en-passant target square.
    #[inline]
    pub fn set_en_passant(&mut self, square: Option<Square>) {
        self.en_passant = square.map_or(EP_NONE, |sq| sq.index() as u8);
    }

    /// Return the halfmove clock (moves since last capture or pawn move).
    #[inline]
    pub const fn halfmove_clock(&self) -> u8 {
        self.halfmove_clock
    }

    /// Set the halfmove clock.
    #[inline]
    pub fn set_halfmove_clock(&mut self, value: u8) {
        self.halfmove_clock = value;
    }

    /// Return the fullmove counter.
    #[inline]
    pub const fn fullmove(&self) -> u8 {
        self.fullmove
    }

    /// Set the fullmove counter.
    #[inline]
    pub fn set_fullmove(&mut self, value: u8) {
        self.fullmove = value;
    }

    /// Serialize to the four wire bytes.
    #[inline]
    pub const fn to_bytes(&self) -> [u8; 4] {
        [self.flags, self.en_passant, self.halfmove_clock, self.fullmove]
    }

    /// Reconstruct from the four wire bytes.
    ///
    /// Fails with [`EncodingError::InvalidSquare`] if the en-passant byte
    /// is neither a square index nor the sentinel.
    pub const fn from_bytes(bytes: [u8; 4]) -> Result<PositionMeta, EncodingError> {
        let [flags, en_passant, halfmove_clock, fullmove] = bytes;
        if en_passant > EP_NONE {
            return Err(EncodingError::InvalidSquare { index: en_passant });
        }
        Ok(PositionMeta {
            flags,
            en_passant,
            halfmove_clock,
            fullmove,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{EP_NONE, PositionMeta};
    use crate::castle_rights::{CastleRights, CastleSide};
    use crate::color::Color;
    use crate::square::Square;

    #[test]
    fn default_meta() {
        let meta = PositionMeta::default();
        assert_eq!(meta.active_player(), Color::White);
        assert_eq!(meta.castling(), CastleRights::NONE);
        assert_eq!(meta.en_passant(), None);
        assert_eq!(meta.halfmove_clock(), 0);
        assert_eq!(meta.fullmove(), 1);
    }

    #[test]
    fn active_player_does_not_disturb_castling() {
        let mut meta = PositionMeta::new(
            Color::White,
            CastleRights::ALL,
            None,
            3,
            10,
        );
        meta.set_active_player(Color::Black);
        assert_eq!(meta.active_player(), Color::Black);
        assert_eq!(meta.castling(), CastleRights::ALL);
        meta.set_active_player(Color::White);
        assert_eq!(meta.active_player(), Color::White);
        assert_eq!(meta.castling(), CastleRights::ALL);
    }

    #[test]
    fn castling_rights_individual_bits() {
        let mut meta = PositionMeta::default();
        meta.set_active_player(Color::Black);
        for color in Color::ALL {
            for side in CastleSide::ALL {
                assert!(!meta.castling_right(color, side));
                meta.set_castling_right(color, side, true);
                assert!(meta.castling_right(color, side));
            }
        }
        // Flags byte never bled into the active player bit.
        assert_eq!(meta.active_player(), Color::Black);

        meta.set_castling_right(Color::White, CastleSide::QueenSide, false);
        assert!(!meta.castling_right(Color::White, CastleSide::QueenSide));
        assert!(meta.castling_right(Color::White, CastleSide::KingSide));
    }

    #[test]
    fn en_passant_roundtrip() {
        let mut meta = PositionMeta::default();
        for sq in Square::all() {
            meta.set_en_passant(Some(sq));
            assert_eq!(meta.en_passant(), Some(sq));
        }
        meta.set_en_passant(None);
        assert_eq!(meta.en_passant(), None);
    }

    #[test]
    fn bytes_roundtrip() {
        let meta = PositionMeta::new(
            Color::Black,
            CastleRights::new(0b1010),
            Some(Square::E3),
            42,
            99,
        );
        let bytes = meta.to_bytes();
        assert_eq!(PositionMeta::from_bytes(bytes), Ok(meta));
    }

    #[test]
    fn from_bytes_rejects_bad_en_passant() {
        assert!(PositionMeta::from_bytes([0, EP_NONE + 1, 0, 0]).is_err());
        assert!(PositionMeta::from_bytes([0, 255, 0, 0]).is_err());
        assert!(PositionMeta::from_bytes([0, EP_NONE, 0, 0]).is_ok());
        assert!(PositionMeta::from_bytes([0, 63, 0, 0]).is_ok());
    }
}
