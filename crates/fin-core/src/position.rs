//! The packed position record: compacted piece list + occupancy + meta + result.

use crate::bitboard::Bitboard;
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::EncodingError;
use crate::meta::PositionMeta;
use crate::piece::Piece;
use crate::piece_list::{MAX_PIECES, PieceList};
use crate::result::GameResult;
use crate::square::Square;

/// Size of one position record on the wire, in bytes.
///
/// Layout: 32 bytes piece list, 8 bytes occupancy, 4 bytes meta,
/// 2 bytes score, 1 byte wdl. All multi-byte fields are little-endian.
pub const RECORD_SIZE: usize = 47;

/// One fixed-size chess position record.
///
/// Pieces are stored compacted: the piece on occupied square `s` lives at
/// piece-list slot `occupancy.count_below(s)`, so lookups are a single
/// popcount instead of a board scan. `Position` is immutable once built;
/// the codec and the shuffle engine only ever move or copy whole records.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    pieces: PieceList,
    occupancy: Bitboard,
    meta: PositionMeta,
    result: GameResult,
}

impl Position {
    /// Pack a position from an explicit square→piece placement.
    ///
    /// Fails with [`EncodingError::TooManyPieces`] past [`MAX_PIECES`]
    /// occupied squares (unreachable from legal chess, but the format
    /// guards it) and with [`EncodingError::InvalidFieldValue`] when the
    /// same square appears twice.
    pub fn encode(
        placement: &[(Square, Piece)],
        active_player: Color,
        castling: CastleRights,
        en_passant: Option<Square>,
        halfmove_clock: u8,
        fullmove: u8,
        result: GameResult,
    ) -> Result<Position, EncodingError> {
        if placement.len() > MAX_PIECES {
            return Err(EncodingError::TooManyPieces {
                count: placement.len(),
            });
        }

        let mut occupancy = Bitboard::EMPTY;
        for (sq, _) in placement {
            if occupancy.contains(*sq) {
                return Err(EncodingError::InvalidFieldValue {
                    field: "placement",
                    value: sq.index() as i64,
                });
            }
            occupancy = occupancy.with(*sq);
        }

        // Slot assignment needs the final occupancy, hence the second pass.
        let mut pieces = PieceList::EMPTY;
        for (sq, piece) in placement {
            pieces.set(occupancy.count_below(*sq) as usize, *piece);
        }

        Ok(Position {
            pieces,
            occupancy,
            meta: PositionMeta::new(active_player, castling, en_passant, halfmove_clock, fullmove),
            result,
        })
    }

    /// Return the piece on the given square, or `None` if it is empty.
    ///
    /// O(1): one occupancy test plus one popcount-of-prefix.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        if !self.occupancy.contains(sq) {
            return None;
        }
        self.pieces.get(self.occupancy.count_below(sq) as usize)
    }

    /// Total number of pieces on the board.
    #[inline]
    pub const fn piece_count(&self) -> u32 {
        self.occupancy.count()
    }

    /// Return the occupancy bitboard.
    #[inline]
    pub const fn occupancy(&self) -> Bitboard {
        self.occupancy
    }

    /// Return the packed metadata.
    #[inline]
    pub const fn meta(&self) -> &PositionMeta {
        &self.meta
    }

    /// Return the stored search result.
    #[inline]
    pub const fn result(&self) -> GameResult {
        self.result
    }

    /// Serialize to the fixed-size wire record.
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut out = [0u8; RECORD_SIZE];

        for (i, block) in self.pieces.blocks().iter().enumerate() {
            out[i * 8..(i + 1) * 8].copy_from_slice(&block.to_le_bytes());
        }
        out[32..40].copy_from_slice(&self.occupancy.inner().to_le_bytes());
        out[40..44].copy_from_slice(&self.meta.to_bytes());
        out[44..47].copy_from_slice(&self.result.to_bytes());

        out
    }

    /// Reconstruct a position from a wire record.
    ///
    /// Validates the occupancy count, every populated piece slot, the
    /// en-passant byte and the wdl byte; never guesses at partial data.
    pub fn from_bytes(bytes: &[u8; RECORD_SIZE]) -> Result<Position, EncodingError> {
        let mut blocks = [0u64; 4];
        for (i, block) in blocks.iter_mut().enumerate() {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&bytes[i * 8..(i + 1) * 8]);
            *block = u64::from_le_bytes(raw);
        }
        let pieces = PieceList::from_blocks(blocks);

        let mut raw = [0u8; 8];
        raw.copy_from_slice(&bytes[32..40]);
        let occupancy = Bitboard::new(u64::from_le_bytes(raw));

        let count = occupancy.count() as usize;
        if count > MAX_PIECES {
            return Err(EncodingError::TooManyPieces { count });
        }
        for slot in 0..count {
            if pieces.get(slot).is_none() {
                return Err(EncodingError::InvalidFieldValue {
                    field: "piece",
                    value: pieces.get_raw(slot) as i64,
                });
            }
        }

        let meta = PositionMeta::from_bytes([bytes[40], bytes[41], bytes[42], bytes[43]])?;
        let result = GameResult::from_bytes([bytes[44], bytes[45], bytes[46]])?;

        Ok(Position {
            pieces,
            occupancy,
            meta,
            result,
        })
    }
}
