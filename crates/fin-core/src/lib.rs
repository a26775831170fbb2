//! Core types for fin training records: the bit-packed position codec
//! and the text-record parser.

mod bitboard;
mod castle_rights;
mod color;
mod error;
mod meta;
mod parse;
mod piece;
mod piece_list;
mod position;
mod result;
mod square;

pub use bitboard::Bitboard;
pub use castle_rights::{CastleRights, CastleSide};
pub use color::Color;
pub use error::{EncodingError, ParseError};
pub use meta::{EP_NONE, PositionMeta};
pub use piece::{Piece, PieceKind};
pub use piece_list::{MAX_PIECES, PieceList};
pub use position::{Position, RECORD_SIZE};
pub use result::{GameResult, Wdl};
pub use square::Square;
