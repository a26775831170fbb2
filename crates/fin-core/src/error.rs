//! Error types for position encoding and text-record parsing.

/// Errors that occur when building or decoding a packed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// More than 32 occupied squares were supplied.
    #[error("too many pieces: {count} occupied squares, at most 32 allowed")]
    TooManyPieces {
        /// Number of occupied squares found.
        count: usize,
    },

    /// A square byte is neither a valid index nor the en-passant sentinel.
    #[error("invalid square index: {index}")]
    InvalidSquare {
        /// The out-of-range index.
        index: u8,
    },

    /// A packed field holds a value outside its valid range.
    #[error("invalid value {value} for field {field}")]
    InvalidFieldValue {
        /// Name of the offending field.
        field: &'static str,
        /// The out-of-range value.
        value: i64,
    },
}

/// Errors that occur when parsing a text record (`{fen} {wdl} {score}`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The line does not have the expected number of fields.
    #[error("expected 8 fields (6 FEN fields, wdl, score), found {found}")]
    WrongFieldCount {
        /// Number of whitespace-separated fields found.
        found: usize,
    },

    /// The piece placement section does not have exactly 8 ranks.
    #[error("expected 8 ranks in piece placement, found {found}")]
    WrongRankCount {
        /// Number of ranks found.
        found: usize,
    },

    /// A rank in the piece placement describes more or fewer than 8 squares.
    #[error("rank {rank_index} describes {length} squares, expected 8")]
    BadRankLength {
        /// Zero-based rank index (0 = rank 8 in FEN, 7 = rank 1).
        rank_index: usize,
        /// Number of squares described.
        length: usize,
    },

    /// An unrecognized character appeared in the piece placement.
    #[error("invalid piece character: '{character}'")]
    InvalidPieceChar {
        /// The invalid character.
        character: char,
    },

    /// The active color field is not "w" or "b".
    #[error("invalid active color: \"{found}\"")]
    InvalidColor {
        /// The invalid color string.
        found: String,
    },

    /// An unrecognized character appeared in the castling rights field.
    #[error("invalid castling character: '{character}'")]
    InvalidCastlingChar {
        /// The invalid character.
        character: char,
    },

    /// The en passant field is not "-" or a valid algebraic square.
    #[error("invalid en passant square: \"{found}\"")]
    InvalidEnPassant {
        /// The invalid en passant string.
        found: String,
    },

    /// A move counter is not a valid number.
    #[error("invalid {field}: \"{found}\"")]
    InvalidMoveCounter {
        /// The field name ("halfmove clock" or "fullmove number").
        field: &'static str,
        /// The invalid string.
        found: String,
    },

    /// The wdl field is not a recognized outcome token.
    #[error("invalid wdl: \"{found}\"")]
    InvalidWdl {
        /// The invalid wdl string.
        found: String,
    },

    /// The score field is not a valid signed 16-bit integer.
    #[error("invalid score: \"{found}\"")]
    InvalidScore {
        /// The invalid score string.
        found: String,
    },

    /// The parsed fields cannot be packed into a position.
    #[error("invalid position: {source}")]
    InvalidPosition {
        /// The underlying encoding error.
        #[from]
        source: EncodingError,
    },
}
