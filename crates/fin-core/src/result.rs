//! Game outcome label and search score attached to each position.

use std::fmt;

use crate::error::EncodingError;

/// Win/draw/loss label from the active player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Wdl {
    Loss = -1,
    Draw = 0,
    Win = 1,
}

impl Wdl {
    /// All labels in wire order.
    pub const ALL: [Wdl; 3] = [Wdl::Loss, Wdl::Draw, Wdl::Win];

    /// Return the signed wire byte (-1, 0 or 1).
    #[inline]
    pub const fn raw(self) -> i8 {
        self as i8
    }

    /// Reconstruct from the signed wire byte.
    pub const fn from_raw(raw: i8) -> Result<Wdl, EncodingError> {
        match raw {
            -1 => Ok(Wdl::Loss),
            0 => Ok(Wdl::Draw),
            1 => Ok(Wdl::Win),
            _ => Err(EncodingError::InvalidFieldValue {
                field: "wdl",
                value: raw as i64,
            }),
        }
    }
}

impl fmt::Display for Wdl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wdl::Loss => write!(f, "0.0"),
            Wdl::Draw => write!(f, "0.5"),
            Wdl::Win => write!(f, "1.0"),
        }
    }
}

/// The stored search result: a centipawn score plus a [`Wdl`] label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameResult {
    /// Signed evaluation score.
    pub score: i16,
    /// Game outcome from the active player's perspective.
    pub wdl: Wdl,
}

impl GameResult {
    /// Create a result from a score and label.
    #[inline]
    pub const fn new(score: i16, wdl: Wdl) -> GameResult {
        GameResult { score, wdl }
    }

    /// Serialize to the three wire bytes (little-endian score, then label).
    #[inline]
    pub const fn to_bytes(&self) -> [u8; 3] {
        let score = self.score.to_le_bytes();
        [score[0], score[1], self.wdl.raw() as u8]
    }

    /// Reconstruct from the three wire bytes.
    pub const fn from_bytes(bytes: [u8; 3]) -> Result<GameResult, EncodingError> {
        let score = i16::from_le_bytes([bytes[0], bytes[1]]);
        match Wdl::from_raw(bytes[2] as i8) {
            Ok(wdl) => Ok(GameResult { score, wdl }),
            Err(e) => Err(e),
        }
    }
}

impl Default for GameResult {
    fn default() -> GameResult {
        GameResult::new(0, Wdl::Draw)
    }
}
