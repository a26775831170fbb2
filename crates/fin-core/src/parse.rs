//! Text-record parsing and formatting.
//!
//! A text record is one line: the six FEN fields, then a wdl token, then
//! a signed score — e.g.
//! `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 0.5 13`.

use std::fmt;
use std::str::FromStr;

use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::ParseError;
use crate::piece::Piece;
use crate::position::Position;
use crate::result::{GameResult, Wdl};
use crate::square::Square;

impl FromStr for Position {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Position, ParseError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 8 {
            return Err(ParseError::WrongFieldCount {
                found: fields.len(),
            });
        }

        let placement = parse_placement(fields[0])?;

        let active_player = Color::from_fen(fields[1]).ok_or_else(|| ParseError::InvalidColor {
            found: fields[1].to_string(),
        })?;

        let castling = CastleRights::from_fen(fields[2])?;

        let en_passant = if fields[3] == "-" {
            None
        } else {
            Some(
                Square::from_algebraic(fields[3]).ok_or_else(|| ParseError::InvalidEnPassant {
                    found: fields[3].to_string(),
                })?,
            )
        };

        let halfmove_clock =
            fields[4]
                .parse::<u8>()
                .map_err(|_| ParseError::InvalidMoveCounter {
                    field: "halfmove clock",
                    found: fields[4].to_string(),
                })?;

        let fullmove = fields[5]
            .parse::<u8>()
            .map_err(|_| ParseError::InvalidMoveCounter {
                field: "fullmove number",
                found: fields[5].to_string(),
            })?;

        let wdl = parse_wdl(fields[6])?;

        let score = fields[7]
            .parse::<i16>()
            .map_err(|_| ParseError::InvalidScore {
                found: fields[7].to_string(),
            })?;

        Ok(Position::encode(
            &placement,
            active_player,
            castling,
            en_passant,
            halfmove_clock,
            fullmove,
            GameResult::new(score, wdl),
        )?)
    }
}

/// Parse the FEN piece-placement field into square/piece pairs.
fn parse_placement(field: &str) -> Result<Vec<(Square, Piece)>, ParseError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(ParseError::WrongRankCount { found: ranks.len() });
    }

    let mut placement = Vec::new();

    for (rank_index, rank_str) in ranks.iter().enumerate() {
        // FEN ranks go from 8 to 1 (top to bottom)
        let rank = 7 - rank_index as u8;
        let mut file: u8 = 0;

        for c in rank_str.chars() {
            if let Some(digit) = c.to_digit(10) {
                if !(1..=8).contains(&digit) {
                    return Err(ParseError::InvalidPieceChar { character: c });
                }
                file += digit as u8;
            } else {
                let piece = Piece::from_fen_char(c)
                    .ok_or(ParseError::InvalidPieceChar { character: c })?;
                let sq = Square::from_rank_file(rank, file).ok_or(ParseError::BadRankLength {
                    rank_index,
                    length: file as usize + 1,
                })?;
                placement.push((sq, piece));
                file += 1;
            }
        }

        if file != 8 {
            return Err(ParseError::BadRankLength {
                rank_index,
                length: file as usize,
            });
        }
    }

    Ok(placement)
}

/// Parse a wdl token: `1.0`/`0.5`/`0.0` float form or `1`/`0`/`-1` signed form.
fn parse_wdl(token: &str) -> Result<Wdl, ParseError> {
    match token {
        "1.0" | "1" => Ok(Wdl::Win),
        "0.5" | "0" => Ok(Wdl::Draw),
        "0.0" | "-1" => Ok(Wdl::Loss),
        other => Err(ParseError::InvalidWdl {
            found: other.to_string(),
        }),
    }
}

impl fmt::Display for Position {
    /// Format as a text record (the inverse of [`FromStr`]).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Piece placement, rank 8 down to rank 1.
        for rank in (0u8..8).rev() {
            let mut empty_run = 0;
            for file in 0u8..8 {
                let sq = Square::from_index_unchecked(rank * 8 + file);
                match self.piece_at(sq) {
                    Some(piece) => {
                        if empty_run > 0 {
                            write!(f, "{empty_run}")?;
                            empty_run = 0;
                        }
                        write!(f, "{piece}")?;
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                write!(f, "{empty_run}")?;
            }
            if rank > 0 {
                write!(f, "/")?;
            }
        }

        let meta = self.meta();
        write!(f, " {} {}", meta.active_player(), meta.castling())?;
        match meta.en_passant() {
            Some(sq) => write!(f, " {sq}")?,
            None => write!(f, " -")?,
        }
        write!(
            f,
            " {} {} {} {}",
            meta.halfmove_clock(),
            meta.fullmove(),
            self.result().wdl,
            self.result().score
        )
    }
}
