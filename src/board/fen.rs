//! FEN parsing and serialization, plus long-algebraic move parsing.

use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::eval::Evaluate;
use super::types::{Color, Move, Piece, PieceType, Square};
use super::Position;

impl Position {
    /// Parse a position from FEN notation with the default evaluator.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Self::from_fen_with(fen, Box::<super::eval::ClassicalEvaluator>::default())
    }

    /// Parse a position from FEN notation, routing fills through the given
    /// evaluator.
    pub fn from_fen_with(fen: &str, evaluator: Box<dyn Evaluate>) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 6 {
            return Err(FenError::WrongFieldCount { found: parts.len() });
        }

        let mut position = Position::empty_with(evaluator);

        // Piece placement: ranks from 8 down to 1, which is row order.
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::BadRankCount { found: ranks.len() });
        }
        for (row, rank_str) in ranks.iter().enumerate() {
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(run) = c.to_digit(10) {
                    if !(1..=8).contains(&run) {
                        return Err(FenError::InvalidPiece { char: c });
                    }
                    file += run as usize;
                } else {
                    let piece =
                        Piece::from_fen_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if file >= 8 {
                        return Err(FenError::BadRankLength { rank: 8 - row });
                    }
                    position.fill_square(Square::new(row, file), piece);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::BadRankLength { rank: 8 - row });
            }
        }

        if position.pieces(PieceType::King, Color::White).popcount() != 1
            || position.pieces(PieceType::King, Color::Black).popcount() != 1
        {
            return Err(FenError::InvalidKingCount);
        }

        // Side to move
        position.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        // Castling rights
        if parts[2] != "-" {
            for c in parts[2].chars() {
                match c {
                    'K' => position.rights.set(Color::White, true),
                    'Q' => position.rights.set(Color::White, false),
                    'k' => position.rights.set(Color::Black, true),
                    'q' => position.rights.set(Color::Black, false),
                    _ => return Err(FenError::InvalidCastling { char: c }),
                }
            }
        }

        // En passant target; kept only when a pawn can actually take it
        //, matching what make_move would have produced.
        if parts[3] != "-" {
            let sq = Square::from_str(parts[3]).map_err(|_| FenError::InvalidEnPassant {
                found: parts[3].to_string(),
            })?;
            if sq.rank() != 2 && sq.rank() != 5 {
                return Err(FenError::InvalidEnPassant {
                    found: parts[3].to_string(),
                });
            }
            let us = position.side_to_move;
            let our_pawns = position.pieces(PieceType::Pawn, us);
            if super::attack_tables::pawn_attacks(sq, !us).intersects(our_pawns) {
                position.ep_target = sq;
            }
        }

        position.draw_clock = parts[4].parse().map_err(|_| FenError::InvalidCounter {
            found: parts[4].to_string(),
        })?;
        position.full_moves = parts[5].parse().map_err(|_| FenError::InvalidCounter {
            found: parts[5].to_string(),
        })?;
        if position.full_moves == 0 {
            return Err(FenError::InvalidCounter {
                found: parts[5].to_string(),
            });
        }

        position.hash = position.hash_from_scratch();

        Ok(position)
    }

    /// Serialize the position to FEN notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for row in 0..8 {
            if row > 0 {
                placement.push('/');
            }
            let mut empty = 0;
            for file in 0..8 {
                let piece = self.piece_at(Square::new(row, file));
                if piece.is_none() {
                    empty += 1;
                } else {
                    if empty > 0 {
                        placement.push_str(&empty.to_string());
                        empty = 0;
                    }
                    placement.push(piece.to_fen_char());
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
        }

        let side = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };

        format!(
            "{placement} {side} {} {} {} {}",
            self.rights, self.ep_target, self.draw_clock, self.full_moves
        )
    }

    /// Parse a move in long algebraic notation (e.g. `e2e4`, `e7e8q`)
    /// against the current position's legal moves.
    pub fn parse_move(&self, uci: &str) -> Result<Move, MoveParseError> {
        if !uci.is_ascii() || uci.len() < 4 || uci.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: uci.len() });
        }

        let source = Square::from_str(&uci[0..2]).map_err(|_| MoveParseError::InvalidSquare {
            notation: uci.to_string(),
        })?;
        let target = Square::from_str(&uci[2..4]).map_err(|_| MoveParseError::InvalidSquare {
            notation: uci.to_string(),
        })?;

        let promotion = match uci.as_bytes().get(4) {
            None => None,
            Some(&c) => {
                let piece_type = PieceType::from_char(c as char).ok_or(
                    MoveParseError::InvalidPromotion { char: c as char },
                )?;
                if matches!(piece_type, PieceType::Pawn | PieceType::King) {
                    return Err(MoveParseError::InvalidPromotion { char: c as char });
                }
                Some(piece_type)
            }
        };

        for mv in &self.legal_moves() {
            let mv_promotion = mv
                .is_promotion()
                .then(|| mv.to_piece().piece_type());
            if mv.source() == source && mv.target() == target && mv_promotion == promotion {
                return Ok(*mv);
            }
        }

        Err(MoveParseError::IllegalMove {
            notation: uci.to_string(),
        })
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}
