//! Square type and utilities.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;
use crate::board::error::SquareError;

/// A square on the chess board, stored as a compact 0-63 index.
///
/// Index layout is rank-descending: a8=0, b8=1, ..., h8=7, a7=8, ..., h1=63.
/// Row 0 is rank 8 from White's viewpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(u8);

impl Square {
    /// The "no square" sentinel.
    pub const NONE: Square = Square(64);

    /// Create a new square from row and file (both 0-7). Row 0 is rank 8.
    #[inline]
    #[must_use]
    pub const fn new(row: usize, file: usize) -> Self {
        Square((row * 8 + file) as u8)
    }

    /// Create a square from an index (0-63)
    #[inline]
    #[must_use]
    pub const fn from_index(idx: usize) -> Self {
        debug_assert!(idx < 64);
        Square(idx as u8)
    }

    /// Get the square's index (0-63)
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 >= 64
    }

    /// Get the file (0-7, where 0 = file a)
    #[inline]
    #[must_use]
    pub const fn file(self) -> usize {
        (self.0 % 8) as usize
    }

    /// Get the row (0-7, where row 0 = rank 8)
    #[inline]
    #[must_use]
    pub const fn row(self) -> usize {
        (self.0 / 8) as usize
    }

    /// Get the chess rank (0-7, where 0 = rank 1)
    #[inline]
    #[must_use]
    pub const fn rank(self) -> usize {
        7 - self.row()
    }

    /// NE-SW diagonal index (0-14)
    #[inline]
    #[must_use]
    pub const fn diagonal(self) -> usize {
        self.row() + self.file()
    }

    /// NW-SE anti-diagonal index (0-14)
    #[inline]
    #[must_use]
    pub const fn anti_diagonal(self) -> usize {
        7 + self.row() - self.file()
    }

    /// The square one step toward the opponent's back rank.
    /// Must not be called from the back rank itself.
    #[inline]
    #[must_use]
    pub const fn up(self, color: Color) -> Square {
        match color {
            Color::White => Square(self.0 - 8),
            Color::Black => Square(self.0 + 8),
        }
    }

    /// The square one step toward the own back rank.
    /// Must not be called from the own back rank.
    #[inline]
    #[must_use]
    pub const fn down(self, color: Color) -> Square {
        match color {
            Color::White => Square(self.0 + 8),
            Color::Black => Square(self.0 - 8),
        }
    }

    /// One file toward file h. Must not be called from file h.
    #[inline]
    #[must_use]
    pub const fn east(self) -> Square {
        debug_assert!(self.file() < 7);
        Square(self.0 + 1)
    }

    /// One file toward file a. Must not be called from file a.
    #[inline]
    #[must_use]
    pub const fn west(self) -> Square {
        debug_assert!(self.file() > 0);
        Square(self.0 - 1)
    }

    /// Flip the square vertically (a1 <-> a8)
    #[inline]
    #[must_use]
    pub const fn flip_vertical(self) -> Square {
        Square(self.0 ^ 56)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return write!(f, "-");
        }
        write!(
            f,
            "{}{}",
            (self.file() as u8 + b'a') as char,
            self.rank() + 1
        )
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file_c), Some(rank_c), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SquareError::InvalidNotation {
                notation: s.to_string(),
            });
        };

        if !('a'..='h').contains(&file_c) || !('1'..='8').contains(&rank_c) {
            return Err(SquareError::InvalidNotation {
                notation: s.to_string(),
            });
        }

        let file = file_c as usize - 'a' as usize;
        let rank = rank_c as usize - '1' as usize;
        Ok(Square::new(7 - rank, file))
    }
}

// Named constants for the squares the castling machinery references.
impl Square {
    pub const A8: Square = Square(0);
    pub const B8: Square = Square(1);
    pub const C8: Square = Square(2);
    pub const D8: Square = Square(3);
    pub const E8: Square = Square(4);
    pub const F8: Square = Square(5);
    pub const G8: Square = Square(6);
    pub const H8: Square = Square(7);
    pub const A1: Square = Square(56);
    pub const B1: Square = Square(57);
    pub const C1: Square = Square(58);
    pub const D1: Square = Square(59);
    pub const E1: Square = Square(60);
    pub const F1: Square = Square(61);
    pub const G1: Square = Square(62);
    pub const H1: Square = Square(63);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_layout() {
        assert_eq!(Square::A8.index(), 0);
        assert_eq!(Square::H1.index(), 63);
        assert_eq!(Square::new(0, 0), Square::A8);
        assert_eq!(Square::new(7, 4), Square::E1);
    }

    #[test]
    fn test_square_file_rank() {
        let e4: Square = "e4".parse().unwrap();
        assert_eq!(e4.file(), 4);
        assert_eq!(e4.rank(), 3);
        assert_eq!(e4.row(), 4);
        assert_eq!(e4.index(), 36);
    }

    #[test]
    fn test_square_diagonals() {
        // a8 and h1 sit on the same NE-SW line endpoints
        assert_eq!(Square::A8.diagonal(), 0);
        assert_eq!(Square::H1.diagonal(), 14);
        // a1-h8 share the anti-diagonal
        assert_eq!(Square::A1.anti_diagonal(), Square::H8.anti_diagonal());
    }

    #[test]
    fn test_square_up_down() {
        let e2: Square = "e2".parse().unwrap();
        let e3: Square = "e3".parse().unwrap();
        assert_eq!(e2.up(Color::White), e3);
        assert_eq!(e3.down(Color::White), e2);
        assert_eq!(e3.up(Color::Black), e2);
    }

    #[test]
    fn test_square_display_roundtrip() {
        for idx in 0..64 {
            let sq = Square::from_index(idx);
            let parsed: Square = sq.to_string().parse().unwrap();
            assert_eq!(parsed, sq);
        }
        assert_eq!(Square::NONE.to_string(), "-");
    }

    #[test]
    fn test_square_from_str_errors() {
        assert!("z1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a".parse::<Square>().is_err());
        assert!("a1b".parse::<Square>().is_err());
    }

    #[test]
    fn test_square_flip_vertical() {
        assert_eq!(Square::A8.flip_vertical(), Square::A1);
        assert_eq!(Square::E1.flip_vertical(), Square::E8);
    }
}
