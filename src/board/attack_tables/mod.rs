//! Attack tables for move generation.
//!
//! Leaper attacks (king, knight, pawn) are direct lookups; rook and bishop
//! attacks are magic-bitboard probes built once at first use.

mod leapers;
mod magics;

use once_cell::sync::Lazy;

use super::types::{Bitboard, Color, Square};
use magics::SliderTable;

static ROOK_MAGICS: Lazy<SliderTable> = Lazy::new(magics::build_rook_table);
static BISHOP_MAGICS: Lazy<SliderTable> = Lazy::new(magics::build_bishop_table);

#[inline]
pub(crate) fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ROOK_MAGICS.attacks(sq, occupied)
}

#[inline]
pub(crate) fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    BISHOP_MAGICS.attacks(sq, occupied)
}

#[inline]
pub(crate) fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

#[inline]
pub(crate) fn knight_attacks(sq: Square) -> Bitboard {
    Bitboard(leapers::KNIGHT_ATTACKS[sq.index()])
}

#[inline]
pub(crate) fn king_attacks(sq: Square) -> Bitboard {
    Bitboard(leapers::KING_ATTACKS[sq.index()])
}

/// Squares a pawn of `color` on `sq` attacks.
#[inline]
pub(crate) fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    Bitboard(leapers::PAWN_ATTACKS[color.index()][sq.index()])
}
