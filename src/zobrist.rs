//! Zobrist hashing for chess positions.
//!
//! Provides incrementally-updatable 64-bit position hashes for the
//! transposition table and repetition detection. Keys are drawn from a
//! fixed-seed RNG so hashes are reproducible across runs.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{CastlingRights, Piece, Square};

pub(crate) struct ZobristKeys {
    /// Indexed by the raw `Piece` byte and square.
    piece_square: [[u64; 64]; Piece::N],
    /// Indexed by the en-passant target's file.
    en_passant: [u64; 8],
    /// Indexed by the full 4-bit castling-rights value.
    castling: [u64; CastlingRights::N],
    side_to_move: u64,
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(0x00C0_FFEE_D00D_5EED);
        let mut piece_square = [[0u64; 64]; Piece::N];
        let mut en_passant = [0u64; 8];
        let mut castling = [0u64; CastlingRights::N];

        for square_keys in piece_square.iter_mut().skip(1) {
            for key in square_keys.iter_mut() {
                *key = rng.gen();
            }
        }
        // The empty-piece row stays zero so an accidental XOR with
        // `Piece::NONE` is harmless in release builds.

        for key in &mut en_passant {
            *key = rng.gen();
        }
        for key in &mut castling {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_square,
            en_passant,
            castling,
            side_to_move: rng.gen(),
        }
    }
}

static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

#[inline]
pub(crate) fn piece_square_key(piece: Piece, sq: Square) -> u64 {
    ZOBRIST.piece_square[piece.index()][sq.index()]
}

/// Key for an existing en-passant target; only the file contributes.
#[inline]
pub(crate) fn en_passant_key(sq: Square) -> u64 {
    ZOBRIST.en_passant[sq.file()]
}

#[inline]
pub(crate) fn castling_key(rights: CastlingRights) -> u64 {
    ZOBRIST.castling[rights.as_index()]
}

/// Single key XORed in when Black is to move.
#[inline]
pub(crate) fn side_to_move_key() -> u64 {
    ZOBRIST.side_to_move
}
