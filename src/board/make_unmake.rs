//! Make/unmake with full reversibility.
//!
//! `make_move` assumes its input came from the legal generator; the debug
//! contract is enforced with `debug_assert!`. `unmake_move` restores the
//! position bit-for-bit, including the hash and the evaluator state.

use super::attack_tables;
use super::state::{HistoryEntry, MAX_HISTORY};
use super::types::{Color, Move, Piece, PieceType, Square};
use super::Position;
use crate::zobrist;

/// Rook hop for a castling move, keyed by the king's target square.
fn castle_rook_squares(king_target: Square) -> (Square, Square) {
    match king_target {
        Square::G1 => (Square::H1, Square::F1),
        Square::C1 => (Square::A1, Square::D1),
        Square::G8 => (Square::H8, Square::F8),
        Square::C8 => (Square::A8, Square::D8),
        _ => unreachable!("castling king target must be g1/c1/g8/c8"),
    }
}

/// A king moving two files is a castle; kings can never step that far
/// otherwise.
#[inline]
fn is_castle(piece: Piece, source: Square, target: Square) -> bool {
    piece.is(PieceType::King) && source.file().abs_diff(target.file()) == 2
}

impl Position {
    pub fn make_move(&mut self, m: Move) {
        debug_assert!(self.history.len() < MAX_HISTORY, "history stack overflow");
        let us = self.side_to_move;
        let prev_ep = self.ep_target;

        self.history.push(HistoryEntry {
            played: m,
            captured: Piece::NONE,
            rights: self.rights,
            ep_target: prev_ep,
            draw_clock: self.draw_clock,
            hash: self.hash,
        });

        self.draw_clock += 1;

        // The old en-passant possibility dies with every move, null included.
        if !prev_ep.is_none() {
            self.hash ^= zobrist::en_passant_key(prev_ep);
            self.ep_target = Square::NONE;
        }

        if !m.is_null() {
            let source = m.source();
            let target = m.target();
            let piece = m.from_piece();
            debug_assert_eq!(self.mailbox[source.index()], piece, "move source mismatch");
            debug_assert_eq!(piece.color(), us, "moving an enemy piece");

            if piece.is(PieceType::Pawn) {
                self.draw_clock = 0;
            }

            if m.is_capture() {
                // En passant captures one rank behind the target square.
                let capture_sq = if piece.is(PieceType::Pawn) && target == prev_ep {
                    target.down(us)
                } else {
                    target
                };
                let captured = self.clear_square(capture_sq);
                debug_assert_eq!(captured.color(), !us, "capturing a friendly piece");
                self.history.last_mut().unwrap().captured = captured;
                self.draw_clock = 0;
            }

            self.clear_square(source);
            self.fill_square(target, m.to_piece());

            if is_castle(piece, source, target) {
                let (rook_from, rook_to) = castle_rook_squares(target);
                let rook = self.clear_square(rook_from);
                debug_assert!(rook.is(PieceType::Rook));
                self.fill_square(rook_to, rook);
            }

            // A double push exposes an en-passant target, but only when an
            // enemy pawn can actually take it.
            if piece.is(PieceType::Pawn) && source.row().abs_diff(target.row()) == 2 {
                let ep_sq = target.down(us);
                let enemy_pawns = self.pieces(PieceType::Pawn, !us);
                if attack_tables::pawn_attacks(ep_sq, us).intersects(enemy_pawns) {
                    self.ep_target = ep_sq;
                    self.hash ^= zobrist::en_passant_key(ep_sq);
                }
            }

            self.hash ^= zobrist::castling_key(self.rights);
            self.rights.clear_for(source);
            self.rights.clear_for(target);
            self.hash ^= zobrist::castling_key(self.rights);
        }

        self.side_to_move = !us;
        self.hash ^= zobrist::side_to_move_key();
        if self.side_to_move == Color::White {
            self.full_moves += 1;
        }
    }

    pub fn unmake_move(&mut self) {
        let entry = self.history.pop().expect("unmake without a prior make");
        let m = entry.played;

        if self.side_to_move == Color::White {
            self.full_moves -= 1;
        }
        self.side_to_move = !self.side_to_move;
        let us = self.side_to_move;

        if !m.is_null() {
            let source = m.source();
            let target = m.target();
            let piece = m.from_piece();

            self.clear_square(target);
            self.fill_square(source, piece);

            if is_castle(piece, source, target) {
                let (rook_from, rook_to) = castle_rook_squares(target);
                let rook = self.clear_square(rook_to);
                self.fill_square(rook_from, rook);
            }

            if !entry.captured.is_none() {
                let capture_sq = if piece.is(PieceType::Pawn) && target == entry.ep_target {
                    target.down(us)
                } else {
                    target
                };
                self.fill_square(capture_sq, entry.captured);
            }
        }

        // Irreversible fields come back by direct copy; the structural undo
        // above already returned the hash to its prior value, the copy
        // makes that exact by construction.
        self.ep_target = entry.ep_target;
        self.rights = entry.rights;
        self.draw_clock = entry.draw_clock;
        self.hash = entry.hash;
    }

    /// How many earlier positions in the reversible tail of the history
    /// share the current hash. Probes every other ply back to the last
    /// irreversible move.
    #[must_use]
    pub fn repetitions(&self) -> u32 {
        let n = self.history.len();
        let floor = n.saturating_sub(self.draw_clock as usize);
        let mut count = 0;
        let mut i = n;
        while i >= 2 && i - 2 >= floor {
            i -= 2;
            if self.history[i].hash == self.hash {
                count += 1;
            }
        }
        count
    }

    /// Has the current position occurred before?
    #[must_use]
    pub fn is_repetition(&self) -> bool {
        self.repetitions() > 0
    }

    /// Fifty-move rule: one hundred reversible plies.
    #[must_use]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.draw_clock >= 100
    }
}
