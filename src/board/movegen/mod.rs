//! Strictly legal move generation.
//!
//! Pins and check constraints are honored during enumeration; there is no
//! generate-then-filter pass. The noisy-only mode feeds quiescence search:
//! captures and queen promotions are noisy, underpromotions inherit their
//! capture flag.

mod kings;
mod knights;
mod pawns;
mod sliders;

use super::masks::GenSnapshot;
use super::types::{Bitboard, Move, MoveList, Square};
use super::Position;

impl Position {
    /// All legal moves in the position.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        self.generate::<true, true>()
    }

    /// Captures and queen promotions only, for quiescence.
    #[must_use]
    pub(crate) fn noisy_moves(&self) -> MoveList {
        self.generate::<false, true>()
    }

    fn generate<const QUIET: bool, const NOISY: bool>(&self) -> MoveList {
        let mut list = MoveList::new();
        let snap = GenSnapshot::new::<QUIET, NOISY>(self);

        kings::generate(self, &snap, &mut list);

        // Under double check only king moves can be legal.
        if snap.checkers.popcount() < 2 {
            pawns::generate::<QUIET, NOISY>(self, &snap, &mut list);
            knights::generate(self, &snap, &mut list);
            sliders::generate(self, &snap, &mut list);
            if QUIET {
                kings::generate_castling(self, &snap, &mut list);
            }
        }

        list
    }

    /// Build a move from board context: the mover comes from the mailbox,
    /// the capture flag from the target square.
    #[inline]
    pub(crate) fn move_to(&self, source: Square, target: Square) -> Move {
        let piece = self.piece_at(source);
        Move::new(source, target, piece, !self.piece_at(target).is_none())
    }

    /// Push one move per target square.
    #[inline]
    fn serialize(&self, source: Square, targets: Bitboard, list: &mut MoveList) {
        for target in targets {
            list.push(self.move_to(source, target));
        }
    }

    /// Count leaf nodes of the legal move tree to a fixed depth.
    #[must_use]
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for mv in &moves {
            self.make_move(*mv);
            nodes += self.perft(depth - 1);
            self.unmake_move();
        }
        nodes
    }
}
