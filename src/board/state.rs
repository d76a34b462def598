//! The position: mailbox plus bitboards, with incremental hash and
//! evaluator maintenance.

use super::attack_tables;
use super::eval::Evaluate;
use super::types::{Bitboard, CastlingRights, Color, Move, Piece, PieceType, Square};
use crate::zobrist;

/// History stack capacity in plies.
pub const MAX_HISTORY: usize = 1024;

/// The standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// One ply of reversible state: the move played plus everything the move
/// destroyed (castling rights, ep target, draw clock, hash, any capture).
#[derive(Clone, Copy, Debug)]
pub(crate) struct HistoryEntry {
    pub played: Move,
    pub captured: Piece,
    pub rights: CastlingRights,
    pub ep_target: Square,
    pub draw_clock: u8,
    pub hash: u64,
}

pub struct Position {
    pub(crate) mailbox: [Piece; 64],
    pub(crate) piece_bbs: [Bitboard; 6],
    pub(crate) color_bbs: [Bitboard; 2],
    pub(crate) kings: [Square; 2],
    pub(crate) side_to_move: Color,
    pub(crate) ep_target: Square,
    pub(crate) rights: CastlingRights,
    pub(crate) full_moves: u32,
    pub(crate) draw_clock: u8,
    pub(crate) hash: u64,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) evaluator: Box<dyn Evaluate>,
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Position")
            .field("mailbox", &self.mailbox)
            .field("piece_bbs", &self.piece_bbs)
            .field("color_bbs", &self.color_bbs)
            .field("kings", &self.kings)
            .field("side_to_move", &self.side_to_move)
            .field("ep_target", &self.ep_target)
            .field("rights", &self.rights)
            .field("full_moves", &self.full_moves)
            .field("draw_clock", &self.draw_clock)
            .field("hash", &self.hash)
            .field("history", &self.history)
            .finish_non_exhaustive()
    }
}

impl Position {
    /// The standard starting position with the classical evaluator.
    #[must_use]
    pub fn new() -> Self {
        Self::from_fen(START_FEN).expect("start FEN is valid")
    }

    pub(crate) fn empty_with(evaluator: Box<dyn Evaluate>) -> Self {
        Position {
            mailbox: [Piece::NONE; 64],
            piece_bbs: [Bitboard::EMPTY; 6],
            color_bbs: [Bitboard::EMPTY; 2],
            kings: [Square::NONE; 2],
            side_to_move: Color::White,
            ep_target: Square::NONE,
            rights: CastlingRights::none(),
            full_moves: 1,
            draw_clock: 0,
            hash: 0,
            history: Vec::with_capacity(MAX_HISTORY),
            evaluator,
        }
    }

    // =====================================================================
    // Incremental board surgery. Every piece placed or removed flows
    // through these two, keeping mailbox, bitboards, king squares, hash
    // and the evaluator in lockstep.
    // =====================================================================

    #[inline]
    pub(crate) fn fill_square(&mut self, sq: Square, piece: Piece) {
        debug_assert!(!piece.is_none());
        debug_assert!(self.mailbox[sq.index()].is_none());
        let bit = Bitboard::from_square(sq);
        self.mailbox[sq.index()] = piece;
        self.piece_bbs[piece.piece_type().index()] |= bit;
        self.color_bbs[piece.color().index()] |= bit;
        if piece.is(PieceType::King) {
            self.kings[piece.color().index()] = sq;
        }
        self.hash ^= zobrist::piece_square_key(piece, sq);
        self.evaluator.on_fill(sq, piece);
    }

    #[inline]
    pub(crate) fn clear_square(&mut self, sq: Square) -> Piece {
        let piece = self.mailbox[sq.index()];
        debug_assert!(!piece.is_none());
        let bit = Bitboard::from_square(sq);
        self.mailbox[sq.index()] = Piece::NONE;
        self.piece_bbs[piece.piece_type().index()] ^= bit;
        self.color_bbs[piece.color().index()] ^= bit;
        self.hash ^= zobrist::piece_square_key(piece, sq);
        self.evaluator.on_clear(sq, piece);
        piece
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Piece {
        self.mailbox[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn en_passant_target(&self) -> Square {
        self.ep_target
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.rights
    }

    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    #[must_use]
    pub fn draw_clock(&self) -> u8 {
        self.draw_clock
    }

    #[inline]
    #[must_use]
    pub fn full_moves(&self) -> u32 {
        self.full_moves
    }

    /// Plies played since the position was created.
    #[inline]
    #[must_use]
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    #[inline]
    #[must_use]
    pub fn piece_bb(&self, piece_type: PieceType) -> Bitboard {
        self.piece_bbs[piece_type.index()]
    }

    #[inline]
    #[must_use]
    pub fn color_bb(&self, color: Color) -> Bitboard {
        self.color_bbs[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn pieces(&self, piece_type: PieceType, color: Color) -> Bitboard {
        self.piece_bb(piece_type) & self.color_bb(color)
    }

    #[inline]
    #[must_use]
    pub fn king(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.color_bbs[0] | self.color_bbs[1]
    }

    #[inline]
    #[must_use]
    pub fn friends(&self) -> Bitboard {
        self.color_bb(self.side_to_move)
    }

    #[inline]
    #[must_use]
    pub fn enemies(&self) -> Bitboard {
        self.color_bb(!self.side_to_move)
    }

    /// The last move pushed onto the history, if any.
    #[inline]
    pub(crate) fn last_move(&self) -> Option<Move> {
        self.history.last().map(|entry| entry.played)
    }

    // =====================================================================
    // Attack queries
    // =====================================================================

    /// Every piece of `by` attacking `sq`, given an occupancy.
    #[must_use]
    pub(crate) fn attackers_to(&self, sq: Square, occupied: Bitboard, by: Color) -> Bitboard {
        let queens = self.pieces(PieceType::Queen, by);
        (attack_tables::pawn_attacks(sq, !by) & self.pieces(PieceType::Pawn, by))
            | (attack_tables::knight_attacks(sq) & self.pieces(PieceType::Knight, by))
            | (attack_tables::bishop_attacks(sq, occupied)
                & (self.pieces(PieceType::Bishop, by) | queens))
            | (attack_tables::rook_attacks(sq, occupied)
                & (self.pieces(PieceType::Rook, by) | queens))
            | (attack_tables::king_attacks(sq) & self.pieces(PieceType::King, by))
    }

    /// Is the side to move's king attacked?
    #[must_use]
    pub fn in_check(&self) -> bool {
        let us = self.side_to_move;
        !self
            .attackers_to(self.king(us), self.occupied(), !us)
            .is_empty()
    }

    /// A position is only legal if the side that just moved did not leave
    /// its own king in check.
    #[must_use]
    pub fn is_legal(&self) -> bool {
        let them = !self.side_to_move;
        self.attackers_to(self.king(them), self.occupied(), self.side_to_move)
            .is_empty()
    }

    /// Does `color` still have anything beyond pawns and the king?
    /// Gates null-move pruning in zugzwang-prone endings.
    #[must_use]
    pub(crate) fn has_non_pawn_material(&self, color: Color) -> bool {
        let minors_and_majors = self.piece_bb(PieceType::Knight)
            | self.piece_bb(PieceType::Bishop)
            | self.piece_bb(PieceType::Rook)
            | self.piece_bb(PieceType::Queen);
        !(minors_and_majors & self.color_bb(color)).is_empty()
    }

    // =====================================================================
    // Evaluation
    // =====================================================================

    /// Static evaluation from the side to move's point of view.
    #[inline]
    #[must_use]
    pub fn evaluate(&self) -> i32 {
        self.evaluator.accumulate(self.side_to_move)
    }

    /// Recompute the zobrist hash from scratch; the incremental hash must
    /// always agree with it.
    #[must_use]
    pub(crate) fn hash_from_scratch(&self) -> u64 {
        let mut hash = 0u64;
        for sq in self.occupied() {
            hash ^= zobrist::piece_square_key(self.piece_at(sq), sq);
        }
        hash ^= zobrist::castling_key(self.rights);
        if !self.ep_target.is_none() {
            hash ^= zobrist::en_passant_key(self.ep_target);
        }
        if self.side_to_move == Color::Black {
            hash ^= zobrist::side_to_move_key();
        }
        hash
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}
