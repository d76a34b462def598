//! King moves and castling.

use super::super::attack_tables;
use super::super::masks::GenSnapshot;
use super::super::types::{Bitboard, Color, MoveList, Square};
use super::super::Position;

pub(super) fn generate(pos: &Position, snap: &GenSnapshot, list: &mut MoveList) {
    // The check mask does not apply to the king; the threat map (computed
    // with the king off the board) already rules out every unsafe square.
    let targets = attack_tables::king_attacks(snap.king) & snap.target & !snap.threats;
    pos.serialize(snap.king, targets, list);
}

// Castling path masks: `EMPTY` squares must be unoccupied, `SAFE` squares
// (the ones the king crosses) must be unattacked on top.
const WHITE_KINGSIDE_EMPTY: Bitboard =
    Bitboard(1u64 << Square::F1.index() | 1u64 << Square::G1.index());
const WHITE_KINGSIDE_SAFE: Bitboard = WHITE_KINGSIDE_EMPTY;
const WHITE_QUEENSIDE_EMPTY: Bitboard = Bitboard(
    1u64 << Square::B1.index()
        | 1u64 << Square::C1.index()
        | 1u64 << Square::D1.index(),
);
const WHITE_QUEENSIDE_SAFE: Bitboard =
    Bitboard(1u64 << Square::C1.index() | 1u64 << Square::D1.index());

const BLACK_KINGSIDE_EMPTY: Bitboard =
    Bitboard(1u64 << Square::F8.index() | 1u64 << Square::G8.index());
const BLACK_KINGSIDE_SAFE: Bitboard = BLACK_KINGSIDE_EMPTY;
const BLACK_QUEENSIDE_EMPTY: Bitboard = Bitboard(
    1u64 << Square::B8.index()
        | 1u64 << Square::C8.index()
        | 1u64 << Square::D8.index(),
);
const BLACK_QUEENSIDE_SAFE: Bitboard =
    Bitboard(1u64 << Square::C8.index() | 1u64 << Square::D8.index());

pub(super) fn generate_castling(pos: &Position, snap: &GenSnapshot, list: &mut MoveList) {
    // No castling out of check.
    if !snap.checkers.is_empty() {
        return;
    }

    let us = pos.side_to_move();
    let rights = pos.castling_rights();

    let (kingside, queenside) = match us {
        Color::White => (
            (WHITE_KINGSIDE_EMPTY, WHITE_KINGSIDE_SAFE, Square::G1),
            (WHITE_QUEENSIDE_EMPTY, WHITE_QUEENSIDE_SAFE, Square::C1),
        ),
        Color::Black => (
            (BLACK_KINGSIDE_EMPTY, BLACK_KINGSIDE_SAFE, Square::G8),
            (BLACK_QUEENSIDE_EMPTY, BLACK_QUEENSIDE_SAFE, Square::C8),
        ),
    };

    let (empty, safe, target) = kingside;
    if rights.has(us, true) && snap.occupied.is_disjoint(empty) && snap.threats.is_disjoint(safe) {
        list.push(pos.move_to(snap.king, target));
    }

    let (empty, safe, target) = queenside;
    if rights.has(us, false) && snap.occupied.is_disjoint(empty) && snap.threats.is_disjoint(safe) {
        list.push(pos.move_to(snap.king, target));
    }
}
