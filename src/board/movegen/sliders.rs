//! Bishop, rook and queen move generation.
//!
//! Queens are generated twice, once with each slider family: their
//! diagonal moves follow bishop pin rules and their lateral moves rook
//! pin rules.

use super::super::attack_tables;
use super::super::masks::GenSnapshot;
use super::super::types::{MoveList, PieceType};
use super::super::Position;

pub(super) fn generate(pos: &Position, snap: &GenSnapshot, list: &mut MoveList) {
    let us = pos.side_to_move();
    let queens = pos.pieces(PieceType::Queen, us);

    // Bishop-like movers: a lateral pin freezes them entirely, a diagonal
    // pin confines them to the pin ray.
    let bishop_like = (pos.pieces(PieceType::Bishop, us) | queens) - snap.pin_lateral;
    let pinned = bishop_like & snap.pin_diagonal;
    for slider in pinned {
        let targets = attack_tables::bishop_attacks(slider, snap.occupied)
            & snap.pin_diagonal
            & snap.target
            & snap.check_mask;
        pos.serialize(slider, targets, list);
    }
    for slider in bishop_like ^ pinned {
        let targets =
            attack_tables::bishop_attacks(slider, snap.occupied) & snap.target & snap.check_mask;
        pos.serialize(slider, targets, list);
    }

    // Rook-like movers, symmetric.
    let rook_like = (pos.pieces(PieceType::Rook, us) | queens) - snap.pin_diagonal;
    let pinned = rook_like & snap.pin_lateral;
    for slider in pinned {
        let targets = attack_tables::rook_attacks(slider, snap.occupied)
            & snap.pin_lateral
            & snap.target
            & snap.check_mask;
        pos.serialize(slider, targets, list);
    }
    for slider in rook_like ^ pinned {
        let targets =
            attack_tables::rook_attacks(slider, snap.occupied) & snap.target & snap.check_mask;
        pos.serialize(slider, targets, list);
    }
}
