//! Knight move generation.

use super::super::attack_tables;
use super::super::masks::GenSnapshot;
use super::super::types::{MoveList, PieceType};
use super::super::Position;

/// A pinned knight can never move, whatever the pin direction.
pub(super) fn generate(pos: &Position, snap: &GenSnapshot, list: &mut MoveList) {
    let knights =
        pos.pieces(PieceType::Knight, pos.side_to_move()) - (snap.pin_lateral | snap.pin_diagonal);

    for knight in knights {
        let targets = attack_tables::knight_attacks(knight) & snap.target & snap.check_mask;
        pos.serialize(knight, targets, list);
    }
}
