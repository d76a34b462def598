//! Pawn move generation: pushes, captures, promotions and en passant.

use super::super::attack_tables;
use super::super::masks::GenSnapshot;
use super::super::types::{
    Bitboard, Color, Move, MoveList, Piece, PieceType, Square, PROMOTION_TYPES,
};
use super::super::Position;

pub(super) fn generate<const QUIET: bool, const NOISY: bool>(
    pos: &Position,
    snap: &GenSnapshot,
    list: &mut MoveList,
) {
    generate_pushes::<QUIET, NOISY>(pos, snap, list);
    if NOISY {
        generate_captures(pos, snap, list);
        generate_en_passant(pos, snap, list);
    }
}

fn generate_pushes<const QUIET: bool, const NOISY: bool>(
    pos: &Position,
    snap: &GenSnapshot,
    list: &mut MoveList,
) {
    let us = pos.side_to_move();
    let pawn = Piece::new(PieceType::Pawn, us);

    // A diagonally pinned pawn can never push; a laterally pinned pawn may
    // only push along its pin ray.
    let pushable = pos.pieces(PieceType::Pawn, us) - snap.pin_diagonal;
    let pinned = pushable & snap.pin_lateral;
    let unpinned = pushable ^ pinned;

    // Single-step squares with blockers removed. The check mask is not
    // applied yet: a double push may block a check through a square the
    // single push could not land on.
    let pushed = ((pinned.up(us) & snap.pin_lateral) | unpinned.up(us)) & !snap.occupied;

    let singles = pushed & snap.check_mask;
    let promotions = singles & Bitboard::promotion_rank(us);

    if QUIET {
        for target in singles ^ promotions {
            list.push(Move::new(target.down(us), target, pawn, false));
        }

        let doubles = (pushed & Bitboard::third_rank(us)).up(us) & !snap.occupied & snap.check_mask;
        for target in doubles {
            list.push(Move::new(target.down(us).down(us), target, pawn, false));
        }
    }

    // A pushed queen promotion is noisy; pushed underpromotions are quiet.
    for target in promotions {
        push_promotions::<QUIET, NOISY>(list, target.down(us), target, us, false);
    }
}

fn generate_captures(pos: &Position, snap: &GenSnapshot, list: &mut MoveList) {
    let us = pos.side_to_move();
    let pawn = Piece::new(PieceType::Pawn, us);

    // A laterally pinned pawn can never capture; a diagonally pinned pawn
    // may only capture its pinner's ray.
    let capturing = pos.pieces(PieceType::Pawn, us) - snap.pin_lateral;
    let pinned = capturing & snap.pin_diagonal;
    let unpinned = capturing ^ pinned;

    let victims = snap.enemies & snap.check_mask;

    let west = ((pinned.up(us).west() & snap.pin_diagonal) | unpinned.up(us).west()) & victims;
    let east = ((pinned.up(us).east() & snap.pin_diagonal) | unpinned.up(us).east()) & victims;

    let promotion_rank = Bitboard::promotion_rank(us);

    for target in west - promotion_rank {
        list.push(Move::new(target.down(us).east(), target, pawn, true));
    }
    for target in east - promotion_rank {
        list.push(Move::new(target.down(us).west(), target, pawn, true));
    }

    // Capture promotions are all noisy, underpromotions included.
    for target in west & promotion_rank {
        push_promotions::<true, true>(list, target.down(us).east(), target, us, true);
    }
    for target in east & promotion_rank {
        push_promotions::<true, true>(list, target.down(us).west(), target, us, true);
    }
}

fn generate_en_passant(pos: &Position, snap: &GenSnapshot, list: &mut MoveList) {
    let ep_target = pos.en_passant_target();
    if ep_target.is_none() {
        return;
    }

    let us = pos.side_to_move();
    let pawn = Piece::new(PieceType::Pawn, us);
    let captured_sq = ep_target.down(us);

    let candidates =
        (attack_tables::pawn_attacks(ep_target, !us) & pos.pieces(PieceType::Pawn, us))
            - snap.pin_lateral;

    for source in candidates {
        // The capture must resolve any check, either by landing on the
        // checking ray or by removing the checking pawn itself.
        if !snap.check_mask.contains(ep_target) && !snap.check_mask.contains(captured_sq) {
            continue;
        }

        // A diagonally pinned pawn may only capture along its pin ray.
        if snap.pin_diagonal.contains(source) && !snap.pin_diagonal.contains(ep_target) {
            continue;
        }

        // Discovered-check guard: the capture lifts two pawns off one
        // rank. If our king shares that rank with an enemy rook or queen,
        // re-scan the rank with both pawns removed.
        if snap.king.row() == captured_sq.row() {
            let rank = Bitboard::row_mask(snap.king.row());
            let rank_sliders = (pos.pieces(PieceType::Rook, !us)
                | pos.pieces(PieceType::Queen, !us))
                & rank;
            if !rank_sliders.is_empty() {
                let cleared = snap.occupied
                    ^ Bitboard::from_square(source)
                    ^ Bitboard::from_square(captured_sq);
                let exposed =
                    attack_tables::rook_attacks(snap.king, cleared) & rank_sliders;
                if !exposed.is_empty() {
                    continue;
                }
            }
        }

        list.push(Move::new(source, ep_target, pawn, true));
    }
}

/// Expand a promotion square into its four moves, gated by noisiness:
/// queen promotions are always noisy, underpromotions inherit the capture
/// flag (push-underpromotions are quiet).
fn push_promotions<const QUIET: bool, const NOISY: bool>(
    list: &mut MoveList,
    source: Square,
    target: Square,
    us: Color,
    is_capture: bool,
) {
    let pawn = Piece::new(PieceType::Pawn, us);
    if NOISY {
        let queen = Piece::new(PieceType::Queen, us);
        list.push(Move::new_promotion(source, target, pawn, queen, is_capture));
    }
    if QUIET || is_capture {
        for &piece_type in &PROMOTION_TYPES[1..] {
            let promotion = Piece::new(piece_type, us);
            list.push(Move::new_promotion(
                source, target, pawn, promotion, is_capture,
            ));
        }
    }
}
