//! Search constants and tuned margins.

use crate::board::MAX_DEPTH;

/// Mate at the root; `MATE - ply` encodes shallower mates as higher scores.
pub const MATE: i32 = 32000;

/// Window bound strictly above every reachable score.
pub const INFINITY: i32 = 32500;

/// Scores at or beyond this magnitude encode a mate distance.
pub(crate) const MATE_THRESHOLD: i32 = MATE - 2 * MAX_DEPTH as i32;

pub(crate) const DRAW: i32 = 0;

/// Checkmate score at a given ply from the root (being mated is negative).
#[inline]
#[must_use]
pub const fn mated_in(ply: usize) -> i32 {
    -MATE + ply as i32
}

/// Is this score a forced-mate score (for either side)?
#[inline]
#[must_use]
pub const fn is_mate_score(value: i32) -> bool {
    value.abs() >= MATE_THRESHOLD
}

/// Full moves until mate for a mate score, negative when getting mated.
#[inline]
#[must_use]
pub const fn moves_to_mate(value: i32) -> i32 {
    if value > 0 {
        (MATE - value + 1) / 2
    } else {
        -(MATE + value + 1) / 2
    }
}

// Iterative deepening / aspiration
pub(crate) const ASPIRATION_MIN_DEPTH: i32 = 5;
pub(crate) const ASPIRATION_WINDOW: i32 = 50;

// Whole-node pruning margins
pub(crate) const RFP_MAX_DEPTH: i32 = 5;
pub(crate) const RFP_MARGIN: i32 = 75;
pub(crate) const RAZOR_MAX_DEPTH: i32 = 3;
pub(crate) const RAZOR_MARGIN: i32 = 200;
pub(crate) const NULL_MOVE_MIN_DEPTH: i32 = 3;

// Internal iterative reduction
pub(crate) const IIR_MIN_DEPTH: i32 = 4;

// Late move reductions
pub(crate) const LMR_MIN_DEPTH: i32 = 3;
pub(crate) const LMR_MOVE_THRESHOLD_PV: usize = 4;
pub(crate) const LMR_MOVE_THRESHOLD_NON_PV: usize = 2;

// History heuristic
pub(crate) const HISTORY_BONUS_PER_DEPTH: i32 = 155;
pub(crate) const HISTORY_MAX_BONUS: i32 = 2000;
pub(crate) const HISTORY_LIMIT: i32 = 32768;

// Move ordering tiers: TT move > captures/promotions > killers > history
pub(crate) const TT_MOVE_SCORE: i32 = 1 << 20;
pub(crate) const CAPTURE_BASE_SCORE: i32 = 100_000;
pub(crate) const KILLER_1_SCORE: i32 = 50_000;
pub(crate) const KILLER_2_SCORE: i32 = 45_000;

/// The stop probe fires every time this many nodes have been visited.
pub(crate) const STOP_PROBE_MASK: u64 = 2047;
