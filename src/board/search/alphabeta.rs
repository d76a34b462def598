//! The principal-variation negamax search.

use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::Lazy;

use super::constants::{
    mated_in, DRAW, IIR_MIN_DEPTH, INFINITY, LMR_MIN_DEPTH, LMR_MOVE_THRESHOLD_NON_PV,
    LMR_MOVE_THRESHOLD_PV, MATE_THRESHOLD, NULL_MOVE_MIN_DEPTH, RAZOR_MARGIN, RAZOR_MAX_DEPTH,
    RFP_MARGIN, RFP_MAX_DEPTH, STOP_PROBE_MASK,
};
use super::SearchState;
use crate::board::types::{Move, MAX_DEPTH, MAX_MOVES};
use crate::board::Position;
use crate::tt::Bound;

/// A principal variation line, built bottom-up as alpha is raised.
pub(super) struct PvLine {
    len: usize,
    moves: [Move; MAX_DEPTH],
}

impl PvLine {
    pub fn new() -> Self {
        PvLine {
            len: 0,
            moves: [Move::NULL; MAX_DEPTH],
        }
    }

    #[inline]
    fn clear(&mut self) {
        self.len = 0;
    }

    /// This node's line becomes `mv` followed by the child's line.
    fn load(&mut self, mv: Move, child: &PvLine) {
        self.moves[0] = mv;
        self.moves[1..=child.len].copy_from_slice(&child.moves[..child.len]);
        self.len = child.len + 1;
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves[..self.len]
    }
}

/// Log-log reduction table for late moves.
static LMR_TABLE: Lazy<[[i32; 64]; 64]> = Lazy::new(|| {
    let mut table = [[0i32; 64]; 64];
    for (depth, row) in table.iter_mut().enumerate().skip(1) {
        for (index, cell) in row.iter_mut().enumerate().skip(1) {
            *cell = (0.53 + (depth as f64).ln() * (index as f64).ln() / 2.44) as i32;
        }
    }
    table
});

#[inline]
fn lmr_reduction(depth: i32, move_index: usize) -> i32 {
    LMR_TABLE[(depth as usize).min(63)][move_index.min(63)]
}

pub(super) struct Searcher<'a> {
    pub position: &'a mut Position,
    pub state: &'a mut SearchState,
    pub stop_flag: &'a AtomicBool,
    pub stop_probe: Option<&'a (dyn Fn() -> bool + Send)>,
    pub node_limit: u64,
    pub infinite: bool,
    pub nodes: u64,
    pub stopped: bool,
}

impl Searcher<'_> {
    /// Poll the cancellation sources. Outside infinite mode the probe runs
    /// every node; in infinite mode only at the node interval.
    pub(super) fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        if !self.infinite || self.nodes & STOP_PROBE_MASK == 0 {
            if self.stop_flag.load(Ordering::Relaxed)
                || self.stop_probe.is_some_and(|probe| probe())
            {
                self.stopped = true;
            }
        }
        if self.node_limit > 0 && self.nodes >= self.node_limit {
            self.stopped = true;
        }
        self.stopped
    }

    #[inline]
    fn note_ply(&mut self, ply: usize) {
        self.nodes += 1;
        self.state.stats.seldepth = self.state.stats.seldepth.max(ply as u32);
    }

    /// Negamax with a principal-variation window discipline: the first
    /// move is searched with the full window, later moves with a null
    /// window, re-searched on a fail-high inside a PV node.
    ///
    /// The sentinel 0 returned after a stop is never trusted: every
    /// ancestor checks `stopped` before using child values.
    pub(super) fn negamax(
        &mut self,
        ply: usize,
        mut depth: i32,
        mut alpha: i32,
        beta: i32,
        pv: &mut PvLine,
    ) -> i32 {
        pv.clear();
        self.note_ply(ply);

        if self.should_stop() {
            return 0;
        }

        let is_pv = beta - alpha > 1;

        if ply > 0 {
            if self.position.is_fifty_move_draw() {
                return DRAW;
            }
            // Twofold repetition below the root suffices: if repeating is
            // best for the opponent the line is a draw anyway.
            if self.position.is_repetition() {
                return DRAW;
            }
        } else if self.position.repetitions() >= 2 || self.position.is_fifty_move_draw() {
            return DRAW;
        }

        if ply >= MAX_DEPTH {
            return self.position.evaluate();
        }
        if depth <= 0 {
            return self.quiescence(ply, alpha, beta);
        }

        let in_check = self.position.in_check();
        if in_check {
            depth += 1;
        }

        let moves = self.position.legal_moves();
        if moves.is_empty() {
            return if in_check { mated_in(ply) } else { DRAW };
        }

        // The TT move is always adopted for ordering; the value only
        // produces a cutoff outside the PV and at sufficient depth.
        let hash = self.position.hash();
        let mut tt_move = Move::NULL;
        if let Some(entry) = self.state.tables.tt.probe(hash, ply) {
            self.state.stats.tt_hits += 1;
            tt_move = entry.best_move;
            if !is_pv && i32::from(entry.depth) >= depth {
                match entry.bound {
                    Bound::Exact => return entry.value,
                    Bound::Lower if entry.value >= beta => return entry.value,
                    Bound::Upper if entry.value <= alpha => return entry.value,
                    _ => {}
                }
            }
        }

        // Internal iterative reduction: without a TT move, deep nodes are
        // cheaper to order one depth shallower.
        if depth >= IIR_MIN_DEPTH && tt_move.is_null() {
            depth -= 1;
        }

        if !is_pv && !in_check {
            if let Some(value) = self.prune_whole_node(ply, depth, alpha, beta) {
                return value;
            }
            if self.stopped {
                return 0;
            }
        }

        let us = self.position.side_to_move();
        let mut scored = super::move_order::score_moves(
            self.position,
            &self.state.tables,
            &moves,
            tt_move,
            ply,
        );

        let original_alpha = alpha;
        let mut best_value = -INFINITY;
        let mut best_move = Move::NULL;
        let mut tried: [Move; MAX_MOVES] = [Move::NULL; MAX_MOVES];
        let mut child_pv = PvLine::new();

        let mut index = 0;
        while let Some(scored_move) = scored.pick_best(index) {
            let mv = scored_move.mv;

            self.position.make_move(mv);

            let mut value;
            if index == 0 {
                value = -self.negamax(ply + 1, depth - 1, -beta, -alpha, &mut child_pv);
            } else {
                // Late move reduction: well-ordered late moves rarely beat
                // alpha, so try them shallower first.
                let threshold = if is_pv {
                    LMR_MOVE_THRESHOLD_PV
                } else {
                    LMR_MOVE_THRESHOLD_NON_PV
                };
                let mut reduction = 0;
                if depth >= LMR_MIN_DEPTH && !in_check && index > threshold {
                    reduction = lmr_reduction(depth, index).min(depth - 1);
                }

                value = -self.negamax(
                    ply + 1,
                    depth - 1 - reduction,
                    -alpha - 1,
                    -alpha,
                    &mut child_pv,
                );
                if reduction > 0 && value > alpha {
                    value = -self.negamax(ply + 1, depth - 1, -alpha - 1, -alpha, &mut child_pv);
                }
                if is_pv && value > alpha && value < beta {
                    value = -self.negamax(ply + 1, depth - 1, -beta, -alpha, &mut child_pv);
                }
            }

            self.position.unmake_move();

            if self.stopped {
                return 0;
            }

            if value > best_value {
                best_value = value;
                best_move = mv;

                if value > alpha {
                    alpha = value;
                    pv.load(mv, &child_pv);
                }

                if value >= beta {
                    if mv.is_quiet() {
                        self.state.tables.store_killer(ply, mv);
                    }
                    let bonus =
                        (super::constants::HISTORY_BONUS_PER_DEPTH * depth)
                            .min(super::constants::HISTORY_MAX_BONUS);
                    self.state.tables.update_history(us, mv, bonus);
                    for &earlier in &tried[..index] {
                        self.state.tables.update_history(us, earlier, -bonus);
                    }
                    break;
                }
            }

            tried[index] = mv;
            index += 1;
        }

        if self.stopped {
            return 0;
        }

        let bound = if best_value >= beta {
            Bound::Lower
        } else if best_value > original_alpha {
            Bound::Exact
        } else {
            Bound::Upper
        };
        self.state.tables.tt.store(
            hash,
            best_move,
            best_value,
            depth.clamp(0, u8::MAX as i32) as u8,
            bound,
            ply,
        );

        best_value
    }

    /// Static pruning that can cut the node before the move loop: reverse
    /// futility, razoring, and null-move pruning. Only sound outside the
    /// PV and out of check.
    fn prune_whole_node(
        &mut self,
        ply: usize,
        depth: i32,
        alpha: i32,
        beta: i32,
    ) -> Option<i32> {
        let eval = self.position.evaluate();

        // Reverse futility: far enough above beta that a shallow search
        // will not drop below it.
        if depth <= RFP_MAX_DEPTH
            && eval >= beta
            && eval - RFP_MARGIN * depth >= beta
            && beta.abs() < MATE_THRESHOLD
        {
            return Some(eval);
        }

        // Razoring: hopelessly below alpha; trust quiescence if it agrees.
        if depth <= RAZOR_MAX_DEPTH && eval + RAZOR_MARGIN * depth <= alpha {
            let value = self.quiescence(ply, alpha, beta);
            if self.stopped {
                return None;
            }
            if value <= alpha {
                return Some(value);
            }
        }

        // Null move: hand the opponent a free move; if the reduced search
        // still fails high the real position almost surely would too.
        // Unsound in pawn-only endings (zugzwang) and after another null.
        if depth >= NULL_MOVE_MIN_DEPTH
            && eval >= beta
            && self.position.has_non_pawn_material(self.position.side_to_move())
            && self.position.last_move() != Some(Move::NULL)
        {
            let reduction = 5 + (depth / 5).min(4) + ((eval - beta) / 214).min(3);
            let mut line = PvLine::new();
            self.position.make_move(Move::NULL);
            let value = -self.negamax(ply + 1, depth - reduction, -beta, -beta + 1, &mut line);
            self.position.unmake_move();
            if self.stopped {
                return None;
            }
            if value >= beta {
                // Never trust a mate from a null-move search.
                return Some(if value >= MATE_THRESHOLD { beta } else { value });
            }
        }

        None
    }
}
