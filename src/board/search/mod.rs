//! Search module implementing alpha-beta with iterative deepening.
//!
//! Features:
//! - Iterative deepening with aspiration windows
//! - Principal-variation search with null-window re-searches
//! - Transposition table cutoffs and move ordering
//! - Null move pruning, reverse futility, razoring
//! - Internal iterative reduction and late move reductions
//! - Check extensions
//! - Quiescence search with stand-pat
//! - Move ordering (TT move, MVV-LVA, killers, relative history)
//! - Cooperative interruption through a polled stop probe

mod alphabeta;
mod constants;
mod iterative;
mod move_order;
mod quiescence;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::error::SearchError;
use super::types::{Color, Move, MAX_DEPTH};
use super::Position;
use crate::tt::TranspositionTable;

pub use constants::{is_mate_score, mated_in, moves_to_mate, INFINITY, MATE};

/// Default transposition table size in MiB.
pub const DEFAULT_TT_MB: usize = 16;

/// Statistics tracked during a search.
#[derive(Default)]
pub struct SearchStats {
    pub nodes: u64,
    pub seldepth: u32,
    pub tt_hits: u64,
}

/// Tables that persist across searches: the TT, killers and history.
pub(crate) struct SearchTables {
    pub tt: TranspositionTable,
    pub killers: [[Move; 2]; MAX_DEPTH],
    /// Quiet-move history indexed `[color][from][to]`.
    pub history: [[[i32; 64]; 64]; 2],
}

impl SearchTables {
    fn new(tt_mb: usize) -> Self {
        SearchTables {
            tt: TranspositionTable::new(tt_mb),
            killers: [[Move::NULL; 2]; MAX_DEPTH],
            history: [[[0; 64]; 64]; 2],
        }
    }

    /// Record a quiet move that caused a beta cutoff; the previous first
    /// killer is demoted to the second slot.
    pub fn store_killer(&mut self, ply: usize, mv: Move) {
        if self.killers[ply][0] != mv {
            self.killers[ply][1] = self.killers[ply][0];
            self.killers[ply][0] = mv;
        }
    }

    #[inline]
    pub fn history_score(&self, color: Color, mv: Move) -> i32 {
        self.history[color.index()][mv.source().index()][mv.target().index()]
    }

    /// Relative-history update: the gravity term keeps every entry inside
    /// `±HISTORY_LIMIT` and makes repeated bonuses saturate.
    pub fn update_history(&mut self, color: Color, mv: Move, bonus: i32) {
        let entry =
            &mut self.history[color.index()][mv.source().index()][mv.target().index()];
        *entry += bonus - *entry * bonus.abs() / constants::HISTORY_LIMIT;
    }
}

/// Search state persisted across searches within one session.
pub struct SearchState {
    pub(crate) tables: SearchTables,
    pub stats: SearchStats,
}

impl SearchState {
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        SearchState {
            tables: SearchTables::new(tt_mb),
            stats: SearchStats::default(),
        }
    }

    /// Prepare for a new root search: age the TT, clear the killers and
    /// decay history so stale biases fade.
    pub fn new_search(&mut self) {
        self.tables.tt.next_epoch();
        self.stats = SearchStats::default();
        for killers in self.tables.killers.iter_mut() {
            *killers = [Move::NULL; 2];
        }
        for color in self.tables.history.iter_mut() {
            for from in color.iter_mut() {
                for entry in from.iter_mut() {
                    *entry >>= 2;
                }
            }
        }
    }

    /// Replace the transposition table with one of a new size.
    pub fn resize_tt(&mut self, tt_mb: usize) {
        self.tables.tt.resize(tt_mb);
    }
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::new(DEFAULT_TT_MB)
    }
}

/// Information about a completed search iteration.
#[derive(Debug, Clone)]
pub struct Report {
    pub depth: u32,
    pub seldepth: u32,
    pub score: i32,
    /// Full moves to mate when the score is a mate score.
    pub mate_in: Option<i32>,
    pub nodes: u64,
    pub time_ms: u64,
    pub pv: Vec<Move>,
}

/// Callback invoked with a `Report` after every completed iteration.
pub type ReportCallback = Arc<dyn Fn(&Report) + Send + Sync>;

/// Caller-provided cancellation probe, polled from inside the search.
pub type StopProbe = Box<dyn Fn() -> bool + Send>;

/// Limits for one search call.
pub struct Limits {
    /// Maximum iteration depth, clamped to `[1, MAX_DEPTH]`.
    pub depth: u32,
    /// Node budget; 0 means unlimited.
    pub nodes: u64,
    /// Infinite mode relaxes stop-probe polling to the node interval.
    pub infinite: bool,
    pub stop_probe: Option<StopProbe>,
    pub report_sink: Option<ReportCallback>,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            depth: MAX_DEPTH as u32,
            nodes: 0,
            infinite: false,
            stop_probe: None,
            report_sink: None,
        }
    }
}

impl Limits {
    #[must_use]
    pub fn depth(depth: u32) -> Self {
        Limits {
            depth,
            ..Limits::default()
        }
    }

    #[must_use]
    pub fn nodes(nodes: u64) -> Self {
        Limits {
            nodes,
            ..Limits::default()
        }
    }
}

/// Outcome of a search: the principal variation of the last completed
/// iteration and its score.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best_move: Option<Move>,
    pub pv: Vec<Move>,
    pub score: i32,
    pub depth: u32,
    pub nodes: u64,
}

/// Wall-clock plumbing for callers that stop searches by deadline. The
/// deadline lives behind a mutex so a GUI thread can reset it while a
/// search polls `expired` through its stop probe.
pub struct SearchClock {
    start: Mutex<Instant>,
    deadline: Mutex<Option<Instant>>,
}

impl SearchClock {
    #[must_use]
    pub fn new(deadline: Option<Duration>) -> Self {
        let now = Instant::now();
        SearchClock {
            start: Mutex::new(now),
            deadline: Mutex::new(deadline.map(|d| now + d)),
        }
    }

    pub fn reset(&self, deadline: Option<Duration>) {
        let now = Instant::now();
        *self.start.lock() = now;
        *self.deadline.lock() = deadline.map(|d| now + d);
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.lock().elapsed()
    }

    #[must_use]
    pub fn expired(&self) -> bool {
        self.deadline
            .lock()
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// A stop probe that fires when the deadline passes.
    #[must_use]
    pub fn stop_probe(self: Arc<Self>) -> StopProbe {
        Box::new(move || self.expired())
    }
}

/// Run a search on the position under the given limits.
///
/// Returns `SearchError::IllegalPosition` when the side not to move is in
/// check. Terminal positions are not errors: searching a checkmate yields
/// `mated_in(0)` and no best move.
pub fn search(
    position: &mut Position,
    state: &mut SearchState,
    limits: &Limits,
    stop: &AtomicBool,
) -> Result<SearchOutcome, SearchError> {
    if !position.is_legal() {
        return Err(SearchError::IllegalPosition);
    }

    state.new_search();
    let max_depth = limits.depth.clamp(1, MAX_DEPTH as u32) as i32;

    let mut searcher = alphabeta::Searcher {
        position: &mut *position,
        state: &mut *state,
        stop_flag: stop,
        stop_probe: limits.stop_probe.as_deref(),
        node_limit: limits.nodes,
        infinite: limits.infinite,
        nodes: 0,
        stopped: false,
    };

    let outcome = iterative::iterate(&mut searcher, max_depth, limits.report_sink.as_ref());

    let nodes = searcher.nodes;
    state.stats.nodes = nodes;
    Ok(outcome)
}
