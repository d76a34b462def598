//! Iterative deepening with aspiration windows.

use std::time::Instant;

use super::alphabeta::{PvLine, Searcher};
use super::constants::{
    is_mate_score, moves_to_mate, ASPIRATION_MIN_DEPTH, ASPIRATION_WINDOW, INFINITY,
};
use super::{Report, ReportCallback, SearchOutcome};

/// Deepen until the depth limit or a stop. Each completed iteration
/// replaces the held PV; a stopped iteration is discarded and the
/// previous iteration's result stands.
pub(super) fn iterate(
    searcher: &mut Searcher,
    max_depth: i32,
    report_sink: Option<&ReportCallback>,
) -> SearchOutcome {
    let start = Instant::now();
    let mut pv: Vec<crate::board::Move> = Vec::new();
    let mut score = 0;
    let mut completed_depth = 0u32;

    for depth in 1..=max_depth {
        let Some((line, value)) = aspiration(searcher, depth, score) else {
            break;
        };

        score = value;
        completed_depth = depth as u32;
        if !line.moves().is_empty() {
            pv = line.moves().to_vec();
        }

        if let Some(sink) = report_sink {
            sink(&Report {
                depth: completed_depth,
                seldepth: searcher.state.stats.seldepth,
                score,
                mate_in: is_mate_score(score).then(|| moves_to_mate(score)),
                nodes: searcher.nodes,
                time_ms: start.elapsed().as_millis() as u64,
                pv: pv.clone(),
            });
        }

        #[cfg(feature = "logging")]
        log::debug!(
            "depth {completed_depth} score {score} nodes {} pv {}",
            searcher.nodes,
            pv.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        );

        // A forced mate cannot be improved by deepening.
        if is_mate_score(score) {
            break;
        }
    }

    SearchOutcome {
        best_move: pv.first().copied(),
        pv,
        score,
        depth: completed_depth,
        nodes: searcher.nodes,
    }
}

/// One depth iteration inside an aspiration window seeded from the
/// previous score. A fail-low widens alpha and restarts at the intended
/// depth; a fail-high widens beta and retries one ply shallower; every
/// re-search grows the window half again.
fn aspiration(searcher: &mut Searcher, depth: i32, guess: i32) -> Option<(PvLine, i32)> {
    let mut window = ASPIRATION_WINDOW;
    let (mut alpha, mut beta) = if depth >= ASPIRATION_MIN_DEPTH {
        (
            (guess - window).max(-INFINITY),
            (guess + window).min(INFINITY),
        )
    } else {
        (-INFINITY, INFINITY)
    };
    let mut search_depth = depth;

    loop {
        let mut line = PvLine::new();
        let value = searcher.negamax(0, search_depth, alpha, beta, &mut line);
        if searcher.stopped {
            return None;
        }

        // Mate scores sit outside any window; accept them immediately.
        if is_mate_score(value) {
            return Some((line, value));
        }

        if value <= alpha {
            alpha = (value - window).max(-INFINITY);
            search_depth = depth;
        } else if value >= beta {
            beta = (value + window).min(INFINITY);
            search_depth = (search_depth - 1).max(1);
        } else {
            return Some((line, value));
        }

        window += window / 2;
    }
}
