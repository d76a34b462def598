//! Search behavior tests exercised through the public API.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use cardinal::board::search::{self, Limits, Report, SearchState, MATE};
use cardinal::board::{NullEvaluator, Position, SearchError};

fn run(fen: &str, limits: &Limits) -> search::SearchOutcome {
    let mut position = Position::from_fen(fen).unwrap();
    let mut state = SearchState::default();
    let stop = AtomicBool::new(false);
    search::search(&mut position, &mut state, limits, &stop).unwrap()
}

#[test]
fn test_finds_mate_in_one() {
    let outcome = run("6k1/R7/6K1/8/8/8/8/8 w - - 0 1", &Limits::depth(4));
    assert_eq!(outcome.best_move.unwrap().to_string(), "a7a8");
    assert_eq!(outcome.score, MATE - 1);
}

#[test]
fn test_finds_ladder_mate_in_two() {
    // One rook seals the seventh rank, the other mates along the eighth
    let outcome = run("3k4/8/8/8/8/8/6R1/K6R w - - 0 1", &Limits::depth(6));
    let best = outcome.best_move.unwrap().to_string();
    assert!(best == "g2g7" || best == "h1h7", "unexpected move {best}");
    assert_eq!(outcome.score, MATE - 3);
}

#[test]
fn test_checkmated_position_scores_mated_now() {
    let outcome = run("R5k1/5ppp/8/8/8/8/8/4K3 b - - 0 1", &Limits::depth(3));
    assert!(outcome.best_move.is_none());
    assert_eq!(outcome.score, -MATE);
    assert!(outcome.pv.is_empty());
}

#[test]
fn test_stalemate_scores_draw() {
    let outcome = run("k7/8/1Q6/8/8/8/8/4K3 b - - 0 1", &Limits::depth(3));
    assert!(outcome.best_move.is_none());
    assert_eq!(outcome.score, 0);
}

#[test]
fn test_illegal_position_is_rejected() {
    // White to move while the black king is already in check
    let mut position = Position::from_fen("4k3/4R3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let mut state = SearchState::default();
    let stop = AtomicBool::new(false);
    let result = search::search(&mut position, &mut state, &Limits::depth(3), &stop);
    assert!(matches!(result, Err(SearchError::IllegalPosition)));
}

#[test]
fn test_obvious_recapture_is_preferred() {
    // Black queen just took on d4; taking it back wins a queen
    let outcome = run(
        "rnb1kbnr/ppp1pppp/8/8/3q4/8/PPP1PPPP/RNBQKBNR w KQkq - 0 3",
        &Limits::depth(5),
    );
    assert_eq!(outcome.best_move.unwrap().to_string(), "d1d4");
    assert!(outcome.score > 500);
}

#[test]
fn test_deterministic_under_node_limit() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut limits = Limits::depth(64);
    limits.nodes = 40_000;

    let first = run(fen, &limits);
    let second = run(fen, &limits);

    assert_eq!(first.nodes, second.nodes);
    assert_eq!(first.score, second.score);
    assert_eq!(
        first.pv.iter().map(ToString::to_string).collect::<Vec<_>>(),
        second.pv.iter().map(ToString::to_string).collect::<Vec<_>>()
    );
}

#[test]
fn test_node_limit_is_respected() {
    let mut limits = Limits::depth(64);
    limits.nodes = 10_000;
    let outcome = run(cardinal::board::START_FEN, &limits);
    // The probe fires on the node after the limit; allow one batch of slack
    assert!(outcome.nodes <= 12_000);
    assert!(outcome.best_move.is_some());
}

#[test]
fn test_stop_probe_halts_search() {
    let calls = Arc::new(AtomicU64::new(0));
    let probe_calls = Arc::clone(&calls);

    let mut limits = Limits::depth(64);
    limits.stop_probe = Some(Box::new(move || {
        probe_calls.fetch_add(1, Ordering::Relaxed) > 5_000
    }));

    let outcome = run(cardinal::board::START_FEN, &limits);
    assert!(calls.load(Ordering::Relaxed) > 5_000);
    // The partial iteration is discarded but earlier ones survive
    assert!(outcome.best_move.is_some());
}

#[test]
fn test_report_sink_sees_increasing_depths() {
    let depths = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink_depths = Arc::clone(&depths);

    let mut limits = Limits::depth(6);
    limits.report_sink = Some(Arc::new(move |report: &Report| {
        sink_depths.lock().unwrap().push(report.depth);
    }));

    let outcome = run(cardinal::board::START_FEN, &limits);
    let depths = depths.lock().unwrap();
    assert_eq!(outcome.depth, 6);
    assert_eq!(*depths, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_pv_starts_with_best_move_and_is_playable() {
    let outcome = run(
        "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
        &Limits::depth(6),
    );
    assert_eq!(outcome.pv[0], outcome.best_move.unwrap());

    // The PV must be a legal line
    let mut position =
        Position::from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3")
            .unwrap();
    for mv in &outcome.pv {
        let parsed = position.parse_move(&mv.to_string()).unwrap();
        position.make_move(parsed);
    }
}

#[test]
fn test_tt_reuse_across_searches() {
    let mut position =
        Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
    let mut state = SearchState::default();
    let stop = AtomicBool::new(false);

    let first = search::search(&mut position, &mut state, &Limits::depth(5), &stop).unwrap();
    // Same position again: the warm table must not corrupt the result
    let second = search::search(&mut position, &mut state, &Limits::depth(5), &stop).unwrap();

    assert!(first.best_move.is_some());
    assert!(second.best_move.is_some());
    assert_eq!(second.depth, 5);
}

#[test]
fn test_evaluator_is_pluggable() {
    // With the null evaluator every quiet line scores the same, but
    // mates are still found: the evaluator contract is orthogonal to
    // search correctness.
    let mut position =
        Position::from_fen_with("6k1/R7/6K1/8/8/8/8/8 w - - 0 1", Box::new(NullEvaluator))
            .unwrap();
    let mut state = SearchState::default();
    let stop = AtomicBool::new(false);
    let outcome = search::search(&mut position, &mut state, &Limits::depth(4), &stop).unwrap();
    assert_eq!(outcome.best_move.unwrap().to_string(), "a7a8");
    assert_eq!(outcome.score, MATE - 1);
}

#[test]
fn test_repeated_position_scores_draw() {
    // Shuffle into a threefold, then search: the root is a draw
    let mut position = Position::new();
    for uci in ["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8"] {
        let mv = position.parse_move(uci).unwrap();
        position.make_move(mv);
    }
    let mut state = SearchState::default();
    let stop = AtomicBool::new(false);
    let outcome = search::search(&mut position, &mut state, &Limits::depth(3), &stop).unwrap();
    assert_eq!(outcome.score, 0);
}
