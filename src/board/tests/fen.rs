//! FEN round-trip and error tests.

use crate::board::{FenError, Position, START_FEN};

/// Parse-then-serialize must reproduce each FEN byte for byte.
const ROUND_TRIP_FENS: [&str; 7] = [
    START_FEN,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
    "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
    "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
    "8/5k2/8/8/8/8/5K2/4R3 w - - 12 34",
];

#[test]
fn test_fen_round_trips() {
    for fen in ROUND_TRIP_FENS {
        let position = Position::from_fen(fen).unwrap();
        assert_eq!(position.to_fen(), fen);
    }
}

#[test]
fn test_start_position_basics() {
    let position = Position::new();
    assert_eq!(position.occupied().popcount(), 32);
    assert_eq!(position.full_moves(), 1);
    assert_eq!(position.draw_clock(), 0);
    assert!(position.en_passant_target().is_none());
}

#[test]
fn test_missing_fields_rejected() {
    assert_eq!(
        Position::from_fen("8/8/8/8/8/8/8/8 w - -").unwrap_err(),
        FenError::WrongFieldCount { found: 4 }
    );
    assert!(Position::from_fen("").is_err());
}

#[test]
fn test_bad_piece_character_rejected() {
    let result = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1");
    assert_eq!(result.unwrap_err(), FenError::InvalidPiece { char: 'X' });
}

#[test]
fn test_bad_rank_shape_rejected() {
    // Nine files in one rank
    assert!(matches!(
        Position::from_fen("rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
        Err(FenError::BadRankLength { .. })
    ));
    // Seven ranks
    assert!(matches!(
        Position::from_fen("rnbqkbnr/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
        Err(FenError::BadRankCount { found: 7 })
    ));
}

#[test]
fn test_bad_metadata_rejected() {
    assert!(matches!(
        Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"),
        Err(FenError::InvalidSideToMove { .. })
    ));
    assert!(matches!(
        Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KXkq - 0 1"),
        Err(FenError::InvalidCastling { char: 'X' })
    ));
    assert!(matches!(
        Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e9 0 1"),
        Err(FenError::InvalidEnPassant { .. })
    ));
    assert!(matches!(
        Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1"),
        Err(FenError::InvalidCounter { .. })
    ));
}

#[test]
fn test_king_count_enforced() {
    assert_eq!(
        Position::from_fen("8/8/8/8/8/8/8/K7 w - - 0 1").unwrap_err(),
        FenError::InvalidKingCount
    );
    assert_eq!(
        Position::from_fen("kk6/8/8/8/8/8/8/K7 w - - 0 1").unwrap_err(),
        FenError::InvalidKingCount
    );
}

#[test]
fn test_uncapturable_ep_target_is_dropped() {
    // No white pawn can take on d6, so the ep target must not survive
    // parsing and must not be hashed.
    let position =
        Position::from_fen("rnbqkbnr/ppp1pppp/8/3p4/8/4P3/PPPP1PPP/RNBQKBNR w KQkq d6 0 2")
            .unwrap();
    assert!(position.en_passant_target().is_none());
    assert_eq!(position.hash(), position.hash_from_scratch());
}

#[test]
fn test_parse_move_round_trip() {
    let position = Position::new();
    let mv = position.parse_move("e2e4").unwrap();
    assert_eq!(mv.to_string(), "e2e4");
    assert!(position.parse_move("e2e5").is_err());
    assert!(position.parse_move("e2").is_err());
    assert!(position.parse_move("z9e4").is_err());
}

#[test]
fn test_parse_promotion_move() {
    let position = Position::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
    let mv = position.parse_move("a7a8q").unwrap();
    assert!(mv.is_promotion());
    assert_eq!(mv.to_string(), "a7a8q");
    assert!(position.parse_move("a7a8k").is_err());
}
