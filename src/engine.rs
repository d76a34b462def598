//! The search driver: a long-lived context owning a position and the
//! search session state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::board::search::{self, Limits, SearchOutcome, SearchState, DEFAULT_TT_MB};
use crate::board::{FenError, Move, MoveParseError, Position, SearchError};

/// An engine session: a position, a transposition table and the killer
/// and history tables, reused across searches.
pub struct Context {
    position: Position,
    state: SearchState,
    stop: Arc<AtomicBool>,
}

impl Context {
    /// An empty context holding the starting position and a default-sized
    /// transposition table.
    #[must_use]
    pub fn new() -> Self {
        Context {
            position: Position::new(),
            state: SearchState::new(DEFAULT_TT_MB),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the position from a FEN string.
    pub fn set_position(&mut self, fen: &str) -> Result<(), FenError> {
        self.position = Position::from_fen(fen)?;
        #[cfg(feature = "logging")]
        log::debug!("position set to {fen}");
        Ok(())
    }

    /// Play a sequence of long-algebraic moves from the current position.
    /// Stops at the first unparsable or illegal move.
    pub fn play_moves<'a, I>(&mut self, moves: I) -> Result<(), MoveParseError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for text in moves {
            let mv = self.position.parse_move(text)?;
            self.position.make_move(mv);
        }
        Ok(())
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The legal moves of the current position.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        self.position.legal_moves().as_slice().to_vec()
    }

    /// Run a search under the given limits. The shared stop flag is
    /// rearmed first, so a `stop()` from a previous search does not leak
    /// into this one.
    pub fn search(&mut self, limits: &Limits) -> Result<SearchOutcome, SearchError> {
        self.stop.store(false, Ordering::Relaxed);
        search::search(&mut self.position, &mut self.state, limits, &self.stop)
    }

    /// Request cancellation of a running search; it returns its last
    /// completed iteration at the next stop probe.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// A clone of the stop flag, for callers driving `stop()` from
    /// another thread.
    #[must_use]
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Resize the transposition table to a new megabyte budget.
    pub fn resize_tt(&mut self, size_mb: usize) {
        self.state.resize_tt(size_mb);
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}
