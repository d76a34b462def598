// Crate root - export modules
pub mod board;
pub mod engine;
pub mod tt;
pub mod zobrist;
