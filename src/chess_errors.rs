//! Errors used throughout the chess engine.
//!
//! `ChessError` is the single caller-facing error type of the crate. Parsing
//! helpers, the search factories and the UCI front end return it for
//! recoverable failures such as malformed FEN, unknown moves or out-of-range
//! search limits. Broken internal invariants are not represented here; they
//! are debug assertions inside the board code.

use thiserror::Error;

/// Unified error type for the chess engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    /// A FEN string could not be turned into a position.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// A square coordinate such as `e4` was malformed.
    #[error("invalid square: {0}")]
    InvalidSquare(String),

    /// A coordinate move such as `e7e8q` was malformed.
    #[error("invalid move notation: {0}")]
    InvalidMoveNotation(String),

    /// A well-formed move that is not legal in the given position.
    ///
    /// Payload: (move text, FEN of the position it was tried in)
    #[error("illegal move {0} in position {1}")]
    IllegalMove(String, String),

    /// A search limit was outside its accepted range.
    #[error("invalid search parameter: {0}")]
    InvalidSearchParameter(String),

    /// The search worker could not be started or joined.
    #[error("search thread failure: {0}")]
    SearchThread(String),
}

pub type ChessResult<T> = Result<T, ChessError>;
