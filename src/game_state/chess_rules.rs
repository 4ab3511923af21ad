//! Canonical chess-rule and engine-limit constants.
//!
//! This module stores static rule-related literals such as the standard
//! starting position FEN, the search height/depth ceilings and the score
//! scale shared by evaluation and search.

use std::time::Duration;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Maximum search height in plies.
pub const MAX_PLY: usize = 256;

/// Maximum iterative-deepening depth.
pub const MAX_DEPTH: i32 = 64;

/// Capacity of a single move list; no legal chess position exceeds it.
pub const MAX_MOVES: usize = 256;

/// Undo snapshots kept per position: search height plus game history.
pub const MAX_UNDO_STATES: usize = MAX_PLY + 1024;

/// Halfmove clock value at which the fifty-move rule draws the game.
pub const FIFTY_MOVE_LIMIT: u16 = 100;

/// Largest fullmove number a position accepts.
pub const MAX_FULLMOVE_NUMBER: u32 = 1_000_000;

/// Moves-to-go assumed when the clock does not say.
pub const DEFAULT_MOVES_TO_GO: u32 = 40;

/// Minimum spacing between unforced status reports.
pub const STATUS_INTERVAL: Duration = Duration::from_millis(1000);

// Score scale, always from the side to move.
pub const INFINITE: i32 = 200_000;
pub const CHECKMATE: i32 = 100_000;
pub const CHECKMATE_THRESHOLD: i32 = CHECKMATE - MAX_PLY as i32;
pub const DRAW: i32 = 0;

/// True when `value` encodes a forced mate for either side.
#[inline]
pub fn is_checkmate_value(value: i32) -> bool {
    let absolute = value.abs();
    absolute >= CHECKMATE_THRESHOLD && absolute <= CHECKMATE
}
