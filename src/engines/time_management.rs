//! Clock budgeting for tournament time controls.
//!
//! The GUI sends raw clock data; the engine turns the side to move's share of
//! it into a single per-move search budget.

use std::time::Duration;

use crate::chess_errors::{ChessError, ChessResult};
use crate::engines::engine_trait::GoParams;
use crate::game_state::chess_rules::DEFAULT_MOVES_TO_GO;
use crate::game_state::chess_types::Color;

/// Percentage of the remaining clock the budget may touch.
const SAFETY_PERCENT: u64 = 95;
/// Reserve kept back for transmission latency.
const LATENCY_RESERVE_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockParams {
    pub light_time_left: Duration,
    pub light_increment: Duration,
    pub dark_time_left: Duration,
    pub dark_increment: Duration,
    /// Zero when unknown.
    pub moves_to_go: u32,
}

impl ClockParams {
    /// Clock state from `go` arguments. A missing clock counts as 1 ms, a
    /// missing increment as zero.
    pub fn from_go_params(params: &GoParams) -> Self {
        Self {
            light_time_left: Duration::from_millis(params.wtime_ms.unwrap_or(1)),
            light_increment: Duration::from_millis(params.winc_ms.unwrap_or(0)),
            dark_time_left: Duration::from_millis(params.btime_ms.unwrap_or(1)),
            dark_increment: Duration::from_millis(params.binc_ms.unwrap_or(0)),
            moves_to_go: params.movestogo.unwrap_or(0),
        }
    }

    pub fn validate(&self) -> ChessResult<()> {
        if self.light_time_left < Duration::from_millis(1)
            || self.dark_time_left < Duration::from_millis(1)
        {
            return Err(ChessError::InvalidSearchParameter(format!(
                "clock times must be at least 1 ms (wtime {} ms, btime {} ms)",
                self.light_time_left.as_millis(),
                self.dark_time_left.as_millis()
            )));
        }
        Ok(())
    }

    /// Per-move budget for `color`.
    pub fn budget(&self, color: Color) -> Duration {
        let (time_left, increment) = match color {
            Color::Light => (self.light_time_left, self.light_increment),
            Color::Dark => (self.dark_time_left, self.dark_increment),
        };
        Duration::from_millis(clock_budget_ms(
            time_left.as_millis() as u64,
            increment.as_millis() as u64,
            self.moves_to_go,
        ))
    }
}

/// Spread the usable part of the clock evenly over the moves to go, crediting
/// the increments still to come. Never exceeds the usable maximum and never
/// returns zero.
pub fn clock_budget_ms(time_left_ms: u64, increment_ms: u64, moves_to_go: u32) -> u64 {
    let moves_to_go = if moves_to_go == 0 {
        DEFAULT_MOVES_TO_GO
    } else {
        moves_to_go
    };
    let moves_to_go = u64::from(moves_to_go);

    let max_ms = (time_left_ms.saturating_mul(SAFETY_PERCENT) / 100)
        .saturating_sub(LATENCY_RESERVE_MS)
        .max(1);

    let budget = max_ms.saturating_add((moves_to_go - 1).saturating_mul(increment_ms)) / moves_to_go;
    budget.clamp(1, max_ms)
}
