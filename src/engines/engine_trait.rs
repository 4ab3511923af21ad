//! Engine-facing contracts shared by the search and the UCI subsystem.
//!
//! The search never writes protocol text itself. It hands progress, principal
//! variations and the final choice to a [`SearchReporter`], and the UCI layer
//! decides how to serialize them.

use std::time::Duration;

use crate::game_state::chess_rules::{is_checkmate_value, CHECKMATE};
use crate::moves::chess_move::Move;

/// Raw `go` arguments as received from the GUI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub depth: Option<i32>,
    pub nodes: Option<u64>,
    pub movetime_ms: Option<u64>,
    pub wtime_ms: Option<u64>,
    pub btime_ms: Option<u64>,
    pub winc_ms: Option<u64>,
    pub binc_ms: Option<u64>,
    pub movestogo: Option<u32>,
    pub ponder: bool,
    pub infinite: bool,
    pub searchmoves: Option<Vec<Move>>,
}

/// Periodic progress snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStatus {
    pub depth: i32,
    pub max_depth: i32,
    pub nodes: u64,
    pub elapsed: Duration,
    pub current_move: Option<Move>,
    pub current_move_number: usize,
}

impl SearchStatus {
    pub fn nodes_per_second(&self) -> u64 {
        let millis = self.elapsed.as_millis() as u64;
        if millis == 0 {
            0
        } else {
            self.nodes.saturating_mul(1000) / millis
        }
    }
}

/// Score as presented to the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportedScore {
    Centipawns(i32),
    /// Full moves to mate, negative when the side to move is getting mated.
    Mate(i32),
}

impl ReportedScore {
    pub fn from_value(value: i32) -> Self {
        if is_checkmate_value(value) {
            let plies = CHECKMATE - value.abs() + 1;
            ReportedScore::Mate(value.signum() * plies / 2)
        } else {
            ReportedScore::Centipawns(value)
        }
    }
}

/// A new best root move found during an iteration.
#[derive(Debug, Clone, Copy)]
pub struct PvReport<'a> {
    pub status: SearchStatus,
    pub score: ReportedScore,
    pub pv: &'a [Move],
}

/// Sink for everything a running search wants to tell its owner.
///
/// Called from the search worker thread.
pub trait SearchReporter: Send + 'static {
    /// Final answer. Both moves are `None` when the root has no legal move.
    fn send_best_move(&mut self, best_move: Option<Move>, ponder_move: Option<Move>);

    fn send_status(&mut self, status: &SearchStatus);

    fn send_move(&mut self, report: &PvReport<'_>);
}

#[cfg(test)]
mod tests {
    use super::{ReportedScore, SearchStatus};
    use crate::game_state::chess_rules::CHECKMATE;
    use std::time::Duration;

    #[test]
    fn mate_scores_report_full_moves() {
        assert_eq!(ReportedScore::from_value(CHECKMATE - 1), ReportedScore::Mate(1));
        assert_eq!(ReportedScore::from_value(CHECKMATE - 3), ReportedScore::Mate(2));
        assert_eq!(ReportedScore::from_value(-CHECKMATE + 2), ReportedScore::Mate(-1));
        assert_eq!(ReportedScore::from_value(-CHECKMATE + 4), ReportedScore::Mate(-2));
    }

    #[test]
    fn ordinary_scores_stay_centipawns() {
        assert_eq!(ReportedScore::from_value(0), ReportedScore::Centipawns(0));
        assert_eq!(ReportedScore::from_value(-325), ReportedScore::Centipawns(-325));
    }

    #[test]
    fn nps_handles_zero_elapsed() {
        let mut status = SearchStatus {
            depth: 1,
            max_depth: 1,
            nodes: 5_000,
            elapsed: Duration::ZERO,
            current_move: None,
            current_move_number: 0,
        };
        assert_eq!(status.nodes_per_second(), 0);
        status.elapsed = Duration::from_millis(500);
        assert_eq!(status.nodes_per_second(), 10_000);
    }
}
