//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! A [`Search`] is built by one of the `new_*_search` factories, started on a
//! background worker with a [`SearchReporter`], and finished by its own
//! budget, by [`Search::stop`], or (for ponder searches) by the budget armed
//! in [`Search::ponderhit`].

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::chess_errors::{ChessError, ChessResult};
use crate::engines::engine_trait::{PvReport, ReportedScore, SearchReporter, SearchStatus};
use crate::engines::time_management::ClockParams;
use crate::game_state::chess_rules::*;
use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::MoveGenerator;
use crate::move_generation::move_list::{sort_by_value_descending, MoveVariation, RootEntry};
use crate::moves::chess_move::Move;
use crate::search::board_scoring::{BoardScorer, MaterialMobilityScorer};
use crate::search::threading::{start_handshake, SearchSignals, SearchTimer, StartSignal};
use crate::utils::long_algebraic::move_to_long_algebraic;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub depth: i32,
    pub nodes: u64,
    /// Budget armed when the search starts.
    pub time: Option<Duration>,
    /// Budget armed on ponderhit.
    pub ponder_time: Option<Duration>,
    /// Clock-driven search: a fired timer lets the first iteration finish.
    pub time_managed: bool,
    /// Root restriction; empty means every legal move.
    pub search_moves: Vec<Move>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: MAX_DEPTH,
            nodes: u64::MAX,
            time: None,
            ponder_time: None,
            time_managed: false,
            search_moves: Vec::new(),
        }
    }
}

/// Handle to one background search.
pub struct Search {
    position: Option<Position>,
    scorer: Option<Box<dyn BoardScorer>>,
    config: SearchConfig,
    signals: Arc<SearchSignals>,
    worker: Option<JoinHandle<()>>,
    ponder_timer: Option<SearchTimer>,
}

impl Search {
    fn with_config(position: Position, config: SearchConfig) -> Self {
        Self {
            position: Some(position),
            scorer: Some(Box::new(MaterialMobilityScorer::default())),
            signals: SearchSignals::new(config.time_managed),
            config,
            worker: None,
            ponder_timer: None,
        }
    }

    pub fn new_depth_search(position: Position, depth: i32) -> ChessResult<Self> {
        if !(1..=MAX_DEPTH).contains(&depth) {
            return Err(ChessError::InvalidSearchParameter(format!(
                "depth must be within 1..={MAX_DEPTH}, got {depth}"
            )));
        }
        Ok(Self::with_config(
            position,
            SearchConfig {
                depth,
                ..SearchConfig::default()
            },
        ))
    }

    pub fn new_nodes_search(position: Position, nodes: u64) -> ChessResult<Self> {
        if nodes == 0 {
            return Err(ChessError::InvalidSearchParameter(
                "node budget must be at least 1".to_owned(),
            ));
        }
        Ok(Self::with_config(
            position,
            SearchConfig {
                nodes,
                ..SearchConfig::default()
            },
        ))
    }

    pub fn new_time_search(position: Position, time: Duration) -> ChessResult<Self> {
        if time < Duration::from_millis(1) {
            return Err(ChessError::InvalidSearchParameter(format!(
                "search time must be at least 1 ms, got {time:?}"
            )));
        }
        Ok(Self::with_config(
            position,
            SearchConfig {
                time: Some(time),
                ..SearchConfig::default()
            },
        ))
    }

    /// Runs until stopped or until the depth limit is exhausted.
    pub fn new_infinite_search(position: Position) -> Self {
        Self::with_config(position, SearchConfig::default())
    }

    pub fn new_clock_search(position: Position, clock: &ClockParams) -> ChessResult<Self> {
        clock.validate()?;
        let budget = clock.budget(position.side_to_move());
        Ok(Self::with_config(
            position,
            SearchConfig {
                time: Some(budget),
                time_managed: true,
                ..SearchConfig::default()
            },
        ))
    }

    /// Like a clock search, but the clock only starts on [`ponderhit`](Self::ponderhit).
    pub fn new_ponder_search(position: Position, clock: &ClockParams) -> ChessResult<Self> {
        clock.validate()?;
        let budget = clock.budget(position.side_to_move());
        Ok(Self::with_config(
            position,
            SearchConfig {
                ponder_time: Some(budget),
                time_managed: true,
                ..SearchConfig::default()
            },
        ))
    }

    pub fn with_search_moves(mut self, moves: Vec<Move>) -> Self {
        self.config.search_moves = moves;
        self
    }

    pub fn with_scorer(mut self, scorer: impl BoardScorer + 'static) -> Self {
        self.scorer = Some(Box::new(scorer));
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Spawn the worker and block until it has built its root move list.
    pub fn start<R: SearchReporter>(&mut self, reporter: R) -> ChessResult<()> {
        let (Some(position), Some(scorer)) = (self.position.take(), self.scorer.take()) else {
            return Err(ChessError::SearchThread(
                "search has already been started".to_owned(),
            ));
        };

        let searcher = Searcher::new(
            position,
            scorer,
            reporter,
            self.config.clone(),
            Arc::clone(&self.signals),
        );
        let (started, gate) = start_handshake();

        let handle = thread::Builder::new()
            .name("search".to_owned())
            .spawn(move || searcher.run(started))
            .map_err(|err| ChessError::SearchThread(format!("could not spawn search: {err}")))?;
        self.worker = Some(handle);

        if !gate.wait() {
            warn!("search worker exited before acknowledging its start");
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Abort the search and wait for the worker to report its best move.
    pub fn stop(&mut self) {
        self.signals.abort();
        self.join();
    }

    /// Wait for the search to end on its own. Never returns for an infinite
    /// search that nobody stops.
    pub fn wait(&mut self) {
        self.join();
    }

    /// The opponent played the expected move: switch a ponder search over to
    /// its clock budget.
    pub fn ponderhit(&mut self) {
        if !self.is_running() || self.signals.timer_attached() {
            return;
        }
        let Some(budget) = self.config.ponder_time else {
            return;
        };

        self.signals.attach_timer();
        self.ponder_timer = Some(SearchTimer::start(budget, Arc::clone(&self.signals)));

        if self.signals.early_stop_ready() {
            self.signals.abort();
        }
    }

    fn join(&mut self) {
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("search worker panicked");
            }
        }
        if let Some(mut timer) = self.ponder_timer.take() {
            timer.cancel();
        }
    }
}

impl Drop for Search {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Per-height scratch: the move buffer and the principal variation found
/// below that height.
#[derive(Default)]
struct PlyFrame {
    generator: MoveGenerator,
    pv: MoveVariation,
}

/// Worker-side search state.
struct Searcher<R> {
    position: Position,
    scorer: Box<dyn BoardScorer>,
    reporter: R,
    config: SearchConfig,
    signals: Arc<SearchSignals>,
    root_moves: Vec<RootEntry>,
    total_nodes: u64,
    current_depth: i32,
    current_max_depth: i32,
    current_move: Option<Move>,
    current_move_number: usize,
    start_time: Instant,
    status_time: Instant,
}

impl<R: SearchReporter> Searcher<R> {
    fn new(
        position: Position,
        scorer: Box<dyn BoardScorer>,
        reporter: R,
        config: SearchConfig,
        signals: Arc<SearchSignals>,
    ) -> Self {
        let now = Instant::now();
        Self {
            position,
            scorer,
            reporter,
            config,
            signals,
            root_moves: Vec::new(),
            total_nodes: 0,
            current_depth: 0,
            current_max_depth: 0,
            current_move: None,
            current_move_number: 0,
            start_time: now,
            status_time: now,
        }
    }

    fn run(mut self, started: StartSignal) {
        self.start_time = Instant::now();
        self.status_time = self.start_time;

        let mut timer = self.config.time.map(|budget| {
            self.signals.attach_timer();
            SearchTimer::start(budget, Arc::clone(&self.signals))
        });

        let mut frames: Vec<PlyFrame> = (0..=MAX_PLY).map(|_| PlyFrame::default()).collect();
        self.populate_root_moves(&mut frames[0].generator);
        started.release();

        info!(
            "search started: {} root moves, depth {}, nodes {}, time {:?}",
            self.root_moves.len(),
            self.config.depth,
            self.config.nodes,
            self.config.time
        );

        for depth in 1..=self.config.depth {
            self.current_depth = depth;
            self.current_max_depth = 0;
            self.send_status(false);

            self.search_root(&mut frames, depth, -INFINITE, INFINITE);

            sort_by_value_descending(&mut self.root_moves, |entry| entry.value);
            if self.signals.is_aborted() {
                break;
            }

            if let Some(best) = self.root_moves.first() {
                debug!(
                    "depth {depth} complete: best {} value {} nodes {}",
                    move_to_long_algebraic(best.mv),
                    best.value,
                    self.total_nodes
                );
            }

            self.check_stop_conditions();
            if self.signals.is_aborted() {
                break;
            }
        }

        if let Some(timer) = timer.as_mut() {
            timer.cancel();
        }

        self.send_status(true);

        let (best_move, ponder_move) = match self.root_moves.first() {
            Some(best) => (Some(best.mv), best.ponder_move()),
            None => (None, None),
        };
        info!(
            "search finished: bestmove {} after {} nodes in {:?}",
            best_move.map_or_else(|| "none".to_owned(), move_to_long_algebraic),
            self.total_nodes,
            self.start_time.elapsed()
        );
        self.reporter.send_best_move(best_move, ponder_move);
    }

    fn populate_root_moves(&mut self, generator: &mut MoveGenerator) {
        let is_check = self.position.is_check_active();
        let moves = generator.get_legal_moves(&mut self.position, 1, is_check);
        let search_moves = &self.config.search_moves;

        self.root_moves = moves
            .iter()
            .filter(|mv| search_moves.is_empty() || search_moves.contains(mv))
            .map(|mv| RootEntry::new(mv, -INFINITE))
            .collect();
    }

    /// Only a timed search stops before its depth limit on its own.
    fn check_stop_conditions(&mut self) {
        let single_move = self.root_moves.len() == 1;
        let mate_resolved = self.root_moves.first().is_some_and(|best| {
            is_checkmate_value(best.value) && self.current_depth >= CHECKMATE - best.value.abs()
        });

        self.signals.publish_result(single_move || mate_resolved);

        if self.signals.timer_attached()
            && (self.signals.timer_fired() || single_move || mate_resolved)
        {
            self.signals.abort();
        }
    }

    fn search_root(&mut self, frames: &mut [PlyFrame], depth: i32, mut alpha: i32, beta: i32) {
        self.update_search(0);
        if self.signals.is_aborted() {
            return;
        }

        // Unsearched entries sink below the ones that raised alpha.
        for entry in &mut self.root_moves {
            entry.value = -INFINITE;
        }

        for index in 0..self.root_moves.len() {
            let mv = self.root_moves[index].mv;
            self.current_move = Some(mv);
            self.current_move_number = index + 1;
            self.send_status(false);

            self.position.make_move(mv);
            let value = -self.alpha_beta(&mut frames[1..], depth - 1, -beta, -alpha, 1);
            self.position.undo_move(mv);

            if self.signals.is_aborted() {
                return;
            }

            if value > alpha {
                alpha = value;
                let status = self.status();

                let entry = &mut self.root_moves[index];
                entry.value = value;
                entry.pv.set(mv, &frames[1].pv);

                self.reporter.send_move(&PvReport {
                    status,
                    score: ReportedScore::from_value(value),
                    pv: self.root_moves[index].pv.moves(),
                });

                if value >= beta {
                    break;
                }
            }
        }

        if self.root_moves.is_empty() {
            self.signals.abort();
        }
    }

    fn alpha_beta(
        &mut self,
        frames: &mut [PlyFrame],
        depth: i32,
        mut alpha: i32,
        beta: i32,
        height: usize,
    ) -> i32 {
        let Some((frame, rest)) = frames.split_first_mut() else {
            return self.scorer.score(&self.position);
        };
        frame.pv.clear();

        self.update_search(height);

        if depth <= 0 || self.signals.is_aborted() || height >= MAX_PLY {
            return self.scorer.score(&self.position);
        }

        if self.position.is_repetition()
            || self.position.has_insufficient_material()
            || self.position.halfmove_clock() >= FIFTY_MOVE_LIMIT
        {
            return DRAW;
        }

        let mover = self.position.side_to_move();
        let is_check = self.position.is_check(mover);
        let moves = frame.generator.get_moves(&self.position, depth, is_check);

        let mut best_value = -INFINITE;
        let mut searched_moves = 0usize;

        for index in 0..moves.len() {
            let mv = moves.get(index);
            let mut value = best_value;

            self.position.make_move(mv);
            if !self.position.is_check(mover) {
                searched_moves += 1;
                value = -self.alpha_beta(rest, depth - 1, -beta, -alpha, height + 1);
            }
            self.position.undo_move(mv);

            if self.signals.is_aborted() {
                return best_value;
            }

            if value > best_value {
                best_value = value;

                if value > alpha {
                    alpha = value;
                    frame.pv.set(mv, &rest[0].pv);

                    if value >= beta {
                        break;
                    }
                }
            }
        }

        if searched_moves == 0 {
            return if is_check {
                -CHECKMATE + height as i32
            } else {
                DRAW
            };
        }

        best_value
    }

    fn update_search(&mut self, height: usize) {
        self.total_nodes += 1;
        self.current_max_depth = self.current_max_depth.max(height as i32);

        if self.total_nodes >= self.config.nodes {
            self.signals.abort();
        }

        self.send_status(false);
    }

    fn status(&self) -> SearchStatus {
        SearchStatus {
            depth: self.current_depth,
            max_depth: self.current_max_depth,
            nodes: self.total_nodes,
            elapsed: self.start_time.elapsed(),
            current_move: self.current_move,
            current_move_number: self.current_move_number,
        }
    }

    fn send_status(&mut self, force: bool) {
        let now = Instant::now();
        if force || now.duration_since(self.status_time) >= STATUS_INTERVAL {
            let status = self.status();
            self.reporter.send_status(&status);
            self.status_time = now;
        }
    }
}
