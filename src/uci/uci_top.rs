//! UCI protocol front-end and command loop.
//!
//! Parses UCI commands, maintains the current position, runs `go` requests as
//! background searches, and serializes search reports as protocol output.
//! Output is shared between the command loop and the search worker.

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{trace, warn};

use crate::chess_errors::{ChessError, ChessResult};
use crate::engines::engine_trait::{GoParams, PvReport, ReportedScore, SearchReporter, SearchStatus};
use crate::engines::time_management::ClockParams;
use crate::game_state::chess_types::Position;
use crate::moves::chess_move::Move;
use crate::search::iterative_deepening::Search;
use crate::utils::long_algebraic::{move_to_long_algebraic, parse_long_algebraic, NULL_MOVE_TEXT};

const UCI_ENGINE_NAME: &str = "Mailbox Chess";
const UCI_ENGINE_AUTHOR: &str = "the Mailbox Chess developers";

pub fn run_stdio_loop() -> io::Result<()> {
    let stdin = io::stdin();
    let mut uci = UciState::new(io::stdout());

    for line in stdin.lock().lines() {
        let line = line?;
        if uci.handle_command(&line)? {
            break;
        }
    }

    uci.stop_search();
    Ok(())
}

struct UciState<W: Write + Send + 'static> {
    position: Position,
    search: Option<Search>,
    out: Arc<Mutex<W>>,
    ponder: bool,
    debug_mode: bool,
}

impl<W: Write + Send + 'static> UciState<W> {
    fn new(out: W) -> Self {
        Self {
            position: Position::new_game(),
            search: None,
            out: Arc::new(Mutex::new(out)),
            ponder: false,
            debug_mode: false,
        }
    }

    fn handle_command(&mut self, line: &str) -> io::Result<bool> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or_default();

        match cmd {
            "uci" => {
                self.write_line(&format!("id name {UCI_ENGINE_NAME}"))?;
                self.write_line(&format!("id author {UCI_ENGINE_AUTHOR}"))?;
                self.write_line("option name Ponder type check default false")?;
                self.write_line("uciok")?;
            }
            "isready" => {
                self.write_line("readyok")?;
            }
            "setoption" => {
                if let Err(err) = self.handle_setoption(trimmed) {
                    self.write_line(&format!("info string setoption error: {err}"))?;
                }
            }
            "ucinewgame" => {
                self.stop_search();
                self.position = Position::new_game();
            }
            "position" => {
                self.stop_search();
                if let Err(err) = self.handle_position(trimmed) {
                    self.write_line(&format!("info string position error: {err}"))?;
                }
            }
            "go" => {
                if let Err(err) = self.handle_go(trimmed) {
                    self.write_line(&format!("info string go error: {err}"))?;
                    self.write_line(&format!("bestmove {NULL_MOVE_TEXT}"))?;
                }
            }
            "stop" => {
                self.stop_search();
            }
            "ponderhit" => {
                if let Some(search) = self.search.as_mut() {
                    search.ponderhit();
                }
            }
            "debug" => {
                let mode = parts.next().unwrap_or_default();
                self.debug_mode = mode.eq_ignore_ascii_case("on");
            }
            "register" => {
                // Registration is not required by this engine.
            }
            "quit" => {
                self.stop_search();
                return Ok(true);
            }
            _ => {
                trace!("ignoring unknown UCI command: {trimmed}");
            }
        }

        Ok(false)
    }

    fn handle_setoption(&mut self, line: &str) -> Result<(), String> {
        let mut name_tokens = Vec::<&str>::new();
        let mut value_tokens = Vec::<&str>::new();
        let mut mode = "";

        for tok in line.split_whitespace().skip(1) {
            match tok {
                "name" => mode = "name",
                "value" => mode = "value",
                _ if mode == "name" => name_tokens.push(tok),
                _ if mode == "value" => value_tokens.push(tok),
                _ => {}
            }
        }

        let name = name_tokens.join(" ");
        let value = value_tokens.join(" ");

        if name.eq_ignore_ascii_case("Ponder") {
            self.ponder = match value.to_ascii_lowercase().as_str() {
                "true" => true,
                "false" => false,
                other => return Err(format!("invalid Ponder value '{other}'")),
            };
            Ok(())
        } else {
            Err(format!("unknown option '{name}'"))
        }
    }

    fn handle_position(&mut self, line: &str) -> ChessResult<()> {
        let mut tokens = line.split_whitespace().peekable();
        let _ = tokens.next(); // "position"

        let mut position = match tokens.next() {
            Some("startpos") => Position::new_game(),
            Some("fen") => {
                let mut fen_parts = Vec::<&str>::new();
                while let Some(next) = tokens.next_if(|tok| *tok != "moves") {
                    fen_parts.push(next);
                }
                if fen_parts.is_empty() {
                    return Err(ChessError::InvalidFen(
                        "missing FEN after 'position fen'".to_owned(),
                    ));
                }
                Position::from_fen(&fen_parts.join(" "))?
            }
            Some(other) => {
                return Err(ChessError::InvalidFen(format!(
                    "unsupported position token '{other}'"
                )))
            }
            None => {
                return Err(ChessError::InvalidFen(
                    "incomplete position command".to_owned(),
                ))
            }
        };

        if tokens.next_if_eq(&"moves").is_some() {
            for lan in tokens {
                let mv = parse_long_algebraic(&mut position, lan)?;
                position.make_move(mv);
            }
        }

        self.position = position;
        Ok(())
    }

    fn handle_go(&mut self, line: &str) -> ChessResult<()> {
        self.stop_search();

        let params = parse_go_params(line, &mut self.position)?;
        if params.ponder && !self.ponder {
            trace!("go ponder received while the Ponder option is off");
        }

        let mut search = build_search(self.position.clone(), &params)?;
        search.start(UciReporter {
            out: Arc::clone(&self.out),
            debug_mode: self.debug_mode,
        })?;
        self.search = Some(search);
        Ok(())
    }

    fn stop_search(&mut self) {
        if let Some(mut search) = self.search.take() {
            search.stop();
        }
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| io::Error::other("UCI output lock poisoned"))?;
        writeln!(out, "{line}")?;
        out.flush()
    }
}

/// Pick the search kind the way GUIs expect: explicit limits first, then
/// infinite, then the clock.
fn build_search(position: Position, params: &GoParams) -> ChessResult<Search> {
    let search = if let Some(depth) = params.depth {
        Search::new_depth_search(position, depth)?
    } else if let Some(nodes) = params.nodes {
        Search::new_nodes_search(position, nodes)?
    } else if let Some(movetime) = params.movetime_ms {
        Search::new_time_search(position, Duration::from_millis(movetime))?
    } else if params.infinite {
        Search::new_infinite_search(position)
    } else {
        let clock = ClockParams::from_go_params(params);
        if params.ponder {
            Search::new_ponder_search(position, &clock)?
        } else {
            Search::new_clock_search(position, &clock)?
        }
    };

    Ok(match &params.searchmoves {
        Some(moves) => search.with_search_moves(moves.clone()),
        None => search,
    })
}

fn parse_go_params(line: &str, position: &mut Position) -> ChessResult<GoParams> {
    let mut params = GoParams::default();
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    let mut i = 0usize;
    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                i += 1;
                params.depth = tokens.get(i).and_then(|x| x.parse::<i32>().ok());
            }
            "nodes" => {
                i += 1;
                params.nodes = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "movetime" => {
                i += 1;
                params.movetime_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "ponder" => {
                params.ponder = true;
            }
            "infinite" => {
                params.infinite = true;
            }
            "wtime" => {
                i += 1;
                params.wtime_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "btime" => {
                i += 1;
                params.btime_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "winc" => {
                i += 1;
                params.winc_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "binc" => {
                i += 1;
                params.binc_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "movestogo" => {
                i += 1;
                params.movestogo = tokens.get(i).and_then(|x| x.parse::<u32>().ok());
            }
            "searchmoves" => {
                i += 1;
                let mut moves = Vec::<Move>::new();
                while i < tokens.len() && !is_go_keyword(tokens[i]) {
                    moves.push(parse_long_algebraic(position, tokens[i])?);
                    i += 1;
                }
                i = i.saturating_sub(1);
                params.searchmoves = Some(moves);
            }
            _ => {}
        }
        i += 1;
    }
    Ok(params)
}

fn is_go_keyword(token: &str) -> bool {
    matches!(
        token,
        "go" | "depth"
            | "movetime"
            | "wtime"
            | "btime"
            | "winc"
            | "binc"
            | "movestogo"
            | "searchmoves"
            | "nodes"
            | "mate"
            | "ponder"
            | "infinite"
    )
}

/// Serializes search reports onto the shared UCI output.
struct UciReporter<W> {
    out: Arc<Mutex<W>>,
    debug_mode: bool,
}

impl<W: Write + Send + 'static> UciReporter<W> {
    fn emit(&self, line: &str) {
        let Ok(mut out) = self.out.lock() else {
            warn!("UCI output lock poisoned; dropping '{line}'");
            return;
        };
        if let Err(err) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            warn!("could not write UCI output: {err}");
        }
    }
}

impl<W: Write + Send + 'static> SearchReporter for UciReporter<W> {
    fn send_best_move(&mut self, best_move: Option<Move>, ponder_move: Option<Move>) {
        self.emit(&format_best_move(best_move, ponder_move));
    }

    fn send_status(&mut self, status: &SearchStatus) {
        self.emit(&format_status(status));
        if self.debug_mode {
            self.emit(&format!("info string nodes searched {}", status.nodes));
        }
    }

    fn send_move(&mut self, report: &PvReport<'_>) {
        self.emit(&format_pv(report));
    }
}

fn status_fields(status: &SearchStatus) -> String {
    format!(
        "depth {} seldepth {} nodes {} time {} nps {}",
        status.depth,
        status.max_depth,
        status.nodes,
        status.elapsed.as_millis(),
        status.nodes_per_second()
    )
}

fn format_status(status: &SearchStatus) -> String {
    let mut line = format!("info {}", status_fields(status));
    if let Some(mv) = status.current_move {
        line.push_str(&format!(
            " currmove {} currmovenumber {}",
            move_to_long_algebraic(mv),
            status.current_move_number
        ));
    }
    line
}

fn format_pv(report: &PvReport<'_>) -> String {
    let score = match report.score {
        ReportedScore::Centipawns(cp) => format!("cp {cp}"),
        ReportedScore::Mate(moves) => format!("mate {moves}"),
    };
    let pv = report
        .pv
        .iter()
        .map(|mv| move_to_long_algebraic(*mv))
        .collect::<Vec<_>>()
        .join(" ");
    format!("info {} score {score} pv {pv}", status_fields(&report.status))
}

fn format_best_move(best_move: Option<Move>, ponder_move: Option<Move>) -> String {
    match (best_move, ponder_move) {
        (Some(best), Some(ponder)) => format!(
            "bestmove {} ponder {}",
            move_to_long_algebraic(best),
            move_to_long_algebraic(ponder)
        ),
        (Some(best), None) => format!("bestmove {}", move_to_long_algebraic(best)),
        (None, _) => format!("bestmove {NULL_MOVE_TEXT}"),
    }
}
