//! Perft runner for validating and timing the move generator.
//!
//! Usage:
//! `cargo run --release --bin perft`
//! `cargo run --release --bin perft -- 5`
//! `cargo run --release --bin perft -- 4 r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1`

use chrono::Local;

use mailbox_chess::chess_errors::{ChessError, ChessResult};
use mailbox_chess::game_state::chess_rules::STARTING_POSITION_FEN;
use mailbox_chess::game_state::chess_types::Position;
use mailbox_chess::move_generation::perft::{perft_counts, perft_divide};
use mailbox_chess::utils::long_algebraic::move_to_long_algebraic;

const DEFAULT_DEPTH: usize = 4;

fn parse_args() -> ChessResult<(usize, String)> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((depth, fen)) = args.split_first() else {
        return Ok((DEFAULT_DEPTH, STARTING_POSITION_FEN.to_owned()));
    };

    let depth = depth
        .parse::<usize>()
        .map_err(|_| ChessError::InvalidSearchParameter(format!("invalid perft depth '{depth}'")))?;
    let fen = if fen.is_empty() {
        STARTING_POSITION_FEN.to_owned()
    } else {
        fen.join(" ")
    };
    Ok((depth, fen))
}

fn main() -> ChessResult<()> {
    env_logger::init();

    let (depth, fen) = parse_args()?;
    let mut position = Position::from_fen(&fen)?;

    let started = Local::now();
    println!("perft depth {depth} started {}", started.format("%Y-%m-%d %H:%M:%S"));
    println!("fen {}", position.get_fen());

    if depth > 0 {
        for (mv, nodes) in perft_divide(&mut position, depth) {
            println!("{}: {nodes}", move_to_long_algebraic(mv));
        }
    }

    let counted = Local::now();
    let counts = perft_counts(&mut position, depth);
    let elapsed_ms = (Local::now() - counted).num_milliseconds().max(1) as u64;

    println!();
    println!(
        "nodes={} captures={} en_passant={} castles={} promotions={} checks={}",
        counts.nodes,
        counts.captures,
        counts.en_passant,
        counts.castles,
        counts.promotions,
        counts.checks
    );
    println!(
        "elapsed_ms={elapsed_ms} nps={}",
        counts.nodes.saturating_mul(1000) / elapsed_ms
    );
    Ok(())
}
