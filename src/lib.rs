//! Crate root module declarations for the Mailbox Chess engine.
//!
//! This file exposes all top-level subsystems (game state, move generation,
//! search, engine contracts, UCI protocol handling, and utility helpers) so
//! binaries, tests, and benchmarks can import stable module paths.

pub mod chess_errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod position;
    pub mod undo_state;
}

pub mod moves {
    pub mod chess_move;
    pub mod directions;
}

pub mod move_generation {
    pub mod move_generator;
    pub mod move_list;
    pub mod perft;
    pub mod pseudo_moves_castling;
    pub mod pseudo_moves_pawn;
    pub mod pseudo_moves_piece;
}

pub mod search {
    pub mod board_scoring;
    pub mod iterative_deepening;
    pub mod threading;
    pub mod zobrist;
}

pub mod engines {
    pub mod engine_trait;
    pub mod time_management;
}

pub mod uci {
    pub mod uci_top;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
}
