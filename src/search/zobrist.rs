//! Zobrist hashing support for fast position identity and repetition tracking.
//!
//! The standard table is generated once per process from a fixed seed so
//! hashes are deterministic across runs. Positions hold an `Arc` to the table
//! they were built with; tests can build their own from any seed.

use std::sync::{Arc, OnceLock};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::chess_types::*;

const STANDARD_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

static STANDARD_KEYS: OnceLock<Arc<ZobristKeys>> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct ZobristKeys {
    piece_square: [[u64; 128]; Piece::COUNT],
    castling: [u64; 16],
    en_passant: [u64; 128],
    side_to_move: u64,
}

impl ZobristKeys {
    /// The process-wide table shared by every position built from FEN.
    pub fn standard() -> Arc<ZobristKeys> {
        Arc::clone(STANDARD_KEYS.get_or_init(|| Arc::new(ZobristKeys::from_seed(STANDARD_SEED))))
    }

    pub fn from_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::from_rng(&mut rng)
    }

    pub fn from_rng<R: Rng>(rng: &mut R) -> Self {
        let mut piece_square = [[0u64; 128]; Piece::COUNT];
        for piece in &mut piece_square {
            for key in piece.iter_mut() {
                *key = rng.random();
            }
        }

        let mut castling = [0u64; 16];
        for key in &mut castling {
            *key = rng.random();
        }

        let mut en_passant = [0u64; 128];
        for key in &mut en_passant {
            *key = rng.random();
        }

        Self {
            piece_square,
            castling,
            en_passant,
            side_to_move: rng.random(),
        }
    }

    #[inline]
    pub fn piece_square(&self, piece: Piece, square: Square) -> u64 {
        self.piece_square[piece.code()][square as usize]
    }

    /// Key of a whole castling-rights combination (`0..=15`).
    #[inline]
    pub fn castling(&self, castling_rights: CastlingRights) -> u64 {
        self.castling[(castling_rights & CASTLE_ALL) as usize]
    }

    #[inline]
    pub fn en_passant(&self, square: Square) -> u64 {
        self.en_passant[square as usize]
    }

    /// Toggle key, xor-ed in while dark is to move.
    #[inline]
    pub fn side_to_move(&self) -> u64 {
        self.side_to_move
    }

    /// Hash `position` from scratch, ignoring its incremental key.
    pub fn compute(&self, position: &Position) -> u64 {
        let mut key = 0u64;

        for square in all_squares() {
            if let Some(piece) = position.piece_at(square) {
                key ^= self.piece_square(piece, square);
            }
        }

        key ^= self.castling(position.castling_rights());

        if let Some(square) = position.en_passant_square() {
            key ^= self.en_passant(square);
        }

        if position.side_to_move() == Color::Dark {
            key ^= self.side_to_move;
        }

        key
    }
}
