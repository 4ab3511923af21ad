//! 0x88 move deltas per piece kind.
//!
//! Generation and attack detection both walk these tables; a delta applied via
//! `chess_types::shift` lands off-board exactly when the `0x88` test fails.

use crate::game_state::chess_types::{Color, PieceKind};

pub const NORTH: i8 = 16;
pub const EAST: i8 = 1;
pub const SOUTH: i8 = -16;
pub const WEST: i8 = -1;
pub const NORTH_EAST: i8 = NORTH + EAST;
pub const NORTH_WEST: i8 = NORTH + WEST;
pub const SOUTH_EAST: i8 = SOUTH + EAST;
pub const SOUTH_WEST: i8 = SOUTH + WEST;

pub const KNIGHT_DIRECTIONS: [i8; 8] = [
    NORTH + NORTH + EAST,
    NORTH + NORTH + WEST,
    NORTH + EAST + EAST,
    NORTH + WEST + WEST,
    SOUTH + SOUTH + EAST,
    SOUTH + SOUTH + WEST,
    SOUTH + EAST + EAST,
    SOUTH + WEST + WEST,
];

pub const BISHOP_DIRECTIONS: [i8; 4] = [NORTH_EAST, NORTH_WEST, SOUTH_EAST, SOUTH_WEST];

pub const ROOK_DIRECTIONS: [i8; 4] = [NORTH, EAST, SOUTH, WEST];

pub const QUEEN_DIRECTIONS: [i8; 8] = [
    NORTH, EAST, SOUTH, WEST, NORTH_EAST, NORTH_WEST, SOUTH_EAST, SOUTH_WEST,
];

pub const KING_DIRECTIONS: [i8; 8] = QUEEN_DIRECTIONS;

/// Capture deltas of a pawn of `color`.
#[inline]
pub const fn pawn_capture_directions(color: Color) -> [i8; 2] {
    match color {
        Color::Light => [NORTH_EAST, NORTH_WEST],
        Color::Dark => [SOUTH_EAST, SOUTH_WEST],
    }
}

/// Step or ray deltas for every non-pawn kind.
#[inline]
pub const fn piece_directions(kind: PieceKind) -> &'static [i8] {
    match kind {
        PieceKind::Knight => &KNIGHT_DIRECTIONS,
        PieceKind::Bishop => &BISHOP_DIRECTIONS,
        PieceKind::Rook => &ROOK_DIRECTIONS,
        PieceKind::Queen => &QUEEN_DIRECTIONS,
        PieceKind::King => &KING_DIRECTIONS,
        PieceKind::Pawn => &[],
    }
}
