//! Core value types shared by the board, move generation and search.
//!
//! Squares live on a 0x88 padded board: the low nibble is the file, bits
//! 4..=6 are the rank, and any index with a bit of `0x88` set is off-board.
//! Occupancy bitboards use the dense `0..=63` layout reached via
//! [`to_dense`] / [`from_dense`].

pub use crate::game_state::position::Position;
pub use crate::game_state::undo_state::UndoState;

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::Light, Color::Dark];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Rank delta of a single pawn push for this color.
    #[inline]
    pub const fn pawn_push(self) -> i8 {
        match self {
            Color::Light => 16,
            Color::Dark => -16,
        }
    }
}

/// Piece kind (color is represented separately for cache-friendly layouts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Promotion choices in generation order.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(PieceKind::Pawn),
            1 => Some(PieceKind::Knight),
            2 => Some(PieceKind::Bishop),
            3 => Some(PieceKind::Rook),
            4 => Some(PieceKind::Queen),
            5 => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Material value in centipawns.
    #[inline]
    pub const fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 325,
            PieceKind::Bishop => 325,
            PieceKind::Rook => 500,
            PieceKind::Queen => 975,
            PieceKind::King => 20_000,
        }
    }

    #[inline]
    pub const fn is_sliding(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    #[inline]
    pub const fn is_valid_promotion(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }
}

/// A colored piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    /// Number of distinct colored pieces.
    pub const COUNT: usize = 12;

    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Dense code in `0..12`: light pieces first, then dark.
    #[inline]
    pub const fn code(self) -> usize {
        self.color.index() * 6 + self.kind.index()
    }

    #[inline]
    pub const fn from_code(code: usize) -> Option<Self> {
        let color = match code / 6 {
            0 => Color::Light,
            1 => Color::Dark,
            _ => return None,
        };
        match PieceKind::from_index(code % 6) {
            Some(kind) => Some(Self { color, kind }),
            None => None,
        }
    }
}

/// Compact castling rights bitmask.
pub type CastlingRights = u8;
pub const CASTLE_LIGHT_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_LIGHT_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_DARK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_DARK_QUEENSIDE: CastlingRights = 1 << 3;
pub const CASTLE_NONE: CastlingRights = 0;
pub const CASTLE_ALL: CastlingRights = 0x0F;

/// Board square index on the 0x88 layout.
pub type Square = u8;

#[inline]
pub const fn square_at(file: u8, rank: u8) -> Square {
    (rank << 4) | file
}

#[inline]
pub const fn file_of(square: Square) -> u8 {
    square & 0x0F
}

#[inline]
pub const fn rank_of(square: Square) -> u8 {
    square >> 4
}

#[inline]
pub const fn is_on_board(square: Square) -> bool {
    square & 0x88 == 0
}

/// Step `square` by a 0x88 delta, returning `None` when it leaves the board.
///
/// Negative results wrap above `0x7F` and therefore fail the `0x88` test.
#[inline]
pub const fn shift(square: Square, delta: i8) -> Option<Square> {
    let target = square.wrapping_add(delta as u8);
    if is_on_board(target) {
        Some(target)
    } else {
        None
    }
}

/// 0x88 square to its dense `0..=63` bitboard index.
#[inline]
pub const fn to_dense(square: Square) -> u32 {
    (((square & 0x70) >> 1) | (square & 0x07)) as u32
}

/// Dense `0..=63` bitboard index back to its 0x88 square.
#[inline]
pub const fn from_dense(index: u32) -> Square {
    (((index & 0x38) << 1) | (index & 0x07)) as Square
}

/// Iterate the 0x88 squares of a dense occupancy set, lowest first.
#[inline]
pub fn squares_of(mut bitboard: u64) -> impl Iterator<Item = Square> {
    std::iter::from_fn(move || {
        if bitboard == 0 {
            return None;
        }
        let index = bitboard.trailing_zeros();
        bitboard &= bitboard - 1;
        Some(from_dense(index))
    })
}

pub const A1: Square = square_at(0, 0);
pub const B1: Square = square_at(1, 0);
pub const C1: Square = square_at(2, 0);
pub const D1: Square = square_at(3, 0);
pub const E1: Square = square_at(4, 0);
pub const F1: Square = square_at(5, 0);
pub const G1: Square = square_at(6, 0);
pub const H1: Square = square_at(7, 0);
pub const A8: Square = square_at(0, 7);
pub const B8: Square = square_at(1, 7);
pub const C8: Square = square_at(2, 7);
pub const D8: Square = square_at(3, 7);
pub const E8: Square = square_at(4, 7);
pub const F8: Square = square_at(5, 7);
pub const G8: Square = square_at(6, 7);
pub const H8: Square = square_at(7, 7);

/// All 64 on-board squares in ascending 0x88 order.
pub fn all_squares() -> impl Iterator<Item = Square> {
    (0u8..128).filter(|square| is_on_board(*square))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_index_is_a_bijection() {
        let mut seen = [false; 64];
        for square in all_squares() {
            let dense = to_dense(square);
            assert!(dense < 64);
            assert!(!seen[dense as usize]);
            seen[dense as usize] = true;
            assert_eq!(from_dense(dense), square);
        }
        assert!(seen.iter().all(|hit| *hit));
    }

    #[test]
    fn shift_rejects_off_board_targets() {
        assert_eq!(shift(A1, -1), None);
        assert_eq!(shift(A1, -16), None);
        assert_eq!(shift(H1, 1), None);
        assert_eq!(shift(H8, 16), None);
        assert_eq!(shift(A1, 17), Some(square_at(1, 1)));
        assert_eq!(shift(E1, 16), Some(square_at(4, 1)));
    }

    #[test]
    fn piece_codes_round_trip() {
        for code in 0..Piece::COUNT {
            let piece = Piece::from_code(code).expect("code should decode");
            assert_eq!(piece.code(), code);
        }
        assert_eq!(Piece::from_code(Piece::COUNT), None);
    }
}
