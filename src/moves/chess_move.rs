//! Packed 32-bit move representation.
//!
//! Bit layout (low to high):
//! - `0..=2`   move type
//! - `3..=9`   origin square (0x88)
//! - `10..=16` target square (0x88)
//! - `17..=20` moved piece code
//! - `21..=24` captured piece code (`12` when nothing is captured)
//! - `25..=27` promotion kind (`6` when not a promotion)
//!
//! [`Move::NONE`] fills every field with its sentinel, so it can never equal a
//! generated move.

use std::fmt;

use crate::game_state::chess_types::{Piece, PieceKind, Square};

const TYPE_SHIFT: u32 = 0;
const ORIGIN_SHIFT: u32 = 3;
const TARGET_SHIFT: u32 = 10;
const ORIGIN_PIECE_SHIFT: u32 = 17;
const TARGET_PIECE_SHIFT: u32 = 21;
const PROMOTION_SHIFT: u32 = 25;

const TYPE_MASK: u32 = 0x7;
const SQUARE_MASK: u32 = 0x7F;
const PIECE_MASK: u32 = 0xF;
const KIND_MASK: u32 = 0x7;

const NO_TYPE_CODE: u32 = 0x7;
const NO_SQUARE_CODE: u32 = 0x7F;
const NO_PIECE_CODE: u32 = Piece::COUNT as u32;
const NO_KIND_CODE: u32 = 6;

/// How a move changes the board beyond relocating one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveType {
    Normal,
    PawnDouble,
    PawnPromotion,
    EnPassant,
    Castling,
}

impl MoveType {
    #[inline]
    const fn code(self) -> u32 {
        match self {
            MoveType::Normal => 0,
            MoveType::PawnDouble => 1,
            MoveType::PawnPromotion => 2,
            MoveType::EnPassant => 3,
            MoveType::Castling => 4,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    pub const NONE: Move = Move(
        (NO_TYPE_CODE << TYPE_SHIFT)
            | (NO_SQUARE_CODE << ORIGIN_SHIFT)
            | (NO_SQUARE_CODE << TARGET_SHIFT)
            | (NO_PIECE_CODE << ORIGIN_PIECE_SHIFT)
            | (NO_PIECE_CODE << TARGET_PIECE_SHIFT)
            | (NO_KIND_CODE << PROMOTION_SHIFT),
    );

    #[inline]
    pub fn new(
        move_type: MoveType,
        origin: Square,
        target: Square,
        origin_piece: Piece,
        target_piece: Option<Piece>,
        promotion: Option<PieceKind>,
    ) -> Self {
        debug_assert!(origin & 0x88 == 0 && target & 0x88 == 0);
        debug_assert!(promotion.map_or(true, PieceKind::is_valid_promotion));

        let target_code = target_piece.map_or(NO_PIECE_CODE, |piece| piece.code() as u32);
        let promotion_code = promotion.map_or(NO_KIND_CODE, |kind| kind.index() as u32);

        Move(
            (move_type.code() << TYPE_SHIFT)
                | ((origin as u32) << ORIGIN_SHIFT)
                | ((target as u32) << TARGET_SHIFT)
                | ((origin_piece.code() as u32) << ORIGIN_PIECE_SHIFT)
                | (target_code << TARGET_PIECE_SHIFT)
                | (promotion_code << PROMOTION_SHIFT),
        )
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == Move::NONE.0
    }

    #[inline]
    pub fn move_type(self) -> MoveType {
        debug_assert!(!self.is_none());
        match (self.0 >> TYPE_SHIFT) & TYPE_MASK {
            0 => MoveType::Normal,
            1 => MoveType::PawnDouble,
            2 => MoveType::PawnPromotion,
            3 => MoveType::EnPassant,
            4 => MoveType::Castling,
            code => unreachable!("move type code {code} is never packed"),
        }
    }

    #[inline]
    pub const fn origin(self) -> Square {
        ((self.0 >> ORIGIN_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub const fn target(self) -> Square {
        ((self.0 >> TARGET_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub fn origin_piece(self) -> Piece {
        let code = ((self.0 >> ORIGIN_PIECE_SHIFT) & PIECE_MASK) as usize;
        match Piece::from_code(code) {
            Some(piece) => piece,
            None => unreachable!("move without an origin piece"),
        }
    }

    #[inline]
    pub fn target_piece(self) -> Option<Piece> {
        Piece::from_code(((self.0 >> TARGET_PIECE_SHIFT) & PIECE_MASK) as usize)
    }

    #[inline]
    pub fn promotion(self) -> Option<PieceKind> {
        PieceKind::from_index(((self.0 >> PROMOTION_SHIFT) & KIND_MASK) as usize)
    }

    #[inline]
    pub fn is_capture(self) -> bool {
        self.target_piece().is_some()
    }
}

impl Default for Move {
    fn default() -> Self {
        Move::NONE
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return f.write_str("Move::NONE");
        }
        f.debug_struct("Move")
            .field("type", &self.move_type())
            .field("origin", &self.origin())
            .field("target", &self.target())
            .field("origin_piece", &self.origin_piece())
            .field("target_piece", &self.target_piece())
            .field("promotion", &self.promotion())
            .finish()
    }
}
