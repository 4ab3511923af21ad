//! Coordinate ("long algebraic") move notation as used by UCI: `e2e4`,
//! `e7e8q`, `e1g1` for castling. The null move is written `0000`.

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::chess_move::Move;
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

pub const NULL_MOVE_TEXT: &str = "0000";

pub fn move_to_long_algebraic(mv: Move) -> String {
    if mv.is_none() {
        return NULL_MOVE_TEXT.to_owned();
    }

    let mut out = String::with_capacity(5);
    for square in [mv.origin(), mv.target()] {
        match square_to_algebraic(square) {
            Ok(text) => out.push_str(&text),
            Err(_) => return NULL_MOVE_TEXT.to_owned(),
        }
    }
    if let Some(kind) = mv.promotion() {
        out.push(promotion_to_char(kind));
    }
    out
}

/// Resolve `text` against the legal moves of `position`.
///
/// The position is only used as scratch space for legality checks and is
/// returned unchanged.
pub fn parse_long_algebraic(position: &mut Position, text: &str) -> ChessResult<Move> {
    let (origin, target, promotion) = split_long_algebraic(text)?;

    let is_check = position.is_check_active();
    let mut generator = MoveGenerator::new();
    let legal_moves = generator.get_legal_moves(position, 1, is_check);

    let found = legal_moves
        .iter()
        .find(|mv| mv.origin() == origin && mv.target() == target && mv.promotion() == promotion);
    found.ok_or_else(|| ChessError::IllegalMove(text.to_owned(), position.get_fen()))
}

/// Syntax-only decoding into origin, target and promotion kind.
pub fn split_long_algebraic(text: &str) -> ChessResult<(Square, Square, Option<PieceKind>)> {
    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(ChessError::InvalidMoveNotation(text.to_owned()));
    }

    let notation_error = |_| ChessError::InvalidMoveNotation(text.to_owned());
    let origin = algebraic_to_square(&text[0..2]).map_err(notation_error)?;
    let target = algebraic_to_square(&text[2..4]).map_err(notation_error)?;

    let promotion = match text.as_bytes().get(4) {
        Some(&ch) => Some(
            char_to_promotion(char::from(ch))
                .ok_or_else(|| ChessError::InvalidMoveNotation(text.to_owned()))?,
        ),
        None => None,
    };

    Ok((origin, target, promotion))
}

fn promotion_to_char(kind: PieceKind) -> char {
    match kind {
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        _ => 'q',
    }
}

fn char_to_promotion(ch: char) -> Option<PieceKind> {
    match ch.to_ascii_lowercase() {
        'n' => Some(PieceKind::Knight),
        'b' => Some(PieceKind::Bishop),
        'r' => Some(PieceKind::Rook),
        'q' => Some(PieceKind::Queen),
        _ => None,
    }
}
