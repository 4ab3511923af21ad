use crate::game_state::chess_types::*;

/// Irreversible state saved by `make_move` and restored by `undo_move`.
///
/// Piece placement is not stored; it is reconstructed from the move itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoState {
    pub zobrist_key: u64,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,
    pub halfmove_clock: u16,
}
