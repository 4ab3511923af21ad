//! Pseudo-legal and legal move generation into a reusable buffer.
//!
//! One `MoveGenerator` is kept per search ply, so generation never allocates
//! on the hot path. Results are MVV-LVA ordered.

use crate::game_state::chess_types::*;
use crate::move_generation::move_list::MoveList;
use crate::move_generation::pseudo_moves_castling::add_castling_moves;
use crate::move_generation::pseudo_moves_pawn::add_pawn_moves;
use crate::move_generation::pseudo_moves_piece::add_piece_moves;

#[derive(Clone, Default)]
pub struct MoveGenerator {
    moves: MoveList,
}

impl MoveGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pseudo-legal moves for the side to move.
    ///
    /// With `depth > 0` every move is produced, castling included unless in
    /// check. With `depth <= 0` only captures are kept, unless in check.
    pub fn get_moves(&mut self, position: &Position, depth: i32, is_check: bool) -> &MoveList {
        self.moves.clear();
        self.add_moves(position);

        if depth > 0 {
            if !is_check {
                add_castling_moves(position, &mut self.moves);
            }
        } else if !is_check {
            self.moves.retain(|mv| mv.is_capture());
        }

        self.moves.rate_by_mvv_lva();
        self.moves.sort();
        &self.moves
    }

    /// Like [`get_moves`](Self::get_moves) but only moves that do not leave
    /// the mover's king attacked.
    pub fn get_legal_moves(
        &mut self,
        position: &mut Position,
        depth: i32,
        is_check: bool,
    ) -> &MoveList {
        self.get_moves(position, depth, is_check);

        let mover = position.side_to_move();
        self.moves.retain(|mv| {
            position.make_move(mv);
            let legal = !position.is_check(mover);
            position.undo_move(mv);
            legal
        });

        &self.moves
    }

    fn add_moves(&mut self, position: &Position) {
        let color = position.side_to_move();

        for square in squares_of(position.pieces(color, PieceKind::Pawn)) {
            add_pawn_moves(position, square, &mut self.moves);
        }

        for kind in [
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
            PieceKind::King,
        ] {
            let piece = Piece::new(color, kind);
            for square in squares_of(position.pieces(color, kind)) {
                add_piece_moves(position, square, piece, &mut self.moves);
            }
        }
    }
}
