use crate::game_state::chess_types::*;
use crate::move_generation::move_list::MoveList;
use crate::moves::chess_move::{Move, MoveType};
use crate::moves::directions::piece_directions;

/// Knight, bishop, rook, queen and king moves from `origin`.
///
/// Leapers take one step per delta; sliders keep walking until they leave
/// the board or hit a piece, capturing it when it is hostile.
pub fn add_piece_moves(position: &Position, origin: Square, piece: Piece, list: &mut MoveList) {
    debug_assert!(piece.kind != PieceKind::Pawn);
    let sliding = piece.kind.is_sliding();

    for &delta in piece_directions(piece.kind) {
        let mut target = origin;
        while let Some(next) = shift(target, delta) {
            target = next;
            match position.piece_at(target) {
                None => {
                    list.push(Move::new(MoveType::Normal, origin, target, piece, None, None));
                    if !sliding {
                        break;
                    }
                }
                Some(victim) => {
                    if victim.color != piece.color {
                        list.push(Move::new(
                            MoveType::Normal,
                            origin,
                            target,
                            piece,
                            Some(victim),
                            None,
                        ));
                    }
                    break;
                }
            }
        }
    }
}
