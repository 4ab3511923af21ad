use crate::game_state::chess_types::*;
use crate::move_generation::move_list::MoveList;
use crate::moves::chess_move::{Move, MoveType};

/// Castling moves for the side to move. Callers skip this while in check.
///
/// The squares between king and rook must be empty and the square the king
/// passes over must not be attacked; the landing square is left to the
/// legality filter.
pub fn add_castling_moves(position: &Position, list: &mut MoveList) {
    let color = position.side_to_move();
    let enemy = color.opposite();
    let king = Piece::new(color, PieceKind::King);
    let rights = position.castling_rights();

    let (origin, kingside, queenside, rank) = match color {
        Color::Light => (E1, CASTLE_LIGHT_KINGSIDE, CASTLE_LIGHT_QUEENSIDE, 0),
        Color::Dark => (E8, CASTLE_DARK_KINGSIDE, CASTLE_DARK_QUEENSIDE, 7),
    };
    let empty = |file: u8| position.piece_at(square_at(file, rank)).is_none();

    if rights & kingside != 0 && empty(5) && empty(6) && !position.is_attacked(square_at(5, rank), enemy)
    {
        list.push(Move::new(MoveType::Castling, origin, square_at(6, rank), king, None, None));
    }

    if rights & queenside != 0
        && empty(1)
        && empty(2)
        && empty(3)
        && !position.is_attacked(square_at(3, rank), enemy)
    {
        list.push(Move::new(MoveType::Castling, origin, square_at(2, rank), king, None, None));
    }
}

#[cfg(test)]
mod tests {
    use super::add_castling_moves;
    use crate::game_state::chess_types::*;
    use crate::move_generation::move_list::MoveList;
    use crate::utils::long_algebraic::move_to_long_algebraic;

    fn castles(fen: &str) -> Vec<String> {
        let position = Position::from_fen(fen).expect("FEN should parse");
        let mut list = MoveList::new();
        add_castling_moves(&position, &mut list);
        list.iter().map(move_to_long_algebraic).collect()
    }

    #[test]
    fn both_sides_available_on_open_back_rank() {
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1"), vec!["e1g1", "e1c1"]);
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1"), vec!["e8g8", "e8c8"]);
    }

    #[test]
    fn attacked_transit_square_blocks_castling() {
        // Dark rook on f8 covers f1; dark rook on d8 covers d1.
        assert!(castles("3rkr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").is_empty());
    }

    #[test]
    fn b_file_blocker_stops_queenside_only() {
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1"), vec!["e1g1"]);
    }

    #[test]
    fn attacked_b_file_square_does_not_matter() {
        assert_eq!(castles("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1"), vec!["e1c1"]);
    }
}
