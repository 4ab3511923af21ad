use crate::game_state::chess_types::*;
use crate::move_generation::move_list::MoveList;
use crate::moves::chess_move::{Move, MoveType};
use crate::moves::directions::pawn_capture_directions;

/// Pawn moves from `origin`: captures (including en passant) first, then the
/// single push and the double push from the start rank.
pub fn add_pawn_moves(position: &Position, origin: Square, list: &mut MoveList) {
    let color = position.side_to_move();
    let pawn = Piece::new(color, PieceKind::Pawn);
    let (start_rank, promotion_rank) = match color {
        Color::Light => (1, 7),
        Color::Dark => (6, 0),
    };

    for delta in pawn_capture_directions(color) {
        let Some(target) = shift(origin, delta) else {
            continue;
        };

        match position.piece_at(target) {
            Some(victim) if victim.color != color => {
                if rank_of(target) == promotion_rank {
                    add_promotions(list, origin, target, pawn, Some(victim));
                } else {
                    list.push(Move::new(MoveType::Normal, origin, target, pawn, Some(victim), None));
                }
            }
            None if position.en_passant_square() == Some(target) => {
                let captured_square = square_at(file_of(target), rank_of(origin));
                if let Some(victim) = position.piece_at(captured_square) {
                    list.push(Move::new(
                        MoveType::EnPassant,
                        origin,
                        target,
                        pawn,
                        Some(victim),
                        None,
                    ));
                }
            }
            _ => {}
        }
    }

    let Some(target) = shift(origin, color.pawn_push()) else {
        return;
    };
    if position.piece_at(target).is_some() {
        return;
    }

    if rank_of(target) == promotion_rank {
        add_promotions(list, origin, target, pawn, None);
        return;
    }

    list.push(Move::new(MoveType::Normal, origin, target, pawn, None, None));

    if rank_of(origin) == start_rank {
        if let Some(double) = shift(target, color.pawn_push()) {
            if position.piece_at(double).is_none() {
                list.push(Move::new(MoveType::PawnDouble, origin, double, pawn, None, None));
            }
        }
    }
}

fn add_promotions(
    list: &mut MoveList,
    origin: Square,
    target: Square,
    pawn: Piece,
    victim: Option<Piece>,
) {
    for kind in PieceKind::PROMOTIONS {
        list.push(Move::new(MoveType::PawnPromotion, origin, target, pawn, victim, Some(kind)));
    }
}

#[cfg(test)]
mod tests {
    use super::add_pawn_moves;
    use crate::game_state::chess_types::*;
    use crate::move_generation::move_list::MoveList;
    use crate::moves::chess_move::MoveType;
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::long_algebraic::move_to_long_algebraic;

    fn generate(fen: &str, square: &str) -> Vec<(String, MoveType)> {
        let position = Position::from_fen(fen).expect("FEN should parse");
        let origin = algebraic_to_square(square).expect("square should parse");
        let mut list = MoveList::new();
        add_pawn_moves(&position, origin, &mut list);
        list.iter()
            .map(|mv| (move_to_long_algebraic(mv), mv.move_type()))
            .collect()
    }

    #[test]
    fn start_rank_pawn_pushes_once_and_twice() {
        assert_eq!(
            generate(crate::game_state::chess_rules::STARTING_POSITION_FEN, "e2"),
            vec![
                ("e2e3".to_owned(), MoveType::Normal),
                ("e2e4".to_owned(), MoveType::PawnDouble),
            ]
        );
    }

    #[test]
    fn blocked_pawn_has_no_push() {
        assert!(generate("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1", "e2").is_empty());
    }

    #[test]
    fn captures_come_before_pushes_and_promotions_expand() {
        let moves = generate("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1", "a7");
        let texts: Vec<&str> = moves.iter().map(|(text, _)| text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["a7b8q", "a7b8r", "a7b8b", "a7b8n", "a7a8q", "a7a8r", "a7a8b", "a7a8n"]
        );
        assert!(moves.iter().all(|(_, kind)| *kind == MoveType::PawnPromotion));
    }

    #[test]
    fn en_passant_capture_is_generated() {
        let moves = generate("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", "e5");
        assert_eq!(
            moves,
            vec![
                ("e5d6".to_owned(), MoveType::EnPassant),
                ("e5e6".to_owned(), MoveType::Normal),
            ]
        );
    }

    #[test]
    fn dark_pawns_move_south() {
        let moves = generate("4k3/3p4/4P3/8/8/8/8/4K3 b - - 0 1", "d7");
        assert_eq!(
            moves,
            vec![
                ("d7e6".to_owned(), MoveType::Normal),
                ("d7d6".to_owned(), MoveType::Normal),
                ("d7d5".to_owned(), MoveType::PawnDouble),
            ]
        );
    }
}
