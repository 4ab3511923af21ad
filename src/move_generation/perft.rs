//! Perft: exhaustive legal-move tree counting used to validate the generator.
//!
//! Uses the same pseudo-legal generation plus make/check/undo filtering as the
//! search, with one generator per ply so nothing allocates while counting.

use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::chess_move::{Move, MoveType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
    }

    fn record_leaf(&mut self, mv: Move, gives_check: bool) {
        self.nodes += 1;
        if mv.is_capture() {
            self.captures += 1;
        }
        match mv.move_type() {
            MoveType::EnPassant => self.en_passant += 1,
            MoveType::Castling => self.castles += 1,
            MoveType::PawnPromotion => self.promotions += 1,
            _ => {}
        }
        if gives_check {
            self.checks += 1;
        }
    }
}

/// Number of leaf nodes `depth` plies below `position`.
pub fn perft(position: &mut Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut generators = generators_for(depth);
    count_nodes(&mut generators, position, depth)
}

/// Leaf nodes plus move-kind statistics of the last ply.
pub fn perft_counts(position: &mut Position, depth: usize) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }
    let mut generators = generators_for(depth);
    let mut counts = PerftCounts::default();
    count_detailed(&mut generators, position, depth, &mut counts);
    counts
}

/// Leaf nodes below each legal root move, in generation order.
pub fn perft_divide(position: &mut Position, depth: usize) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let mut generators = generators_for(depth);
    let Some((root, rest)) = generators.split_first_mut() else {
        return Vec::new();
    };

    let is_check = position.is_check_active();
    let moves = root.get_legal_moves(position, depth as i32, is_check);

    moves
        .iter()
        .map(|mv| {
            position.make_move(mv);
            let nodes = count_nodes(rest, position, depth - 1);
            position.undo_move(mv);
            (mv, nodes)
        })
        .collect()
}

fn generators_for(depth: usize) -> Vec<MoveGenerator> {
    (0..depth).map(|_| MoveGenerator::new()).collect()
}

fn count_nodes(generators: &mut [MoveGenerator], position: &mut Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }
    let Some((generator, rest)) = generators.split_first_mut() else {
        return 1;
    };

    let mover = position.side_to_move();
    let is_check = position.is_check(mover);
    let moves = generator.get_moves(position, depth as i32, is_check);

    let mut total = 0u64;
    for mv in moves.iter() {
        position.make_move(mv);
        if !position.is_check(mover) {
            total += count_nodes(rest, position, depth - 1);
        }
        position.undo_move(mv);
    }
    total
}

fn count_detailed(
    generators: &mut [MoveGenerator],
    position: &mut Position,
    depth: usize,
    counts: &mut PerftCounts,
) {
    let Some((generator, rest)) = generators.split_first_mut() else {
        return;
    };

    let mover = position.side_to_move();
    let is_check = position.is_check(mover);
    let moves = generator.get_moves(position, depth as i32, is_check);

    let mut local = PerftCounts::default();
    for mv in moves.iter() {
        position.make_move(mv);
        if !position.is_check(mover) {
            if depth == 1 {
                local.record_leaf(mv, position.is_check_active());
            } else {
                count_detailed(rest, position, depth - 1, &mut local);
            }
        }
        position.undo_move(mv);
    }
    counts.merge(local);
}

#[cfg(test)]
mod tests {
    use super::{perft, perft_counts, perft_divide, PerftCounts};
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::Position;

    const KIWIPETE_FEN: &str =
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3_FEN: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION_4_FEN: &str =
        "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1";
    const POSITION_4_MIRRORED_FEN: &str =
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION_5_FEN: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";
    const POSITION_6_FEN: &str =
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10";

    fn assert_perft(fen: &str, expected: &[u64]) {
        let mut position = Position::from_fen(fen).expect("FEN should parse");
        let before = position.get_fen();
        for (index, &nodes) in expected.iter().enumerate() {
            let depth = index + 1;
            assert_eq!(perft(&mut position, depth), nodes, "{fen} at depth {depth}");
        }
        assert_eq!(position.get_fen(), before);
        assert_eq!(position.history_len(), 0);
    }

    #[test]
    fn starting_position_shallow() {
        assert_perft(STARTING_POSITION_FEN, &[20, 400, 8_902, 197_281]);
    }

    #[test]
    #[ignore = "slow in debug builds; run with --release -- --ignored"]
    fn starting_position_deep() {
        assert_perft(STARTING_POSITION_FEN, &[20, 400, 8_902, 197_281, 4_865_609, 119_060_324]);
    }

    #[test]
    fn kiwipete_shallow() {
        assert_perft(KIWIPETE_FEN, &[48, 2_039, 97_862]);
    }

    #[test]
    #[ignore = "slow in debug builds; run with --release -- --ignored"]
    fn kiwipete_deep() {
        assert_perft(KIWIPETE_FEN, &[48, 2_039, 97_862, 4_085_603]);
    }

    #[test]
    fn position_3_en_passant_and_pins() {
        assert_perft(POSITION_3_FEN, &[14, 191, 2_812, 43_238]);
    }

    #[test]
    #[ignore = "slow in debug builds; run with --release -- --ignored"]
    fn position_3_deep() {
        assert_perft(POSITION_3_FEN, &[14, 191, 2_812, 43_238, 674_624, 11_030_083]);
    }

    #[test]
    fn position_4_promotions_and_castling() {
        assert_perft(POSITION_4_FEN, &[6, 264, 9_467]);
        assert_perft(POSITION_4_MIRRORED_FEN, &[6, 264, 9_467]);
    }

    #[test]
    #[ignore = "slow in debug builds; run with --release -- --ignored"]
    fn position_4_deep() {
        assert_perft(POSITION_4_FEN, &[6, 264, 9_467, 422_333]);
    }

    #[test]
    fn position_5() {
        assert_perft(POSITION_5_FEN, &[44, 1_486, 62_379]);
    }

    #[test]
    fn position_6() {
        assert_perft(POSITION_6_FEN, &[46, 2_079, 89_890]);
    }

    #[test]
    fn detailed_counts_match_published_tables() {
        let mut start = Position::new_game();
        assert_eq!(
            perft_counts(&mut start, 3),
            PerftCounts {
                nodes: 8_902,
                captures: 34,
                en_passant: 0,
                castles: 0,
                promotions: 0,
                checks: 12,
            }
        );

        let mut kiwipete = Position::from_fen(KIWIPETE_FEN).expect("FEN should parse");
        assert_eq!(
            perft_counts(&mut kiwipete, 2),
            PerftCounts {
                nodes: 2_039,
                captures: 351,
                en_passant: 1,
                castles: 91,
                promotions: 0,
                checks: 3,
            }
        );
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut position = Position::from_fen(KIWIPETE_FEN).expect("FEN should parse");
        let divided = perft_divide(&mut position, 2);
        assert_eq!(divided.len(), 48);
        assert_eq!(divided.iter().map(|(_, nodes)| nodes).sum::<u64>(), 2_039);
    }

    #[test]
    fn depth_zero_is_one_node() {
        let mut position = Position::new_game();
        assert_eq!(perft(&mut position, 0), 1);
        assert_eq!(perft_counts(&mut position, 0).nodes, 1);
    }
}
