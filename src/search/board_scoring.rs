//! Pluggable board evaluation interfaces and the default scorer.
//!
//! Search remains modular by delegating static position scoring to this trait,
//! allowing alternate heuristics to be swapped without altering search code.

use crate::game_state::chess_rules::CHECKMATE_THRESHOLD;
use crate::game_state::chess_types::*;
use crate::moves::directions::piece_directions;

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of the side to move.
    fn score(&self, position: &Position) -> i32;
}

/// Material (with bishop-pair bonus) plus mobility plus a small tempo bonus.
#[derive(Debug, Clone, Copy)]
pub struct MaterialMobilityScorer {
    pub material_weight: i32,
    pub mobility_weight: i32,
}

impl Default for MaterialMobilityScorer {
    fn default() -> Self {
        Self {
            material_weight: MAX_WEIGHT,
            mobility_weight: 80,
        }
    }
}

const MAX_WEIGHT: i32 = 100;
pub const TEMPO: i32 = 1;
pub const BISHOP_PAIR_BONUS: i32 = 50;

impl MaterialMobilityScorer {
    pub fn material(position: &Position, color: Color) -> i32 {
        let mut material = position.material(color);
        if position.pieces(color, PieceKind::Bishop).count_ones() >= 2 {
            material += BISHOP_PAIR_BONUS;
        }
        material
    }

    pub fn mobility(position: &Position, color: Color) -> i32 {
        let knights = Self::piece_mobility(position, color, PieceKind::Knight);
        let bishops = Self::piece_mobility(position, color, PieceKind::Bishop);
        let rooks = Self::piece_mobility(position, color, PieceKind::Rook);
        let queens = Self::piece_mobility(position, color, PieceKind::Queen);
        knights * 4 + bishops * 5 + rooks * 2 + queens
    }

    /// Reachable squares of every `kind` piece of `color`. Rays include the
    /// first occupied square whoever owns it.
    fn piece_mobility(position: &Position, color: Color, kind: PieceKind) -> i32 {
        let sliding = kind.is_sliding();
        let mut mobility = 0;

        for origin in squares_of(position.pieces(color, kind)) {
            for &delta in piece_directions(kind) {
                let mut square = origin;
                while let Some(next) = shift(square, delta) {
                    square = next;
                    mobility += 1;
                    if !sliding || position.piece_at(square).is_some() {
                        break;
                    }
                }
            }
        }

        mobility
    }
}

impl BoardScorer for MaterialMobilityScorer {
    fn score(&self, position: &Position) -> i32 {
        let us = position.side_to_move();
        let them = us.opposite();

        let material = (Self::material(position, us) - Self::material(position, them))
            * self.material_weight
            / MAX_WEIGHT;
        let mobility = (Self::mobility(position, us) - Self::mobility(position, them))
            * self.mobility_weight
            / MAX_WEIGHT;

        let value = material + mobility + TEMPO;
        value.clamp(-CHECKMATE_THRESHOLD + 1, CHECKMATE_THRESHOLD - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardScorer, MaterialMobilityScorer, BISHOP_PAIR_BONUS, TEMPO};
    use crate::game_state::chess_rules::{CHECKMATE_THRESHOLD, STARTING_POSITION_FEN};
    use crate::game_state::chess_types::*;

    #[test]
    fn symmetric_position_scores_tempo() {
        let position = Position::from_fen(STARTING_POSITION_FEN).expect("FEN should parse");
        assert_eq!(MaterialMobilityScorer::default().score(&position), TEMPO);
    }

    #[test]
    fn score_is_from_side_to_move() {
        let light = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").expect("FEN should parse");
        let dark = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 b - - 0 1").expect("FEN should parse");
        let scorer = MaterialMobilityScorer::default();
        assert!(scorer.score(&light) > 900);
        assert!(scorer.score(&dark) < -900);
        assert_eq!(scorer.score(&light) - TEMPO, -(scorer.score(&dark) - TEMPO));
    }

    #[test]
    fn bishop_pair_earns_bonus() {
        let pair = Position::from_fen("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1").expect("FEN should parse");
        let single = Position::from_fen("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(
            MaterialMobilityScorer::material(&pair, Color::Light)
                - MaterialMobilityScorer::material(&single, Color::Light),
            PieceKind::Bishop.value() + BISHOP_PAIR_BONUS
        );
    }

    #[test]
    fn mobility_counts_weighted_squares() {
        // Lone knight on a1: two squares, weight four.
        let position = Position::from_fen("4k3/8/8/8/8/8/8/N3K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(MaterialMobilityScorer::mobility(&position, Color::Light), 8);
        // Rook a1 boxed by its own king on e1: up the file (7) plus b1..e1 (4).
        let rook = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(MaterialMobilityScorer::mobility(&rook, Color::Light), 22);
    }

    #[test]
    fn score_stays_outside_mate_range() {
        let scorer = MaterialMobilityScorer {
            material_weight: 100_000,
            mobility_weight: 0,
        };
        let position = Position::from_fen("4k3/8/8/8/8/8/8/QQQQK3 w - - 0 1").expect("FEN should parse");
        assert!(scorer.score(&position) < CHECKMATE_THRESHOLD);
    }
}
