//! Core incremental board state representation.
//!
//! `Position` is the central model for the engine. It keeps a 0x88 mailbox,
//! per-color/per-kind occupancy bitboards, material totals, rights and
//! clocks, and a Zobrist key that `make_move` / `undo_move` update in lockstep
//! with every field. Search mutates a single `Position` in place; the undo
//! stack is preallocated for the search height plus a long game history.

use std::fmt;
use std::sync::Arc;

use crate::chess_errors::ChessResult;
use crate::game_state::chess_rules::{MAX_FULLMOVE_NUMBER, MAX_UNDO_STATES, STARTING_POSITION_FEN};
use crate::game_state::chess_types::*;
use crate::moves::chess_move::{Move, MoveType};
use crate::moves::directions::*;
use crate::search::zobrist::ZobristKeys;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen_with_keys;

/// Incremental game state optimized for fast move making/unmaking.
#[derive(Clone)]
pub struct Position {
    // 0x88 mailbox.
    board: [Option<Piece>; 128],

    // [color][piece_kind] over dense square indices.
    pieces: [[u64; 6]; 2],
    material: [i32; 2],

    castling_rights: CastlingRights,
    en_passant_square: Option<Square>,
    side_to_move: Color,

    halfmove_clock: u16,
    halfmove_number: u32,

    zobrist_key: u64,
    keys: Arc<ZobristKeys>,

    undo_stack: Vec<UndoState>,
}

impl Position {
    /// Empty board, light to move, no rights.
    pub fn empty(keys: Arc<ZobristKeys>) -> Self {
        let zobrist_key = keys.castling(CASTLE_NONE);
        Self {
            board: [None; 128],
            pieces: [[0; 6]; 2],
            material: [0; 2],
            castling_rights: CASTLE_NONE,
            en_passant_square: None,
            side_to_move: Color::Light,
            halfmove_clock: 0,
            halfmove_number: 2,
            zobrist_key,
            keys,
            undo_stack: Vec::with_capacity(MAX_UNDO_STATES),
        }
    }

    #[inline]
    pub fn new_game() -> Self {
        Self::from_fen(STARTING_POSITION_FEN).expect("starting FEN should always parse")
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen_with_keys(fen, ZobristKeys::standard())
    }

    #[inline]
    pub fn from_fen_with_keys(fen: &str, keys: Arc<ZobristKeys>) -> ChessResult<Self> {
        parse_fen_with_keys(fen, keys)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    // --- Read access ---

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        debug_assert!(is_on_board(square));
        self.board[square as usize]
    }

    /// Occupancy set of one colored piece kind (dense indices).
    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> u64 {
        self.pieces[color.index()][kind.index()]
    }

    #[inline]
    pub fn material(&self, color: Color) -> i32 {
        self.material[color.index()]
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.halfmove_number / 2
    }

    #[inline]
    pub fn zobrist_key(&self) -> u64 {
        self.zobrist_key
    }

    #[inline]
    pub fn zobrist_keys(&self) -> &Arc<ZobristKeys> {
        &self.keys
    }

    /// Number of snapshots currently on the undo stack.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.undo_stack.len()
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        let kings = self.pieces(color, PieceKind::King);
        debug_assert!(kings.count_ones() == 1, "exactly one king per color");
        from_dense(kings.trailing_zeros())
    }

    // --- Setup ---

    pub fn set_side_to_move(&mut self, color: Color) {
        if color != self.side_to_move {
            self.side_to_move = color;
            self.zobrist_key ^= self.keys.side_to_move();
        }
    }

    pub fn set_castling_rights(&mut self, castling_rights: CastlingRights) {
        debug_assert!(castling_rights & !CASTLE_ALL == 0);
        self.zobrist_key ^= self.keys.castling(self.castling_rights);
        self.castling_rights = castling_rights;
        self.zobrist_key ^= self.keys.castling(self.castling_rights);
    }

    pub fn set_en_passant_square(&mut self, square: Option<Square>) {
        if let Some(old) = self.en_passant_square {
            self.zobrist_key ^= self.keys.en_passant(old);
        }
        if let Some(new) = square {
            debug_assert!(is_on_board(new));
            self.zobrist_key ^= self.keys.en_passant(new);
        }
        self.en_passant_square = square;
    }

    pub fn set_halfmove_clock(&mut self, halfmove_clock: u16) {
        self.halfmove_clock = halfmove_clock;
    }

    /// Must be called after the side to move is set. Clamped to
    /// `1..=MAX_FULLMOVE_NUMBER`.
    pub fn set_fullmove_number(&mut self, fullmove_number: u32) {
        self.halfmove_number = fullmove_number.clamp(1, MAX_FULLMOVE_NUMBER) * 2;
        if self.side_to_move == Color::Dark {
            self.halfmove_number += 1;
        }
    }

    /// Place `piece` on an empty square.
    pub fn put(&mut self, piece: Piece, square: Square) {
        debug_assert!(is_on_board(square));
        debug_assert!(self.board[square as usize].is_none());

        self.board[square as usize] = Some(piece);
        self.pieces[piece.color.index()][piece.kind.index()] |= 1u64 << to_dense(square);
        self.material[piece.color.index()] += piece.kind.value();
        self.zobrist_key ^= self.keys.piece_square(piece, square);
    }

    /// Lift the piece standing on `square`.
    pub fn remove(&mut self, square: Square) -> Piece {
        debug_assert!(is_on_board(square));
        let Some(piece) = self.board[square as usize].take() else {
            panic!("remove from empty square {square:#04x}");
        };

        self.pieces[piece.color.index()][piece.kind.index()] &= !(1u64 << to_dense(square));
        self.material[piece.color.index()] -= piece.kind.value();
        self.zobrist_key ^= self.keys.piece_square(piece, square);
        piece
    }

    // --- Make / undo ---

    pub fn make_move(&mut self, mv: Move) {
        debug_assert!(!mv.is_none());

        self.undo_stack.push(UndoState {
            zobrist_key: self.zobrist_key,
            castling_rights: self.castling_rights,
            en_passant_square: self.en_passant_square,
            halfmove_clock: self.halfmove_clock,
        });

        let move_type = mv.move_type();
        let origin = mv.origin();
        let target = mv.target();
        let origin_piece = mv.origin_piece();
        let color = origin_piece.color;

        debug_assert_eq!(color, self.side_to_move);
        debug_assert_eq!(self.piece_at(origin), Some(origin_piece));

        if let Some(captured) = mv.target_piece() {
            let capture_square = capture_square(move_type, origin, target);
            debug_assert_eq!(self.piece_at(capture_square), Some(captured));
            self.remove(capture_square);
            self.clear_castling(capture_square);
        }

        self.remove(origin);
        match mv.promotion() {
            Some(kind) => self.put(Piece::new(color, kind), target),
            None => self.put(origin_piece, target),
        }

        if move_type == MoveType::Castling {
            let (rook_origin, rook_target) = castling_rook_squares(target);
            let rook = self.remove(rook_origin);
            self.put(rook, rook_target);
        }

        self.clear_castling(origin);

        let next_en_passant = if move_type == MoveType::PawnDouble {
            Some(square_at(file_of(origin), (rank_of(origin) + rank_of(target)) / 2))
        } else {
            None
        };
        self.set_en_passant_square(next_en_passant);

        self.side_to_move = color.opposite();
        self.zobrist_key ^= self.keys.side_to_move();

        if origin_piece.kind == PieceKind::Pawn || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        self.halfmove_number += 1;
    }

    pub fn undo_move(&mut self, mv: Move) {
        debug_assert!(!mv.is_none());
        let Some(state) = self.undo_stack.pop() else {
            panic!("undo_move without a matching make_move");
        };

        let move_type = mv.move_type();
        let origin = mv.origin();
        let target = mv.target();

        self.side_to_move = self.side_to_move.opposite();
        debug_assert_eq!(self.side_to_move, mv.origin_piece().color);

        if move_type == MoveType::Castling {
            let (rook_origin, rook_target) = castling_rook_squares(target);
            let rook = self.remove(rook_target);
            self.put(rook, rook_origin);
        }

        self.remove(target);
        self.put(mv.origin_piece(), origin);

        if let Some(captured) = mv.target_piece() {
            self.put(captured, capture_square(move_type, origin, target));
        }

        self.castling_rights = state.castling_rights;
        self.en_passant_square = state.en_passant_square;
        self.halfmove_clock = state.halfmove_clock;
        self.zobrist_key = state.zobrist_key;
        self.halfmove_number -= 1;
    }

    fn clear_castling(&mut self, square: Square) {
        let cleared = match square {
            A1 => CASTLE_LIGHT_QUEENSIDE,
            H1 => CASTLE_LIGHT_KINGSIDE,
            E1 => CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE,
            A8 => CASTLE_DARK_QUEENSIDE,
            H8 => CASTLE_DARK_KINGSIDE,
            E8 => CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE,
            _ => return,
        };

        if self.castling_rights & cleared != 0 {
            self.set_castling_rights(self.castling_rights & !cleared);
        }
    }

    // --- Queries ---

    /// Whether `color`'s king is attacked.
    #[inline]
    pub fn is_check(&self, color: Color) -> bool {
        self.is_attacked(self.king_square(color), color.opposite())
    }

    /// Whether the side to move is in check.
    #[inline]
    pub fn is_check_active(&self) -> bool {
        self.is_check(self.side_to_move)
    }

    /// Whether any piece of `attacker` attacks `target`.
    ///
    /// Traces backwards from `target`: pawn and leaper offsets first, then
    /// each sliding ray up to its first occupied square.
    pub fn is_attacked(&self, target: Square, attacker: Color) -> bool {
        debug_assert!(is_on_board(target));

        let holds = |square: Square, kind: PieceKind| {
            self.board[square as usize] == Some(Piece::new(attacker, kind))
        };

        for delta in pawn_capture_directions(attacker) {
            if shift(target, -delta).is_some_and(|square| holds(square, PieceKind::Pawn)) {
                return true;
            }
        }

        for delta in KNIGHT_DIRECTIONS {
            if shift(target, delta).is_some_and(|square| holds(square, PieceKind::Knight)) {
                return true;
            }
        }

        for delta in KING_DIRECTIONS {
            if shift(target, delta).is_some_and(|square| holds(square, PieceKind::King)) {
                return true;
            }
        }

        self.is_attacked_along(target, attacker, &BISHOP_DIRECTIONS, PieceKind::Bishop)
            || self.is_attacked_along(target, attacker, &ROOK_DIRECTIONS, PieceKind::Rook)
    }

    fn is_attacked_along(
        &self,
        target: Square,
        attacker: Color,
        directions: &[i8],
        slider: PieceKind,
    ) -> bool {
        for &delta in directions {
            let mut square = target;
            while let Some(next) = shift(square, delta) {
                square = next;
                if let Some(piece) = self.board[square as usize] {
                    if piece.color == attacker
                        && (piece.kind == slider || piece.kind == PieceKind::Queen)
                    {
                        return true;
                    }
                    break;
                }
            }
        }
        false
    }

    /// Whether the current position occurred before with the same side to
    /// move since the last irreversible move.
    pub fn is_repetition(&self) -> bool {
        let len = self.undo_stack.len();
        if len < 2 {
            return false;
        }

        let floor = len.saturating_sub(self.halfmove_clock as usize);
        (floor..=len - 2)
            .rev()
            .step_by(2)
            .any(|index| self.undo_stack[index].zobrist_key == self.zobrist_key)
    }

    /// Neither side can possibly deliver mate: no pawns, rooks or queens, and
    /// at most one minor piece each.
    pub fn has_insufficient_material(&self) -> bool {
        Color::ALL.iter().all(|&color| {
            let heavy = self.pieces(color, PieceKind::Pawn)
                | self.pieces(color, PieceKind::Rook)
                | self.pieces(color, PieceKind::Queen);
            let minors = self.pieces(color, PieceKind::Knight) | self.pieces(color, PieceKind::Bishop);
            heavy == 0 && minors.count_ones() <= 1
        })
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("fen", &self.get_fen())
            .field("zobrist_key", &format_args!("{:#018x}", self.zobrist_key))
            .field("history_len", &self.undo_stack.len())
            .finish()
    }
}

/// Square of the piece captured by a move landing on `target`.
#[inline]
fn capture_square(move_type: MoveType, origin: Square, target: Square) -> Square {
    if move_type == MoveType::EnPassant {
        square_at(file_of(target), rank_of(origin))
    } else {
        target
    }
}

/// Rook relocation for a castling move, keyed by the king's target square.
#[inline]
pub fn castling_rook_squares(king_target: Square) -> (Square, Square) {
    match king_target {
        G1 => (H1, F1),
        C1 => (A1, D1),
        G8 => (H8, F8),
        C8 => (A8, D8),
        _ => unreachable!("castling king cannot land on {king_target:#04x}"),
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::Position;
    use crate::game_state::chess_types::*;
    use crate::move_generation::move_generator::MoveGenerator;
    use crate::moves::chess_move::MoveType;
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::long_algebraic::parse_long_algebraic;

    fn snapshot(position: &Position) -> (String, u64, [[u64; 6]; 2], [i32; 2]) {
        (
            position.get_fen(),
            position.zobrist_key(),
            position.pieces,
            position.material,
        )
    }

    fn play(position: &mut Position, moves: &[&str]) {
        for text in moves {
            let mv = parse_long_algebraic(position, text).expect("move should be legal");
            position.make_move(mv);
        }
    }

    fn assert_round_trip(fen: &str, text: &str, expected_type: MoveType) {
        let mut position = Position::from_fen(fen).expect("FEN should parse");
        let before = snapshot(&position);
        let mv = parse_long_algebraic(&mut position, text).expect("move should be legal");
        assert_eq!(mv.move_type(), expected_type);

        position.make_move(mv);
        assert_eq!(position.zobrist_key(), position.zobrist_keys().compute(&position));
        position.undo_move(mv);

        assert_eq!(snapshot(&position), before);
    }

    #[test]
    fn make_undo_round_trips_every_move_type() {
        assert_round_trip(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "g1f3",
            MoveType::Normal,
        );
        assert_round_trip(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "e2e4",
            MoveType::PawnDouble,
        );
        assert_round_trip(
            "rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2",
            "e4d5",
            MoveType::Normal,
        );
        assert_round_trip(
            "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1",
            "e5d6",
            MoveType::EnPassant,
        );
        assert_round_trip(
            "1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1",
            "a7b8n",
            MoveType::PawnPromotion,
        );
        assert_round_trip(
            "4k3/P7/8/8/8/8/8/4K3 w - - 0 1",
            "a7a8q",
            MoveType::PawnPromotion,
        );
        assert_round_trip("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1g1", MoveType::Castling);
        assert_round_trip("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1c1", MoveType::Castling);
        assert_round_trip("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", "e8g8", MoveType::Castling);
        assert_round_trip("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", "e8c8", MoveType::Castling);
    }

    #[test]
    fn castling_relocates_the_rook() {
        let mut position =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        play(&mut position, &["e1g1"]);
        assert_eq!(position.get_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
        play(&mut position, &["e8c8"]);
        assert_eq!(position.get_fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 2 2");
    }

    #[test]
    fn capturing_a_rook_on_its_home_square_clears_that_right() {
        let mut position =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        play(&mut position, &["h1h8"]);
        assert_eq!(position.castling_rights(), CASTLE_LIGHT_QUEENSIDE | CASTLE_DARK_QUEENSIDE);
        assert_eq!(position.zobrist_key(), position.zobrist_keys().compute(&position));
    }

    #[test]
    fn double_push_sets_and_next_move_clears_en_passant() {
        let mut position = Position::new_game();
        play(&mut position, &["e2e4"]);
        assert_eq!(
            position.en_passant_square(),
            Some(algebraic_to_square("e3").expect("square should parse"))
        );
        play(&mut position, &["g8f6"]);
        assert_eq!(position.en_passant_square(), None);
    }

    #[test]
    fn counters_follow_moves() {
        let mut position = Position::new_game();
        play(&mut position, &["g1f3", "g8f6", "f3g1"]);
        assert_eq!(position.halfmove_clock(), 3);
        assert_eq!(position.fullmove_number(), 2);
        play(&mut position, &["e7e5"]);
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.fullmove_number(), 3);
    }

    #[test]
    fn incremental_hash_matches_recomputation_on_random_playouts() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let mut generator = MoveGenerator::new();

        for fen in [
            crate::game_state::chess_rules::STARTING_POSITION_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ] {
            let mut position = Position::from_fen(fen).expect("FEN should parse");
            let start = snapshot(&position);
            let mut played = Vec::new();

            for _ in 0..120 {
                let is_check = position.is_check_active();
                let moves = generator.get_legal_moves(&mut position, 1, is_check);
                if moves.is_empty() {
                    break;
                }
                let mv = moves.get(rng.random_range(0..moves.len()));
                position.make_move(mv);
                played.push(mv);
                assert_eq!(position.zobrist_key(), position.zobrist_keys().compute(&position));
            }

            while let Some(mv) = played.pop() {
                position.undo_move(mv);
                assert_eq!(position.zobrist_key(), position.zobrist_keys().compute(&position));
            }
            assert_eq!(snapshot(&position), start);
        }
    }

    #[test]
    fn knight_shuffle_is_a_repetition() {
        let mut position = Position::new_game();
        assert!(!position.is_repetition());
        play(&mut position, &["g1f3", "g8f6", "f3g1"]);
        assert!(!position.is_repetition());
        play(&mut position, &["f6g8"]);
        assert!(position.is_repetition());
        play(&mut position, &["g1f3", "g8f6", "f3g1", "f6g8"]);
        assert!(position.is_repetition());
    }

    #[test]
    fn pawn_move_cuts_repetition_window() {
        let mut position = Position::new_game();
        play(&mut position, &["g1f3", "g8f6", "f3g1", "f6g8", "e2e3", "g8f6", "g1f3", "f6g8"]);
        assert!(!position.is_repetition());
        play(&mut position, &["f3g1", "g8f6", "g1f3", "f6g8"]);
        assert!(position.is_repetition());
    }

    #[test]
    fn insufficient_material_detection() {
        let bare = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert!(bare.has_insufficient_material());

        let minors =
            Position::from_fen("4k1n1/8/8/8/8/8/8/2B1K3 w - - 0 1").expect("FEN should parse");
        assert!(minors.has_insufficient_material());

        let two_bishops =
            Position::from_fen("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1").expect("FEN should parse");
        assert!(!two_bishops.has_insufficient_material());

        let pawn = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").expect("FEN should parse");
        assert!(!pawn.has_insufficient_material());
    }

    #[test]
    fn attacks_are_traced_from_the_target() {
        let position =
            Position::from_fen("4k3/8/8/3q4/8/1N6/4P3/4K3 w - - 0 1").expect("FEN should parse");
        let square = |text: &str| algebraic_to_square(text).expect("square should parse");

        assert!(position.is_attacked(square("d3"), Color::Light));
        assert!(position.is_attacked(square("f3"), Color::Light));
        assert!(position.is_attacked(square("a5"), Color::Light));
        assert!(position.is_attacked(square("h1"), Color::Dark));
        assert!(position.is_attacked(square("d1"), Color::Dark));
        assert!(!position.is_attacked(square("e1"), Color::Dark));
        assert!(position.is_attacked(square("d2"), Color::Light));
        assert!(!position.is_check_active());
    }

    #[test]
    fn undo_stack_grows_and_shrinks_with_moves() {
        let mut position = Position::new_game();
        let mv = parse_long_algebraic(&mut position, "d2d4").expect("move should be legal");
        position.make_move(mv);
        assert_eq!(position.history_len(), 1);
        position.undo_move(mv);
        assert_eq!(position.history_len(), 0);
    }
}
