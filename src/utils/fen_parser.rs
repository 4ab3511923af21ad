//! FEN-to-Position parser.
//!
//! Builds a fully-populated incremental position from a Forsyth-Edwards
//! Notation string. Besides syntax, the parser rejects positions the engine
//! cannot search safely: missing or extra kings, pawns on a back rank, the
//! side that just moved left in check, or an en-passant square without a
//! capturable pawn behind it. Castling rights whose king or rook is not on its
//! home square are dropped.

use std::sync::Arc;

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::MAX_FULLMOVE_NUMBER;
use crate::game_state::chess_types::*;
use crate::search::zobrist::ZobristKeys;
use crate::utils::algebraic::algebraic_to_square;

/// Parse `fen` using the process-wide Zobrist table.
pub fn parse_fen(fen: &str) -> ChessResult<Position> {
    parse_fen_with_keys(fen, ZobristKeys::standard())
}

pub fn parse_fen_with_keys(fen: &str, keys: Arc<ZobristKeys>) -> ChessResult<Position> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| invalid("missing board layout"))?;
    let side_part = parts.next().ok_or_else(|| invalid("missing side to move"))?;
    let castling_part = parts.next().ok_or_else(|| invalid("missing castling rights"))?;
    let en_passant_part = parts.next().ok_or_else(|| invalid("missing en-passant square"))?;
    // Clocks are optional; many GUIs send four-field FENs.
    let halfmove_part = parts.next().unwrap_or("0");
    let fullmove_part = parts.next().unwrap_or("1");

    if parts.next().is_some() {
        return Err(invalid("extra trailing fields"));
    }

    let mut position = Position::empty(keys);

    parse_board(board_part, &mut position)?;
    validate_kings(&position)?;

    position.set_side_to_move(parse_side_to_move(side_part)?);
    position.set_castling_rights(sanitize_castling_rights(
        &position,
        parse_castling_rights(castling_part)?,
    ));
    position.set_en_passant_square(parse_en_passant_square(en_passant_part, &position)?);

    let halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| invalid(&format!("halfmove clock '{halfmove_part}'")))?;
    position.set_halfmove_clock(halfmove_clock);

    let fullmove_number = fullmove_part
        .parse::<u32>()
        .ok()
        .filter(|&number| number <= MAX_FULLMOVE_NUMBER)
        .ok_or_else(|| invalid(&format!("fullmove number '{fullmove_part}'")))?;
    position.set_fullmove_number(fullmove_number);

    if position.is_check(position.side_to_move().opposite()) {
        return Err(invalid("side not to move is in check"));
    }

    Ok(position)
}

fn invalid(reason: &str) -> ChessError {
    ChessError::InvalidFen(reason.to_owned())
}

fn parse_board(board_part: &str, position: &mut Position) -> ChessResult<()> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks"));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(invalid(&format!("empty-square count '{ch}'")));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err(invalid("board rank has too many files"));
                }
                continue;
            }

            let piece = piece_from_fen_char(ch)
                .ok_or_else(|| invalid(&format!("piece character '{ch}'")))?;

            if file >= 8 {
                return Err(invalid("board rank has too many files"));
            }
            if piece.kind == PieceKind::Pawn && (rank == 0 || rank == 7) {
                return Err(invalid("pawn on a back rank"));
            }

            position.put(piece, square_at(file, rank));
            file += 1;
        }

        if file != 8 {
            return Err(invalid("board rank does not sum to 8 files"));
        }
    }

    Ok(())
}

fn validate_kings(position: &Position) -> ChessResult<()> {
    for color in Color::ALL {
        if position.pieces(color, PieceKind::King).count_ones() != 1 {
            return Err(invalid(&format!("{color:?} must have exactly one king")));
        }
    }
    Ok(())
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(invalid(&format!("side to move '{side_part}'"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    if castling_part == "-" {
        return Ok(CASTLE_NONE);
    }

    let mut rights = CASTLE_NONE;
    for ch in castling_part.chars() {
        match ch {
            'K' => rights |= CASTLE_LIGHT_KINGSIDE,
            'Q' => rights |= CASTLE_LIGHT_QUEENSIDE,
            'k' => rights |= CASTLE_DARK_KINGSIDE,
            'q' => rights |= CASTLE_DARK_QUEENSIDE,
            _ => return Err(invalid(&format!("castling rights character '{ch}'"))),
        }
    }

    Ok(rights)
}

fn sanitize_castling_rights(position: &Position, rights: CastlingRights) -> CastlingRights {
    let light_king = Some(Piece::new(Color::Light, PieceKind::King));
    let light_rook = Some(Piece::new(Color::Light, PieceKind::Rook));
    let dark_king = Some(Piece::new(Color::Dark, PieceKind::King));
    let dark_rook = Some(Piece::new(Color::Dark, PieceKind::Rook));

    [
        (CASTLE_LIGHT_KINGSIDE, E1, light_king, H1, light_rook),
        (CASTLE_LIGHT_QUEENSIDE, E1, light_king, A1, light_rook),
        (CASTLE_DARK_KINGSIDE, E8, dark_king, H8, dark_rook),
        (CASTLE_DARK_QUEENSIDE, E8, dark_king, A8, dark_rook),
    ]
    .into_iter()
    .filter(|&(flag, king_square, king, rook_square, rook)| {
        rights & flag != 0
            && position.piece_at(king_square) == king
            && position.piece_at(rook_square) == rook
    })
    .fold(CASTLE_NONE, |acc, (flag, ..)| acc | flag)
}

fn parse_en_passant_square(en_passant_part: &str, position: &Position) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(en_passant_part)
        .map_err(|_| invalid(&format!("en-passant square '{en_passant_part}'")))?;

    let mover = position.side_to_move();
    let (expected_rank, pawn_rank) = match mover {
        Color::Light => (5, 4),
        Color::Dark => (2, 3),
    };
    let capturable = Some(Piece::new(mover.opposite(), PieceKind::Pawn));

    if rank_of(square) != expected_rank
        || position.piece_at(square).is_some()
        || position.piece_at(square_at(file_of(square), pawn_rank)) != capturable
    {
        return Err(invalid(&format!("en-passant square '{en_passant_part}' has no capturable pawn")));
    }

    Ok(Some(square))
}

fn piece_from_fen_char(ch: char) -> Option<Piece> {
    let color = if ch.is_ascii_uppercase() {
        Color::Light
    } else if ch.is_ascii_lowercase() {
        Color::Dark
    } else {
        return None;
    };

    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some(Piece::new(color, kind))
}
