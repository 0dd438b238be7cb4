//! FEN import and export
//!
//! Pieces are placed with white as the own side; when black is to move the
//! finished board is mirrored, so the stored frame is always the mover's.
//! Parsing is all-or-nothing: a board is only returned once every field has
//! been read and the position passed the legality checks below.
//!
//! Rejected positions:
//! - missing or extra kings
//! - pawns on the first or last rank
//! - castling rights without king and rook on their home squares
//! - an en passant square with no pawn that just double pushed
//! - the side not to move standing in check
//!
//! An en passant square no pawn can legally capture on is dropped, matching
//! what [`crate::mv::Move::apply`] records after a double push.

use std::str::FromStr;

use crate::bitset::bit;
use crate::board::Board;
use crate::constants::{RANK_1, RANK_8};
use crate::error::{EngineError, EngineResult};
use crate::move_gen::tables::king_attacks;
use crate::move_gen::{attack, legal_moves};
use crate::mv::MoveKind;
use crate::square;
use crate::types::{CastlingRights, Piece};

/// Parse a FEN string. Halfmove and fullmove fields are optional.
pub fn parse_fen(fen: &str) -> EngineResult<Board> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if !(4..=6).contains(&fields.len()) {
        return Err(EngineError::invalid_fen(fen, "expected 4 to 6 fields"));
    }

    let mut board = Board::empty();
    parse_placement(&mut board, fen, fields[0])?;
    let white = match fields[1] {
        "w" => true,
        "b" => false,
        other => return Err(EngineError::invalid_fen(fen, format!("bad side to move '{other}'"))),
    };
    board.set_castling(parse_castling(fen, fields[2])?);
    let en_passant = match fields[3] {
        "-" => None,
        text => Some(square::parse(text).map_err(|_| {
            EngineError::invalid_fen(fen, format!("bad en passant square '{text}'"))
        })?),
    };
    let fifty = match fields.get(4) {
        Some(text) => text
            .parse::<u32>()
            .map_err(|_| EngineError::invalid_fen(fen, format!("bad halfmove clock '{text}'")))?,
        None => 0,
    };
    let full_moves = match fields.get(5) {
        Some(text) => text
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| EngineError::invalid_fen(fen, format!("bad fullmove number '{text}'")))?,
        None => 1,
    };

    board.set_fifty_moves(fifty);
    check_position(&board)?;
    if !white {
        board.mirror();
    }
    board.set_full_moves(full_moves);

    // before any move generation, which assumes a reachable position
    let kings_touch = king_attacks(board.own_king()) & bit(board.opp_king()) != 0;
    if kings_touch || attack::own_checkers(&board) != 0 {
        return Err(EngineError::InvalidPosition {
            reason: "side not to move is in check".to_string(),
        });
    }

    if let Some(target) = en_passant {
        let target = if white { target } else { square::mirror(target) };
        check_en_passant(&board, target)?;
        board.set_en_passant(Some(target));
        let capturable = legal_moves(&board)
            .iter()
            .any(|mv| mv.kind == MoveKind::EnPassant);
        if !capturable {
            board.set_en_passant(None);
        }
    }
    Ok(board)
}

fn parse_placement(board: &mut Board, fen: &str, placement: &str) -> EngineResult<()> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(EngineError::invalid_fen(fen, "expected 8 ranks"));
    }
    for (i, row) in rows.iter().enumerate() {
        let y = 7 - i as u8;
        let mut x = 0u8;
        for c in row.chars() {
            if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                x += skip as u8;
            } else if let Some((piece, white)) = Piece::from_char(c) {
                if x < 8 {
                    board.toggle(white, piece, square::square(x, y));
                }
                x += 1;
            } else {
                return Err(EngineError::invalid_fen(fen, format!("bad piece '{c}'")));
            }
            if x > 8 {
                return Err(EngineError::invalid_fen(
                    fen,
                    format!("rank {} has more than 8 squares", y + 1),
                ));
            }
        }
        if x != 8 {
            return Err(EngineError::invalid_fen(
                fen,
                format!("rank {} does not have 8 squares", y + 1),
            ));
        }
    }
    Ok(())
}

fn parse_castling(fen: &str, text: &str) -> EngineResult<CastlingRights> {
    if text == "-" {
        return Ok(CastlingRights::NONE);
    }
    let mut rights = CastlingRights::NONE;
    for c in text.chars() {
        let right = match c {
            'K' => CastlingRights::H1,
            'Q' => CastlingRights::A1,
            'k' => CastlingRights::H8,
            'q' => CastlingRights::A8,
            _ => return Err(EngineError::invalid_fen(fen, format!("bad castling flag '{c}'"))),
        };
        if rights.contains(right) {
            return Err(EngineError::invalid_fen(fen, format!("repeated castling flag '{c}'")));
        }
        rights = rights.with(right);
    }
    Ok(rights)
}

/// Structural legality, checked in white's frame before any mirroring.
fn check_position(board: &Board) -> EngineResult<()> {
    let invalid = |reason: &str| EngineError::InvalidPosition {
        reason: reason.to_string(),
    };
    board.validate().map_err(invalid)?;
    if board.pawns() & (RANK_1 | RANK_8) != 0 {
        return Err(invalid("pawn on first or last rank"));
    }
    if !board.castling_consistent() {
        return Err(invalid("castling rights without king and rook at home"));
    }
    Ok(())
}

/// The en passant target must sit on rank 6 of the mover with an opponent
/// pawn right in front of it and both squares it passed empty.
fn check_en_passant(board: &Board, target: u8) -> EngineResult<()> {
    let ok = square::rank_of(target) == 5
        && board.occupied() & (bit(target) | bit(target + 8)) == 0
        && board.opp_pieces(Piece::Pawn) & bit(target - 8) != 0;
    if ok {
        Ok(())
    } else {
        Err(EngineError::InvalidPosition {
            reason: format!("no double pushed pawn behind en passant square {}", square::name(target)),
        })
    }
}

/// Export `board` as FEN.
pub fn to_fen(board: &Board) -> String {
    let white = board.is_white();
    let mut out = String::with_capacity(90);
    for i in 0..8u8 {
        if i != 0 {
            out.push('/');
        }
        let y = if white { 7 - i } else { i };
        let mut empty = 0;
        for x in 0..8u8 {
            let sq = square::square(x, y);
            match board.piece_at(sq) {
                None => empty += 1,
                Some(piece) => {
                    if empty != 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    let own = board.own() & bit(sq) != 0;
                    out.push(piece.to_char(own == white));
                }
            }
        }
        if empty != 0 {
            out.push_str(&empty.to_string());
        }
    }

    out.push_str(if white { " w " } else { " b " });

    let castling = if white {
        board.castling()
    } else {
        board.castling().mirror()
    };
    if castling.is_empty() {
        out.push('-');
    } else {
        for (right, c) in [
            (CastlingRights::H1, 'K'),
            (CastlingRights::A1, 'Q'),
            (CastlingRights::H8, 'k'),
            (CastlingRights::A8, 'q'),
        ] {
            if castling.contains(right) {
                out.push(c);
            }
        }
    }

    out.push(' ');
    match board.en_passant() {
        Some(target) => {
            let target = if white { target } else { square::mirror(target) };
            out.push_str(&square::name(target));
        }
        None => out.push('-'),
    }
    out.push_str(&format!(" {} {}", board.fifty_moves(), board.full_moves()));
    out
}

impl FromStr for Board {
    type Err = EngineError;

    fn from_str(fen: &str) -> EngineResult<Board> {
        parse_fen(fen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;

    #[test]
    fn test_startpos_matches_builder() {
        let parsed = parse_fen(STARTPOS_FEN).unwrap();
        assert_eq!(parsed, Board::startpos());
        assert_eq!(to_fen(&parsed), STARTPOS_FEN);
    }

    #[test]
    fn test_black_to_move_is_mirrored() {
        let board = parse_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1").unwrap();
        assert!(!board.is_white());
        assert_eq!(board.own_king(), E1, "Black king is on e1 in its own frame");
        assert_eq!(board.opp_pieces(Piece::Pawn) & bit(E5), bit(E5));
    }

    #[test]
    fn test_export_preserves_fields() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b Kq - 7 42";
        assert_eq!(to_fen(&parse_fen(fen).unwrap()), fen);
    }

    #[test]
    fn test_capturable_en_passant_is_kept() {
        let fen = "7k/8/8/3pP3/2K5/8/8/8 w - d6 0 1";
        let board = parse_fen(fen).unwrap();
        assert_eq!(board.en_passant(), Some(D6));
        assert_eq!(to_fen(&board), fen);
    }

    #[test]
    fn test_uncapturable_en_passant_is_dropped() {
        let board = parse_fen("rnbqkbnr/pppp1ppp/8/4p3/8/8/PPPPPPPP/RNBQKBNR w KQkq e6 0 2").unwrap();
        assert_eq!(board.en_passant(), None, "No white pawn next to e5");
    }

    #[test]
    fn test_four_field_fen() {
        let board = parse_fen("4k3/8/8/8/8/8/8/4K3 w - -").unwrap();
        assert_eq!(board.fifty_moves(), 0);
        assert_eq!(board.full_moves(), 1);
    }

    #[test]
    fn test_rejects_malformed() {
        let bad = [
            "",
            "8/8/8/8/8/8/8/8 w - -",
            "4k3/8/8/8/8/8/8/4K3 x - -",
            "4k3/8/8/8/8/8/8/4K2 w - -",
            "4k3/8/8/8/8/8/8/4K4 w - -",
            "4k3/8/8/8/8/8/8/4K3 w X -",
            "4k3/8/8/8/8/8/8/4K3 w - z9",
            "4k3/8/8/8/8/8/8/4K3 w - - x 1",
            "4k3/8/8/8/8/8/8/4K3/8 w - -",
        ];
        for fen in bad {
            assert!(parse_fen(fen).is_err(), "FEN '{fen}' should be rejected");
        }
    }

    #[test]
    fn test_rejects_illegal_positions() {
        let bad = [
            ("4k3/8/8/8/8/8/8/4KK2 w - -", "two white kings"),
            ("4k3/8/8/8/8/8/8/8 w - -", "no white king"),
            ("4k3/8/8/8/8/8/8/P3K3 w - -", "pawn on rank 1"),
            ("4k3/8/8/8/8/8/8/4K3 w K -", "castling without rook"),
            ("4k3/4R3/8/8/8/8/8/4K3 w - -", "black king in check with white to move"),
            ("4k3/8/8/8/8/8/8/4K3 w - e6", "en passant without pawn"),
        ];
        for (fen, why) in bad {
            assert!(
                matches!(parse_fen(fen), Err(EngineError::InvalidPosition { .. })),
                "Expected rejection: {why}"
            );
        }
    }

    #[test]
    fn test_rejects_adjacent_kings() {
        for fen in [
            "8/8/8/8/8/8/8/3kK3 w - - 0 1",
            "8/8/8/8/8/8/8/3kK3 b - - 0 1",
            "8/8/8/8/4k3/4K3/8/8 w - - 0 1",
            "8/8/8/8/5k2/4K3/8/8 b - - 0 1",
        ] {
            let result = parse_fen(fen);
            assert!(
                matches!(result, Err(EngineError::InvalidPosition { .. })),
                "Kings cannot touch: {fen} gave {result:?}"
            );
        }
        // one square apart is fine and generates moves
        let board = parse_fen("8/8/8/8/8/8/8/2k1K3 w - - 0 1").unwrap();
        assert_eq!(legal_moves(&board).len(), 3, "e2, f1 and f2");
    }

    #[test]
    fn test_from_str() {
        let board: Board = STARTPOS_FEN.parse().unwrap();
        assert_eq!(board.hash(), Board::startpos().hash());
    }
}
