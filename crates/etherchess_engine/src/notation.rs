//! Long algebraic notation (`e2e4`, `e7e8q`, `e1g1`)
//!
//! Moves live in the side-to-move frame, so squares are flipped back when
//! black is to move. Parsing resolves the text against the legal moves of
//! the position, which also fills in the move kind.

use crate::board::Board;
use crate::error::{EngineError, EngineResult};
use crate::fen;
use crate::move_gen::legal_moves;
use crate::mv::{Move, MoveKind};
use crate::square;
use crate::types::Piece;

/// Render `mv`, played by white if `is_white`, as long algebraic notation.
pub fn to_lan(mv: Move, is_white: bool) -> String {
    let (from, to) = if is_white {
        (mv.from, mv.to)
    } else {
        (square::mirror(mv.from), square::mirror(mv.to))
    };
    let mut out = square::name(from);
    out.push_str(&square::name(to));
    if let Some(piece) = mv.kind.promotion() {
        out.push(piece.to_char(false));
    }
    out
}

/// Parse `text` as a legal move of `board`.
pub fn parse_lan(board: &Board, text: &str) -> EngineResult<Move> {
    let invalid = || EngineError::InvalidMove {
        notation: text.to_string(),
    };
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(invalid());
    }
    let from = square::parse(&text[0..2]).map_err(|_| invalid())?;
    let to = square::parse(&text[2..4]).map_err(|_| invalid())?;
    let promotion = match text[4..].chars().next() {
        None => None,
        Some(c) => match Piece::from_char(c) {
            Some((piece, _)) => Some(MoveKind::for_promotion(piece).ok_or_else(invalid)?),
            None => return Err(invalid()),
        },
    };
    let (from, to) = if board.is_white() {
        (from, to)
    } else {
        (square::mirror(from), square::mirror(to))
    };

    legal_moves(board)
        .into_iter()
        .find(|mv| {
            mv.from == from
                && mv.to == to
                && match promotion {
                    Some(kind) => mv.kind == kind,
                    None => !mv.is_promotion(),
                }
        })
        .ok_or_else(|| EngineError::IllegalMove {
            notation: text.to_string(),
            fen: fen::to_fen(board),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;

    #[test]
    fn test_lan_for_white_and_black() {
        let mv = Move::normal(Piece::Knight, G1, F3);
        assert_eq!(to_lan(mv, true), "g1f3");
        assert_eq!(to_lan(mv, false), "g8f6", "Black's g1 is the real g8");
    }

    #[test]
    fn test_promotion_suffix() {
        let mv = Move::new(MoveKind::PromoteKnight, Piece::Pawn, B7, B8);
        assert_eq!(to_lan(mv, true), "b7b8n");
    }

    #[test]
    fn test_parse_resolves_kind() {
        let board = Board::startpos();
        let mv = parse_lan(&board, "e2e4").unwrap();
        assert_eq!(mv.kind, MoveKind::DoublePush);
        assert_eq!(mv.piece, Piece::Pawn);
    }

    #[test]
    fn test_parse_for_black() {
        let mut board = Board::startpos();
        parse_lan(&board, "e2e4").unwrap().apply(&mut board);
        let reply = parse_lan(&board, "e7e5").unwrap();
        assert_eq!((reply.from, reply.to), (E2, E4), "Stored in black's own frame");
        assert_eq!(to_lan(reply, board.is_white()), "e7e5");
    }

    #[test]
    fn test_parse_castling() {
        let board = fen::parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(parse_lan(&board, "e1g1").unwrap().kind, MoveKind::Castling);
        assert_eq!(parse_lan(&board, "e1c1").unwrap().kind, MoveKind::Castling);
    }

    #[test]
    fn test_parse_errors() {
        let board = Board::startpos();
        assert!(matches!(parse_lan(&board, "0000"), Err(EngineError::InvalidMove { .. })));
        assert!(matches!(parse_lan(&board, "e2"), Err(EngineError::InvalidMove { .. })));
        assert!(matches!(parse_lan(&board, "e2e4k"), Err(EngineError::InvalidMove { .. })));
        assert!(matches!(parse_lan(&board, "e2e5"), Err(EngineError::IllegalMove { .. })));
        assert!(matches!(parse_lan(&board, "e7e5"), Err(EngineError::IllegalMove { .. })));
    }
}
