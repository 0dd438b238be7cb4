//! Piece-square evaluation
//!
//! Sums the piece-square value of every own piece and subtracts the same for
//! the opponent. Opponent pieces are flipped into their own frame first so
//! both sides read the tables the same way.

use super::pst;
use super::Evaluation;
use crate::bitset::{self, Bitboard};
use crate::board::Board;
use crate::types::Piece;

/// Material plus piece-square bonuses
#[derive(Debug, Default, Clone, Copy)]
pub struct PieceSquareEvaluation;

fn sum(piece: Piece, squares: Bitboard) -> i32 {
    bitset::squares(squares).map(|sq| pst::score(piece, sq)).sum()
}

impl Evaluation for PieceSquareEvaluation {
    fn evaluate(&self, board: &Board) -> i32 {
        Piece::ALL
            .into_iter()
            .map(|piece| {
                sum(piece, board.own_pieces(piece))
                    - sum(piece, bitset::mirror(board.opp_pieces(piece)))
            })
            .sum()
    }
}
