//! Material evaluation
//!
//! Counts piece values and nothing else. Useful as a baseline and in tests
//! where positional terms would only add noise.

use super::Evaluation;
use crate::board::Board;
use crate::types::Piece;

const WOOD: [(Piece, i32); 6] = [
    (Piece::Queen, 900),
    (Piece::Rook, 500),
    (Piece::Bishop, 310),
    (Piece::Knight, 290),
    (Piece::Pawn, 100),
    (Piece::King, 15_000),
];

/// Material balance of the side to move
#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialEvaluation;

impl Evaluation for MaterialEvaluation {
    fn evaluate(&self, board: &Board) -> i32 {
        WOOD.iter()
            .map(|&(piece, value)| {
                let own = board.own_pieces(piece).count_ones() as i32;
                let opp = board.opp_pieces(piece).count_ones() as i32;
                value * (own - opp)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::fen::parse_fen;

    #[test]
    fn test_starting_position_is_balanced() {
        assert_eq!(MaterialEvaluation.evaluate(&Board::startpos()), 0);
    }

    #[test]
    fn test_up_a_queen() {
        let mut board = Board::startpos();
        board.toggle(false, Piece::Queen, D8);
        assert_eq!(MaterialEvaluation.evaluate(&board), 900);
    }

    #[test]
    fn test_side_to_move_perspective() {
        let board = parse_fen("4k3/8/8/8/8/8/PP6/4K3 b - - 0 1").unwrap();
        assert_eq!(MaterialEvaluation.evaluate(&board), -200, "Black is two pawns down");
    }
}
