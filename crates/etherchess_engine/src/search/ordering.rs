//! Move ordering heuristics
//!
//! Ordering priority (highest to lowest):
//! 1. Hash move from the transposition table
//! 2. Captures, most valuable victim first (piece-square value)
//! 3. Moves of cheaper pieces (by value on their origin square) first
//! 4. Largest placement gain first

use std::cmp::Reverse;

use crate::board::Board;
use crate::evaluation::pst;
use crate::mv::Move;

/// Sort `moves` best first for `board`.
pub fn order_moves(board: &Board, moves: &mut [Move], hash_move: Option<Move>) {
    moves.sort_by_cached_key(|&mv| order_key(board, mv, hash_move));
}

fn order_key(board: &Board, mv: Move, hash_move: Option<Move>) -> (bool, Reverse<i32>, i32, Reverse<i32>) {
    let victim = pst::score_of(board.piece_at(mv.to), mv.to);
    let origin = pst::score(mv.piece, mv.from);
    let gain = pst::score(mv.piece, mv.to) - origin;
    (Some(mv) != hash_move, Reverse(victim), origin, Reverse(gain))
}
