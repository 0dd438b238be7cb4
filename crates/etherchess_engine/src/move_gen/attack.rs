//! Attack detection
//!
//! Who attacks a square, who gives check, and which squares the own king must
//! avoid. All functions work in the side-to-move frame: opponent pawns
//! capture south, own pawns capture north.

use crate::bitset::{self, bit, Bitboard};
use crate::board::Board;
use crate::constants::{FILE_A, FILE_H};
use crate::move_gen::sliding::{bishop_rays, rook_rays};
use crate::move_gen::tables::{
    king_attacks, king_danger_bishops_mask, king_danger_knights_mask, king_danger_rooks_mask,
    knight_attacks,
};
use crate::types::{Piece, Square};

/// Squares attacked by opponent pawns.
#[inline]
pub fn opponent_pawn_attacks(pawns: Bitboard) -> Bitboard {
    ((pawns >> 7) & !FILE_A) | ((pawns >> 9) & !FILE_H)
}

/// Squares attacked by own pawns.
#[inline]
pub fn own_pawn_attacks(pawns: Bitboard) -> Bitboard {
    ((pawns << 7) & !FILE_H) | ((pawns << 9) & !FILE_A)
}

/// Squares the own king may not step on.
///
/// The own king is removed from the occupancy first, so a slider checking
/// along a line also covers the square behind the king.
pub fn king_danger_squares(board: &Board) -> Bitboard {
    let own_king = board.own_pieces(Piece::King);
    let king = bitset::lowest(own_king);
    let occupied = board.occupied() ^ own_king;
    let opp = board.opp();

    let mut danger = opponent_pawn_attacks(board.pawns() & opp);
    let rook_likes = board.orthogonal_sliders() & opp & king_danger_rooks_mask(king);
    for from in bitset::squares(rook_likes) {
        danger |= rook_rays(from, occupied);
    }
    let bishop_likes = board.diagonal_sliders() & opp & king_danger_bishops_mask(king);
    for from in bitset::squares(bishop_likes) {
        danger |= bishop_rays(from, occupied);
    }
    let knights = board.knights() & opp & king_danger_knights_mask(king);
    for from in bitset::squares(knights) {
        danger |= knight_attacks(from);
    }
    danger | king_attacks(board.opp_king())
}

fn attackers(board: &Board, target: Square, pawns_mask: Bitboard, side: Bitboard) -> Bitboard {
    let occupied = board.occupied();
    (knight_attacks(target) & board.knights()
        | pawns_mask & board.pawns()
        | rook_rays(target, occupied) & board.orthogonal_sliders()
        | bishop_rays(target, occupied) & board.diagonal_sliders())
        & side
}

/// Opponent pieces (kings excluded) attacking `target`.
pub fn opponent_attackers(board: &Board, target: Square) -> Bitboard {
    attackers(board, target, own_pawn_attacks(bit(target)), board.opp())
}

/// Own pieces (kings excluded) attacking `target`.
pub fn own_attackers(board: &Board, target: Square) -> Bitboard {
    attackers(board, target, opponent_pawn_attacks(bit(target)), board.own())
}

/// Opponent pieces giving check to the own king.
#[inline]
pub fn opponent_checkers(board: &Board) -> Bitboard {
    opponent_attackers(board, board.own_king())
}

/// Own pieces attacking the opponent king. Non-empty means the position is
/// not reachable by legal play.
#[inline]
pub fn own_checkers(board: &Board) -> Bitboard {
    own_attackers(board, board.opp_king())
}

/// True if the side to move is in check.
#[inline]
pub fn in_check(board: &Board) -> bool {
    opponent_checkers(board) != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;

    fn kings_only(own_king: Square, opp_king: Square) -> Board {
        let mut board = Board::empty();
        board.set_castling(crate::types::CastlingRights::NONE);
        board.toggle(true, Piece::King, own_king);
        board.toggle(false, Piece::King, opp_king);
        board
    }

    #[test]
    fn test_pawn_attack_directions() {
        assert_eq!(own_pawn_attacks(bit(E4)), bit(D5) | bit(F5));
        assert_eq!(opponent_pawn_attacks(bit(E5)), bit(D4) | bit(F4));
        assert_eq!(own_pawn_attacks(bit(A2)), bit(B3), "No wrap from a to h file");
        assert_eq!(opponent_pawn_attacks(bit(H7)), bit(G6), "No wrap from h to a file");
    }

    #[test]
    fn test_rook_check_and_danger_behind_king() {
        let mut board = kings_only(E1, A8);
        board.toggle(false, Piece::Rook, E8);
        assert_eq!(opponent_checkers(&board), bit(E8));
        assert!(in_check(&board));
        let danger = king_danger_squares(&board);
        assert!(danger & bit(E2) != 0, "Square in front of the king is attacked");
        assert!(danger & bit(D1) == 0);
    }

    #[test]
    fn test_knight_and_pawn_checkers() {
        let mut board = kings_only(E1, A8);
        board.toggle(false, Piece::Knight, D3);
        board.toggle(false, Piece::Pawn, F2);
        assert_eq!(opponent_checkers(&board), bit(D3) | bit(F2));
    }

    #[test]
    fn test_own_attackers() {
        let mut board = kings_only(E1, E8);
        board.toggle(true, Piece::Pawn, D7);
        board.toggle(true, Piece::Bishop, H5);
        assert_eq!(own_checkers(&board), bit(D7) | bit(H5));
    }

    #[test]
    fn test_blocked_slider_is_not_a_checker() {
        let mut board = kings_only(E1, A8);
        board.toggle(false, Piece::Queen, E8);
        board.toggle(true, Piece::Knight, E4);
        assert_eq!(opponent_checkers(&board), 0);
    }
}
