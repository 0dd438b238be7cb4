//! # Legal Move Generation
//!
//! ## Overview
//!
//! Produces exactly the legal moves of a position, with no make/unmake
//! verification pass. Legality comes from three masks computed up front:
//!
//! - **King danger**: every square an opponent piece attacks with the own king
//!   lifted off the board. The king only steps outside it.
//! - **Check masks**: when not in check, captures may land on any opponent
//!   piece and pushes on any square. In single check, captures must hit the
//!   checker and pushes must block between king and checker (nothing for a
//!   leaper). In double check only king moves remain.
//! - **Pins**: for each of the eight rays from the king, a lone own piece
//!   between the king and an opponent slider of the matching kind may only
//!   move along that ray.
//!
//! ## Generation Order
//!
//! ```text
//! king steps, castling
//! (stop here on double check)
//! pinned pieces, per direction
//! pawns, knights, bishops, rooks, queens (unpinned)
//! ```
//!
//! Moves are handed to a sink closure, so callers choose whether to collect,
//! count or filter them:
//!
//! ```rust,ignore
//! let mut count = 0;
//! generate_legal_moves(&board, &mut |_| count += 1);
//! ```

pub mod attack;
pub mod king;
pub mod pawn;
pub mod sliding;
pub mod tables;

use crate::bitset::{self, Bitboard};
use crate::board::Board;
use crate::mv::Move;
use crate::types::{Direction, Piece, Square};

use attack::{king_danger_squares, opponent_checkers};
use sliding::{bishop_rays, direction_ray, queen_rays, rook_rays};
use tables::{knight_attacks, simple_ray, squares_between};

/// Generate every legal move of `board` into `out`.
pub fn generate_legal_moves<F: FnMut(Move)>(board: &Board, out: &mut F) {
    debug_assert_eq!(board.validate(), Ok(()));
    let danger = king_danger_squares(board);
    king::king_moves(board, danger, out);

    let king = board.own_king();
    let mut capture_mask = board.opp();
    let mut push_mask = !0;
    if danger & bitset::bit(king) != 0 {
        let checkers = opponent_checkers(board);
        if bitset::more_than_one(checkers) {
            return;
        }
        debug_assert_eq!(checkers.count_ones(), 1);
        capture_mask = checkers;
        push_mask = squares_between(king, bitset::lowest(checkers));
    }

    let mut pinned = 0;
    let opp_orthogonal = board.orthogonal_sliders() & board.opp();
    let opp_diagonal = board.diagonal_sliders() & board.opp();
    for dir in Direction::ALL {
        let attackers = if dir.is_orthogonal() {
            opp_orthogonal
        } else {
            opp_diagonal
        };
        pinned |= pinned_moves(board, king, dir, attackers, push_mask, capture_mask, out);
    }

    let targets = push_mask | capture_mask;
    let free = board.own() & !pinned;
    pawn::pawn_moves(board, free & board.pawns(), push_mask, capture_mask, out);
    for from in bitset::squares(free & board.knights()) {
        emit(Piece::Knight, from, knight_attacks(from) & !board.own() & targets, out);
    }
    let occupied = board.occupied();
    for from in bitset::squares(free & board.bishops()) {
        emit(Piece::Bishop, from, bishop_rays(from, occupied) & !board.own() & targets, out);
    }
    for from in bitset::squares(free & board.rooks()) {
        emit(Piece::Rook, from, rook_rays(from, occupied) & !board.own() & targets, out);
    }
    for from in bitset::squares(free & board.queens()) {
        emit(Piece::Queen, from, queen_rays(from, occupied) & !board.own() & targets, out);
    }
}

/// Collect the legal moves of `board`.
pub fn legal_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    generate_legal_moves(board, &mut |mv| moves.push(mv));
    moves
}

#[inline]
fn emit<F: FnMut(Move)>(piece: Piece, from: Square, targets: Bitboard, out: &mut F) {
    for to in bitset::squares(targets) {
        out(Move::normal(piece, from, to));
    }
}

/// Generate moves of the piece pinned along `dir`, if any, and return it.
///
/// The pin ray is cast against opponent occupancy only, so it passes through
/// own pieces and stops on the first opponent piece. A pin exists when that
/// ray holds exactly one own piece and ends on a matching slider.
fn pinned_moves<F: FnMut(Move)>(
    board: &Board,
    king: Square,
    dir: Direction,
    attackers: Bitboard,
    push_mask: Bitboard,
    capture_mask: Bitboard,
    out: &mut F,
) -> Bitboard {
    let ray = simple_ray(dir, king);
    if board.own() & ray == 0 || attackers & ray == 0 {
        return 0;
    }
    let pin_ray = direction_ray(dir, king, board.opp());
    let pinned = pin_ray & board.own();
    if pinned.count_ones() != 1 || pin_ray & attackers == 0 {
        return 0;
    }

    let from = bitset::lowest(pinned);
    let slides = (pin_ray ^ pinned) & !board.own() & (push_mask | capture_mask);
    match board.piece_at(from) {
        Some(Piece::Queen) => emit(Piece::Queen, from, slides, out),
        Some(Piece::Rook) if dir.is_orthogonal() => emit(Piece::Rook, from, slides, out),
        Some(Piece::Bishop) if !dir.is_orthogonal() => emit(Piece::Bishop, from, slides, out),
        Some(Piece::Pawn) => {
            pawn::pawn_moves(board, pinned, push_mask & pin_ray, capture_mask & pin_ray, out)
        }
        // knights and cross-pinned sliders stay put
        _ => {}
    }
    pinned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::mv::MoveKind;

    #[test]
    fn test_startpos_has_twenty_moves() {
        let moves = legal_moves(&Board::startpos());
        assert_eq!(moves.len(), 20);
        let doubles = moves.iter().filter(|m| m.kind == MoveKind::DoublePush).count();
        assert_eq!(doubles, 8, "Every pawn can double push");
    }

    #[test]
    fn test_generated_moves_are_unique() {
        let moves = legal_moves(&Board::startpos());
        for (i, a) in moves.iter().enumerate() {
            assert!(!moves[i + 1..].contains(a), "Duplicate move {a}");
        }
    }

    #[test]
    fn test_knight_moves_from_g1() {
        let moves = legal_moves(&Board::startpos());
        assert!(moves.contains(&Move::normal(Piece::Knight, G1, F3)));
        assert!(moves.contains(&Move::normal(Piece::Knight, G1, H3)));
        assert!(!moves.contains(&Move::normal(Piece::Knight, G1, E2)), "Own pawn on e2");
    }
}
