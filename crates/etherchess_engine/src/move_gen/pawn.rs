//! Pawn move generation
//!
//! Own pawns always move north. Pushes are filtered by the push mask,
//! captures by the capture mask, so the same routine serves unpinned pawns,
//! pawns pinned along a line and check evasions.

use crate::bitset::{self, bit, Bitboard};
use crate::board::Board;
use crate::constants::{A8, FILE_A, FILE_H, RANK_4, RANK_5};
use crate::move_gen::sliding::{bishop_rays, rook_rays};
use crate::mv::{Move, MoveKind};
use crate::types::{Piece, Square};

/// Promotion order as generated.
const PROMOTIONS: [MoveKind; 4] = [
    MoveKind::PromoteQueen,
    MoveKind::PromoteKnight,
    MoveKind::PromoteRook,
    MoveKind::PromoteBishop,
];

#[inline]
fn emit_pawn_move<F: FnMut(Move)>(from: Square, to: Square, out: &mut F) {
    if to >= A8 {
        for kind in PROMOTIONS {
            out(Move::new(kind, Piece::Pawn, from, to));
        }
    } else {
        out(Move::normal(Piece::Pawn, from, to));
    }
}

/// Generate moves for the given own `pawns`.
pub fn pawn_moves<F: FnMut(Move)>(
    board: &Board,
    pawns: Bitboard,
    push_mask: Bitboard,
    capture_mask: Bitboard,
    out: &mut F,
) {
    let empty = !board.occupied();
    let singles = (pawns << 8) & empty;
    let doubles = (singles << 8) & empty & RANK_4;

    for to in bitset::squares(singles & push_mask) {
        emit_pawn_move(to - 8, to, out);
    }
    for to in bitset::squares(doubles & push_mask) {
        out(Move::new(MoveKind::DoublePush, Piece::Pawn, to - 16, to));
    }

    if let Some(target) = board.en_passant() {
        en_passant_moves(board, pawns, target, out);
    }

    let left = (pawns << 7) & !FILE_H & board.opp() & capture_mask;
    for to in bitset::squares(left) {
        emit_pawn_move(to - 7, to, out);
    }
    let right = (pawns << 9) & !FILE_A & board.opp() & capture_mask;
    for to in bitset::squares(right) {
        emit_pawn_move(to - 9, to, out);
    }
}

/// En passant captures onto `target`.
///
/// Each candidate is tested by lifting both pawns and dropping the capturer
/// on `target`, then looking for an opponent slider on the own king. That one
/// test covers ordinary pins, the horizontal double-pawn pin and check
/// evasion.
fn en_passant_moves<F: FnMut(Move)>(board: &Board, pawns: Bitboard, target: Square, out: &mut F) {
    let candidates = (bit(target - 9) | bit(target - 7)) & RANK_5 & pawns;
    if candidates == 0 {
        return;
    }
    let king = board.own_king();
    let orthogonal = board.orthogonal_sliders() & board.opp();
    let diagonal = board.diagonal_sliders() & board.opp();
    for from in bitset::squares(candidates) {
        let occupied = board.occupied() ^ (bit(from) | bit(target) | bit(target - 8));
        if rook_rays(king, occupied) & orthogonal != 0 || bishop_rays(king, occupied) & diagonal != 0
        {
            continue;
        }
        out(Move::new(MoveKind::EnPassant, Piece::Pawn, from, target));
    }
}
