//! King moves and castling

use crate::bitset::{self, bit, Bitboard};
use crate::board::Board;
use crate::constants::{B1, C1, D1, E1, F1, G1};
use crate::move_gen::tables::king_attacks;
use crate::mv::{Move, LARGE_CASTLING, SMALL_CASTLING};
use crate::types::{CastlingRights, Piece};

const LARGE_CASTLING_EMPTY: Bitboard = bit(B1) | bit(C1) | bit(D1);
const LARGE_CASTLING_SAFE: Bitboard = bit(C1) | bit(D1) | bit(E1);
const SMALL_CASTLING_EMPTY: Bitboard = bit(F1) | bit(G1);
const SMALL_CASTLING_SAFE: Bitboard = bit(E1) | bit(F1) | bit(G1);

/// King steps that avoid `danger`, plus castling when not in check.
pub fn king_moves<F: FnMut(Move)>(board: &Board, danger: Bitboard, out: &mut F) {
    let king = board.own_king();
    let targets = king_attacks(king) & !(board.own() | danger);
    for to in bitset::squares(targets) {
        out(Move::normal(Piece::King, king, to));
    }

    if danger & bit(king) != 0 {
        return;
    }
    let castling = board.castling();
    let occupied = board.occupied();
    if castling.contains(CastlingRights::A1)
        && occupied & LARGE_CASTLING_EMPTY == 0
        && danger & LARGE_CASTLING_SAFE == 0
    {
        out(LARGE_CASTLING);
    }
    if castling.contains(CastlingRights::H1)
        && occupied & SMALL_CASTLING_EMPTY == 0
        && danger & SMALL_CASTLING_SAFE == 0
    {
        out(SMALL_CASTLING);
    }
}
