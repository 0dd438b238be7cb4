//! # Moves
//!
//! A [`Move`] is a plain value: kind, moving piece, origin and destination,
//! all in the side-to-move frame. It knows how to apply itself to a
//! [`Board`], including all rule side effects (captures, castling rights,
//! en passant, fifty-move counter), and finishes by flipping the board so the
//! opponent is to move.
//!
//! ## Kinds
//!
//! | code | kind            | notes                                   |
//! |------|-----------------|-----------------------------------------|
//! | 0    | `Normal`        | quiet moves and ordinary captures       |
//! | 1    | `DoublePush`    | pawn two squares forward                |
//! | 2    | `EnPassant`     | captured pawn sits behind `to`          |
//! | 3-6  | `Promote*`      | queen, rook, bishop, knight             |
//! | 7    | `Castling`      | king e1 to c1 or g1, rook follows       |
//!
//! ## Compact Codecs
//!
//! ```text
//! 32 bit:  [kind:8][piece:8][from:8][to:8]
//! 16 bit:  [kind:4][from:6][to:6]          piece re-read from the board
//! ```
//!
//! Zero decodes to "no move" in both codecs. No legal move packs to zero
//! because `from != to`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bitset::{self, bit};
use crate::board::Board;
use crate::constants::{A1, C1, D1, E1, F1, G1, H1, RANK_4};
use crate::move_gen::sliding::{bishop_rays, rook_rays};
use crate::square;
use crate::types::{CastlingRights, Piece, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MoveKind {
    Normal = 0,
    DoublePush = 1,
    EnPassant = 2,
    PromoteQueen = 3,
    PromoteRook = 4,
    PromoteBishop = 5,
    PromoteKnight = 6,
    Castling = 7,
}

impl MoveKind {
    pub const fn from_bits(bits: u8) -> Option<MoveKind> {
        match bits {
            0 => Some(MoveKind::Normal),
            1 => Some(MoveKind::DoublePush),
            2 => Some(MoveKind::EnPassant),
            3 => Some(MoveKind::PromoteQueen),
            4 => Some(MoveKind::PromoteRook),
            5 => Some(MoveKind::PromoteBishop),
            6 => Some(MoveKind::PromoteKnight),
            7 => Some(MoveKind::Castling),
            _ => None,
        }
    }

    /// Piece a pawn turns into, for promotion kinds.
    pub const fn promotion(self) -> Option<Piece> {
        match self {
            MoveKind::PromoteQueen => Some(Piece::Queen),
            MoveKind::PromoteRook => Some(Piece::Rook),
            MoveKind::PromoteBishop => Some(Piece::Bishop),
            MoveKind::PromoteKnight => Some(Piece::Knight),
            _ => None,
        }
    }

    pub const fn for_promotion(piece: Piece) -> Option<MoveKind> {
        match piece {
            Piece::Queen => Some(MoveKind::PromoteQueen),
            Piece::Rook => Some(MoveKind::PromoteRook),
            Piece::Bishop => Some(MoveKind::PromoteBishop),
            Piece::Knight => Some(MoveKind::PromoteKnight),
            _ => None,
        }
    }
}

/// A move in the side-to-move frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub kind: MoveKind,
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
}

/// Queen side castling, as generated
pub const LARGE_CASTLING: Move = Move::new(MoveKind::Castling, Piece::King, E1, C1);
/// King side castling, as generated
pub const SMALL_CASTLING: Move = Move::new(MoveKind::Castling, Piece::King, E1, G1);

impl Move {
    pub const fn new(kind: MoveKind, piece: Piece, from: Square, to: Square) -> Self {
        Move {
            kind,
            piece,
            from,
            to,
        }
    }

    #[inline]
    pub const fn normal(piece: Piece, from: Square, to: Square) -> Self {
        Move::new(MoveKind::Normal, piece, from, to)
    }

    /// Play this move on `board` and flip it to the opponent's view.
    ///
    /// The move must be legal in `board`; only the move generator's output is.
    pub fn apply(self, board: &mut Board) {
        debug_assert_eq!(board.piece_at(self.from), Some(self.piece));
        debug_assert_eq!(board.own() & bit(self.to), 0);
        board.set_fifty_moves(board.fifty_moves() + 1);
        match self.kind {
            MoveKind::Normal => self.apply_normal(board),
            MoveKind::DoublePush => self.apply_double_push(board),
            MoveKind::EnPassant => self.apply_en_passant(board),
            MoveKind::Castling => self.apply_castling(board),
            MoveKind::PromoteQueen
            | MoveKind::PromoteRook
            | MoveKind::PromoteBishop
            | MoveKind::PromoteKnight => self.apply_promotion(board),
        }
        debug_assert_eq!(board.validate(), Ok(()));
        board.mirror();
    }

    fn apply_normal(self, board: &mut Board) {
        if let Some(captured) = board.piece_at(self.to) {
            debug_assert_ne!(captured, Piece::King);
            board.toggle(false, captured, self.to);
            board.set_castling(board.castling().without(CastlingRights::for_square(self.to)));
            board.set_fifty_moves(0);
        }
        board.toggle_move(true, self.piece, self.from, self.to);
        match self.piece {
            Piece::Pawn => board.set_fifty_moves(0),
            Piece::King => {
                if board.castling().intersects(CastlingRights::OWN) {
                    board.set_castling(board.castling().without(CastlingRights::OWN));
                    board.set_fifty_moves(0);
                }
            }
            Piece::Rook => {
                let right = CastlingRights::for_square(self.from);
                if board.castling().intersects(right) {
                    board.set_castling(board.castling().without(right));
                    board.set_fifty_moves(0);
                }
            }
            _ => {}
        }
        board.set_en_passant(None);
    }

    fn apply_double_push(self, board: &mut Board) {
        debug_assert_eq!(self.piece, Piece::Pawn);
        board.toggle_move(true, Piece::Pawn, self.from, self.to);
        board.set_fifty_moves(0);
        board.set_en_passant(capturable_en_passant(board, self.from + 8, self.to));
    }

    fn apply_en_passant(self, board: &mut Board) {
        debug_assert_eq!(board.en_passant(), Some(self.to));
        board.toggle_move(true, Piece::Pawn, self.from, self.to);
        board.toggle(false, Piece::Pawn, self.to - 8);
        board.set_fifty_moves(0);
        board.set_en_passant(None);
    }

    fn apply_promotion(self, board: &mut Board) {
        debug_assert_eq!(square::rank_of(self.to), 7);
        if let Some(captured) = board.piece_at(self.to) {
            board.toggle(false, captured, self.to);
            board.set_castling(board.castling().without(CastlingRights::for_square(self.to)));
        }
        board.toggle(true, Piece::Pawn, self.from);
        if let Some(promoted) = self.kind.promotion() {
            board.toggle(true, promoted, self.to);
        }
        board.set_fifty_moves(0);
        board.set_en_passant(None);
    }

    fn apply_castling(self, board: &mut Board) {
        debug_assert_eq!(self.from, E1);
        board.toggle_move(true, Piece::King, self.from, self.to);
        let (rook_from, rook_to) = if self.to == C1 { (A1, D1) } else { (H1, F1) };
        board.toggle_move(true, Piece::Rook, rook_from, rook_to);
        board.set_fifty_moves(0);
        board.set_en_passant(None);
        board.set_castling(board.castling().without(CastlingRights::OWN));
    }

    /// Pack into 32 bits, see the module docs.
    #[inline]
    pub const fn pack32(self) -> u32 {
        (self.kind as u32) << 24
            | (self.piece as u32) << 16
            | (self.from as u32) << 8
            | self.to as u32
    }

    /// Inverse of [`Move::pack32`]. Zero and malformed values give `None`.
    pub fn unpack32(raw: u32) -> Option<Move> {
        if raw == 0 {
            return None;
        }
        let (Some(kind), Some(piece)) = (
            MoveKind::from_bits((raw >> 24) as u8),
            Piece::from_index((raw >> 16) as u8),
        ) else {
            return None;
        };
        let from = (raw >> 8) as u8;
        let to = raw as u8;
        if from >= 64 || to >= 64 || from == to {
            return None;
        }
        Some(Move::new(kind, piece, from, to))
    }

    /// Pack into 16 bits. The piece is dropped.
    #[inline]
    pub const fn pack16(self) -> u16 {
        (self.kind as u16) << 12 | (self.from as u16) << 6 | self.to as u16
    }

    /// Inverse of [`Move::pack16`], reading the moving piece from `board`.
    pub fn unpack16(raw: u16, board: &Board) -> Option<Move> {
        if raw == 0 {
            return None;
        }
        let kind = MoveKind::from_bits((raw >> 12) as u8)?;
        let from = ((raw >> 6) & 63) as Square;
        let to = (raw & 63) as Square;
        let piece = board.piece_at(from)?;
        Some(Move::new(kind, piece, from, to))
    }

    pub fn is_promotion(self) -> bool {
        self.kind.promotion().is_some()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}->{})",
            self.piece,
            square::name(self.from),
            square::name(self.to)
        )
    }
}

/// En passant square to record after an own double push to `to`, or `None`
/// if no opponent pawn could legally take it.
///
/// `board` has the pawn already moved and is still in the pusher's frame.
/// A capture is ruled out when removing both pawns would expose the
/// opponent king to an own slider.
fn capturable_en_passant(board: &Board, en_passant: Square, to: Square) -> Option<Square> {
    let neighbours = (bit(to - 1) | bit(to + 1)) & RANK_4;
    let candidates = board.opp_pieces(Piece::Pawn) & neighbours;
    if candidates == 0 {
        return None;
    }
    let king = board.opp_king();
    let orthogonal = board.orthogonal_sliders() & board.own();
    let diagonal = board.diagonal_sliders() & board.own();
    for pawn in bitset::squares(candidates) {
        let occupied = board.occupied() ^ (bit(pawn) | bit(en_passant) | bit(to));
        let exposed = rook_rays(king, occupied) & orthogonal != 0
            || bishop_rays(king, occupied) & diagonal != 0;
        if !exposed {
            return Some(en_passant);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;

    #[test]
    fn test_pack32_layout() {
        let mv = Move::new(MoveKind::PromoteRook, Piece::Pawn, G7, H8);
        assert_eq!(mv.pack32() >> 24, MoveKind::PromoteRook as u32, "Kind sits in the top byte");
        assert_eq!(mv.pack32() & 0xFF, H8 as u32, "Destination sits in the low byte");
        assert_eq!(Move::unpack32(mv.pack32()), Some(mv));
    }

    #[test]
    fn test_unpack_zero_is_none() {
        assert_eq!(Move::unpack32(0), None);
        assert_eq!(Move::unpack16(0, &Board::startpos()), None);
    }

    #[test]
    fn test_unpack32_rejects_garbage() {
        assert_eq!(Move::unpack32(0x0900_0102), None, "Kind 9 does not exist");
        assert_eq!(Move::unpack32(0x0006_0102), None, "Piece 6 does not exist");
        assert_eq!(Move::unpack32(0x0002_0505), None, "from == to");
    }

    #[test]
    fn test_pack16_reads_piece_from_board() {
        let board = Board::startpos();
        let mv = Move::normal(Piece::Knight, G1, F3);
        assert_eq!(Move::unpack16(mv.pack16(), &board), Some(mv));
    }

    #[test]
    fn test_no_move_packs_to_zero() {
        let mv = Move::new(MoveKind::Normal, Piece::Pawn, A1, B1);
        assert_ne!(mv.pack32(), 0);
        assert_ne!(mv.pack16(), 0);
    }

    #[test]
    fn test_apply_flips_perspective() {
        let mut board = Board::startpos();
        Move::new(MoveKind::DoublePush, Piece::Pawn, E2, E4).apply(&mut board);
        assert!(!board.is_white());
        assert_eq!(board.piece_at(E5), Some(Piece::Pawn), "White e4 pawn seen from black is on e5");
        assert_eq!(board.opp() & bit(E5), bit(E5));
        assert_eq!(board.en_passant(), None, "No black pawn can capture");
        assert_eq!(board.fifty_moves(), 0);
    }

    #[test]
    fn test_knight_move_counts_fifty() {
        let mut board = Board::startpos();
        Move::normal(Piece::Knight, G1, F3).apply(&mut board);
        assert_eq!(board.fifty_moves(), 1);
        assert_eq!(board.castling(), CastlingRights::ALL);
    }

    #[test]
    fn test_king_move_drops_own_rights() {
        let mut board = Board::startpos();
        board.toggle(true, Piece::Pawn, E2);
        Move::normal(Piece::King, E1, E2).apply(&mut board);
        // after the flip white's rights are the opponent half
        assert_eq!(board.castling(), CastlingRights::OWN);
        assert_eq!(board.fifty_moves(), 0, "Losing castling rights is irreversible");
    }
}
