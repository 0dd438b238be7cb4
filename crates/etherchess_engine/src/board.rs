//! # Board - Mirrored Bitboard Position
//!
//! ## Overview
//!
//! [`Board`] holds a chess position as eight bitboards: two colour masks
//! (`own` and `opp`) and six piece-kind masks. There is no colour in the
//! piece masks; a white knight and a black knight share `pieces[Knight]` and
//! are told apart by intersecting with `own` or `opp`.
//!
//! ## Side-to-Move Perspective
//!
//! The position is always stored as seen by the side to move: own pawns move
//! north, own castling rook homes are a1/h1 and own promotions happen on rank
//! 8. After each move the whole board is flipped vertically and the colour
//! masks are swapped (see [`Board::mirror`]). This halves the move generator:
//! there is one code path, not a white and a black variant.
//!
//! `is_white` remembers which real colour is to move. It only matters at the
//! edges: FEN, long algebraic notation and display all un-mirror for black.
//!
//! ## Layout
//!
//! ```text
//! own, opp          colour occupancy, disjoint
//! pieces[6]         pawn, king, knight, bishop, rook, queen; disjoint
//! castling          4-bit rights, a1/h1 = own, a8/h8 = opponent
//! en_passant        target square on rank 6, only if a capture is legal
//! fifty_moves       half moves since last capture, pawn move or right loss
//! pieces_hash       XOR of the Zobrist keys of all pieces
//! ```
//!
//! The full hash is `pieces_hash ^ meta_hash(castling, en_passant)`, see
//! [`crate::hash`].
//!
//! ## Invariants
//!
//! Checked by [`Board::validate`], which debug builds run after every
//! mutation that hands a board to another component:
//!
//! - exactly one own king and one opponent king
//! - own and opp are disjoint and their union is the union of piece masks
//! - piece masks are pairwise disjoint
//! - `pieces_hash` equals the hash recomputed from scratch

use std::fmt;

use crate::bitset::{self, bit, Bitboard};
use crate::constants::{A1, A2, A7, A8, E1, E8, H1, H8};
use crate::hash::MirrorZobrist;
use crate::square;
use crate::types::{CastlingRights, Piece, Square};

/// A position, stored from the side to move's point of view
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    own: Bitboard,
    opp: Bitboard,
    pieces: [Bitboard; Piece::COUNT],
    castling: CastlingRights,
    en_passant: Option<Square>,
    fifty_moves: u32,
    full_moves: u32,
    is_white: bool,
    pieces_hash: u64,
    zobrist: &'static MirrorZobrist,
}

impl Default for Board {
    fn default() -> Self {
        Board::startpos()
    }
}

impl Board {
    /// Empty board, white to move, all castling rights set.
    ///
    /// Castling rights start full so that a position built square by square
    /// can drop the ones it does not have.
    pub fn empty() -> Self {
        Board {
            own: 0,
            opp: 0,
            pieces: [0; Piece::COUNT],
            castling: CastlingRights::ALL,
            en_passant: None,
            fifty_moves: 0,
            full_moves: 1,
            is_white: true,
            pieces_hash: 0,
            zobrist: MirrorZobrist::global(),
        }
    }

    /// The standard starting position.
    pub fn startpos() -> Self {
        const BACK_RANK: [Piece; 8] = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        let mut board = Board::empty();
        for (x, piece) in BACK_RANK.into_iter().enumerate() {
            let x = x as Square;
            board.toggle(true, piece, A1 + x);
            board.toggle(true, Piece::Pawn, A2 + x);
            board.toggle(false, Piece::Pawn, A7 + x);
            board.toggle(false, piece, A8 + x);
        }
        debug_assert_eq!(board.validate(), Ok(()));
        board
    }

    #[inline]
    pub fn own(&self) -> Bitboard {
        self.own
    }

    #[inline]
    pub fn opp(&self) -> Bitboard {
        self.opp
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.own | self.opp
    }

    /// All pieces of one kind, both colours.
    #[inline]
    pub fn pieces(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()]
    }

    #[inline]
    pub fn own_pieces(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()] & self.own
    }

    #[inline]
    pub fn opp_pieces(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()] & self.opp
    }

    #[inline]
    pub fn pawns(&self) -> Bitboard {
        self.pieces(Piece::Pawn)
    }

    #[inline]
    pub fn kings(&self) -> Bitboard {
        self.pieces(Piece::King)
    }

    #[inline]
    pub fn knights(&self) -> Bitboard {
        self.pieces(Piece::Knight)
    }

    #[inline]
    pub fn bishops(&self) -> Bitboard {
        self.pieces(Piece::Bishop)
    }

    #[inline]
    pub fn rooks(&self) -> Bitboard {
        self.pieces(Piece::Rook)
    }

    #[inline]
    pub fn queens(&self) -> Bitboard {
        self.pieces(Piece::Queen)
    }

    /// Rooks and queens of both colours.
    #[inline]
    pub fn orthogonal_sliders(&self) -> Bitboard {
        self.rooks() | self.queens()
    }

    /// Bishops and queens of both colours.
    #[inline]
    pub fn diagonal_sliders(&self) -> Bitboard {
        self.bishops() | self.queens()
    }

    #[inline]
    pub fn own_king(&self) -> Square {
        bitset::lowest(self.own_pieces(Piece::King))
    }

    #[inline]
    pub fn opp_king(&self) -> Square {
        bitset::lowest(self.opp_pieces(Piece::King))
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn fifty_moves(&self) -> u32 {
        self.fifty_moves
    }

    /// Full move number as shown in FEN, starting at 1.
    #[inline]
    pub fn full_moves(&self) -> u32 {
        self.full_moves
    }

    /// True if white is the side to move.
    #[inline]
    pub fn is_white(&self) -> bool {
        self.is_white
    }

    /// Full position hash including castling rights and en passant.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.pieces_hash ^ self.zobrist.meta_hash(self.castling, self.en_passant)
    }

    /// Piece kind on `square`, regardless of colour.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let mask = bit(square);
        if self.occupied() & mask == 0 {
            return None;
        }
        Piece::ALL
            .into_iter()
            .find(|piece| self.pieces[piece.index()] & mask != 0)
    }

    /// Add or remove a piece, keeping the pieces hash in step.
    #[inline]
    pub fn toggle(&mut self, own: bool, piece: Piece, square: Square) {
        let mask = bit(square);
        if own {
            self.own ^= mask;
        } else {
            self.opp ^= mask;
        }
        self.pieces[piece.index()] ^= mask;
        self.pieces_hash ^= self.zobrist.piece_hash(own, piece, square);
    }

    /// Move a piece from `from` to `to`. Both toggles in one step.
    #[inline]
    pub fn toggle_move(&mut self, own: bool, piece: Piece, from: Square, to: Square) {
        debug_assert_ne!(from, to);
        let mask = bit(from) ^ bit(to);
        if own {
            self.own ^= mask;
        } else {
            self.opp ^= mask;
        }
        self.pieces[piece.index()] ^= mask;
        self.pieces_hash ^=
            self.zobrist.piece_hash(own, piece, from) ^ self.zobrist.piece_hash(own, piece, to);
    }

    #[inline]
    pub(crate) fn set_castling(&mut self, castling: CastlingRights) {
        self.castling = castling;
    }

    #[inline]
    pub(crate) fn set_en_passant(&mut self, en_passant: Option<Square>) {
        self.en_passant = en_passant;
    }

    #[inline]
    pub(crate) fn set_fifty_moves(&mut self, fifty_moves: u32) {
        self.fifty_moves = fifty_moves;
    }

    #[inline]
    pub(crate) fn set_full_moves(&mut self, full_moves: u32) {
        self.full_moves = full_moves;
    }

    /// Overwrite this board with `other` without allocating.
    #[inline]
    pub fn copy_from(&mut self, other: &Board) {
        debug_assert!(std::ptr::eq(self.zobrist, other.zobrist), "Boards must share keys");
        self.own = other.own;
        self.opp = other.opp;
        self.pieces = other.pieces;
        self.castling = other.castling;
        self.en_passant = other.en_passant;
        self.fifty_moves = other.fifty_moves;
        self.full_moves = other.full_moves;
        self.is_white = other.is_white;
        self.pieces_hash = other.pieces_hash;
    }

    /// Flip the board so the other side is to move.
    pub fn mirror(&mut self) {
        let own = self.own;
        self.own = bitset::mirror(self.opp);
        self.opp = bitset::mirror(own);
        for mask in self.pieces.iter_mut() {
            *mask = bitset::mirror(*mask);
        }
        self.castling = self.castling.mirror();
        self.en_passant = self.en_passant.map(square::mirror);
        if !self.is_white {
            self.full_moves += 1;
        }
        self.is_white = !self.is_white;
        self.pieces_hash = MirrorZobrist::mirror_hash(self.pieces_hash);
        debug_assert_eq!(self.validate(), Ok(()));
    }

    /// Pieces hash recomputed from the bitboards.
    pub fn compute_pieces_hash(&self) -> u64 {
        let mut hash = 0;
        for piece in Piece::ALL {
            for square in bitset::squares(self.own_pieces(piece)) {
                hash ^= self.zobrist.piece_hash(true, piece, square);
            }
            for square in bitset::squares(self.opp_pieces(piece)) {
                hash ^= self.zobrist.piece_hash(false, piece, square);
            }
        }
        hash
    }

    /// Check the structural invariants, returning the first one violated.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.own_pieces(Piece::King).count_ones() != 1 {
            return Err("side to move must have exactly one king");
        }
        if self.opp_pieces(Piece::King).count_ones() != 1 {
            return Err("opponent must have exactly one king");
        }
        if self.own & self.opp != 0 {
            return Err("a square is occupied by both sides");
        }
        let union = self.pieces.iter().fold(0, |acc, mask| acc | mask);
        let xor = self.pieces.iter().fold(0, |acc, mask| acc ^ mask);
        if union != self.occupied() || xor != union {
            return Err("piece masks do not match colour masks");
        }
        if self.compute_pieces_hash() != self.pieces_hash {
            return Err("incremental hash is out of sync");
        }
        Ok(())
    }

    /// Castling rights that still have their king and rook at home.
    pub(crate) fn castling_consistent(&self) -> bool {
        let home_rooks = self.castling.rook_squares();
        let own_king_home = self.own_pieces(Piece::King) & bit(E1) != 0;
        let opp_king_home = self.opp_pieces(Piece::King) & bit(E8) != 0;
        let rooks_ok = home_rooks & !self.rooks() == 0
            && home_rooks & (bit(A1) | bit(H1)) & !self.own == 0
            && home_rooks & (bit(A8) | bit(H8)) & !self.opp == 0;
        let kings_ok = (!self.castling.intersects(CastlingRights::OWN) || own_king_home)
            && (!self.castling.intersects(CastlingRights::OPPONENT) || opp_king_home);
        rooks_ok && kings_ok
    }

    /// Board rendered from white's point of view, rank 8 first.
    pub fn to_board_string(&self) -> String {
        let mut out = String::with_capacity(8 * 16);
        for y in (0..8u8).rev() {
            for x in 0..8u8 {
                let real = square::square(x, y);
                let stored = if self.is_white { real } else { square::mirror(real) };
                let own = self.own & bit(stored) != 0;
                let c = match self.piece_at(stored) {
                    Some(piece) => piece.to_char(own == self.is_white),
                    None => '.',
                };
                out.push(c);
                if x < 7 {
                    out.push(' ');
                }
            }
            if y != 0 {
                out.push('\n');
            }
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_board_string())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.to_board_string())?;
        write!(
            f,
            "white={} castling={:04b} en_passant={:?} fifty={} hash={:016x}",
            self.is_white,
            self.castling.bits(),
            self.en_passant,
            self.fifty_moves,
            self.hash()
        )
    }
}
