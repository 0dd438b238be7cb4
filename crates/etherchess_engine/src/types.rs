//! Core value types shared across the engine: squares, pieces, ray directions
//! and castling rights.
//!
//! All of them are small `Copy` values. Pieces carry no colour: the board
//! stores colour separately as "own" and "opponent" occupancy, see
//! [`crate::board`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bitset::{self, Bitboard};

/// Square index `x + 8 * y`, a1 = 0, h8 = 63
pub type Square = u8;

/// Piece kinds, in the order the board stores their bitboards
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    King = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
}

impl Piece {
    pub const COUNT: usize = 6;

    pub const ALL: [Piece; Piece::COUNT] = [
        Piece::Pawn,
        Piece::King,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: u8) -> Option<Piece> {
        match index {
            0 => Some(Piece::Pawn),
            1 => Some(Piece::King),
            2 => Some(Piece::Knight),
            3 => Some(Piece::Bishop),
            4 => Some(Piece::Rook),
            5 => Some(Piece::Queen),
            _ => None,
        }
    }

    /// FEN letter, upper case for white.
    pub fn to_char(self, white: bool) -> char {
        let c = match self {
            Piece::Pawn => 'p',
            Piece::King => 'k',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
        };
        if white {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }

    /// Parse a FEN letter into the piece and whether it is white.
    pub fn from_char(c: char) -> Option<(Piece, bool)> {
        let piece = match c.to_ascii_lowercase() {
            'p' => Piece::Pawn,
            'k' => Piece::King,
            'n' => Piece::Knight,
            'b' => Piece::Bishop,
            'r' => Piece::Rook,
            'q' => Piece::Queen,
            _ => return None,
        };
        Some((piece, c.is_ascii_uppercase()))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char(true))
    }
}

/// The eight ray directions, as seen by the side to move (north = towards rank 8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Rook-like directions; the rest are bishop-like.
    #[inline]
    pub const fn is_orthogonal(self) -> bool {
        matches!(
            self,
            Direction::North | Direction::East | Direction::South | Direction::West
        )
    }

    /// Rays in these directions walk towards higher square indices.
    #[inline]
    pub const fn is_positive(self) -> bool {
        matches!(
            self,
            Direction::North | Direction::NorthEast | Direction::East | Direction::NorthWest
        )
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
        }
    }
}

/// Castling rights as a 4-bit set keyed by the rook's home square.
///
/// Bits are absolute to the current perspective: `A1`/`H1` belong to the
/// side to move, `A8`/`H8` to the opponent. Mirroring the board swaps the
/// two halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const A1: CastlingRights = CastlingRights(1);
    pub const H1: CastlingRights = CastlingRights(2);
    pub const A8: CastlingRights = CastlingRights(4);
    pub const H8: CastlingRights = CastlingRights(8);
    pub const OWN: CastlingRights = CastlingRights(1 | 2);
    pub const OPPONENT: CastlingRights = CastlingRights(4 | 8);
    pub const ALL: CastlingRights = CastlingRights(15);

    #[inline]
    pub const fn from_bits(bits: u8) -> CastlingRights {
        CastlingRights(bits & 15)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if any right of `other` is present.
    #[inline]
    pub const fn intersects(self, other: CastlingRights) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn contains(self, other: CastlingRights) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn with(self, other: CastlingRights) -> CastlingRights {
        CastlingRights(self.0 | other.0)
    }

    #[inline]
    pub const fn without(self, other: CastlingRights) -> CastlingRights {
        CastlingRights(self.0 & !other.0)
    }

    /// Swap own and opponent halves.
    #[inline]
    pub const fn mirror(self) -> CastlingRights {
        CastlingRights(((self.0 << 2) | (self.0 >> 2)) & 15)
    }

    /// The right tied to a rook home square, or `NONE` for any other square.
    #[inline]
    pub const fn for_square(square: Square) -> CastlingRights {
        match square {
            0 => CastlingRights::A1,
            7 => CastlingRights::H1,
            56 => CastlingRights::A8,
            63 => CastlingRights::H8,
            _ => CastlingRights::NONE,
        }
    }

    /// Rook home squares of the rights present.
    pub fn rook_squares(self) -> Bitboard {
        let mut result = 0;
        for (right, square) in [
            (CastlingRights::A1, 0),
            (CastlingRights::H1, 7),
            (CastlingRights::A8, 56),
            (CastlingRights::H8, 63),
        ] {
            if self.contains(right) {
                result |= bitset::bit(square);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_char_roundtrip_case() {
        assert_eq!(Piece::from_char('N'), Some((Piece::Knight, true)));
        assert_eq!(Piece::from_char('q'), Some((Piece::Queen, false)));
        assert_eq!(Piece::from_char('x'), None, "Unknown letters are rejected");
        assert_eq!(Piece::Rook.to_char(false), 'r');
    }

    #[test]
    fn test_piece_indices_are_stable() {
        for (i, piece) in Piece::ALL.iter().enumerate() {
            assert_eq!(piece.index(), i);
            assert_eq!(Piece::from_index(i as u8), Some(*piece));
        }
        assert_eq!(Piece::from_index(6), None);
    }

    #[test]
    fn test_castling_mirror_swaps_halves() {
        assert_eq!(CastlingRights::A1.mirror(), CastlingRights::A8);
        assert_eq!(CastlingRights::H8.mirror(), CastlingRights::H1);
        assert_eq!(CastlingRights::OWN.mirror(), CastlingRights::OPPONENT);
        assert_eq!(CastlingRights::ALL.mirror(), CastlingRights::ALL);
    }

    #[test]
    fn test_castling_for_square() {
        assert_eq!(CastlingRights::for_square(0), CastlingRights::A1);
        assert_eq!(CastlingRights::for_square(63), CastlingRights::H8);
        assert_eq!(CastlingRights::for_square(4), CastlingRights::NONE, "e1 is not a rook square");
    }

    #[test]
    fn test_direction_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.is_positive(), dir.opposite().is_positive());
            assert_eq!(dir.is_orthogonal(), dir.opposite().is_orthogonal());
        }
    }
}
