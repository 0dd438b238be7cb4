//! # Bitboards
//!
//! ## Overview
//!
//! A bitboard is a plain `u64` where bit `n` stands for square `n`. Squares are
//! numbered `x + 8 * y`, so bit 0 is a1, bit 7 is h1, bit 56 is a8 and bit 63 is
//! h8. Every set operation on the board (occupancy, attacks, masks) is a single
//! integer instruction on this representation.
//!
//! ## Two Symmetries
//!
//! The board representation in [`crate::board`] is always seen from the side to
//! move. Switching perspective is a vertical flip, which on a bitboard is a byte
//! swap:
//!
//! ```text
//!   rank 8  ........      rank 8  xxxx....
//!   rank 1  xxxx....  ->  rank 1  ........
//! ```
//!
//! Reversing all 64 bits rotates the board by 180 degrees. Sliding attacks in
//! the negative directions (south, west, ...) are computed by reversing the
//! occupancy, running the positive-direction formula, and reversing back.
//!
//! | operation    | bitboard form        | square form   |
//! |--------------|----------------------|---------------|
//! | vertical flip| `swap_bytes`         | `sq ^ 56`     |
//! | 180° rotate  | `reverse_bits`       | `63 - sq`     |
//!
//! ## Iteration
//!
//! [`squares`] walks the set bits from lowest to highest by repeatedly taking
//! the trailing zero count and clearing the lowest bit:
//!
//! ```rust,ignore
//! use etherchess_engine::bitset::squares;
//!
//! let knights = 0x42; // b1 and g1
//! let found: Vec<u8> = squares(knights).collect();
//! assert_eq!(found, vec![1, 6]);
//! ```

use crate::types::Square;

/// One bit per square, a1 = bit 0
pub type Bitboard = u64;

/// Bitboard with only `square` set.
#[inline]
pub const fn bit(square: Square) -> Bitboard {
    1u64 << square
}

/// Vertical flip of a bitboard (rank 1 <-> rank 8).
#[inline]
pub const fn mirror(bitboard: Bitboard) -> Bitboard {
    bitboard.swap_bytes()
}

/// 180 degree rotation of a bitboard.
#[inline]
pub const fn reverse(bitboard: Bitboard) -> Bitboard {
    bitboard.reverse_bits()
}

/// Lowest set square. The bitboard must not be empty.
#[inline]
pub const fn lowest(bitboard: Bitboard) -> Square {
    debug_assert!(bitboard != 0);
    bitboard.trailing_zeros() as Square
}

/// True if `bitboard` has two or more bits set.
#[inline]
pub const fn more_than_one(bitboard: Bitboard) -> bool {
    bitboard & bitboard.wrapping_sub(1) != 0
}

#[cfg(test)]
pub const fn contains(bitboard: Bitboard, square: Square) -> bool {
    bitboard & bit(square) != 0
}

/// Iterate the set squares of `bitboard` in ascending order.
#[inline]
pub fn squares(bitboard: Bitboard) -> Squares {
    Squares(bitboard)
}

/// Iterator over set squares, see [`squares`].
#[derive(Debug, Clone, Copy)]
pub struct Squares(Bitboard);

impl Iterator for Squares {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let square = self.0.trailing_zeros() as Square;
        self.0 &= self.0 - 1;
        Some(square)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Squares {}

/// Render a bitboard as an 8x8 grid, rank 8 first.
#[cfg(test)]
pub fn to_grid(bitboard: Bitboard) -> String {
    let mut out = String::with_capacity(72);
    for y in (0..8).rev() {
        for x in 0..8 {
            out.push(if contains(bitboard, x + 8 * y) { 'x' } else { '.' });
        }
        out.push('\n');
    }
    out
}
