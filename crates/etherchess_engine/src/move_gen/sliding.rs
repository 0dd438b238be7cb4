//! Sliding piece attacks
//!
//! Uses the subtraction trick on a single line mask: for a slider on `square`
//! looking in a positive direction along `mask`,
//!
//! ```text
//! ((occupied & mask) - 2 * bit(square)) ^ occupied) & mask
//! ```
//!
//! yields every square up to and including the first blocker. Negative
//! directions reverse the board, apply the same formula and reverse back, so
//! no magic tables are needed.

use crate::bitset::{self, bit, Bitboard};
use crate::move_gen::tables::line_of;
use crate::types::{Direction, Square};

#[inline]
fn positive_ray(square: Square, mask: Bitboard, occupied: Bitboard) -> Bitboard {
    (((occupied & mask).wrapping_sub(bit(square) << 1)) ^ occupied) & mask
}

/// Attacked squares from `square` in `dir`, stopping at (and including) the
/// first occupied square.
#[inline]
pub fn direction_ray(dir: Direction, square: Square, occupied: Bitboard) -> Bitboard {
    if dir.is_positive() {
        positive_ray(square, line_of(dir, square), occupied)
    } else {
        let mirrored = dir.opposite();
        let reversed = 63 - square;
        bitset::reverse(positive_ray(
            reversed,
            line_of(mirrored, reversed),
            bitset::reverse(occupied),
        ))
    }
}

#[inline]
pub fn rook_rays(square: Square, occupied: Bitboard) -> Bitboard {
    direction_ray(Direction::North, square, occupied)
        | direction_ray(Direction::South, square, occupied)
        | direction_ray(Direction::East, square, occupied)
        | direction_ray(Direction::West, square, occupied)
}

#[inline]
pub fn bishop_rays(square: Square, occupied: Bitboard) -> Bitboard {
    direction_ray(Direction::NorthEast, square, occupied)
        | direction_ray(Direction::SouthWest, square, occupied)
        | direction_ray(Direction::NorthWest, square, occupied)
        | direction_ray(Direction::SouthEast, square, occupied)
}

#[inline]
pub fn queen_rays(square: Square, occupied: Bitboard) -> Bitboard {
    rook_rays(square, occupied) | bishop_rays(square, occupied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::move_gen::tables::simple_ray;

    #[test]
    fn test_empty_board_rays_match_simple_rays() {
        for square in 0..64u8 {
            for dir in Direction::ALL {
                assert_eq!(
                    direction_ray(dir, square, 0),
                    simple_ray(dir, square),
                    "Empty board ray {dir:?} from {square}"
                );
            }
        }
    }

    #[test]
    fn test_ray_stops_at_blocker() {
        let occupied = bit(D4) | bit(D7) | bit(B4);
        assert_eq!(
            direction_ray(Direction::North, D4, occupied),
            bit(D5) | bit(D6) | bit(D7),
            "North ray includes the blocker"
        );
        assert_eq!(
            direction_ray(Direction::West, D4, occupied),
            bit(C4) | bit(B4),
            "West ray includes the blocker"
        );
    }

    #[test]
    fn test_rook_and_bishop_counts() {
        assert_eq!(rook_rays(D4, bit(D4)).count_ones(), 14);
        assert_eq!(bishop_rays(D4, bit(D4)).count_ones(), 13);
        assert_eq!(queen_rays(A1, bit(A1)).count_ones(), 21);
    }
}
