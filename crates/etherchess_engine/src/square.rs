//! Square coordinate helpers and algebraic names.

use crate::error::{EngineError, EngineResult};
use crate::types::Square;

#[inline]
pub const fn square(x: u8, y: u8) -> Square {
    x + 8 * y
}

/// File index, 0 = a
#[inline]
pub const fn file_of(square: Square) -> u8 {
    square & 7
}

/// Rank index, 0 = rank 1
#[inline]
pub const fn rank_of(square: Square) -> u8 {
    square >> 3
}

/// Vertical flip, the square counterpart of [`crate::bitset::mirror`].
#[inline]
pub const fn mirror(square: Square) -> Square {
    square ^ 56
}

/// Algebraic name such as `e4`.
pub fn name(square: Square) -> String {
    let mut s = String::with_capacity(2);
    s.push((b'a' + file_of(square)) as char);
    s.push((b'1' + rank_of(square)) as char);
    s
}

/// Parse an algebraic name such as `e4`.
pub fn parse(text: &str) -> EngineResult<Square> {
    let invalid = || EngineError::InvalidSquare {
        square: text.to_string(),
    };
    match text.as_bytes() {
        [f @ b'a'..=b'h', r @ b'1'..=b'8'] => Ok(square(f - b'a', r - b'1')),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(name(0), "a1");
        assert_eq!(name(63), "h8");
        assert_eq!(name(square(4, 3)), "e4");
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse("e4"), Ok(28));
        assert_eq!(parse("h8"), Ok(63));
        assert!(parse("i1").is_err(), "File i does not exist");
        assert!(parse("a9").is_err(), "Rank 9 does not exist");
        assert!(parse("e").is_err());
    }

    #[test]
    fn test_coordinates() {
        assert_eq!(file_of(30), 6);
        assert_eq!(rank_of(30), 3);
        assert_eq!(mirror(square(2, 1)), square(2, 6));
    }
}
