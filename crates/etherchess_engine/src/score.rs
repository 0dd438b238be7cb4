//! Score conventions
//!
//! Scores are centipawns from the side to move's point of view. Mate is
//! encoded near the edge of the `i16` range: being mated at ply `p` scores
//! `-(MATE_SCORE - p)`, so shorter mates are preferred by both sides.
//!
//! Plies here are absolute (counted from the start of the game history), so
//! mate scores are made relative to the storing node before they go into the
//! transposition table and made absolute again when loaded.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MATE_SCORE: i32 = 32766;
/// Anything at or beyond this magnitude is a mate score
pub const MATE_BOUND: i32 = 32000;
/// Widest search window, just outside every reachable score
pub const INFINITY: i32 = i16::MAX as i32;

#[inline]
pub const fn mate_score(ply: usize) -> i32 {
    MATE_SCORE - ply as i32
}

/// Score for the side to move being mated at `ply`.
#[inline]
pub const fn mate_loss_score(ply: usize) -> i32 {
    -mate_score(ply)
}

#[inline]
pub const fn is_mate_score(score: i32) -> bool {
    score >= MATE_BOUND || score <= -MATE_BOUND
}

/// Absolute ply at which the mate encoded in `score` happens.
#[inline]
pub const fn ply_from_mate_score(score: i32) -> i32 {
    MATE_SCORE - score.abs()
}

/// Convert a score found at `ply` into its table form.
pub fn to_table_score(score: i32, ply: usize) -> i16 {
    let ply = ply as i32;
    let converted = if score >= MATE_BOUND {
        score + ply
    } else if score <= -MATE_BOUND {
        score - ply
    } else {
        score
    };
    converted.clamp(-INFINITY, INFINITY) as i16
}

/// Convert a table score back to a score valid at `ply`.
pub fn from_table_score(score: i16, ply: usize) -> i32 {
    let score = score as i32;
    let ply = ply as i32;
    if score >= MATE_BOUND {
        score - ply
    } else if score <= -MATE_BOUND {
        score + ply
    } else {
        score
    }
}

/// Score as reported to users: centipawns or moves to mate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Score {
    Centipawns(i32),
    /// Full moves until mate; negative when the side to move gets mated
    Mate(i32),
}

impl Score {
    /// Turn a search score into a report relative to the root at `root_ply`.
    pub fn from_search(score: i32, root_ply: usize) -> Score {
        if !is_mate_score(score) {
            return Score::Centipawns(score);
        }
        let plies = ply_from_mate_score(score) - root_ply as i32;
        if score > 0 {
            Score::Mate((plies + 1) / 2)
        } else {
            Score::Mate(-(plies / 2))
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Centipawns(cp) => write!(f, "cp {cp}"),
            Score::Mate(moves) => write!(f, "mate {moves}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mate_found_deeper_reads_one_ply_closer() {
        let stored = to_table_score(mate_score(5), 5);
        assert_eq!(from_table_score(stored, 6), mate_score(5) - 1);
    }

    #[test]
    fn test_mated_found_deeper_reads_one_ply_closer() {
        let stored = to_table_score(mate_loss_score(5), 5);
        assert_eq!(from_table_score(stored, 6), mate_loss_score(5) + 1);
    }

    #[test]
    fn test_normal_scores_pass_through() {
        assert_eq!(to_table_score(150, 9), 150);
        assert_eq!(from_table_score(-150, 9), -150);
    }

    #[test]
    fn test_report_mate_distance() {
        // root at ply 10, opponent mated at ply 11: mate in 1
        assert_eq!(Score::from_search(mate_score(11), 10), Score::Mate(1));
        assert_eq!(Score::from_search(mate_score(13), 10), Score::Mate(2));
        // side to move mated at ply 12: mated in 1
        assert_eq!(Score::from_search(mate_loss_score(12), 10), Score::Mate(-1));
        assert_eq!(Score::from_search(35, 10), Score::Centipawns(35));
    }

    #[test]
    fn test_mate_detection() {
        assert!(is_mate_score(mate_score(100)));
        assert!(is_mate_score(mate_loss_score(100)));
        assert!(!is_mate_score(2500));
    }
}
