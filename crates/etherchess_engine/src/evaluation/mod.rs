//! Static evaluation
//!
//! Evaluations score a position in centipawns from the side to move's point
//! of view. Search only needs the [`Evaluation`] trait, so evaluators can be
//! swapped without touching it.
//!
//! ## Module Organization
//!
//! - `pst` - piece-square tables with material folded in
//! - `material` - plain material count
//! - `position` - piece-square evaluation, the default

mod material;
mod position;
pub mod pst;

pub use material::MaterialEvaluation;
pub use position::PieceSquareEvaluation;

use crate::board::Board;

/// Scores a position for the side to move
pub trait Evaluation: Send + Sync {
    fn evaluate(&self, board: &Board) -> i32;
}
