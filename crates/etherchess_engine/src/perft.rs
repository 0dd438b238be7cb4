//! Perft: count leaf nodes of the legal move tree
//!
//! Used to verify the move generator against published counts. Subtree
//! counts can be memoized in any [`Table`]; the payload is
//! `count << 8 | depth`, so an entry only answers for the exact depth it was
//! computed at. Pass a [`crate::table::NoopTable`] to count without caching.

use tracing::trace;

use crate::board::Board;
use crate::move_gen::{generate_legal_moves, legal_moves};
use crate::mv::Move;
use crate::table::Table;

/// Deepest perft the table payload can describe
pub const MAX_PERFT_DEPTH: u32 = 0xFF;

pub struct Perft<T: Table> {
    table: T,
}

impl<T: Table> Perft<T> {
    pub fn new(table: T) -> Self {
        Perft { table }
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    /// Number of legal move sequences of length `depth` from `board`.
    pub fn perft(&mut self, board: &Board, depth: u32) -> u64 {
        debug_assert!(depth <= MAX_PERFT_DEPTH);
        if depth == 0 {
            return 1;
        }
        let hash = board.hash();
        if let Some(raw) = self.table.load(hash) {
            if raw & 0xFF == u64::from(depth) {
                return raw >> 8;
            }
        }

        let sum = if depth == 1 {
            let mut count = 0;
            generate_legal_moves(board, &mut |_| count += 1);
            count
        } else {
            let mut child = board.clone();
            let mut sum = 0;
            for mv in legal_moves(board) {
                child.copy_from(board);
                mv.apply(&mut child);
                sum += self.perft(&child, depth - 1);
            }
            sum
        };
        self.table.store(hash, sum << 8 | u64::from(depth));
        sum
    }

    /// Perft split by root move, sorted by piece, origin, kind and
    /// destination.
    pub fn divide(&mut self, board: &Board, depth: u32) -> Vec<(Move, u64)> {
        if depth == 0 {
            return Vec::new();
        }
        let mut moves = legal_moves(board);
        moves.sort_by_key(|mv| (mv.piece, mv.from, mv.kind, mv.to));
        let mut child = board.clone();
        moves
            .into_iter()
            .map(|mv| {
                child.copy_from(board);
                mv.apply(&mut child);
                let count = self.perft(&child, depth - 1);
                trace!(%mv, count, "divide");
                (mv, count)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::parse_fen;
    use crate::notation::to_lan;
    use crate::table::{AlwaysReplaceTable, NoopTable};

    #[test]
    fn test_startpos_shallow() {
        let mut perft = Perft::new(NoopTable);
        let board = Board::startpos();
        assert_eq!(perft.perft(&board, 0), 1);
        assert_eq!(perft.perft(&board, 1), 20);
        assert_eq!(perft.perft(&board, 2), 400);
        assert_eq!(perft.perft(&board, 3), 8902);
    }

    #[test]
    fn test_memoized_counts_match() {
        let board = parse_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -").unwrap();
        let mut cached = Perft::new(AlwaysReplaceTable::with_log_size(14).unwrap());
        assert_eq!(cached.perft(&board, 3), 97862);
        assert!(cached.table().stats().stores > 0);
        // second run answers from the table at the root
        assert_eq!(cached.perft(&board, 3), 97862);
        assert_eq!(cached.perft(&board, 2), 2039, "Different depth is not taken from the table");
    }

    #[test]
    fn test_divide_sums_to_perft() {
        let board = Board::startpos();
        let mut perft = Perft::new(NoopTable);
        let split = perft.divide(&board, 3);
        assert_eq!(split.len(), 20);
        assert_eq!(split.iter().map(|(_, count)| count).sum::<u64>(), 8902);
        // pawns sort first, a2 before b2
        assert_eq!(to_lan(split[0].0, true), "a2a3");
        assert_eq!(to_lan(split[1].0, true), "a2a4");
        assert!(perft.divide(&board, 0).is_empty());
    }
}
