//! Core alpha-beta search algorithm

use super::ordering::order_moves;
use super::{insufficient_material, Interrupted, Searcher};
use crate::board::Board;
use crate::history::HashHistory;
use crate::move_gen::attack::in_check;
use crate::move_gen::generate_legal_moves;
use crate::mv::Move;
use crate::score::{from_table_score, mate_loss_score, to_table_score};
use crate::table::{Bound, Table, TableEntry};

const DRAW_SCORE: i32 = 0;

impl<T: Table + ?Sized> Searcher<'_, T> {
    /// Negamax alpha-beta. The result always lies within `[alpha, beta]`.
    ///
    /// `history` must end with the hash of `board`; it is restored before
    /// returning, also when interrupted.
    pub(super) fn alpha_beta(
        &mut self,
        board: &Board,
        history: &mut HashHistory,
        depth: i32,
        alpha: i32,
        beta: i32,
    ) -> Result<i32, Interrupted> {
        let mut moves = self.move_buffers.pop().unwrap_or_default();
        moves.clear();
        generate_legal_moves(board, &mut |mv| moves.push(mv));
        let result = self.search_node(board, history, &mut moves, depth, alpha, beta);
        self.move_buffers.push(moves);
        result
    }

    fn search_node(
        &mut self,
        board: &Board,
        history: &mut HashHistory,
        moves: &mut [Move],
        mut depth: i32,
        mut alpha: i32,
        mut beta: i32,
    ) -> Result<i32, Interrupted> {
        debug_assert_eq!(history.last(), Some(board.hash()));
        debug_assert!(alpha < beta);
        self.nodes += 1;
        let ply = history.len();
        let is_root = ply == self.root_ply;
        let is_pv = alpha + 1 < beta;
        if is_pv {
            self.sel_depth = self.sel_depth.max(ply);
        }

        // terminal positions
        if moves.is_empty() {
            debug_assert!(!is_root);
            let score = if in_check(board) {
                mate_loss_score(ply)
            } else {
                DRAW_SCORE
            };
            return Ok(score.clamp(alpha, beta));
        }
        if !is_root && (history.is_draw(board.fifty_moves()) || insufficient_material(board)) {
            return Ok(DRAW_SCORE.clamp(alpha, beta));
        }

        let hash = board.hash();
        let mut hash_move = None;
        if let Some(entry) = self.table.load(hash).and_then(TableEntry::unpack) {
            if !is_root && i32::from(entry.depth) >= depth {
                let score = from_table_score(entry.score, ply);
                match entry.bound {
                    Bound::Upper if score < beta => {
                        if score <= alpha {
                            return Ok(alpha);
                        }
                        beta = score;
                    }
                    Bound::Lower if score > alpha => {
                        if score >= beta {
                            return Ok(beta);
                        }
                        alpha = score;
                    }
                    Bound::Exact => return Ok(score.clamp(alpha, beta)),
                    _ => {}
                }
            }
            // a colliding entry may carry a move from another position
            hash_move = entry.best_move.filter(|mv| moves.contains(mv));
        }

        if self.flags.iir && !is_pv && hash_move.is_none() {
            depth -= 1;
        }
        if depth <= 0 {
            debug_assert!(!is_root);
            let score = self.evaluation.evaluate(board) + moves.len() as i32;
            return Ok(score.clamp(alpha, beta));
        }

        self.poll_interrupt(depth)?;

        order_moves(board, moves, hash_move);
        let mut bound = Bound::Upper;
        let mut best_move = hash_move;
        let mut child = board.clone();
        for &mv in moves.iter() {
            child.copy_from(board);
            mv.apply(&mut child);
            history.push(child.hash());
            let probe = self.flags.pvs && is_pv && bound != Bound::Upper;
            let result = self.search_child(&child, history, depth - 1, alpha, beta, probe);
            history.pop();
            let score = result?;
            debug_assert!(alpha <= score && score <= beta, "{alpha} <= {score} <= {beta}");
            if score > alpha {
                best_move = Some(mv);
                if score >= beta {
                    alpha = beta;
                    bound = Bound::Lower;
                    break;
                }
                alpha = score;
                bound = Bound::Exact;
            }
        }
        debug_assert!(!is_root || bound == Bound::Exact);

        let entry = TableEntry {
            depth: depth.min(i32::from(TableEntry::MAX_DEPTH)) as u16,
            bound,
            score: to_table_score(alpha, ply),
            best_move,
        };
        self.table.store(hash, entry.pack());
        Ok(alpha)
    }

    /// Search a child from the parent's point of view. With `probe`, a null
    /// window test comes first and the full window only if it fails high.
    fn search_child(
        &mut self,
        child: &Board,
        history: &mut HashHistory,
        depth: i32,
        alpha: i32,
        beta: i32,
        probe: bool,
    ) -> Result<i32, Interrupted> {
        if probe {
            let score = -self.alpha_beta(child, history, depth, -alpha - 1, -alpha)?;
            if score <= alpha {
                return Ok(score);
            }
        }
        Ok(-self.alpha_beta(child, history, depth, -beta, -alpha)?)
    }
}
