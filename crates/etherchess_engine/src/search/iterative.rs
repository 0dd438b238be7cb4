//! Iterative deepening search
//!
//! Searches depth 1, 2, ... up to the requested depth. Each iteration starts
//! by removing the root entry so the completed iteration is guaranteed to
//! leave a fresh exact entry whose move is the iteration's best move.

use std::time::Instant;

use tracing::{debug, info, warn};

use super::report::{SearchReporter, SearchStats};
use super::{Interrupted, SearchParams, Searcher, INTERRUPT_POLL_INTERVAL};
use crate::board::Board;
use crate::history::HashHistory;
use crate::move_gen::legal_moves;
use crate::mv::Move;
use crate::notation::to_lan;
use crate::score::{Score, INFINITY};
use crate::table::{Bound, Table, TableEntry};
use crate::utils::millis;

impl<T: Table + ?Sized> Searcher<'_, T> {
    /// Search `board` and return the best move of the deepest completed
    /// iteration, or `None` if there are no legal moves.
    ///
    /// `history` must end with the hash of `board`. Every completed
    /// iteration is reported to `reporter`, followed by the final move.
    pub fn find_best(
        &mut self,
        board: &Board,
        history: &mut HashHistory,
        params: &SearchParams,
        reporter: &mut dyn SearchReporter,
    ) -> Option<Move> {
        debug_assert_eq!(history.last(), Some(board.hash()), "History must end with the board");
        let start = Instant::now();
        self.nodes = 0;
        self.next_poll = INTERRUPT_POLL_INTERVAL;
        self.root_ply = history.len();
        self.sel_depth = self.root_ply;
        self.deadline = params.movetime.map(|movetime| start + movetime);
        self.node_limit = params.nodes;

        let root_moves = legal_moves(board);
        let Some(&fallback) = root_moves.first() else {
            info!("no legal moves at the root");
            reporter.best_move(None);
            return None;
        };

        let max_depth = params.depth.clamp(1, u32::from(TableEntry::MAX_DEPTH));
        let first_depth = if self.flags.iterative_deepening { 1 } else { max_depth };
        let hash = board.hash();
        let mut best = None;
        for depth in first_depth..=max_depth {
            self.table.remove(hash);
            let score = match self.alpha_beta(board, history, depth as i32, -INFINITY, INFINITY) {
                Ok(score) => score,
                Err(Interrupted) => {
                    debug!(depth, nodes = self.nodes, "search interrupted");
                    reporter.info(&format!("interrupted at depth {depth}"));
                    break;
                }
            };
            match self.table.load(hash).and_then(TableEntry::unpack) {
                Some(entry) => {
                    debug_assert_eq!(entry.bound, Bound::Exact);
                    best = entry.best_move;
                }
                None => warn!(depth, "root entry was not stored in table"),
            }

            let stats = SearchStats {
                depth,
                sel_depth: (self.sel_depth - self.root_ply) as u32,
                millis: millis(start.elapsed()),
                nodes: self.nodes,
                score: Score::from_search(score, self.root_ply),
                pv: self.collect_pv(board, depth),
                hash_permille: self.table.fill_permille(),
            };
            info!(
                depth,
                score = %stats.score,
                nodes = stats.nodes,
                millis = stats.millis,
                pv = %stats.pv.join(" "),
                "iteration complete"
            );
            reporter.stats(&stats);
        }

        debug!(table = %self.table.stats(), "search finished");
        let best = best.unwrap_or_else(|| {
            warn!("no iteration completed, playing the first legal move");
            reporter.info("no iteration completed");
            fallback
        });
        reporter.best_move(Some(&to_lan(best, board.is_white())));
        Some(best)
    }

    /// Follow stored best moves from `board`, at most `depth` plies.
    fn collect_pv(&mut self, board: &Board, depth: u32) -> Vec<String> {
        let mut pv = Vec::new();
        let mut current = board.clone();
        for _ in 0..depth {
            let Some(entry) = self.table.load(current.hash()).and_then(TableEntry::unpack) else {
                break;
            };
            if !matches!(entry.bound, Bound::Exact | Bound::Lower) {
                break;
            }
            let Some(mv) = entry.best_move.filter(|mv| legal_moves(&current).contains(mv)) else {
                break;
            };
            pv.push(to_lan(mv, current.is_white()));
            mv.apply(&mut current);
        }
        pv
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use super::*;
    use crate::evaluation::PieceSquareEvaluation;
    use crate::fen::parse_fen;
    use crate::search::{ChannelReporter, NoopReporter, SearchEvent, SearchFlags};
    use crate::table::{AlwaysReplaceTable, NoopTable};

    fn search(fen: &str, depth: u32) -> (Option<Move>, AlwaysReplaceTable, Board) {
        let board = parse_fen(fen).unwrap();
        let mut history = HashHistory::new(board.hash());
        let mut table = AlwaysReplaceTable::with_log_size(16).unwrap();
        let interrupt = AtomicBool::new(false);
        let evaluation = PieceSquareEvaluation;
        let best = {
            let mut searcher =
                Searcher::new(&mut table, &evaluation, SearchFlags::default(), &interrupt);
            searcher.find_best(&board, &mut history, &SearchParams::depth(depth), &mut NoopReporter)
        };
        assert_eq!(history.len(), 1, "History is restored after search");
        (best, table, board)
    }

    #[test]
    fn test_finds_back_rank_mate() {
        let (best, _, board) = search("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1", 3);
        assert_eq!(to_lan(best.unwrap(), board.is_white()), "a1a8");
    }

    #[test]
    fn test_root_entry_is_exact_with_returned_move() {
        let (best, mut table, board) = search(crate::constants::STARTPOS_FEN, 4);
        let entry = TableEntry::unpack(table.load(board.hash()).unwrap()).unwrap();
        assert_eq!(entry.bound, Bound::Exact);
        assert_eq!(entry.best_move, best);
    }

    #[test]
    fn test_no_legal_moves() {
        // black is checkmated
        let (best, _, _) = search("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1", 3);
        assert_eq!(best, None);
    }

    #[test]
    fn test_reports_mate_score_and_pv() {
        let board = parse_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let mut history = HashHistory::new(board.hash());
        let mut table = AlwaysReplaceTable::with_log_size(12).unwrap();
        let interrupt = AtomicBool::new(false);
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut reporter = ChannelReporter::new(sender);
        let evaluation = PieceSquareEvaluation;
        let mut searcher = Searcher::new(&mut table, &evaluation, SearchFlags::default(), &interrupt);
        searcher.find_best(&board, &mut history, &SearchParams::depth(2), &mut reporter);

        let events: Vec<SearchEvent> = receiver.try_iter().collect();
        assert_eq!(events.len(), 3, "Two iterations and the best move: {events:?}");
        match &events[1] {
            SearchEvent::Stats(stats) => {
                assert_eq!(stats.depth, 2);
                assert_eq!(stats.score, Score::Mate(1));
                assert_eq!(stats.pv.first().map(String::as_str), Some("a1a8"));
            }
            other => panic!("Expected stats, got {other:?}"),
        }
        assert_eq!(events[2], SearchEvent::BestMove(Some("a1a8".to_string())));
    }

    #[test]
    fn test_interrupted_search_keeps_a_move() {
        let board = Board::startpos();
        let mut history = HashHistory::new(board.hash());
        let mut table = NoopTable;
        let interrupt = AtomicBool::new(true);
        let evaluation = PieceSquareEvaluation;
        let mut searcher = Searcher::new(&mut table, &evaluation, SearchFlags::default(), &interrupt);
        let best = searcher.find_best(&board, &mut history, &SearchParams::depth(30), &mut NoopReporter);
        assert!(best.is_some(), "An interrupted search still plays a legal move");
        assert!(legal_moves(&board).contains(&best.unwrap()));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_node_budget_stops_search() {
        let board = Board::startpos();
        let mut history = HashHistory::new(board.hash());
        let mut table = AlwaysReplaceTable::with_log_size(12).unwrap();
        let interrupt = AtomicBool::new(false);
        let evaluation = PieceSquareEvaluation;
        let mut searcher = Searcher::new(&mut table, &evaluation, SearchFlags::default(), &interrupt);
        let params = SearchParams {
            nodes: Some(5_000),
            ..SearchParams::default()
        };
        let best = searcher.find_best(&board, &mut history, &params, &mut NoopReporter);
        assert!(best.is_some());
        assert!(searcher.nodes() < 5_000 + 2 * INTERRUPT_POLL_INTERVAL, "Got {}", searcher.nodes());
    }

    #[test]
    fn test_flags_do_not_change_mate_result() {
        let board = parse_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        for flags in [
            SearchFlags { pvs: false, iir: false, iterative_deepening: false },
            SearchFlags { pvs: true, iir: false, iterative_deepening: true },
            SearchFlags { pvs: false, iir: true, iterative_deepening: false },
        ] {
            let mut history = HashHistory::new(board.hash());
            let mut table = AlwaysReplaceTable::with_log_size(12).unwrap();
            let interrupt = AtomicBool::new(false);
            let evaluation = PieceSquareEvaluation;
            let mut searcher = Searcher::new(&mut table, &evaluation, flags, &interrupt);
            let best = searcher.find_best(&board, &mut history, &SearchParams::depth(3), &mut NoopReporter);
            assert_eq!(best.map(|mv| to_lan(mv, true)).as_deref(), Some("a1a8"), "{flags:?}");
        }
    }
}
