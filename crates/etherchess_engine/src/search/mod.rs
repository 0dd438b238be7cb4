//! Alpha-beta search with iterative deepening
//!
//! This module implements the engine's search using:
//! - Negamax variant of alpha-beta pruning, fail-hard (scores are clamped
//!   into the window passed to each node)
//! - Principal variation search: null-window probes after the first move
//!   that raised alpha at a PV node
//! - Internal iterative reductions at non-PV nodes without a hash move
//! - Iterative deepening with the transposition table carrying move order
//!   from one depth to the next
//!
//! **Cancellation**: the recursive search returns `Result<i32, Interrupted>`.
//! An interrupt flag, a deadline or a node budget turns into
//! `Err(Interrupted)`, which unwinds without storing anything and leaves the
//! driver with the result of the last completed depth.
//!
//! ## Module Organization
//!
//! - `alphabeta` - Core alpha-beta search algorithm
//! - `ordering` - Move ordering heuristics
//! - `iterative` - Iterative deepening driver and PV collection
//! - `report` - Per-iteration statistics and result sinks

mod alphabeta;
mod iterative;
mod ordering;
mod report;

pub use ordering::order_moves;
pub use report::{
    ChannelReporter, LogReporter, NoopReporter, SearchEvent, SearchReporter, SearchStats,
};

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::info;

use crate::board::Board;
use crate::constants::DARK_SQUARES;
use crate::evaluation::Evaluation;
use crate::mv::Move;
use crate::table::Table;

/// Remaining depth at or below which a node may poll for cancellation
pub const INTERRUPT_POLL_DEPTH: i32 = 4;
/// Nodes between two cancellation polls
pub const INTERRUPT_POLL_INTERVAL: u64 = 1024;
/// Deepest iteration the driver will start
pub const MAX_SEARCH_DEPTH: u32 = 64;

/// Search enhancements that can be switched off, mostly for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SearchFlags {
    /// Principal variation search
    pub pvs: bool,
    /// Internal iterative reductions
    pub iir: bool,
    /// Search depths 1..=N instead of only N
    pub iterative_deepening: bool,
}

impl Default for SearchFlags {
    fn default() -> Self {
        SearchFlags {
            pvs: true,
            iir: true,
            iterative_deepening: true,
        }
    }
}

impl SearchFlags {
    /// Enabled flags, sorted by name
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.iterative_deepening {
            names.push("id");
        }
        if self.iir {
            names.push("iir");
        }
        if self.pvs {
            names.push("pvs");
        }
        names
    }
}

/// Limits for a single search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Deepest iteration to complete
    pub depth: u32,
    /// Wall clock budget
    pub movetime: Option<Duration>,
    /// Node budget
    pub nodes: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            depth: MAX_SEARCH_DEPTH,
            movetime: None,
            nodes: None,
        }
    }
}

impl SearchParams {
    pub fn depth(depth: u32) -> Self {
        SearchParams {
            depth,
            ..SearchParams::default()
        }
    }
}

/// The search was cancelled before the current depth completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

/// Single-threaded alpha-beta searcher.
///
/// Borrows the table, evaluation and interrupt flag for the duration of a
/// search; the engine facade keeps them alive across searches.
pub struct Searcher<'a, T: Table + ?Sized> {
    table: &'a mut T,
    evaluation: &'a dyn Evaluation,
    flags: SearchFlags,
    interrupt: &'a AtomicBool,
    deadline: Option<Instant>,
    node_limit: Option<u64>,
    next_poll: u64,
    nodes: u64,
    sel_depth: usize,
    root_ply: usize,
    /// Recycled move lists, one in use per recursion level
    move_buffers: Vec<Vec<Move>>,
}

impl<'a, T: Table + ?Sized> Searcher<'a, T> {
    pub fn new(
        table: &'a mut T,
        evaluation: &'a dyn Evaluation,
        flags: SearchFlags,
        interrupt: &'a AtomicBool,
    ) -> Self {
        info!(flags = %flags.names().join(", "), "search config");
        Searcher {
            table,
            evaluation,
            flags,
            interrupt,
            deadline: None,
            node_limit: None,
            next_poll: INTERRUPT_POLL_INTERVAL,
            nodes: 0,
            sel_depth: 0,
            root_ply: 0,
            move_buffers: Vec::new(),
        }
    }

    /// Nodes visited by the last search
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn flags(&self) -> SearchFlags {
        self.flags
    }

    /// Poll the cancellation sources, at most once per interval.
    fn poll_interrupt(&mut self, depth: i32) -> Result<(), Interrupted> {
        if depth > INTERRUPT_POLL_DEPTH || self.nodes < self.next_poll {
            return Ok(());
        }
        self.next_poll = self.nodes + INTERRUPT_POLL_INTERVAL;
        if self.interrupt.load(Ordering::Relaxed) {
            return Err(Interrupted);
        }
        if self.node_limit.is_some_and(|limit| self.nodes >= limit) {
            return Err(Interrupted);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(Interrupted);
        }
        Ok(())
    }
}

/// Neither side can possibly mate: no pawns, rooks or queens and at most one
/// minor piece, or only bishops that all stand on one square colour.
pub fn insufficient_material(board: &Board) -> bool {
    if board.pawns() | board.rooks() | board.queens() != 0 {
        return false;
    }
    let minors = board.bishops() | board.knights();
    if minors.count_ones() <= 1 {
        return true;
    }
    if board.knights() == 0 {
        let dark_bishops = board.bishops() & DARK_SQUARES;
        return dark_bishops == 0 || dark_bishops == board.bishops();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::parse_fen;

    #[test]
    fn test_flag_names_sorted() {
        assert_eq!(SearchFlags::default().names(), vec!["id", "iir", "pvs"]);
        let flags = SearchFlags {
            pvs: false,
            ..SearchFlags::default()
        };
        assert_eq!(flags.names(), vec!["id", "iir"]);
    }

    #[test]
    fn test_insufficient_material() {
        let cases = [
            ("8/8/4k3/8/8/3K4/8/8 w - - 0 1", true),
            ("8/8/4k3/8/8/3KN3/8/8 w - - 0 1", true),
            ("8/8/4k3/8/8/3KB3/8/8 w - - 0 1", true),
            // c1 and f8 are both dark
            ("5b2/8/4k3/8/8/3K4/8/2B5 w - - 0 1", true),
            // c1 dark, c8 light
            ("2b5/8/4k3/8/8/3K4/8/2B5 w - - 0 1", false),
            ("8/8/4k3/8/8/3KNN2/8/8 w - - 0 1", false),
            ("8/8/4k3/8/8/3KR3/8/8 w - - 0 1", false),
            ("8/8/4k3/8/8/3K4/4P3/8 w - - 0 1", false),
        ];
        for (fen, expected) in cases {
            let board = parse_fen(fen).unwrap();
            assert_eq!(insufficient_material(&board), expected, "{fen}");
        }
    }

    #[test]
    fn test_insufficient_material_after_mirror() {
        let mut board = parse_fen("5b2/8/4k3/8/8/3K4/8/2B5 b - - 0 1").unwrap();
        assert!(insufficient_material(&board));
        board.mirror();
        assert!(insufficient_material(&board), "Mirroring keeps bishops on one colour");
    }
}
