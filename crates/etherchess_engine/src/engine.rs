//! # Engine Facade
//!
//! ## Overview
//!
//! [`Engine`] owns everything that lives longer than one search: the
//! transposition table, the current position and its hash history. It is
//! the entry point for front ends like the CLI.
//!
//! ## Threading
//!
//! [`Engine::go`] runs the search on one worker thread and returns at once.
//! The worker holds the table lock for the whole search; the control thread
//! only touches the interrupt flag until the worker is joined.
//!
//! ```text
//! control thread                 worker thread
//! --------------                 -------------
//! go(params, reporter)  ──spawn──▶ lock table
//!                                 find_best(..) ──events──▶ reporter
//! stop()  ──interrupt flag──────▶ unwinds at next poll
//! wait()  ◀─────────join───────── best move
//! ```
//!
//! Operations that need the table or change the position fail with
//! [`EngineError::SearchInProgress`] while a worker is running.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut engine = Engine::new(EngineOptions::default())?;
//! engine.set_position(None, &["e2e4", "e7e5"])?;
//! let best = engine.search_blocking(&SearchParams::depth(5), &mut LogReporter)?;
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::board::Board;
use crate::constants::DEFAULT_HASH_MIB;
use crate::error::{EngineError, EngineResult};
use crate::evaluation::{Evaluation, PieceSquareEvaluation};
use crate::fen::{parse_fen, to_fen};
use crate::history::HashHistory;
use crate::move_gen::{attack::in_check, legal_moves};
use crate::mv::Move;
use crate::notation::parse_lan;
use crate::search::{insufficient_material, SearchFlags, SearchParams, SearchReporter, Searcher};
use crate::table::{AlwaysReplaceTable, Table, TableStats};

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Transposition table size, rounded down to a power of two
    pub hash_mib: usize,
    pub flags: SearchFlags,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            hash_mib: DEFAULT_HASH_MIB,
            flags: SearchFlags::default(),
        }
    }
}

/// State of the game at the current position
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Ongoing,
    /// The side to move is mated
    Checkmate,
    Stalemate,
    FiftyMoves,
    Repetition,
    InsufficientMaterial,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }
}

pub struct Engine {
    table: Arc<Mutex<AlwaysReplaceTable>>,
    evaluation: Arc<dyn Evaluation>,
    flags: SearchFlags,
    board: Board,
    history: HashHistory,
    interrupt: Arc<AtomicBool>,
    worker: Option<JoinHandle<Option<Move>>>,
}

impl Engine {
    pub fn new(options: EngineOptions) -> EngineResult<Self> {
        let table = AlwaysReplaceTable::with_size_mib(options.hash_mib)?;
        info!(hash_mib = options.hash_mib, rows = table.capacity(), "engine created");
        let board = Board::startpos();
        Ok(Engine {
            table: Arc::new(Mutex::new(table)),
            evaluation: Arc::new(PieceSquareEvaluation),
            flags: options.flags,
            history: HashHistory::new(board.hash()),
            board,
            interrupt: Arc::new(AtomicBool::new(false)),
            worker: None,
        })
    }

    /// Replace the evaluation used by later searches.
    pub fn with_evaluation(mut self, evaluation: Arc<dyn Evaluation>) -> Self {
        self.evaluation = evaluation;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &HashHistory {
        &self.history
    }

    pub fn fen(&self) -> String {
        to_fen(&self.board)
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.board)
    }

    /// True while a worker is running.
    pub fn is_searching(&self) -> bool {
        self.worker.as_ref().is_some_and(|worker| !worker.is_finished())
    }

    fn ensure_idle(&mut self) -> EngineResult<()> {
        if self.is_searching() {
            return Err(EngineError::SearchInProgress);
        }
        // reap a finished worker nobody waited for
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("previous search worker panicked");
            }
        }
        Ok(())
    }

    /// Back to the starting position with an empty table.
    pub fn new_game(&mut self) -> EngineResult<()> {
        self.ensure_idle()?;
        self.table.lock().clear();
        self.board = Board::startpos();
        self.history.reset(self.board.hash());
        info!("new game");
        Ok(())
    }

    /// Set up `fen` (the starting position if `None`) and play `moves` in
    /// long algebraic notation. On error nothing changes.
    pub fn set_position<S: AsRef<str>>(&mut self, fen: Option<&str>, moves: &[S]) -> EngineResult<()> {
        self.ensure_idle()?;
        let mut board = match fen {
            Some(fen) => parse_fen(fen)?,
            None => Board::startpos(),
        };
        let mut history = HashHistory::new(board.hash());
        for text in moves {
            let mv = parse_lan(&board, text.as_ref())?;
            mv.apply(&mut board);
            history.push(board.hash());
        }
        debug!(fen = %to_fen(&board), moves = moves.len(), "position set");
        self.board = board;
        self.history = history;
        Ok(())
    }

    /// Play one move in long algebraic notation.
    pub fn apply_move(&mut self, text: &str) -> EngineResult<Move> {
        self.ensure_idle()?;
        let mv = parse_lan(&self.board, text)?;
        mv.apply(&mut self.board);
        self.history.push(self.board.hash());
        Ok(mv)
    }

    /// Whether the game is decided at the current position. A single
    /// repetition counts, like in search.
    pub fn status(&self) -> GameStatus {
        if legal_moves(&self.board).is_empty() {
            if in_check(&self.board) {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            }
        } else if self.board.fifty_moves() >= 100 {
            GameStatus::FiftyMoves
        } else if self.history.is_draw(self.board.fifty_moves()) {
            GameStatus::Repetition
        } else if insufficient_material(&self.board) {
            GameStatus::InsufficientMaterial
        } else {
            GameStatus::Ongoing
        }
    }

    /// Start searching the current position on a worker thread.
    pub fn go<R>(&mut self, params: SearchParams, mut reporter: R) -> EngineResult<()>
    where
        R: SearchReporter + 'static,
    {
        self.ensure_idle()?;
        self.interrupt.store(false, Ordering::SeqCst);
        let table = Arc::clone(&self.table);
        let evaluation = Arc::clone(&self.evaluation);
        let interrupt = Arc::clone(&self.interrupt);
        let flags = self.flags;
        let board = self.board.clone();
        let mut history = self.history.clone();
        let worker = thread::Builder::new()
            .name("search".to_string())
            .spawn(move || {
                let mut table = table.lock();
                let mut searcher = Searcher::new(&mut *table, &*evaluation, flags, &interrupt);
                searcher.find_best(&board, &mut history, &params, &mut reporter)
            })
            .map_err(|e| EngineError::WorkerSpawn {
                reason: e.to_string(),
            })?;
        debug!(depth = params.depth, "search started");
        self.worker = Some(worker);
        Ok(())
    }

    /// Ask a running search to finish. Returns immediately.
    pub fn stop(&self) {
        if self.worker.is_none() {
            debug!("stop without a running search");
        }
        self.interrupt.store(true, Ordering::SeqCst);
    }

    /// Join the worker and return its move. `Ok(None)` if there was no
    /// search or the position had no legal moves.
    pub fn wait(&mut self) -> EngineResult<Option<Move>> {
        match self.worker.take() {
            Some(worker) => worker.join().map_err(|_| EngineError::WorkerPanicked),
            None => Ok(None),
        }
    }

    /// Search on the calling thread.
    pub fn search_blocking(
        &mut self,
        params: &SearchParams,
        reporter: &mut dyn SearchReporter,
    ) -> EngineResult<Option<Move>> {
        self.ensure_idle()?;
        self.interrupt.store(false, Ordering::SeqCst);
        let mut table = self.table.lock();
        let mut searcher = Searcher::new(&mut *table, &*self.evaluation, self.flags, &self.interrupt);
        let mut history = self.history.clone();
        Ok(searcher.find_best(&self.board, &mut history, params, reporter))
    }

    /// Reallocate the table. Its contents are lost.
    pub fn set_table_size_mib(&mut self, mib: usize) -> EngineResult<()> {
        self.ensure_idle()?;
        let table = AlwaysReplaceTable::with_size_mib(mib)?;
        info!(mib, rows = table.capacity(), "table resized");
        *self.table.lock() = table;
        Ok(())
    }

    pub fn table_stats(&mut self) -> EngineResult<TableStats> {
        self.ensure_idle()?;
        Ok(self.table.lock().stats())
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.interrupt.store(true, Ordering::SeqCst);
            if worker.join().is_err() {
                warn!("search worker panicked");
            }
        }
    }
}
