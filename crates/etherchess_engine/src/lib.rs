//! # EtherChess Engine
//!
//! Bitboard chess engine core: legal move generation, perft, and an
//! iterative deepening alpha-beta search backed by a transposition table.
//!
//! ## Board Representation
//!
//! Positions are always stored from the side to move's point of view. After
//! every move the whole board is flipped vertically and the two colours
//! swap roles, so move generation, evaluation and hashing only ever deal
//! with "own pieces moving north". The hash is built so that flipping is a
//! byte swap of the accumulator, see [`hash::MirrorZobrist`].
//!
//! ## Module Organization
//!
//! - `board` - bitboard position with incremental hash
//! - `mv` - moves, their bit-exact packing and application
//! - `move_gen` - strictly legal move generation and attack queries
//! - `fen`, `notation` - FEN and long algebraic notation
//! - `search` - alpha-beta search, move ordering, reporting
//! - `table` - transposition tables
//! - `evaluation` - static evaluations
//! - `perft` - move tree counting
//! - `engine` - facade owning table, position and worker thread
//!
//! ## Example
//!
//! ```rust,ignore
//! use etherchess_engine::{Engine, EngineOptions, LogReporter, SearchParams};
//!
//! let mut engine = Engine::new(EngineOptions::default())?;
//! engine.set_position(None, &["d2d4"])?;
//! let best = engine.search_blocking(&SearchParams::depth(6), &mut LogReporter)?;
//! ```

pub mod bitset;
pub mod board;
pub mod constants;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod fen;
pub mod hash;
pub mod history;
pub mod move_gen;
pub mod mv;
pub mod notation;
pub mod perft;
pub mod score;
pub mod search;
pub mod square;
pub mod table;
pub mod types;
pub mod utils;

pub use board::Board;
pub use engine::{Engine, EngineOptions, GameStatus};
pub use error::{EngineError, EngineResult};
pub use evaluation::{Evaluation, MaterialEvaluation, PieceSquareEvaluation};
pub use fen::{parse_fen, to_fen};
pub use history::HashHistory;
pub use move_gen::legal_moves;
pub use mv::{Move, MoveKind};
pub use notation::{parse_lan, to_lan};
pub use perft::Perft;
pub use score::Score;
pub use search::{
    ChannelReporter, LogReporter, NoopReporter, SearchEvent, SearchFlags, SearchParams,
    SearchReporter, SearchStats, Searcher,
};
pub use table::{AlwaysReplaceTable, NoopTable, Table, TableStats};
pub use types::{CastlingRights, Piece, Square};
