//! Command line interface definition
//!
//! Every subcommand works on a position given as an optional FEN plus a
//! list of moves in long algebraic notation, the same way a UCI
//! `position` command does.

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use etherchess_engine::constants::DEFAULT_HASH_MIB;
use etherchess_engine::{SearchFlags, SearchParams};

#[derive(Parser, Debug)]
#[command(name = "etherchess")]
#[command(about = "Bitboard chess engine: perft, search and self-play")]
#[command(version)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Count leaf nodes of the legal move tree
    Perft(PerftArgs),
    /// Perft split by root move
    Divide(PerftArgs),
    /// Search a position and print the best move
    Search(SearchArgs),
    /// Let the engine play against itself
    Selfplay(SelfplayArgs),
    /// Fixed perft and search workload, prints speed
    Bench(BenchArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct PositionArgs {
    /// Start position in FEN, the standard starting position if omitted
    #[arg(long)]
    pub fen: Option<String>,

    /// Moves to play from the start position, e.g. "e2e4 e7e5"
    #[arg(long, value_delimiter = ' ', num_args = 0..)]
    pub moves: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PerftArgs {
    #[command(flatten)]
    pub position: PositionArgs,

    #[arg(short, long, default_value_t = 5)]
    pub depth: u32,

    /// Memoization table size in MiB, 0 disables it
    #[arg(long, default_value_t = DEFAULT_HASH_MIB)]
    pub hash: usize,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Static evaluation to search with
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum EvalKind {
    /// Material plus piece-square tables
    #[default]
    Pst,
    /// Material only
    Material,
}

#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Deepest iteration
    #[arg(short, long, default_value_t = 8)]
    pub depth: u32,

    /// Time limit, e.g. "500ms" or "2s"
    #[arg(long, value_parser = humantime::parse_duration)]
    pub movetime: Option<Duration>,

    /// Node limit
    #[arg(long)]
    pub nodes: Option<u64>,

    /// Transposition table size in MiB
    #[arg(long, default_value_t = DEFAULT_HASH_MIB)]
    pub hash: usize,

    #[arg(long, value_enum, default_value_t = EvalKind::Pst)]
    pub eval: EvalKind,

    /// Disable principal variation search
    #[arg(long)]
    pub no_pvs: bool,

    /// Disable internal iterative reductions
    #[arg(long)]
    pub no_iir: bool,

    /// Search only the final depth
    #[arg(long)]
    pub no_id: bool,
}

impl EngineArgs {
    pub fn flags(&self) -> SearchFlags {
        SearchFlags {
            pvs: !self.no_pvs,
            iir: !self.no_iir,
            iterative_deepening: !self.no_id,
        }
    }

    pub fn params(&self) -> SearchParams {
        SearchParams {
            depth: self.depth,
            movetime: self.movetime,
            nodes: self.nodes,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub position: PositionArgs,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Print one JSON object per search event
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SelfplayArgs {
    #[command(flatten)]
    pub position: PositionArgs,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Stop after this many plies even if the game is not decided
    #[arg(long, default_value_t = 200)]
    pub max_plies: u32,
}

#[derive(Args, Debug, Clone)]
pub struct BenchArgs {
    /// Perft depth per position
    #[arg(long, default_value_t = 4)]
    pub perft_depth: u32,

    /// Search depth per position
    #[arg(long, default_value_t = 6)]
    pub search_depth: u32,
}
