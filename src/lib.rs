//! # EtherChess
//!
//! Command line front end for the `etherchess_engine` crate.
//!
//! ## Module Organization
//!
//! - `cli` - clap argument definitions
//! - `commands` - perft, divide, search, self-play and bench runners

pub mod cli;
pub mod commands;

pub use cli::{Cli, Command};
pub use commands::run;
