//! # Transposition Tables
//!
//! ## Overview
//!
//! A transposition table caches results keyed by the 64-bit position hash.
//! The same position is reached through many move orders, so a cached
//! result saves re-searching whole subtrees.
//!
//! The [`Table`] trait stores opaque `u64` payloads. Search packs a
//! [`TableEntry`] into the payload, perft packs a node count and depth, and
//! neither needs to know how the other one uses the bits.
//!
//! ## Implementations
//!
//! - [`AlwaysReplaceTable`]: one slot per index, every store overwrites
//! - [`NoopTable`]: stores nothing and never hits, for tests and benchmarks
//!
//! ## Collisions
//!
//! Rows keep the full hash next to the payload, so a load only hits when the
//! complete 64-bit key matches. Two different positions with the same 64-bit
//! hash are not detected. Search guards against that by only trusting a
//! cached move if it is legal in the probing position.

mod always_replace;
mod entry;

use serde::Serialize;
use std::fmt;

pub use always_replace::AlwaysReplaceTable;
pub use entry::{Bound, TableEntry};

use crate::utils::human_bytes;

/// Payload value that means "nothing stored"
pub const EMPTY: u64 = 0;

/// Hash keyed cache of `u64` payloads
pub trait Table {
    /// Payload stored for `hash`, if the slot holds exactly this hash.
    fn load(&mut self, hash: u64) -> Option<u64>;

    /// Store `raw` for `hash`. `raw` must not be [`EMPTY`].
    fn store(&mut self, hash: u64, raw: u64);

    /// Forget `hash` if it is the key currently in its slot.
    fn remove(&mut self, hash: u64);

    /// Drop all entries and reset counters.
    fn clear(&mut self);

    /// Occupied slots per thousand, an estimate.
    fn fill_permille(&self) -> u32;

    fn stats(&self) -> TableStats;
}

/// Counters for table usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableStats {
    pub capacity: usize,
    pub bytes: usize,
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub overwrites: u64,
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let probes = self.hits + self.misses;
        let hit_rate = if probes == 0 {
            0.0
        } else {
            100.0 * self.hits as f64 / probes as f64
        };
        write!(
            f,
            "table {} ({} slots): hits {} misses {} ({:.1}% hit rate), stores {} overwrites {}",
            human_bytes(self.bytes as u64),
            self.capacity,
            self.hits,
            self.misses,
            hit_rate,
            self.stores,
            self.overwrites
        )
    }
}

/// Table that stores nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTable;

impl Table for NoopTable {
    fn load(&mut self, _hash: u64) -> Option<u64> {
        None
    }

    fn store(&mut self, _hash: u64, _raw: u64) {}

    fn remove(&mut self, _hash: u64) {}

    fn clear(&mut self) {}

    fn fill_permille(&self) -> u32 {
        0
    }

    fn stats(&self) -> TableStats {
        TableStats::default()
    }
}
