use tracing::debug;

use super::{Table, TableStats, EMPTY};
use crate::error::{EngineError, EngineResult};

/// Bytes per row: full hash plus payload
const ROW_BYTES: usize = 16;

/// Direct-mapped table where every store replaces whatever is in the slot.
///
/// The slot index is the low bits of the hash. Capacity is always a power of
/// two so the index is a mask.
pub struct AlwaysReplaceTable {
    rows: Vec<(u64, u64)>,
    mask: usize,
    stats: TableStats,
}

impl AlwaysReplaceTable {
    /// Table with `1 << log_size` rows.
    pub fn with_log_size(log_size: u32) -> EngineResult<Self> {
        if log_size > 40 {
            return Err(EngineError::InvalidTableSize {
                mib: 1usize.checked_shl(log_size - 16).unwrap_or(usize::MAX),
            });
        }
        let capacity = 1usize << log_size;
        let mut rows = Vec::new();
        rows.try_reserve_exact(capacity)
            .map_err(|_| EngineError::InvalidTableSize {
                mib: (capacity * ROW_BYTES) >> 20,
            })?;
        rows.resize(capacity, (0, EMPTY));
        debug!(capacity, bytes = capacity * ROW_BYTES, "allocated table");
        Ok(AlwaysReplaceTable {
            rows,
            mask: capacity - 1,
            stats: TableStats {
                capacity,
                bytes: capacity * ROW_BYTES,
                ..TableStats::default()
            },
        })
    }

    /// Largest power-of-two table that fits in `mib` mebibytes.
    pub fn with_size_mib(mib: usize) -> EngineResult<Self> {
        let rows = mib.checked_mul(1 << 20).ok_or(EngineError::InvalidTableSize { mib })? / ROW_BYTES;
        if rows == 0 {
            return Err(EngineError::InvalidTableSize { mib });
        }
        Self::with_log_size(rows.ilog2())
    }

    pub fn capacity(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        hash as usize & self.mask
    }
}

impl Table for AlwaysReplaceTable {
    fn load(&mut self, hash: u64) -> Option<u64> {
        let (stored, raw) = self.rows[self.index(hash)];
        if stored == hash && raw != EMPTY {
            self.stats.hits += 1;
            Some(raw)
        } else {
            self.stats.misses += 1;
            None
        }
    }

    fn store(&mut self, hash: u64, raw: u64) {
        debug_assert_ne!(raw, EMPTY);
        let index = self.index(hash);
        if self.rows[index].1 != EMPTY {
            self.stats.overwrites += 1;
        }
        self.stats.stores += 1;
        self.rows[index] = (hash, raw);
    }

    fn remove(&mut self, hash: u64) {
        let index = self.index(hash);
        if self.rows[index].0 == hash {
            // the flipped key can never match a probe landing on this slot
            self.rows[index] = (!hash, EMPTY);
        }
    }

    fn clear(&mut self) {
        self.rows.fill((0, EMPTY));
        self.stats = TableStats {
            capacity: self.stats.capacity,
            bytes: self.stats.bytes,
            ..TableStats::default()
        };
    }

    fn fill_permille(&self) -> u32 {
        let filled = self.stats.stores.saturating_sub(self.stats.overwrites);
        (1000 * filled / self.rows.len() as u64).min(1000) as u32
    }

    fn stats(&self) -> TableStats {
        self.stats
    }
}
