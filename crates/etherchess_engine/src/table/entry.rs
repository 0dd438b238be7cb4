use crate::mv::Move;

/// How a stored score relates to the true value of the position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Bound {
    /// Nothing known, never produced by search
    Unknown = 0,
    /// Score is a lower bound (fail high)
    Lower = 1,
    /// Score is an upper bound (fail low)
    Upper = 2,
    /// Score is exact
    Exact = 3,
}

impl Bound {
    /// Decode the 4-bit bound field. Values above 3 are corrupt.
    const fn from_bits(bits: u64) -> Option<Bound> {
        match bits & 0xF {
            0 => Some(Bound::Unknown),
            1 => Some(Bound::Lower),
            2 => Some(Bound::Upper),
            3 => Some(Bound::Exact),
            _ => None,
        }
    }
}

/// A search result as kept in the transposition table.
///
/// Packed into one `u64`:
///
/// ```text
/// bits  0..12  depth
/// bits 12..16  bound
/// bits 16..32  score (i16, table encoding, see crate::score)
/// bits 32..64  best move (Move::pack32, 0 = none)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    pub depth: u16,
    pub bound: Bound,
    pub score: i16,
    pub best_move: Option<Move>,
}

impl TableEntry {
    pub const MAX_DEPTH: u16 = 0xFFF;

    pub fn pack(self) -> u64 {
        debug_assert!(self.depth <= Self::MAX_DEPTH);
        let mv = self.best_move.map_or(0, Move::pack32) as u64;
        mv << 32
            | (self.score as u16 as u64) << 16
            | (self.bound as u64) << 12
            | (self.depth & Self::MAX_DEPTH) as u64
    }

    /// `None` if the bound field holds an undefined value.
    pub fn unpack(raw: u64) -> Option<TableEntry> {
        Some(TableEntry {
            depth: (raw & 0xFFF) as u16,
            bound: Bound::from_bits(raw >> 12)?,
            score: (raw >> 16) as u16 as i16,
            best_move: Move::unpack32((raw >> 32) as u32),
        })
    }
}
