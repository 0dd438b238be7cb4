//! Position hash history for repetition detection.
//!
//! One hash per position since the game started, the current position last.
//! The length doubles as the absolute ply of the current position, which is
//! what mate scores are measured against.

/// Stack of position hashes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashHistory {
    hashes: Vec<u64>,
}

impl HashHistory {
    /// History holding just the starting position.
    pub fn new(initial: u64) -> Self {
        let mut hashes = Vec::with_capacity(256);
        hashes.push(initial);
        HashHistory { hashes }
    }

    #[inline]
    pub fn push(&mut self, hash: u64) {
        self.hashes.push(hash);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<u64> {
        self.hashes.pop()
    }

    /// Hash of the current position.
    #[inline]
    pub fn last(&self) -> Option<u64> {
        self.hashes.last().copied()
    }

    /// Absolute ply of the current position.
    #[inline]
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Start over from a single position.
    pub fn reset(&mut self, initial: u64) {
        self.hashes.clear();
        self.hashes.push(initial);
    }

    /// True if the current position is drawn by the fifty-move rule or
    /// repeats an earlier one.
    ///
    /// A single earlier occurrence counts. Only positions with the same side
    /// to move and no irreversible move in between are compared, which means
    /// every other entry from four plies back to `fifty_moves` plies back.
    pub fn is_draw(&self, fifty_moves: u32) -> bool {
        if fifty_moves >= 100 {
            return true;
        }
        let Some(current) = self.last() else {
            return false;
        };
        let current_index = self.hashes.len() as isize - 1;
        let limit = (current_index - fifty_moves as isize).max(0);
        let mut i = current_index - 4;
        while i >= limit {
            if self.hashes[i as usize] == current {
                return true;
            }
            i -= 2;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifty_move_rule() {
        let history = HashHistory::new(1);
        assert!(history.is_draw(100));
        assert!(!history.is_draw(99));
    }

    #[test]
    fn test_repetition_after_four_plies() {
        let mut history = HashHistory::new(1);
        for hash in [2, 3, 4, 1] {
            history.push(hash);
        }
        assert!(history.is_draw(4), "Same position four plies later");
        assert!(!history.is_draw(3), "Repetition lies behind an irreversible move");
    }

    #[test]
    fn test_opposite_parity_is_ignored() {
        let mut history = HashHistory::new(1);
        for hash in [2, 3, 1] {
            history.push(hash);
        }
        assert!(!history.is_draw(10), "Three plies back has the other side to move");
    }

    #[test]
    fn test_push_pop() {
        let mut history = HashHistory::new(7);
        history.push(8);
        assert_eq!(history.len(), 2);
        assert_eq!(history.pop(), Some(8));
        assert_eq!(history.last(), Some(7));
        history.reset(9);
        assert_eq!(history.len(), 1);
        assert_eq!(history.last(), Some(9));
    }
}
