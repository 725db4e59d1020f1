//! Bounded snapshot history for the committed-strokes surface.
//!
//! Snapshots are appended on every commit. When the capacity is reached the
//! oldest entry is evicted from the front; undo pops from the back. The stack
//! never shrinks below one entry, so the initial state cannot be undone away.

use std::collections::VecDeque;

use tracepad_core::constants::HISTORY_CAPACITY;
use tracepad_core::SurfaceError;

use crate::surface::{RasterSurface, Snapshot};

/// Snapshot stack with front eviction and back undo.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Snapshot>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl History {
    /// Creates an empty history holding at most `capacity` (at least one)
    /// snapshots.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a snapshot, evicting the oldest when full.
    pub fn push(&mut self, snapshot: Snapshot) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
            tracing::trace!("History full, evicted oldest snapshot");
        }
        self.entries.push_back(snapshot);
    }

    /// Serializes `surface` and appends it.
    pub fn record(&mut self, surface: &RasterSurface) -> Result<(), SurfaceError> {
        let snapshot = surface.snapshot()?;
        self.push(snapshot);
        tracing::debug!(len = self.entries.len(), "Recorded history snapshot");
        Ok(())
    }

    /// Discards the newest entry and returns the state to restore, or `None`
    /// at the floor.
    pub fn undo(&mut self) -> Option<Snapshot> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop_back();
        self.entries.back().cloned()
    }

    /// The snapshot describing the current committed state.
    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True when undo would be a no-op.
    pub fn at_floor(&self) -> bool {
        self.entries.len() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(tag: u8) -> Snapshot {
        Snapshot::from_png(vec![tag], 1, 1)
    }

    #[test]
    fn test_capacity_evicts_front() {
        let mut history = History::new(3);
        for i in 0..5 {
            history.push(snap(i));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.undo(), Some(snap(3)));
        assert_eq!(history.undo(), Some(snap(2)));
        assert_eq!(history.undo(), None);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_undo_at_floor_is_noop() {
        let mut history = History::new(30);
        assert_eq!(history.undo(), None);
        history.push(snap(0));
        assert!(history.at_floor());
        assert_eq!(history.undo(), None);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut history = History::new(0);
        history.push(snap(1));
        history.push(snap(2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.current(), Some(&snap(2)));
    }
}
