//! Linear snapshot history with a cursor.

use crate::shapes::Shape;

/// Maximum number of retained snapshots. Oldest entries drop first.
pub const MAX_HISTORY: usize = 100;

/// Undo/redo log of whole-scene snapshots.
///
/// The log is seeded with one empty snapshot so the very first edit can
/// be undone back to the blank canvas. `cursor` always indexes the
/// snapshot matching the current scene.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: Vec<Vec<Shape>>,
    cursor: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self {
            entries: vec![Vec::new()],
            cursor: 0,
        }
    }
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a snapshot at the end of a discrete edit.
    ///
    /// Entries beyond the cursor (the redo tail) are discarded first.
    pub fn record(&mut self, snapshot: Vec<Shape>) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        self.cursor += 1;
        if self.entries.len() > MAX_HISTORY {
            self.entries.remove(0);
            self.cursor -= 1;
        }
    }

    /// Step back one snapshot. Refused (returns None) at the start.
    pub fn undo(&mut self) -> Option<Vec<Shape>> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].clone())
    }

    /// Step forward one snapshot. Refused (returns None) at the end.
    pub fn redo(&mut self) -> Option<Vec<Shape>> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].clone())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of stored snapshots (including the seed).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, Shape};
    use kurbo::Point;

    fn snap_of(n: usize) -> Vec<Shape> {
        (0..n)
            .map(|i| {
                Shape::Rectangle(Rectangle::new(Point::new(i as f64, 0.0), 10.0, 10.0))
            })
            .collect()
    }

    #[test]
    fn test_undo_refused_at_start() {
        let mut log = HistoryLog::new();
        assert!(log.undo().is_none());
        assert!(!log.can_undo());
    }

    #[test]
    fn test_redo_refused_at_end() {
        let mut log = HistoryLog::new();
        log.record(snap_of(1));
        assert!(log.redo().is_none());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut log = HistoryLog::new();
        for n in 1..=4 {
            log.record(snap_of(n));
        }
        // Undo all the way back to the empty seed
        for expected in (0..4).rev() {
            let snapshot = log.undo().unwrap_or_default();
            assert_eq!(snapshot.len(), expected);
        }
        assert!(log.undo().is_none());
        // Redo restores the exact pre-undo depth
        for expected in 1..=4 {
            let snapshot = log.redo().unwrap_or_default();
            assert_eq!(snapshot.len(), expected);
        }
        assert!(log.redo().is_none());
    }

    #[test]
    fn test_record_discards_redo_tail() {
        let mut log = HistoryLog::new();
        log.record(snap_of(1));
        log.record(snap_of(2));
        log.undo();
        log.record(snap_of(3));
        // The two-shape snapshot is gone
        assert!(log.redo().is_none());
        let snapshot = log.undo().unwrap_or_default();
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut log = HistoryLog::new();
        for n in 1..=(MAX_HISTORY + 10) {
            log.record(snap_of(n.min(3)));
        }
        assert_eq!(log.len(), MAX_HISTORY);
        assert!(log.can_undo());
    }
}
