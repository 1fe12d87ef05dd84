//! Undo/redo history of whole-scene snapshots.
//!
//! Every committed mutation stores a full [`HistoryEntry`]; undo and redo
//! move a cursor over the list and hand back the entry to restore. Committing
//! after an undo prunes the redo branch. The list is bounded: once full, the
//! oldest entry is dropped so the most recent `capacity` states survive.

use decal_core::HistoryEntry;

/// Default number of retained states.
pub const DEFAULT_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
pub struct HistoryManager {
    entries: Vec<HistoryEntry>,
    /// Index of the current state; `None` only while `entries` is empty.
    cursor: Option<usize>,
    capacity: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HistoryManager {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            cursor: None,
            capacity,
        }
    }

    /// Record a new current state, discarding any redo branch.
    pub fn commit(&mut self, entry: HistoryEntry) {
        match self.cursor {
            Some(cursor) => self.entries.truncate(cursor + 1),
            None => self.entries.clear(),
        }
        self.entries.push(entry);
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Step back one state. `None` when already at the oldest retained state.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        let cursor = self.cursor.filter(|c| *c > 0)?;
        self.cursor = Some(cursor - 1);
        self.entries.get(cursor - 1)
    }

    /// Step forward one state. `None` when already at the newest state.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        let cursor = self.cursor.filter(|c| c + 1 < self.entries.len())?;
        self.cursor = Some(cursor + 1);
        self.entries.get(cursor + 1)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
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

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}
