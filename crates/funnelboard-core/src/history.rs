//! Snapshot-based undo/redo history.

/// Linear list of full snapshots with a cursor.
///
/// `snapshots[cursor]` is always the current state. Committing after an
/// undo discards everything above the cursor.
#[derive(Debug, Clone)]
pub struct History<T> {
    snapshots: Vec<T>,
    cursor: usize,
    /// Maximum number of snapshots kept; 0 keeps everything.
    limit: usize,
}

impl<T: Clone> History<T> {
    /// Create a history whose only snapshot is `initial`.
    pub fn new(initial: T) -> Self {
        Self::with_limit(initial, 0)
    }

    /// Create a history that keeps at most `limit` snapshots (0 = unbounded).
    pub fn with_limit(initial: T, limit: usize) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            limit,
        }
    }

    /// Record a new state, dropping any redo branch.
    pub fn commit(&mut self, snapshot: T) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);

        if self.limit > 0 && self.snapshots.len() > self.limit {
            let excess = self.snapshots.len() - self.limit;
            self.snapshots.drain(..excess);
        }
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back. Returns the restored state, or None at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&T> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.snapshots.get(self.cursor)
    }

    /// Step forward. Returns the restored state, or None at the newest snapshot.
    pub fn redo(&mut self) -> Option<&T> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        self.snapshots.get(self.cursor)
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> &T {
        &self.snapshots[self.cursor]
    }

    /// Drop all history and start over from `initial`.
    pub fn reset(&mut self, initial: T) {
        self.snapshots.clear();
        self.snapshots.push(initial);
        self.cursor = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false; a history holds at least its initial snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
