//! Snapshot-based undo/redo.
//!
//! Every value that enters or leaves the manager is a fresh clone, so later
//! in-place edits of live shapes can never reach back into a stored snapshot.

use std::collections::VecDeque;

/// Default number of undo states to keep.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Bounded linear undo/redo over full snapshots of a sequence.
#[derive(Debug, Clone)]
pub struct HistoryManager<T: Clone> {
    undo_stack: VecDeque<Vec<T>>,
    redo_stack: Vec<Vec<T>>,
    limit: usize,
}

impl<T: Clone> Default for HistoryManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> HistoryManager<T> {
    /// Create a manager with the default limit.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Create a manager keeping at most `limit` undo states (at least one).
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record `current` as the state to return to (call before making changes).
    ///
    /// Drops the oldest state past the limit and invalidates redo.
    pub fn push(&mut self, current: &[T]) {
        self.undo_stack.push_back(current.to_vec());
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
        log::debug!(
            "history: pushed snapshot of {} item(s), {} undo state(s)",
            current.len(),
            self.undo_stack.len()
        );
    }

    /// Step back. `current` is kept for redo; returns the state to restore,
    /// or `None` (leave the live state untouched) when there is nothing to undo.
    pub fn undo(&mut self, current: &[T]) -> Option<Vec<T>> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current.to_vec());
        log::debug!("history: undo, {} state(s) left", self.undo_stack.len());
        Some(previous)
    }

    /// Step forward again. `current` is kept for undo; returns the state to
    /// restore, or `None` when there is nothing to redo.
    pub fn redo(&mut self, current: &[T]) -> Option<Vec<T>> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current.to_vec());
        log::debug!("history: redo, {} state(s) left", self.redo_stack.len());
        Some(next)
    }

    /// Forget all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }
}
