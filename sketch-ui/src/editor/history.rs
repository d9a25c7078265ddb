// Undo history for the editor.
// A bounded, linear log: recording truncates anything after the cursor, and the oldest entry is
// evicted first when the log is full.

use std::collections::VecDeque;
use tracing::{debug, trace};

/// Number of snapshots kept when nothing else is configured.
pub const DEFAULT_CAPACITY: usize = 20;

#[derive(Debug, Clone)]
pub struct History<T> {
    states: VecDeque<T>,
    /// `None` iff `states` is empty.
    current_index: Option<usize>,
    max_states: usize,
}

impl<T> History<T> {
    /// An empty history. A capacity of zero is treated as one.
    pub fn new(max_states: usize) -> Self {
        let max_states = max_states.max(1);
        Self {
            states: VecDeque::with_capacity(max_states),
            current_index: None,
            max_states,
        }
    }

    /// A history holding `baseline` at cursor 0.
    pub fn with_baseline(baseline: T, max_states: usize) -> Self {
        let mut history = Self::new(max_states);
        history.record(baseline);
        history
    }

    pub fn record(&mut self, state: T) {
        let keep = self.current_index.map_or(0, |i| i + 1);
        if keep < self.states.len() {
            trace!("Discarding {} redo entries", self.states.len() - keep);
            self.states.truncate(keep);
        }

        self.states.push_back(state);
        let mut index = self.states.len() - 1;

        if self.states.len() > self.max_states {
            self.states.pop_front();
            index -= 1;
            trace!("History full, evicted oldest entry");
        }

        self.current_index = Some(index);
        debug!(
            cursor = index,
            len = self.states.len(),
            "Recorded history entry"
        );
    }

    /// Step back one entry. The first entry is the baseline and cannot be undone.
    pub fn undo(&mut self) -> Option<&T> {
        let index = match self.current_index {
            Some(i) if i > 0 => i - 1,
            _ => {
                trace!("Nothing to undo");
                return None;
            }
        };
        self.current_index = Some(index);
        debug!(cursor = index, "Undo");
        self.states.get(index)
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.current_index, Some(i) if i > 0)
    }

    pub fn current(&self) -> Option<&T> {
        self.current_index.and_then(|i| self.states.get(i))
    }

    pub fn cursor(&self) -> Option<usize> {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_states
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.current_index = None;
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.states.iter()
    }
}
