//! Bounded snapshot history for undo/redo.
//!
//! Snapshots cover the card list only; theme and selection changes are not
//! undoable. Rapid consecutive edits coalesce into one undo step: a record
//! arriving within the coalescing window of the previous one is dropped,
//! but refreshes the window, so a typing burst collapses into a single step
//! that ends when the user pauses.

use web_time::{Duration, Instant};

use crate::card::Card;

const DEFAULT_MAX_STEPS: usize = 100;
const DEFAULT_COALESCE_WINDOW: Duration = Duration::from_millis(400);

/// Undo/redo stacks over card-list snapshots.
#[derive(Debug, Clone)]
pub struct History {
    undo: Vec<Vec<Card>>,
    redo: Vec<Vec<Card>>,
    max_steps: usize,
    coalesce_window: Duration,
    last_record: Option<Instant>,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limits(DEFAULT_MAX_STEPS, DEFAULT_COALESCE_WINDOW)
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// History with an explicit depth bound and coalescing window. A zero
    /// window disables coalescing.
    pub fn with_limits(max_steps: usize, coalesce_window: Duration) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_steps,
            coalesce_window,
            last_record: None,
        }
    }

    /// Record the pre-mutation state. Call before every undoable mutation.
    /// Any recorded edit invalidates the redo stack.
    pub fn record(&mut self, cards: &[Card]) {
        self.redo.clear();
        let now = Instant::now();
        if let Some(last) = self.last_record {
            if now.duration_since(last) < self.coalesce_window {
                // Still inside the burst; keep the snapshot already taken
                // and extend the window from this edit.
                self.last_record = Some(now);
                return;
            }
        }
        self.undo.push(cards.to_vec());
        while self.undo.len() > self.max_steps {
            self.undo.remove(0);
        }
        self.last_record = Some(now);
    }

    /// Pop the latest undo snapshot, pushing `current` onto the redo stack.
    pub fn undo(&mut self, current: &[Card]) -> Option<Vec<Card>> {
        let prev = self.undo.pop()?;
        self.redo.push(current.to_vec());
        while self.redo.len() > self.max_steps {
            self.redo.remove(0);
        }
        // The next edit starts a fresh step regardless of timing.
        self.last_record = None;
        Some(prev)
    }

    /// Pop the latest redo snapshot, pushing `current` back onto undo.
    pub fn redo(&mut self, current: &[Card]) -> Option<Vec<Card>> {
        let next = self.redo.pop()?;
        self.undo.push(current.to_vec());
        while self.undo.len() > self.max_steps {
            self.undo.remove(0);
        }
        self.last_record = None;
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}
