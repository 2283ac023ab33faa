//! Bounded, chronologically ordered message backlog.

use std::collections::VecDeque;

use super::envelope::Envelope;

/// Default number of envelopes kept for replay
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Ring buffer of the most recent envelopes; the oldest is evicted first.
#[derive(Debug, Clone)]
pub struct MessageHistory {
    capacity: usize,
    entries: VecDeque<Envelope>,
}

impl MessageHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append an envelope, evicting the oldest one when full.
    pub fn push(&mut self, envelope: Envelope) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(envelope);
    }

    /// Copy of the backlog, oldest first
    pub fn snapshot(&self) -> Vec<Envelope> {
        self.entries.iter().cloned().collect()
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
}

impl Default for MessageHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
