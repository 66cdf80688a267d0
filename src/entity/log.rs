use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Bounded, append-only log of human-readable events for one entity
///
/// Once `capacity` is reached the oldest line is evicted. `unread` counts
/// the newest lines that have not been handed to a reader yet and never
/// exceeds `len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityLog {
    entries: VecDeque<String>,
    capacity: usize,
    unread: usize,
}

impl EntityLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            unread: 0,
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front(); // Remove oldest
        }
        self.entries.push_back(line.into());
        self.unread = (self.unread + 1).min(self.entries.len());
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

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    /// Whether any retained line contains `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.entries.iter().any(|line| line.contains(needle))
    }

    /// Lines added since the last call, oldest first
    pub fn take_unread(&mut self) -> Vec<String> {
        let start = self.entries.len() - self.unread;
        self.unread = 0;
        self.entries.iter().skip(start).cloned().collect()
    }

    /// Treat every retained line as already shown
    pub fn mark_read(&mut self) {
        self.unread = 0;
    }

    pub fn unread(&self) -> usize {
        self.unread
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.unread = 0;
    }
}

impl Default for EntityLog {
    fn default() -> Self {
        Self::new(50)
    }
}
