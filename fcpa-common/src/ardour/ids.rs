//! Identity allocation for session objects
//!
//! Ardour identifies every object with a decimal id that must be unique in
//! the session file. Ids already present in the seed are registered at load;
//! new ids are handed out from a cursor that only moves forward.

use std::collections::HashSet;

/// Registry of every id issued or discovered in one session document
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    used: HashSet<String>,
    cursor: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an id found in the document
    ///
    /// Numeric ids push the cursor past them so later allocations start
    /// above everything discovered.
    pub fn register(&mut self, id: &str) {
        if let Ok(n) = id.parse::<u64>() {
            if n.to_string() == id {
                self.cursor = self.cursor.max(n.saturating_add(1));
            }
        }
        self.used.insert(id.to_string());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    /// Issue the next free id at or above the cursor and register it
    pub fn new_id(&mut self) -> String {
        while self.used.contains(&self.cursor.to_string()) {
            self.cursor += 1;
        }
        let id = self.cursor.to_string();
        self.used.insert(id.clone());
        self.cursor += 1;
        id
    }

    /// Lowest value the next allocation can return
    pub fn next_free(&self) -> u64 {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
