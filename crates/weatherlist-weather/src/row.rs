//! Generation-tagged row slots.
//!
//! A list reuses a small set of row slots for many forecast entries. Every
//! time a slot is bound to a new request it gets a fresh generation; a fetch
//! that finishes later may only touch the slot if the generation it captured
//! is still the slot's current one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Which row slot issued a request, for which URL, at which generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowToken {
    pub row: usize,
    pub generation: u64,
    pub url: String,
}

#[derive(Debug, Default)]
pub struct RowSlots {
    next_generation: AtomicU64,
    current: Mutex<HashMap<usize, u64>>,
}

impl RowSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `row` to a new request, superseding any earlier binding
    pub fn bind(&self, row: usize, url: impl Into<String>) -> RowToken {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.current.lock().insert(row, generation);
        RowToken {
            row,
            generation,
            url: url.into(),
        }
    }

    /// True if `token` is still the latest binding of its row
    pub fn is_current(&self, token: &RowToken) -> bool {
        self.current.lock().get(&token.row) == Some(&token.generation)
    }

    /// Forget the binding of `row`; outstanding tokens for it become stale
    pub fn release(&self, row: usize) {
        self.current.lock().remove(&row);
    }

    pub fn clear(&self) {
        self.current.lock().clear();
    }
}
