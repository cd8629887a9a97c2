// src/core/storage/mod.rs

//! The shared to-do list store.

use parking_lot::Mutex;

/// The process-wide ordered list of to-do items.
///
/// Items are plain text tokens compared by exact string match. All access
/// goes through `&self` methods that take the internal lock, so concurrent
/// sessions observe every mutation as if applied in some total order: no
/// lost updates, no torn reads.
#[derive(Debug, Default)]
pub struct TodoList {
    items: Mutex<Vec<String>>,
}

impl TodoList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a list pre-populated with `items`, preserving their order.
    pub fn with_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: Mutex::new(items.into_iter().map(Into::into).collect()),
        }
    }

    /// Removes every item equal to `value` in a single pass, preserving the
    /// relative order of the remainder. Removing an absent value is a no-op.
    /// Returns how many items were removed.
    pub fn remove(&self, value: &str) -> usize {
        let mut items = self.items.lock();
        let before = items.len();
        items.retain(|item| item != value);
        before - items.len()
    }

    /// Returns a copy of the current sequence.
    pub fn snapshot(&self) -> Vec<String> {
        self.items.lock().clone()
    }

    /// The number of items currently held.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}
