//! Page-owned collection snapshots.
//!
//! # Invariants
//! - The collection is never mutated in place; every change publishes a new
//!   `Arc<[T]>` and earlier snapshots stay valid for their holders.
//! - Callers apply a change only after the service call succeeded.

use crate::model::Identified;
use crate::store::RecordId;
use std::sync::Arc;

#[derive(Debug)]
pub struct ListState<T> {
    items: Arc<[T]>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Arc::from(Vec::new()),
        }
    }
}

impl<T: Identified + Clone> ListState<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Arc::from(items),
        }
    }

    /// Current snapshot; cheap to clone and safe to keep.
    pub fn snapshot(&self) -> Arc<[T]> {
        Arc::clone(&self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Replaces the whole collection after a reload.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = Arc::from(items);
    }

    /// Appends a freshly created entity.
    pub fn push_created(&mut self, item: T) {
        let mut next = self.items.to_vec();
        next.push(item);
        self.items = Arc::from(next);
    }

    /// Swaps in the stored version of an updated entity.
    ///
    /// Returns `false` when no entry carries that id.
    pub fn replace_updated(&mut self, item: T) -> bool {
        let Some(index) = self.items.iter().position(|e| e.id() == item.id()) else {
            return false;
        };
        let mut next = self.items.to_vec();
        next[index] = item;
        self.items = Arc::from(next);
        true
    }

    /// Drops the entry with `id`; returns whether one was removed.
    pub fn remove(&mut self, id: RecordId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        let next: Vec<T> = self
            .items
            .iter()
            .filter(|item| item.id() != id)
            .cloned()
            .collect();
        self.items = Arc::from(next);
        true
    }
}
