//! Ordered entity collections
//!
//! Iteration order is insertion order. Loops that remove the element they are
//! visiting must keep the index in place (see `tick`), so neighbours are never
//! skipped or visited twice.

use serde::{Deserialize, Serialize};

/// Anything the store can hold
pub trait Entity {
    fn is_alive(&self) -> bool;
}

/// Insertion-ordered collection of entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore<T> {
    items: Vec<T>,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the end of the iteration order
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove the element at `index`, shifting later elements down by one
    pub fn remove(&mut self, index: usize) -> T {
        self.items.remove(index)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn iter_live(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|e| e.is_alive())
    }

    /// Index of the first element matching `pred`
    pub fn position(&self, pred: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items.iter().position(pred)
    }

    /// Drop every dead element, keeping order
    pub fn retain_live(&mut self) {
        self.items.retain(|e| e.is_alive());
    }

    pub fn retain(&mut self, f: impl FnMut(&T) -> bool) {
        self.items.retain(f);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.iter_live().count()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T: Entity> IntoIterator for &'a EntityStore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
