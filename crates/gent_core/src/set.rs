//! Insertion-ordered unique-membership set.

use indexmap::IndexSet;
use std::hash::Hash;

/// A set of unique items that remembers insertion order
#[derive(Debug, Clone)]
pub struct Set<T: Eq + Hash> {
    items: IndexSet<T>,
}

impl<T: Eq + Hash> Set<T> {
    /// Create a new empty set
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: IndexSet::new(),
        }
    }

    /// Add an item, returning `true` if it was not present before
    pub fn add(&mut self, item: T) -> bool {
        self.items.insert(item)
    }

    /// Check if an item is in the set
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Check if an item is in the set (alias for contains)
    #[must_use]
    pub fn has(&self, item: &T) -> bool {
        self.contains(item)
    }

    /// Remove an item, returning `true` if it was present
    ///
    /// Remaining items keep their relative order.
    pub fn remove(&mut self, item: &T) -> bool {
        self.items.shift_remove(item)
    }

    /// Number of items
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Number of items (alias for len)
    #[must_use]
    pub fn count(&self) -> usize {
        self.len()
    }

    /// Whether the set has no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove all items
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterate items in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Visit items in insertion order until `f` returns `false`
    pub fn for_each_until<F>(&self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        for item in &self.items {
            if !f(item) {
                break;
            }
        }
    }
}

impl<T: Eq + Hash + Clone> Set<T> {
    /// Copy all items into a vector, in insertion order
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl<T: Eq + Hash> Default for Set<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash> PartialEq for Set<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|item| other.contains(item))
    }
}

impl<T: Eq + Hash> Eq for Set<T> {}

impl<T: Eq + Hash> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T: Eq + Hash> Extend<T> for Set<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<'a, T: Eq + Hash> IntoIterator for &'a Set<T> {
    type Item = &'a T;
    type IntoIter = indexmap::set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
