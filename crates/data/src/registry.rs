//! Insertion-ordered, key-unique collections with O(1) lookup both ways.

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::error::DataError;

/// An item that can live in a [`Registry`].
pub trait Keyed {
    /// Identity of the item. Two items with equal keys are the same entry.
    type Key: Clone + Debug + Eq + Hash + Display;

    /// Collection name used in error messages.
    const COLLECTION: &'static str;

    /// Returns the identity of this item.
    fn key(&self) -> Self::Key;
}

/// Ordered collection that maps position to item and key to position.
///
/// Duplicate keys are rejected, never overwritten.
///
/// # Example
///
/// ```
/// use anen_data::Times;
///
/// let times = Times::from_items([0_i64, 3600, 7200]).unwrap();
/// assert_eq!(times.position(&3600), Some(1));
/// assert_eq!(times.get(2), Some(&7200));
/// assert!(Times::from_items([1_i64, 1]).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Registry<T: Keyed> {
    items: Vec<T>,
    positions: HashMap<T::Key, usize>,
}

impl<T: Keyed> Registry<T> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Builds a collection from items in order.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::DuplicateKey`] on the first repeated key.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Result<Self, DataError> {
        let mut registry = Self::new();
        for item in items {
            registry.push(item)?;
        }
        Ok(registry)
    }

    /// Appends an item and returns its position.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::DuplicateKey`] if an item with the same key is
    /// already present. The collection is left unchanged.
    pub fn push(&mut self, item: T) -> Result<usize, DataError> {
        let key = item.key();
        if self.positions.contains_key(&key) {
            return Err(DataError::DuplicateKey {
                collection: T::COLLECTION,
                key: key.to_string(),
            });
        }
        let position = self.items.len();
        self.positions.insert(key, position);
        self.items.push(item);
        Ok(position)
    }

    /// Position of the item with this key, if registered.
    pub fn position(&self, key: &T::Key) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// Position of the item with this key.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::UnknownKey`] if the key is not registered.
    pub fn require(&self, key: &T::Key) -> Result<usize, DataError> {
        self.position(key).ok_or_else(|| DataError::UnknownKey {
            collection: T::COLLECTION,
            key: key.to_string(),
        })
    }

    /// Item at a position.
    pub fn get(&self, position: usize) -> Option<&T> {
        self.items.get(position)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the collection holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Items in insertion order as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Keyed> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Keyed> IntoIterator for &'a Registry<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Keyed for i64 {
    type Key = i64;
    const COLLECTION: &'static str = "times";

    fn key(&self) -> i64 {
        *self
    }
}

/// Timestamps or lead-time offsets in seconds.
pub type Times = Registry<i64>;

impl Registry<i64> {
    /// Timestamps in insertion order.
    pub fn values(&self) -> &[i64] {
        self.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_returns_positions() {
        let mut times = Times::new();
        assert_eq!(times.push(100).unwrap(), 0);
        assert_eq!(times.push(50).unwrap(), 1);
        assert_eq!(times.position(&50), Some(1));
        assert_eq!(times.values(), &[100, 50]);
    }

    #[test]
    fn duplicate_is_rejected_and_collection_unchanged() {
        let mut times = Times::from_items([1, 2, 3]).unwrap();
        let err = times.push(2).unwrap_err();
        assert_eq!(
            err,
            DataError::DuplicateKey {
                collection: "times",
                key: "2".to_string()
            }
        );
        assert_eq!(times.len(), 3);
        assert_eq!(times.position(&2), Some(1));
    }

    #[test]
    fn require_reports_unknown_key() {
        let times = Times::from_items([10]).unwrap();
        assert_eq!(times.require(&10).unwrap(), 0);
        let err = times.require(&11).unwrap_err();
        assert_eq!(err.to_string(), "unknown key '11' in times");
    }

    #[test]
    fn mapping_is_bijective() {
        let times = Times::from_items((0..50).map(|i| i * 7 - 20)).unwrap();
        for (pos, t) in times.iter().enumerate() {
            assert_eq!(times.position(t), Some(pos));
            assert_eq!(times.get(pos), Some(t));
        }
    }

    #[test]
    fn empty_collection() {
        let times = Times::default();
        assert!(times.is_empty());
        assert_eq!(times.get(0), None);
    }
}
