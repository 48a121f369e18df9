//! Position buckets: which objects stand at a given coordinate.
//!
//! A [`PositionIndex`] stores small handles (`Copy + PartialEq`) rather than
//! objects, so it can be patched cheaply whenever something moves. The index
//! is NOT tied to the objects it describes; the owner is responsible for
//! relocating a handle in the same step that changes the object's position.
//!
//! Relocation and removal report a desynchronised index as an [`IndexError`]
//! instead of panicking. Callers decide whether that is worth a warning.

use std::collections::HashMap;

use thiserror::Error;

use crate::position::PositionKey;
use crate::Vector;

/// A handle was expected at a position but was not found there.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum IndexError {
    /// Nothing at all is indexed at the position.
    #[error("no objects are indexed at {position}")]
    EmptyPosition {
        /// The position that was searched
        position: Vector,
    },
    /// Other objects are indexed at the position, but not this one.
    #[error("object is not among the {count} objects indexed at {position}")]
    NotAtPosition {
        /// The position that was searched
        position: Vector,
        /// How many other handles share the position
        count: usize,
    },
}

/// Maps exact positions to the handles of the objects standing there.
///
/// Handles within one position keep their insertion order. Empty buckets are
/// dropped, so a position that has been vacated looks the same as one that
/// was never occupied.
///
/// # Example
///
/// ```
/// use starmap::{PositionIndex, Vector};
///
/// let home = Vector::new(100.0, 100.0);
/// let away = Vector::new(150.0, 100.0);
///
/// let mut index = PositionIndex::new();
/// index.insert(home, 'a');
/// index.insert(home, 'b');
///
/// index.relocate('a', home, away).unwrap();
/// assert_eq!(index.get(home), &['b']);
/// assert_eq!(index.get(away), &['a']);
/// ```
#[derive(Debug, Clone)]
pub struct PositionIndex<T> {
    buckets: HashMap<PositionKey, Vec<T>>,
    len: usize,
}

impl<T> Default for PositionIndex<T> {
    fn default() -> Self {
        Self {
            buckets: HashMap::new(),
            len: 0,
        }
    }
}

impl<T: Copy + PartialEq> PositionIndex<T> {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty index with room for `capacity` distinct positions.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: HashMap::with_capacity(capacity),
            len: 0,
        }
    }

    /// Removes every handle.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
    }

    /// Adds a handle at a position.
    pub fn insert(&mut self, position: Vector, item: T) {
        self.buckets
            .entry(PositionKey::new(position))
            .or_default()
            .push(item);
        self.len += 1;
    }

    /// Removes a handle from a position.
    ///
    /// # Errors
    ///
    /// Returns an [`IndexError`] if the handle is not indexed at `position`.
    /// The index is left unchanged in that case.
    pub fn remove(&mut self, position: Vector, item: T) -> Result<(), IndexError> {
        let key = PositionKey::new(position);
        let Some(bucket) = self.buckets.get_mut(&key) else {
            return Err(IndexError::EmptyPosition { position });
        };
        let Some(index) = bucket.iter().position(|other| *other == item) else {
            return Err(IndexError::NotAtPosition {
                position,
                count: bucket.len(),
            });
        };

        bucket.remove(index);
        if bucket.is_empty() {
            self.buckets.remove(&key);
        }
        self.len -= 1;
        Ok(())
    }

    /// Moves a handle from one position to another.
    ///
    /// The handle is always added at `to`, even when it was missing from
    /// `from`, so the index converges on the object's real position.
    ///
    /// # Errors
    ///
    /// Returns the [`IndexError`] from the removal at `from`.
    pub fn relocate(&mut self, item: T, from: Vector, to: Vector) -> Result<(), IndexError> {
        let removed = self.remove(from, item);
        self.insert(to, item);
        removed
    }

    /// Returns the handles at a position, possibly empty.
    #[must_use]
    pub fn get(&self, position: Vector) -> &[T] {
        self.buckets
            .get(&PositionKey::new(position))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns `true` if the handle is indexed at the position.
    #[must_use]
    pub fn contains(&self, position: Vector, item: T) -> bool {
        self.get(position).contains(&item)
    }

    /// Returns the total number of handles across all positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no handles are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of distinct occupied positions.
    #[must_use]
    pub fn position_count(&self) -> usize {
        self.buckets.len()
    }

    /// Iterates over occupied positions and their handles, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Vector, &[T])> + '_ {
        self.buckets
            .iter()
            .map(|(key, bucket)| (key.position(), bucket.as_slice()))
    }
}
