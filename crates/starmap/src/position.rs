//! Hashable keys for exact map coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Vector;

/// Exact-position key for hash maps.
///
/// `f64` is neither `Eq` nor `Hash`, so positions are keyed by their bit
/// patterns. Two positions produce the same key iff their coordinates are
/// bit-identical, except that `-0.0` and `0.0` are folded together.
///
/// # Example
///
/// ```
/// use starmap::{PositionKey, Vector};
///
/// let a = PositionKey::new(Vector::new(0.0, 12.5));
/// let b = PositionKey::new(Vector::new(-0.0, 12.5));
/// assert_eq!(a, b);
/// assert_eq!(a.position(), Vector::new(0.0, 12.5));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PositionKey {
    x: u64,
    y: u64,
}

impl PositionKey {
    /// Creates the key for a position.
    #[must_use]
    pub fn new(position: Vector) -> Self {
        Self {
            x: canonical_bits(position.x),
            y: canonical_bits(position.y),
        }
    }

    /// Returns the position this key was built from.
    #[must_use]
    pub fn position(self) -> Vector {
        Vector::new(f64::from_bits(self.x), f64::from_bits(self.y))
    }
}

fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0_f64.to_bits()
    } else {
        value.to_bits()
    }
}

impl From<Vector> for PositionKey {
    fn from(position: Vector) -> Self {
        Self::new(position)
    }
}

impl fmt::Debug for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let position = self.position();
        write!(f, "PositionKey({}, {})", position.x, position.y)
    }
}
