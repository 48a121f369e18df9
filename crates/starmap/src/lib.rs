//! # Starmap
//!
//! Planar geometry and position-bucket indexing for turn-based star maps.
//!
//! Star maps place every object at an exact 2-D coordinate measured in light
//! years. Many objects can share a coordinate (a fleet orbiting a planet, a
//! salvage pile left where a battle happened), so lookups are done by exact
//! position rather than by proximity. This crate provides:
//!
//! - **Vectors**: [`Vector`] is `glam::DVec2`, so distance, normalization,
//!   scaling and rounding come straight from glam
//! - **Position keys**: [`PositionKey`] turns an `f64` coordinate pair into a
//!   hashable key
//! - **Position buckets**: [`PositionIndex`] maps a position to the handles
//!   of every object standing there
//! - **Geometry**: [`segment_intersects_circle`] and [`is_position_valid`]
//!
//! ## Quick Start
//!
//! ```
//! use starmap::{segment_intersects_circle, PositionIndex, Vector};
//!
//! let mut index = PositionIndex::new();
//! index.insert(Vector::new(10.0, 20.0), 7u32);
//! assert_eq!(index.get(Vector::new(10.0, 20.0)), &[7]);
//!
//! // A fleet flying through a mine field of radius 5 centred at the origin
//! let entry = segment_intersects_circle(
//!     Vector::new(-10.0, 0.0),
//!     Vector::new(10.0, 0.0),
//!     Vector::ZERO,
//!     5.0,
//! );
//! assert_eq!(entry, Some(0.25));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geometry;
pub mod index;
pub mod position;

// Re-exports for convenience
pub use geometry::{is_position_valid, segment_intersects_circle};
pub use index::{IndexError, PositionIndex};
pub use position::PositionKey;

/// A point or direction on the star map, in light years.
pub type Vector = glam::DVec2;
