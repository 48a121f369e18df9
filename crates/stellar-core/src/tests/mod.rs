//! Cross-module tests for the universe and the mine field engine.
//!
//! - **Determinism tests**: the same seed and state produce the same turn
//! - **Integration tests**: whole mine field turns run through [`crate::Game`]
//! - **Helper functions**: shared players, designs, fleets and games
//!
//! # Test Structure
//!
//! - `determinism.rs`: replaying turns from a seed
//! - `integration.rs`: end-to-end turns
//! - `helpers.rs`: setup utilities and factory functions

mod determinism;
mod helpers;

// Re-export for convenience
pub use helpers::*;
