//! Xchange Common Types
//!
//! Shared types used across the Xchange crates: normalized currency codes,
//! ordered currency pairs, stored exchange rates and conversion results.

pub mod monetary;

pub use monetary::*;
