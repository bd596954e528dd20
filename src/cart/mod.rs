//! Cart consolidation and pricing engine.

pub mod engine;

pub use engine::{CartEngine, CartUpdate};
