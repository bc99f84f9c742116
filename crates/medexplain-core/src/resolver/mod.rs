//! Drug name resolution.
//!
//! Free text → canonical generic name, with fuzzy "did you mean"
//! suggestions for near misses.

mod fuzzy;
mod normalizer;

pub use fuzzy::*;
pub use normalizer::*;
