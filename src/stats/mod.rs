//! Per-game prediction hit/miss tracking.

mod core;

pub use self::core::{HitSummary, HitTracker, Verdict};
