//! Pattern-keyed predictions feeding the preview overlay.

mod core;

pub use self::core::{PatternTable, PredictionSource, preview_for};
