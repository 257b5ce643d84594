//! Per-game turn log, streak analysis and pattern keys.

mod core;

pub use self::core::{DEFAULT_PATTERN_LEN, OutcomeHistory, Streak};
