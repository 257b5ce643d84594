//! Outcome symbols and symbol-string parsing.

mod core;

pub use self::core::{Outcome, format_outcomes, parse_outcomes};
