//! Big Road score-card layout for two-outcome games.
//!
//! The crate turns a sequence of Player/Banker outcomes, optionally followed
//! by predicted outcomes, into the zig-zag "Big Road" grid used on casino
//! score cards. Around the engine sit the pieces a dashboard needs to drive
//! it: an append-only turn log, a pattern-keyed prediction table and a
//! hit/miss tracker. Fetching and rendering stay with the caller.

pub mod error;
pub mod history;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod outcome;
pub mod predict;
pub mod stats;

pub use error::{LayoutError, Result};
pub use history::{DEFAULT_PATTERN_LEN, OutcomeHistory, Streak};
pub use layout::{
    BendRule, BigRoadLayout, Cell, Grid, GridError, LayoutConfig, LayoutResult, Position,
    PreviewStop, ScreenPreset, layout, layout_symbols,
};
pub use logging::{
    LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult, MemorySink,
    NullSink,
};
pub use metrics::{LayoutMetrics, MetricSnapshot};
pub use outcome::{Outcome, format_outcomes, parse_outcomes};
pub use predict::{PatternTable, PredictionSource, preview_for};
pub use stats::{HitSummary, HitTracker, Verdict};
