use thiserror::Error;

use crate::layout::GridError;

/// Unified result type for the bigroad crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced by the Big Road engine and its helpers.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid outcome symbol `{symbol}` at position {position}")]
    InvalidSymbol { symbol: char, position: usize },
    #[error("invalid layout configuration: {0}")]
    InvalidConfig(String),
    #[error("pattern table error: {0}")]
    PatternTable(String),
    #[error("grid layout error: {0}")]
    Grid(#[from] GridError),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
