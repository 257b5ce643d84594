//! Layout module orchestrator.
//!
//! Callers import the engine and grid types from here while the placement
//! rules live in the private `core` module.

mod core;
pub mod grid;

pub use self::core::{
    BendRule, BigRoadLayout, LayoutConfig, LayoutResult, PreviewStop, ScreenPreset, layout,
    layout_symbols,
};
pub use grid::{Cell, Grid, GridError, Position};
