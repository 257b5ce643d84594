//! Error module orchestrator.
//!
//! The concrete enum lives in `types` so helpers can grow beside it without
//! changing the public import path.

mod types;

pub use types::{LayoutError, Result};
