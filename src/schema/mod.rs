//! Schema module - Configuration and grid input types for the grouping search.

mod config;
mod grid;

pub use config::*;
pub use grid::*;
