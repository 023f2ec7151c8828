//! Search module - Evolutionary search for high-product cell groupings.
//!
//! The search system consists of:
//!
//! - **Grid graph** (`graph`): immutable adjacency structure over the digit grid
//! - **Groupings** (`grouping`): connected fixed-size cell subsets and their mutation
//! - **Populations** (`population`): fitness-ranked generations of groupings
//! - **Engine** (`engine`): the generation loop, convergence detection and reporting
//!
//! # Example
//!
//! ```rust,no_run
//! use grid_prospector::schema::{GridSpec, SearchConfig};
//! use grid_prospector::search::{GridGraph, SearchEngine};
//!
//! let spec: GridSpec = "1234\n5678\n9012".parse().unwrap();
//! let config = SearchConfig {
//!     grouping_size: 4,
//!     population_size: 50,
//!     ..SearchConfig::default()
//! };
//!
//! let graph = GridGraph::from_spec(&spec, config.diagonals);
//! let mut engine = SearchEngine::new(config, graph).unwrap();
//! let result = engine.run_with_callback(|progress, _population| {
//!     println!(
//!         "generation: {}  top fitness: {}",
//!         progress.generation, progress.top_fitness
//!     );
//! });
//! ```

mod engine;
mod graph;
mod grouping;
mod population;

pub use engine::*;
pub use graph::*;
pub use grouping::*;
pub use population::*;

/// Errors produced by the search core.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Coordinate lookup outside the grid extent. Always a caller bug.
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// No frontier cell is available to grow a grouping. Recoverable by
    /// retrying from a different seed cell or removed member.
    #[error("no frontier cell available to grow the grouping")]
    Exhausted,
    /// Bounded retry exceeded while producing valid groupings; the grouping
    /// size is too large for the grid's connectivity.
    #[error(
        "gave up after {limit} attempts to grow a valid grouping of size {size}; \
         the grouping size may be too large for this grid"
    )]
    RetriesExceeded { limit: usize, size: usize },
}
