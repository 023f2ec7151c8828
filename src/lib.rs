//! Grid Prospector - Evolutionary search for high-product cell groupings.
//!
//! Searches a fixed-size 2-D grid of digit values for a connected subset of
//! cells (a "grouping") whose value product is maximal, using a
//! generational evolutionary loop: random generation, connectivity-checked
//! mutation, elite selection, and random refill.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: search configuration and grid input parsing
//! - `search`: the algorithmic core (grid graph, groupings, populations,
//!   generation loop)
//! - `render`: colorized terminal rendering for progress display
//!
//! # Example
//!
//! ```rust,no_run
//! use grid_prospector::{
//!     schema::{GridSpec, SearchConfig},
//!     search::{GridGraph, SearchEngine},
//! };
//!
//! let spec: GridSpec = "2357\n1199\n8340".parse().unwrap();
//! let config = SearchConfig {
//!     grouping_size: 5,
//!     population_size: 50,
//!     ..SearchConfig::default()
//! };
//!
//! let graph = GridGraph::from_spec(&spec, config.diagonals);
//! let mut engine = SearchEngine::new(config, graph).unwrap();
//! let result = engine.run().unwrap();
//!
//! println!("best fitness: {}", result.stats.best_fitness);
//! ```

pub mod render;
pub mod schema;
pub mod search;

// Re-export commonly used types
pub use schema::{GridSpec, SearchConfig};
pub use search::{GridGraph, Grouping, Population, SearchEngine, SearchResult};
