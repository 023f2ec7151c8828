//! The generation loop: drives populations until convergence and reports
//! the best groupings found.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::schema::{ConfigError, SearchConfig};

use super::graph::{Coord, GridGraph};
use super::population::Population;
use super::SearchError;

/// Per-generation bookkeeping reported to progress callbacks.
#[derive(Debug, Clone)]
pub struct GenerationProgress {
    /// Generation counter, starting at 1 for the first bred generation.
    pub generation: usize,
    /// Fitness of the top-ranked grouping.
    pub top_fitness: u128,
    /// Fitness at the elite cutoff rank ("lowest pass").
    pub cutoff_fitness: u128,
    /// Generations since the cutoff fitness last improved.
    pub stagnation_count: usize,
}

/// A reported grouping: fitness plus its `((x, y), value)` member list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedGrouping {
    pub fitness: u128,
    pub members: Vec<(Coord, u8)>,
}

/// Why the search loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The elite band flattened after the minimum generation count.
    Converged,
    /// The optional stagnation limit was reached.
    Stagnation,
    /// The cancellation handle was set.
    Cancelled,
}

/// Summary statistics for a finished search.
#[derive(Debug, Clone)]
pub struct SearchStats {
    pub generations: usize,
    pub best_fitness: u128,
    pub elapsed_seconds: f64,
    pub stop_reason: StopReason,
}

/// Final search outcome: the top-ranked groupings and run statistics.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub top: Vec<RankedGrouping>,
    pub stats: SearchStats,
}

/// Search engine that evolves populations of groupings over a grid graph.
///
/// Runs until the top fitness equals the fitness at the elite cutoff rank
/// (after a minimum number of generations), or until the optional
/// stagnation limit or the cancellation handle stops it.
pub struct SearchEngine {
    config: SearchConfig,
    graph: GridGraph,
    rng: StdRng,
    generation: usize,
    best_so_far: u128,
    stagnation_count: usize,
    cancelled: Arc<AtomicBool>,
}

impl SearchEngine {
    /// Create a new engine. Validates the configuration against itself and
    /// against the grid.
    pub fn new(config: SearchConfig, graph: GridGraph) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.grouping_size > graph.cell_count() {
            return Err(ConfigError::GroupingTooLarge {
                size: config.grouping_size,
                cells: graph.cell_count(),
            });
        }

        let seed = config.random_seed.unwrap_or_else(rand::random);
        debug!("search rng seed: {}", seed);

        Ok(Self {
            config,
            graph,
            rng: StdRng::seed_from_u64(seed),
            generation: 0,
            best_so_far: 0,
            stagnation_count: 0,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The grid graph this engine searches.
    pub fn graph(&self) -> &GridGraph {
        &self.graph
    }

    /// Handle for cancelling the run between generations.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Run the search (blocking).
    pub fn run(&mut self) -> Result<SearchResult, SearchError> {
        self.run_with_callback(|_, _| {})
    }

    /// Run the search, invoking `callback` after every bred generation with
    /// the generation's bookkeeping and the new population.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<SearchResult, SearchError>
    where
        F: FnMut(&GenerationProgress, &Population),
    {
        let start = Instant::now();

        self.generation = 0;
        self.best_so_far = 0;
        self.stagnation_count = 0;

        let mut population =
            Population::new(&self.graph, &self.config, Vec::new(), &mut self.rng)?;
        let cutoff = population.elite_cutoff(self.config.survivability_divisor);
        info!(
            "initial population: size {}, elite cutoff rank {}",
            population.target_size(),
            cutoff
        );

        let stop_reason = loop {
            if self.cancelled.load(Ordering::Relaxed) {
                break StopReason::Cancelled;
            }

            // Converged once the elite band has flattened, but never before
            // the minimum generation count.
            if self.generation >= self.config.min_generations
                && population.fitness_at(0) == population.fitness_at(cutoff)
            {
                break StopReason::Converged;
            }

            if let Some(limit) = self.config.stagnation_limit
                && self.stagnation_count >= limit
            {
                break StopReason::Stagnation;
            }

            population = population.next_generation(&self.graph, &self.config, &mut self.rng)?;
            self.generation += 1;

            let cutoff_fitness = population.fitness_at(cutoff);
            if cutoff_fitness > self.best_so_far {
                self.best_so_far = cutoff_fitness;
                self.stagnation_count = 0;
            } else {
                self.stagnation_count += 1;
            }

            callback(
                &GenerationProgress {
                    generation: self.generation,
                    top_fitness: population.fitness_at(0),
                    cutoff_fitness,
                    stagnation_count: self.stagnation_count,
                },
                &population,
            );
        };

        let elapsed = start.elapsed().as_secs_f64();
        info!(
            "stopped after {} generations ({:?}), best fitness {}",
            self.generation,
            stop_reason,
            population.fitness_at(0)
        );

        let top = population
            .groupings()
            .iter()
            .take(self.config.report_count)
            .map(|grouping| RankedGrouping {
                fitness: grouping.fitness(),
                members: grouping
                    .members()
                    .iter()
                    .map(|cell| (cell.coords(), cell.value))
                    .collect(),
            })
            .collect();

        Ok(SearchResult {
            top,
            stats: SearchStats {
                generations: self.generation,
                best_fitness: population.fitness_at(0),
                elapsed_seconds: elapsed,
                stop_reason,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> SearchConfig {
        SearchConfig {
            grouping_size: 3,
            population_size: 30,
            survivability_divisor: 5,
            min_generations: 5,
            report_count: 3,
            random_seed: Some(99),
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_full_grid_grouping_is_optimal() {
        // On a 2x2 grid a size-4 grouping is always the whole grid.
        let graph = GridGraph::from_rows(&[vec![1, 2], vec![3, 4]], true);
        let config = SearchConfig {
            grouping_size: 4,
            population_size: 10,
            survivability_divisor: 5,
            min_generations: 3,
            random_seed: Some(7),
            ..SearchConfig::default()
        };

        let mut engine = SearchEngine::new(config, graph).unwrap();
        let result = engine.run().unwrap();

        assert_eq!(result.stats.stop_reason, StopReason::Converged);
        assert_eq!(result.top[0].fitness, 24);
        assert_eq!(result.top[0].members.len(), 4);
    }

    #[test]
    fn test_line_grid_finds_best_segment() {
        // 1x5 line [2, 3, 5, 7, 1]: the best size-3 segment is x in 1..=3
        // with fitness 3 * 5 * 7 = 105.
        let graph = GridGraph::from_rows(&[vec![2, 3, 5, 7, 1]], false);
        let mut engine = SearchEngine::new(quick_config(), graph).unwrap();
        let result = engine.run().unwrap();

        assert_eq!(result.top[0].fitness, 105);
        let mut xs: Vec<usize> = result.top[0].members.iter().map(|((x, _), _)| *x).collect();
        xs.sort_unstable();
        assert_eq!(xs, vec![1, 2, 3]);
    }

    #[test]
    fn test_report_count_caps_output() {
        let graph = GridGraph::from_rows(&[vec![2, 3, 5, 7, 1]], false);
        let mut engine = SearchEngine::new(quick_config(), graph).unwrap();
        let result = engine.run().unwrap();
        assert!(result.top.len() <= 3);
    }

    #[test]
    fn test_minimum_generations_enforced() {
        // All-equal grid: the elite band is flat from generation zero, so
        // only the minimum generation count keeps the loop running.
        let graph = GridGraph::from_rows(&vec![vec![2; 4]; 4], true);
        let mut engine = SearchEngine::new(quick_config(), graph).unwrap();
        let result = engine.run().unwrap();

        assert_eq!(result.stats.stop_reason, StopReason::Converged);
        assert!(result.stats.generations >= 5);
    }

    #[test]
    fn test_cancellation() {
        let graph = GridGraph::from_rows(&vec![vec![2; 4]; 4], true);
        let mut engine = SearchEngine::new(quick_config(), graph).unwrap();

        let cancel = engine.cancel_handle();
        cancel.store(true, Ordering::Relaxed);

        let result = engine.run().unwrap();
        assert_eq!(result.stats.stop_reason, StopReason::Cancelled);
        assert_eq!(result.stats.generations, 0);
    }

    #[test]
    fn test_stagnation_limit_stops_run() {
        let graph = GridGraph::from_rows(&vec![vec![2; 4]; 4], true);
        let config = SearchConfig {
            min_generations: 10_000,
            stagnation_limit: Some(2),
            ..quick_config()
        };

        let mut engine = SearchEngine::new(config, graph).unwrap();
        let result = engine.run().unwrap();
        assert_eq!(result.stats.stop_reason, StopReason::Stagnation);
    }

    #[test]
    fn test_grouping_larger_than_grid_rejected() {
        let graph = GridGraph::from_rows(&[vec![1, 2], vec![3, 4]], true);
        let config = SearchConfig {
            grouping_size: 9,
            ..quick_config()
        };
        assert!(matches!(
            SearchEngine::new(config, graph),
            Err(ConfigError::GroupingTooLarge { size: 9, cells: 4 })
        ));
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let run = || {
            let graph = GridGraph::from_rows(&[vec![2, 3, 5, 7, 1]], false);
            let mut engine = SearchEngine::new(quick_config(), graph).unwrap();
            engine.run().unwrap()
        };
        let (a, b) = (run(), run());
        assert_eq!(a.top, b.top);
        assert_eq!(a.stats.generations, b.stats.generations);
    }

    #[test]
    fn test_callback_sees_every_generation() {
        let graph = GridGraph::from_rows(&vec![vec![2; 4]; 4], true);
        let mut engine = SearchEngine::new(quick_config(), graph).unwrap();

        let mut seen = Vec::new();
        let result = engine
            .run_with_callback(|progress, population| {
                seen.push(progress.generation);
                assert_eq!(population.target_size(), 30);
            })
            .unwrap();

        assert_eq!(seen.len(), result.stats.generations);
        assert!(seen.windows(2).all(|w| w[1] == w[0] + 1));
    }
}
