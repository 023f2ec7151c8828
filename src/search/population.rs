//! Fitness-ranked generations of groupings.

use rand::Rng;

use crate::schema::SearchConfig;

use super::graph::GridGraph;
use super::grouping::Grouping;
use super::SearchError;

/// Valid mutated offspring produced per elite each generation.
const OFFSPRING_PER_ELITE: usize = 2;

/// An ordered collection of groupings, kept sorted by descending fitness.
///
/// Populations are immutable generation-to-generation: `next_generation`
/// builds a fresh instance and never touches its predecessor.
#[derive(Debug, Clone)]
pub struct Population {
    target_size: usize,
    groupings: Vec<Grouping>,
}

impl Population {
    /// Build a population from zero or more seed groupings, filling any
    /// remaining slots with freshly generated random groupings, then sorting
    /// by descending fitness. The stable sort breaks fitness ties by
    /// insertion order.
    pub fn new<R: Rng>(
        graph: &GridGraph,
        config: &SearchConfig,
        seeds: Vec<Grouping>,
        rng: &mut R,
    ) -> Result<Self, SearchError> {
        let mut groupings = seeds;
        while groupings.len() < config.population_size {
            groupings.push(generate_with_retry(
                graph,
                config.grouping_size,
                config.retry_limit,
                rng,
            )?);
        }

        groupings.sort_by(|a, b| b.fitness().cmp(&a.fitness()));
        // Seeds may exceed the target when the elite band is wide; keep the
        // best ones.
        groupings.truncate(config.population_size);

        Ok(Self {
            target_size: config.population_size,
            groupings,
        })
    }

    /// Produce the next generation: retain the elite band, breed two valid
    /// mutated offspring per elite, refill with random groupings, re-rank.
    ///
    /// Offspring that come back disconnected or `Exhausted` are redrawn;
    /// each draw consumes one attempt against `config.retry_limit`, and
    /// exceeding the bound surfaces `RetriesExceeded` (the grouping size is
    /// incompatible with the grid).
    pub fn next_generation<R: Rng>(
        &self,
        graph: &GridGraph,
        config: &SearchConfig,
        rng: &mut R,
    ) -> Result<Self, SearchError> {
        let cutoff = self.elite_cutoff(config.survivability_divisor);
        let mut next: Vec<Grouping> = self.groupings[..cutoff].to_vec();

        for elite_index in 0..cutoff {
            let parent = next[elite_index].clone();
            let mut produced = 0;
            let mut attempts = 0;

            while produced < OFFSPRING_PER_ELITE {
                attempts += 1;
                if attempts > config.retry_limit {
                    return Err(SearchError::RetriesExceeded {
                        limit: config.retry_limit,
                        size: config.grouping_size,
                    });
                }
                match parent.mutate(graph, rng) {
                    Ok(child) if child.is_connected(graph) => {
                        next.push(child);
                        produced += 1;
                    }
                    // Disconnected candidate: normal rejection, redraw.
                    Ok(_) => {}
                    // Post-removal frontier emptied: redraw.
                    Err(SearchError::Exhausted) => {}
                    Err(err) => return Err(err),
                }
            }
        }

        Self::new(graph, config, next, rng)
    }

    /// Index of the elite cutoff rank: `target_size / divisor`, floored.
    #[inline]
    pub fn elite_cutoff(&self, divisor: usize) -> usize {
        self.target_size / divisor
    }

    /// Fitness of the grouping at `rank`.
    pub fn fitness_at(&self, rank: usize) -> u128 {
        self.groupings[rank].fitness()
    }

    /// Highest-fitness grouping.
    pub fn best(&self) -> &Grouping {
        &self.groupings[0]
    }

    /// All groupings in descending fitness order.
    pub fn groupings(&self) -> &[Grouping] {
        &self.groupings
    }

    /// Fixed target size of every generation.
    pub fn target_size(&self) -> usize {
        self.target_size
    }
}

/// Generate a random grouping, retrying fresh seeds on `Exhausted` up to
/// `limit` attempts.
fn generate_with_retry<R: Rng>(
    graph: &GridGraph,
    size: usize,
    limit: usize,
    rng: &mut R,
) -> Result<Grouping, SearchError> {
    for _ in 0..limit {
        match Grouping::generate(graph, size, rng) {
            Ok(grouping) => return Ok(grouping),
            Err(SearchError::Exhausted) => continue,
            Err(err) => return Err(err),
        }
    }
    Err(SearchError::RetriesExceeded { limit, size })
}
