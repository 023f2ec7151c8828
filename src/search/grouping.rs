//! Connected fixed-size cell groupings and their mutation operators.
//!
//! A grouping is the unit of selection: an ordered sequence of distinct
//! grid cells whose induced subgraph is connected, scored by the product
//! of its member values.

use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;

use super::graph::{Cell, Coord, GridGraph};
use super::SearchError;

/// A connected subset of grid cells with a target size.
///
/// Members are stored in insertion order and are always distinct.
/// `generate` produces groupings that are connected by construction;
/// `mutate` may break connectivity, so candidates must be re-checked with
/// [`Grouping::is_connected`] before acceptance.
#[derive(Debug, Clone)]
pub struct Grouping {
    members: Vec<Cell>,
    size: usize,
}

impl Grouping {
    /// Build a grouping directly from members. The target size is taken
    /// from the member count; connectivity is not checked.
    pub fn from_members(members: Vec<Cell>) -> Self {
        let size = members.len();
        Self { members, size }
    }

    /// Grow a random grouping of `size` cells: a uniformly random seed
    /// cell, then repeated uniform draws from the frontier until full.
    ///
    /// Every appended cell is adjacent to an existing member, so the result
    /// is connected by construction. Fails with `Exhausted` when the
    /// frontier empties before `size` members are accumulated (the seeded
    /// region is fully enclosed); callers retry with a new seed.
    pub fn generate<R: Rng>(
        graph: &GridGraph,
        size: usize,
        rng: &mut R,
    ) -> Result<Self, SearchError> {
        let x = rng.gen_range(0..graph.width());
        let y = rng.gen_range(0..graph.height());
        let seed = graph.lookup(x, y)?;

        let mut grouping = Self {
            members: vec![seed],
            size,
        };
        while grouping.members.len() < size {
            grouping.grow(graph, rng)?;
        }
        Ok(grouping)
    }

    /// Derive a child by dropping one uniformly random member and growing
    /// one uniformly random frontier cell back. The child keeps the parent's
    /// size but is **not** guaranteed connected; validate with
    /// [`Grouping::is_connected`] before acceptance.
    pub fn mutate<R: Rng>(&self, graph: &GridGraph, rng: &mut R) -> Result<Self, SearchError> {
        let drop_index = rng.gen_range(0..self.members.len());
        let mut members = self.members.clone();
        members.remove(drop_index);

        let mut child = Self {
            members,
            size: self.size,
        };
        child.grow(graph, rng)?;
        Ok(child)
    }

    /// Append one uniformly random frontier cell.
    fn grow<R: Rng>(&mut self, graph: &GridGraph, rng: &mut R) -> Result<(), SearchError> {
        let frontier: Vec<Coord> = self.frontier(graph).into_iter().collect();
        let &(x, y) = frontier.choose(rng).ok_or(SearchError::Exhausted)?;
        self.members.push(graph.lookup(x, y)?);
        Ok(())
    }

    /// Union of grid neighbors over all members, excluding the members
    /// themselves. Ordered so that seeded sampling is reproducible.
    pub fn frontier(&self, graph: &GridGraph) -> BTreeSet<Coord> {
        let members: BTreeSet<Coord> = self.members.iter().map(Cell::coords).collect();
        let mut out = BTreeSet::new();
        for cell in &self.members {
            for neighbor in graph.neighbors_excluding(cell.x, cell.y, &members) {
                out.insert(neighbor.coords());
            }
        }
        out
    }

    /// Product of all member values; the empty product is 1. Recomputed on
    /// demand since membership changes under mutation. Saturates at
    /// `u128::MAX` on overflow.
    pub fn fitness(&self) -> u128 {
        self.members
            .iter()
            .fold(1u128, |acc, cell| acc.saturating_mul(cell.value as u128))
    }

    /// Verify the connectivity invariant independently of how the grouping
    /// was produced.
    ///
    /// Reachability search over the grid's adjacency restricted to the
    /// member set: starting from the first member, repeatedly absorb every
    /// pending member that appears in the visited set's neighbor frontier,
    /// until no pending member is reachable. Connected iff nothing is left
    /// pending.
    pub fn is_connected(&self, graph: &GridGraph) -> bool {
        let Some(first) = self.members.first() else {
            return true;
        };

        let mut visited: BTreeSet<Coord> = BTreeSet::from([first.coords()]);
        let mut pending: BTreeSet<Coord> =
            self.members[1..].iter().map(Cell::coords).collect();
        let mut frontier: BTreeSet<Coord> = graph
            .neighbors(first.x, first.y)
            .iter()
            .map(Cell::coords)
            .collect();

        loop {
            let reachable: Vec<Coord> = pending.intersection(&frontier).copied().collect();
            if reachable.is_empty() {
                break;
            }
            for coord in reachable {
                pending.remove(&coord);
                visited.insert(coord);
            }
            frontier.clear();
            for &(x, y) in &visited {
                for neighbor in graph.neighbors(x, y) {
                    frontier.insert(neighbor.coords());
                }
            }
        }

        pending.is_empty()
    }

    /// Whether the coordinate matches some member.
    pub fn contains(&self, coord: Coord) -> bool {
        self.members.iter().any(|c| c.coords() == coord)
    }

    /// Members in insertion order.
    pub fn members(&self) -> &[Cell] {
        &self.members
    }

    /// Current member count.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the grouping has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Target size this grouping grows toward.
    pub fn target_size(&self) -> usize {
        self.size
    }
}

/// Structural equality: member sequences match coordinate-for-coordinate in
/// the same order. Callers needing set semantics must normalize order first.
impl PartialEq for Grouping {
    fn eq(&self, other: &Self) -> bool {
        self.members.len() == other.members.len()
            && self
                .members
                .iter()
                .zip(other.members.iter())
                .all(|(a, b)| a.coords() == b.coords())
    }
}

impl Eq for Grouping {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn uniform_grid(width: usize, height: usize, value: u8, diagonals: bool) -> GridGraph {
        GridGraph::from_rows(&vec![vec![value; width]; height], diagonals)
    }

    #[test]
    fn test_generate_size_and_connectivity() {
        let graph = uniform_grid(10, 10, 3, true);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let grouping = Grouping::generate(&graph, 12, &mut rng).unwrap();
            assert_eq!(grouping.len(), 12);
            assert!(grouping.is_connected(&graph));
        }
    }

    #[test]
    fn test_generate_members_distinct() {
        let graph = uniform_grid(6, 6, 2, true);
        let mut rng = StdRng::seed_from_u64(11);

        let grouping = Grouping::generate(&graph, 20, &mut rng).unwrap();
        let coords: BTreeSet<Coord> = grouping.members().iter().map(Cell::coords).collect();
        assert_eq!(coords.len(), grouping.len());
    }

    #[test]
    fn test_generate_exhausted_on_too_small_grid() {
        let graph = uniform_grid(2, 2, 1, true);
        let mut rng = StdRng::seed_from_u64(3);

        assert!(matches!(
            Grouping::generate(&graph, 5, &mut rng),
            Err(SearchError::Exhausted)
        ));
    }

    #[test]
    fn test_fitness_is_member_product() {
        let graph = GridGraph::from_rows(&[vec![2, 3], vec![5, 7]], true);
        let members = vec![
            graph.lookup(0, 0).unwrap(),
            graph.lookup(1, 0).unwrap(),
            graph.lookup(0, 1).unwrap(),
        ];
        assert_eq!(Grouping::from_members(members).fitness(), 30);
    }

    #[test]
    fn test_fitness_on_all_ones_grid() {
        let graph = uniform_grid(8, 8, 1, true);
        let mut rng = StdRng::seed_from_u64(5);

        for size in [1, 5, 30] {
            let grouping = Grouping::generate(&graph, size, &mut rng).unwrap();
            assert_eq!(grouping.fitness(), 1);
        }
    }

    #[test]
    fn test_fitness_saturates() {
        let members = (0..200)
            .map(|i| Cell {
                x: i,
                y: 0,
                value: 9,
            })
            .collect();
        assert_eq!(Grouping::from_members(members).fitness(), u128::MAX);
    }

    #[test]
    fn test_mutate_preserves_size() {
        let graph = uniform_grid(10, 10, 4, true);
        let mut rng = StdRng::seed_from_u64(13);

        let parent = Grouping::generate(&graph, 8, &mut rng).unwrap();
        for _ in 0..20 {
            let child = parent.mutate(&graph, &mut rng).unwrap();
            assert_eq!(child.len(), parent.len());
        }
    }

    #[test]
    fn test_mutate_swaps_at_most_one_member() {
        let graph = uniform_grid(10, 10, 4, true);
        let mut rng = StdRng::seed_from_u64(17);

        let parent = Grouping::generate(&graph, 8, &mut rng).unwrap();
        let parent_set: BTreeSet<Coord> = parent.members().iter().map(Cell::coords).collect();

        for _ in 0..20 {
            let child = parent.mutate(&graph, &mut rng).unwrap();
            let child_set: BTreeSet<Coord> = child.members().iter().map(Cell::coords).collect();
            assert!(parent_set.difference(&child_set).count() <= 1);
            assert!(child_set.difference(&parent_set).count() <= 1);
        }
    }

    #[test]
    fn test_disconnected_members_fail_check() {
        let graph = uniform_grid(5, 5, 1, true);
        let members = vec![
            graph.lookup(0, 0).unwrap(),
            graph.lookup(1, 0).unwrap(),
            graph.lookup(4, 4).unwrap(),
        ];
        assert!(!Grouping::from_members(members).is_connected(&graph));
    }

    #[test]
    fn test_connectivity_respects_adjacency_mode() {
        // Diagonal pair: connected under 8-connectivity only.
        let members = |graph: &GridGraph| {
            vec![graph.lookup(0, 0).unwrap(), graph.lookup(1, 1).unwrap()]
        };

        let with_diagonals = uniform_grid(3, 3, 1, true);
        assert!(Grouping::from_members(members(&with_diagonals)).is_connected(&with_diagonals));

        let orthogonal_only = uniform_grid(3, 3, 1, false);
        assert!(!Grouping::from_members(members(&orthogonal_only)).is_connected(&orthogonal_only));
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let graph = uniform_grid(3, 3, 1, true);
        let a = graph.lookup(0, 0).unwrap();
        let b = graph.lookup(1, 0).unwrap();

        assert_eq!(
            Grouping::from_members(vec![a, b]),
            Grouping::from_members(vec![a, b])
        );
        assert_ne!(
            Grouping::from_members(vec![a, b]),
            Grouping::from_members(vec![b, a])
        );
    }

    #[test]
    fn test_contains() {
        let graph = uniform_grid(3, 3, 1, true);
        let grouping = Grouping::from_members(vec![graph.lookup(2, 1).unwrap()]);
        assert!(grouping.contains((2, 1)));
        assert!(!grouping.contains((1, 2)));
    }

    #[test]
    fn test_full_grid_generation_is_deterministic_outcome() {
        // On a 2x2 grid, a size-4 grouping can only be the whole grid.
        let graph = GridGraph::from_rows(&[vec![1, 2], vec![3, 4]], true);
        let mut rng = StdRng::seed_from_u64(23);

        for _ in 0..10 {
            let grouping = Grouping::generate(&graph, 4, &mut rng).unwrap();
            assert_eq!(grouping.len(), 4);
            assert_eq!(grouping.fitness(), 24);
        }
    }

    proptest! {
        #[test]
        fn prop_generate_is_connected(
            width in 3usize..12,
            height in 3usize..12,
            size in 2usize..8,
            seed in any::<u64>(),
        ) {
            let graph = uniform_grid(width, height, 5, true);
            let mut rng = StdRng::seed_from_u64(seed);
            let grouping = Grouping::generate(&graph, size, &mut rng).unwrap();
            prop_assert_eq!(grouping.len(), size);
            prop_assert!(grouping.is_connected(&graph));
        }
    }
}
