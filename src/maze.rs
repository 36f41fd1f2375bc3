//! Carved maze container.

use color_eyre::eyre::{ensure, Result};
use log::debug;
use rand::{rngs::StdRng, SeedableRng as _};

use crate::{
    generator::{self, GenerationStrategy, Picker, RandomPicker},
    grid::{Coord, Direction, Grid},
};

/// Fully carved maze at a given difficulty tier.
///
/// A maze is generated once, during construction, and only hands out shared references to its
/// [`Grid`] afterwards, so nothing can alter its walls while it is being solved or drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    /// Carved grid.
    grid: Grid,
    /// Difficulty tier the maze was carved for.
    tier: u32,
}

impl Maze {
    /// Generates a maze seeded from system entropy.
    ///
    /// # Errors
    ///
    /// This function returns an error if either dimension or the tier is zero.
    pub fn new(rows: usize, cols: usize, tier: u32) -> Result<Self> {
        Self::generate(
            rows,
            cols,
            tier,
            &mut RandomPicker::new(StdRng::from_entropy()),
        )
    }

    /// Generates a reproducible maze from a numeric seed.
    ///
    /// # Errors
    ///
    /// This function returns an error if either dimension or the tier is zero.
    pub fn with_seed(rows: usize, cols: usize, tier: u32, seed: u64) -> Result<Self> {
        Self::generate(
            rows,
            cols,
            tier,
            &mut RandomPicker::new(StdRng::seed_from_u64(seed)),
        )
    }

    /// Generates a maze drawing every random decision from `picker`.
    ///
    /// The spanning tree algorithm is chosen by [`GenerationStrategy::for_tier`], loops are
    /// injected afterwards and the entrance and exit are opened on the border.
    ///
    /// # Errors
    ///
    /// This function returns an error if either dimension or the tier is zero.
    pub fn generate<P: Picker + ?Sized>(
        rows: usize,
        cols: usize,
        tier: u32,
        picker: &mut P,
    ) -> Result<Self> {
        ensure!(tier >= 1, "difficulty tier must be positive");
        let mut grid = Grid::new(rows, cols)?;

        let strategy = GenerationStrategy::for_tier(tier);
        let _ = generator::carve_spanning_tree(&mut grid, strategy, picker)?;
        let _ = generator::inject_loops(&mut grid, tier, picker)?;
        generator::open_entrance_and_exit(&mut grid)?;
        debug!(
            "generated {rows}x{cols} maze at tier {tier} with {} passages",
            grid.passage_count()
        );

        Ok(Self { grid, tier })
    }

    /// Returns the carved grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the difficulty tier.
    #[must_use]
    pub const fn tier(&self) -> u32 {
        self.tier
    }

    /// Returns the entrance cell, the north-west corner.
    #[must_use]
    pub const fn start(&self) -> Coord {
        Coord::new(0, 0)
    }

    /// Returns the exit cell, the south-east corner.
    #[must_use]
    pub const fn goal(&self) -> Coord {
        Coord::new(self.grid.rows() - 1, self.grid.cols() - 1)
    }

    /// Returns whether a wall blocks the `direction` side of the cell at `coord`.
    ///
    /// This is the query player movement is validated against.
    ///
    /// # Errors
    ///
    /// This function returns an error if `coord` lies outside the maze.
    pub fn has_wall(&self, coord: Coord, direction: Direction) -> Result<bool> {
        self.grid.has_wall(coord, direction)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use super::*;
    use crate::generator::{Edge, FirstCandidate};

    /// Collects the cells reachable from the start through open passages.
    fn reachable(maze: &Maze) -> HashSet<Coord> {
        let mut seen = HashSet::from([maze.start()]);
        let mut queue = VecDeque::from([maze.start()]);
        while let Some(current) = queue.pop_front() {
            for neighbor in maze.grid().open_neighbors(current) {
                if seen.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        seen
    }

    #[test]
    fn test_generate_rejects_invalid_parameters() {
        assert!(Maze::with_seed(0, 4, 1, 7).is_err());
        assert!(Maze::with_seed(4, 0, 1, 7).is_err());
        assert!(Maze::with_seed(4, 4, 0, 7).is_err());
    }

    #[test]
    fn test_every_tier_is_connected_and_symmetric() {
        for tier in 1..=8 {
            let size = 7 + (tier - 1) * 2;
            let maze = Maze::with_seed(size, size + 2, u32::try_from(tier).expect("small tier"), 42)
                .expect("valid parameters");

            assert_eq!(reachable(&maze).len(), size * (size + 2), "tier {tier}");
            for coord in maze.grid().coords() {
                for direction in Direction::ALL {
                    if let Some(neighbor) = maze.grid().neighbor(coord, direction) {
                        assert_eq!(
                            maze.has_wall(coord, direction).expect("in bounds"),
                            maze.has_wall(neighbor, direction.opposite())
                                .expect("in bounds")
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_loops_only_add_passages() {
        let maze = Maze::with_seed(9, 9, 2, 3).expect("valid parameters");
        let tree = 9 * 9 - 1;

        assert!(maze.grid().passage_count() >= tree);
        assert!(maze.grid().passage_count() <= tree + generator::loop_budget(9, 9, 2));
    }

    #[test]
    fn test_same_seed_same_maze() {
        let first = Maze::with_seed(11, 11, 5, 1234).expect("valid parameters");
        let second = Maze::with_seed(11, 11, 5, 1234).expect("valid parameters");

        assert_eq!(first, second);
    }

    #[test]
    fn test_entrance_and_exit_open() {
        let maze = Maze::with_seed(5, 6, 3, 8).expect("valid parameters");

        assert_eq!(maze.start(), Coord::new(0, 0));
        assert_eq!(maze.goal(), Coord::new(4, 5));
        assert!(!maze
            .has_wall(maze.start(), Direction::North)
            .expect("in bounds"));
        assert!(!maze
            .has_wall(maze.goal(), Direction::South)
            .expect("in bounds"));
        assert!(maze.has_wall(Coord::new(5, 0), Direction::North).is_err());
    }

    #[test]
    fn test_tier_three_carves_with_prim_then_loops() {
        let maze = Maze::generate(3, 3, 3, &mut FirstCandidate).expect("valid parameters");

        let mut expected = Grid::new(3, 3).expect("valid dimensions");
        let tree = generator::carve_spanning_tree(
            &mut expected,
            GenerationStrategy::Prim,
            &mut FirstCandidate,
        )
        .expect("carving succeeds");
        let loops = generator::inject_loops(&mut expected, 3, &mut FirstCandidate)
            .expect("injection succeeds");
        generator::open_entrance_and_exit(&mut expected).expect("border walls face outside");

        assert_eq!(maze.grid(), &expected);
        assert_eq!(maze.grid().passage_count(), tree.len() + loops.len());
        assert_eq!(loops, vec![Edge::new(Coord::new(0, 1), Coord::new(0, 2))]);

        // The backtracker opens (2, 0) to (2, 1) on this grid; Prim reaches (2, 1) from above.
        let backtracked = Maze::generate(3, 3, 2, &mut FirstCandidate).expect("valid parameters");
        assert!(!backtracked
            .has_wall(Coord::new(2, 0), Direction::East)
            .expect("in bounds"));
        assert!(maze
            .has_wall(Coord::new(2, 0), Direction::East)
            .expect("in bounds"));
    }

    #[test]
    fn test_single_cell_maze() {
        let maze = Maze::generate(1, 1, 1, &mut FirstCandidate).expect("valid parameters");

        assert_eq!(maze.start(), maze.goal());
        assert_eq!(maze.grid().passage_count(), 0);
        assert_eq!(maze.tier(), 1);
    }
}
