//! Maze carving algorithms.
//!
//! Generation happens in three passes over a fully walled [`Grid`]: a spanning tree is carved by
//! one of the [`GenerationStrategy`] algorithms, a tier-scaled number of extra passages is punched
//! in to create loops, and the entrance and exit walls on the outer border are cleared. Every
//! random decision goes through a [`Picker`], so tests can swap the random source for a
//! deterministic one.

use std::collections::HashSet;

use color_eyre::eyre::{ensure, OptionExt as _, Result};
use log::debug;
use rand::{seq::SliceRandom as _, Rng};

use crate::grid::{Coord, Direction, Grid};

/// Neighbour query order of the depth-first backtracker.
const BACKTRACK_ORDER: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::West,
    Direction::East,
];

/// Number of loop injection attempts allowed per requested loop.
const ATTEMPTS_PER_LOOP: usize = 10;

/// Loops requested per tier, before capping by grid size.
const LOOPS_PER_TIER: usize = 5;

/// Source of every random decision taken while carving.
pub trait Picker {
    /// Returns an index in `0..len`.
    ///
    /// Callers never ask for a pick among zero candidates, and [`RandomPicker`] panics if one
    /// does.
    fn pick(&mut self, len: usize) -> usize;

    /// Reorders `directions` in place.
    fn shuffle(&mut self, directions: &mut [Direction]);
}

/// Picker drawing uniformly from a [`rand`] generator.
#[derive(Clone, Debug)]
pub struct RandomPicker<R> {
    /// Underlying random number generator.
    rng: R,
}

impl<R: Rng> RandomPicker<R> {
    /// Wraps a random number generator.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Picker for RandomPicker<R> {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn shuffle(&mut self, directions: &mut [Direction]) {
        directions.shuffle(&mut self.rng);
    }
}

/// Picker that always takes the first candidate and never reorders.
///
/// With this picker generation is fully deterministic, which makes carved layouts predictable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FirstCandidate;

impl Picker for FirstCandidate {
    fn pick(&mut self, _len: usize) -> usize {
        0
    }

    fn shuffle(&mut self, _directions: &mut [Direction]) {}
}

/// Candidate wall between a cell and one of its neighbours.
///
/// Also used to report which passages a carving pass opened, in the order it opened them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Cell the passage is carved from.
    pub from: Coord,
    /// Cell the passage leads to.
    pub to: Coord,
}

impl Edge {
    /// Builds an edge between two cells.
    #[must_use]
    pub const fn new(from: Coord, to: Coord) -> Self {
        Self { from, to }
    }
}

/// Spanning tree algorithms available to the generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationStrategy {
    /// Iterative depth-first backtracking.
    ///
    /// Produces long winding corridors, since each branch is followed until it dead-ends.
    Backtracker,
    /// Randomized Prim's algorithm.
    ///
    /// Grows the tree from a random frontier edge each time, which branches far more uniformly
    /// and leaves many short dead ends.
    Prim,
}

impl GenerationStrategy {
    /// Returns the algorithm used for a difficulty tier.
    ///
    /// Tiers one and two get the backtracker; anything above gets Prim's algorithm.
    #[must_use]
    pub const fn for_tier(tier: u32) -> Self {
        if tier <= 2 {
            Self::Backtracker
        } else {
            Self::Prim
        }
    }
}

/// Carves a spanning tree over a fully walled grid, starting from the origin.
///
/// Returns the opened passages in carving order; there are always `rows * cols - 1` of them.
///
/// # Errors
///
/// This function only fails if the grid rejects a passage between two cells the algorithm found
/// adjacent, which would indicate a corrupted grid.
pub fn carve_spanning_tree<P: Picker + ?Sized>(
    grid: &mut Grid,
    strategy: GenerationStrategy,
    picker: &mut P,
) -> Result<Vec<Edge>> {
    let passages = match strategy {
        GenerationStrategy::Backtracker => backtrack(grid, picker)?,
        GenerationStrategy::Prim => prim(grid, picker)?,
    };
    debug!(
        "carved {} passages over a {}x{} grid with {strategy:?}",
        passages.len(),
        grid.rows(),
        grid.cols()
    );

    Ok(passages)
}

/// Depth-first backtracking over an explicit stack.
fn backtrack<P: Picker + ?Sized>(grid: &mut Grid, picker: &mut P) -> Result<Vec<Edge>> {
    let origin = Coord::default();
    let mut visited = HashSet::from([origin]);
    let mut stack = vec![origin];
    let mut passages = Vec::with_capacity(grid.cell_count().saturating_sub(1));

    while let Some(&current) = stack.last() {
        let candidates: Vec<Coord> = BACKTRACK_ORDER
            .into_iter()
            .filter_map(|direction| grid.neighbor(current, direction))
            .filter(|neighbor| !visited.contains(neighbor))
            .collect();

        if candidates.is_empty() {
            let _ = stack.pop();
        } else {
            let next = *candidates
                .get(picker.pick(candidates.len()))
                .ok_or_eyre("picker chose a neighbour out of range")?;
            grid.open_passage(current, next)?;
            let _ = visited.insert(next);
            stack.push(next);
            passages.push(Edge::new(current, next));
        }
    }

    Ok(passages)
}

/// Randomized Prim's algorithm over a frontier of candidate edges.
fn prim<P: Picker + ?Sized>(grid: &mut Grid, picker: &mut P) -> Result<Vec<Edge>> {
    let origin = Coord::default();
    let mut visited = HashSet::from([origin]);
    let mut frontier = frontier_edges(grid, origin, &visited);
    let mut passages = Vec::with_capacity(grid.cell_count().saturating_sub(1));

    while !frontier.is_empty() {
        let index = picker.pick(frontier.len());
        ensure!(
            index < frontier.len(),
            "picker chose a frontier edge out of range"
        );
        let edge = frontier.swap_remove(index);

        if visited.insert(edge.to) {
            grid.open_passage(edge.from, edge.to)?;
            passages.push(edge);
            frontier.extend(frontier_edges(grid, edge.to, &visited));
        }
    }

    Ok(passages)
}

/// Collects the edges from `coord` to each of its unvisited neighbours.
fn frontier_edges(grid: &Grid, coord: Coord, visited: &HashSet<Coord>) -> Vec<Edge> {
    Direction::ALL
        .into_iter()
        .filter_map(|direction| grid.neighbor(coord, direction))
        .filter(|neighbor| !visited.contains(neighbor))
        .map(|neighbor| Edge::new(coord, neighbor))
        .collect()
}

/// Returns how many extra passages loop injection tries to open.
///
/// This is five per tier, capped at a quarter of the cells.
#[must_use]
pub fn loop_budget(rows: usize, cols: usize, tier: u32) -> usize {
    let requested = usize::try_from(tier)
        .unwrap_or(usize::MAX)
        .saturating_mul(LOOPS_PER_TIER);

    requested.min(rows.saturating_mul(cols) / 4)
}

/// Opens extra passages in an already carved maze to create alternate routes.
///
/// Random cells other than the start `(0, 0)` and the goal `(rows - 1, cols - 1)` are picked, and
/// the first still walled side leading to another cell is opened. Gives up after ten attempts per
/// requested loop. Returns the passages actually opened.
///
/// # Errors
///
/// This function only fails if the grid rejects one of its own coordinates, which would indicate a
/// corrupted grid.
pub fn inject_loops<P: Picker + ?Sized>(
    grid: &mut Grid,
    tier: u32,
    picker: &mut P,
) -> Result<Vec<Edge>> {
    let budget = loop_budget(grid.rows(), grid.cols(), tier);
    // Start and goal are the first and last cells in row-major order.
    let candidates = grid.cell_count().saturating_sub(2);
    let mut opened = Vec::with_capacity(budget);

    if budget == 0 || candidates == 0 {
        return Ok(opened);
    }

    for _ in 0..budget.saturating_mul(ATTEMPTS_PER_LOOP) {
        if opened.len() >= budget {
            break;
        }

        let origin = grid
            .coord_at(1 + picker.pick(candidates))
            .ok_or_eyre("picked a cell outside the grid")?;
        let mut directions = Direction::ALL;
        picker.shuffle(&mut directions);

        for direction in directions {
            if !grid.has_wall(origin, direction)? {
                continue;
            }
            if let Some(neighbor) = grid.neighbor(origin, direction) {
                grid.open_passage(origin, neighbor)?;
                opened.push(Edge::new(origin, neighbor));
                break;
            }
        }
    }
    debug!("injected {} of {budget} loops", opened.len());

    Ok(opened)
}

/// Clears the start cell's North wall and the goal cell's South wall.
///
/// Both face outside the grid, so connectivity is unaffected.
///
/// # Errors
///
/// This function only fails on a corrupted grid.
pub fn open_entrance_and_exit(grid: &mut Grid) -> Result<()> {
    let goal = Coord::new(grid.rows() - 1, grid.cols() - 1);

    grid.open_boundary(Coord::default(), Direction::North)?;
    grid.open_boundary(goal, Direction::South)
}
