//! Pathfinding over carved mazes.
//!
//! This module contains four interchangeable search algorithms working on unit-cost passages:
//! breadth-first search, Dijkstra, A* and greedy best-first search. Every algorithm can return a
//! bare path, and the two heuristic ones can additionally record a [`SearchStep`] for each cell
//! they expand so that the search can be replayed step by step.

use std::{
    cmp::Reverse,
    collections::{BTreeSet, BinaryHeap, HashMap, HashSet, VecDeque},
};

use color_eyre::eyre::{ensure, Result};
use log::debug;

use crate::grid::{Coord, Grid};

/// Search algorithms available to the solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchStrategy {
    /// Queue-based breadth-first search.
    BreadthFirst,
    /// Uniform-cost search keyed by accumulated cost.
    Dijkstra,
    /// Best-first search keyed by accumulated cost plus Manhattan distance to the goal.
    AStar,
    /// Best-first search keyed by Manhattan distance to the goal alone.
    ///
    /// Not guaranteed to find a shortest path.
    Greedy,
}

impl SearchStrategy {
    /// Every strategy, in increasing order of how informed the search is.
    pub const ALL: [Self; 4] = [Self::BreadthFirst, Self::Dijkstra, Self::AStar, Self::Greedy];

    /// Returns a human readable name for the strategy.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BreadthFirst => "BFS",
            Self::Dijkstra => "Dijkstra",
            Self::AStar => "A*",
            Self::Greedy => "Greedy",
        }
    }

    /// Returns whether the strategy always finds a shortest path.
    #[must_use]
    pub const fn is_optimal(self) -> bool {
        !matches!(self, Self::Greedy)
    }

    /// Returns the traced variant of this strategy, if it has one.
    #[must_use]
    pub const fn traced(self) -> Option<TracedSearch> {
        match self {
            Self::AStar => Some(TracedSearch::AStar),
            Self::Greedy => Some(TracedSearch::Greedy),
            Self::BreadthFirst | Self::Dijkstra => None,
        }
    }

    /// Returns the queue priority of a cell, lower being expanded first.
    const fn priority(self, cost: usize, estimate: usize) -> usize {
        match self {
            Self::BreadthFirst | Self::Dijkstra => cost,
            Self::AStar => cost + estimate,
            Self::Greedy => estimate,
        }
    }
}

/// Strategies able to record a replayable trace of their search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TracedSearch {
    /// Traced [`SearchStrategy::AStar`].
    AStar,
    /// Traced [`SearchStrategy::Greedy`].
    Greedy,
}

impl From<TracedSearch> for SearchStrategy {
    fn from(traced: TracedSearch) -> Self {
        match traced {
            TracedSearch::AStar => Self::AStar,
            TracedSearch::Greedy => Self::Greedy,
        }
    }
}

/// Snapshot of a search, taken as a cell is about to be expanded.
///
/// Only the last snapshot of a successful search carries a non-empty [`path`](Self::path).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchStep {
    /// Cells discovered but not yet expanded.
    pub open: BTreeSet<Coord>,
    /// Cells already expanded.
    pub closed: BTreeSet<Coord>,
    /// Cell being expanded.
    pub current: Coord,
    /// Finished path from start to goal, empty until the goal is expanded.
    pub path: Vec<Coord>,
}

impl SearchStep {
    /// Returns whether this snapshot carries the finished path.
    #[must_use]
    pub fn is_final(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Path finder over the passages of a grid.
#[derive(Clone, Copy, Debug)]
pub struct Solver<'grid> {
    /// Grid being searched.
    grid: &'grid Grid,
}

impl<'grid> Solver<'grid> {
    /// Creates a solver over a carved grid.
    #[must_use]
    pub const fn new(grid: &'grid Grid) -> Self {
        Self { grid }
    }

    /// Finds a path from `start` to `goal` with the given strategy.
    ///
    /// The path includes both endpoints, so a search from a cell to itself yields that single
    /// cell. An unreachable goal yields an empty path.
    ///
    /// # Errors
    ///
    /// This function returns an error if either endpoint lies outside the grid.
    pub fn solve(
        &self,
        strategy: SearchStrategy,
        start: Coord,
        goal: Coord,
    ) -> Result<Vec<Coord>> {
        self.check_endpoints(start, goal)?;

        let path = match strategy {
            SearchStrategy::BreadthFirst => self.breadth_first(start, goal),
            SearchStrategy::Dijkstra | SearchStrategy::AStar | SearchStrategy::Greedy => {
                self.best_first(strategy, start, goal, None)
            }
        };
        debug!(
            "{} found a path of {} cells from {start} to {goal}",
            strategy.name(),
            path.len()
        );

        Ok(path)
    }

    /// Runs a heuristic search from `start` to `goal`, recording every expansion.
    ///
    /// The returned sequence is never empty. When the goal is reachable its last element carries
    /// the finished path; otherwise every element has an empty path.
    ///
    /// # Errors
    ///
    /// This function returns an error if either endpoint lies outside the grid.
    pub fn solve_traced(
        &self,
        traced: TracedSearch,
        start: Coord,
        goal: Coord,
    ) -> Result<Vec<SearchStep>> {
        self.check_endpoints(start, goal)?;

        let mut steps = Vec::new();
        let _ = self.best_first(traced.into(), start, goal, Some(&mut steps));
        debug!(
            "traced {traced:?} search from {start} to {goal} in {} steps",
            steps.len()
        );

        Ok(steps)
    }

    /// Ensures both endpoints lie on the grid.
    fn check_endpoints(&self, start: Coord, goal: Coord) -> Result<()> {
        for endpoint in [start, goal] {
            ensure!(
                self.grid.contains(endpoint),
                "endpoint {endpoint} lies outside the {}x{} grid",
                self.grid.rows(),
                self.grid.cols()
            );
        }

        Ok(())
    }

    /// Breadth-first search; the first discovery of a cell is always through a shortest route.
    fn breadth_first(&self, start: Coord, goal: Coord) -> Vec<Coord> {
        let mut queue = VecDeque::from([start]);
        let mut discovered = HashSet::from([start]);
        let mut came_from = HashMap::new();

        while let Some(current) = queue.pop_front() {
            if current == goal {
                return reconstruct_path(&came_from, start, goal);
            }

            for neighbor in self.grid.open_neighbors(current) {
                if discovered.insert(neighbor) {
                    let _ = came_from.insert(neighbor, current);
                    queue.push_back(neighbor);
                }
            }
        }

        Vec::new()
    }

    /// Priority-queue search shared by Dijkstra, A* and greedy best-first.
    ///
    /// Queue entries are ordered by priority, then by insertion sequence, so equal priorities pop
    /// first-in first-out. Improved cells are pushed again rather than updated in place, and
    /// entries for cells already expanded are dropped when popped.
    fn best_first(
        &self,
        strategy: SearchStrategy,
        start: Coord,
        goal: Coord,
        mut trace: Option<&mut Vec<SearchStep>>,
    ) -> Vec<Coord> {
        let mut costs = HashMap::from([(start, 0_usize)]);
        let mut came_from = HashMap::new();
        let mut queue = BinaryHeap::from([Reverse((
            strategy.priority(0, start.manhattan(goal)),
            0_usize,
            start,
        ))]);
        let mut sequence = 0_usize;
        let mut open = BTreeSet::from([start]);
        let mut closed = BTreeSet::new();

        while let Some(Reverse((_, _, current))) = queue.pop() {
            if closed.contains(&current) {
                continue;
            }
            let _ = open.remove(&current);

            if let Some(steps) = trace.as_mut() {
                steps.push(SearchStep {
                    open: open.clone(),
                    closed: closed.clone(),
                    current,
                    path: Vec::new(),
                });
            }

            if current == goal {
                let path = reconstruct_path(&came_from, start, goal);
                if let Some(steps) = trace.as_mut() {
                    steps.push(SearchStep {
                        open: open.clone(),
                        closed: closed.clone(),
                        current,
                        path: path.clone(),
                    });
                }
                return path;
            }

            let _ = closed.insert(current);
            let tentative = costs.get(&current).map_or(usize::MAX, |cost| cost + 1);

            for neighbor in self.grid.open_neighbors(current) {
                if closed.contains(&neighbor) || !improves(&costs, neighbor, tentative) {
                    continue;
                }

                let _ = costs.insert(neighbor, tentative);
                let _ = came_from.insert(neighbor, current);
                sequence += 1;
                queue.push(Reverse((
                    strategy.priority(tentative, neighbor.manhattan(goal)),
                    sequence,
                    neighbor,
                )));
                let _ = open.insert(neighbor);
            }
        }

        Vec::new()
    }
}

/// Returns whether `tentative` beats the best known cost of `cell`.
fn improves(costs: &HashMap<Coord, usize>, cell: Coord, tentative: usize) -> bool {
    !costs.get(&cell).is_some_and(|&best| best <= tentative)
}

/// Walks the predecessor map back from `goal` and returns the path in travel order.
///
/// Yields an empty path when the chain of predecessors never reaches `start`.
fn reconstruct_path(came_from: &HashMap<Coord, Coord>, start: Coord, goal: Coord) -> Vec<Coord> {
    let mut path = vec![goal];
    let mut current = goal;

    while current != start {
        let Some(&previous) = came_from.get(&current) else {
            return Vec::new();
        };
        path.push(previous);
        current = previous;
    }
    path.reverse();

    path
}
