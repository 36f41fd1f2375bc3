//! Command line configuration and the level table.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{ensure, Result};
use rand::{rngs::StdRng, SeedableRng as _};

use crate::{
    generator::{Picker, RandomPicker},
    maze::Maze,
    solver::SearchStrategy,
};

/// Highest level of the game.
pub const MAX_LEVEL: u8 = 8;

/// Side of the square grid at level one.
const BASE_SIZE: usize = 7;

/// Cells added to the grid side with every level.
const SIZE_STEP: usize = 2;

/// Last level solved with Dijkstra by default; later levels use A*.
const LAST_DIJKSTRA_LEVEL: u8 = 3;

/// Command line arguments of the game.
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Level to start on.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub level: u8,
    /// Seed for the maze generator, for reproducible mazes.
    #[arg(short, long)]
    pub seed: Option<u64>,
    /// Solver used when asking for the solution.
    #[arg(short, long, value_enum, default_value_t = SolverChoice::Auto)]
    pub algorithm: SolverChoice,
    /// File receiving log records; logging stays off without it.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    /// What to do; defaults to playing.
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the starting level.
    ///
    /// # Errors
    ///
    /// This function returns an error if the level number is out of range.
    pub fn start_level(&self) -> Result<Level> {
        Level::new(self.level)
    }

    /// Returns the random source for maze generation, seeded if a seed was given.
    #[must_use]
    pub fn picker(&self) -> RandomPicker<StdRng> {
        RandomPicker::new(
            self.seed
                .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64),
        )
    }
}

/// Subcommands of the game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Play in the terminal.
    #[default]
    Play,
    /// Print the level's maze and how every solver fares on it.
    Report,
}

/// Solver selection, either fixed or left to the level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SolverChoice {
    /// Dijkstra on early levels, A* afterwards.
    #[default]
    Auto,
    /// Breadth-first search.
    Bfs,
    /// Dijkstra's algorithm.
    Dijkstra,
    /// A* with the Manhattan heuristic.
    AStar,
    /// Greedy best-first search.
    Greedy,
}

impl SolverChoice {
    /// Returns the strategy to use on `level`.
    #[must_use]
    pub const fn resolve(self, level: Level) -> SearchStrategy {
        match self {
            Self::Auto => level.default_strategy(),
            Self::Bfs => SearchStrategy::BreadthFirst,
            Self::Dijkstra => SearchStrategy::Dijkstra,
            Self::AStar => SearchStrategy::AStar,
            Self::Greedy => SearchStrategy::Greedy,
        }
    }

    /// Returns the choice following this one, wrapping around.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::Auto => Self::Bfs,
            Self::Bfs => Self::Dijkstra,
            Self::Dijkstra => Self::AStar,
            Self::AStar => Self::Greedy,
            Self::Greedy => Self::Auto,
        }
    }

    /// Returns the label shown in menus.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Bfs => "BFS",
            Self::Dijkstra => "Dijkstra",
            Self::AStar => "A*",
            Self::Greedy => "Greedy",
        }
    }
}

/// Game level, from one to [`MAX_LEVEL`].
///
/// A level fixes the grid size, the difficulty tier handed to the generator and the solver used
/// by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u8);

impl Level {
    /// The first level.
    pub const FIRST: Self = Self(1);

    /// Builds a level from its number.
    ///
    /// # Errors
    ///
    /// This function returns an error if `number` is not between one and [`MAX_LEVEL`].
    pub fn new(number: u8) -> Result<Self> {
        ensure!(
            (1..=MAX_LEVEL).contains(&number),
            "level must be between 1 and {MAX_LEVEL}, got {number}"
        );

        Ok(Self(number))
    }

    /// Returns every level in order.
    pub fn all() -> impl DoubleEndedIterator<Item = Self> {
        (1..=MAX_LEVEL).map(Self)
    }

    /// Returns the level number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Returns the side of the level's square grid.
    #[must_use]
    pub fn size(self) -> usize {
        BASE_SIZE + (usize::from(self.0) - 1) * SIZE_STEP
    }

    /// Returns the generator's difficulty tier.
    #[must_use]
    pub fn tier(self) -> u32 {
        u32::from(self.0)
    }

    /// Returns the solver used when none was chosen.
    #[must_use]
    pub const fn default_strategy(self) -> SearchStrategy {
        if self.0 <= LAST_DIJKSTRA_LEVEL {
            SearchStrategy::Dijkstra
        } else {
            SearchStrategy::AStar
        }
    }

    /// Returns the level after this one, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        (self.0 < MAX_LEVEL).then(|| Self(self.0 + 1))
    }

    /// Returns the level before this one, if any.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        (self.0 > 1).then(|| Self(self.0 - 1))
    }

    /// Generates a maze for this level.
    ///
    /// # Errors
    ///
    /// This function propagates generator errors, which do not occur for valid levels.
    pub fn generate<P: Picker + ?Sized>(self, picker: &mut P) -> Result<Maze> {
        let size = self.size();
        Maze::generate(size, size, self.tier(), picker)
    }
}
