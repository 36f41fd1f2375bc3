//! This crate contains the game logic of tiermaze, a maze game played in the terminal.
//!
//! Mazes are carved on a rectangular grid of cells with four walls each. Early tiers use a
//! depth-first backtracker, which produces long winding corridors, while later tiers switch to
//! randomized Prim and knock out extra walls to create loops. Every maze can be solved with
//! breadth-first search, Dijkstra, A* or greedy best-first search, and the last two can report
//! each step of their search so the game can replay it.
//!
//! The public modules hold the maze model and algorithms and can be used without the terminal
//! interface:
//!
//! ```
//! use tiermaze::{maze::Maze, solver::{SearchStrategy, Solver}};
//!
//! # fn main() -> color_eyre::eyre::Result<()> {
//! let maze = Maze::with_seed(9, 9, 3, 42)?;
//! let path = Solver::new(maze.grid()).solve(SearchStrategy::AStar, maze.start(), maze.goal())?;
//!
//! assert_eq!(path.first(), Some(&maze.start()));
//! assert_eq!(path.last(), Some(&maze.goal()));
//! # Ok(())
//! # }
//! ```

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

pub mod config;
pub mod generator;
pub mod grid;
pub mod logging;
pub mod maze;
pub mod report;
pub mod solver;

mod app;
mod events;
mod playback;
mod types;
mod ui;

pub use app::App;
