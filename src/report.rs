//! Headless maze report.
//!
//! This module prints a generated maze as ASCII art together with the outcome of every solver on
//! it, which is handy for comparing algorithms without the terminal interface.

use std::{collections::HashSet, io::Write};

use color_eyre::eyre::Result;

use crate::{
    generator::GenerationStrategy,
    grid::{Coord, Direction, Grid},
    maze::Maze,
    solver::{SearchStrategy, Solver},
};

/// Writes the maze, the highlighted `highlight` solution and per-solver statistics to `out`.
///
/// # Errors
///
/// This function returns an error if writing fails.
pub fn write_report<W: Write>(maze: &Maze, highlight: SearchStrategy, out: &mut W) -> Result<()> {
    let grid = maze.grid();
    let solver = Solver::new(grid);

    writeln!(
        out,
        "{}x{} maze, tier {}, carved with {:?}, {} passages",
        grid.rows(),
        grid.cols(),
        maze.tier(),
        GenerationStrategy::for_tier(maze.tier()),
        grid.passage_count()
    )?;

    let solution = solver.solve(highlight, maze.start(), maze.goal())?;
    write!(out, "{}", render_ascii(grid, &solution)?)?;

    for strategy in SearchStrategy::ALL {
        let path = solver.solve(strategy, maze.start(), maze.goal())?;
        write!(out, "{:<9} path of {} cells", strategy.name(), path.len())?;
        if let Some(traced) = strategy.traced() {
            let steps = solver.solve_traced(traced, maze.start(), maze.goal())?;
            write!(out, ", {} trace steps", steps.len())?;
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Draws the grid with `+`, `-` and `|`, marking the cells of `path` with a dot.
///
/// # Errors
///
/// This function only fails on a corrupted grid.
pub fn render_ascii(grid: &Grid, path: &[Coord]) -> Result<String> {
    let on_path: HashSet<Coord> = path.iter().copied().collect();
    let mut text = String::new();

    for row in 0..grid.rows() {
        text.push('+');
        for col in 0..grid.cols() {
            let walled = grid.has_wall(Coord::new(row, col), Direction::North)?;
            text.push_str(if walled { "---+" } else { "   +" });
        }
        text.push('\n');

        let west = grid.has_wall(Coord::new(row, 0), Direction::West)?;
        text.push(if west { '|' } else { ' ' });
        for col in 0..grid.cols() {
            let coord = Coord::new(row, col);
            text.push_str(if on_path.contains(&coord) { " . " } else { "   " });
            text.push(if grid.has_wall(coord, Direction::East)? {
                '|'
            } else {
                ' '
            });
        }
        text.push('\n');
    }

    let last_row = grid.rows() - 1;
    text.push('+');
    for col in 0..grid.cols() {
        let walled = grid.has_wall(Coord::new(last_row, col), Direction::South)?;
        text.push_str(if walled { "---+" } else { "   +" });
    }
    text.push('\n');

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::FirstCandidate;

    #[test]
    fn test_render_serpentine() {
        let maze = Maze::generate(3, 3, 1, &mut FirstCandidate).expect("valid parameters");
        let solution = Solver::new(maze.grid())
            .solve(SearchStrategy::BreadthFirst, maze.start(), maze.goal())
            .expect("endpoints in bounds");

        let text = render_ascii(maze.grid(), &solution).expect("rendering succeeds");

        // The single injected loop joins (0, 1) to (0, 0), cutting the serpentine short.
        let expected = "\
+   +---+---+
| .   .   . |
+   +   +   +
|   |   | . |
+   +   +   +
|       | . |
+---+---+   +
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_report_lists_every_solver() {
        let maze = Maze::with_seed(7, 7, 1, 11).expect("valid parameters");
        let mut out = Vec::new();

        write_report(&maze, SearchStrategy::AStar, &mut out).expect("writing to memory");
        let text = String::from_utf8(out).expect("report is ASCII");

        assert!(text.starts_with("7x7 maze, tier 1, carved with Backtracker"));
        for strategy in SearchStrategy::ALL {
            assert!(text.contains(strategy.name()), "{strategy:?} missing");
        }
        assert_eq!(text.matches("trace steps").count(), 2);
        assert_eq!(text.lines().count(), 1 + 15 + 4);
    }
}
