//! Core application state and logic for the maze game.

use color_eyre::eyre::Result;
use log::info;
use rand::rngs::StdRng;
use ratatui::DefaultTerminal;

use crate::{
    config::{Cli, Level, SolverChoice},
    events,
    generator::RandomPicker,
    grid::{Coord, Direction},
    maze::Maze,
    playback::{self, Playback},
    solver::Solver,
    types::{MainMenuItem, Screen},
    ui,
};

/// Status line message shown when asking for a level past the last one.
pub(crate) const FINAL_LEVEL_NOTICE: &str = "You finished the hardest level!";

/// Application state container for the maze game.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui will render the game and Crossterm events will help writing to.
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// wants to quit the game but it starts off `false`.
    pub(crate) exit: bool,
    /// Current screen being displayed to the user.
    pub(crate) screen: Screen,
    /// Level being played.
    pub(crate) level: Level,
    /// Level under the cursor in the level menu.
    pub(crate) level_cursor: Level,
    /// Solver used when the player asks for the solution.
    pub(crate) solver_choice: SolverChoice,
    /// Random source for every maze generated during the session.
    ///
    /// A single picker is kept so that a seeded session produces the same sequence of mazes on
    /// every run.
    pub(crate) picker: RandomPicker<StdRng>,
    /// Maze of the current level.
    pub(crate) maze: Maze,
    /// Cell the player stands on.
    pub(crate) player: Coord,
    /// Number of moves made on the current maze.
    pub(crate) moves: usize,
    /// Whether the player reached the goal of the current maze.
    pub(crate) completed: bool,
    /// One-off message for the status line, dropped when another maze is loaded.
    pub(crate) notice: Option<&'static str>,
    /// Replay of the last solver run.
    pub(crate) playback: Playback,
}

impl App {
    /// Creates the application from the command line configuration.
    ///
    /// The maze for the starting level is generated right away.
    ///
    /// # Errors
    ///
    /// This function returns an error if the starting level is out of range.
    pub fn new(cli: &Cli) -> Result<Self> {
        let level = cli.start_level()?;
        let mut picker = cli.picker();
        let maze = level.generate(&mut picker)?;
        info!("starting at level {}", level.number());

        Ok(Self {
            exit: false,
            screen: Screen::MainMenu(MainMenuItem::StartGame),
            level,
            level_cursor: level,
            solver_choice: cli.algorithm,
            picker,
            player: maze.start(),
            maze,
            moves: 0,
            completed: false,
            notice: None,
            playback: Playback::new(),
        })
    }

    /// Runs the main loop of the application.
    ///
    /// This function handles user input and updates the application state. The loop continues until
    /// the exit condition is `true`, after which the function returns to the call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            let _ = terminal.try_draw(|frame| {
                ui::draw(self, frame).map_err(std::io::Error::other)
            })?;
            events::handle_events(self)?;
        }

        Ok(())
    }

    /// Switches to `level` with a freshly generated maze.
    pub(crate) fn start_level(&mut self, level: Level) -> Result<()> {
        self.maze = level.generate(&mut self.picker)?;
        self.level = level;
        self.level_cursor = level;
        self.player = self.maze.start();
        self.moves = 0;
        self.completed = false;
        self.notice = None;
        self.playback.clear();
        info!(
            "level {} with a {}x{} maze",
            level.number(),
            self.maze.grid().rows(),
            self.maze.grid().cols()
        );

        Ok(())
    }

    /// Regenerates the maze of the current level.
    pub(crate) fn restart(&mut self) -> Result<()> {
        self.start_level(self.level)
    }

    /// Moves on to the next level once the current one is completed.
    ///
    /// Does nothing before completion. Completing the last level leaves a notice instead.
    pub(crate) fn next_level(&mut self) -> Result<()> {
        if !self.completed {
            return Ok(());
        }

        match self.level.next() {
            Some(next) => self.start_level(next),
            None => {
                self.notice = Some(FINAL_LEVEL_NOTICE);
                info!("final level {} already completed", self.level.number());
                Ok(())
            }
        }
    }

    /// Moves the player one cell in `direction` if no wall blocks the way.
    ///
    /// Returns whether the player moved.
    pub(crate) fn move_player(&mut self, direction: Direction) -> Result<bool> {
        if self.maze.has_wall(self.player, direction)? {
            return Ok(false);
        }
        // The entrance and exit openings lead nowhere.
        let Some(next) = self.maze.grid().neighbor(self.player, direction) else {
            return Ok(false);
        };

        self.player = next;
        self.moves += 1;
        if next == self.maze.goal() && !self.completed {
            self.completed = true;
            info!(
                "level {} completed in {} moves",
                self.level.number(),
                self.moves
            );
        }

        Ok(true)
    }

    /// Solves the maze from entrance to exit and loads the result for replay.
    ///
    /// Heuristic solvers replay their full search; the others reveal their path cell by cell.
    pub(crate) fn solve(&mut self) -> Result<()> {
        let strategy = self.solver_choice.resolve(self.level);
        let solver = Solver::new(self.maze.grid());
        let (start, goal) = (self.maze.start(), self.maze.goal());

        let steps = match strategy.traced() {
            Some(traced) => solver.solve_traced(traced, start, goal)?,
            None => playback::path_reveal(&solver.solve(strategy, start, goal)?),
        };
        info!(
            "{} solution loaded with {} frames",
            strategy.name(),
            steps.len()
        );
        self.playback.load(steps);

        Ok(())
    }
}
