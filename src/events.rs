//! Event handling functions for user input and application state updates.

use std::time::Duration;

use color_eyre::eyre::Result;
use log::debug;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::{
    grid::Direction,
    types::{MainMenuItem, OptionsMenuItem, Screen},
    App,
};

/// Time to wait for input before refreshing the screen.
///
/// Kept below the replay frame delay so the search animation does not stutter.
const POLL_TIMEOUT_MS: u64 = 30;

/// Handles input events and updates the application state accordingly.
///
/// This function polls for keyboard events and dispatches them to the appropriate handler
/// functions based on the key pressed. It uses a timeout to avoid blocking the UI.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(Duration::from_millis(POLL_TIMEOUT_MS))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key.code)?;
            }
        }
    }

    if matches!(app.screen, Screen::InGame) {
        app.playback.update();
    }

    Ok(())
}

/// Dispatches a single key press.
pub(crate) fn handle_key(app: &mut App, code: KeyCode) -> Result<()> {
    match code {
        KeyCode::Char('q') => app.exit = true,
        KeyCode::Char('j') => handle_j_events(app),
        KeyCode::Char('k') => handle_k_events(app),
        KeyCode::Char('l') => handle_l_events(app)?,
        KeyCode::Char('h') => handle_h_events(app),
        code if matches!(app.screen, Screen::InGame) => handle_game_events(app, code)?,
        _ => {}
    }

    Ok(())
}

/// Handles 'j' key press events for downward navigation.
///
/// This function processes the 'j' key press which is used for moving down in menus and lists.
/// The behavior varies depending on the current screen.
pub(crate) fn handle_j_events(app: &mut App) {
    match app.screen {
        Screen::MainMenu(MainMenuItem::StartGame) => {
            app.screen = Screen::MainMenu(MainMenuItem::Options);
        }
        Screen::MainMenu(MainMenuItem::Options) => {
            app.screen = Screen::MainMenu(MainMenuItem::Quit);
        }
        Screen::OptionsMenu(OptionsMenuItem::Level) => {
            app.screen = Screen::OptionsMenu(OptionsMenuItem::Solver);
        }
        Screen::OptionsMenu(OptionsMenuItem::Solver) => {
            app.screen = Screen::OptionsMenu(OptionsMenuItem::Back);
        }
        Screen::LevelMenu => {
            if let Some(next) = app.level_cursor.next() {
                app.level_cursor = next;
            }
        }
        _ => {}
    }
}

/// Handles 'k' key press events for upward navigation.
///
/// This function processes the 'k' key press which is used for moving up in menus and lists.
pub(crate) fn handle_k_events(app: &mut App) {
    match app.screen {
        Screen::MainMenu(MainMenuItem::Quit) => {
            app.screen = Screen::MainMenu(MainMenuItem::Options);
        }
        Screen::MainMenu(MainMenuItem::Options) => {
            app.screen = Screen::MainMenu(MainMenuItem::StartGame);
        }
        Screen::OptionsMenu(OptionsMenuItem::Back) => {
            app.screen = Screen::OptionsMenu(OptionsMenuItem::Solver);
        }
        Screen::OptionsMenu(OptionsMenuItem::Solver) => {
            app.screen = Screen::OptionsMenu(OptionsMenuItem::Level);
        }
        Screen::LevelMenu => {
            if let Some(previous) = app.level_cursor.previous() {
                app.level_cursor = previous;
            }
        }
        _ => {}
    }
}

/// Handles 'l' key press events for selection and forward navigation.
///
/// This function processes the 'l' key press which is used for selecting menu items and moving
/// forward in the application flow. Picking a level in the level menu generates its maze and
/// starts playing right away.
pub(crate) fn handle_l_events(app: &mut App) -> Result<()> {
    match app.screen {
        Screen::MainMenu(MainMenuItem::StartGame) => {
            app.screen = Screen::InGame;
        }
        Screen::MainMenu(MainMenuItem::Options) => {
            app.screen = Screen::OptionsMenu(OptionsMenuItem::Level);
        }
        Screen::MainMenu(MainMenuItem::Quit) => {
            app.exit = true;
        }
        Screen::OptionsMenu(OptionsMenuItem::Level) => {
            app.level_cursor = app.level;
            app.screen = Screen::LevelMenu;
        }
        Screen::OptionsMenu(OptionsMenuItem::Solver) => {
            app.solver_choice = app.solver_choice.cycle();
            debug!("solver set to {}", app.solver_choice.label());
        }
        Screen::OptionsMenu(OptionsMenuItem::Back) => {
            app.screen = Screen::MainMenu(MainMenuItem::StartGame);
        }
        Screen::LevelMenu => {
            app.start_level(app.level_cursor)?;
            app.screen = Screen::InGame;
        }
        Screen::InGame => {}
    }

    Ok(())
}

/// Handles 'h' key press events for backward navigation.
///
/// This function processes the 'h' key press which is used for moving back or returning to
/// previous screens. It handles returning from the in-game screen to the main menu and from the
/// level menu to the options menu.
pub(crate) fn handle_h_events(app: &mut App) {
    match app.screen {
        Screen::InGame => {
            app.playback.clear();
            app.screen = Screen::MainMenu(MainMenuItem::StartGame);
        }
        Screen::LevelMenu => {
            app.screen = Screen::OptionsMenu(OptionsMenuItem::Level);
        }
        _ => {}
    }
}

/// Handles keys that only mean something while playing.
///
/// Arrow keys walk the player, 's' replays the solver, 'r' regenerates the maze and 'n' moves on
/// once the goal is reached.
fn handle_game_events(app: &mut App, code: KeyCode) -> Result<()> {
    let direction = match code {
        KeyCode::Up => Direction::North,
        KeyCode::Right => Direction::East,
        KeyCode::Down => Direction::South,
        KeyCode::Left => Direction::West,
        KeyCode::Char('s') => return app.solve(),
        KeyCode::Char('r') => return app.restart(),
        KeyCode::Char('n') => return app.next_level(),
        _ => return Ok(()),
    };
    let _ = app.move_player(direction)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;
    use crate::config::{Cli, SolverChoice};

    /// Creates a seeded application on the main menu.
    fn create_test_app() -> App {
        let cli = Cli::try_parse_from(["tiermaze", "--seed", "3"]).expect("arguments parse");
        App::new(&cli).expect("application starts")
    }

    /// Presses every character of `keys` in order.
    fn press(app: &mut App, keys: &str) {
        for key in keys.chars() {
            handle_key(app, KeyCode::Char(key)).expect("key handled");
        }
    }

    #[test]
    fn test_main_menu_navigation() {
        let mut app = create_test_app();

        press(&mut app, "jjj");
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Quit));

        press(&mut app, "kkk");
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::StartGame));

        press(&mut app, "l");
        assert_eq!(app.screen, Screen::InGame);

        press(&mut app, "h");
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::StartGame));
    }

    #[test]
    fn test_quit_from_menu() {
        let mut app = create_test_app();

        press(&mut app, "jjl");

        assert!(app.exit);
    }

    #[test]
    fn test_options_cycle_solver() {
        let mut app = create_test_app();

        press(&mut app, "jljl");

        assert_eq!(app.screen, Screen::OptionsMenu(OptionsMenuItem::Solver));
        assert_eq!(app.solver_choice, SolverChoice::Bfs);
    }

    #[test]
    fn test_level_menu_starts_level() {
        let mut app = create_test_app();

        press(&mut app, "jll");
        assert_eq!(app.screen, Screen::LevelMenu);

        press(&mut app, "jjk");
        assert_eq!(app.level_cursor.number(), 2);

        press(&mut app, "l");
        assert_eq!(app.screen, Screen::InGame);
        assert_eq!(app.level.number(), 2);
        assert_eq!(app.maze.grid().rows(), 9);
    }

    #[test]
    fn test_level_cursor_is_clamped() {
        let mut app = create_test_app();

        press(&mut app, "jllkkk");

        assert_eq!(app.level_cursor.number(), 1);
    }

    #[test]
    fn test_game_keys_ignored_in_menus() {
        let mut app = create_test_app();

        handle_key(&mut app, KeyCode::Char('s')).expect("key handled");
        handle_key(&mut app, KeyCode::Right).expect("key handled");

        assert!(app.playback.is_empty());
        assert_eq!(app.player, app.maze.start());
    }

    #[test]
    fn test_solve_and_leave_clears_playback() {
        let mut app = create_test_app();

        press(&mut app, "ls");
        assert!(!app.playback.is_empty());

        press(&mut app, "h");
        assert!(app.playback.is_empty());
    }

    #[test]
    fn test_arrow_moves_player() {
        let mut app = create_test_app();
        press(&mut app, "l");
        let start = app.maze.start();
        let open = app
            .maze
            .grid()
            .open_neighbors(start)
            .next()
            .expect("start has a passage");
        let key = match Direction::between(start, open).expect("adjacent cells") {
            Direction::North => KeyCode::Up,
            Direction::East => KeyCode::Right,
            Direction::South => KeyCode::Down,
            Direction::West => KeyCode::Left,
        };

        handle_key(&mut app, key).expect("key handled");

        assert_eq!(app.player, open);
        assert_eq!(app.moves, 1);
    }
}
