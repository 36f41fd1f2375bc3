//! User interface rendering functions for all application screens.

use std::rc::Rc;

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    symbols::{Marker, DOT},
    text::Line,
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Borders, Clear,
    },
    Frame,
};

use crate::{
    config::{Level, MAX_LEVEL},
    grid::{Coord, Direction, Grid},
    types::{MainMenuItem, MenuType, OptionsMenuItem, Screen},
    App,
};

/// Updates the application UI based on the persistent state.
///
/// This function renders different screens based on the current state stored in the [`App`]
/// structure, dispatching to the appropriate rendering function for each screen type.
///
/// # Errors
///
/// This function may return errors from drawing operations or data conversion failures.
pub(crate) fn draw(app: &App, frame: &mut Frame) -> Result<()> {
    match &app.screen {
        Screen::MainMenu(item) => main_menu(frame, *item),
        Screen::OptionsMenu(item) => options_menu(app, frame, *item),
        Screen::LevelMenu => level_menu(app, frame),
        Screen::InGame => in_game(app, frame)?,
    }

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
///
/// This function renders a clear widget over the entire area of the frame to prepare for
/// rendering new content without artifacts from previous buffers rendered on the same frame.
pub(crate) fn clear(frame: &mut Frame) {
    let clear = Clear;
    frame.render_widget(clear, frame.area());
}

/// Renders the generic layout structure for the main and options menus.
///
/// This function creates the common layout and block structure used by both main and options menus.
/// The generic part includes the centered positioning and border styling, while the specific menu
/// content is handled by the caller using the [`MenuType`] parameter.
#[expect(
    clippy::indexing_slicing,
    reason = "The collection is created in-place with few, known elements; there is no risk of bad indexing."
)]
pub(crate) fn init_menu(frame: &mut Frame, menu: MenuType) -> Rc<[Rect]> {
    let space = Layout::vertical([
        Constraint::Percentage(30),
        Constraint::Fill(1),
        Constraint::Percentage(30),
    ])
    .split(frame.area())[1];
    let space = Layout::horizontal([
        Constraint::Percentage(35),
        Constraint::Percentage(30),
        Constraint::Percentage(35),
    ])
    .split(space)[1];

    let layout = Layout::vertical([Constraint::Max(u16::from(menu.value() + 2))])
        .flex(Flex::Center)
        .split(space)[0];

    let block = Block::bordered()
        .title(menu.repr())
        .title_bottom("(j) down / (k) up / (l) select")
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    let inner_space = block.inner(layout);

    frame.render_widget(block, layout);

    Layout::vertical(vec![Constraint::Max(1); usize::from(menu.value())]).split(inner_space)
}

/// Styles a menu entry, highlighting it when it is under the cursor.
fn menu_line(label: String, active: bool) -> Line<'static> {
    let style = if active {
        Style::default().fg(Color::White).bg(Color::Green)
    } else {
        Style::default().fg(Color::Green)
    };

    Line::styled(label, style).centered()
}

/// Renders the main menu screen with navigation options.
///
/// This function displays the main menu with options for "Start Game", "Options", and "Quit". It
/// highlights the currently selected option and provides visual feedback for user navigation.
pub(crate) fn main_menu(frame: &mut Frame, item: MainMenuItem) {
    clear(frame);

    let inner_layout = init_menu(frame, MenuType::MainMenu(3));

    for (entry, area) in MainMenuItem::ALL.into_iter().zip(inner_layout.iter()) {
        let label = match entry {
            MainMenuItem::StartGame => "Start Game",
            MainMenuItem::Options => "Options",
            MainMenuItem::Quit => "Quit",
        };
        frame.render_widget(menu_line(label.to_owned(), entry == item), *area);
    }
}

/// Renders the options menu screen with configuration choices.
///
/// This function displays the options menu with the level and solver settings and a "Return"
/// entry back to the main menu. The current value of each setting is shown next to its name.
pub(crate) fn options_menu(app: &App, frame: &mut Frame, item: OptionsMenuItem) {
    clear(frame);

    let inner_layout = init_menu(frame, MenuType::OptionsMenu(3));

    for (entry, area) in OptionsMenuItem::ALL.into_iter().zip(inner_layout.iter()) {
        let label = match entry {
            OptionsMenuItem::Level => format!("Level: {}", app.level.number()),
            OptionsMenuItem::Solver => format!("Solver: {}", app.solver_choice.label()),
            OptionsMenuItem::Back => "Return".to_owned(),
        };
        frame.render_widget(menu_line(label, entry == item), *area);
    }
}

/// Renders the level selection menu.
///
/// Every level is listed with its grid size. The level under the cursor is highlighted and the
/// level being played is marked with a dot.
#[expect(
    clippy::indexing_slicing,
    reason = "The collection is created in-place with few, known elements; there is no risk of bad indexing."
)]
#[expect(
    clippy::missing_asserts_for_indexing,
    reason = "The collection is created in-place with few, known elements; there is no risk of bad indexing."
)]
pub(crate) fn level_menu(app: &App, frame: &mut Frame) {
    clear(frame);

    let space = Layout::horizontal([
        Constraint::Percentage(30),
        Constraint::Fill(1),
        Constraint::Percentage(30),
    ])
    .split(frame.area())[1];
    let layout = Layout::vertical([Constraint::Length(u16::from(MAX_LEVEL) + 2)])
        .flex(Flex::Center)
        .split(space)[0];

    let block = Block::bordered()
        .title_top("Level list")
        .title_bottom("(j) down / (k) up / (l) play / (h) return")
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    let inner_space = block.inner(layout);

    frame.render_widget(block, layout);

    let inner_layout = Layout::horizontal([Constraint::Length(3), Constraint::Fill(1)])
        .split(inner_space);
    let rows = vec![Constraint::Max(1); usize::from(MAX_LEVEL)];
    let inner_selector = Layout::vertical(rows.clone()).split(inner_layout[0]);
    let inner_list = Layout::vertical(rows).split(inner_layout[1]);

    let content_style = Style::default().fg(Color::Green);
    let active_content_style = Style::default().fg(Color::White).bg(Color::Green);

    for ((level, selector_area), entry_area) in Level::all()
        .zip(inner_selector.iter())
        .zip(inner_list.iter())
    {
        let style = if level == app.level_cursor {
            active_content_style
        } else {
            content_style
        };
        let marker = if level == app.level { DOT } else { " " };
        let size = level.size();

        frame.render_widget(Line::styled(marker, style).centered(), *selector_area);
        frame.render_widget(
            Line::styled(
                format!("Level {} ({size}x{size})", level.number()),
                style,
            ),
            *entry_area,
        );
    }
}

/// Screen coordinates of everything drawn on the maze canvas, one layer per color.
struct MazeLayers {
    /// Wall blocks.
    walls: Vec<(f64, f64)>,
    /// Cells the search already expanded.
    closed: Vec<(f64, f64)>,
    /// Cells waiting in the search frontier.
    open: Vec<(f64, f64)>,
    /// Final path, including the blocks joining its cells.
    path: Vec<(f64, f64)>,
    /// Cell being expanded.
    current: Vec<(f64, f64)>,
    /// Exit cell.
    goal: Vec<(f64, f64)>,
    /// Player position.
    player: Vec<(f64, f64)>,
}

/// Returns the block of the drawing grid holding the floor of `coord`.
///
/// The drawing grid interleaves walls and cells, so a maze of `r` by `c` cells spans
/// `2r + 1` by `2c + 1` blocks with cells on odd positions.
const fn cell_block(coord: Coord) -> (usize, usize) {
    (2 * coord.col + 1, 2 * coord.row + 1)
}

/// Collects the wall blocks of `grid` as `(column, row)` pairs.
///
/// Corner posts are always solid. The blocks between cells are solid when the wall between them
/// stands, which leaves the entrance and exit openings as gaps in the outer border.
fn wall_blocks(grid: &Grid) -> Result<Vec<(usize, usize)>> {
    let mut blocks = Vec::new();
    for row in 0..=grid.rows() {
        for col in 0..=grid.cols() {
            blocks.push((2 * col, 2 * row));
        }
    }

    for coord in grid.coords() {
        let (col, row) = cell_block(coord);
        if grid.has_wall(coord, Direction::East)? {
            blocks.push((col + 1, row));
        }
        if grid.has_wall(coord, Direction::South)? {
            blocks.push((col, row + 1));
        }
        if coord.col == 0 && grid.has_wall(coord, Direction::West)? {
            blocks.push((col - 1, row));
        }
        if coord.row == 0 && grid.has_wall(coord, Direction::North)? {
            blocks.push((col, row - 1));
        }
    }

    Ok(blocks)
}

/// Collects the blocks covered by `path`, joining consecutive cells through the block between
/// them.
fn path_blocks(path: &[Coord]) -> Vec<(usize, usize)> {
    let mut blocks: Vec<(usize, usize)> = path.iter().copied().map(cell_block).collect();
    for pair in path.windows(2) {
        if let [from, to] = pair {
            let (from_col, from_row) = cell_block(*from);
            let (to_col, to_row) = cell_block(*to);
            blocks.push(((from_col + to_col) / 2, (from_row + to_row) / 2));
        }
    }

    blocks
}

/// Transforms drawing grid blocks to canvas coordinates centered on the origin.
///
/// This function takes `(column, row)` pairs of a drawing grid of `width` by `height` blocks and
/// converts them to the canvas coordinate system, where the origin sits in the middle and the y
/// axis points up.
///
/// # Errors
///
/// This function returns an error if a coordinate does not fit the terminal's coordinate range.
fn to_screen_coords(
    blocks: &[(usize, usize)],
    width: usize,
    height: usize,
) -> Result<Vec<(f64, f64)>> {
    let rows_n = f64::from(u16::try_from(height)?);
    let cols_n = f64::from(u16::try_from(width)?);

    blocks
        .iter()
        .map(|&(col, row)| {
            // Row transformation: coordinate[i] = (n - 1) / 2 - i
            let screen_y = (rows_n - 1.) / 2. - f64::from(u16::try_from(row)?);

            // Column transformation: coordinate[i] = i - (n - 1) / 2
            let screen_x = f64::from(u16::try_from(col)?) - (cols_n - 1.) / 2.;

            Ok((screen_x, screen_y))
        })
        .collect()
}

/// Computes every canvas layer for the current state of the game.
fn maze_layers(app: &App) -> Result<MazeLayers> {
    let grid = app.maze.grid();
    let width = 2 * grid.cols() + 1;
    let height = 2 * grid.rows() + 1;
    let screen = |blocks: &[(usize, usize)]| to_screen_coords(blocks, width, height);
    let cells = |coords: Vec<Coord>| {
        let blocks: Vec<(usize, usize)> = coords.into_iter().map(cell_block).collect();
        screen(&blocks)
    };

    let (closed, open, path, current): (Vec<Coord>, Vec<Coord>, _, Vec<Coord>) =
        match app.playback.current() {
            Some(step) => (
                step.closed.iter().copied().collect(),
                step.open.iter().copied().collect(),
                path_blocks(&step.path),
                vec![step.current],
            ),
            None => (Vec::new(), Vec::new(), Vec::new(), Vec::new()),
        };

    Ok(MazeLayers {
        walls: screen(&wall_blocks(grid)?)?,
        closed: cells(closed)?,
        open: cells(open)?,
        path: screen(&path)?,
        current: cells(current)?,
        goal: cells(vec![app.maze.goal()])?,
        player: cells(vec![app.player])?,
    })
}

/// Builds the status line shown under the maze.
fn status_line(app: &App) -> Line<'static> {
    let mut parts = vec![
        format!("Level {}", app.level.number()),
        format!("Solver {}", app.solver_choice.resolve(app.level).name()),
        format!("Moves {}", app.moves),
    ];
    if !app.playback.is_empty() {
        let (index, total) = app.playback.progress();
        parts.push(format!("Replay {index}/{total}"));
    }
    if app.completed {
        parts.push("Completed!".to_owned());
    }
    if let Some(notice) = app.notice {
        parts.push(notice.to_owned());
    }

    Line::styled(parts.join(" | "), Style::default().fg(Color::Green)).centered()
}

/// Renders the in-game screen with the maze, the player and the solver replay.
///
/// This function draws the maze walls, the search snapshot currently replayed and the player on
/// a single [`Canvas`], one layer per element so that later layers paint over earlier ones. A
/// status block under the maze lists the controls and the progress on the level.
///
/// # Errors
///
/// This function may return errors from coordinate conversion operations or layout lookups.
pub(crate) fn in_game(app: &App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let grid = app.maze.grid();
    let maze_rows = 2 * grid.rows() + 1;
    let maze_columns = 2 * grid.cols() + 1;

    // Maze area on top, status block at the bottom
    let overall_layout = Layout::vertical([Constraint::Min(1), Constraint::Length(3)])
        .split(frame.area());

    let maze_content_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get maze content area from layout")?;
    let status_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get status area from layout")?;

    let maze_area = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(u16::try_from(maze_rows)?),
        Constraint::Min(1),
    ])
    .split(maze_content_area)
    .get(1)
    .copied()
    .ok_or_eyre("failed to get maze area from layout")?;

    let space = Layout::horizontal([
        Constraint::Min(1),
        Constraint::Length(u16::try_from(maze_columns)?),
        Constraint::Min(1),
    ])
    .split(maze_area)
    .get(1)
    .copied()
    .ok_or_eyre("failed to get maze space from horizontal layout")?;

    // Pre-compute screen coordinates to handle errors before the closure
    let layers = maze_layers(app)?;

    let maze = Canvas::default()
        .x_bounds([
            (-rounded_div::i32(space.width.into(), 2)).into(),
            (rounded_div::i32(space.width.into(), 2)).into(),
        ])
        .y_bounds([
            (-rounded_div::i32(space.height.into(), 2)).into(),
            (rounded_div::i32(space.height.into(), 2)).into(),
        ])
        .marker(Marker::Dot)
        .paint(|ctx| {
            for (coords, color) in [
                (layers.walls.as_slice(), Color::Green),
                (layers.closed.as_slice(), Color::DarkGray),
                (layers.open.as_slice(), Color::Yellow),
                (layers.goal.as_slice(), Color::LightGreen),
                (layers.path.as_slice(), Color::Red),
                (layers.current.as_slice(), Color::Magenta),
                (layers.player.as_slice(), Color::Cyan),
            ] {
                ctx.draw(&Points { coords, color });
                ctx.layer();
            }
        });

    frame.render_widget(maze, space);

    let status_block = Block::bordered()
        .title("(arrows) move / (s) solve / (r) new maze / (n) next level / (h) menu")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Plain)
        .borders(Borders::TOP);
    let status_inner = status_block.inner(status_area);

    frame.render_widget(status_block, status_area);
    frame.render_widget(status_line(app), status_inner);

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::config::{Cli, SolverChoice};

    /// Creates a seeded test app for UI testing.
    fn create_test_app() -> App {
        let cli = Cli::try_parse_from(["tiermaze", "--seed", "21"]).expect("arguments parse");
        App::new(&cli).expect("application starts")
    }

    /// Creates a test terminal with known dimensions for UI testing.
    fn create_test_terminal() -> Terminal<TestBackend> {
        let backend = TestBackend::new(80, 24);
        Terminal::new(backend).expect("failed to create test terminal")
    }

    /// Draws the app and returns the rendered text, row after row.
    fn render(app: &App) -> String {
        let mut terminal = create_test_terminal();
        let _ = terminal
            .draw(|frame| {
                draw(app, frame).expect("drawing should succeed in test");
            })
            .expect("terminal draw succeeds");

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_draw_main_menu() {
        let app = create_test_app();

        let text = render(&app);

        assert!(text.contains("Main Menu"), "menu title missing");
        assert!(text.contains("Start Game"), "start entry missing");
        assert!(text.contains("Quit"), "quit entry missing");
    }

    #[test]
    fn test_draw_options_menu() {
        let mut app = create_test_app();
        app.screen = Screen::OptionsMenu(OptionsMenuItem::Solver);
        app.solver_choice = SolverChoice::Greedy;

        let text = render(&app);

        assert!(text.contains("Level: 1"), "level entry missing");
        assert!(text.contains("Solver: Greedy"), "solver entry missing");
        assert!(text.contains("Return"), "return entry missing");
    }

    #[test]
    fn test_draw_level_menu() {
        let mut app = create_test_app();
        app.screen = Screen::LevelMenu;

        let text = render(&app);

        assert!(text.contains("Level 1 (7x7)"), "first level missing");
        assert!(text.contains("Level 8 (21x21)"), "last level missing");
        assert!(text.contains(DOT), "current level marker missing");
    }

    #[test]
    fn test_draw_in_game() {
        let mut app = create_test_app();
        app.screen = Screen::InGame;

        let text = render(&app);

        assert!(text.contains("Level 1 | Solver Dijkstra | Moves 0"), "status missing");
        assert!(text.contains(DOT), "maze walls missing");
    }

    #[test]
    fn test_draw_in_game_with_replay() {
        let mut app = create_test_app();
        app.screen = Screen::InGame;
        app.solve().expect("solving succeeds");

        let text = render(&app);

        assert!(text.contains("Replay 1/"), "replay progress missing");
    }

    #[test]
    fn test_draw_final_level_notice() {
        let mut app = create_test_app();
        app.screen = Screen::InGame;
        app.start_level(Level::new(MAX_LEVEL).expect("valid level"))
            .expect("generation succeeds");
        app.completed = true;
        app.next_level().expect("nothing to generate");

        let text = render(&app);

        assert!(text.contains(crate::app::FINAL_LEVEL_NOTICE), "final level notice missing");
    }

    #[test]
    fn test_draw_in_game_large_level() {
        let mut app = create_test_app();
        app.screen = Screen::InGame;
        app.start_level(Level::new(8).expect("valid level"))
            .expect("generation succeeds");
        app.solve().expect("solving succeeds");

        let text = render(&app);

        assert!(text.contains("Level 8"), "status missing");
    }

    #[test]
    fn test_clear_function() {
        let mut terminal = create_test_terminal();

        let result = terminal.draw(|frame| {
            clear(frame);
        });

        assert!(result.is_ok(), "clearing screen should succeed");
    }

    #[test]
    fn test_init_menu_layouts() {
        let mut terminal = create_test_terminal();

        let result = terminal.draw(|frame| {
            let layout = init_menu(frame, MenuType::MainMenu(3));
            assert_eq!(layout.len(), 3, "main menu should have 3 items");
            let layout = init_menu(frame, MenuType::OptionsMenu(3));
            assert_eq!(layout.len(), 3, "options menu should have 3 items");
        });

        assert!(result.is_ok(), "initializing menus should succeed");
    }

    #[test]
    fn test_wall_blocks_of_open_cell_pair() {
        let mut grid = Grid::new(1, 2).expect("valid size");
        grid.open_passage(Coord::new(0, 0), Coord::new(0, 1))
            .expect("adjacent cells");

        let blocks = wall_blocks(&grid).expect("grid is consistent");

        // Six posts, two north walls, two south walls, west and east borders.
        assert_eq!(blocks.len(), 12);
        assert!(!blocks.contains(&(2, 1)), "opened wall still drawn");
        assert!(blocks.contains(&(0, 1)), "west border missing");
        assert!(blocks.contains(&(4, 1)), "east border missing");
    }

    #[test]
    fn test_path_blocks_join_cells() {
        let path = [Coord::new(0, 0), Coord::new(0, 1), Coord::new(1, 1)];

        let mut blocks = path_blocks(&path);
        blocks.sort_unstable();

        assert_eq!(blocks, vec![(1, 1), (2, 1), (3, 1), (3, 2), (3, 3)]);
    }

    #[test]
    fn test_to_screen_coords_centers_grid() {
        let coords = to_screen_coords(&[(0, 0), (2, 2)], 3, 3).expect("small grid");

        assert_eq!(coords, vec![(-1.0, 1.0), (1.0, -1.0)]);
    }
}
