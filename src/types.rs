//! Type definitions and enums for the application state and navigation.

/// Enumeration of available application screens.
///
/// This enumeration holds information about the current screen of the game. This is used to
/// determine which screen to render and what actions to take based on user input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    /// Main menu screen of the game.
    MainMenu(MainMenuItem),
    /// Options configuration screen.
    OptionsMenu(OptionsMenuItem),
    /// Level selection screen.
    ///
    /// This variant represents the list of levels the player can jump to.
    LevelMenu,
    /// In-game maze screen.
    ///
    /// This variant represents the screen where the maze is displayed, walked and solved.
    InGame,
}

/// Main menu navigation options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MainMenuItem {
    /// "Start Game" menu option.
    StartGame,
    /// "Options" menu option.
    Options,
    /// "Quit" menu option.
    Quit,
}

impl MainMenuItem {
    /// Every item, in display order.
    pub(crate) const ALL: [Self; 3] = [Self::StartGame, Self::Options, Self::Quit];
}

/// Options menu navigation choices.
///
/// This enumeration holds the different items in the options menu. It is used to determine which
/// items can the user select in the options menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OptionsMenuItem {
    /// Level selection entry.
    Level,
    /// Solver selection entry, cycled in place.
    Solver,
    /// "Back" navigation option.
    Back,
}

impl OptionsMenuItem {
    /// Every item, in display order.
    pub(crate) const ALL: [Self; 3] = [Self::Level, Self::Solver, Self::Back];
}

/// Generic menu type configuration.
///
/// This enumeration holds the different specifics particular to each generic menu type in the
/// application's interface. Generic here means they share enough features to be considered worth
/// joining together part of their functionality.
pub(crate) enum MenuType {
    /// Main menu configuration.
    MainMenu(u8),
    /// Options menu configuration.
    OptionsMenu(u8),
}

impl MenuType {
    /// Returns the string representation of the menu type.
    ///
    /// This function provides the display name for each menu variant, used as the title in the
    /// menu's border when rendering the interface.
    pub(crate) const fn repr(&self) -> &str {
        match self {
            Self::MainMenu(_) => "Main Menu",
            Self::OptionsMenu(_) => "Options Menu",
        }
    }

    /// Returns the number of items stored by the menu type variant.
    pub(crate) const fn value(&self) -> u8 {
        match self {
            Self::MainMenu(value) | Self::OptionsMenu(value) => *value,
        }
    }
}
