//! This crate contains the source code for the binary for the game tiermaze.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use std::io::{stdout, Write as _};

use clap::Parser as _;
use color_eyre::{eyre::Result, install};
use tiermaze::{
    config::{Cli, Command},
    logging, report, App,
};

fn main() -> Result<()> {
    install()?;

    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    match cli.command.unwrap_or_default() {
        Command::Play => {
            let mut app = App::new(&cli)?;
            let mut terminal = ratatui::init();
            let result = app.run(&mut terminal);
            ratatui::restore();
            result
        }
        Command::Report => {
            let level = cli.start_level()?;
            let maze = level.generate(&mut cli.picker())?;
            let mut out = stdout().lock();
            report::write_report(&maze, cli.algorithm.resolve(level), &mut out)?;
            out.flush()?;
            Ok(())
        }
    }
}
