//! Log initialisation.
//!
//! The terminal interface owns the screen, so records are never written to the standard streams.
//! Logging is only switched on when a file is given to receive them.

use std::{fs::File, path::Path};

use color_eyre::eyre::Result;
use env_logger::{Builder, Target};
use log::LevelFilter;

/// Routes log records to `log_file`, or leaves logging off when there is none.
///
/// Records at `info` and above are kept by default; `RUST_LOG` refines the filter.
///
/// # Errors
///
/// This function returns an error if the file cannot be created or if a logger was already
/// installed.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)?;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;

    Ok(())
}
