/**
 * Set up logging to standard error for the command-line program.
 *
 * Version: October 2026
 */
use std::env;
use std::str::FromStr;

use log::LevelFilter;

use super::common::{QuizError, Result};


/// Environment variable that overrides the log level, e.g. `QUIZDECK_LOG=debug`.
pub const LOG_ENV_VAR: &str = "QUIZDECK_LOG";


/// Install the global logger. `verbosity` is the number of `-v` flags.
pub fn init(verbosity: u8) -> Result<()> {
    let level = env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|value| LevelFilter::from_str(&value).ok())
        .unwrap_or_else(|| level_for_verbosity(verbosity));

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message,
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .map_err(QuizError::Logger)
}


fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}
