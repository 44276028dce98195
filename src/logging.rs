//! Logger initialization.

use std::io::Write;

use colored::*;
use log::LevelFilter;

/// Initialize `env_logger` on stderr.
///
/// `RUST_LOG` is read first; `level` then overrides it for this crate only, so
/// `RUST_LOG=trace` still reaches dependencies.
pub fn init_logger(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_module("ux_scorecard", level);

    builder.format(|buf, record| {
        let level = record.level();
        let label = match level {
            log::Level::Error => level.to_string().red(),
            log::Level::Warn => level.to_string().yellow(),
            log::Level::Info => level.to_string().green(),
            log::Level::Debug => level.to_string().blue(),
            log::Level::Trace => level.to_string().purple(),
        };
        writeln!(buf, "[{}] {}", label, record.args())
    });

    builder.try_init()
}

/// Level implied by the `--verbose` / `--quiet` flags.
pub fn level_for(verbose: bool, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for(false, false), LevelFilter::Info);
        assert_eq!(level_for(true, false), LevelFilter::Debug);
        assert_eq!(level_for(true, true), LevelFilter::Warn);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        let _ = init_logger(LevelFilter::Info);
        let _ = init_logger(LevelFilter::Debug);
    }
}
