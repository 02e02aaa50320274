//! Stderr logger behind the `log` facade

use std::io::{IsTerminal, Write};
use std::sync::OnceLock;

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Environment variable that overrides the level chosen by flags.
pub const LOG_LEVEL_ENV: &str = "SNAPCAT_LOG_LEVEL";

pub struct Logger {
    level: Level,
    color: bool,
}

impl Logger {
    fn level_color(level: Level) -> Color {
        match level {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Green,
            Level::Debug => Color::Cyan,
            Level::Trace => Color::Magenta,
        }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let choice = if self.color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stderr = StandardStream::stderr(choice);
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

        // A failed write to stderr has nowhere left to be reported.
        let _ = write!(stderr, "{} ", timestamp);
        let _ = stderr.set_color(
            ColorSpec::new()
                .set_fg(Some(Self::level_color(record.level())))
                .set_bold(true),
        );
        let _ = write!(stderr, "{:<5}", record.level());
        let _ = stderr.reset();
        let _ = writeln!(stderr, " [{}] {}", record.target(), record.args());
    }

    fn flush(&self) {}
}

/// Level implied by the `--debug` / `--verbose` flags.
pub fn level_for_flags(debug: bool, verbose: bool) -> Level {
    if debug {
        Level::Debug
    } else if verbose {
        Level::Info
    } else {
        Level::Warn
    }
}

fn parse_level(value: &str) -> Option<Level> {
    value
        .trim()
        .parse::<LevelFilter>()
        .ok()
        .and_then(|filter| filter.to_level())
}

fn level_from_env() -> Option<Level> {
    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|value| parse_level(&value))
}

/// Install the logger. Later calls keep the first configuration.
pub fn init(debug: bool, verbose: bool) -> Result<(), SetLoggerError> {
    let level = level_from_env().unwrap_or_else(|| level_for_flags(debug, verbose));
    init_with_level(level)
}

pub fn init_with_level(level: Level) -> Result<(), SetLoggerError> {
    static LOGGER: OnceLock<Logger> = OnceLock::new();

    let first_call = LOGGER.get().is_none();
    let logger = LOGGER.get_or_init(|| Logger {
        level,
        color: std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    });

    if first_call {
        log::set_logger(logger)?;
        log::set_max_level(logger.level.to_level_filter());
    }

    Ok(())
}
