/*!
 * Optional stderr logger for callers without a logger of their own.
 *
 * The library itself only emits records through the `log` facade.
 */

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

use crate::app_config::LogLevel;

// @struct: Colourised stderr logger
struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    // @returns: ANSI colour for log level
    fn colour_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {:<5} {}\x1B[0m",
                Self::colour_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install the stderr logger at the given level
///
/// Fails, without panicking, when a logger is already installed.
pub fn init(level: LogLevel) -> Result<(), SetLoggerError> {
    let filter = level.to_level_filter();
    log::set_boxed_logger(Box::new(StderrLogger { level: filter }))?;
    log::set_max_level(filter);
    Ok(())
}
