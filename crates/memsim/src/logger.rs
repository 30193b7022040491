use std::{
    fmt,
    io::{self, Write as _},
};

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Writes log records to standard error as `LEVEL target: message`.
struct TerminalLogger;

static LOGGER: TerminalLogger = TerminalLogger;

pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

impl Log for TerminalLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = io::stderr().lock();
        let _ = writeln!(
            stderr,
            "{} {}: {}",
            LevelFormat(record.level()),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

struct LevelFormat(Level);

impl fmt::Display for LevelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = match self.0 {
            Level::Trace => 35,
            Level::Debug => 34,
            Level::Info => 32,
            Level::Warn => 33,
            Level::Error => 31,
        };
        let msg = match self.0 {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => " INFO",
            Level::Warn => " WARN",
            Level::Error => "ERROR",
        };
        write!(f, "\x1B[{color};1m{msg}\x1B[0m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_format() {
        assert_eq!(
            LevelFormat(Level::Info).to_string(),
            "\x1B[32;1m INFO\x1B[0m"
        );
        assert_eq!(
            LevelFormat(Level::Error).to_string(),
            "\x1B[31;1mERROR\x1B[0m"
        );
    }
}
