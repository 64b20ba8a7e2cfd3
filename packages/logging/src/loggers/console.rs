use crate::{ConsoleFormatter, LogFormatter, LogInfo, Logger, Loglevel};
use std::io::Write;
use termcolor::{ColorChoice, StandardStream, WriteColor};

/// Writes formatted log entries to stderr. This is the terminal sink the
/// channel-backed loggers ultimately drain into.
pub struct ConsoleLogger {
    stream: StandardStream,
    formatter: ConsoleFormatter,
    level: Loglevel,
}

impl ConsoleLogger {
    pub fn new(level: Loglevel) -> Self {
        Self {
            stream: StandardStream::stderr(ColorChoice::Auto),
            formatter: ConsoleFormatter,
            level,
        }
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new(Loglevel::Debug)
    }
}

impl Logger for ConsoleLogger {
    fn log(&mut self, log: LogInfo, level: Loglevel) {
        if level > self.level {
            return;
        }

        for part in self.formatter.format_log(&log, level) {
            let _ = match &part.color {
                Some(color) => self.stream.set_color(color),
                None => self.stream.reset(),
            };
            let _ = write!(self.stream, "{}", part.string);
        }
        let _ = self.stream.reset();
    }

    fn log_level(&self) -> Loglevel {
        self.level
    }

    fn set_log_level(&mut self, level: Loglevel) {
        self.level = level;
    }
}
