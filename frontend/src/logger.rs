//! `log` backend that writes to the browser console.

use std::str::FromStr;

use log::{Level, LevelFilter, Log, Metadata, Record};

struct ConsoleLogger {
    level: LevelFilter,
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] {}", record.target(), record.args());
        match record.level() {
            Level::Error => gloo_console::error!(line),
            Level::Warn => gloo_console::warn!(line),
            Level::Info => gloo_console::info!(line),
            Level::Debug | Level::Trace => gloo_console::debug!(line),
        }
    }

    fn flush(&self) {}
}

fn configured_level() -> LevelFilter {
    let default = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    option_env!("HABITS_LOG_LEVEL")
        .and_then(|level| LevelFilter::from_str(level).ok())
        .unwrap_or(default)
}

/// Installs the console logger. Safe to call more than once; later calls are
/// no-ops.
pub fn init() {
    let level = configured_level();
    let logger: &'static ConsoleLogger = Box::leak(Box::new(ConsoleLogger { level }));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}
