//! A simple logger for test suites that want to see what the generator and
//! the variant selection are doing. Everything within this crate logs via the
//! [log] facade, so any other logger works too.
use std::io::{self, Write};

pub use log::LevelFilter;
use log::{Level, Log, Metadata, Record, SetLoggerError};
use once_cell::sync::OnceCell;

static LOGGER: OnceCell<HelperLogger> = OnceCell::new();

/// Logger that writes every enabled record to standard error.
#[derive(Debug)]
pub struct HelperLogger {
    level: LevelFilter,
}

impl HelperLogger {
    pub const fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// Render a record as `level[target]: message`.
    pub fn format(record: &Record) -> String {
        let level_prefix = match record.level() {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        };

        format!("{level_prefix}[{}]: {}", record.target(), record.args())
    }
}

impl Log for HelperLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // Nothing can be done about a failed write to stderr.
            let _ = writeln!(io::stderr().lock(), "{}", Self::format(record));
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Install the [HelperLogger] as the global logger. This fails if any
/// logger has already been installed.
pub fn try_init(level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| HelperLogger::new(level));
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Like [try_init], but a logger that is already installed is kept. This is
/// convenient when several tests in the same binary want logging.
pub fn init(level: LevelFilter) {
    if try_init(level).is_err() {
        log::debug!("a logger is already installed, keeping it");
    }
}
