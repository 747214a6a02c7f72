//! # Logger
//!
//! Installs the process-wide `tracing` subscriber for the lobby platform.
//!
//! * Compact, colored console output.
//! * Optional rolling log files written by a non-blocking background worker,
//!   in plain text or JSON.
//! * Level and module filters from the builder, overridable through `RUST_LOG`.
//! * [`Logger::from_settings`] takes a [`LoggingSettings`] that was itself injected from the
//!   configuration document, so logging is configured next to everything else.
//!
//! ## Example
//!
//! ```rust
//! # use lobby_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder("lobby")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;
mod settings;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use crate::settings::LoggingSettings;
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

#[derive(Debug)]
struct Options {
    console: bool,
    level: LevelFilter,
    env_filter: Option<String>,
}

/// Console output only.
#[derive(Debug)]
pub struct Console;

/// Console output plus rolling files in a directory.
#[derive(Debug)]
pub struct Rolling {
    directory: PathBuf,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

mod private {
    pub trait Sealed {
        fn rolling(&self) -> Option<&super::Rolling>;
    }
}

impl Sealed for Console {
    fn rolling(&self) -> Option<&Rolling> {
        None
    }
}

impl Sealed for Rolling {
    fn rolling(&self) -> Option<&Rolling> {
        Some(self)
    }
}

/// A builder for configuring and initializing the global tracing subscriber.
#[derive(Debug)]
pub struct LoggerBuilder<O: Sealed = Console> {
    name: String,
    options: Options,
    output: O,
}

impl LoggerBuilder<Console> {
    /// Adds rolling log files under `directory`, created on [`LoggerBuilder::init`] if missing.
    pub fn directory(self, directory: impl Into<PathBuf>) -> LoggerBuilder<Rolling> {
        LoggerBuilder {
            name: self.name,
            options: self.options,
            output: Rolling {
                directory: directory.into(),
                rotation: Rotation::DAILY,
                max_files: DEFAULT_MAX_FILES,
                json: false,
            },
        }
    }
}

impl LoggerBuilder<Rolling> {
    /// Configures maximum number of log files to keep.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.output.max_files = max;
        self
    }

    /// Configures the log file rotation strategy.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.output.rotation = rotation;
        self
    }

    /// Writes log files as JSON lines. Console output stays human-readable.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.output.json = enabled;
        self
    }
}

impl<O: Sealed> LoggerBuilder<O> {
    /// Configures the minimum log level to be emitted.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.options.level = level;
        self
    }

    /// Adds an explicit env filter (e.g., `lobby_modules=debug,lobby_config=trace`).
    ///
    /// Invalid filters will cause [`LoggerBuilder::init`] to return an error.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.options.env_filter = Some(filter.into());
        self
    }

    /// Enables console logging.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.options.console = enabled;
        self
    }

    /// Consumes the builder and installs the global tracing subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle. It owns the [`WorkerGuard`] of the file writer and must be kept
    /// alive for as long as the program logs, or buffered lines are lost.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, zero `max_files`, an invalid
    ///   filter, or when no output is enabled.
    /// * [`LoggerError::Io`] if the log directory cannot be created.
    /// * [`LoggerError::Appender`] if the rolling file cannot be opened.
    /// * [`LoggerError::Subscriber`] if a global subscriber has already been set.
    pub fn init(self) -> Result<Logger, LoggerError> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::invalid("Logger name cannot be empty"));
        }

        let env_filter = build_env_filter(&self.options)?;
        let mut layers = Vec::new();

        if self.options.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = match self.output.rolling() {
            Some(rolling) => {
                let (file_layer, guard) = file_layer(&self.name, rolling)?;
                layers.push(file_layer);
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::invalid(
                "No logging output enabled. Enable console or a log directory.",
            ));
        }

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }
}

type BoxedLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

fn file_layer(name: &str, rolling: &Rolling) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    if rolling.max_files == 0 {
        return Err(LoggerError::invalid("max_files must be greater than zero"));
    }

    fs::create_dir_all(&rolling.directory)
        .context(format!("Failed to create log directory: {}", rolling.directory.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(rolling.rotation.clone())
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(rolling.max_files)
        .build(&rolling.directory)?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let plain = layer().with_writer(writer).with_ansi(false);
    let boxed = if rolling.json { plain.json().boxed() } else { plain.boxed() };

    Ok((boxed, guard))
}

fn build_env_filter(options: &Options) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(options.level.into());
    options.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder
                .parse(filter)
                .map_err(|e| LoggerError::invalid(format!("Invalid env filter '{filter}': {e}")))
        },
    )
}

/// A handle to the initialized logging system.
///
/// Holds the background worker guard of the file writer. Drop it only on shutdown.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a [`LoggerBuilder`] for a logger named `name`.
    ///
    /// The name prefixes rolling log files (e.g., `lobby.2026-10-16.log`).
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            name: name.into(),
            options: Options { console: true, level: LevelFilter::INFO, env_filter: None },
            output: Console,
        }
    }

    /// Runs `f` with a console subscriber scoped to the current thread.
    ///
    /// Covers the window before the configured logger exists: loading the configuration
    /// and injecting settings already log, and those events would otherwise be dropped.
    /// Honors `RUST_LOG`, defaulting to `info`. The global subscriber is left untouched, so
    /// [`LoggerBuilder::init`] can still run afterwards.
    pub fn bootstrap<R>(f: impl FnOnce() -> R) -> R {
        let filter =
            EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();
        let subscriber =
            tracing_subscriber::registry().with(filter).with(layer().compact().with_ansi(true));

        tracing::subscriber::with_default(subscriber, f)
    }

    /// Installs the global subscriber described by `settings`, with console output enabled.
    ///
    /// Relative directories are resolved against `base_dir`.
    ///
    /// # Errors
    /// Same as [`LoggerBuilder::init`], plus [`LoggerError::InvalidConfiguration`] for an
    /// unknown level.
    pub fn from_settings(
        name: impl Into<String>,
        settings: &LoggingSettings,
        base_dir: &Path,
    ) -> Result<Self, LoggerError> {
        let mut builder = Self::builder(name).level(settings.level_filter()?);
        if let Some(filter) = settings.filter() {
            builder = builder.env_filter(filter);
        }

        match settings.directory() {
            Some(directory) => builder.directory(base_dir.join(directory)).json(settings.json).init(),
            None => builder.init(),
        }
    }

    /// Returns a reference to the underlying worker guard, if present.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn builder_initial_state() {
        let builder = Logger::builder("lobby").env_filter("lobby_modules=debug");
        assert!(builder.options.console);
        assert_eq!(builder.options.level, LevelFilter::INFO);
        assert_eq!(builder.options.env_filter.as_deref(), Some("lobby_modules=debug"));
        assert!(builder.output.rolling().is_none());
    }

    #[test]
    fn rolling_configuration() {
        let dir = tempdir().unwrap();
        let builder = Logger::builder("lobby")
            .level(LevelFilter::DEBUG)
            .directory(dir.path().join("logs"))
            .max_files(5)
            .json(true);

        assert_eq!(builder.options.level, LevelFilter::DEBUG);
        assert_eq!(builder.output.max_files, 5);
        assert!(builder.output.json);
        assert_eq!(builder.output.directory, dir.path().join("logs"));
    }

    #[test]
    fn invalid_settings_fail_before_touching_the_subscriber() {
        let err = Logger::builder("  ").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = Logger::builder("lobby").console(false).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = Logger::builder("lobby").env_filter("lobby=notalevel").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let dir = tempdir().unwrap();
        let err = Logger::builder("lobby").directory(dir.path()).max_files(0).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn blocked_log_directory_reports_its_path() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("logs");
        fs::write(&blocker, "not a directory").unwrap();

        let err = Logger::builder("lobby").directory(blocker.join("nested")).init().unwrap_err();
        assert!(matches!(err, LoggerError::Io { context: Some(_), .. }));
        assert!(err.to_string().starts_with("Log directory error (Failed to create log directory:"));
    }
}
