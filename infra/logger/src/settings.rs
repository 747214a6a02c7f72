use crate::error::LoggerError;
use lobby_config::Configurable;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

/// Logging options read from the `[logging]` table of the configuration document.
///
/// ```toml
/// [logging]
/// level = "debug"
/// directory = "logs"
/// json = false
/// filter = "lobby_modules=trace"
/// ```
///
/// Empty `directory` keeps output on the console only; empty `filter` falls back to `RUST_LOG`.
#[derive(Debug, Clone, PartialEq, Eq, Configurable)]
pub struct LoggingSettings {
    #[value("logging.level")]
    pub level: String,
    #[value("logging.directory")]
    pub directory: String,
    #[value("logging.json")]
    pub json: bool,
    #[value("logging.filter")]
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".to_owned(), directory: String::new(), json: false, filter: String::new() }
    }
}

impl LoggingSettings {
    /// Parses [`Self::level`] (`"trace"`, `"debug"`, `"info"`, `"warn"`, `"error"`, `"off"`).
    ///
    /// # Errors
    /// [`LoggerError::InvalidConfiguration`] for anything else.
    pub fn level_filter(&self) -> Result<LevelFilter, LoggerError> {
        LevelFilter::from_str(self.level.trim())
            .map_err(|e| LoggerError::invalid(format!("Invalid log level '{}': {e}", self.level)))
    }

    #[must_use]
    pub fn directory(&self) -> Option<PathBuf> {
        let trimmed = self.directory.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }

    #[must_use]
    pub fn filter(&self) -> Option<&str> {
        let trimmed = self.filter.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}
