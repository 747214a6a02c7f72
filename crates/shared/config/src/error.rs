use std::borrow::Cow;

/// Errors raised while loading a configuration document or reading values from it.
#[lobby_derive::lobby_error]
pub enum ConfigError {
    /// The file does not exist and no bundled default of the same name is available.
    #[error("Configuration not found{}: {message}", format_context(.context))]
    ConfigNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The document could not be parsed.
    #[error("Malformed configuration{}: {source}", format_context(.context))]
    MalformedConfig {
        #[source]
        source: toml::de::Error,
        context: Option<Cow<'static, str>>,
    },

    /// Reading, writing or materializing the file failed.
    #[error("Configuration I/O error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    /// A segment of the requested path is absent.
    #[error("Missing configuration key{}: {message}", format_context(.context))]
    MissingKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The stored value cannot be converted to the requested type.
    #[error("Configuration type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// No adapter is registered for the requested type.
    #[error("No adapter registered{}: {message}", format_context(.context))]
    NoAdapter { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ConfigError {
    pub(crate) fn missing_key(path: &str) -> Self {
        Self::MissingKey { message: path.to_owned().into(), context: None }
    }

    pub(crate) fn type_mismatch(path: &str, expected: &str, found: &str) -> Self {
        Self::TypeMismatch {
            message: format!("`{path}` expected {expected}, found {found}").into(),
            context: None,
        }
    }

    pub(crate) fn no_adapter(type_name: &str) -> Self {
        Self::NoAdapter { message: type_name.to_owned().into(), context: None }
    }

    /// Returns `true` for the errors a single lookup can produce.
    ///
    /// These are the ones the injector tolerates per field.
    #[must_use]
    pub const fn is_lookup_error(&self) -> bool {
        matches!(self, Self::MissingKey { .. } | Self::TypeMismatch { .. } | Self::NoAdapter { .. })
    }
}
