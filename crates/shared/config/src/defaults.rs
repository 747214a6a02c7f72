//! Sources of bundled default configuration files.

use std::borrow::Cow;
use std::fmt::Debug;
use std::path::PathBuf;

/// Supplies the bundled default for a configuration file that is missing on disk.
pub trait DefaultSource: Debug + Send + Sync {
    /// Returns the verbatim contents of the resource named `name`, if bundled.
    fn resource(&self, name: &str) -> Option<Cow<'static, [u8]>>;
}

/// No bundled defaults: a missing file is always an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDefaults;

impl DefaultSource for NoDefaults {
    fn resource(&self, _name: &str) -> Option<Cow<'static, [u8]>> {
        None
    }
}

/// Defaults compiled into the binary, usually with `include_str!`.
///
/// ```rust
/// use lobby_config::{DefaultSource, EmbeddedDefaults};
///
/// static DEFAULTS: EmbeddedDefaults =
///     EmbeddedDefaults::new(&[("lobby.toml", "[server]\nport = 25565\n")]);
///
/// assert!(DEFAULTS.resource("lobby.toml").is_some());
/// assert!(DEFAULTS.resource("other.toml").is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedDefaults {
    files: &'static [(&'static str, &'static str)],
}

impl EmbeddedDefaults {
    #[must_use]
    pub const fn new(files: &'static [(&'static str, &'static str)]) -> Self {
        Self { files }
    }
}

impl DefaultSource for EmbeddedDefaults {
    fn resource(&self, name: &str) -> Option<Cow<'static, [u8]>> {
        self.files
            .iter()
            .find(|(file, _)| *file == name)
            .map(|(_, contents)| Cow::Borrowed(contents.as_bytes()))
    }
}

/// Defaults shipped as plain files in a resources directory.
#[derive(Debug, Clone)]
pub struct DirectoryDefaults {
    root: PathBuf,
}

impl DirectoryDefaults {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DefaultSource for DirectoryDefaults {
    fn resource(&self, name: &str) -> Option<Cow<'static, [u8]>> {
        std::fs::read(self.root.join(name)).ok().map(Cow::Owned)
    }
}
