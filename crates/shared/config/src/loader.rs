use crate::adapter::ValueAdapter;
use crate::defaults::{DefaultSource, NoDefaults};
use crate::document::ConfigDocument;
use crate::error::{ConfigError, ConfigErrorExt};
use crate::registry::AdapterRegistry;
use private::Sealed;
use std::any::Any;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct NoFile;
#[derive(Debug)]
pub struct WithFile(PathBuf);

mod private {
    pub trait Sealed {}
}
impl Sealed for NoFile {}
impl Sealed for WithFile {}

/// Builder for a [`ConfigurationLoader`].
#[derive(Debug)]
pub struct LoaderBuilder<F: Sealed = NoFile> {
    file: F,
    base_dir: Option<PathBuf>,
    defaults: Box<dyn DefaultSource>,
    registry: Option<AdapterRegistry>,
}

impl Default for LoaderBuilder<NoFile> {
    fn default() -> Self {
        Self { file: NoFile, base_dir: None, defaults: Box::new(NoDefaults), registry: None }
    }
}

impl<F: Sealed> LoaderBuilder<F> {
    /// Directory the file name is resolved against. Defaults to the working directory.
    #[must_use = "The builder must be configured before it can be used to load a document."]
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Where to look for a same-named default when the file is missing.
    #[must_use = "The builder must be configured before it can be used to load a document."]
    pub fn defaults(mut self, source: impl DefaultSource + 'static) -> Self {
        self.defaults = Box::new(source);
        self
    }

    /// Registry used by [`ConfigurationLoader::get`]. Defaults to [`AdapterRegistry::global`].
    #[must_use = "The builder must be configured before it can be used to load a document."]
    pub fn registry(mut self, registry: AdapterRegistry) -> Self {
        self.registry = Some(registry);
        self
    }
}

impl LoaderBuilder<NoFile> {
    /// Sets the configuration file name (or relative path).
    pub fn file(self, name: impl Into<PathBuf>) -> LoaderBuilder<WithFile> {
        LoaderBuilder {
            file: WithFile(name.into()),
            base_dir: self.base_dir,
            defaults: self.defaults,
            registry: self.registry,
        }
    }
}

impl LoaderBuilder<WithFile> {
    /// Resolves, materializes if needed, reads and parses the document.
    ///
    /// # Process
    /// 1. Joins the file name onto the base directory and makes the result absolute.
    /// 2. If nothing exists there, copies the bundled default of the same file name,
    ///    creating parent directories on the way.
    /// 3. Reads the full text and parses it.
    ///
    /// # Errors
    /// * [`ConfigError::ConfigNotFound`] if the file is missing and has no bundled default.
    /// * [`ConfigError::MalformedConfig`] if the document does not parse.
    /// * [`ConfigError::Io`] for any other filesystem failure.
    pub fn load(self) -> Result<ConfigurationLoader, ConfigError> {
        let name = self.file.0;
        let joined = self.base_dir.map_or_else(|| name.clone(), |base| base.join(&name));
        let path = std::path::absolute(&joined)
            .context(format!("Failed to resolve {}", joined.display()))?;

        if !path.exists() {
            materialize(&name, &path, self.defaults.as_ref())?;
        }

        let text =
            fs::read_to_string(&path).context(format!("Failed to read {}", path.display()))?;
        let document = ConfigDocument::parse(&text).context(path.display().to_string())?;

        debug!(path = %path.display(), "Configuration loaded");

        Ok(ConfigurationLoader {
            path,
            document,
            registry: self.registry.unwrap_or_else(|| AdapterRegistry::global().clone()),
        })
    }
}

fn materialize(
    name: &Path,
    target: &Path,
    defaults: &dyn DefaultSource,
) -> Result<(), ConfigError> {
    // Bundled resources are looked up by the relative name first, then by the bare file name.
    let relative = name.to_string_lossy().replace('\\', "/");
    let file_name = name.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

    let found = defaults
        .resource(&relative)
        .map(|contents| (relative.clone(), contents))
        .or_else(|| defaults.resource(&file_name).map(|contents| (file_name.clone(), contents)));

    let Some((resource_name, contents)) = found else {
        return Err(ConfigError::ConfigNotFound {
            message: format!(
                "{} does not exist and no bundled default `{file_name}` is available",
                target.display()
            )
            .into(),
            context: None,
        });
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .context(format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(target) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!(path = %target.display(), "Configuration appeared concurrently, keeping it");
            return Ok(());
        },
        Err(e) => {
            return Err(e)
                .context(format!("Failed to create default configuration {}", target.display()));
        },
    };
    file.write_all(contents.as_ref())
        .context(format!("Failed to write default configuration to {}", target.display()))?;

    info!(path = %target.display(), resource = %resource_name, "Materialized default configuration");
    Ok(())
}

/// Owns one parsed configuration document and serves typed, path-addressed reads from it.
///
/// # Example
/// ```rust
/// use lobby_config::{ConfigurationLoader, EmbeddedDefaults};
///
/// # let dir = tempfile::tempdir().unwrap();
/// static DEFAULTS: EmbeddedDefaults =
///     EmbeddedDefaults::new(&[("lobby.toml", "[app]\nname = \"Lobby\"\n")]);
///
/// let loader = ConfigurationLoader::builder()
///     .file("lobby.toml")
///     .base_dir(dir.path())
///     .defaults(DEFAULTS)
///     .load()
///     .unwrap();
///
/// assert_eq!(loader.get::<String>("app.name").unwrap(), "Lobby");
/// ```
#[derive(Debug)]
pub struct ConfigurationLoader {
    path: PathBuf,
    document: ConfigDocument,
    registry: AdapterRegistry,
}

impl ConfigurationLoader {
    #[must_use = "The builder must be configured before it can be used to load a document."]
    pub fn builder() -> LoaderBuilder {
        LoaderBuilder::default()
    }

    /// Loads `file` relative to `base_dir` without any bundled defaults.
    ///
    /// # Errors
    /// See [`LoaderBuilder::load`].
    pub fn open(file: impl Into<PathBuf>, base_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = Self::builder().file(file);
        match base_dir {
            Some(dir) => builder.base_dir(dir).load(),
            None => builder.load(),
        }
    }

    /// Absolute path the document was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn document(&self) -> &ConfigDocument {
        &self.document
    }

    #[must_use]
    pub const fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Returns the raw sub-tree at `path`.
    ///
    /// # Errors
    /// [`ConfigError::MissingKey`] if any segment is absent.
    pub fn get_raw(&self, path: &str) -> Result<&toml::Value, ConfigError> {
        self.document.get(path)
    }

    /// Reads `path` as `T` through the registered adapter for `T`.
    ///
    /// # Errors
    /// [`ConfigError::NoAdapter`], [`ConfigError::MissingKey`] or [`ConfigError::TypeMismatch`].
    pub fn get<T: Any + Send>(&self, path: &str) -> Result<T, ConfigError> {
        self.registry.lookup::<T>()?.extract(&self.document, path)
    }

    /// Reads `path` with an explicit adapter, bypassing the registry.
    ///
    /// # Errors
    /// Whatever the adapter raises.
    pub fn get_with<T: 'static>(
        &self,
        path: &str,
        adapter: &dyn ValueAdapter<T>,
    ) -> Result<T, ConfigError> {
        adapter.extract(&self.document, path)
    }

    /// Like [`Self::get`], but returns `fallback` when the key is absent.
    ///
    /// # Errors
    /// [`ConfigError::NoAdapter`] or [`ConfigError::TypeMismatch`].
    pub fn get_or<T: Any + Send>(&self, path: &str, fallback: T) -> Result<T, ConfigError> {
        match self.get(path) {
            Err(ConfigError::MissingKey { .. }) => Ok(fallback),
            other => other,
        }
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.document.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::EmbeddedDefaults;
    use tempfile::tempdir;

    static DEFAULTS: EmbeddedDefaults =
        EmbeddedDefaults::new(&[("nested.toml", "[app]\ntestString = \"Hello Toml\"\n")]);

    #[test]
    fn materializes_into_missing_directories() {
        let dir = tempdir().unwrap();
        let loader = ConfigurationLoader::builder()
            .file("conf/deeper/nested.toml")
            .base_dir(dir.path())
            .defaults(DEFAULTS)
            .load()
            .unwrap();

        assert!(loader.path().is_absolute());
        assert!(dir.path().join("conf/deeper/nested.toml").exists());
        assert_eq!(loader.get::<String>("app.testString").unwrap(), "Hello Toml");
    }

    #[test]
    fn materialize_never_truncates_an_existing_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested.toml");
        fs::write(&target, "[app]\ntestString = \"edited\"\n").unwrap();

        materialize(Path::new("nested.toml"), &target, &DEFAULTS).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "[app]\ntestString = \"edited\"\n");
    }

    #[test]
    fn get_or_only_falls_back_on_missing_keys() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("app.toml"), "name = \"x\"\n").unwrap();
        let loader = ConfigurationLoader::open("app.toml", Some(dir.path())).unwrap();

        assert_eq!(loader.get_or::<i32>("port", 25565).unwrap(), 25565);
        assert!(matches!(loader.get_or::<i32>("name", 1), Err(ConfigError::TypeMismatch { .. })));
    }

    #[test]
    fn malformed_documents_carry_the_path() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("broken.toml"), "[app\nname = 1").unwrap();
        let err = ConfigurationLoader::open("broken.toml", Some(dir.path())).unwrap_err();

        assert!(matches!(err, ConfigError::MalformedConfig { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }
}
