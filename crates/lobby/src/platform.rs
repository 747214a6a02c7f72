use crate::error::PlatformError;
use lobby_config::{
    ConfigScope, Configurable, ConfigurationInjector, ConfigurationLoader, DefaultSource,
    InjectionReport,
};
use lobby_modules::{Module, ModuleId, ModuleManager};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Bootstrap context: one loaded configuration document plus the modules that run on it.
///
/// # Example
/// ```rust
/// use lobby::prelude::*;
///
/// #[derive(Debug, Default, Configurable)]
/// struct Motd {
///     #[value("server.motd")]
///     text: String,
/// }
///
/// static DEFAULTS: EmbeddedDefaults =
///     EmbeddedDefaults::new(&[("lobby.toml", "[server]\nmotd = \"Welcome\"\n")]);
///
/// # let dir = tempfile::tempdir().unwrap();
/// let mut platform = Platform::load("lobby.toml", Some(dir.path()), DEFAULTS).unwrap();
///
/// let mut motd = Motd::default();
/// assert!(platform.inject(&mut motd).is_clean());
/// assert_eq!(motd.text, "Welcome");
///
/// platform.start().unwrap();
/// platform.shutdown();
/// ```
#[derive(Debug)]
pub struct Platform {
    loader: ConfigurationLoader,
    modules: ModuleManager,
}

impl Platform {
    /// Wraps an already loaded document.
    #[must_use]
    pub fn new(loader: ConfigurationLoader) -> Self {
        Self { loader, modules: ModuleManager::new() }
    }

    /// Loads `file` relative to `base_dir`, materializing it from `defaults` when missing.
    ///
    /// # Errors
    /// [`PlatformError::Config`] if the document cannot be found, materialized or parsed.
    pub fn load(
        file: impl Into<PathBuf>,
        base_dir: Option<&Path>,
        defaults: impl DefaultSource + 'static,
    ) -> Result<Self, PlatformError> {
        let builder = ConfigurationLoader::builder().file(file).defaults(defaults);
        let loader = match base_dir {
            Some(dir) => builder.base_dir(dir).load()?,
            None => builder.load()?,
        };
        Ok(Self::new(loader))
    }

    #[must_use]
    pub const fn loader(&self) -> &ConfigurationLoader {
        &self.loader
    }

    #[must_use]
    pub const fn modules(&self) -> &ModuleManager {
        &self.modules
    }

    pub const fn modules_mut(&mut self) -> &mut ModuleManager {
        &mut self.modules
    }

    /// Injects configuration into a single target.
    pub fn inject<S: Configurable>(&self, target: &mut S) -> InjectionReport {
        ConfigurationInjector::new(&self.loader).inject(target)
    }

    /// Injects configuration into every target of `scope`.
    pub fn configure(&self, scope: ConfigScope<'_>) -> InjectionReport {
        ConfigurationInjector::new(&self.loader).configure(scope)
    }

    /// # Errors
    /// [`PlatformError::Module`] if a module with the same id is already registered.
    pub fn register(&mut self, module: impl Module + 'static) -> Result<&mut Self, PlatformError> {
        self.modules.register_module(module)?;
        Ok(self)
    }

    /// Enables every registered module in dependency order.
    ///
    /// # Errors
    /// [`PlatformError::Module`] for missing dependencies, cycles or failing hooks.
    pub fn start(&mut self) -> Result<(), PlatformError> {
        self.modules.activate_all()?;

        let pending: Vec<ModuleId> =
            self.modules.ids().filter(|&id| !self.modules.is_ready(id)).collect();
        if pending.is_empty() {
            info!(
                modules = self.modules.len(),
                config = %self.loader.path().display(),
                "Platform started"
            );
        } else {
            warn!(?pending, "Platform started, some modules are not ready");
        }
        Ok(())
    }

    /// Disables every active module in reverse activation order.
    pub fn shutdown(&mut self) {
        self.modules.deactivate_all();
        info!("Platform stopped");
    }

    /// Reloads one active module.
    ///
    /// # Errors
    /// [`PlatformError::Module`] if the module is unknown, inactive, or its hook fails.
    pub fn reload(&mut self, id: impl Into<ModuleId>) -> Result<(), PlatformError> {
        Ok(self.modules.reload(id)?)
    }
}
