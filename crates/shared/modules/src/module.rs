use crate::error::ModuleError;
use std::fmt;

/// Stable identifier of a module. At most one module per id can be registered.
///
/// ```rust
/// use lobby_modules::ModuleId;
///
/// const WORLD: ModuleId = ModuleId::new("world");
/// assert_eq!(WORLD.as_str(), "world");
/// assert_eq!(WORLD.to_string(), "world");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(&'static str);

impl ModuleId {
    #[must_use]
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl From<&'static str> for ModuleId {
    fn from(id: &'static str) -> Self {
        Self(id)
    }
}

/// A subsystem with a lifecycle driven by [`crate::ModuleManager`].
///
/// Only [`Module::id`] and [`Module::enable`] are required; the remaining hooks default to
/// no dependencies, no-op teardown and reload, and always-ready.
///
/// # Example
/// ```rust
/// use lobby_modules::{Module, ModuleError, ModuleId};
///
/// #[derive(Debug, Default)]
/// struct Scoreboard {
///     enabled: bool,
/// }
///
/// impl Module for Scoreboard {
///     fn id(&self) -> ModuleId {
///         ModuleId::new("scoreboard")
///     }
///
///     fn dependencies(&self) -> Vec<ModuleId> {
///         vec![ModuleId::new("world")]
///     }
///
///     fn enable(&mut self) -> Result<(), ModuleError> {
///         self.enabled = true;
///         Ok(())
///     }
///
///     fn is_ready(&self) -> bool {
///         self.enabled
///     }
/// }
/// ```
pub trait Module: fmt::Debug + Send {
    fn id(&self) -> ModuleId;

    /// Modules that must be enabled before this one.
    fn dependencies(&self) -> Vec<ModuleId> {
        Vec::new()
    }

    /// Called once, after every dependency has been enabled.
    ///
    /// # Errors
    /// Any error aborts the activation pass; the module stays inactive.
    fn enable(&mut self) -> Result<(), ModuleError>;

    /// Called once on shutdown, in reverse activation order.
    ///
    /// # Errors
    /// Errors are logged; shutdown of the remaining modules continues.
    fn disable(&mut self) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Re-reads whatever state the module derives from configuration.
    ///
    /// # Errors
    /// Propagated to the caller of [`crate::ModuleManager::reload`].
    fn reload(&mut self) -> Result<(), ModuleError> {
        Ok(())
    }

    fn is_ready(&self) -> bool {
        true
    }
}
