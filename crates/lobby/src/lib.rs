//! Facade crate for the lobby platform.
//! Re-exports the configuration and module crates and ties them together in [`Platform`].
//! Keep this crate thin: it composes other crates, it does not implement their logic.
//!
//! ## Usage
//! 1. Load the configuration document with [`Platform::load`] (or hand over a loader).
//! 2. Inject settings with [`Platform::inject`] / [`Platform::configure`].
//! 3. Register modules, which may capture the injected settings.
//! 4. [`Platform::start`] enables every module in dependency order; [`Platform::shutdown`]
//!    disables them in reverse.

mod error;
mod platform;

pub use crate::error::PlatformError;
pub use crate::platform::Platform;
pub use lobby_config as config;
#[cfg(feature = "logger")]
pub use lobby_logger as logger;
pub use lobby_modules as modules;

/// The names most applications need.
pub mod prelude {
    pub use crate::{Platform, PlatformError};
    pub use lobby_config::{
        AdapterRegistry, ConfigError, ConfigScope, Configurable, ConfigurationInjector,
        ConfigurationLoader, EmbeddedDefaults, InjectionReport, SerdeAdapter,
    };
    pub use lobby_modules::{Module, ModuleError, ModuleId, ModuleManager};
}
