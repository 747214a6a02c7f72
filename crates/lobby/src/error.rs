use lobby_config::ConfigError;
use lobby_modules::ModuleError;

/// Errors raised while bootstrapping the platform.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Module(#[from] ModuleError),
}
