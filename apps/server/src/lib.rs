//! # Lobby Server
//!
//! Boots the lobby: loads `lobby.toml` (copying the bundled default on first start), binds the
//! typed settings, and enables the world and player-menu modules in dependency order.
//!
//! ## Example
//! ```no_run
//! use lobby_server::Server;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder().base_dir("/srv/lobby").build()?.run().await
//! }
//! ```

pub mod modules;
pub mod settings;

use anyhow::{Context, Result};
use lobby::Platform;
use lobby::config::{AdapterRegistry, EmbeddedDefaults};
use lobby::logger::LoggingSettings;
use modules::{PlayerMenuModule, WorldModule};
use settings::{MenuSettings, WorldSettings};
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info, warn};

/// Name of the configuration file, relative to the configuration directory.
pub const CONFIG_FILE: &str = "lobby.toml";

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "LOBBY_CONFIG_DIR";

/// Bundled defaults, copied next to the binary's working directory on first start.
pub static DEFAULTS: EmbeddedDefaults =
    EmbeddedDefaults::new(&[(CONFIG_FILE, include_str!("../resources/lobby.toml"))]);

/// The configuration directory: `$LOBBY_CONFIG_DIR`, or the working directory.
#[must_use]
pub fn config_dir() -> PathBuf {
    std::env::var_os(CONFIG_DIR_ENV).map_or_else(|| PathBuf::from("."), PathBuf::from)
}

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug)]
pub struct ServerBuilder {
    base_dir: PathBuf,
    file: PathBuf,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self { base_dir: config_dir(), file: PathBuf::from(CONFIG_FILE) }
    }
}

impl ServerBuilder {
    /// Directory holding the configuration file.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Configuration file name, relative to the base directory.
    pub fn file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = file.into();
        self
    }

    /// Consumes the builder and prepares the platform.
    ///
    /// # Process
    /// 1. Registers the adapters for the lobby's value types.
    /// 2. Loads the configuration, materializing the bundled default if it is missing.
    /// 3. Injects logging, world and menu settings.
    /// 4. Registers the world and player-menu modules.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be loaded or a module cannot be registered.
    pub fn build(self) -> Result<Server> {
        settings::register_adapters(AdapterRegistry::global());

        let mut platform = Platform::load(&self.file, Some(&self.base_dir), DEFAULTS)
            .context("Critical: Configuration could not be loaded")?;

        let mut logging = LoggingSettings::default();
        let mut world = WorldSettings::default();
        let mut menu = MenuSettings::default();
        let failed: usize = [
            platform.inject(&mut logging),
            platform.inject(&mut world),
            platform.inject(&mut menu),
        ]
        .iter()
        .map(|report| report.failures().count())
        .sum();

        platform
            .register(WorldModule::new(world))?
            .register(PlayerMenuModule::new(menu))?;

        Ok(Server { platform, logging, base_dir: self.base_dir, failed })
    }
}

/// A configured lobby, ready to start its modules.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    platform: Platform,
    logging: LoggingSettings,
    base_dir: PathBuf,
    failed: usize,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Number of bound fields that kept their defaults because their key was missing or unreadable.
    #[must_use]
    pub const fn failed_settings(&self) -> usize {
        self.failed
    }

    /// Logging settings read from the `[logging]` table.
    #[must_use]
    pub const fn logging(&self) -> &LoggingSettings {
        &self.logging
    }

    /// Directory relative log paths are resolved against.
    #[must_use]
    pub fn base_dir(&self) -> &std::path::Path {
        &self.base_dir
    }

    #[must_use]
    pub const fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Enables every module in dependency order.
    ///
    /// # Errors
    /// Returns an error for missing dependencies, cycles or failing module hooks.
    pub fn start(&mut self) -> Result<()> {
        self.platform.start().context("Platform bootstrap failed")
    }

    /// Disables every module in reverse activation order.
    pub fn stop(&mut self) {
        self.platform.shutdown();
    }

    /// Starts the modules and runs until a shutdown signal is received.
    ///
    /// # Errors
    /// Returns an error if the modules cannot be started.
    pub async fn run(mut self) -> Result<()> {
        if self.failed > 0 {
            warn!(fields = self.failed, "Some settings were missing or unreadable and kept their defaults");
        }
        self.start()?;
        info!(config = %self.platform.loader().path().display(), "Lobby is running");

        if let Err(e) = shutdown_signal().await {
            error!("Error while waiting for shutdown signal: {e}");
        }

        info!("Shutdown signal received, stopping modules...");
        self.stop();
        Ok(())
    }
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res?,
        res = terminate => res?,
    }

    Ok(())
}
