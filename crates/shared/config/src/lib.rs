//! # Config
//!
//! Loads the platform's configuration document and binds its values into typed fields.
//!
//! * [`ConfigurationLoader`] resolves a TOML file, copying a bundled default into place
//!   when it is missing, and serves path-addressed reads (`"server.port"`).
//! * [`AdapterRegistry`] maps a Rust type to the [`ValueAdapter`] that converts a document
//!   node into it. Built-ins cover `String`, `bool`, `i64`, `f64` and `i32`; anything else can
//!   be registered at runtime.
//! * [`ConfigurationInjector`] fills every `#[value("...")]` field of [`Configurable`] structs,
//!   skipping and logging per-field problems instead of failing.
//!
//! ## Example
//!
//! ```rust
//! use lobby_config::{Configurable, ConfigurationInjector, ConfigurationLoader, EmbeddedDefaults};
//!
//! static DEFAULTS: EmbeddedDefaults = EmbeddedDefaults::new(&[(
//!     "lobby.toml",
//!     "[menu]\nanimation_duration = 40\ntarget_server = \"survival\"\n",
//! )]);
//!
//! #[derive(Debug, Default, Configurable)]
//! struct MenuSettings {
//!     #[value("menu.animation_duration")]
//!     animation_duration: i32,
//!     #[value("menu.target_server")]
//!     target_server: String,
//! }
//!
//! # let dir = tempfile::tempdir().unwrap();
//! let loader = ConfigurationLoader::builder()
//!     .file("lobby.toml")
//!     .base_dir(dir.path())
//!     .defaults(DEFAULTS)
//!     .load()
//!     .unwrap();
//!
//! let mut menu = MenuSettings::default();
//! let report = ConfigurationInjector::new(&loader).inject(&mut menu);
//!
//! assert!(report.is_clean());
//! assert_eq!(menu.target_server, "survival");
//! ```

mod adapter;
mod binding;
mod defaults;
mod document;
mod error;
mod injector;
mod loader;
mod registry;

pub use crate::adapter::{
    BoolAdapter, F64Adapter, I32Adapter, I64Adapter, SerdeAdapter, StringAdapter, ValueAdapter,
};
pub use crate::binding::{Binding, Configurable};
pub use crate::defaults::{DefaultSource, DirectoryDefaults, EmbeddedDefaults, NoDefaults};
pub use crate::document::{ConfigDocument, PATH_SEPARATOR};
pub use crate::error::{ConfigError, ConfigErrorExt};
pub use crate::injector::{
    ConfigScope, ConfigurationInjector, FieldOutcome, FieldRef, FieldReport, InjectTarget,
    InjectionReport,
};
pub use crate::loader::{ConfigurationLoader, LoaderBuilder, NoFile, WithFile};
pub use crate::registry::{AdapterRegistry, ValueType};
pub use lobby_derive::Configurable;
pub use toml::Value;
