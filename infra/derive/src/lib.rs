#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the platform. `lobby-config` re-exports `Configurable`
//! next to the trait it implements; `lobby_error` is used directly by the
//! error modules of every crate.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derives `lobby_config::Configurable`, turning `#[value("...")]` markers into bindings.
///
/// Every field carrying the marker receives the configuration value stored under the given
/// dotted key when the struct is passed to the injector. Fields without the marker are ignored.
///
/// # Markers
///
/// * `#[value("menu.target_server")]` - writable binding.
/// * `#[value("menu.version", read_only)]` - declared, but never reassigned; the injector
///   skips it with a warning.
///
/// The generated impl names `lobby-config` when the deriving crate depends on it directly and
/// falls back to `lobby::config` for crates that only use the facade.
///
/// # Errors
/// Emits a compile-time error for enums, tuple structs, unknown marker options, repeated
/// markers, or keys with empty segments (`"menu..target"`).
///
/// # Example
///
/// ```rust,ignore
/// use lobby_config::Configurable;
///
/// #[derive(Debug, Default, Configurable)]
/// pub struct MenuSettings {
///     #[value("menu.animation_duration")]
///     pub animation_duration: i32,
///     #[value("menu.target_server")]
///     pub target_server: String,
///     #[value("menu.schema", read_only)]
///     pub schema: i64,
/// }
/// ```
#[proc_macro_derive(Configurable, attributes(value))]
pub fn derive_configurable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    macros::configurable::expand_derive(input).into()
}

/// Turns an enum into the platform's error type.
///
/// * Derives `Debug` and `thiserror::Error` unless already derived.
/// * Emits a `Result<T, E = Self>` alias in the same module.
/// * Emits a `<Name>Ext` trait whose `.context(..)` fills the `context` field, implemented for
///   `Result<T, Name>` and for `Result<T, Source>` of every variant with a source field.
/// * Implements `From<Source>` for those variants, so `?` converts upstream errors.
/// * Implements `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * Provides the `format_context` helper used in `#[error(...)]` messages.
///
/// # Requirements
/// Every variant has named fields. Variants with a `source` field (or a field marked
/// `#[source]` / `#[from]`) also carry `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[lobby_derive::lobby_error]
/// pub enum StoreError {
///     #[error("I/O error{}: {source}", format_context(.context))]
///     Io {
///         #[source]
///         source: std::io::Error,
///         context: Option<Cow<'static, str>>,
///     },
///
///     #[error("Internal store error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &str) -> Result<String> {
///     std::fs::read_to_string(path).context("Reading the store")
/// }
/// ```
#[proc_macro_attribute]
pub fn lobby_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_error(input).into()
}
