//! Value adapters: converters from a document node to a concrete Rust type.

use crate::document::{ConfigDocument, kind_of};
use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use toml::Value;

/// Extracts a `T` from the document at a dotted path.
///
/// Adapters are stateless and shared by every caller. Plain functions and closures with
/// the matching signature are adapters too:
///
/// ```rust
/// use lobby_config::{AdapterRegistry, ConfigDocument, ConfigError};
///
/// #[derive(Debug, PartialEq)]
/// struct Port(u16);
///
/// let registry = AdapterRegistry::new();
/// registry.register(|doc: &ConfigDocument, path: &str| -> Result<Port, ConfigError> {
///     let raw: i64 = doc.get(path)?.as_integer().unwrap_or_default();
///     Ok(Port(u16::try_from(raw).unwrap_or_default()))
/// });
///
/// let doc = ConfigDocument::parse("port = 25565").unwrap();
/// assert_eq!(registry.lookup::<Port>().unwrap().extract(&doc, "port").unwrap(), Port(25565));
/// ```
pub trait ValueAdapter<T>: Send + Sync + 'static {
    /// # Errors
    /// [`ConfigError::MissingKey`] if the path is absent, [`ConfigError::TypeMismatch`] if the
    /// stored value cannot be converted.
    fn extract(&self, document: &ConfigDocument, path: &str) -> Result<T, ConfigError>;
}

impl<T, F> ValueAdapter<T> for F
where
    F: Fn(&ConfigDocument, &str) -> Result<T, ConfigError> + Send + Sync + 'static,
{
    fn extract(&self, document: &ConfigDocument, path: &str) -> Result<T, ConfigError> {
        self(document, path)
    }
}

/// Reads string leaves. Numbers and booleans are rendered to text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringAdapter;

impl ValueAdapter<String> for StringAdapter {
    fn extract(&self, document: &ConfigDocument, path: &str) -> Result<String, ConfigError> {
        match document.get(path)? {
            Value::String(s) => Ok(s.clone()),
            Value::Integer(i) => Ok(i.to_string()),
            Value::Float(f) => Ok(f.to_string()),
            Value::Boolean(b) => Ok(b.to_string()),
            other => Err(ConfigError::type_mismatch(path, "string", kind_of(other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolAdapter;

impl ValueAdapter<bool> for BoolAdapter {
    fn extract(&self, document: &ConfigDocument, path: &str) -> Result<bool, ConfigError> {
        match document.get(path)? {
            Value::Boolean(b) => Ok(*b),
            other => Err(ConfigError::type_mismatch(path, "boolean", kind_of(other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct I64Adapter;

impl ValueAdapter<i64> for I64Adapter {
    fn extract(&self, document: &ConfigDocument, path: &str) -> Result<i64, ConfigError> {
        match document.get(path)? {
            Value::Integer(i) => Ok(*i),
            other => Err(ConfigError::type_mismatch(path, "integer", kind_of(other))),
        }
    }
}

/// Reads 32-bit integers; values outside the `i32` range are a type mismatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct I32Adapter;

impl ValueAdapter<i32> for I32Adapter {
    fn extract(&self, document: &ConfigDocument, path: &str) -> Result<i32, ConfigError> {
        let wide = I64Adapter.extract(document, path)?;
        i32::try_from(wide).map_err(|_| {
            ConfigError::type_mismatch(path, "32-bit integer", &format!("out-of-range integer {wide}"))
        })
    }
}

/// Reads floats; integer leaves are widened.
#[derive(Debug, Clone, Copy, Default)]
pub struct F64Adapter;

impl ValueAdapter<f64> for F64Adapter {
    #[allow(clippy::cast_precision_loss)]
    fn extract(&self, document: &ConfigDocument, path: &str) -> Result<f64, ConfigError> {
        match document.get(path)? {
            Value::Float(f) => Ok(*f),
            Value::Integer(i) => Ok(*i as f64),
            other => Err(ConfigError::type_mismatch(path, "float", kind_of(other))),
        }
    }
}

/// Deserializes the whole sub-tree at a path into any serde type.
///
/// Useful for registering structured custom types:
///
/// ```rust
/// use lobby_config::{AdapterRegistry, SerdeAdapter};
///
/// #[derive(Debug, serde::Deserialize)]
/// struct Position { x: f64, y: f64, z: f64 }
///
/// AdapterRegistry::new().register(SerdeAdapter::<Position>::new());
/// ```
pub struct SerdeAdapter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeAdapter<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<T> Default for SerdeAdapter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SerdeAdapter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerdeAdapter").field("target", &std::any::type_name::<T>()).finish()
    }
}

impl<T: DeserializeOwned + 'static> ValueAdapter<T> for SerdeAdapter<T> {
    fn extract(&self, document: &ConfigDocument, path: &str) -> Result<T, ConfigError> {
        let node = document.get(path)?;
        node.clone().try_into::<T>().map_err(|e| ConfigError::TypeMismatch {
            message: format!("`{path}` cannot be read as {}: {e}", std::any::type_name::<T>())
                .into(),
            context: None,
        })
    }
}
