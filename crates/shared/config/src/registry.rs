//! Type-indexed adapter registry.

use crate::adapter::{BoolAdapter, F64Adapter, I32Adapter, I64Adapter, StringAdapter, ValueAdapter};
use crate::document::ConfigDocument;
use crate::error::ConfigError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::{Arc, LazyLock};
use tracing::trace;

static GLOBAL: LazyLock<AdapterRegistry> = LazyLock::new(AdapterRegistry::new);

/// Runtime descriptor of a value type: its [`TypeId`] plus a readable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueType {
    id: TypeId,
    name: &'static str,
}

impl ValueType {
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self { id: TypeId::of::<T>(), name: std::any::type_name::<T>() }
    }

    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Produces type-erased values so bindings can be resolved without knowing `T` statically.
trait ErasedAdapter: Send + Sync {
    fn extract_any(
        &self,
        document: &ConfigDocument,
        path: &str,
    ) -> Result<Box<dyn Any + Send>, ConfigError>;
}

struct Erased<T>(Arc<dyn ValueAdapter<T>>);

impl<T: Any + Send> ErasedAdapter for Erased<T> {
    fn extract_any(
        &self,
        document: &ConfigDocument,
        path: &str,
    ) -> Result<Box<dyn Any + Send>, ConfigError> {
        self.0.extract(document, path).map(|value| Box::new(value) as Box<dyn Any + Send>)
    }
}

struct AdapterEntry {
    name: &'static str,
    /// Holds an `Arc<dyn ValueAdapter<T>>` for the entry's `T`.
    typed: Box<dyn Any + Send + Sync>,
    erased: Arc<dyn ErasedAdapter>,
}

impl fmt::Debug for AdapterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterEntry").field("type", &self.name).finish_non_exhaustive()
    }
}

/// Maps value types to the adapter that extracts them from a [`ConfigDocument`].
///
/// Cloning is cheap and every clone shares the same table. Registration and lookup are
/// safe from any thread; a later registration for the same type replaces the earlier one.
///
/// # Example
/// ```rust
/// use lobby_config::{AdapterRegistry, ConfigDocument};
///
/// let registry = AdapterRegistry::new();
/// let doc = ConfigDocument::parse("[server]\nport = 8080").unwrap();
/// let port = registry.lookup::<i32>().unwrap().extract(&doc, "server.port").unwrap();
/// assert_eq!(port, 8080);
/// ```
#[derive(Debug, Clone)]
pub struct AdapterRegistry {
    adapters: Arc<RwLock<FxHashMap<TypeId, AdapterEntry>>>,
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AdapterRegistry {
    /// Creates a registry holding the built-in adapters for
    /// `String`, `bool`, `i64`, `f64` and `i32`.
    #[must_use]
    pub fn new() -> Self {
        let registry = Self::empty();
        registry.register::<String>(StringAdapter);
        registry.register::<bool>(BoolAdapter);
        registry.register::<i64>(I64Adapter);
        registry.register::<f64>(F64Adapter);
        registry.register::<i32>(I32Adapter);
        registry
    }

    /// Creates a registry with no adapters at all.
    #[must_use]
    pub fn empty() -> Self {
        Self { adapters: Arc::new(RwLock::new(FxHashMap::default())) }
    }

    /// The process-wide registry, populated with the built-ins on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Stores `adapter` as the converter for `T`, replacing any previous one.
    pub fn register<T: Any + Send>(&self, adapter: impl ValueAdapter<T>) {
        let adapter: Arc<dyn ValueAdapter<T>> = Arc::new(adapter);
        let entry = AdapterEntry {
            name: std::any::type_name::<T>(),
            typed: Box::new(Arc::clone(&adapter)),
            erased: Arc::new(Erased(adapter)),
        };

        let replaced = self.adapters.write().insert(TypeId::of::<T>(), entry).is_some();
        trace!(value_type = std::any::type_name::<T>(), replaced, "Registered configuration adapter");
    }

    /// Returns the adapter registered for `T`.
    ///
    /// # Errors
    /// Returns [`ConfigError::NoAdapter`] if nothing is registered for `T`.
    pub fn lookup<T: Any + Send>(&self) -> Result<Arc<dyn ValueAdapter<T>>, ConfigError> {
        let adapters = self.adapters.read();
        adapters
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.typed.downcast_ref::<Arc<dyn ValueAdapter<T>>>())
            .cloned()
            .ok_or_else(|| ConfigError::no_adapter(std::any::type_name::<T>()))
    }

    /// Extracts a value of the runtime type `ty` as a boxed [`Any`].
    ///
    /// The box always holds exactly the type described by `ty`.
    ///
    /// # Errors
    /// [`ConfigError::NoAdapter`] if `ty` has no adapter, otherwise whatever the adapter raises.
    pub fn extract_dyn(
        &self,
        ty: ValueType,
        document: &ConfigDocument,
        path: &str,
    ) -> Result<Box<dyn Any + Send>, ConfigError> {
        let adapter = self
            .adapters
            .read()
            .get(&ty.id())
            .map(|entry| Arc::clone(&entry.erased))
            .ok_or_else(|| ConfigError::no_adapter(ty.name()))?;

        adapter.extract_any(document, path)
    }

    #[must_use]
    pub fn contains<T: Any>(&self) -> bool {
        self.contains_type(ValueType::of::<T>())
    }

    #[must_use]
    pub fn contains_type(&self, ty: ValueType) -> bool {
        self.adapters.read().contains_key(&ty.id())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.read().is_empty()
    }
}
