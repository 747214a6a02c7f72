//! Declarative bindings between struct fields and configuration keys.

use crate::registry::ValueType;
use std::any::Any;
use std::fmt;

type Setter<S> = Box<dyn Fn(&mut S, Box<dyn Any + Send>) -> Result<(), SetError> + Send + Sync>;

/// The resolved value did not have the binding's declared type.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SetError {
    pub(crate) expected: &'static str,
}

/// Associates one field of `S` with the dotted configuration key it receives.
///
/// Bindings are usually generated by `#[derive(Configurable)]`, but can be written by hand:
///
/// ```rust
/// use lobby_config::{Binding, Configurable};
///
/// #[derive(Default)]
/// struct Server {
///     port: i32,
///     motd: String,
/// }
///
/// impl Configurable for Server {
///     fn bindings() -> Vec<Binding<Self>> {
///         vec![
///             Binding::new("port", "server.port", |s: &mut Self, v: i32| s.port = v),
///             Binding::read_only::<String>("motd", "server.motd"),
///         ]
///     }
/// }
///
/// assert_eq!(Server::bindings().len(), 2);
/// ```
pub struct Binding<S> {
    field: &'static str,
    key: &'static str,
    value_type: ValueType,
    setter: Option<Setter<S>>,
}

impl<S: 'static> Binding<S> {
    /// A writable binding; `set` receives the converted value.
    pub fn new<T: Any + Send>(field: &'static str, key: &'static str, set: fn(&mut S, T)) -> Self {
        let setter: Setter<S> = Box::new(move |target, value| {
            let value = value
                .downcast::<T>()
                .map_err(|_| SetError { expected: std::any::type_name::<T>() })?;
            set(target, *value);
            Ok(())
        });

        Self { field, key, value_type: ValueType::of::<T>(), setter: Some(setter) }
    }

    /// A binding whose field can never be reassigned. The injector skips it.
    #[must_use]
    pub fn read_only<T: Any>(field: &'static str, key: &'static str) -> Self {
        Self { field, key, value_type: ValueType::of::<T>(), setter: None }
    }

    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    #[must_use]
    pub const fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    pub(crate) fn apply(&self, target: &mut S, value: Box<dyn Any + Send>) -> Result<(), SetError> {
        match &self.setter {
            Some(set) => set(target, value),
            None => Ok(()),
        }
    }
}

impl<S: 'static> fmt::Debug for Binding<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("field", &self.field)
            .field("key", &self.key)
            .field("value_type", &self.value_type.name())
            .field("writable", &self.is_writable())
            .finish()
    }
}

/// A struct whose fields are populated from the configuration document.
///
/// Derive it with `#[derive(Configurable)]` and mark fields with `#[value("dotted.key")]`
/// (or `#[value("dotted.key", read_only)]`); unmarked fields are left alone.
pub trait Configurable: Send + 'static {
    fn bindings() -> Vec<Binding<Self>>
    where
        Self: Sized;

    /// Name used to identify the declaring scope in logs and reports.
    #[must_use]
    fn scope_name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }
}
