//! Best-effort population of [`Configurable`] targets from a loaded document.

use crate::binding::{Binding, Configurable};
use crate::error::ConfigError;
use crate::loader::ConfigurationLoader;
use parking_lot::RwLock;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use tracing::{debug, warn};

/// Identity of a bound field: declaring scope plus field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub scope: &'static str,
    pub field: &'static str,
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.scope, self.field)
    }
}

/// What happened to a single binding.
#[derive(Debug)]
pub enum FieldOutcome {
    /// The converted value was assigned.
    Injected,
    /// The field is read-only and was left untouched.
    ReadOnly,
    /// The value could not be resolved; the field was left untouched.
    Failed(ConfigError),
}

#[derive(Debug)]
pub struct FieldReport {
    pub field: FieldRef,
    pub key: &'static str,
    pub outcome: FieldOutcome,
}

/// Per-field results of an injection pass.
#[derive(Debug, Default)]
pub struct InjectionReport {
    outcomes: Vec<FieldReport>,
}

impl InjectionReport {
    #[must_use]
    pub fn outcomes(&self) -> &[FieldReport] {
        &self.outcomes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of fields that received a value.
    #[must_use]
    pub fn injected(&self) -> usize {
        self.outcomes.iter().filter(|r| matches!(r.outcome, FieldOutcome::Injected)).count()
    }

    /// Number of fields left untouched, for any reason.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.len() - self.injected()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&FieldReport, &ConfigError)> {
        self.outcomes.iter().filter_map(|r| match &r.outcome {
            FieldOutcome::Failed(err) => Some((r, err)),
            _ => None,
        })
    }

    /// The report for one field, if it was part of the pass.
    #[must_use]
    pub fn get(&self, scope: &str, field: &str) -> Option<&FieldReport> {
        self.outcomes.iter().find(|r| r.field.scope == scope && r.field.field == field)
    }

    /// `true` when no binding failed. Read-only skips do not count as failures.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }

    fn extend(&mut self, other: Self) {
        self.outcomes.extend(other.outcomes);
    }
}

/// A target the injector can write into.
pub trait InjectTarget: Send {
    fn inject_into(&mut self, injector: &ConfigurationInjector<'_>) -> InjectionReport;
}

impl<S: Configurable> InjectTarget for &mut S {
    fn inject_into(&mut self, injector: &ConfigurationInjector<'_>) -> InjectionReport {
        let bindings = S::bindings();
        let resolved = injector.resolve(&bindings);
        apply(&bindings, &mut **self, resolved)
    }
}

/// Process-wide storage, e.g. a `static SETTINGS: LazyLock<RwLock<Settings>>`.
///
/// The write lock is taken once, after every value has been resolved.
impl<S: Configurable + Sync> InjectTarget for &RwLock<S> {
    fn inject_into(&mut self, injector: &ConfigurationInjector<'_>) -> InjectionReport {
        let bindings = S::bindings();
        let resolved = injector.resolve(&bindings);
        let mut guard = self.write();
        apply(&bindings, &mut *guard, resolved)
    }
}

/// A named group of targets handed to [`ConfigurationInjector::configure`].
#[derive(Default)]
pub struct ConfigScope<'a> {
    name: Cow<'static, str>,
    targets: Vec<Box<dyn InjectTarget + 'a>>,
}

impl fmt::Debug for ConfigScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigScope")
            .field("name", &self.name)
            .field("targets", &self.targets.len())
            .finish()
    }
}

impl<'a> ConfigScope<'a> {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into(), targets: Vec::new() }
    }

    /// Adds an owned target.
    #[must_use]
    pub fn target<S: Configurable>(mut self, target: &'a mut S) -> Self {
        self.targets.push(Box::new(target));
        self
    }

    /// Adds a lock-guarded, process-wide target.
    #[must_use]
    pub fn shared<S: Configurable + Sync>(mut self, target: &'a RwLock<S>) -> Self {
        self.targets.push(Box::new(target));
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Writes configuration values into bound fields.
///
/// Every per-field problem (read-only field, missing adapter, missing key, wrong type)
/// is logged and recorded in the returned [`InjectionReport`]; injection itself never fails.
///
/// # Example
/// ```rust
/// use lobby_config::{Configurable, ConfigurationInjector, ConfigurationLoader};
///
/// #[derive(Debug, Default, Configurable)]
/// struct Server {
///     #[value("server.port")]
///     port: i32,
///     #[value("server.motd")]
///     motd: String,
/// }
///
/// # let dir = tempfile::tempdir().unwrap();
/// # std::fs::write(dir.path().join("lobby.toml"), "[server]\nport = 25565\n").unwrap();
/// let loader = ConfigurationLoader::open("lobby.toml", Some(dir.path())).unwrap();
/// let mut server = Server::default();
///
/// let report = ConfigurationInjector::new(&loader).inject(&mut server);
///
/// assert_eq!(server.port, 25565);
/// assert_eq!(report.injected(), 1);
/// assert!(!report.is_clean()); // `server.motd` is missing
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ConfigurationInjector<'l> {
    loader: &'l ConfigurationLoader,
}

impl<'l> ConfigurationInjector<'l> {
    #[must_use]
    pub const fn new(loader: &'l ConfigurationLoader) -> Self {
        Self { loader }
    }

    /// Populates a single target.
    pub fn inject<S: Configurable>(&self, target: &mut S) -> InjectionReport {
        self.configure(ConfigScope::new(S::scope_name()).target(target))
    }

    /// Populates every target of `scope`.
    pub fn configure(&self, scope: ConfigScope<'_>) -> InjectionReport {
        let ConfigScope { name, targets } = scope;
        let mut report = InjectionReport::default();

        for mut target in targets {
            report.extend(target.inject_into(self));
        }

        if report.is_empty() {
            debug!(scope = %name, "No bound fields found");
        } else {
            debug!(
                scope = %name,
                fields = report.len(),
                injected = report.injected(),
                skipped = report.skipped(),
                "Configuration injected"
            );
        }

        report
    }

    fn resolve<S: Configurable>(&self, bindings: &[Binding<S>]) -> Vec<Resolved> {
        let registry = self.loader.registry();
        let document = self.loader.document();

        bindings
            .iter()
            .map(|binding| {
                if !binding.is_writable() {
                    return Resolved::ReadOnly;
                }
                match registry.extract_dyn(binding.value_type(), document, binding.key()) {
                    Ok(value) => Resolved::Value(value),
                    Err(err) => Resolved::Failed(err),
                }
            })
            .collect()
    }
}

enum Resolved {
    Value(Box<dyn Any + Send>),
    ReadOnly,
    Failed(ConfigError),
}

fn apply<S: Configurable>(
    bindings: &[Binding<S>],
    target: &mut S,
    resolved: Vec<Resolved>,
) -> InjectionReport {
    let scope = S::scope_name();
    let outcomes = bindings
        .iter()
        .zip(resolved)
        .map(|(binding, resolved)| {
            let field = FieldRef { scope, field: binding.field() };
            let key = binding.key();

            let outcome = match resolved {
                Resolved::ReadOnly => {
                    warn!(field = %field, key, "Cannot inject into read-only field, skipping");
                    FieldOutcome::ReadOnly
                },
                Resolved::Failed(err) => {
                    if matches!(err, ConfigError::NoAdapter { .. }) {
                        warn!(
                            field = %field,
                            value_type = binding.value_type().name(),
                            "No adapter registered for field type, skipping"
                        );
                    } else {
                        warn!(field = %field, key, error = %err, "Failed to inject value, skipping");
                    }
                    FieldOutcome::Failed(err)
                },
                Resolved::Value(value) => match binding.apply(target, value) {
                    Ok(()) => {
                        debug!(field = %field, key, "Injected configuration value");
                        FieldOutcome::Injected
                    },
                    Err(err) => {
                        let err = ConfigError::TypeMismatch {
                            message: format!("`{key}` produced a value that is not {}", err.expected)
                                .into(),
                            context: Some(field.to_string().into()),
                        };
                        warn!(field = %field, key, error = %err, "Failed to inject value, skipping");
                        FieldOutcome::Failed(err)
                    },
                },
            };

            FieldReport { field, key, outcome }
        })
        .collect();

    InjectionReport { outcomes }
}
