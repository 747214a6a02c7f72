use crate::error::ModuleError;
use crate::module::{Module, ModuleId};
use fxhash::{FxHashMap, FxHashSet};
use tracing::{debug, info, warn};

/// Owns the registered modules and enables them in dependency order.
///
/// Activation runs in two phases. The plan phase walks the dependency graph depth-first from
/// every registered module, in registration order, and fails on the first missing dependency
/// or cycle without calling any hook. The enable phase then calls [`Module::enable`] in plan
/// order, so every module is enabled after all of its dependencies.
///
/// # Example
/// ```rust
/// use lobby_modules::{Module, ModuleError, ModuleId, ModuleManager};
///
/// #[derive(Debug)]
/// struct World;
///
/// impl Module for World {
///     fn id(&self) -> ModuleId {
///         ModuleId::new("world")
///     }
///     fn enable(&mut self) -> Result<(), ModuleError> {
///         Ok(())
///     }
/// }
///
/// #[derive(Debug)]
/// struct Menu;
///
/// impl Module for Menu {
///     fn id(&self) -> ModuleId {
///         ModuleId::new("menu")
///     }
///     fn dependencies(&self) -> Vec<ModuleId> {
///         vec![ModuleId::new("world")]
///     }
///     fn enable(&mut self) -> Result<(), ModuleError> {
///         Ok(())
///     }
/// }
///
/// let mut manager = ModuleManager::new();
/// manager.register_module(Menu).unwrap();
/// manager.register_module(World).unwrap();
/// manager.activate_all().unwrap();
///
/// assert_eq!(manager.activation_order(), [ModuleId::new("world"), ModuleId::new("menu")]);
/// ```
#[derive(Debug, Default)]
pub struct ModuleManager {
    modules: Vec<Box<dyn Module>>,
    index: FxHashMap<ModuleId, usize>,
    active: FxHashSet<ModuleId>,
    order: Vec<ModuleId>,
}

impl ModuleManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module. Registration order decides the traversal order of activation.
    ///
    /// # Errors
    /// [`ModuleError::DuplicateModule`] if a module with the same id is already registered.
    pub fn register(&mut self, module: Box<dyn Module>) -> Result<(), ModuleError> {
        let id = module.id();
        if self.index.contains_key(&id) {
            return Err(ModuleError::duplicate(id));
        }

        debug!(module = %id, dependencies = ?module.dependencies(), "Module registered");
        self.index.insert(id, self.modules.len());
        self.modules.push(module);
        Ok(())
    }

    /// Convenience for [`Self::register`] with an unboxed module.
    ///
    /// # Errors
    /// [`ModuleError::DuplicateModule`] if a module with the same id is already registered.
    pub fn register_module(&mut self, module: impl Module + 'static) -> Result<(), ModuleError> {
        self.register(Box::new(module))
    }

    /// Enables every registered module that is not active yet, dependencies first.
    ///
    /// Calling it again is a no-op for modules that are already active.
    ///
    /// # Errors
    /// * [`ModuleError::MissingDependency`] or [`ModuleError::CircularDependency`] if the graph
    ///   is invalid. No hook is called in that case.
    /// * [`ModuleError::Activation`] if an `enable` hook fails. Modules enabled before it stay
    ///   active, so a later call resumes at the failed module.
    pub fn activate_all(&mut self) -> Result<(), ModuleError> {
        let plan = self.plan()?;
        if plan.is_empty() {
            debug!("All registered modules are already active");
            return Ok(());
        }

        let planned: Vec<_> = plan.iter().map(|&i| self.modules[i].id()).collect();
        debug!(plan = ?planned, "Activation planned");

        for index in plan {
            let module = &mut self.modules[index];
            let id = module.id();
            module.enable().map_err(|e| ModuleError::hook_failed(id, "enable", e))?;

            self.active.insert(id);
            self.order.push(id);
            info!(module = %id, "Module enabled");
        }

        Ok(())
    }

    /// Disables every active module in reverse activation order and forgets the activation state.
    ///
    /// Failing hooks are logged and do not stop the remaining modules.
    pub fn deactivate_all(&mut self) {
        for id in self.order.drain(..).rev() {
            let Some(&index) = self.index.get(&id) else { continue };
            match self.modules[index].disable() {
                Ok(()) => info!(module = %id, "Module disabled"),
                Err(e) => warn!(module = %id, error = %e, "Failed to disable module"),
            }
        }
        self.active.clear();
    }

    /// Calls the reload hook of an active module.
    ///
    /// # Errors
    /// [`ModuleError::UnknownModule`], [`ModuleError::NotActive`], or
    /// [`ModuleError::Activation`] if the hook fails.
    pub fn reload(&mut self, id: impl Into<ModuleId>) -> Result<(), ModuleError> {
        let id = id.into();
        let index = *self.index.get(&id).ok_or_else(|| ModuleError::unknown(id))?;
        if !self.active.contains(&id) {
            return Err(ModuleError::not_active(id));
        }

        self.modules[index].reload().map_err(|e| ModuleError::hook_failed(id, "reload", e))?;
        info!(module = %id, "Module reloaded");
        Ok(())
    }

    #[must_use]
    pub fn is_registered(&self, id: impl Into<ModuleId>) -> bool {
        self.index.contains_key(&id.into())
    }

    #[must_use]
    pub fn is_active(&self, id: impl Into<ModuleId>) -> bool {
        self.active.contains(&id.into())
    }

    /// `true` if the module is active and reports itself ready.
    #[must_use]
    pub fn is_ready(&self, id: impl Into<ModuleId>) -> bool {
        let id = id.into();
        self.active.contains(&id) && self.module(id).is_some_and(|m| m.is_ready())
    }

    /// Ids of the active modules, in the order they were enabled.
    #[must_use]
    pub fn activation_order(&self) -> &[ModuleId] {
        &self.order
    }

    #[must_use]
    pub fn module(&self, id: impl Into<ModuleId>) -> Option<&dyn Module> {
        self.index.get(&id.into()).map(|&index| self.modules[index].as_ref())
    }

    /// Ids of the registered modules, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.modules.iter().map(|m| m.id())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Computes the enable order of every inactive module without touching any of them.
    fn plan(&self) -> Result<Vec<usize>, ModuleError> {
        let mut walk = Walk::default();
        for module in &self.modules {
            self.visit(module.id(), &mut walk)?;
        }
        Ok(walk.plan)
    }

    fn visit(&self, id: ModuleId, walk: &mut Walk) -> Result<(), ModuleError> {
        if self.active.contains(&id) || walk.planned.contains(&id) {
            return Ok(());
        }
        if !walk.visiting.insert(id) {
            return Err(ModuleError::circular(id));
        }

        let index = *self.index.get(&id).ok_or_else(|| ModuleError::unknown(id))?;
        for dependency in self.modules[index].dependencies() {
            if !self.index.contains_key(&dependency) {
                return Err(ModuleError::missing(dependency, id));
            }
            self.visit(dependency, walk)?;
        }

        walk.visiting.remove(&id);
        walk.planned.insert(id);
        walk.plan.push(index);
        Ok(())
    }
}

#[derive(Default)]
struct Walk {
    visiting: FxHashSet<ModuleId>,
    planned: FxHashSet<ModuleId>,
    plan: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Journal = Arc<Mutex<Vec<String>>>;

    #[derive(Debug)]
    struct Probe {
        id: &'static str,
        deps: Vec<&'static str>,
        journal: Journal,
        fail_enable: bool,
    }

    impl Probe {
        fn new(id: &'static str, deps: &[&'static str], journal: &Journal) -> Self {
            Self { id, deps: deps.to_vec(), journal: Arc::clone(journal), fail_enable: false }
        }

        fn record(&self, event: &str) {
            self.journal.lock().unwrap().push(format!("{event}:{}", self.id));
        }
    }

    impl Module for Probe {
        fn id(&self) -> ModuleId {
            ModuleId::new(self.id)
        }

        fn dependencies(&self) -> Vec<ModuleId> {
            self.deps.iter().copied().map(ModuleId::new).collect()
        }

        fn enable(&mut self) -> Result<(), ModuleError> {
            if self.fail_enable {
                return Err("boom".into());
            }
            self.record("enable");
            Ok(())
        }

        fn disable(&mut self) -> Result<(), ModuleError> {
            self.record("disable");
            if self.id == "b" { Err("teardown failed".into()) } else { Ok(()) }
        }

        fn reload(&mut self) -> Result<(), ModuleError> {
            self.record("reload");
            Ok(())
        }
    }

    fn journal() -> Journal {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn events(journal: &Journal) -> Vec<String> {
        journal.lock().unwrap().clone()
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let j = journal();
        let mut manager = ModuleManager::new();
        manager.register_module(Probe::new("a", &[], &j)).unwrap();

        let err = manager.register_module(Probe::new("a", &[], &j)).unwrap_err();
        assert!(matches!(err, ModuleError::DuplicateModule { module, .. } if module.as_str() == "a"));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn plan_failure_calls_no_hook() {
        let j = journal();
        let mut manager = ModuleManager::new();
        manager.register_module(Probe::new("a", &[], &j)).unwrap();
        manager.register_module(Probe::new("b", &["ghost"], &j)).unwrap();

        let err = manager.activate_all().unwrap_err();
        assert!(matches!(
            err,
            ModuleError::MissingDependency { dependency, dependent, .. }
                if dependency.as_str() == "ghost" && dependent.as_str() == "b"
        ));
        assert!(events(&j).is_empty());
        assert!(!manager.is_active("a"));
    }

    #[test]
    fn failed_enable_resumes_on_retry() {
        let j = journal();
        let mut manager = ModuleManager::new();
        manager.register_module(Probe::new("a", &[], &j)).unwrap();
        let mut flaky = Probe::new("b", &["a"], &j);
        flaky.fail_enable = true;
        manager.register_module(flaky).unwrap();

        let err = manager.activate_all().unwrap_err();
        assert!(matches!(err, ModuleError::Activation { module, .. } if module.as_str() == "b"));
        assert!(manager.is_active("a"));
        assert!(!manager.is_active("b"));

        // swap the failing instance for a healthy one
        let index = manager.index[&ModuleId::new("b")];
        manager.modules[index] = Box::new(Probe::new("b", &["a"], &j));
        manager.activate_all().unwrap();

        assert_eq!(events(&j), ["enable:a", "enable:b"]);
        assert_eq!(manager.activation_order(), [ModuleId::new("a"), ModuleId::new("b")]);
    }

    #[test]
    fn deactivation_runs_in_reverse_and_tolerates_errors() {
        let j = journal();
        let mut manager = ModuleManager::new();
        manager.register_module(Probe::new("c", &["b"], &j)).unwrap();
        manager.register_module(Probe::new("b", &["a"], &j)).unwrap();
        manager.register_module(Probe::new("a", &[], &j)).unwrap();
        manager.activate_all().unwrap();

        manager.deactivate_all();

        assert_eq!(
            events(&j),
            ["enable:a", "enable:b", "enable:c", "disable:c", "disable:b", "disable:a"]
        );
        assert!(manager.activation_order().is_empty());
        assert!(!manager.is_active("a"));
        assert!(manager.is_registered("a"));
    }

    #[test]
    fn reload_requires_an_active_module() {
        let j = journal();
        let mut manager = ModuleManager::new();
        manager.register_module(Probe::new("a", &[], &j)).unwrap();

        assert!(matches!(manager.reload("a"), Err(ModuleError::NotActive { .. })));
        assert!(matches!(manager.reload("zzz"), Err(ModuleError::UnknownModule { .. })));

        manager.activate_all().unwrap();
        manager.reload("a").unwrap();
        assert_eq!(events(&j), ["enable:a", "reload:a"]);
    }

    #[test]
    fn readiness_follows_activation() {
        let j = journal();
        let mut manager = ModuleManager::new();
        manager.register_module(Probe::new("a", &[], &j)).unwrap();

        assert!(!manager.is_ready("a"));
        manager.activate_all().unwrap();
        assert!(manager.is_ready("a"));
        assert!(!manager.is_ready("missing"));
    }

    #[test]
    fn hook_errors_carry_the_phase() {
        let err = ModuleError::hook_failed(ModuleId::new("menu"), "enable", "boom".into());
        let rendered = err.to_string();
        assert!(rendered.contains("menu"));
        assert!(rendered.contains("enable"));
        assert!(rendered.contains("boom"));
    }
}
