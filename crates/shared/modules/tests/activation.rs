use lobby_modules::*;
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<&'static str>>>;

#[derive(Debug)]
struct Recorder {
    id: &'static str,
    deps: &'static [&'static str],
    log: Log,
    enabled: bool,
}

impl Recorder {
    fn new(id: &'static str, deps: &'static [&'static str], log: &Log) -> Self {
        Self { id, deps, log: Arc::clone(log), enabled: false }
    }
}

impl Module for Recorder {
    fn id(&self) -> ModuleId {
        ModuleId::new(self.id)
    }

    fn dependencies(&self) -> Vec<ModuleId> {
        self.deps.iter().copied().map(ModuleId::new).collect()
    }

    fn enable(&mut self) -> Result<(), ModuleError> {
        self.log.lock().unwrap().push(self.id);
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> Result<(), ModuleError> {
        self.enabled = false;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.enabled
    }
}

fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn position(log: &Log, id: &str) -> usize {
    log.lock().unwrap().iter().position(|entry| *entry == id).unwrap()
}

#[test]
fn test_dependency_is_enabled_first() {
    let log = log();
    let mut manager = ModuleManager::new();
    manager.register_module(Recorder::new("b", &["a"], &log)).unwrap();
    manager.register_module(Recorder::new("a", &[], &log)).unwrap();

    manager.activate_all().unwrap();

    assert_eq!(*log.lock().unwrap(), ["a", "b"]);
    assert!(manager.is_active("a"));
    assert!(manager.is_active("b"));
    assert!(manager.is_ready("b"));
}

#[test]
fn test_activation_is_idempotent() {
    let log = log();
    let mut manager = ModuleManager::new();
    manager.register_module(Recorder::new("a", &[], &log)).unwrap();
    manager.register_module(Recorder::new("b", &["a"], &log)).unwrap();

    manager.activate_all().unwrap();
    manager.activate_all().unwrap();

    assert_eq!(log.lock().unwrap().len(), 2);
    assert_eq!(manager.activation_order().len(), 2);
}

#[test]
fn test_late_registration_activates_only_the_newcomer() {
    let log = log();
    let mut manager = ModuleManager::new();
    manager.register_module(Recorder::new("a", &[], &log)).unwrap();
    manager.activate_all().unwrap();

    manager.register_module(Recorder::new("d", &["a"], &log)).unwrap();
    manager.activate_all().unwrap();

    assert_eq!(*log.lock().unwrap(), ["a", "d"]);
}

#[test]
fn test_duplicate_registration_fails() {
    let log = log();
    let mut manager = ModuleManager::new();
    manager.register(Box::new(Recorder::new("a", &[], &log))).unwrap();

    let err = manager.register(Box::new(Recorder::new("a", &["b"], &log))).unwrap_err();

    assert!(matches!(err, ModuleError::DuplicateModule { .. }));
    assert!(err.to_string().contains("Module already registered"));
    assert_eq!(manager.ids().collect::<Vec<_>>(), [ModuleId::new("a")]);
}

#[test]
fn test_missing_dependency_names_both_modules() {
    let log = log();
    let mut manager = ModuleManager::new();
    manager.register_module(Recorder::new("a", &[], &log)).unwrap();
    manager.register_module(Recorder::new("d", &["b"], &log)).unwrap();

    let err = manager.activate_all().unwrap_err();

    let ModuleError::MissingDependency { dependency, dependent, .. } = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(*dependency, ModuleId::new("b"));
    assert_eq!(*dependent, ModuleId::new("d"));
    assert!(log.lock().unwrap().is_empty());
    assert!(!manager.is_active("a"));
}

#[test]
fn test_cycle_is_detected_and_nothing_is_enabled() {
    let log = log();
    let mut manager = ModuleManager::new();
    manager.register_module(Recorder::new("a", &[], &log)).unwrap();
    manager.register_module(Recorder::new("c", &["e"], &log)).unwrap();
    manager.register_module(Recorder::new("e", &["c"], &log)).unwrap();

    let err = manager.activate_all().unwrap_err();

    let ModuleError::CircularDependency { module, .. } = &err else {
        panic!("unexpected error: {err}");
    };
    assert!(*module == ModuleId::new("c") || *module == ModuleId::new("e"));
    assert!(log.lock().unwrap().is_empty());
    for id in ["a", "c", "e"] {
        assert!(!manager.is_active(id));
    }
}

#[test]
fn test_self_dependency_is_a_cycle() {
    let log = log();
    let mut manager = ModuleManager::new();
    manager.register_module(Recorder::new("loop", &["loop"], &log)).unwrap();

    assert!(matches!(manager.activate_all(), Err(ModuleError::CircularDependency { .. })));
}

#[test]
fn test_five_module_graph() {
    let log = log();
    let mut manager = ModuleManager::new();
    manager.register_module(Recorder::new("e", &["c", "d"], &log)).unwrap();
    manager.register_module(Recorder::new("d", &["b"], &log)).unwrap();
    manager.register_module(Recorder::new("c", &["a", "b"], &log)).unwrap();
    manager.register_module(Recorder::new("b", &["a"], &log)).unwrap();
    manager.register_module(Recorder::new("a", &[], &log)).unwrap();

    manager.activate_all().unwrap();

    assert_eq!(log.lock().unwrap().len(), 5);
    assert!(position(&log, "a") < position(&log, "b"));
    assert!(position(&log, "a") < position(&log, "c"));
    assert!(position(&log, "b") < position(&log, "c"));
    assert!(position(&log, "b") < position(&log, "d"));
    assert!(position(&log, "c") < position(&log, "e"));
    assert!(position(&log, "d") < position(&log, "e"));
}

#[test]
fn test_disconnected_components_are_all_enabled() {
    let log = log();
    let mut manager = ModuleManager::new();
    manager.register_module(Recorder::new("x", &[], &log)).unwrap();
    manager.register_module(Recorder::new("y", &["x"], &log)).unwrap();
    manager.register_module(Recorder::new("p", &[], &log)).unwrap();
    manager.register_module(Recorder::new("q", &["p"], &log)).unwrap();

    manager.activate_all().unwrap();

    assert_eq!(*log.lock().unwrap(), ["x", "y", "p", "q"]);
}

#[test]
fn test_deactivate_all_resets_state() {
    let log = log();
    let mut manager = ModuleManager::new();
    manager.register_module(Recorder::new("a", &[], &log)).unwrap();
    manager.register_module(Recorder::new("b", &["a"], &log)).unwrap();
    manager.activate_all().unwrap();

    manager.deactivate_all();

    assert!(!manager.is_active("a"));
    assert!(!manager.is_ready("b"));
    assert!(manager.module("b").is_some_and(|m| !m.is_ready()));

    manager.activate_all().unwrap();
    assert_eq!(*log.lock().unwrap(), ["a", "b", "a", "b"]);
}

#[test]
fn test_hook_errors_accept_context() {
    let result: Result<(), ModuleError> = Err("socket closed".into());
    let err = result.context("while opening the portal").unwrap_err();

    assert!(matches!(err, ModuleError::Internal { .. }));
    assert_eq!(err.to_string(), "Internal module error (while opening the portal): socket closed");
}
