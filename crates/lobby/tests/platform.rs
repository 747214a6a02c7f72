use lobby::prelude::*;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

static DEFAULTS: EmbeddedDefaults = EmbeddedDefaults::new(&[(
    "lobby.toml",
    r#"
[world]
name = "hub"
spawn_protection = 16

[menu]
target_server = "survival"
"#,
)]);

#[derive(Debug, Default, Clone, Configurable)]
struct WorldSettings {
    #[value("world.name")]
    name: String,
    #[value("world.spawn_protection")]
    spawn_protection: i32,
}

#[derive(Debug)]
struct Recorded {
    id: &'static str,
    deps: Vec<ModuleId>,
    journal: Arc<Mutex<Vec<String>>>,
}

impl Module for Recorded {
    fn id(&self) -> ModuleId {
        ModuleId::new(self.id)
    }

    fn dependencies(&self) -> Vec<ModuleId> {
        self.deps.clone()
    }

    fn enable(&mut self) -> Result<(), ModuleError> {
        self.journal.lock().unwrap().push(format!("enable {}", self.id));
        Ok(())
    }

    fn disable(&mut self) -> Result<(), ModuleError> {
        self.journal.lock().unwrap().push(format!("disable {}", self.id));
        Ok(())
    }
}

#[test]
fn test_bootstrap_sequence() {
    let temp = TempDir::new().unwrap();
    let mut platform = Platform::load("conf/lobby.toml", Some(temp.path()), DEFAULTS).unwrap();
    assert!(temp.path().join("conf/lobby.toml").exists());

    let mut world = WorldSettings::default();
    let report = platform.inject(&mut world);
    assert!(report.is_clean());
    assert_eq!(world.name, "hub");
    assert_eq!(world.spawn_protection, 16);

    let journal = Arc::new(Mutex::new(Vec::new()));
    platform
        .register(Recorded {
            id: "menu",
            deps: vec![ModuleId::new("world")],
            journal: Arc::clone(&journal),
        })
        .unwrap()
        .register(Recorded { id: "world", deps: Vec::new(), journal: Arc::clone(&journal) })
        .unwrap();

    platform.start().unwrap();
    assert!(platform.modules().is_ready("menu"));

    platform.shutdown();
    assert_eq!(
        *journal.lock().unwrap(),
        ["enable world", "enable menu", "disable menu", "disable world"]
    );
}

#[test]
fn test_errors_are_wrapped() {
    let temp = TempDir::new().unwrap();
    let err = Platform::load("other.toml", Some(temp.path()), DEFAULTS).unwrap_err();
    assert!(matches!(err, PlatformError::Config(ConfigError::ConfigNotFound { .. })));

    let mut platform = Platform::load("lobby.toml", Some(temp.path()), DEFAULTS).unwrap();
    let journal = Arc::new(Mutex::new(Vec::new()));
    platform
        .register(Recorded { id: "menu", deps: vec![ModuleId::new("world")], journal })
        .unwrap();

    let err = platform.start().unwrap_err();
    assert!(matches!(err, PlatformError::Module(ModuleError::MissingDependency { .. })));
    assert!(matches!(platform.reload("menu"), Err(PlatformError::Module(ModuleError::NotActive { .. }))));
}

#[test]
fn test_configure_scope() {
    let temp = TempDir::new().unwrap();
    let platform = Platform::load("lobby.toml", Some(temp.path()), DEFAULTS).unwrap();

    let mut first = WorldSettings::default();
    let mut second = WorldSettings::default();
    let report = platform.configure(ConfigScope::new("worlds").target(&mut first).target(&mut second));

    assert_eq!(report.injected(), 4);
    assert_eq!(first.name, second.name);
}
