use lobby::PlatformError;
use lobby::modules::ModuleError;
use lobby_server::modules::{PlayerMenuModule, WorldModule};
use lobby_server::{CONFIG_FILE, Server};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

const BUNDLED: &str = include_str!("../resources/lobby.toml");

fn write_bundled_with(temp: &TempDir, from: &str, to: &str) {
    assert!(BUNDLED.contains(from));
    fs::write(temp.path().join(CONFIG_FILE), BUNDLED.replace(from, to)).unwrap();
}

#[test]
#[serial]
fn test_first_start_materializes_default_config() {
    let temp = TempDir::new().unwrap();

    let mut server = Server::builder().base_dir(temp.path()).build().unwrap();
    assert!(temp.path().join(CONFIG_FILE).exists());
    assert_eq!(server.failed_settings(), 0);
    assert_eq!(server.logging().level, "info");

    server.start().unwrap();
    let modules = server.platform().modules();
    assert_eq!(modules.activation_order(), [WorldModule::ID, PlayerMenuModule::ID]);
    assert!(modules.is_ready(PlayerMenuModule::ID));

    server.stop();
    assert!(!server.platform().modules().is_active(WorldModule::ID));
}

#[test]
#[serial]
fn test_existing_config_is_used() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(CONFIG_FILE),
        r#"
[logging]
level = "debug"

[world]
name = "hub"
max_players = 12
spawn = { x = 1.0, y = 70.0, z = 1.0 }

[menu]
animationDuration = 20
targetServer = "creative"
"#,
    )
    .unwrap();

    let mut server = Server::builder().base_dir(temp.path()).build().unwrap();
    assert_eq!(server.logging().level, "debug");
    assert!(server.failed_settings() > 0);

    server.start().unwrap();
    assert_eq!(server.platform().modules().activation_order().len(), 2);
    server.stop();

    let written = fs::read_to_string(temp.path().join(CONFIG_FILE)).unwrap();
    assert!(written.contains("name = \"hub\""));
}

#[test]
#[serial]
fn test_wrong_value_type_keeps_default() {
    let temp = TempDir::new().unwrap();
    write_bundled_with(&temp, "max_players = 100", "max_players = \"many\"");

    let mut server = Server::builder().base_dir(temp.path()).build().unwrap();
    assert_eq!(server.failed_settings(), 1);

    server.start().unwrap();
    assert!(server.platform().modules().is_ready(WorldModule::ID));
}

#[test]
#[serial]
fn test_invalid_world_blocks_the_menu() {
    let temp = TempDir::new().unwrap();
    write_bundled_with(&temp, "max_players = 100", "max_players = 0");

    let mut server = Server::builder().base_dir(temp.path()).build().unwrap();
    let err = server.start().unwrap_err();

    let platform_err = err.chain().find_map(|e| e.downcast_ref::<PlatformError>());
    assert!(matches!(
        platform_err,
        Some(PlatformError::Module(ModuleError::Activation { module, .. })) if *module == WorldModule::ID
    ));
    assert!(!server.platform().modules().is_active(PlayerMenuModule::ID));
}

#[test]
#[serial]
fn test_custom_file_name() {
    let temp = TempDir::new().unwrap();
    let err = Server::builder().base_dir(temp.path()).file("other.toml").build().unwrap_err();
    assert!(err.to_string().contains("Configuration could not be loaded"));
}
