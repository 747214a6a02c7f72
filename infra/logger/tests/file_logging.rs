use lobby_logger::{Logger, LoggerError, LoggingSettings};
use serial_test::serial;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
#[serial]
fn settings_with_unknown_level_are_rejected() {
    let tmp_dir = tempdir().unwrap();
    let settings = LoggingSettings {
        level: "loud".to_owned(),
        directory: "logs".to_owned(),
        ..LoggingSettings::default()
    };

    let err = Logger::from_settings("integration-bad-level", &settings, tmp_dir.path()).unwrap_err();

    assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    assert!(!tmp_dir.path().join("logs").exists(), "no directory should be created");
}

#[test]
#[serial]
fn settings_with_directory_write_json_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let settings = LoggingSettings {
        level: "debug".to_owned(),
        directory: "logs".to_owned(),
        json: true,
        ..LoggingSettings::default()
    };

    let logger = Logger::from_settings("integration-file-logging", &settings, tmp_dir.path())?;
    assert!(logger.guard().is_some());

    tracing::info!(module = "world", "hello from integration test");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_dir = tmp_dir.path().join("logs");
    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(&log_file)?;
    let first = contents.lines().next().expect("log file should not be empty");
    assert!(first.starts_with('{'), "log lines should be JSON objects: {first}");
    assert!(contents.contains("hello from integration test"));

    Ok(())
}
