use lobby_config::{ConfigurationInjector, ConfigurationLoader};
use lobby_logger::{LevelFilter, Logger, LoggerError, LoggingSettings};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_document_settings_install_console_logger_once() {
    let tmp_dir = tempdir().unwrap();
    fs::write(tmp_dir.path().join("lobby.toml"), "[logging]\nlevel = \"warn\"\nfilter = \"lobby_modules=debug\"\n")
        .unwrap();

    let loader = ConfigurationLoader::open("lobby.toml", Some(tmp_dir.path())).unwrap();
    let mut settings = LoggingSettings::default();
    let report = ConfigurationInjector::new(&loader).inject(&mut settings);
    assert_eq!(report.injected(), 2);
    assert_eq!(settings.level_filter().unwrap(), LevelFilter::WARN);

    let logger = Logger::from_settings("integration-document", &settings, tmp_dir.path())
        .expect("logger should initialize");
    assert!(logger.guard().is_none(), "no directory means console output only");

    let err = Logger::builder("integration-document-second")
        .init()
        .expect_err("second init should fail");
    assert!(matches!(err, LoggerError::Subscriber { .. }));
}
