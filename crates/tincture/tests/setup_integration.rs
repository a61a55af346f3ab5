use serial_test::serial;
use tincture::{setup_colored_stderr_logging, LoggerConfig, SetupError, Style};

// The global logger can be installed once per process, so the whole
// lifecycle lives in one test.
#[test]
#[serial]
fn test_setup_installs_logger_once() {
    let config = LoggerConfig::new()
        .level(log::LevelFilter::Debug)
        .level_style("DEBUG", Style::new().cyan());

    setup_colored_stderr_logging(config.clone()).unwrap();
    assert_eq!(log::max_level(), log::LevelFilter::Debug);
    assert!(log::log_enabled!(log::Level::Debug));
    assert!(!log::log_enabled!(log::Level::Trace));

    // Writing must never fail, whatever stderr is connected to.
    log::error!("Failed to open file \"{}\"", "abc");
    log::logger().flush();

    let err = setup_colored_stderr_logging(config).unwrap_err();
    assert!(matches!(err, SetupError::Logger(_)));
}

#[test]
#[serial]
fn test_setup_rejects_bad_configuration_before_installing() {
    let err = setup_colored_stderr_logging(LoggerConfig::new().template("{{ thread }}")).unwrap_err();
    assert!(matches!(err, SetupError::Configuration(_)));
}
