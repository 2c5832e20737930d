//! Integration tests for logging system

use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
use core_runtime::Error;

#[test]
fn test_logging_initializes_once_per_process() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_spans(false);

    init_logging(config.clone()).expect("first initialization succeeds");
    tracing::debug!(target: "core_sample_cache", "logging ready");

    match init_logging(config) {
        Err(Error::Config(message)) => assert!(message.contains("initialize")),
        other => panic!("expected second initialization to fail, got {:?}", other),
    }
}

#[test]
fn test_invalid_filter_rejected_before_install() {
    let config = LoggingConfig::default().with_filter("core_sample_cache=notalevel");

    assert!(matches!(init_logging(config), Err(Error::Config(_))));
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Json)
        .with_level(LogLevel::Warn)
        .with_filter("core_sample_cache=warn")
        .with_spans(true)
        .with_target(false)
        .with_thread_info(true);

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, LogLevel::Warn);
    assert_eq!(config.filter.as_deref(), Some("core_sample_cache=warn"));
    assert!(config.enable_spans);
    assert!(!config.display_target);
    assert!(config.display_thread_info);
}
