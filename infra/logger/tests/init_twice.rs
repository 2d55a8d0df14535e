use folio_logger::{LevelFilter, Logger, LoggerError};
use serial_test::serial;

#[test]
#[serial]
fn console_logger_installs_once() {
    let guard = Logger::builder()
        .name("folio-console")
        .level(LevelFilter::INFO)
        .init()
        .expect("first init should succeed");
    assert!(!guard.writes_files(), "console-only logger should not spawn a file writer");

    let err = Logger::builder()
        .name("folio-console-again")
        .init()
        .expect_err("second init should fail");
    assert!(matches!(err, LoggerError::Subscriber { .. }));
}
