use folio_logger::{LevelFilter, LogFormat, Logger};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn json_file_output_is_written() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let log_dir = tmp.path().join("logs");

    let guard = Logger::builder()
        .name("folio-file")
        .console(false)
        .format(LogFormat::Json)
        .directory(&log_dir)
        .level(LevelFilter::INFO)
        .init()?;
    assert!(guard.writes_files());

    tracing::info!(slot = "head-css", "injected block");
    std::thread::sleep(Duration::from_millis(30));
    drop(guard);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(log_file)?;
    let line = contents.lines().find(|line| line.contains("injected block")).expect("event line");
    assert!(line.starts_with('{'), "json output expected, got {line}");
    assert!(line.contains("head-css"));

    Ok(())
}
