use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{error, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Marker embedded in temporary file names during atomic writes.
pub(crate) const TMP_MARKER: &str = ".foliotmp.";

const STALE_AFTER: Duration = Duration::from_secs(300);

/// Removes temp files left behind by interrupted writes.
pub(crate) async fn purge_tmp(root: &Path) {
    let root = root.to_path_buf();
    let now = SystemTime::now();

    match tokio::task::spawn_blocking(move || remove_stale(&root, now)).await {
        Ok(0) => {},
        Ok(removed) => info!(removed, "Removed stale temporary files"),
        Err(e) => error!(error = %e, "Temporary file cleanup task failed"),
    }
}

fn remove_stale(root: &Path, now: SystemTime) -> usize {
    WalkDir::new(root)
        .into_iter()
        .flatten()
        .filter(|entry| is_tmp(entry) && is_stale(entry, now))
        .filter(|entry| match std::fs::remove_file(entry.path()) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "Could not remove temp file");
                false
            },
        })
        .count()
}

fn is_tmp(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry.file_name().to_str().is_some_and(|name| name.contains(TMP_MARKER))
}

fn is_stale(entry: &DirEntry, now: SystemTime) -> bool {
    entry
        .metadata()
        .ok()
        .and_then(|meta| meta.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age > STALE_AFTER)
}
