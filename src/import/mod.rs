//! Import directory handling.
//!
//! The import directory acts as a single-file cache: the newest `*.csv` there
//! is picked up when no snapshot path is given, and an explicitly chosen file
//! replaces whatever was cached. Cache maintenance never blocks a run.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

/// Newest `*.csv` in `dir` by modification time.
#[must_use]
pub fn find_latest_snapshot(dir: &Path) -> Option<PathBuf> {
    if !dir.is_dir() {
        return None;
    }
    csv_files(dir)
        .into_iter()
        .map(|path| {
            let modified = std::fs::metadata(&path)
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path)
        })
        .max_by(|(a_time, a_path), (b_time, b_path)| {
            a_time.cmp(b_time).then_with(|| b_path.cmp(a_path))
        })
        .map(|(_, path)| path)
}

/// Replace the cached snapshot in `dir` with `source`.
///
/// Returns the cached copy, or `source` unchanged when any step fails.
#[must_use]
pub fn cache_snapshot(source: &Path, dir: &Path) -> PathBuf {
    match try_cache(source, dir) {
        Ok(path) => path,
        Err(err) => {
            warn!(
                source = %source.display(),
                dir = %dir.display(),
                error = %err,
                "could not cache snapshot in import directory; using it in place"
            );
            source.to_path_buf()
        }
    }
}

fn try_cache(source: &Path, dir: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let file_name = source
        .file_name()
        .ok_or_else(|| std::io::Error::other("snapshot path has no file name"))?;
    let dest = dir.join(file_name);

    let source_canon = source.canonicalize()?;
    let already_cached = dest
        .canonicalize()
        .is_ok_and(|dest_canon| dest_canon == source_canon);

    for stale in csv_files(dir) {
        if already_cached && stale.canonicalize().is_ok_and(|p| p == source_canon) {
            continue;
        }
        if let Err(err) = std::fs::remove_file(&stale) {
            debug!(path = %stale.display(), error = %err, "could not remove cached snapshot");
        }
    }

    if !already_cached {
        std::fs::copy(source, &dest)?;
    }
    dest.canonicalize()
}

fn csv_files(dir: &Path) -> Vec<PathBuf> {
    let Some(dir) = dir.to_str() else {
        return Vec::new();
    };
    let pattern = format!("{}/*.csv", glob::Pattern::escape(dir.trim_end_matches('/')));
    match glob::glob(&pattern) {
        Ok(paths) => paths.filter_map(std::result::Result::ok).collect(),
        Err(err) => {
            debug!(%pattern, error = %err, "invalid glob pattern");
            Vec::new()
        }
    }
}
