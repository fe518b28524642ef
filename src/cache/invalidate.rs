//! Cache invalidation.
//!
//! Entries are matched by substring: flushing `images/photo.jpg` removes every
//! file whose name contains `fingerprint("photo.jpg")`. A slug that happens to
//! contain the same eight hex digits is removed too.
//!
//! Deletion is best-effort. Failures are collected into the [`FlushReport`]
//! and logged, never returned as an error.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::fingerprint::fingerprint;

// =============================================================================
// Flush Report
// =============================================================================

/// A path that could not be removed, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlushFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of a flush.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlushReport {
    /// Files that were deleted, sorted by path
    pub removed: Vec<PathBuf>,

    /// Matching entries left alone because they were not regular files or
    /// disappeared before deletion
    pub skipped: usize,

    /// Deletions that failed
    pub failed: Vec<FlushFailure>,
}

impl FlushReport {
    /// True when nothing failed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    fn fail(&mut self, path: &Path, message: impl Into<String>) {
        let message = message.into();
        warn!(path = %path.display(), %message, "Failed to remove cache entry");
        self.failed.push(FlushFailure {
            path: path.to_path_buf(),
            message,
        });
    }
}

// =============================================================================
// Cache Invalidator
// =============================================================================

/// Removes entries from a flat cache directory.
#[derive(Debug, Clone)]
pub struct CacheInvalidator {
    cache_dir: PathBuf,
}

impl CacheInvalidator {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Remove the entries derived from `source`, or every file when `source`
    /// is `None`.
    ///
    /// Only the top level of the cache directory is scanned. The source does
    /// not need to exist any more: matching uses its base filename only.
    pub fn flush(&self, source: Option<&Path>) -> FlushReport {
        let needle = source.map(|s| fingerprint(&s.to_string_lossy()));
        let mut report = FlushReport::default();

        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(e) => {
                report.fail(&self.cache_dir, e.to_string());
                return report;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    report.fail(&self.cache_dir, e.to_string());
                    continue;
                }
            };

            if let Some(needle) = needle.as_deref() {
                if !entry.file_name().to_string_lossy().contains(needle) {
                    continue;
                }
            }

            remove_entry(&entry.path(), &mut report);
        }

        report.removed.sort();

        info!(
            cache_dir = %self.cache_dir.display(),
            source = ?source,
            removed = report.removed.len(),
            skipped = report.skipped,
            failed = report.failed.len(),
            "Flushed thumbnail cache"
        );

        report
    }
}

/// Delete a regular file; anything else is skipped.
fn remove_entry(path: &Path, report: &mut FlushReport) {
    // metadata follows symlinks, so a link to a file is removed (the link, not
    // its target) and a link to a directory is skipped
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Cache entry vanished before removal");
            report.skipped += 1;
            return;
        }
        _ => {
            debug!(path = %path.display(), "Skipping non-file cache entry");
            report.skipped += 1;
            return;
        }
    }

    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Removed cache entry");
            report.removed.push(path.to_path_buf());
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            report.skipped += 1;
        }
        Err(e) => report.fail(path, e.to_string()),
    }
}
