use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::config::settings::Settings;
use crate::error::{Error, Result};
use crate::models::record::FileRecord;
use crate::models::scan_result::{ScanError, ScanErrorType, ScanResult};

use super::events::{Event, EventSender};
use super::extractor::{self, SystemClassifier};
use super::progress::ProgressTracker;

/// Single-threaded, pre-order walker that collects one [`FileRecord`] per
/// accessible file.
pub struct Scanner {
    event_tx: EventSender,
    progress: Arc<ProgressTracker>,
    settings: Arc<Settings>,
    classifier: SystemClassifier,
}

impl Scanner {
    pub fn new(settings: Settings, event_tx: EventSender) -> Self {
        let classifier = SystemClassifier::new(settings.system_prefixes.clone());
        Self {
            event_tx,
            progress: Arc::new(ProgressTracker::new()),
            settings: Arc::new(settings),
            classifier,
        }
    }

    pub fn progress(&self) -> &Arc<ProgressTracker> {
        &self.progress
    }

    pub fn scan(&self, root: &Path) -> Result<ScanResult> {
        if !root.exists() {
            return Err(Error::StartPathNotFound(root.to_path_buf()));
        }

        let _ = self.event_tx.send(Event::ScanStarted {
            path: root.to_path_buf(),
        });

        if self.settings.count_first {
            tracing::info!("Counting files under {}", root.display());
            let total = self.count_files(root);
            tracing::info!("Found {} files to process", total);
            self.progress.set_expected(total);
            let _ = self.event_tx.send(Event::FilesCounted { total });
        }

        let mut records: Vec<FileRecord> = Vec::new();
        let mut errors: Vec<ScanError> = Vec::new();
        let mut total_size: u64 = 0;
        let mut dirs_visited = 0usize;

        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            dirs_visited += 1;
            self.progress.increment_dirs();

            let listing = match read_dir_batch(&dir, &self.settings) {
                Ok(listing) => listing,
                Err(e) => {
                    tracing::warn!("Error accessing directory {}: {}", dir.display(), e);
                    self.push_error(&mut errors, ScanError::from_io(dir, &e));
                    continue;
                }
            };

            for err in listing.errors {
                tracing::warn!("{}: {}", err.path.display(), err.message);
                self.push_error(&mut errors, err);
            }

            for file in &listing.files {
                match extractor::extract(file, &self.classifier) {
                    Ok(record) => {
                        total_size += record.size_bytes;
                        self.progress.record_collected(record.size_bytes);
                        records.push(record);
                    }
                    Err(err) => {
                        tracing::warn!("Skipping {}: {}", err.path.display(), err.message);
                        self.push_error(&mut errors, err);
                    }
                }
                let processed = self.progress.increment_processed();
                let every = self.settings.progress_every;
                if every > 0 && processed % every == 0 {
                    let _ = self.event_tx.send(Event::Progress {
                        processed,
                        total_size,
                        current_path: dir.clone(),
                    });
                }
            }

            // Reverse so the first listed subdirectory is popped next.
            stack.extend(listing.dirs.into_iter().rev());
        }

        let elapsed = self.progress.elapsed();
        let result = ScanResult {
            records,
            total_size,
            dirs_visited,
            scan_duration: elapsed,
            errors,
            timestamp: SystemTime::now(),
            scan_path: root.to_path_buf(),
        };

        let _ = self.event_tx.send(Event::ScanCompleted {
            total_files: result.total_files(),
            total_size: result.total_size,
            duration_ms: result.scan_duration.as_millis() as u64,
        });

        Ok(result)
    }

    /// Number of files the main pass will hand to the extractor, under the
    /// same pruning rules.
    pub fn count_files(&self, root: &Path) -> usize {
        let mut count = 0;
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            match read_dir_batch(&dir, &self.settings) {
                Ok(listing) => {
                    count += listing.files.len();
                    stack.extend(listing.dirs);
                }
                Err(e) => tracing::debug!("count: skipping {}: {}", dir.display(), e),
            }
        }
        count
    }

    fn push_error(&self, errors: &mut Vec<ScanError>, err: ScanError) {
        self.progress.increment_errors();
        let _ = self.event_tx.send(Event::ScanError {
            path: err.path.clone(),
            error: err.message.clone(),
        });
        errors.push(err);
    }
}

/// Entries of one directory, split into descendable subdirectories and
/// candidate files.
struct DirListing {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
    errors: Vec<ScanError>,
}

/// Read one directory and classify its entries.
/// Returns an error only if the directory itself can't be listed.
fn read_dir_batch(dir_path: &Path, settings: &Settings) -> std::io::Result<DirListing> {
    let mut entries = Vec::new();
    let mut errors = Vec::new();

    for entry_result in std::fs::read_dir(dir_path)? {
        match entry_result {
            Ok(entry) => entries.push(entry),
            Err(e) => errors.push(ScanError::from_io(dir_path.to_path_buf(), &e)),
        }
    }
    entries.sort_by_key(|e| e.file_name());

    let mut files = Vec::new();
    let mut dirs = Vec::new();

    for entry in entries {
        let entry_path = entry.path();
        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(e) => {
                errors.push(ScanError::from_io(entry_path, &e));
                continue;
            }
        };

        if file_type.is_dir() {
            let name = entry.file_name();
            if settings.is_excluded(&name.to_string_lossy()) {
                tracing::debug!("Excluded {}", entry_path.display());
                continue;
            }
            if !extractor::is_readable(&entry_path) {
                errors.push(ScanError {
                    message: format!("No permission to access directory: {}", entry_path.display()),
                    path: entry_path,
                    error_type: ScanErrorType::PermissionDenied,
                });
                continue;
            }
            dirs.push(entry_path);
        } else if file_type.is_symlink() {
            // Directory links are never followed; everything else is a file.
            match std::fs::metadata(&entry_path) {
                Ok(target) if target.is_dir() => {
                    tracing::debug!("Not following directory link {}", entry_path.display());
                }
                _ => files.push(entry_path),
            }
        } else {
            files.push(entry_path);
        }
    }

    Ok(DirListing {
        files,
        dirs,
        errors,
    })
}
