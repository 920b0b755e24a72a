use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

pub struct ProgressTracker {
    pub files_expected: AtomicUsize,
    pub files_processed: AtomicUsize,
    pub records_collected: AtomicUsize,
    pub dirs_visited: AtomicUsize,
    pub total_size: AtomicU64,
    pub errors_count: AtomicUsize,
    pub start_time: Instant,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            files_expected: AtomicUsize::new(0),
            files_processed: AtomicUsize::new(0),
            records_collected: AtomicUsize::new(0),
            dirs_visited: AtomicUsize::new(0),
            total_size: AtomicU64::new(0),
            errors_count: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn set_expected(&self, total: usize) {
        self.files_expected.store(total, Ordering::Relaxed);
    }

    /// Counts a file handed to the extractor, whether or not it produced a record.
    pub fn increment_processed(&self) -> usize {
        self.files_processed.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_collected(&self, size: u64) {
        self.records_collected.fetch_add(1, Ordering::Relaxed);
        self.total_size.fetch_add(size, Ordering::Relaxed);
    }

    pub fn increment_dirs(&self) {
        self.dirs_visited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_errors(&self) {
        self.errors_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn files_per_second(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed < f64::EPSILON {
            return 0.0;
        }
        self.files_processed.load(Ordering::Relaxed) as f64 / elapsed
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        let expected = self.files_expected.load(Ordering::Relaxed);
        ProgressSnapshot {
            files_expected: (expected > 0).then_some(expected),
            files_processed: self.files_processed.load(Ordering::Relaxed),
            records_collected: self.records_collected.load(Ordering::Relaxed),
            dirs_visited: self.dirs_visited.load(Ordering::Relaxed),
            total_size: self.total_size.load(Ordering::Relaxed),
            errors_count: self.errors_count.load(Ordering::Relaxed),
            elapsed: self.elapsed(),
            files_per_second: self.files_per_second(),
        }
    }
}

pub struct ProgressSnapshot {
    /// Known only when the counting pass ran.
    pub files_expected: Option<usize>,
    pub files_processed: usize,
    pub records_collected: usize,
    pub dirs_visited: usize,
    pub total_size: u64,
    pub errors_count: usize,
    pub elapsed: Duration,
    pub files_per_second: f64,
}

impl ProgressSnapshot {
    /// Completion in percent, when the expected total is known.
    pub fn percent(&self) -> Option<f64> {
        self.files_expected
            .map(|total| (self.files_processed as f64 / total as f64 * 100.0).min(100.0))
    }
}
