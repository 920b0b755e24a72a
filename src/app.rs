use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::platform::PlatformInfo;
use crate::config::settings::Settings;
use crate::core::analyzer::Analyzer;
use crate::core::events::{self, Event, EventReceiver};
use crate::core::progress::ProgressTracker;
use crate::core::scanner::Scanner;
use crate::export::report::{self, ReportOutcome};
use crate::models::scan_result::ScanResult;
use crate::models::summary::human_readable_size;

/// Runs walk → aggregate → render → write for one start path.
pub struct App {
    settings: Settings,
    platform: PlatformInfo,
}

impl App {
    pub fn new(settings: Settings, platform: PlatformInfo) -> Self {
        Self { settings, platform }
    }

    pub async fn run(&self) -> anyhow::Result<ReportOutcome> {
        let start_path = self.settings.start_path.clone();
        tracing::info!("Starting metadata collection from {}", start_path.display());

        let (event_tx, event_rx) = events::create_event_channel();
        let scanner = Scanner::new(self.settings.clone(), event_tx);
        let progress = Arc::clone(scanner.progress());

        // The scanner owns the only sender, so the channel closes when it is dropped.
        let scan_handle: JoinHandle<crate::Result<ScanResult>> =
            tokio::task::spawn_blocking(move || scanner.scan(&start_path));
        let reporter = tokio::spawn(report_progress(event_rx, progress));

        let result = scan_handle.await??;
        let _ = reporter.await;

        tracing::info!("Collected metadata for {} files", result.total_files());
        tracing::info!("Total size scanned: {}", human_readable_size(result.total_size));
        if !result.errors.is_empty() {
            tracing::warn!("{} entries could not be read", result.errors.len());
        }
        for (extension, count) in Analyzer::top_extensions(&result.records, 5) {
            let label = if extension.is_empty() { "(none)" } else { extension.as_str() };
            tracing::info!("  {:<10} {} files", label, count);
        }

        let output_dir = self.settings.output_dir.clone();
        let render = self.settings.render.clone();
        let platform = self.platform.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            report::write_reports(&result.records, &output_dir, &render, &platform)
        })
        .await??;

        tracing::info!(
            "Metadata and visualizations saved to {}",
            self.settings.output_dir.display()
        );
        Ok(outcome)
    }
}

/// Drain scan events and log progress until the scanner hangs up.
async fn report_progress(mut event_rx: EventReceiver, progress: Arc<ProgressTracker>) {
    let mut tick_interval = tokio::time::interval(Duration::from_secs(2));
    // The first tick completes immediately.
    tick_interval.tick().await;

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                match event {
                    Some(Event::ScanStarted { path }) => {
                        tracing::debug!("Scan started at {}", path.display());
                    }
                    Some(Event::FilesCounted { total }) => {
                        tracing::debug!("Expecting {} files", total);
                    }
                    Some(Event::Progress { processed, total_size, current_path }) => {
                        let snapshot = progress.snapshot();
                        match snapshot.percent() {
                            Some(pct) => tracing::info!(
                                "Processing files: {} ({:.1}%), {} so far",
                                processed,
                                pct,
                                human_readable_size(total_size),
                            ),
                            None => tracing::info!(
                                "Processing files: {}, {} so far",
                                processed,
                                human_readable_size(total_size),
                            ),
                        }
                        tracing::debug!("Current directory: {}", current_path.display());
                    }
                    Some(Event::ScanError { path, error }) => {
                        tracing::debug!("Scan error at {}: {}", path.display(), error);
                    }
                    Some(Event::ScanCompleted { total_files, total_size, duration_ms }) => {
                        tracing::info!(
                            "Scan completed: {} files, {} in {:.2}s",
                            total_files,
                            human_readable_size(total_size),
                            duration_ms as f64 / 1000.0,
                        );
                    }
                    None => return,
                }
            }
            _ = tick_interval.tick() => {
                let snapshot = progress.snapshot();
                tracing::info!(
                    "{} files processed, {} collected in {} directories \
                     ({:.0}/s, {} errors, {:.0}s)",
                    snapshot.files_processed,
                    snapshot.records_collected,
                    snapshot.dirs_visited,
                    snapshot.files_per_second,
                    snapshot.errors_count,
                    snapshot.elapsed.as_secs_f64(),
                );
            }
        }
    }
}
