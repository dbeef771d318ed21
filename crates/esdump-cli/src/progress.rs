//! Progress bar for running transfers
//!
//! The pipeline only bumps counters; a small task polls them and draws.

use esdump_pipeline::Progress;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const REFRESH_INTERVAL: Duration = Duration::from_millis(100);

const BAR_TEMPLATE: &str =
    "{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({per_sec}, {eta})";
const SPINNER_TEMPLATE: &str = "{msg}\n{spinner:.green} [{elapsed_precise}] {pos} records ({per_sec})";

/// Create a progress bar for a known number of records
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(bar_style());
    pb.set_message(message.to_string());
    pb
}

/// Create a spinner for an unknown number of records
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(BAR_TEMPLATE)
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Message line under the bar
pub fn status_message(label: &str, failed: u64) -> String {
    match failed {
        0 => label.to_string(),
        n => format!("{} ({} failed)", label, n),
    }
}

/// Redraws a bar from shared counters until stopped
pub struct ProgressReporter {
    stop: CancellationToken,
    handle: JoinHandle<()>,
}

impl ProgressReporter {
    pub fn start(progress: Progress, label: impl Into<String>) -> Self {
        let label = label.into();
        let stop = CancellationToken::new();
        let token = stop.clone();

        let handle = tokio::spawn(async move {
            let mut bar = create_spinner(&label);
            let mut sized = false;

            loop {
                // The total is only known once the source has been counted
                if !sized {
                    if let Some(total) = progress.total() {
                        bar.finish_and_clear();
                        bar = create_progress_bar(total, &label);
                        sized = true;
                    }
                }
                bar.set_position(progress.attempted());
                bar.set_message(status_message(&label, progress.failed()));
                bar.tick();

                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(REFRESH_INTERVAL) => {},
                }
            }

            bar.set_position(progress.attempted());
            bar.finish_and_clear();
        });

        Self { stop, handle }
    }

    /// Stop drawing and clear the bar
    pub async fn finish(self) {
        self.stop.cancel();
        let _ = self.handle.await;
    }
}
