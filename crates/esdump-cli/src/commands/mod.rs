//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod backup;
pub mod restore;
pub mod transfer;

use crate::config::Config;
use crate::error::Result;
use crate::progress::ProgressReporter;
use colored::Colorize;
use esdump_pipeline::client::ElasticConnector;
use esdump_pipeline::{JobOutcome, Runner};
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Runner wired to the configured clusters and to Ctrl-C
fn runner(config: &Config) -> Runner {
    Runner::new(Arc::new(ElasticConnector::new(config.client_config())))
        .with_cancellation(cancel_on_interrupt())
}

/// Token cancelled on the first Ctrl-C
fn cancel_on_interrupt() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping transfer");
            eprintln!("{} Interrupted, finishing records in flight...", "!".yellow());
            trigger.cancel();
        }
    });

    token
}

/// Await a job, drawing progress for record jobs
async fn execute<F>(runner: &Runner, label: &str, show_progress: bool, job: F) -> Result<JobOutcome>
where
    F: Future<Output = esdump_common::Result<JobOutcome>>,
{
    let reporter = show_progress.then(|| ProgressReporter::start(runner.progress(), label));
    let result = job.await;
    if let Some(reporter) = reporter {
        reporter.finish().await;
    }
    Ok(result?)
}

fn print_outcome(outcome: &JobOutcome) {
    match outcome {
        JobOutcome::Records(report) if report.is_lossy() => {
            println!("{} {}", "!".yellow().bold(), report);
            println!("  See the log for the ids of records that were not written.");
        },
        _ => println!("{} {}", "✓".green().bold(), outcome),
    }
}
