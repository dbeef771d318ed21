//! `esdump transfer` command implementation
//!
//! Copies an index into another index (possibly on another cluster) or into
//! a file.

use super::{execute, print_outcome, runner};
use crate::config::Config;
use crate::error::Result;
use crate::TransferArgs;
use colored::Colorize;
use esdump_pipeline::job::{JobKind, OutputFormat};
use esdump_pipeline::TransferJob;

/// Transfer an index
pub async fn run(args: &TransferArgs, config: Config) -> Result<()> {
    let job = TransferJob::resolve(args.to_request(&OutputFormat::Json.to_string()))?;
    let config = config.with_auth(&args.auth);

    println!(
        "{} Transferring {} of {} to {}",
        "→".cyan(),
        job.kind,
        job.source_label(),
        job.destination
    );

    let runner = runner(&config);
    let outcome = execute(&runner, "Transferring", job.kind == JobKind::Data, runner.transfer(&job)).await?;
    print_outcome(&outcome);

    Ok(())
}
