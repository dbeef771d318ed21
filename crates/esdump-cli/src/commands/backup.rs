//! `esdump backup` command implementation
//!
//! Same as `transfer`, but the destination must be a file and the default
//! format is ndjson.

use super::{execute, print_outcome, runner};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::TransferArgs;
use colored::Colorize;
use esdump_pipeline::job::{Destination, JobKind, OutputFormat};
use esdump_pipeline::TransferJob;

/// Back up an index into a file
pub async fn run(args: &TransferArgs, config: Config) -> Result<()> {
    let job = TransferJob::resolve(args.to_request(&OutputFormat::Ndjson.to_string()))?;
    if !matches!(job.destination, Destination::File(_)) {
        return Err(CliError::usage(format!(
            "backup writes to a file, but '{}' is a cluster URL; use 'esdump transfer' to copy between clusters",
            job.destination
        )));
    }
    let config = config.with_auth(&args.auth);

    println!(
        "{} Backing up {} of {} to {}",
        "→".cyan(),
        job.kind,
        job.source_label(),
        job.destination
    );

    let runner = runner(&config);
    let outcome = execute(&runner, "Backing up", job.kind == JobKind::Data, runner.transfer(&job)).await?;
    print_outcome(&outcome);

    Ok(())
}
