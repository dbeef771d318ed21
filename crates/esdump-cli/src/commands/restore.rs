//! `esdump restore` command implementation

use super::{execute, print_outcome, runner};
use crate::config::Config;
use crate::error::Result;
use crate::RestoreArgs;
use colored::Colorize;
use esdump_pipeline::job::JobKind;
use esdump_pipeline::RestoreJob;

/// Load a backup file into an index
pub async fn run(args: &RestoreArgs, config: Config) -> Result<()> {
    let job = RestoreJob::resolve(args.to_request())?;
    let config = config.with_auth(&args.auth);

    println!(
        "{} Restoring {} from {} to {}",
        "→".cyan(),
        job.kind,
        job.input.display(),
        job.destination_label()
    );

    let runner = runner(&config);
    let outcome = execute(&runner, "Restoring", job.kind == JobKind::Data, runner.restore(&job)).await?;
    print_outcome(&outcome);

    Ok(())
}
