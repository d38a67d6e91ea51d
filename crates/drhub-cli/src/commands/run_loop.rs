use std::sync::Arc;
use std::time::Duration;

use drhub_core::Scheduler;
use tracing::info;

use crate::cli::{Cli, RunArgs};
use crate::error::CliError;

/// Runs the refresh loop until the process is interrupted.
pub async fn run(cli: &Cli, args: &RunArgs) -> Result<(), CliError> {
    let engine = Arc::new(super::build_engine(cli.offline));
    let scheduler = Scheduler::with_cadence(engine, Duration::from_secs(args.cadence_secs));

    info!(
        cadence_secs = args.cadence_secs,
        offline = cli.offline,
        "starting refresh loop"
    );
    scheduler.run().await;

    Ok(())
}
