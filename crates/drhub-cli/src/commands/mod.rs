//! Command dispatch and shared pipeline wiring.

mod brokers;
mod news;
mod quote;
mod run_loop;
mod snapshot;

use std::sync::Arc;

use drhub_core::adapters::MarketStatsSource;
use drhub_core::{RefreshEngine, SnapshotStore, SourceChainBuilder};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Run(args) => run_loop::run(cli, args).await,
        Command::Snapshot => snapshot::run(cli).await,
        Command::Quote(args) => quote::run(cli, args).await,
        Command::Brokers => brokers::run(cli).await,
        Command::News(args) => news::run(cli, args).await,
    }
}

/// Default engine wiring: live transports, or canned ones in offline mode.
/// The live stats source shares the chain's renderer configuration.
fn build_engine(offline: bool) -> RefreshEngine {
    let builder = if offline {
        SourceChainBuilder::new().offline()
    } else {
        SourceChainBuilder::new()
    };

    let stats = (!offline).then(|| MarketStatsSource::new(builder.renderer()));
    RefreshEngine::new(builder.build(), stats, Arc::new(SnapshotStore::new()))
}
