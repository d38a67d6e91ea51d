use drhub_core::with_dr_counts;

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::{CommandOutput, Table};

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let engine = super::build_engine(cli.offline);
    let summary = engine.full_refresh().await?;

    let listings = with_dr_counts(&summary.snapshot);

    let mut table = Table::new(&["ID", "NAME", "COMMISSION", "MIN TRADE", "DRS", "WEBSITE"]);
    for listing in &listings {
        table.row(&[
            String::from(listing.broker.id),
            String::from(listing.broker.name),
            String::from(listing.broker.commission),
            String::from(listing.broker.min_trade),
            listing.dr_count.to_string(),
            String::from(listing.broker.website),
        ]);
    }

    CommandOutput::new(&listings, table.finish())?.render(cli.format, cli.pretty)
}
