use serde::Serialize;

use drhub_core::{MarketOverview, RefreshSummary, Snapshot};

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::{CommandOutput, Table};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotReport<'a> {
    source: &'a str,
    record_count: usize,
    latency_ms: u64,
    overview: &'a MarketOverview,
    generated_at: String,
}

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let engine = super::build_engine(cli.offline);
    let summary = engine.full_refresh().await?;
    let snapshot = &summary.snapshot;

    let report = SnapshotReport {
        source: summary.source.as_str(),
        record_count: summary.record_count,
        latency_ms: summary.latency_ms,
        overview: &snapshot.overview,
        generated_at: snapshot.generated_at.to_string(),
    };

    CommandOutput::new(&report, render_table(&summary, snapshot))?
        .render(cli.format, cli.pretty)
}

fn render_table(summary: &RefreshSummary, snapshot: &Snapshot) -> String {
    let overview = &snapshot.overview;
    let mut out = format!(
        "source: {}   records: {}   latency: {}ms\n\
         gainers: {}   losers: {}   unchanged: {}\n\
         total value: {:.0}   total volume: {:.0}\n\n",
        summary.source,
        summary.record_count,
        summary.latency_ms,
        overview.gainers,
        overview.losers,
        overview.unchanged,
        overview.total_value,
        overview.total_volume,
    );

    let mut table = Table::new(&["SYMBOL", "PRICE", "%CHG", "COUNTRY", "SECTOR", "ISSUER"]);
    for record in &snapshot.rankings.top_gainers {
        table.row(&[
            String::from(record.symbol.as_str()),
            format!("{:.2}", record.price),
            format!("{:+.2}", record.change_percent),
            String::from(record.country.as_str()),
            String::from(record.sector.as_str()),
            record.issuer_code.clone(),
        ]);
    }
    out.push_str("top gainers:\n");
    out.push_str(&table.finish());
    out
}
