use drhub_core::{DrRecord, Symbol};

use crate::cli::{Cli, QuoteArgs};
use crate::error::CliError;
use crate::output::{CommandOutput, Table};

pub async fn run(cli: &Cli, args: &QuoteArgs) -> Result<(), CliError> {
    let symbol = Symbol::parse(&args.symbol)?;

    let engine = super::build_engine(cli.offline);
    let summary = engine.full_refresh().await?;

    let record = summary
        .snapshot
        .record(symbol.as_str())
        .ok_or_else(|| CliError::UnknownSymbol(String::from(symbol.as_str())))?;

    CommandOutput::new(record, render_table(record))?.render(cli.format, cli.pretty)
}

fn render_table(record: &DrRecord) -> String {
    let mut table = Table::new(&["FIELD", "VALUE"]);
    let mut row = |field: &str, value: String| table.row(&[String::from(field), value]);

    row("symbol", String::from(record.symbol.as_str()));
    row("name", record.name.clone());
    row("underlying", record.underlying.clone());
    row("market", record.market.clone());
    row(
        "country",
        format!("{} {}", record.country.flag(), record.country.as_str()),
    );
    row("sector", String::from(record.sector.as_str()));
    row("issuer", format!("{} ({})", record.issuer, record.issuer_code));
    row("ratio", record.ratio.clone());
    row("price", format!("{:.2}", record.price));
    row(
        "change",
        format!("{:+.2} ({:+.2}%)", record.change, record.change_percent),
    );
    row("volume", format!("{:.0}", record.volume));
    row("value", format!("{:.0}", record.value));
    row("session", record.trading_session.session.clone());
    row("last update", record.last_update.to_string());

    table.finish()
}
