use std::sync::Arc;

use drhub_core::http_client::StaticHttpClient;
use drhub_core::{NewsFetcher, ReqwestHttpClient, Symbol};

use crate::cli::{Cli, NewsArgs};
use crate::error::CliError;
use crate::output::{CommandOutput, Table};

pub async fn run(cli: &Cli, args: &NewsArgs) -> Result<(), CliError> {
    let symbol = Symbol::parse(&args.symbol)?;

    let fetcher = if cli.offline {
        NewsFetcher::new(Arc::new(StaticHttpClient::ok("[]")))
    } else {
        NewsFetcher::new(Arc::new(ReqwestHttpClient::new()))
    };

    let items = fetcher.latest(&symbol).await;

    let mut table = Table::new(&["DATE", "HEADLINE"]);
    for item in &items {
        table.row(&[
            item.published_at.clone().unwrap_or_default(),
            item.headline.clone(),
        ]);
    }
    let rendered = if items.is_empty() {
        format!("no news for {symbol}\n")
    } else {
        table.finish()
    };

    CommandOutput::new(&items, rendered)?.render(cli.format, cli.pretty)
}
