//! Secondary source: the ThaiWarrant public DR listings page.
//!
//! A plain HTTP GET with a realistic browser user agent is enough here; the
//! rows live in a fixed-id grid-view table. Short rows are skipped, never
//! fatal, and the page not carrying the table at all counts as a source
//! failure so the chain can fall through.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};
use tracing::{info, warn};

use crate::data_source::{DrSource, RawDrRecord, SourceError, SourceId};
use crate::http_client::{HttpClient, HttpRequest};
use crate::normalize::{parse_price, parse_volume};

const DEFAULT_ENDPOINT: &str = "https://www.thaiwarrant.com/dr/search";
const REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Fixed-position columns of the grid-view table.
const COL_SYMBOL: usize = 0;
const COL_PRICE: usize = 1;
const COL_CHANGE_PERCENT: usize = 2;
const COL_VALUE: usize = 3;
const COL_RATIO: usize = 4;
const COL_DESCRIPTION: usize = 5;
const COL_UNDERLYING: usize = 6;
const COL_MARKET: usize = 7;
const MIN_COLUMNS: usize = 8;

/// Secondary adapter: HTML table scraping.
pub struct ThaiWarrantSource {
    http: Arc<dyn HttpClient>,
    endpoint: String,
}

impl ThaiWarrantSource {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            endpoint: std::env::var("DRHUB_THAIWARRANT_URL")
                .unwrap_or_else(|_| String::from(DEFAULT_ENDPOINT)),
        }
    }

    pub fn with_endpoint(http: Arc<dyn HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    fn parse_table(body: &str) -> Result<Vec<RawDrRecord>, SourceError> {
        let document = Html::parse_document(body);
        let table_selector = Selector::parse("#MainContent_gvDRSearch")
            .expect("static selector must parse");
        let row_selector = Selector::parse("tr").expect("static selector must parse");
        let cell_selector = Selector::parse("td").expect("static selector must parse");

        let Some(table) = document.select(&table_selector).next() else {
            return Err(SourceError::malformed(
                "results table #MainContent_gvDRSearch not found",
            ));
        };

        let mut rows = Vec::new();
        for (index, row) in table.select(&row_selector).enumerate() {
            // First row is the header.
            if index == 0 {
                continue;
            }

            let cells: Vec<ElementRef<'_>> = row.select(&cell_selector).collect();
            if cells.len() < MIN_COLUMNS {
                continue;
            }

            let text = |column: usize| -> String {
                cells[column].text().collect::<String>().trim().to_owned()
            };

            let symbol = text(COL_SYMBOL);
            if symbol.is_empty() {
                continue;
            }

            let price = parse_price(&text(COL_PRICE));
            let change_percent = parse_price(&text(COL_CHANGE_PERCENT));
            let value = parse_volume(&text(COL_VALUE));
            let volume = if price > 0.0 {
                (value / price).round()
            } else {
                0.0
            };

            rows.push(RawDrRecord {
                symbol,
                name: text(COL_DESCRIPTION),
                underlying: text(COL_UNDERLYING),
                market: text(COL_MARKET),
                price,
                change_percent,
                value,
                volume,
                ratio: text(COL_RATIO),
                ..RawDrRecord::default()
            });
        }

        Ok(rows)
    }
}

impl DrSource for ThaiWarrantSource {
    fn id(&self) -> SourceId {
        SourceId::Thaiwarrant
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawDrRecord>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            info!(endpoint = %self.endpoint, "scraping DR list from ThaiWarrant");

            let request = HttpRequest::get(&self.endpoint)
                .with_browser_user_agent()
                .with_header(
                    "accept",
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
                )
                .with_timeout_ms(REQUEST_TIMEOUT_MS);

            let response = self.http.execute(request).await.map_err(|error| {
                warn!(%error, "ThaiWarrant request failed");
                if error.timed_out() {
                    SourceError::timeout(error.message().to_owned())
                } else {
                    SourceError::unavailable(error.message().to_owned())
                }
            })?;

            if !response.is_success() {
                return Err(SourceError::unavailable(format!(
                    "ThaiWarrant returned status {}",
                    response.status
                )));
            }

            let rows = Self::parse_table(&response.body)?;
            info!(count = rows.len(), "ThaiWarrant returned DR rows");
            Ok(rows)
        })
    }
}
