//! Primary source: the SET internal DR endpoint.
//!
//! The endpoint sits behind bot mitigation that rejects plain HTTP clients,
//! so the rows are read out of a rendered browser page instead. The page
//! text is expected to be a bare JSON array; anything else is a source
//! failure that makes the chain fall through, never a crash.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::browser::PageRenderer;
use crate::data_source::{DrSource, RawDrRecord, SourceError, SourceId};

const DEFAULT_ENDPOINT: &str =
    "https://www.set.or.th/api/set/dr/search?symbols=&tradeDateType=C&lang=th";

/// Page-load budget. Rendering through Chromium is slow by design.
pub const RENDER_TIMEOUT: Duration = Duration::from_secs(60);

/// One row of the SET DR search payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetDrRow {
    symbol: String,
    #[serde(default)]
    security_name: Option<String>,
    #[serde(default)]
    underlying_name: Option<String>,
    #[serde(default)]
    exchange: Option<String>,
    #[serde(default)]
    last: Option<f64>,
    #[serde(default)]
    change: Option<f64>,
    #[serde(default)]
    percent_change: Option<f64>,
    #[serde(default)]
    volume: Option<f64>,
    #[serde(default)]
    value: Option<f64>,
    #[serde(default)]
    high: Option<f64>,
    #[serde(default)]
    low: Option<f64>,
    #[serde(default)]
    open: Option<f64>,
    #[serde(default)]
    prior: Option<f64>,
    #[serde(default)]
    dr_ratio: Option<String>,
    #[serde(default)]
    market_cap: Option<f64>,
    #[serde(default)]
    pe: Option<f64>,
    #[serde(default)]
    dividend_yield: Option<f64>,
}

impl SetDrRow {
    fn into_raw(self) -> RawDrRecord {
        let underlying = self
            .underlying_name
            .unwrap_or_default()
            .trim()
            .to_owned();

        RawDrRecord {
            name: self.security_name.unwrap_or_default(),
            underlying,
            market: self.exchange.unwrap_or_default(),
            price: self.last.unwrap_or(0.0),
            change: self.change.unwrap_or(0.0),
            change_percent: self.percent_change.unwrap_or(0.0),
            volume: self.volume.unwrap_or(0.0),
            // The feed reports value in thousands and market cap in millions.
            value: self.value.unwrap_or(0.0) * 1_000.0,
            market_cap: self.market_cap.unwrap_or(0.0) * 1_000_000.0,
            high: self.high.unwrap_or(0.0),
            low: self.low.unwrap_or(0.0),
            open: self.open.unwrap_or(0.0),
            prev_close: self.prior.unwrap_or(0.0),
            bid: None,
            ask: None,
            ratio: self.dr_ratio.unwrap_or_default(),
            pe: self.pe.unwrap_or(0.0),
            dividend: self.dividend_yield.unwrap_or(0.0),
            symbol: self.symbol,
        }
    }
}

/// Primary adapter: rendered-page JSON extraction.
pub struct SetApiSource {
    renderer: Arc<dyn PageRenderer>,
    endpoint: String,
}

impl SetApiSource {
    pub fn new(renderer: Arc<dyn PageRenderer>) -> Self {
        Self {
            renderer,
            endpoint: std::env::var("DRHUB_SET_API_URL")
                .unwrap_or_else(|_| String::from(DEFAULT_ENDPOINT)),
        }
    }

    pub fn with_endpoint(renderer: Arc<dyn PageRenderer>, endpoint: impl Into<String>) -> Self {
        Self {
            renderer,
            endpoint: endpoint.into(),
        }
    }

    fn parse_rows(body: &str) -> Result<Vec<RawDrRecord>, SourceError> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Err(SourceError::malformed("rendered page produced no text"));
        }

        let value: serde_json::Value = serde_json::from_str(trimmed).map_err(|error| {
            let snippet: String = trimmed.chars().take(120).collect();
            SourceError::malformed(format!("page text is not JSON: {error}; got: {snippet}"))
        })?;

        if !value.is_array() {
            return Err(SourceError::malformed(
                "expected a JSON array of DR rows, got a different shape",
            ));
        }

        let rows: Vec<SetDrRow> = serde_json::from_value(value)
            .map_err(|error| SourceError::malformed(format!("unexpected row shape: {error}")))?;

        Ok(rows.into_iter().map(SetDrRow::into_raw).collect())
    }
}

impl DrSource for SetApiSource {
    fn id(&self) -> SourceId {
        SourceId::SetApi
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawDrRecord>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            info!(endpoint = %self.endpoint, "fetching DR list from SET endpoint");

            let body = self
                .renderer
                .render(&self.endpoint, RENDER_TIMEOUT)
                .await
                .map_err(|error| {
                    warn!(%error, "SET page render failed");
                    if error.timed_out() {
                        SourceError::timeout(error.message().to_owned())
                    } else {
                        SourceError::unavailable(error.message().to_owned())
                    }
                })?;

            let rows = Self::parse_rows(&body)?;
            info!(count = rows.len(), "SET endpoint returned DR rows");
            Ok(rows)
        })
    }
}
