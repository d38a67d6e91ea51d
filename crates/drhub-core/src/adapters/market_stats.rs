//! Live market overview and ranking feeds.
//!
//! Same bot-mitigated endpoints as the primary DR feed, so these also go
//! through the page renderer. Every failure here is soft: the refresh
//! engine falls back to aggregating the snapshot's own records.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::browser::PageRenderer;
use crate::domain::DrRecord;
use crate::snapshot::{MarketOverview, Rankings};

const DEFAULT_OVERVIEW_URL: &str = "https://www.set.or.th/api/set/dr/market-overview";
const DEFAULT_GAINERS_URL: &str =
    "https://www.set.or.th/api/set/ranking/topGainer/SET/X?count=10";
const DEFAULT_LOSERS_URL: &str =
    "https://www.set.or.th/api/set/ranking/topLoser/SET/X?count=10";
const DEFAULT_ACTIVE_URL: &str =
    "https://www.set.or.th/api/set/ranking/mostActiveValue/SET/X?count=10";

const RENDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Renders the SET overview and ranking endpoints. All methods degrade to
/// `None` so callers can substitute local aggregation.
pub struct MarketStatsSource {
    renderer: Arc<dyn PageRenderer>,
    overview_url: String,
    gainers_url: String,
    losers_url: String,
    active_url: String,
}

impl MarketStatsSource {
    pub fn new(renderer: Arc<dyn PageRenderer>) -> Self {
        Self {
            renderer,
            overview_url: String::from(DEFAULT_OVERVIEW_URL),
            gainers_url: String::from(DEFAULT_GAINERS_URL),
            losers_url: String::from(DEFAULT_LOSERS_URL),
            active_url: String::from(DEFAULT_ACTIVE_URL),
        }
    }

    pub async fn fetch_overview(&self) -> Option<MarketOverview> {
        let body = match self.renderer.render(&self.overview_url, RENDER_TIMEOUT).await {
            Ok(body) => body,
            Err(error) => {
                warn!(%error, "market overview fetch failed");
                return None;
            }
        };

        match serde_json::from_str::<MarketOverview>(body.trim()) {
            Ok(overview) => {
                info!(
                    gainers = overview.gainers,
                    losers = overview.losers,
                    "live market overview received"
                );
                Some(overview)
            }
            Err(error) => {
                warn!(%error, "market overview payload unreadable");
                None
            }
        }
    }

    /// Renders all three ranking lists in parallel and resolves them against
    /// the given records. `None` when nothing usable came back.
    pub async fn fetch_rankings(&self, records: &[DrRecord]) -> Option<Rankings> {
        // One render is a whole browser session; overlap them.
        let (top_gainers, top_losers, most_active_value) = tokio::join!(
            self.fetch_ranked(&self.gainers_url, records),
            self.fetch_ranked(&self.losers_url, records),
            self.fetch_ranked(&self.active_url, records),
        );
        let rankings = Rankings {
            top_gainers,
            top_losers,
            most_active_value,
        };

        if rankings.is_empty() {
            None
        } else {
            Some(rankings)
        }
    }

    async fn fetch_ranked(&self, url: &str, records: &[DrRecord]) -> Vec<DrRecord> {
        let body = match self.renderer.render(url, RENDER_TIMEOUT).await {
            Ok(body) => body,
            Err(error) => {
                warn!(%error, url, "ranking fetch failed");
                return Vec::new();
            }
        };

        let symbols = match Self::ranked_symbols(&body) {
            Some(symbols) => symbols,
            None => {
                warn!(url, "ranking payload unreadable");
                return Vec::new();
            }
        };

        // Keep upstream order; symbols outside the DR universe are dropped.
        symbols
            .iter()
            .filter_map(|symbol| {
                records
                    .iter()
                    .find(|record| record.symbol.as_str() == symbol)
                    .cloned()
            })
            .collect()
    }

    /// Ranking payloads are either a bare array of rows or an object with a
    /// `ranking` list; each row carries a `symbol` field.
    fn ranked_symbols(body: &str) -> Option<Vec<String>> {
        let value: serde_json::Value = serde_json::from_str(body.trim()).ok()?;
        let rows = match &value {
            serde_json::Value::Array(rows) => rows.as_slice(),
            serde_json::Value::Object(map) => map.get("ranking")?.as_array()?.as_slice(),
            _ => return None,
        };

        Some(
            rows.iter()
                .filter_map(|row| row.get("symbol"))
                .filter_map(|symbol| symbol.as_str())
                .map(|symbol| symbol.trim().to_ascii_uppercase())
                .collect(),
        )
    }
}
