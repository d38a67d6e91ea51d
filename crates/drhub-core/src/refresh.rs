//! Refresh cycles over the source chain and the snapshot store.
//!
//! A `tokio::sync::Mutex` serializes cycles: scheduler ticks, startup
//! refreshes and operator commands can overlap, and a second concurrent
//! cycle would double-launch the browser. Last-known-good semantics
//! throughout: a failed cycle never clears the store.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::adapters::MarketStatsSource;
use crate::data_source::{SourceError, SourceId};
use crate::domain::UtcDateTime;
use crate::pipeline::enrich_all;
use crate::routing::{ChainExhausted, SourceChain};
use crate::snapshot::{MarketOverview, Rankings, Snapshot, SnapshotStore};

/// Which cycle the scheduler (or operator) asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    /// Whole universe through the chain, plus overview and rankings.
    Full,
    /// Primary feed only, price-bearing fields merged into the snapshot.
    Price,
}

#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Age past which records are reported as stale. Stale records are
    /// warned about, never dropped.
    pub stale_after: time::Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            stale_after: time::Duration::hours(24),
        }
    }
}

/// What a completed cycle did, carrying the generation it published.
#[derive(Debug, Clone)]
pub struct RefreshSummary {
    pub kind: RefreshKind,
    pub source: SourceId,
    pub record_count: usize,
    pub updated_count: usize,
    pub latency_ms: u64,
    pub snapshot: Arc<Snapshot>,
}

#[derive(Debug)]
pub enum RefreshError {
    /// Full refresh: every source failed or came back empty.
    ChainExhausted(ChainExhausted),
    /// Price refresh: the primary feed failed or was unusable.
    PriceFeed(SourceError),
}

impl std::fmt::Display for RefreshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChainExhausted(exhausted) => exhausted.fmt(f),
            Self::PriceFeed(error) => write!(f, "price feed: {error}"),
        }
    }
}

impl std::error::Error for RefreshError {}

/// Owns the chain, the live stats source and the store.
pub struct RefreshEngine {
    chain: SourceChain,
    stats: Option<MarketStatsSource>,
    store: Arc<SnapshotStore>,
    config: RefreshConfig,
    in_flight: Mutex<()>,
}

impl RefreshEngine {
    pub fn new(chain: SourceChain, stats: Option<MarketStatsSource>, store: Arc<SnapshotStore>) -> Self {
        Self::with_config(chain, stats, store, RefreshConfig::default())
    }

    pub fn with_config(
        chain: SourceChain,
        stats: Option<MarketStatsSource>,
        store: Arc<SnapshotStore>,
        config: RefreshConfig,
    ) -> Self {
        Self {
            chain,
            stats,
            store,
            config,
            in_flight: Mutex::new(()),
        }
    }

    pub fn store(&self) -> Arc<SnapshotStore> {
        Arc::clone(&self.store)
    }

    pub async fn refresh(&self, kind: RefreshKind) -> Result<RefreshSummary, RefreshError> {
        match kind {
            RefreshKind::Full => self.full_refresh().await,
            RefreshKind::Price => self.price_refresh().await,
        }
    }

    /// Replace the whole snapshot from the chain.
    pub async fn full_refresh(&self) -> Result<RefreshSummary, RefreshError> {
        let _cycle = self.in_flight.lock().await;

        info!("full refresh cycle starting");
        let outcome = self.chain.fetch().await.map_err(|exhausted| {
            warn!(%exhausted, "full refresh failed, keeping previous snapshot");
            RefreshError::ChainExhausted(exhausted)
        })?;

        let now = UtcDateTime::now();
        let records = enrich_all(&outcome.rows, now);

        let overview = match self.live_overview().await {
            Some(overview) => overview,
            None => {
                info!("aggregating market overview locally");
                MarketOverview::aggregate(&records)
            }
        };
        let rankings = match self.live_rankings(&records).await {
            Some(rankings) => rankings,
            None => {
                info!("aggregating rankings locally");
                Rankings::aggregate(&records)
            }
        };

        let record_count = records.len();
        let published = self.store.replace(Snapshot {
            records,
            overview,
            rankings,
            generated_at: now,
        });

        info!(
            source = %outcome.selected_source,
            records = record_count,
            latency_ms = outcome.latency_ms,
            "full refresh cycle completed"
        );

        Ok(RefreshSummary {
            kind: RefreshKind::Full,
            source: outcome.selected_source,
            record_count,
            updated_count: record_count,
            latency_ms: outcome.latency_ms,
            snapshot: published,
        })
    }

    /// Merge live prices from the primary feed into the current snapshot.
    /// Classification is left untouched; unmatched records keep their last
    /// figures. Without a published snapshot this escalates to a full cycle.
    pub async fn price_refresh(&self) -> Result<RefreshSummary, RefreshError> {
        if self.store.current().is_none() {
            info!("no snapshot published yet, escalating price refresh to full");
            return self.full_refresh().await;
        }

        let _cycle = self.in_flight.lock().await;

        info!("price refresh cycle starting");
        let started = std::time::Instant::now();
        let rows = self
            .chain
            .fetch_only(SourceId::SetApi)
            .await
            .map_err(|error| {
                warn!(%error, "price refresh failed, keeping previous snapshot");
                RefreshError::PriceFeed(error)
            })?;
        if rows.is_empty() {
            warn!("price feed came back empty, keeping previous snapshot");
            return Err(RefreshError::PriceFeed(SourceError::malformed(
                "price feed returned no rows",
            )));
        }

        let snapshot = match self.store.current() {
            Some(snapshot) => snapshot,
            // Store can only have been populated further since the check above.
            None => {
                drop(_cycle);
                return self.full_refresh().await;
            }
        };

        let now = UtcDateTime::now();
        let live: HashMap<String, _> = enrich_all(&rows, now)
            .into_iter()
            .map(|record| (String::from(record.symbol.as_str()), record))
            .collect();

        let mut records = snapshot.records.clone();
        let mut updated = 0_usize;
        let mut stale = 0_usize;
        for record in &mut records {
            if let Some(fresh) = live.get(record.symbol.as_str()) {
                record.apply_price_update(fresh);
                updated += 1;
            } else if record.last_update.age(now) > self.config.stale_after {
                stale += 1;
            }
        }
        if stale > 0 {
            warn!(
                stale,
                threshold_hours = self.config.stale_after.whole_hours(),
                "records past the staleness threshold"
            );
        }

        let overview = MarketOverview::aggregate(&records);
        let rankings = Rankings::aggregate(&records);
        let record_count = records.len();
        let published = self.store.replace(Snapshot {
            records,
            overview,
            rankings,
            generated_at: now,
        });

        let latency_ms = started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64;
        info!(updated, records = record_count, latency_ms, "price refresh cycle completed");

        Ok(RefreshSummary {
            kind: RefreshKind::Price,
            source: SourceId::SetApi,
            record_count,
            updated_count: updated,
            latency_ms,
            snapshot: published,
        })
    }

    async fn live_overview(&self) -> Option<MarketOverview> {
        self.stats.as_ref()?.fetch_overview().await
    }

    async fn live_rankings(&self, records: &[crate::domain::DrRecord]) -> Option<Rankings> {
        self.stats.as_ref()?.fetch_rankings(records).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::StaticRenderer;
    use crate::data_source::{DrSource, RawDrRecord};
    use crate::routing::SourceChainBuilder;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SequencedPrimary {
        calls: AtomicUsize,
        batches: Vec<Result<Vec<RawDrRecord>, SourceError>>,
    }

    impl DrSource for SequencedPrimary {
        fn id(&self) -> SourceId {
            SourceId::SetApi
        }

        fn fetch<'a>(
            &'a self,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<RawDrRecord>, SourceError>> + Send + 'a>>
        {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            let result = self.batches[index.min(self.batches.len() - 1)].clone();
            Box::pin(async move { result })
        }
    }

    fn raw(symbol: &str, price: f64, change_percent: f64) -> RawDrRecord {
        RawDrRecord {
            symbol: String::from(symbol),
            market: String::from("NASDAQ"),
            price,
            change_percent,
            ..RawDrRecord::default()
        }
    }

    fn engine_with_primary(primary: SequencedPrimary) -> RefreshEngine {
        let chain = SourceChain::new(vec![Arc::new(primary)]);
        RefreshEngine::new(chain, None, Arc::new(SnapshotStore::new()))
    }

    #[tokio::test]
    async fn full_refresh_publishes_enriched_snapshot() {
        let engine = engine_with_primary(SequencedPrimary {
            calls: AtomicUsize::new(0),
            batches: vec![Ok(vec![raw("AAPL80", 6.45, 1.5), raw("MSFT80", 14.85, -0.5)])],
        });

        let summary = engine.full_refresh().await.expect("chain answers");
        assert_eq!(summary.kind, RefreshKind::Full);
        assert_eq!(summary.record_count, 2);

        let snapshot = engine.store().current().expect("published");
        assert_eq!(snapshot.records.len(), 2);
        assert_eq!(snapshot.overview.gainers, 1);
        assert_eq!(snapshot.overview.losers, 1);
        // Classification ran on the way in.
        assert_eq!(snapshot.records[0].issuer_code, "KTB");
        // The summary hands back the very generation the store now holds.
        assert!(Arc::ptr_eq(&summary.snapshot, &snapshot));
    }

    #[tokio::test]
    async fn price_refresh_merges_without_touching_classification() {
        let engine = engine_with_primary(SequencedPrimary {
            calls: AtomicUsize::new(0),
            batches: vec![
                Ok(vec![raw("AAPL80", 6.45, 1.5), raw("MSFT80", 14.85, -0.5)]),
                // Second cycle: only AAPL80 comes back, with a new price.
                Ok(vec![raw("AAPL80", 7.00, 8.53)]),
            ],
        });

        engine.full_refresh().await.expect("seed snapshot");
        let summary = engine.price_refresh().await.expect("prices merge");
        assert_eq!(summary.kind, RefreshKind::Price);
        assert_eq!(summary.updated_count, 1);

        let snapshot = engine.store().current().expect("published");
        assert!(Arc::ptr_eq(&summary.snapshot, &snapshot));
        let aapl = snapshot.record("AAPL80").expect("kept");
        let msft = snapshot.record("MSFT80").expect("kept");
        assert_eq!(aapl.price, 7.00);
        assert_eq!(aapl.issuer_code, "KTB");
        // Unmatched record keeps its last figures.
        assert_eq!(msft.price, 14.85);
        // Overview recomputed from the merged set.
        assert_eq!(snapshot.overview.gainers, 1);
    }

    #[tokio::test]
    async fn failed_price_refresh_keeps_previous_snapshot() {
        let engine = engine_with_primary(SequencedPrimary {
            calls: AtomicUsize::new(0),
            batches: vec![
                Ok(vec![raw("AAPL80", 6.45, 1.5)]),
                Err(SourceError::timeout("render budget exceeded")),
            ],
        });

        engine.full_refresh().await.expect("seed snapshot");
        let before = engine.store().current().expect("published");

        engine.price_refresh().await.expect_err("feed failed");
        let after = engine.store().current().expect("still published");
        assert_eq!(before.generated_at, after.generated_at);
        assert_eq!(after.records.len(), 1);
    }

    #[tokio::test]
    async fn price_refresh_without_a_snapshot_escalates_to_full() {
        let engine = engine_with_primary(SequencedPrimary {
            calls: AtomicUsize::new(0),
            batches: vec![Ok(vec![raw("AAPL80", 6.45, 1.5)])],
        });

        let summary = engine.price_refresh().await.expect("escalates");
        assert_eq!(summary.kind, RefreshKind::Full);
        assert!(engine.store().current().is_some());
    }

    #[tokio::test]
    async fn live_stats_override_local_aggregation() {
        let chain = SourceChain::new(vec![Arc::new(SequencedPrimary {
            calls: AtomicUsize::new(0),
            batches: vec![Ok(vec![raw("AAPL80", 6.45, 1.5)])],
        })]);
        let stats = MarketStatsSource::new(Arc::new(StaticRenderer::new(
            r#"{"gainer":99,"loser":42,"unchanged":7}"#,
        )));
        let engine = RefreshEngine::new(chain, Some(stats), Arc::new(SnapshotStore::new()));

        engine.full_refresh().await.expect("chain answers");
        let snapshot = engine.store().current().expect("published");
        assert_eq!(snapshot.overview.gainers, 99);
        assert_eq!(snapshot.overview.losers, 42);
    }

    #[tokio::test]
    async fn offline_chain_end_to_end() {
        let chain = SourceChainBuilder::new().offline().build();
        let engine = RefreshEngine::new(chain, None, Arc::new(SnapshotStore::new()));

        let summary = engine.full_refresh().await.expect("dataset answers");
        assert_eq!(summary.source, SourceId::Dataset);
        let snapshot = engine.store().current().expect("published");
        assert!(snapshot.records.len() >= 30);
        assert!(!snapshot.rankings.top_gainers.is_empty());
        // Curated rows carry traded value, so the offline overview and the
        // most-active ranking have real figures to work with.
        assert!(snapshot.overview.total_value > 0.0);
        let most_active = &snapshot.rankings.most_active_value;
        assert!(!most_active.is_empty());
        assert!(most_active[0].value > 0.0);
        assert!(most_active[0].value >= most_active[most_active.len() - 1].value);
    }
}
