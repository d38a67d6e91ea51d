//! Immutable market snapshots and the process-wide store.
//!
//! A snapshot is built completely off to the side and published with one
//! pointer swap, so readers always see a whole generation and never a
//! half-written one.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::domain::{DrRecord, UtcDateTime};

const RANKING_CAP: usize = 10;

/// Market-wide sentiment counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOverview {
    #[serde(default, alias = "gainer")]
    pub gainers: u32,
    #[serde(default, alias = "loser")]
    pub losers: u32,
    #[serde(default)]
    pub unchanged: u32,
    #[serde(default)]
    pub total_value: f64,
    #[serde(default)]
    pub total_volume: f64,
}

impl MarketOverview {
    /// Local aggregation, used whenever the live overview feed fails.
    pub fn aggregate(records: &[DrRecord]) -> Self {
        let mut overview = Self::default();
        for record in records {
            if record.change_percent > 0.0 {
                overview.gainers += 1;
            } else if record.change_percent < 0.0 {
                overview.losers += 1;
            } else {
                overview.unchanged += 1;
            }
            overview.total_value += record.value;
            overview.total_volume += record.volume;
        }
        overview
    }
}

/// Top-ten movers, each list capped at [`RANKING_CAP`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rankings {
    pub top_gainers: Vec<DrRecord>,
    pub top_losers: Vec<DrRecord>,
    pub most_active_value: Vec<DrRecord>,
}

impl Rankings {
    /// Local aggregation over the snapshot's own records.
    pub fn aggregate(records: &[DrRecord]) -> Self {
        let by = |records: &[DrRecord],
                  compare: fn(&DrRecord, &DrRecord) -> std::cmp::Ordering| {
            let mut sorted = records.to_vec();
            sorted.sort_by(compare);
            sorted.truncate(RANKING_CAP);
            sorted
        };

        Self {
            top_gainers: by(records, |a, b| {
                b.change_percent
                    .partial_cmp(&a.change_percent)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            top_losers: by(records, |a, b| {
                a.change_percent
                    .partial_cmp(&b.change_percent)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            most_active_value: by(records, |a, b| {
                b.value
                    .partial_cmp(&a.value)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top_gainers.is_empty() && self.top_losers.is_empty() && self.most_active_value.is_empty()
    }
}

/// One complete generation of market data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub records: Vec<DrRecord>,
    pub overview: MarketOverview,
    pub rankings: Rankings,
    pub generated_at: UtcDateTime,
}

impl Snapshot {
    pub fn new(records: Vec<DrRecord>, generated_at: UtcDateTime) -> Self {
        let overview = MarketOverview::aggregate(&records);
        let rankings = Rankings::aggregate(&records);
        Self {
            records,
            overview,
            rankings,
            generated_at,
        }
    }

    pub fn record(&self, symbol: &str) -> Option<&DrRecord> {
        let needle = symbol.trim().to_ascii_uppercase();
        self.records.iter().find(|r| r.symbol.as_str() == needle)
    }
}

/// Process-wide snapshot holder. Publication is a single pointer swap; a
/// reader keeps whatever generation it grabbed alive through its `Arc`.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new generation and hand it back, so the writer can keep
    /// using it without a second store read.
    pub fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let published = Arc::new(snapshot);
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::clone(&published));
        published
    }

    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_update_time(&self) -> Option<UtcDateTime> {
        self.current().map(|snapshot| snapshot.generated_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::RawDrRecord;
    use crate::pipeline::enrich;

    fn record(symbol: &str, change_percent: f64, value: f64) -> DrRecord {
        let raw = RawDrRecord {
            symbol: String::from(symbol),
            change_percent,
            value,
            volume: 100.0,
            ..RawDrRecord::default()
        };
        enrich(&raw, UtcDateTime::now()).expect("valid record")
    }

    #[test]
    fn overview_counts_gainers_losers_unchanged() {
        let records = vec![
            record("AAPL80", 1.5, 100.0),
            record("MSFT80", -0.5, 200.0),
            record("NVDA80", 0.0, 300.0),
        ];
        let overview = MarketOverview::aggregate(&records);
        assert_eq!(overview.gainers, 1);
        assert_eq!(overview.losers, 1);
        assert_eq!(overview.unchanged, 1);
        assert_eq!(overview.total_value, 600.0);
        assert_eq!(overview.total_volume, 300.0);
    }

    #[test]
    fn rankings_sort_and_cap_at_ten() {
        let records: Vec<DrRecord> = (0..15)
            .map(|i| record(&format!("SYM{i:02}X80"), i as f64, (15 - i) as f64))
            .collect();
        let rankings = Rankings::aggregate(&records);

        assert_eq!(rankings.top_gainers.len(), 10);
        assert_eq!(rankings.top_gainers[0].change_percent, 14.0);
        assert_eq!(rankings.top_losers[0].change_percent, 0.0);
        assert_eq!(rankings.most_active_value[0].value, 15.0);
    }

    #[test]
    fn store_swap_is_whole_generation() {
        let store = SnapshotStore::new();
        assert!(store.current().is_none());
        assert!(store.last_update_time().is_none());

        let first = Snapshot::new(vec![record("AAPL80", 1.0, 10.0)], UtcDateTime::now());
        store.replace(first);
        let held = store.current().expect("published");
        assert_eq!(held.records.len(), 1);

        let second = Snapshot::new(
            vec![record("AAPL80", 1.0, 10.0), record("MSFT80", -1.0, 20.0)],
            UtcDateTime::now(),
        );
        store.replace(second);

        // The old generation stays intact for readers that grabbed it.
        assert_eq!(held.records.len(), 1);
        assert_eq!(store.current().expect("published").records.len(), 2);
    }

    #[test]
    fn snapshot_lookup_is_case_insensitive() {
        let snapshot = Snapshot::new(vec![record("AAPL80", 1.0, 10.0)], UtcDateTime::now());
        assert!(snapshot.record("aapl80").is_some());
        assert!(snapshot.record("MSFT80").is_none());
    }

    #[test]
    fn overview_accepts_upstream_singular_field_names() {
        let overview: MarketOverview =
            serde_json::from_str(r#"{"gainer":12,"loser":5,"unchanged":3,"totalValue":1.5e9,"totalVolume":2.0e8}"#)
                .expect("lenient field names");
        assert_eq!(overview.gainers, 12);
        assert_eq!(overview.losers, 5);
    }
}
