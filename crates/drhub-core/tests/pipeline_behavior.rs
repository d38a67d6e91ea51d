//! Behavior-driven tests for the DR pipeline
//!
//! These tests verify HOW the system behaves across source fallback,
//! enrichment, snapshot publication and price merging, end to end and
//! offline.

use std::sync::Arc;

use drhub_core::browser::{FailingRenderer, StaticRenderer};
use drhub_core::http_client::{FailingHttpClient, StaticHttpClient};
use drhub_core::{
    Country, RefreshEngine, Sector, SnapshotStore, SourceChainBuilder, SourceId,
};
use time::macros::time;

const SET_FEED: &str = r#"[
    {"symbol":"AAPL80","securityName":"Apple Inc.","underlyingName":"AAPL",
     "exchange":"NASDAQ","last":6.45,"change":0.05,"percentChange":0.78,
     "volume":1250000,"value":8062.5,"drRatio":"100:1","marketCap":3800},
    {"symbol":"TENCENT80","securityName":"Tencent Holdings","underlyingName":"0700.HK",
     "exchange":"HKEX","last":14.25,"change":0.32,"percentChange":2.30,
     "volume":650000,"value":9262.5,"drRatio":"100:1","marketCap":480}
]"#;

const THAIWARRANT_PAGE: &str = r#"
<table id="MainContent_gvDRSearch">
  <tr><th>Symbol</th><th>Price</th><th>%Chg</th><th>Value</th>
      <th>Ratio</th><th>Desc</th><th>Underlying</th><th>Market</th></tr>
  <tr><td>NVDA80</td><td>4.72</td><td>+3.96%</td><td>2,100K</td>
      <td>100:1</td><td>NVIDIA Corporation</td><td>NVDA</td><td>NASDAQ</td></tr>
</table>"#;

fn engine(
    renderer: impl drhub_core::PageRenderer + 'static,
    http: impl drhub_core::HttpClient + 'static,
) -> RefreshEngine {
    let chain = SourceChainBuilder::new()
        .with_renderer(Arc::new(renderer))
        .with_http_client(Arc::new(http))
        .build();
    RefreshEngine::new(chain, None, Arc::new(SnapshotStore::new()))
}

// =============================================================================
// Source fallback
// =============================================================================

#[tokio::test]
async fn when_primary_feed_answers_records_come_out_fully_classified() {
    // Given: the rendered SET endpoint serves a valid JSON feed
    let engine = engine(StaticRenderer::new(SET_FEED), FailingHttpClient);

    // When: a full refresh runs
    let summary = engine.full_refresh().await.expect("primary answers");

    // Then: the primary source was selected and every record is classified
    assert_eq!(summary.source, SourceId::SetApi);
    let snapshot = engine.store().current().expect("published");

    let aapl = snapshot.record("AAPL80").expect("present");
    assert_eq!(aapl.country, Country::Us);
    assert_eq!(aapl.sector, Sector::Technology);
    assert_eq!(aapl.issuer_code, "KTB");
    assert!(aapl.trading_session.has_night_trading);
    // Feed scaling applied on the way in.
    assert_eq!(aapl.value, 8_062_500.0);
    assert_eq!(aapl.market_cap, 3_800_000_000.0);

    let tencent = snapshot.record("TENCENT80").expect("present");
    assert_eq!(tencent.country, Country::Hk);
    assert!(!tencent.trading_session.has_night_trading);
}

#[tokio::test]
async fn when_primary_is_blocked_the_html_scrape_takes_over() {
    // Given: the SET endpoint renders a block page, ThaiWarrant is healthy
    let engine = engine(
        StaticRenderer::new("<html>Access denied</html>"),
        StaticHttpClient::ok(THAIWARRANT_PAGE),
    );

    // When: a full refresh runs
    let summary = engine.full_refresh().await.expect("secondary answers");

    // Then: the scrape produced the records and the primary failure is logged
    assert_eq!(summary.source, SourceId::Thaiwarrant);
    let snapshot = engine.store().current().expect("published");
    let nvda = snapshot.record("NVDA80").expect("scraped");
    assert_eq!(nvda.price, 4.72);
    assert_eq!(nvda.country, Country::Us);
    // volume derived from value and price.
    assert_eq!(nvda.volume, (2_100_000.0_f64 / 4.72).round());
}

#[tokio::test]
async fn when_every_live_source_fails_the_dataset_keeps_the_pipeline_alive() {
    // Given: no browser and no network
    let engine = engine(FailingRenderer, FailingHttpClient);

    // When: a full refresh runs
    let summary = engine.full_refresh().await.expect("dataset is infallible");

    // Then: the curated universe is served, classified like live data
    assert_eq!(summary.source, SourceId::Dataset);
    let snapshot = engine.store().current().expect("published");
    assert!(snapshot.records.len() >= 30);

    let vn_etf = snapshot.record("E1VFVN3001").expect("present");
    assert_eq!(vn_etf.country, Country::Vn);
    assert_eq!(vn_etf.issuer_code, "BLS");
    assert_eq!(vn_etf.sector, Sector::Etf);

    // Rankings and overview are aggregated locally.
    assert!(!snapshot.rankings.top_gainers.is_empty());
    let overview = &snapshot.overview;
    assert_eq!(
        (overview.gainers + overview.losers + overview.unchanged) as usize,
        snapshot.records.len()
    );
}

// =============================================================================
// Session semantics on published records
// =============================================================================

#[tokio::test]
async fn night_capable_records_are_open_past_midnight_and_closed_at_dusk() {
    // Given: a snapshot with a US underlying
    let engine = engine(StaticRenderer::new(SET_FEED), FailingHttpClient);
    engine.full_refresh().await.expect("refresh");
    let snapshot = engine.store().current().expect("published");

    // When/Then: the night window crosses midnight, the gap stays closed
    let aapl = snapshot.record("AAPL80").expect("present");
    assert!(aapl.trading_session.is_open_at(time!(02:00)));
    assert!(aapl.trading_session.is_open_at(time!(11:00)));
    assert!(!aapl.trading_session.is_open_at(time!(17:00)));

    let tencent = snapshot.record("TENCENT80").expect("present");
    assert!(!tencent.trading_session.is_open_at(time!(02:00)));
    assert!(tencent.trading_session.is_open_at(time!(11:00)));
}

// =============================================================================
// Snapshot publication
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_always_observe_whole_generations_under_concurrent_replace() {
    // Given: an engine refreshing in a loop while readers poll the store
    let engine = Arc::new(engine(StaticRenderer::new(SET_FEED), FailingHttpClient));
    engine.full_refresh().await.expect("seed");

    let writer = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            for _ in 0..25 {
                engine.full_refresh().await.expect("refresh");
            }
        })
    };

    // When: readers grab snapshots concurrently
    let mut readers = Vec::new();
    for _ in 0..4 {
        let store = engine.store();
        readers.push(tokio::spawn(async move {
            for _ in 0..200 {
                let snapshot = store.current().expect("always published after seed");
                // Then: every observed generation is internally consistent
                let overview = &snapshot.overview;
                assert_eq!(
                    (overview.gainers + overview.losers + overview.unchanged) as usize,
                    snapshot.records.len()
                );
                assert_eq!(snapshot.records.len(), 2);
                tokio::task::yield_now().await;
            }
        }));
    }

    writer.await.expect("writer completes");
    for reader in readers {
        reader.await.expect("reader completes");
    }
}
