//! drhub-core: acquisition and normalization pipeline for Thai SET
//! depositary receipts.
//!
//! The pipeline pulls the DR universe through a priority chain of sources
//! (SET endpoint rendered in a headless browser, ThaiWarrant HTML scrape,
//! curated dataset), enriches every row through one classifier, and
//! publishes immutable snapshots that readers grab with a single pointer
//! load. A Bangkok-clock scheduler drives full and price-only refreshes.

pub mod adapters;
pub mod brokers;
pub mod browser;
pub mod classify;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod news;
pub mod normalize;
pub mod pipeline;
pub mod refresh;
pub mod routing;
pub mod scheduler;
pub mod snapshot;

pub use brokers::{broker_by_id, with_dr_counts, Broker, BrokerListing, BROKERS};
pub use browser::{ChromiumRenderer, PageRenderer, RenderError, StaticRenderer};
pub use data_source::{DrSource, RawDrRecord, SourceError, SourceErrorKind, SourceId};
pub use domain::{
    Country, DrRecord, Sector, SessionState, SessionWindow, Symbol, TradingSession, UtcDateTime,
    DAY_SESSION, NIGHT_SESSION,
};
pub use error::{CoreError, ValidationError};
pub use http_client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use news::{NewsFetcher, NewsItem};
pub use pipeline::{enrich, enrich_all};
pub use refresh::{RefreshConfig, RefreshEngine, RefreshError, RefreshKind, RefreshSummary};
pub use routing::{ChainExhausted, ChainOutcome, SourceChain, SourceChainBuilder};
pub use scheduler::{planned_refresh, Scheduler, BANGKOK_OFFSET};
pub use snapshot::{MarketOverview, Rankings, Snapshot, SnapshotStore};
