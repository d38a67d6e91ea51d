//! Source adapters in chain-priority order.

pub mod dataset;
pub mod market_stats;
pub mod set_api;
pub mod thaiwarrant;

pub use dataset::DatasetSource;
pub use market_stats::MarketStatsSource;
pub use set_api::SetApiSource;
pub use thaiwarrant::ThaiWarrantSource;
