//! Tertiary source: a curated in-process dataset.
//!
//! Last resort when both live sources fail. The figures are a maintained
//! snapshot of the listed DR universe, good enough to keep the pipeline and
//! its consumers functional offline. Classification still happens in the
//! shared enrichment pass, so these rows carry only feed-level fields.

use std::future::Future;
use std::pin::Pin;

use tracing::info;

use crate::data_source::{DrSource, RawDrRecord, SourceError, SourceId};

/// Tertiary adapter: static curated rows.
#[derive(Debug, Default)]
pub struct DatasetSource;

impl DatasetSource {
    pub fn new() -> Self {
        Self
    }

    /// The curated universe, grouped by region of the underlying.
    pub fn rows() -> Vec<RawDrRecord> {
        let row = |symbol: &str,
                   name: &str,
                   underlying: &str,
                   market: &str,
                   ratio: &str,
                   price: f64,
                   change: f64,
                   change_percent: f64,
                   volume: f64,
                   market_cap: f64,
                   pe: f64,
                   dividend: f64| RawDrRecord {
            symbol: String::from(symbol),
            name: String::from(name),
            underlying: String::from(underlying),
            market: String::from(market),
            ratio: String::from(ratio),
            price,
            change,
            change_percent,
            volume,
            value: price * volume,
            market_cap,
            pe,
            dividend,
            ..RawDrRecord::default()
        };

        vec![
            // US technology
            row("AAPL80", "Apple Inc.", "AAPL", "NASDAQ", "1:100", 6.45, 0.05, 0.78, 1_250_000.0, 3_800.0, 31.2, 0.48),
            row("MSFT80", "Microsoft Corporation", "MSFT", "NASDAQ", "1:100", 14.85, -0.12, -0.80, 890_000.0, 3_200.0, 36.5, 0.72),
            row("NVDA80", "NVIDIA Corporation", "NVDA", "NASDAQ", "1:100", 4.72, 0.18, 3.96, 2_100_000.0, 3_400.0, 65.2, 0.04),
            row("GOOGL01", "Alphabet Inc.", "GOOGL", "NASDAQ", "1:10", 61.20, 0.45, 0.74, 750_000.0, 2_200.0, 24.8, 0.0),
            row("META80", "Meta Platforms Inc.", "META", "NASDAQ", "1:100", 19.85, 0.32, 1.64, 520_000.0, 1_500.0, 28.3, 0.50),
            row("AMZN80", "Amazon.com Inc.", "AMZN", "NASDAQ", "1:100", 7.25, 0.08, 1.12, 680_000.0, 2_100.0, 42.5, 0.0),
            row("TSLA80", "Tesla Inc.", "TSLA", "NASDAQ", "1:100", 14.45, -0.35, -2.37, 1_850_000.0, 1_350.0, 98.5, 0.0),
            row("NFLX80", "Netflix Inc.", "NFLX", "NASDAQ", "1:100", 29.65, 0.52, 1.79, 290_000.0, 380.0, 48.7, 0.0),
            row("AMD80", "Advanced Micro Devices", "AMD", "NASDAQ", "1:100", 4.28, 0.15, 3.63, 980_000.0, 220.0, 45.2, 0.0),
            row("AVGO80", "Broadcom Inc.", "AVGO", "NASDAQ", "1:100", 7.65, 0.12, 1.59, 320_000.0, 1_050.0, 45.2, 2.12),
            row("COSTCO19", "Costco Wholesale", "COST", "NASDAQ", "1:1000", 31.85, 0.18, 0.57, 180_000.0, 410.0, 52.3, 1.16),
            // China / Hong Kong
            row("BABA80", "Alibaba Group", "BABA", "NYSE", "1:100", 2.92, 0.08, 2.82, 980_000.0, 210.0, 18.5, 0.0),
            row("TENCENT80", "Tencent Holdings", "0700.HK", "HKEX", "1:100", 14.25, 0.32, 2.30, 650_000.0, 480.0, 22.3, 0.35),
            row("BYDCOM80", "BYD Company", "1211.HK", "HKEX", "1:100", 9.72, 0.25, 2.64, 420_000.0, 95.0, 25.8, 0.15),
            row("XIAOMI80", "Xiaomi Corporation", "1810.HK", "HKEX", "1:100", 1.78, 0.05, 2.89, 380_000.0, 65.0, 32.5, 0.0),
            row("JD80", "JD.com Inc.", "JD", "NASDAQ", "1:100", 1.18, 0.03, 2.61, 520_000.0, 55.0, 12.8, 0.76),
            row("PDD80", "PDD Holdings", "PDD", "NASDAQ", "1:100", 3.45, 0.12, 3.60, 450_000.0, 180.0, 15.2, 0.0),
            row("NIO80", "NIO Inc.", "NIO", "NYSE", "1:100", 0.15, 0.01, 7.14, 890_000.0, 8.0, -5.2, 0.0),
            // Japan
            row("TOYOTA19", "Toyota Motor", "7203.T", "TSE", "1:1000", 6.32, 0.05, 0.80, 180_000.0, 280.0, 9.8, 2.85),
            row("SONY19", "Sony Group", "6758.T", "TSE", "1:1000", 3.15, 0.08, 2.61, 145_000.0, 115.0, 18.2, 0.85),
            row("NINTENDO19", "Nintendo Co.", "7974.T", "TSE", "1:1000", 2.68, 0.06, 2.29, 125_000.0, 85.0, 22.5, 1.95),
            // Europe
            row("LVMH01", "LVMH Moët Hennessy", "MC.PA", "Euronext Paris", "1:10", 23.45, -0.28, -1.18, 85_000.0, 345.0, 24.5, 1.35),
            row("HERMES80", "Hermès International", "RMS.PA", "Euronext Paris", "1:100", 79.85, 0.92, 1.17, 42_000.0, 248.0, 52.3, 0.65),
            row("ASML01", "ASML Holding", "ASML.AS", "Euronext Amsterdam", "1:10", 24.72, 0.45, 1.85, 68_000.0, 295.0, 42.8, 0.85),
            // Singapore
            row("DBS19", "DBS Group Holdings", "D05.SI", "SGX", "1:1000", 1.28, 0.02, 1.59, 125_000.0, 98.0, 11.2, 4.85),
            row("UOB19", "United Overseas Bank", "U11.SI", "SGX", "1:1000", 1.12, 0.01, 0.90, 95_000.0, 55.0, 10.5, 4.25),
            // Vietnam ETFs
            row("E1VFVN3001", "E1VFVN30 ETF", "E1VFVN30", "HOSE", "1:10", 0.62, 0.01, 1.64, 85_000.0, 12.0, 15.2, 1.85),
            row("FUEVFVND01", "FUEVFVND ETF", "FUEVFVND", "HOSE", "1:10", 0.58, 0.01, 1.75, 72_000.0, 8.0, 14.8, 1.65),
            // Hong Kong ETFs
            row("NDX01", "ChinaAMC NASDAQ 100 ETF", "3086.HK", "HKEX", "1:10", 1.56, 0.02, 1.30, 320_000.0, 85.0, 0.0, 0.45),
            row("HKTECH13", "Hang Seng TECH Index ETF", "3032.HK", "HKEX", "1:100", 1.42, 0.04, 2.90, 275_000.0, 62.0, 0.0, 0.25),
            // More US names
            row("COIN80", "Coinbase Global", "COIN", "NASDAQ", "1:100", 8.95, 0.45, 5.29, 420_000.0, 45.0, 32.5, 0.0),
            row("UBER80", "Uber Technologies", "UBER", "NYSE", "1:100", 2.48, 0.05, 2.06, 380_000.0, 165.0, 75.2, 0.0),
            row("CRM80", "Salesforce Inc.", "CRM", "NYSE", "1:100", 11.25, 0.15, 1.35, 185_000.0, 285.0, 42.8, 0.0),
            row("ORCL80", "Oracle Corporation", "ORCL", "NYSE", "1:100", 5.82, 0.08, 1.39, 165_000.0, 420.0, 38.5, 1.25),
        ]
    }
}

impl DrSource for DatasetSource {
    fn id(&self) -> SourceId {
        SourceId::Dataset
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawDrRecord>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let rows = Self::rows();
            info!(count = rows.len(), "serving curated DR dataset");
            Ok(rows)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dataset_never_fails_and_is_non_empty() {
        let rows = DatasetSource::new().fetch().await.expect("infallible");
        assert!(rows.len() >= 30);
    }

    #[test]
    fn symbols_are_unique() {
        let rows = DatasetSource::rows();
        let mut symbols: Vec<&str> = rows.iter().map(|r| r.symbol.as_str()).collect();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), rows.len());
    }

    #[test]
    fn every_row_carries_feed_fields() {
        for row in DatasetSource::rows() {
            assert!(!row.symbol.is_empty());
            assert!(!row.name.is_empty());
            assert!(!row.underlying.is_empty());
            assert!(!row.market.is_empty());
            assert!(!row.ratio.is_empty());
            assert!(row.price > 0.0, "{} has no price", row.symbol);
        }
    }

    #[test]
    fn traded_value_follows_price_and_volume() {
        for row in DatasetSource::rows() {
            assert!(row.value > 0.0, "{} has no traded value", row.symbol);
            assert_eq!(row.value, row.price * row.volume, "{}", row.symbol);
        }
    }
}
