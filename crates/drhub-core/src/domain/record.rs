use serde::{Deserialize, Serialize};

use crate::{Country, Sector, Symbol, TradingSession, UtcDateTime};

/// Canonical DR entry, the unit of a snapshot.
///
/// Field names serialize in camelCase so the read layer sees the same wire
/// shape regardless of which adapter produced the row. Country, sector,
/// issuer and session are always populated by the classifier; optional
/// fundamentals default to zero when a source omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrRecord {
    pub symbol: Symbol,
    pub name: String,
    pub underlying: String,
    pub market: String,

    pub country: Country,
    pub sector: Sector,
    pub issuer: String,
    pub issuer_code: String,
    /// DR units per underlying unit, verbatim from the source, e.g. "100:1".
    pub ratio: String,

    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: f64,
    pub value: f64,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub prev_close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask: Option<f64>,

    pub market_cap: f64,
    pub pe: f64,
    pub dividend: f64,

    /// Thai session label, duplicated from the descriptor for list views.
    pub trading_hours: String,
    pub trading_session: TradingSession,

    pub logo: String,
    pub last_update: UtcDateTime,
}

impl DrRecord {
    /// Copy the price-bearing fields from a newer observation of the same
    /// symbol, leaving every classifier-derived field untouched.
    pub fn apply_price_update(&mut self, live: &DrRecord) {
        self.price = live.price;
        self.change = live.change;
        self.change_percent = live.change_percent;
        self.volume = live.volume;
        self.value = live.value;
        self.high = live.high;
        self.low = live.low;
        self.open = live.open;
        self.last_update = live.last_update;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify;
    use crate::data_source::RawDrRecord;
    use crate::pipeline;

    fn sample() -> DrRecord {
        let raw = RawDrRecord {
            symbol: String::from("AAPL80"),
            name: String::from("Apple Inc."),
            underlying: String::from("AAPL"),
            market: String::from("NASDAQ"),
            ..RawDrRecord::default()
        };
        pipeline::enrich(&raw, UtcDateTime::now()).expect("valid record")
    }

    #[test]
    fn price_update_preserves_classification() {
        let mut record = sample();
        let mut live = sample();
        live.price = 9.99;
        live.change_percent = 3.2;
        live.sector = Sector::Energy;

        record.apply_price_update(&live);

        assert_eq!(record.price, 9.99);
        assert_eq!(record.change_percent, 3.2);
        assert_eq!(record.sector, Sector::Technology);
        assert_eq!(record.issuer_code, classify::issuer_from_suffix("AAPL80"));
    }
}
