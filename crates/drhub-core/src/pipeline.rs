//! Uniform enrichment of raw adapter rows into canonical records.
//!
//! Every adapter's output passes through the same classifier and the same
//! defaults, so downstream consumers cannot tell which source produced a
//! record.

use std::collections::HashSet;

use tracing::warn;

use crate::classify;
use crate::data_source::RawDrRecord;
use crate::{DrRecord, Symbol, UtcDateTime, ValidationError};

/// Classify and normalize one raw row. Fails only on an unusable symbol;
/// every other field degrades to a documented default.
pub fn enrich(raw: &RawDrRecord, as_of: UtcDateTime) -> Result<DrRecord, ValidationError> {
    let symbol = Symbol::parse(&raw.symbol)?;

    let underlying = if raw.underlying.trim().is_empty() {
        String::from(symbol.without_numeric_suffix())
    } else {
        raw.underlying.trim().to_owned()
    };

    let name = if raw.name.trim().is_empty() {
        format!("{} ({underlying})", symbol.as_str())
    } else {
        raw.name.trim().to_owned()
    };

    let country = classify::resolve_country(&raw.market, &underlying, symbol.as_str());
    let sector = classify::resolve_sector(&name, &underlying);
    let issuer_code = classify::issuer_from_suffix(symbol.as_str());
    let issuer = classify::issuer_name(&issuer_code);
    let session = classify::trading_session(&raw.market, country, &underlying);
    let logo = classify::company_glyph(&name, symbol.as_str());

    let ratio = if raw.ratio.trim().is_empty() {
        String::from("100:1")
    } else {
        raw.ratio.trim().to_owned()
    };

    Ok(DrRecord {
        symbol,
        name,
        underlying,
        market: raw.market.trim().to_owned(),
        country,
        sector,
        issuer,
        issuer_code,
        ratio,
        price: finite_or_zero(raw.price),
        change: finite_or_zero(raw.change),
        change_percent: finite_or_zero(raw.change_percent),
        volume: finite_or_zero(raw.volume),
        value: finite_or_zero(raw.value),
        high: finite_or_zero(raw.high),
        low: finite_or_zero(raw.low),
        open: finite_or_zero(raw.open),
        prev_close: finite_or_zero(raw.prev_close),
        bid: raw.bid.filter(|v| v.is_finite()),
        ask: raw.ask.filter(|v| v.is_finite()),
        market_cap: finite_or_zero(raw.market_cap),
        pe: finite_or_zero(raw.pe),
        dividend: finite_or_zero(raw.dividend),
        trading_hours: session.session.clone(),
        trading_session: session,
        logo: String::from(logo),
        last_update: as_of,
    })
}

/// Enrich a whole batch, dropping rows with unusable symbols and duplicate
/// symbols (first occurrence wins, preserving source order).
pub fn enrich_all(raws: &[RawDrRecord], as_of: UtcDateTime) -> Vec<DrRecord> {
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(raws.len());

    for raw in raws {
        match enrich(raw, as_of) {
            Ok(record) => {
                if seen.insert(record.symbol.clone()) {
                    records.push(record);
                } else {
                    warn!(symbol = %record.symbol, "duplicate symbol in feed, keeping first");
                }
            }
            Err(error) => {
                warn!(symbol = raw.symbol, %error, "dropping row with unusable symbol");
            }
        }
    }

    records
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Country, Sector};

    fn raw(symbol: &str) -> RawDrRecord {
        RawDrRecord {
            symbol: String::from(symbol),
            ..RawDrRecord::default()
        }
    }

    #[test]
    fn aapl80_end_to_end_classification() {
        let raw = RawDrRecord {
            symbol: String::from("AAPL80"),
            market: String::from("NASDAQ"),
            underlying: String::from("AAPL"),
            price: 6.45,
            change_percent: 0.78,
            ..RawDrRecord::default()
        };

        let record = enrich(&raw, UtcDateTime::now()).expect("valid record");

        assert_eq!(record.country, Country::Us);
        assert_eq!(record.sector, Sector::Technology);
        assert_eq!(record.issuer_code, "KTB");
        assert!(record.trading_session.has_night_trading);
        assert_eq!(record.price, 6.45);
        assert_eq!(record.change_percent, 0.78);
    }

    #[test]
    fn classifier_fields_are_always_populated() {
        let record = enrich(&raw("ZZZT99"), UtcDateTime::now()).expect("valid record");

        assert!(!record.issuer.is_empty());
        assert!(!record.issuer_code.is_empty());
        assert!(!record.trading_hours.is_empty());
        assert_eq!(record.issuer_code, "CODE99");
        // No venue, no known prefix: documented defaults.
        assert_eq!(record.country, Country::Us);
        assert_eq!(record.sector, Sector::Technology);
    }

    #[test]
    fn empty_underlying_derives_from_symbol() {
        let record = enrich(&raw("NVDA80"), UtcDateTime::now()).expect("valid record");
        assert_eq!(record.underlying, "NVDA");
        assert_eq!(record.name, "NVDA80 (NVDA)");
    }

    #[test]
    fn batch_enrichment_dedupes_and_skips_bad_symbols() {
        let rows = vec![raw("AAPL80"), raw(""), raw("AAPL80"), raw("MSFT80")];
        let records = enrich_all(&rows, UtcDateTime::now());

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].symbol.as_str(), "AAPL80");
        assert_eq!(records[1].symbol.as_str(), "MSFT80");
    }

    #[test]
    fn non_finite_figures_degrade_to_zero() {
        let mut row = raw("AAPL80");
        row.pe = f64::NAN;
        row.market_cap = f64::INFINITY;
        let record = enrich(&row, UtcDateTime::now()).expect("valid record");
        assert_eq!(record.pe, 0.0);
        assert_eq!(record.market_cap, 0.0);
    }
}
