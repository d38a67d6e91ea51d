//! Heuristic classification of ragged DR rows into the canonical schema.
//!
//! Every function here is pure and deterministic, and every fallthrough
//! ends in a documented default, never an error: classification must not be
//! able to drop a record.
//!
//! The heuristics are expressed as ordered rule tables walked top to bottom.
//! Rule order is load-bearing — later rules are intentionally narrower and
//! only apply when earlier, higher-confidence signals are absent.

use crate::{Country, Sector, TradingSession};

/// Venue-token rules, checked against the market/exchange field first.
/// A venue match always wins over symbol-prefix heuristics.
const VENUE_RULES: &[(&[&str], Country)] = &[
    (&["NASDAQ", "NYSE", "US"], Country::Us),
    (&["HKEX", "HK"], Country::Hk),
    (&["SSE", "SZSE", "SHANGHAI", "SHENZHEN"], Country::Cn),
    (&["TSE", "TOKYO", "JP"], Country::Jp),
    (&["SGX", "SINGAPORE"], Country::Sg),
    (&["HOSE", "HNX", "VN"], Country::Vn),
    (
        &[
            "EURONEXT",
            "LSE",
            "XETRA",
            "CPH",
            "OMX",
            "XLON",
            "COPENHAGEN",
            "PARIS",
            "AMSTERDAM",
        ],
        Country::Eu,
    ),
    (&["TWSE", "TPEX"], Country::Tw),
    (&["KRX", "KOSPI"], Country::Kr),
];

/// Well-known underlying-symbol prefixes, consulted when the venue is mute.
const UNDERLYING_PREFIX_RULES: &[(&[&str], Country)] = &[
    (
        &[
            "AAPL", "MSFT", "GOOGL", "META", "AMZN", "NVDA", "TSLA", "NFLX", "AMD", "INTC",
        ],
        Country::Us,
    ),
    (&["BABA", "JD", "PDD", "BIDU", "NIO"], Country::Cn),
    (&["TENCENT", "XIAOMI", "MEITUAN", "BYD"], Country::Hk),
    (&["TOYOTA", "SONY", "NINTENDO", "HONDA"], Country::Jp),
    (
        &["NOVOB", "NOVO", "NVO", "ASML", "MC", "RMS", "LVMH", "HERMES"],
        Country::Eu,
    ),
];

/// European names recognizable from the DR symbol itself, e.g. NOVOB80.
const DR_SYMBOL_PREFIX_RULES: &[(&[&str], Country)] =
    &[(&["NOVOB", "ASML", "LVMH", "HERMES"], Country::Eu)];

fn match_substring(haystack: &str, rules: &[(&[&str], Country)]) -> Option<Country> {
    rules
        .iter()
        .find(|(tokens, _)| tokens.iter().any(|token| haystack.contains(token)))
        .map(|(_, country)| *country)
}

fn match_prefix(haystack: &str, rules: &[(&[&str], Country)]) -> Option<Country> {
    rules
        .iter()
        .find(|(tokens, _)| tokens.iter().any(|token| haystack.starts_with(token)))
        .map(|(_, country)| *country)
}

/// Resolve the underlying's home market. The cascade order must be
/// preserved: venue tokens, then underlying prefixes, then DR-symbol
/// prefixes, then the US default.
pub fn resolve_country(market: &str, underlying: &str, symbol: &str) -> Country {
    let market = market.to_ascii_uppercase();
    let underlying = underlying.to_ascii_uppercase();
    let symbol = symbol.to_ascii_uppercase();

    if let Some(country) = match_substring(&market, VENUE_RULES) {
        return country;
    }
    if let Some(country) = match_prefix(&underlying, UNDERLYING_PREFIX_RULES) {
        return country;
    }
    if let Some(country) = match_prefix(&symbol, DR_SYMBOL_PREFIX_RULES) {
        return country;
    }

    Country::Us
}

/// Venues whose DRs trade the SET night session.
const NIGHT_VENUES: &[&str] = &[
    "NASDAQ",
    "NYSE",
    "US",
    "EURONEXT",
    "LSE",
    "XETRA",
    "PARIS",
    "AMSTERDAM",
];

const NIGHT_COUNTRIES: &[Country] = &[Country::Us, Country::Eu];

/// High-liquidity US tickers that trade the night session even when the
/// venue field is missing or unrecognized.
const NIGHT_US_TICKERS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "GOOG", "META", "AMZN", "NVDA", "TSLA", "NFLX", "AMD", "INTC",
    "COIN", "PLTR", "UBER", "SHOP", "SQ", "PYPL", "CRM", "ORCL", "ADBE", "DIS", "V", "MA",
    "JPM", "BAC", "WMT", "PG", "JNJ", "UNH", "HD", "KO", "PEP", "MCD", "NKE", "SBUX", "COST",
    "TGT", "CVS", "WBA", "XOM", "CVX", "COP", "MRK", "PFE", "ABBV", "LLY", "TMO", "ABT",
    "BMY", "GILD",
];

/// Derive the trading-session descriptor. US and European markets get the
/// overnight window; Asian markets trade the day session only.
pub fn trading_session(market: &str, country: Country, underlying: &str) -> TradingSession {
    let market = market.to_ascii_uppercase();
    let underlying = underlying.to_ascii_uppercase();

    let has_night = NIGHT_VENUES.iter().any(|venue| market.contains(venue))
        || NIGHT_COUNTRIES.contains(&country)
        || NIGHT_US_TICKERS
            .iter()
            .any(|ticker| underlying.starts_with(ticker));

    if has_night {
        TradingSession::with_night()
    } else {
        TradingSession::day_only()
    }
}

/// Sector keyword table, first match wins.
const SECTOR_RULES: &[(&[&str], Sector)] = &[
    (&["ETF", "INDEX", "FUND"], Sector::Etf),
    (&["BANK", "FINANCE", "INSURANCE", "CREDIT"], Sector::Finance),
    (
        &["TECH", "SOFTWARE", "SEMICONDUCTOR", "CHIP", "COMPUTER", "CLOUD", "AI"],
        Sector::Technology,
    ),
    (&["AUTO", "CAR", "MOTOR", "EV", "ELECTRIC VEHICLE"], Sector::Auto),
    (
        &["RETAIL", "ECOMMERCE", "CONSUMER", "SHOP", "AMAZON", "ALIBABA", "JD"],
        Sector::Consumer,
    ),
    (
        &["PHARMA", "HEALTH", "MEDICAL", "BIOTECH", "DRUG"],
        Sector::Healthcare,
    ),
    (&["LUXURY", "LVMH", "HERMES", "GUCCI", "FASHION"], Sector::Luxury),
    (
        &["GAME", "ENTERTAINMENT", "MEDIA", "NETFLIX", "DISNEY", "STREAM"],
        Sector::Entertainment,
    ),
    (&["OIL", "GAS", "ENERGY", "POWER", "SOLAR", "WIND"], Sector::Energy),
    (&["REAL ESTATE", "REIT", "PROPERTY"], Sector::RealEstate),
    (&["TELECOM", "COMMUNICATION", "5G"], Sector::Telecom),
];

/// Resolve a sector from the display name and underlying code.
///
/// The default is Technology, not an "Unknown" bucket: the DR universe is
/// dominated by tech listings and the original classifier leans on that.
pub fn resolve_sector(name: &str, underlying: &str) -> Sector {
    let haystack = format!("{name} {underlying}").to_ascii_uppercase();

    SECTOR_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| haystack.contains(kw)))
        .map(|(_, sector)| *sector)
        .unwrap_or(Sector::Technology)
}

/// SET issuer codes keyed by the DR symbol's two-digit numeric suffix.
const ISSUER_SUFFIX_RULES: &[(&str, &str)] = &[
    ("80", "KTB"),
    ("01", "BLS"),
    ("13", "KGI"),
    ("19", "YUANTA"),
    ("06", "KKP"),
    ("24", "FSS"),
    ("29", "PI"),
    ("03", "PI"),
    ("23", "INVX"),
    ("27", "INVX"),
    ("41", "JPM"),
    ("28", "MQ"),
    ("08", "ASPS"),
    ("16", "TNS"),
    ("42", "CITI"),
    ("11", "KS"),
];

const ISSUER_NAMES: &[(&str, &str)] = &[
    ("KTB", "ธ.กรุงไทย"),
    ("BLS", "บล.บัวหลวง"),
    ("INVX", "บล.อินโนเวสท์ เอกซ์"),
    ("KGI", "บล.เคจีไอ"),
    ("YUANTA", "บล.หยวนต้า"),
    ("JPM", "JPMorgan"),
    ("KKP", "บล.เกียรตินาคินภัทร"),
    ("MQ", "Macquarie"),
    ("FSS", "บล.ฟินันเซีย ไซรัส"),
    ("ASPS", "บล.เอเซีย พลัส"),
    ("TNS", "บล.ธนชาต"),
    ("PI", "บล.พาย"),
    ("CITI", "Citibank"),
    ("KS", "KS Securities"),
];

/// Issuer code from the DR symbol's numeric suffix. Unmapped suffixes get a
/// synthetic `CODE<suffix>`; symbols with no digit suffix get `OTHER`.
pub fn issuer_from_suffix(symbol: &str) -> String {
    let symbol = symbol.trim().to_ascii_uppercase();

    for (suffix, code) in ISSUER_SUFFIX_RULES {
        if symbol.ends_with(suffix) {
            return String::from(*code);
        }
    }

    let digits_start = symbol
        .trim_end_matches(|ch: char| ch.is_ascii_digit())
        .len();
    if digits_start == symbol.len() {
        String::from("OTHER")
    } else {
        format!("CODE{}", &symbol[digits_start..])
    }
}

/// Thai display name for an issuer code, with synthesized names for
/// unmapped suffix codes and a generic "unspecified" fallback.
pub fn issuer_name(code: &str) -> String {
    for (known, name) in ISSUER_NAMES {
        if *known == code {
            return String::from(*name);
        }
    }

    if let Some(suffix) = code.strip_prefix("CODE") {
        return format!("รหัส {suffix}");
    }

    String::from("ไม่ระบุ")
}

const GLYPH_RULES: &[(&[&str], &str)] = &[
    (&["APPLE", "AAPL"], "🍎"),
    (&["MICROSOFT", "MSFT"], "🪟"),
    (&["GOOGLE", "ALPHABET", "GOOGL"], "🔍"),
    (&["AMAZON", "AMZN"], "📦"),
    (&["META", "FACEBOOK"], "📱"),
    (&["NVIDIA", "NVDA"], "🎮"),
    (&["TESLA", "TSLA"], "🚗"),
    (&["NETFLIX", "NFLX"], "🎬"),
    (&["ALIBABA", "BABA"], "🛍️"),
    (&["TENCENT"], "💬"),
    (&["XIAOMI"], "📲"),
    (&["BYD"], "🔋"),
    (&["MEITUAN"], "🍜"),
    (&["JD"], "🏪"),
    (&["TOYOTA"], "🚙"),
    (&["SONY"], "🎮"),
    (&["NINTENDO"], "🍄"),
    (&["HONDA"], "🏍️"),
    (&["LVMH"], "👜"),
    (&["HERMES"], "🧣"),
    (&["ASML"], "🔬"),
    (&["BANK", "DBS", "UOB"], "🏦"),
    (&["ETF", "INDEX"], "📈"),
    (&["VN"], "🇻🇳"),
];

/// Presentational glyph for list views. Purely cosmetic.
pub fn company_glyph(name: &str, symbol: &str) -> &'static str {
    let haystack = format!("{name} {symbol}").to_ascii_uppercase();

    GLYPH_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| haystack.contains(kw)))
        .map(|(_, glyph)| *glyph)
        .unwrap_or("📊")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn venue_tokens_resolve_country() {
        assert_eq!(resolve_country("NASDAQ", "", ""), Country::Us);
        assert_eq!(resolve_country("HKEX", "", ""), Country::Hk);
        assert_eq!(resolve_country("Euronext Paris", "", ""), Country::Eu);
        assert_eq!(resolve_country("HOSE", "", ""), Country::Vn);
        assert_eq!(resolve_country("KOSPI", "", ""), Country::Kr);
    }

    #[test]
    fn venue_rule_wins_over_underlying_prefix() {
        // Constructed conflict: HK venue with a US-looking underlying. The
        // venue carries more signal and must win.
        assert_eq!(resolve_country("HKEX", "AAPL", "AAPL80"), Country::Hk);
    }

    #[test]
    fn underlying_prefix_applies_when_venue_is_unknown() {
        assert_eq!(resolve_country("N/A", "BABA", "BABA80"), Country::Cn);
        assert_eq!(resolve_country("", "TOYOTA", "TOYOTA19"), Country::Jp);
    }

    #[test]
    fn dr_symbol_prefix_is_the_last_resort_before_default() {
        assert_eq!(resolve_country("", "", "NOVOB80"), Country::Eu);
        assert_eq!(resolve_country("", "", "XYZ99"), Country::Us);
    }

    #[test]
    fn country_resolution_is_idempotent() {
        let first = resolve_country("NASDAQ", "AAPL", "AAPL80");
        let second = resolve_country("NASDAQ", "AAPL", "AAPL80");
        assert_eq!(first, second);
    }

    #[test]
    fn us_market_gets_night_session() {
        let session = trading_session("NASDAQ", Country::Us, "AAPL");
        assert!(session.has_night_trading);
        assert!(session.night_session.is_some());
    }

    #[test]
    fn hk_market_is_day_only() {
        let session = trading_session("HKEX", Country::Hk, "0700.HK");
        assert!(!session.has_night_trading);
        assert!(session.night_session.is_none());
    }

    #[test]
    fn liquid_us_ticker_gets_night_session_without_venue() {
        let session = trading_session("", Country::Hk, "COIN");
        assert!(session.has_night_trading);
    }

    #[test]
    fn sector_keyword_order_first_match_wins() {
        // "BANK" appears before the tech keywords, so a name containing both
        // classifies as Finance.
        assert_eq!(resolve_sector("Tech Bank Holding", ""), Sector::Finance);
        assert_eq!(resolve_sector("Hang Seng TECH Index ETF", ""), Sector::Etf);
    }

    #[test]
    fn sector_defaults_to_technology() {
        assert_eq!(resolve_sector("Apple Inc.", "AAPL"), Sector::Technology);
        assert_eq!(resolve_sector("", ""), Sector::Technology);
    }

    #[test]
    fn issuer_suffix_lookup() {
        assert_eq!(issuer_from_suffix("AAPL80"), "KTB");
        assert_eq!(issuer_from_suffix("GOOGL01"), "BLS");
        assert_eq!(issuer_from_suffix("HKTECH13"), "KGI");
        assert_eq!(issuer_from_suffix("TOYOTA19"), "YUANTA");
    }

    #[test]
    fn unmapped_suffix_becomes_synthetic_code() {
        assert_eq!(issuer_from_suffix("FOO77"), "CODE77");
        assert_eq!(issuer_from_suffix("TENCENT"), "OTHER");
    }

    #[test]
    fn issuer_names_cover_synthetic_and_unknown_codes() {
        assert_eq!(issuer_name("KTB"), "ธ.กรุงไทย");
        assert_eq!(issuer_name("CODE77"), "รหัส 77");
        assert_eq!(issuer_name("SOMETHING"), "ไม่ระบุ");
    }

    #[test]
    fn glyph_defaults_to_chart() {
        assert_eq!(company_glyph("Apple Inc.", "AAPL80"), "🍎");
        assert_eq!(company_glyph("Unknown Corp", "ZZZZ"), "📊");
    }
}
