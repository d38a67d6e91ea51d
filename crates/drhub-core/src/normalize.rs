//! Lenient numeric parsing for ragged source fields.
//!
//! Both functions are total: malformed input degrades to `0.0` instead of
//! failing the row, so one bad cell never drops a record from the pipeline.

/// Parse a price-like string, tolerating currency symbols, grouping
/// separators and surrounding noise. Unparsable input yields `0.0`.
pub fn parse_price(input: &str) -> f64 {
    let cleaned: String = input
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.' || *ch == '-')
        .collect();
    leading_float(&cleaned)
}

/// Parse a volume/value-like string with thousands separators and an
/// optional magnitude suffix: K = 1e3, M = 1e6, B = 1e9 (case-insensitive).
pub fn parse_volume(input: &str) -> f64 {
    let stripped = input.replace(',', "");
    let base = leading_float(stripped.trim());

    // Suffix precedence matches the upstream feed quirks: M before K before B.
    if stripped.contains('M') || stripped.contains('m') {
        base * 1_000_000.0
    } else if stripped.contains('K') || stripped.contains('k') {
        base * 1_000.0
    } else if stripped.contains('B') || stripped.contains('b') {
        base * 1_000_000_000.0
    } else {
        base
    }
}

/// Longest leading float prefix, `parseFloat` style: an optional sign,
/// digits, at most one decimal point. Empty or invalid prefixes yield `0.0`.
fn leading_float(input: &str) -> f64 {
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;

    for (index, ch) in input.char_indices() {
        match ch {
            '-' | '+' if index == 0 => end = index + 1,
            '.' if !seen_dot => {
                seen_dot = true;
                end = index + 1;
            }
            ch if ch.is_ascii_digit() => {
                seen_digit = true;
                end = index + 1;
            }
            _ => break,
        }
    }

    if !seen_digit {
        return 0.0;
    }

    let value = input[..end].parse::<f64>().unwrap_or(0.0);
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_prices() {
        assert_eq!(parse_price("6.45"), 6.45);
        assert_eq!(parse_price("-0.80"), -0.8);
    }

    #[test]
    fn strips_currency_noise_from_prices() {
        assert_eq!(parse_price("฿1,234.50"), 1234.5);
        assert_eq!(parse_price("$ 14.85 "), 14.85);
        assert_eq!(parse_price("+2.37%"), 2.37);
    }

    #[test]
    fn unparsable_price_degrades_to_zero() {
        assert_eq!(parse_price(""), 0.0);
        assert_eq!(parse_price("N/A"), 0.0);
        assert_eq!(parse_price("--"), 0.0);
    }

    #[test]
    fn volume_applies_magnitude_suffixes() {
        assert_eq!(parse_volume("1,250K"), 1_250_000.0);
        assert_eq!(parse_volume("2.5M"), 2_500_000.0);
        assert_eq!(parse_volume("1b"), 1_000_000_000.0);
        assert_eq!(parse_volume("890000"), 890_000.0);
    }

    #[test]
    fn volume_without_digits_is_zero() {
        assert_eq!(parse_volume(""), 0.0);
        assert_eq!(parse_volume("-"), 0.0);
        assert_eq!(parse_volume("K"), 0.0);
    }

    #[test]
    fn second_decimal_point_terminates_the_number() {
        assert_eq!(parse_price("1.2.3"), 1.2);
    }

    #[test]
    fn results_are_always_finite() {
        for input in ["", "inf", "NaN", "1e309", "9999999999999999999999"] {
            assert!(parse_price(input).is_finite(), "price({input:?})");
            assert!(parse_volume(input).is_finite(), "volume({input:?})");
        }
    }
}
