//! Currency helpers: cent rounding, amount parsing and the JSON number adapter

use bigdecimal::{BigDecimal, FromPrimitive, RoundingMode, ToPrimitive, Zero};
use std::str::FromStr;

/// Round a currency value to 2 decimal places, halves away from zero.
///
/// Every addition in the ledger pipeline goes through this; balances are
/// never carried in unrounded form.
pub fn round_currency(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}

/// `round(a + b)`
pub fn add_rounded(a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
    round_currency(&(a + b))
}

/// `round(a - b)`
pub fn sub_rounded(a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
    round_currency(&(a - b))
}

/// Sum with rounding after each step.
pub fn sum_rounded<'a, I>(values: I) -> BigDecimal
where
    I: IntoIterator<Item = &'a BigDecimal>,
{
    values
        .into_iter()
        .fold(zero(), |total, value| add_rounded(&total, value))
}

pub fn zero() -> BigDecimal {
    round_currency(&BigDecimal::zero())
}

/// Strip thousands separators and currency symbols from a bank amount.
pub fn normalize_amount(raw: &str) -> String {
    raw.replace([',', '$'], "").trim().to_string()
}

/// Scientific notation is not a currency amount, and rounding a large
/// exponent expands it to its full width.
fn has_exponent(value: &str) -> bool {
    value.contains(['e', 'E'])
}

/// Parse a bank-export amount such as `$1,250.50` or `-40.00`.
pub fn parse_amount(raw: &str) -> Option<BigDecimal> {
    let normalized = normalize_amount(raw);
    if normalized.is_empty() || has_exponent(&normalized) {
        return None;
    }
    BigDecimal::from_str(&normalized)
        .ok()
        .map(|amount| round_currency(&amount))
}

/// Format as `$1234.56` (negative values as `$-12.00`).
pub fn format_currency(value: &BigDecimal) -> String {
    format!("${}", round_currency(value))
}

/// Serde adapter storing money as a plain JSON number.
///
/// Accepts numbers or numeric strings on input and rounds to cents.
pub mod as_number {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let number = round_currency(value)
            .to_f64()
            .ok_or_else(|| serde::ser::Error::custom(format!("amount out of range: {value}")))?;
        serializer.serialize_f64(number)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(number) => BigDecimal::from_f64(number)
                .ok_or_else(|| de::Error::custom(format!("invalid amount: {number}")))?,
            RawAmount::Text(text) if has_exponent(&text) => {
                return Err(de::Error::custom(format!("invalid amount '{text}'")));
            }
            RawAmount::Text(text) => BigDecimal::from_str(text.trim())
                .map_err(|e| de::Error::custom(format!("invalid amount '{text}': {e}")))?,
        };
        Ok(round_currency(&parsed))
    }
}

/// [`as_number`] for optional amounts; `null` or a missing field is `None`.
pub mod as_optional_number {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    struct Wrapped(#[serde(with = "super::as_number")] BigDecimal);

    pub fn serialize<S>(value: &Option<BigDecimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => as_number::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(value)| value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_currency_half_away_from_zero() {
        assert_eq!(round_currency(&dec("1.005")), dec("1.01"));
        assert_eq!(round_currency(&dec("-1.005")), dec("-1.01"));
        assert_eq!(round_currency(&dec("2.344")), dec("2.34"));
    }

    #[test]
    fn test_parse_amount_strips_symbols() {
        assert_eq!(parse_amount("$1,250.50"), Some(dec("1250.50")));
        assert_eq!(parse_amount(" -40.00 "), Some(dec("-40")));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_exponent_amounts_rejected() {
        assert_eq!(parse_amount("1e9999999"), None);
        assert_eq!(parse_amount("$2E3"), None);

        #[derive(Debug, serde::Deserialize)]
        struct Doc {
            #[serde(with = "as_number")]
            #[allow(dead_code)]
            amount: BigDecimal,
        }
        let result: Result<Doc, _> = serde_json::from_str(r#"{"amount":"1e999999999"}"#);
        assert!(result.is_err());
        let doc: Doc = serde_json::from_str(r#"{"amount":"12.345"}"#).unwrap();
        assert_eq!(doc.amount, dec("12.35"));
    }

    #[test]
    fn test_sum_rounded() {
        let values = vec![dec("0.10"), dec("0.20"), dec("-0.05")];
        assert_eq!(sum_rounded(&values), dec("0.25"));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(&dec("160")), "$160.00");
        assert_eq!(format_currency(&dec("-12.5")), "$-12.50");
    }
}
