//! Lenient deserializers for backend payloads.
//!
//! The order API is inconsistent about number encoding: ids arrive as
//! integers or strings, and decimal columns arrive as JSON strings.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Deserializer, de::Error};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
}

impl NumberOrString {
    fn into_text(self) -> String {
        match self {
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text,
        }
    }
}

fn parse_amount<E: Error>(raw: &str) -> Result<u64, E> {
    let decimal = raw
        .trim()
        .parse::<Decimal>()
        .map_err(|error| E::custom(format!("invalid amount {raw:?}: {error}")))?;

    decimal
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or_else(|| E::custom(format!("amount {raw:?} is negative or out of range")))
}

/// Identifier that may be encoded as a JSON number or string.
pub(crate) fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(NumberOrString::deserialize(deserializer)?.into_text())
}

/// Non-negative amount in minor units, as a number or a decimal string.
pub(crate) fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    parse_amount(&NumberOrString::deserialize(deserializer)?.into_text())
}

/// Optional amount; `null` maps to `None`.
pub(crate) fn optional_amount<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u64>, D::Error> {
    Option::<NumberOrString>::deserialize(deserializer)?
        .map(|value| parse_amount(&value.into_text()))
        .transpose()
}

/// Floating point value, as a number or a decimal string.
pub(crate) fn float<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = NumberOrString::deserialize(deserializer)?.into_text();

    raw.trim()
        .parse::<f64>()
        .map_err(|error| D::Error::custom(format!("invalid number {raw:?}: {error}")))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;
    use testresult::TestResult;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "super::id")]
        id: String,

        #[serde(deserialize_with = "super::amount")]
        price: u64,

        #[serde(default, deserialize_with = "super::optional_amount")]
        cap: Option<u64>,

        #[serde(deserialize_with = "super::float")]
        value: f64,
    }

    #[test]
    fn accepts_numbers_and_strings() -> TestResult {
        let numeric: Sample =
            serde_json::from_value(json!({ "id": 7, "price": 1500, "cap": null, "value": 10 }))?;

        let textual: Sample = serde_json::from_value(
            json!({ "id": "7", "price": "1500.00", "cap": "200", "value": "12.5" }),
        )?;

        assert_eq!(numeric.id, "7");
        assert_eq!(numeric.price, 1500);
        assert_eq!(numeric.cap, None);
        assert!((numeric.value - 10.0).abs() < f64::EPSILON);

        assert_eq!(textual.id, "7");
        assert_eq!(textual.price, 1500);
        assert_eq!(textual.cap, Some(200));
        assert!((textual.value - 12.5).abs() < f64::EPSILON);

        Ok(())
    }

    #[test]
    fn missing_optional_amount_defaults_to_none() -> TestResult {
        let sample: Sample = serde_json::from_value(json!({ "id": "a", "price": 1, "value": 0 }))?;

        assert_eq!(sample.cap, None);

        Ok(())
    }

    #[test]
    fn rejects_negative_amounts() {
        let result =
            serde_json::from_value::<Sample>(json!({ "id": 1, "price": -5, "value": 1 }));

        assert!(result.is_err());
    }
}
