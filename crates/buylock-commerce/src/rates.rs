//! Exchange-rate tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::currency::{Currency, BASE_CURRENCY};
use crate::error::CommerceError;

/// Rates used when the endpoint cannot be reached. One base unit buys this
/// much of each currency.
const FALLBACK_RATES: [(Currency, f64); 9] = [
    (Currency::KES, 1.0),
    (Currency::USD, 0.0077),
    (Currency::EUR, 0.0071),
    (Currency::GBP, 0.0061),
    (Currency::UGX, 28.5),
    (Currency::TZS, 20.1),
    (Currency::RWF, 10.9),
    (Currency::NGN, 11.9),
    (Currency::ZAR, 0.14),
];

/// Mapping from currency code to multiplier relative to the base currency.
///
/// Codes are stored upper-case. Codes outside [`Currency::ALL`] are kept as
/// received but never used for conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    rates: BTreeMap<String, f64>,
}

impl RateTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The static table used when no fresh or cached rates are available.
    pub fn fallback() -> Self {
        FALLBACK_RATES
            .iter()
            .map(|(currency, rate)| (currency.code().to_string(), *rate))
            .collect()
    }

    /// Build a table from an endpoint payload.
    ///
    /// The payload must be a JSON object. Entries whose value is not a number
    /// are skipped; nothing else about the shape is checked.
    pub fn from_json(value: serde_json::Value) -> Result<Self, CommerceError> {
        let serde_json::Value::Object(map) = value else {
            return Err(CommerceError::InvalidRateResponse(
                "expected an object of currency codes".to_string(),
            ));
        };

        let mut table = Self::new();
        for (code, rate) in map {
            match rate.as_f64() {
                Some(rate) => table.insert(&code, rate),
                None => tracing::debug!(code = %code, "skipping non-numeric rate"),
            }
        }
        Ok(table)
    }

    /// Insert or replace a rate.
    pub fn insert(&mut self, code: &str, rate: f64) {
        self.rates.insert(code.trim().to_ascii_uppercase(), rate);
    }

    /// Usable rate for a currency.
    ///
    /// Missing entries and entries that are not positive finite numbers are
    /// `None`, so no conversion ever divides by zero.
    pub fn get(&self, currency: Currency) -> Option<f64> {
        self.rates
            .get(currency.code())
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
    }

    /// Multiplier for a currency, falling back to identity when unusable.
    pub fn multiplier(&self, currency: Currency) -> f64 {
        self.get(currency).unwrap_or(1.0)
    }

    /// Supported currencies with no usable rate in this table.
    pub fn missing(&self) -> Vec<Currency> {
        Currency::ALL
            .into_iter()
            .filter(|c| !c.is_base() && self.get(*c).is_none())
            .collect()
    }

    /// Iterate over every stored entry in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Rate of the base currency as stored, for sanity checks.
    pub fn base_rate(&self) -> Option<f64> {
        self.get(BASE_CURRENCY)
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (code, rate) in iter {
            let code: String = code.into();
            table.insert(&code, rate);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fallback_covers_every_currency() {
        let table = RateTable::fallback();
        assert!(table.missing().is_empty());
        assert_eq!(table.base_rate(), Some(1.0));
    }

    #[test]
    fn test_from_json_keeps_numeric_entries() {
        let table = RateTable::from_json(json!({
            "usd": 0.0062,
            "EUR": "0.0071",
            "GBP": 0.0061
        }))
        .unwrap();

        assert_eq!(table.get(Currency::USD), Some(0.0062));
        assert_eq!(table.get(Currency::EUR), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(matches!(
            RateTable::from_json(json!([1, 2, 3])),
            Err(CommerceError::InvalidRateResponse(_))
        ));
    }

    #[test]
    fn test_unusable_rates_fall_back_to_identity() {
        let table: RateTable = [("USD", 0.0), ("EUR", -2.0), ("GBP", f64::NAN)]
            .into_iter()
            .collect();

        assert_eq!(table.multiplier(Currency::USD), 1.0);
        assert_eq!(table.multiplier(Currency::EUR), 1.0);
        assert_eq!(table.multiplier(Currency::GBP), 1.0);
        assert_eq!(table.multiplier(Currency::ZAR), 1.0);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let table: RateTable = [("USD", 0.5)].into_iter().collect();
        assert_eq!(serde_json::to_string(&table).unwrap(), r#"{"USD":0.5}"#);
    }
}
