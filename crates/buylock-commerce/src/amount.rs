//! Monetary inputs that arrive either as numbers or as decimal strings.
//!
//! Catalog records carry prices as strings (`"1500.00"`) while user input and
//! arithmetic produce numbers. [`Amount`] accepts both and makes the parse
//! step explicit.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CommerceError;

/// A number or a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    /// Resolve to a finite floating-point value.
    ///
    /// Text is trimmed and parsed as a decimal. Non-numeric text, and values
    /// such as `"NaN"` or `"inf"` that parse but are not finite, are
    /// [`CommerceError::InvalidAmount`].
    pub fn value(&self) -> Result<f64, CommerceError> {
        let value = match self {
            Amount::Number(n) => *n,
            Amount::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| CommerceError::InvalidAmount(s.clone()))?,
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(CommerceError::InvalidAmount(self.to_string()))
        }
    }

    /// Resolve to a value, substituting zero when the input is unusable.
    pub fn value_or_zero(&self) -> f64 {
        self.value().unwrap_or(0.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(n) => write!(f, "{}", n),
            Amount::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Amount {
    fn from(n: f64) -> Self {
        Amount::Number(n)
    }
}

impl From<i64> for Amount {
    fn from(n: i64) -> Self {
        Amount::Number(n as f64)
    }
}

impl From<u32> for Amount {
    fn from(n: u32) -> Self {
        Amount::Number(f64::from(n))
    }
}

impl From<&str> for Amount {
    fn from(s: &str) -> Self {
        Amount::Text(s.to_string())
    }
}

impl From<String> for Amount {
    fn from(s: String) -> Self {
        Amount::Text(s)
    }
}

impl From<&Amount> for Amount {
    fn from(a: &Amount) -> Self {
        a.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_text_parses() {
        assert_eq!(Amount::from("1500.50").value().unwrap(), 1500.5);
        assert_eq!(Amount::from(" 42 ").value().unwrap(), 42.0);
        assert_eq!(Amount::from(7_i64).value().unwrap(), 7.0);
    }

    #[test]
    fn test_non_numeric_text_is_error() {
        assert!(matches!(
            Amount::from("abc").value(),
            Err(CommerceError::InvalidAmount(_))
        ));
        assert!(Amount::from("").value().is_err());
        assert_eq!(Amount::from("abc").value_or_zero(), 0.0);
    }

    #[test]
    fn test_non_finite_is_error() {
        assert!(Amount::from("NaN").value().is_err());
        assert!(Amount::from("inf").value().is_err());
        assert!(Amount::from(f64::NAN).value().is_err());
    }

    #[test]
    fn test_deserializes_number_or_string() {
        let n: Amount = serde_json::from_str("1500").unwrap();
        let s: Amount = serde_json::from_str("\"1500.00\"").unwrap();
        assert_eq!(n.value().unwrap(), s.value().unwrap());
    }
}
