//! Supported display currencies.
//!
//! Prices are stored in the base currency (Kenyan shillings); every other
//! currency is a display currency reached through the rate table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CommerceError;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    KES,
    USD,
    EUR,
    GBP,
    UGX,
    TZS,
    RWF,
    NGN,
    ZAR,
}

/// The currency every price is canonically stored in.
pub const BASE_CURRENCY: Currency = Currency::KES;

impl Currency {
    /// Every selectable currency, base first.
    pub const ALL: [Currency; 9] = [
        Currency::KES,
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::UGX,
        Currency::TZS,
        Currency::RWF,
        Currency::NGN,
        Currency::ZAR,
    ];

    /// Get the currency code (e.g., "KES").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::KES => "KES",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::UGX => "UGX",
            Currency::TZS => "TZS",
            Currency::RWF => "RWF",
            Currency::NGN => "NGN",
            Currency::ZAR => "ZAR",
        }
    }

    /// Get the display name (e.g., "Kenyan Shilling").
    pub fn name(&self) -> &'static str {
        match self {
            Currency::KES => "Kenyan Shilling",
            Currency::USD => "US Dollar",
            Currency::EUR => "Euro",
            Currency::GBP => "British Pound",
            Currency::UGX => "Ugandan Shilling",
            Currency::TZS => "Tanzanian Shilling",
            Currency::RWF => "Rwandan Franc",
            Currency::NGN => "Nigerian Naira",
            Currency::ZAR => "South African Rand",
        }
    }

    /// Get the currency symbol (e.g., "KSh").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::KES => "KSh",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::UGX => "USh",
            Currency::TZS => "TSh",
            Currency::RWF => "FRw",
            Currency::NGN => "\u{20a6}",
            Currency::ZAR => "R",
        }
    }

    /// Get the country flag shown next to the currency in pickers.
    pub fn flag(&self) -> &'static str {
        match self {
            Currency::KES => "\u{1f1f0}\u{1f1ea}",
            Currency::USD => "\u{1f1fa}\u{1f1f8}",
            Currency::EUR => "\u{1f1ea}\u{1f1fa}",
            Currency::GBP => "\u{1f1ec}\u{1f1e7}",
            Currency::UGX => "\u{1f1fa}\u{1f1ec}",
            Currency::TZS => "\u{1f1f9}\u{1f1ff}",
            Currency::RWF => "\u{1f1f7}\u{1f1fc}",
            Currency::NGN => "\u{1f1f3}\u{1f1ec}",
            Currency::ZAR => "\u{1f1ff}\u{1f1e6}",
        }
    }

    /// Number of fraction digits used when rendering amounts.
    ///
    /// The base currency is shown in whole units; everything else uses 2.
    pub fn fraction_digits(&self) -> usize {
        if self.is_base() {
            0
        } else {
            2
        }
    }

    /// Whether this is the base currency.
    pub fn is_base(&self) -> bool {
        *self == BASE_CURRENCY
    }

    /// Parse a currency code string (case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl FromStr for Currency {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| CommerceError::UnsupportedCurrency(s.to_string()))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_currency_defaults() {
        assert_eq!(Currency::default(), BASE_CURRENCY);
        assert!(Currency::KES.is_base());
        assert_eq!(Currency::KES.fraction_digits(), 0);
        assert_eq!(Currency::USD.fraction_digits(), 2);
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code(" eur "), Some(Currency::EUR));
        assert_eq!(Currency::from_code("INVALID"), None);
        assert!(matches!(
            "XXX".parse::<Currency>(),
            Err(CommerceError::UnsupportedCurrency(code)) if code == "XXX"
        ));
    }

    #[test]
    fn test_codes_round_trip_through_all() {
        for currency in Currency::ALL {
            assert_eq!(Currency::from_code(currency.code()), Some(currency));
            assert!(!currency.name().is_empty());
            assert!(!currency.symbol().is_empty());
        }
    }

    #[test]
    fn test_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Currency::GBP).unwrap(), "\"GBP\"");
    }
}
