//! Currency conversion and display formatting.
//!
//! Conversion pivots through the base currency. Arithmetic is plain `f64`;
//! rounding happens only when an amount is rendered.

use crate::amount::Amount;
use crate::currency::{Currency, BASE_CURRENCY};
use crate::error::CommerceError;
use crate::rates::RateTable;

/// Convert `amount` from one currency to another.
///
/// - same currency: returned unchanged;
/// - from the base currency: multiplied by the target rate;
/// - otherwise: divided by the source rate, then multiplied by the target rate.
///
/// Missing or unusable rates act as 1.
pub fn convert(amount: f64, from: Currency, to: Currency, rates: &RateTable) -> f64 {
    if from == to {
        return amount;
    }

    if from == BASE_CURRENCY {
        return amount * rates.multiplier(to);
    }

    amount / rates.multiplier(from) * rates.multiplier(to)
}

/// Parse and convert an [`Amount`].
pub fn convert_amount(
    amount: impl Into<Amount>,
    from: Currency,
    to: Currency,
    rates: &RateTable,
) -> Result<f64, CommerceError> {
    let value = amount.into().value()?;
    Ok(convert(value, from, to, rates))
}

/// Render an amount already expressed in `currency`.
///
/// Thousands are grouped with `,`, the decimal separator is `.`, and the
/// number of fraction digits comes from [`Currency::fraction_digits`].
/// Non-finite values render as zero.
///
/// ```
/// use buylock_commerce::{format_amount, Currency};
///
/// assert_eq!(format_amount(1234567.0, Currency::KES), "KSh 1,234,567");
/// assert_eq!(format_amount(6.2, Currency::USD), "$6.20");
/// assert_eq!(format_amount(-1500.5, Currency::EUR), "-\u{20ac}1,500.50");
/// ```
pub fn format_amount(amount: f64, currency: Currency) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let digits = currency.fraction_digits();

    let fixed = format!("{:.*}", digits, amount.abs());
    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut number = group_thousands(whole);
    if let Some(fraction) = fraction {
        number.push('.');
        number.push_str(fraction);
    }

    // Rounding can turn a small negative into zero; don't render "-0".
    let negative = amount < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9'));
    let sign = if negative { "-" } else { "" };

    let symbol = currency.symbol();
    let separator = if symbol.chars().last().is_some_and(char::is_alphabetic) {
        " "
    } else {
        ""
    };

    format!("{sign}{symbol}{separator}{number}")
}

/// Convert from the base currency and render, failing on unparsable input.
pub fn try_format(
    amount: impl Into<Amount>,
    currency: Currency,
    rates: &RateTable,
) -> Result<String, CommerceError> {
    let converted = convert_amount(amount, BASE_CURRENCY, currency, rates)?;
    Ok(format_amount(converted, currency))
}

/// Convert from the base currency and render, substituting zero for
/// unparsable input so the label never contains `NaN`.
pub fn format(amount: impl Into<Amount>, currency: Currency, rates: &RateTable) -> String {
    let amount = amount.into();
    try_format(&amount, currency, rates).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "formatting unparsable amount as zero");
        format_amount(0.0, currency)
    })
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
