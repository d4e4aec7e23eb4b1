//! Price formatting for display.
//!
//! Amounts are shown the way the Dominican storefront shows them: currency
//! symbol first, `,` thousands separators, `.` for decimals and no trailing
//! fractional zeros (`RD$1,500`, `US$24.5`).
//!
//! Formatting never fails. An amount that is not a finite number is echoed
//! as-is, and a currency code that is not a known ISO 4217 code falls back to
//! `"<CODE> <amount>"`.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::iso;

/// Currency used when the CMS does not specify one.
pub const DEFAULT_CURRENCY: &str = "DOP";

/// Fraction digits kept when the currency is unknown.
const FALLBACK_FRACTION_DIGITS: u32 = 3;

/// Format an amount in the given currency.
///
/// ```
/// use foxsports_core::format_currency;
///
/// assert_eq!(format_currency(1500.0, "DOP"), "RD$1,500");
/// assert_eq!(format_currency(100.0, "XXX-invalid"), "XXX-invalid 100");
/// assert_eq!(format_currency(f64::NAN, "DOP"), "NaN");
/// ```
#[must_use]
pub fn format_currency(amount: f64, currency: &str) -> String {
    let Some(value) = Decimal::from_f64(amount) else {
        return amount.to_string();
    };

    let code = currency.trim().to_ascii_uppercase();
    match iso::find(&code) {
        Some(found) => {
            let (negative, digits) = group_thousands(value, u32::from(found.exponent));
            let sign = if negative { "-" } else { "" };
            format!("{sign}{}{digits}", display_symbol(&code, found.symbol))
        }
        None => {
            let (negative, digits) = group_thousands(value, FALLBACK_FRACTION_DIGITS);
            let sign = if negative { "-" } else { "" };
            format!("{currency} {sign}{digits}")
        }
    }
}

/// Symbol shown in front of an amount.
///
/// Dollar-denominated currencies are disambiguated the way the `es-DO`
/// locale does it.
fn display_symbol<'a>(code: &str, symbol: &'a str) -> &'a str {
    match code {
        "DOP" => "RD$",
        "USD" => "US$",
        _ => symbol,
    }
}

/// Round to at most `max_fraction_digits`, drop trailing zeros and insert
/// thousands separators.
///
/// Returns whether the rounded amount is negative alongside the unsigned
/// digits, so the caller can put the sign in front of the symbol.
fn group_thousands(value: Decimal, max_fraction_digits: u32) -> (bool, String) {
    let rounded = value
        .round_dp_with_strategy(max_fraction_digits, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.abs().to_string();
    let (integer, fraction) = text.split_once('.').map_or((text.as_str(), None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = match fraction {
        Some(fraction) => format!("{grouped}.{fraction}"),
        None => grouped,
    };
    (negative, digits)
}
