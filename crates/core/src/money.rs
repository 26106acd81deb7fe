//! Money amounts.
//!
//! Amounts travel as plain JSON numbers (occasionally strings) and are held
//! as [`rust_decimal::Decimal`] throughout. Display follows the platform
//! convention: a `₨` prefix and exactly two decimal places, no digit
//! grouping.

use rust_decimal::Decimal;
use serde_json::Value;

/// Currency symbol used across every view and receipt.
pub const CURRENCY_SYMBOL: &str = "₨";

/// Format an amount with the fixed two-decimal, symbol-prefixed convention.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);

    format!("{CURRENCY_SYMBOL}{rounded}")
}

/// Read an amount from a JSON value.
///
/// Numbers are taken as-is; strings are parsed leniently (trimmed). Anything
/// unparseable resolves to `None` so callers can apply their own fallback.
pub fn from_wire(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                n.as_f64().and_then(Decimal::from_f64_retain)
            }
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_two_decimals() {
        assert_eq!(format_amount(Decimal::from(1000)), "₨1000.00");
        assert_eq!(format_amount(Decimal::new(12345, 1)), "₨1234.50");
    }

    #[test]
    fn rounds_excess_precision() {
        assert_eq!(format_amount(Decimal::new(12_345_678, 4)), "₨1234.57");
    }

    #[test]
    fn reads_numbers_and_strings() {
        assert_eq!(
            from_wire(&serde_json::json!(799)),
            Some(Decimal::from(799))
        );
        assert_eq!(
            from_wire(&serde_json::json!(" 120.50 ")),
            Some(Decimal::new(12050, 2))
        );
        assert_eq!(from_wire(&serde_json::json!(null)), None);
        assert_eq!(from_wire(&serde_json::json!("not-a-number")), None);
    }
}
