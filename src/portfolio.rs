//! Portfolio valuation and display formatting
//!
//! Combines a native-token balance and a unit price into a
//! [`PortfolioSnapshot`] and renders it for the agent. All arithmetic is
//! arbitrary-precision decimal; chains carry 9 to 18 decimal places and
//! floating point drifts at that precision. Rounding happens only at the
//! presentation boundary (2 decimal places for the quote currency, 4 for
//! native units).

use chrono::Utc;
use rust_decimal::Decimal;

use crate::types::PortfolioSnapshot;

/// Value a native balance at a unit price
///
/// `total_quote_value = native_amount * unit_price`, unrounded. The snapshot
/// is immutable once constructed; a fresh one is built on every cold cache
/// path.
pub fn valuate(native_amount: Decimal, unit_price: Decimal) -> PortfolioSnapshot {
    PortfolioSnapshot {
        total_quote_value: native_amount * unit_price,
        total_native_units: native_amount,
        taken_at: Utc::now(),
    }
}

/// Render a snapshot as the three-line wallet report
///
/// Pure function: fixed line order and whitespace, no I/O. The native symbol
/// labels the parenthesized native total (e.g. "SOL", "APT").
pub fn format_portfolio(
    snapshot: &PortfolioSnapshot,
    identity_label: &str,
    address: &str,
    native_symbol: &str,
) -> String {
    format!(
        "{identity_label}\nWallet Address: {address}\nTotal Value: ${} ({} {native_symbol})",
        snapshot.quote_display(),
        snapshot.native_display(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_valuate_exact_precision() {
        let snapshot = valuate(dec!(123.456789123), dec!(2.5));

        // Exact decimal product, no floating-point drift at the 10th
        // decimal place the way an f64 product can be.
        assert_eq!(snapshot.total_quote_value, dec!(308.6419728075));
        assert_eq!(snapshot.total_native_units, dec!(123.456789123));

        // Rounding only at the presentation boundary.
        assert_eq!(snapshot.quote_display(), "308.64");
        assert_eq!(snapshot.native_display(), "123.4568");
    }

    #[test]
    fn test_valuate_high_decimal_chain() {
        // 18-decimal native amount, as on EVM-style chains.
        let snapshot = valuate(dec!(0.000000000000000001), dec!(3000));
        assert_eq!(snapshot.total_quote_value, dec!(0.000000000000003));
        assert_eq!(snapshot.quote_display(), "0.00");
    }

    #[test]
    fn test_valuate_zero_balance() {
        let snapshot = valuate(dec!(0), dec!(142.35));
        assert_eq!(snapshot.total_quote_value, dec!(0));
        assert_eq!(snapshot.quote_display(), "0.00");
        assert_eq!(snapshot.native_display(), "0.0000");
    }

    #[test]
    fn test_format_three_line_block() {
        let snapshot = valuate(dec!(123.456789123), dec!(2.5));
        let report = format_portfolio(&snapshot, "Agent-X", "0xABC", "SOL");

        assert_eq!(
            report,
            "Agent-X\nWallet Address: 0xABC\nTotal Value: $308.64 (123.4568 SOL)"
        );
        assert_eq!(report.lines().count(), 3);
    }

    #[test]
    fn test_format_is_deterministic() {
        let snapshot = valuate(dec!(1), dec!(10));
        let first = format_portfolio(&snapshot, "Agent-X", "0xABC", "APT");
        let second = format_portfolio(&snapshot, "Agent-X", "0xABC", "APT");
        assert_eq!(first, second);
    }
}
