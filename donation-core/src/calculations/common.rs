//! Shared helpers for allowance and tax calculations: money rounding and
//! calendar arithmetic on reference dates.

use chrono::{Local, Months, NaiveDate};
use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use donation_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(403.605)), dec!(403.61));
/// assert_eq!(round_half_up(dec!(403.604)), dec!(403.60));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `value`, or zero when it is negative.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use donation_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(60000)), dec!(60000));
/// assert_eq!(non_negative(dec!(-250)), dec!(0));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Today's date in the local time zone, used when no reference date is given.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `date` moved back by whole years. February 29 lands on February 28 when
/// the target year is not a leap year.
pub fn years_before(
    date: NaiveDate,
    years: u32,
) -> NaiveDate {
    date.checked_sub_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MIN)
}

/// `date` moved forward by whole years, with the same leap-day handling as
/// [`years_before`].
pub fn years_after(
    date: NaiveDate,
    years: u32,
) -> NaiveDate {
    date.checked_add_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn date(
        y: i32,
        m: u32,
        d: u32,
    ) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_preserves_whole_amounts() {
        assert_eq!(round_half_up(dec!(100000)), dec!(100000.00));
    }

    // =========================================================================
    // non_negative tests
    // =========================================================================

    #[test]
    fn non_negative_keeps_positive_values() {
        assert_eq!(non_negative(dec!(1.50)), dec!(1.50));
    }

    #[test]
    fn non_negative_clamps_negative_values() {
        assert_eq!(non_negative(dec!(-0.01)), dec!(0));
    }

    #[test]
    fn non_negative_keeps_zero() {
        assert_eq!(non_negative(dec!(0)), dec!(0));
    }

    // =========================================================================
    // calendar tests
    // =========================================================================

    #[test]
    fn years_before_keeps_day_and_month() {
        assert_eq!(years_before(date(2026, 10, 16), 15), date(2011, 10, 16));
    }

    #[test]
    fn years_after_keeps_day_and_month() {
        assert_eq!(years_after(date(2011, 10, 16), 15), date(2026, 10, 16));
    }

    #[test]
    fn leap_day_clamps_to_end_of_february() {
        assert_eq!(years_before(date(2024, 2, 29), 15), date(2009, 2, 28));
        assert_eq!(years_after(date(2024, 2, 29), 1), date(2025, 2, 28));
    }

    #[test]
    fn zero_years_is_identity() {
        assert_eq!(years_before(date(2020, 5, 5), 0), date(2020, 5, 5));
        assert_eq!(years_after(date(2020, 5, 5), 0), date(2020, 5, 5));
    }
}
