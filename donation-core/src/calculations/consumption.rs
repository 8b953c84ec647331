//! Prior gifts that still count against an allowance.
//!
//! A gift counts when it went from the same donor to the same beneficiary,
//! was made on or before the reference date, and falls inside the recall
//! window ending on that date. The window's first day is included.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::FamilyGraph;
use crate::calculations::common::years_before;
use crate::models::{AllowanceBucket, PersonId};

/// Amounts already given inside the recall window, per bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumedAmounts {
    pub classic: Decimal,
    pub bonus: Decimal,
}

impl ConsumedAmounts {
    pub fn for_bucket(
        &self,
        bucket: AllowanceBucket,
    ) -> Decimal {
        match bucket {
            AllowanceBucket::Classic => self.classic,
            AllowanceBucket::Bonus => self.bonus,
        }
    }

    /// Saturates at [`Decimal::MAX`], which already exceeds any ceiling.
    fn add(
        &mut self,
        bucket: AllowanceBucket,
        amount: Decimal,
    ) {
        let total = match bucket {
            AllowanceBucket::Classic => &mut self.classic,
            AllowanceBucket::Bonus => &mut self.bonus,
        };
        *total = total.saturating_add(amount);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConsumptionAccumulator<'a> {
    graph: &'a FamilyGraph,
    window_years: u32,
}

impl<'a> ConsumptionAccumulator<'a> {
    pub fn new(
        graph: &'a FamilyGraph,
        window_years: u32,
    ) -> Self {
        Self {
            graph,
            window_years,
        }
    }

    /// First day of the recall window ending on `reference`.
    pub fn window_start(
        &self,
        reference: NaiveDate,
    ) -> NaiveDate {
        years_before(reference, self.window_years)
    }

    pub fn is_within_window(
        &self,
        date: NaiveDate,
        reference: NaiveDate,
    ) -> bool {
        date <= reference && date >= self.window_start(reference)
    }

    pub fn consumed_amounts(
        &self,
        donor: PersonId,
        beneficiary: PersonId,
        reference: NaiveDate,
    ) -> ConsumedAmounts {
        let mut totals = ConsumedAmounts::default();

        for donation in self.graph.donations_received(beneficiary) {
            if donation.donor == donor && self.is_within_window(donation.created_at, reference) {
                totals.add(donation.tax_system.bucket(), donation.amount);
            }
        }

        totals
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::TaxSystem;
    use crate::testing::{FamilyBuilder, date};

    const REFERENCE: (i32, u32, u32) = (2026, 10, 16);

    fn reference() -> NaiveDate {
        date(REFERENCE.0, REFERENCE.1, REFERENCE.2)
    }

    #[test]
    fn sums_gifts_from_the_same_donor_only() {
        let mut b = FamilyBuilder::new();
        let jean = b.person("Jean", date(1972, 10, 25));
        let claire = b.person("Claire", date(1974, 3, 3));
        let marc = b.person("Marc", date(2002, 1, 10));
        b.donate(jean, marc, dec!(30000), date(2020, 1, 1), TaxSystem::ProgressifDirect);
        b.donate(jean, marc, dec!(10000), date(2022, 1, 1), TaxSystem::ProgressifDirect);
        b.donate(claire, marc, dec!(50000), date(2021, 1, 1), TaxSystem::ProgressifDirect);
        let graph = b.build();

        let consumed =
            ConsumptionAccumulator::new(&graph, 15).consumed_amounts(jean, marc, reference());

        assert_eq!(consumed.classic, dec!(40000));
        assert_eq!(consumed.bonus, dec!(0));
    }

    #[test]
    fn ignores_gifts_in_the_opposite_direction() {
        let mut b = FamilyBuilder::new();
        let jean = b.person("Jean", date(1972, 10, 25));
        let marc = b.person("Marc", date(2002, 1, 10));
        b.donate(marc, jean, dec!(5000), date(2024, 1, 1), TaxSystem::ProgressifDirect);
        let graph = b.build();

        let consumed =
            ConsumptionAccumulator::new(&graph, 15).consumed_amounts(jean, marc, reference());

        assert_eq!(consumed, ConsumedAmounts::default());
    }

    #[test]
    fn splits_cash_gift_scheme_into_bonus_bucket() {
        let mut b = FamilyBuilder::new();
        let jean = b.person("Jean", date(1972, 10, 25));
        let marc = b.person("Marc", date(2002, 1, 10));
        b.donate(jean, marc, dec!(20000), date(2023, 5, 1), TaxSystem::ProgressifDirect);
        b.donate(jean, marc, dec!(31865), date(2023, 5, 1), TaxSystem::DonFamilial);
        let graph = b.build();

        let consumed =
            ConsumptionAccumulator::new(&graph, 15).consumed_amounts(jean, marc, reference());

        assert_eq!(consumed.for_bucket(AllowanceBucket::Classic), dec!(20000));
        assert_eq!(consumed.for_bucket(AllowanceBucket::Bonus), dec!(31865));
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let mut b = FamilyBuilder::new();
        let jean = b.person("Jean", date(1972, 10, 25));
        let marc = b.person("Marc", date(2002, 1, 10));
        b.donate(jean, marc, dec!(1000), date(2011, 10, 16), TaxSystem::ProgressifDirect);
        let graph = b.build();

        let consumed =
            ConsumptionAccumulator::new(&graph, 15).consumed_amounts(jean, marc, reference());

        assert_eq!(consumed.classic, dec!(1000));
    }

    #[test]
    fn gift_one_day_older_than_window_is_excluded() {
        let mut b = FamilyBuilder::new();
        let jean = b.person("Jean", date(1972, 10, 25));
        let marc = b.person("Marc", date(2002, 1, 10));
        b.donate(jean, marc, dec!(1000), date(2011, 10, 15), TaxSystem::ProgressifDirect);
        let graph = b.build();

        let consumed =
            ConsumptionAccumulator::new(&graph, 15).consumed_amounts(jean, marc, reference());

        assert_eq!(consumed.classic, dec!(0));
    }

    #[test]
    fn gifts_after_reference_date_are_excluded() {
        let mut b = FamilyBuilder::new();
        let jean = b.person("Jean", date(1972, 10, 25));
        let marc = b.person("Marc", date(2002, 1, 10));
        b.donate(jean, marc, dec!(1000), date(2026, 10, 16), TaxSystem::ProgressifDirect);
        b.donate(jean, marc, dec!(2000), date(2026, 10, 17), TaxSystem::ProgressifDirect);
        let graph = b.build();

        let consumed =
            ConsumptionAccumulator::new(&graph, 15).consumed_amounts(jean, marc, reference());

        assert_eq!(consumed.classic, dec!(1000));
    }

    #[test]
    fn window_length_comes_from_constructor() {
        let mut b = FamilyBuilder::new();
        let jean = b.person("Jean", date(1972, 10, 25));
        let marc = b.person("Marc", date(2002, 1, 10));
        b.donate(jean, marc, dec!(1000), date(2015, 1, 1), TaxSystem::ProgressifDirect);
        let graph = b.build();

        let accumulator = ConsumptionAccumulator::new(&graph, 6);

        assert_eq!(accumulator.window_start(reference()), date(2020, 10, 16));
        assert_eq!(accumulator.consumed_amounts(jean, marc, reference()).classic, dec!(0));
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let mut b = FamilyBuilder::new();
        let jean = b.person("Jean", date(1972, 10, 25));
        let marc = b.person("Marc", date(2002, 1, 10));
        b.donate(jean, marc, Decimal::MAX, date(2020, 1, 1), TaxSystem::ProgressifDirect);
        b.donate(jean, marc, Decimal::MAX, date(2021, 1, 1), TaxSystem::ProgressifDirect);
        b.donate(jean, marc, dec!(500), date(2022, 1, 1), TaxSystem::DonFamilial);
        let graph = b.build();

        let consumed =
            ConsumptionAccumulator::new(&graph, 15).consumed_amounts(jean, marc, reference());

        assert_eq!(consumed.classic, Decimal::MAX);
        assert_eq!(consumed.bonus, dec!(500));
    }
}
