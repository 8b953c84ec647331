//! Gift tax avoided by giving an amount under an allowance.
//!
//! The tax is computed slice by slice over the progressive schedule of the
//! relationship's bracket category: each slice taxes the part of the amount
//! between the previous limit and its own limit at its own rate. The last
//! slice is unbounded.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use donation_core::EngineConfig;
//! use donation_core::calculations::TaxSavingCalculator;
//! use donation_core::models::RelationshipCode;
//!
//! let brackets = EngineConfig::french_reference()
//!     .and_then(|c| c.bracket_table())
//!     .unwrap();
//! let calculator = TaxSavingCalculator::new(&brackets);
//!
//! assert_eq!(calculator.saving(dec!(100000), RelationshipCode::Enfant), dec!(18194.35));
//! ```

use rust_decimal::Decimal;
use tracing::warn;

use crate::calculations::common::round_half_up;
use crate::models::{BracketCategory, RelationshipCode};
use crate::rules::BracketTable;

#[derive(Debug, Clone, Copy)]
pub struct TaxSavingCalculator<'a> {
    brackets: &'a BracketTable,
}

impl<'a> TaxSavingCalculator<'a> {
    pub fn new(brackets: &'a BracketTable) -> Self {
        Self { brackets }
    }

    /// Tax that a gift of `amount` along `code` would have cost without an
    /// allowance.
    pub fn saving(
        &self,
        amount: Decimal,
        code: RelationshipCode,
    ) -> Decimal {
        self.tax_for_category(amount, BracketCategory::for_relationship(code))
    }

    /// Progressive tax on `amount` under `category`'s schedule, rounded to
    /// the cent. Zero for non-positive amounts or an unconfigured category.
    pub fn tax_for_category(
        &self,
        amount: Decimal,
        category: BracketCategory,
    ) -> Decimal {
        if amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let Some(schedule) = self.brackets.schedule(category) else {
            warn!(%category, "no tax brackets configured");
            return Decimal::ZERO;
        };

        let mut remaining = amount;
        let mut previous_limit = Decimal::ZERO;
        let mut tax = Decimal::ZERO;

        for bracket in schedule {
            if remaining <= Decimal::ZERO {
                break;
            }
            let taxable = match bracket.amount_limit {
                Some(limit) => remaining.min(limit - previous_limit),
                None => remaining,
            };
            tax += taxable * bracket.rate;
            remaining -= taxable;
            if let Some(limit) = bracket.amount_limit {
                previous_limit = limit;
            }
        }

        round_half_up(tax)
    }
}
