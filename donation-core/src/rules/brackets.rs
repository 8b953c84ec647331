use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::config::ConfigError;
use crate::models::{BracketCategory, TaxBracket};

/// Progressive schedules grouped by category, each sorted by ascending
/// limit and ending with a single unbounded slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketTable {
    schedules: BTreeMap<BracketCategory, Vec<TaxBracket>>,
}

impl BracketTable {
    /// Groups and sorts `brackets`, then checks every schedule.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::InvalidRate`] - a rate outside `0..=1`
    /// * [`ConfigError::UnorderedBrackets`] - two slices share a limit or a
    ///   limit is not positive
    /// * [`ConfigError::MissingUnboundedBracket`] - a schedule has no
    ///   unbounded slice, or more than one
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, ConfigError> {
        let mut schedules: BTreeMap<BracketCategory, Vec<TaxBracket>> = BTreeMap::new();
        for bracket in brackets {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(ConfigError::InvalidRate {
                    category: bracket.category,
                    rate: bracket.rate,
                });
            }
            schedules.entry(bracket.category).or_default().push(bracket);
        }

        for (category, schedule) in schedules.iter_mut() {
            // None sorts last so the unbounded slice ends the schedule.
            schedule.sort_by_key(|b| b.amount_limit.unwrap_or(Decimal::MAX));
            Self::check_schedule(*category, schedule)?;
        }

        Ok(Self { schedules })
    }

    fn check_schedule(
        category: BracketCategory,
        schedule: &[TaxBracket],
    ) -> Result<(), ConfigError> {
        let unbounded = schedule.iter().filter(|b| b.amount_limit.is_none()).count();
        if unbounded != 1 || schedule.last().is_some_and(|b| b.amount_limit.is_some()) {
            return Err(ConfigError::MissingUnboundedBracket(category));
        }

        let mut previous = Decimal::ZERO;
        for limit in schedule.iter().filter_map(|b| b.amount_limit) {
            if limit <= previous {
                return Err(ConfigError::UnorderedBrackets { category, limit });
            }
            previous = limit;
        }
        Ok(())
    }

    pub fn schedule(
        &self,
        category: BracketCategory,
    ) -> Option<&[TaxBracket]> {
        self.schedules.get(&category).map(Vec::as_slice)
    }

    pub fn categories(&self) -> impl Iterator<Item = BracketCategory> + '_ {
        self.schedules.keys().copied()
    }
}
