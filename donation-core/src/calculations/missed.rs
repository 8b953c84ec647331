//! Allowances a family let lapse or never used.
//!
//! Each recorded gift opens an allowance cycle that lasts the matching
//! rule's `frequency_years`. Once the cycle has ended, whatever the gift left
//! below the ceiling is lost. Pairs that never exchanged a gift contribute
//! their full simulated allowance.

use std::cmp::Reverse;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::allowance::AllowanceSimulator;
use crate::calculations::classifier::classify;
use crate::calculations::common::{non_negative, today, years_after};
use crate::genealogy::GraphError;
use crate::models::{Donation, DonationId, DonationRule, OwnerId, PersonId, TaxSystem};

/// The allowance cycle opened by one recorded gift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowancePeriod {
    pub donation: DonationId,
    pub donor: PersonId,
    pub beneficiary: PersonId,
    pub tax_system: TaxSystem,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub ceiling: Decimal,
    pub used: Decimal,
    /// Part of the ceiling the gift left unused.
    pub unoptimized: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeverUsedOpportunity {
    pub donor: PersonId,
    pub beneficiary: PersonId,
    pub label: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissedOpportunityAnalysis {
    /// Cycles still running, newest first.
    pub active_periods: Vec<AllowancePeriod>,
    /// Cycles that ended before the reference date, newest first.
    pub expired_periods: Vec<AllowancePeriod>,
    pub never_used: Vec<NeverUsedOpportunity>,
    /// Unused remainder of expired cycles plus every never-used amount.
    pub total_missed: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct MissedOpportunityAnalyzer<'a> {
    simulator: AllowanceSimulator<'a>,
}

impl<'a> MissedOpportunityAnalyzer<'a> {
    pub fn new(simulator: AllowanceSimulator<'a>) -> Self {
        Self { simulator }
    }

    /// Analyzes every gift made by a member of `owner`'s family, and every
    /// pair of members that never exchanged one, as of `reference` (today
    /// when `None`).
    ///
    /// # Errors
    ///
    /// Propagates [`GraphError`] from the simulator. Members returned by the
    /// graph are always known, so this only fails on an inconsistent graph.
    pub fn analyze(
        &self,
        owner: OwnerId,
        reference: Option<NaiveDate>,
    ) -> Result<MissedOpportunityAnalysis, GraphError> {
        let reference = reference.unwrap_or_else(today);
        let graph = self.simulator.graph();
        let people = graph.people_of(owner);
        let mut analysis = MissedOpportunityAnalysis::default();

        for &person in &people {
            for donation in graph.donations_given(person) {
                let Some(rule) = self.rule_for(donation) else {
                    debug!(
                        donation = donation.id.0,
                        tax_system = %donation.tax_system,
                        "no rule matches donation, skipped"
                    );
                    continue;
                };

                let period = period_for(donation, rule);
                if period.end_date < reference {
                    analysis.total_missed += period.unoptimized;
                    analysis.expired_periods.push(period);
                } else {
                    analysis.active_periods.push(period);
                }
            }
        }

        for &donor in &people {
            for &beneficiary in &people {
                if donor == beneficiary || !graph.donations_between(donor, beneficiary).is_empty() {
                    continue;
                }

                let simulation = self.simulator.simulate(donor, beneficiary, Some(reference))?;
                for rule in simulation.usable_rules() {
                    analysis.total_missed += rule.available;
                    analysis.never_used.push(NeverUsedOpportunity {
                        donor,
                        beneficiary,
                        label: rule.label.clone(),
                        amount: rule.available,
                    });
                }
            }
        }

        analysis
            .active_periods
            .sort_by_key(|p| Reverse(p.start_date));
        analysis
            .expired_periods
            .sort_by_key(|p| Reverse(p.start_date));

        Ok(analysis)
    }

    fn rule_for(
        &self,
        donation: &Donation,
    ) -> Option<&'a DonationRule> {
        let code = classify(self.simulator.graph(), donation.donor, donation.beneficiary);
        self.simulator.rules().rule_for(code, donation.tax_system)
    }
}

fn period_for(
    donation: &Donation,
    rule: &DonationRule,
) -> AllowancePeriod {
    AllowancePeriod {
        donation: donation.id,
        donor: donation.donor,
        beneficiary: donation.beneficiary,
        tax_system: donation.tax_system,
        start_date: donation.created_at,
        end_date: years_after(donation.created_at, rule.frequency_years),
        ceiling: rule.allowance_amount,
        used: donation.amount,
        unoptimized: non_negative(rule.allowance_amount - donation.amount),
    }
}
