//! Ranked list of tax-free gifts a family can still make.
//!
//! Only gifts towards descendants are planned. Entries are ranked by
//! priority (cash-gift scheme first), then by available amount, largest
//! first.

use std::cmp::Reverse;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::allowance::AllowanceSimulator;
use crate::calculations::classifier::classify;
use crate::calculations::common::today;
use crate::genealogy::GraphError;
use crate::models::{PersonId, RelationshipCode, TaxSystem};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub donor: PersonId,
    pub beneficiary: PersonId,
    pub label: String,
    pub available: Decimal,
    pub relationship_code: RelationshipCode,
    pub tax_system: TaxSystem,
    /// 1 for the cash-gift scheme, 2 for everything else.
    pub priority: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct FamilyPlanner<'a> {
    simulator: AllowanceSimulator<'a>,
}

impl<'a> FamilyPlanner<'a> {
    pub fn new(simulator: AllowanceSimulator<'a>) -> Self {
        Self { simulator }
    }

    /// Plans gifts between every ordered pair drawn from `people`.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownPerson`] when an id is not in the graph.
    pub fn plan(
        &self,
        people: &[PersonId],
        reference: Option<NaiveDate>,
    ) -> Result<Vec<PlanEntry>, GraphError> {
        let reference = reference.unwrap_or_else(today);
        let graph = self.simulator.graph();
        let mut entries = Vec::new();

        for &donor in people {
            for &beneficiary in people {
                if donor == beneficiary {
                    continue;
                }
                if !classify(graph, donor, beneficiary).is_descending() {
                    continue;
                }

                let simulation = self.simulator.simulate(donor, beneficiary, Some(reference))?;
                for rule in simulation.usable_rules() {
                    let priority = rule.tax_system.bucket().priority();
                    entries.push(PlanEntry {
                        donor,
                        beneficiary,
                        label: rule.label.clone(),
                        available: rule.available,
                        relationship_code: simulation.relationship_code,
                        tax_system: rule.tax_system,
                        priority,
                    });
                }
            }
        }

        entries.sort_by_key(|e| (e.priority, Reverse(e.available)));
        Ok(entries)
    }
}
