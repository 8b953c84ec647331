//! Remaining tax-free allowance between a donor and a beneficiary.
//!
//! Every other calculation in this crate either feeds the simulator or
//! aggregates its output. For a pair of people and a reference date it:
//!
//! 1. Rejects every rule when either party has died by the reference date.
//! 2. Classifies the relationship.
//! 3. Resolves the rules attached to that relationship.
//! 4. Sums what the donor already gave inside the recall window.
//! 5. Checks each rule's age limits at the reference date and reports the
//!    ceiling left over after prior gifts in the rule's bucket.
//!
//! Domain edge cases never fail. An ineligible rule is reported with zero
//! available and a [`RuleRejection`] explaining why.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use chrono::NaiveDate;
//! use donation_core::{EngineConfig, FamilyGraph};
//! use donation_core::calculations::AllowanceSimulator;
//! use donation_core::models::{Gender, OwnerId, Person, RelationshipCode};
//!
//! let reference = EngineConfig::french_reference()
//!     .and_then(EngineConfig::into_reference_data)
//!     .unwrap();
//!
//! let mut graph = FamilyGraph::new();
//! let owner = OwnerId(1);
//! let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
//! let parent = graph.add_person(Person::new("Jean", "Martin", Gender::Male, date(1970, 3, 1), owner));
//! let child = graph.add_person(Person::new("Marc", "Martin", Gender::Male, date(2000, 6, 1), owner));
//! graph.link_parent(parent, child).unwrap();
//!
//! let simulator = AllowanceSimulator::new(&graph, &reference.rules, reference.recall_window_years);
//! let result = simulator.simulate(parent, child, Some(date(2026, 1, 1))).unwrap();
//!
//! assert_eq!(result.relationship_code, RelationshipCode::Enfant);
//! assert_eq!(result.total_available, dec!(131865));
//! ```

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::FamilyGraph;
use crate::calculations::classifier::classify;
use crate::calculations::common::{non_negative, today};
use crate::calculations::consumption::{ConsumedAmounts, ConsumptionAccumulator};
use crate::genealogy::GraphError;
use crate::models::{DonationRule, Person, PersonId, RelationshipCode, TaxSystem};
use crate::rules::RuleRepository;

/// Why a rule yields nothing for a pair at a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleRejection {
    DonorDeceased { on: NaiveDate },
    BeneficiaryDeceased { on: NaiveDate },
    DonorTooOld { at: NaiveDate, max_age: u32 },
    BeneficiaryTooYoung { at: NaiveDate, min_age: u32 },
}

impl fmt::Display for RuleRejection {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::DonorDeceased { on } => {
                write!(f, "Donateur décédé le {}", on.format("%d/%m/%Y"))
            }
            Self::BeneficiaryDeceased { on } => {
                write!(f, "Bénéficiaire décédé le {}", on.format("%d/%m/%Y"))
            }
            Self::DonorTooOld { at, max_age } => write!(
                f,
                "Âge limite atteint au {} (> {} ans)",
                at.format("%d/%m/%Y"),
                max_age
            ),
            Self::BeneficiaryTooYoung { at, min_age } => write!(
                f,
                "Bénéficiaire trop jeune au {} (< {} ans)",
                at.format("%d/%m/%Y"),
                min_age
            ),
        }
    }
}

/// Outcome of one rule for one pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleAllowance {
    pub label: String,
    pub tax_system: TaxSystem,

    /// Allowance granted by the rule, before prior gifts.
    pub ceiling: Decimal,

    /// Prior gifts in this rule's bucket inside the recall window.
    pub consumed: Decimal,

    /// What can still be given tax-free under this rule. Zero when invalid.
    pub available: Decimal,

    pub is_valid: bool,
    pub reason: Option<RuleRejection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceSimulation {
    pub donor: PersonId,
    pub beneficiary: PersonId,
    pub relationship_code: RelationshipCode,
    pub reference_date: NaiveDate,
    pub rules: Vec<RuleAllowance>,

    /// Sum of `available` over valid rules.
    pub total_available: Decimal,
}

impl AllowanceSimulation {
    /// Valid rules that still leave something to give.
    pub fn usable_rules(&self) -> impl Iterator<Item = &RuleAllowance> + '_ {
        self.rules
            .iter()
            .filter(|r| r.is_valid && r.available > Decimal::ZERO)
    }
}

/// Computes remaining allowances over a family graph.
#[derive(Clone, Copy)]
pub struct AllowanceSimulator<'a> {
    graph: &'a FamilyGraph,
    rules: &'a dyn RuleRepository,
    recall_window_years: u32,
}

impl fmt::Debug for AllowanceSimulator<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("AllowanceSimulator")
            .field("people", &self.graph.len())
            .field("recall_window_years", &self.recall_window_years)
            .finish()
    }
}

impl<'a> AllowanceSimulator<'a> {
    pub fn new(
        graph: &'a FamilyGraph,
        rules: &'a dyn RuleRepository,
        recall_window_years: u32,
    ) -> Self {
        Self {
            graph,
            rules,
            recall_window_years,
        }
    }

    pub fn graph(&self) -> &'a FamilyGraph {
        self.graph
    }

    pub fn rules(&self) -> &'a dyn RuleRepository {
        self.rules
    }

    pub fn recall_window_years(&self) -> u32 {
        self.recall_window_years
    }

    /// Simulates the allowances from `donor` to `beneficiary` at `reference`,
    /// or today when no date is given.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownPerson`] when either id is not in the graph, and
    /// [`GraphError::SelfDonation`] when both ids are the same person.
    pub fn simulate(
        &self,
        donor: PersonId,
        beneficiary: PersonId,
        reference: Option<NaiveDate>,
    ) -> Result<AllowanceSimulation, GraphError> {
        let reference = reference.unwrap_or_else(today);
        let donor_person = self.person(donor)?;
        let beneficiary_person = self.person(beneficiary)?;
        if donor == beneficiary {
            return Err(GraphError::SelfDonation(donor));
        }

        let relationship_code = classify(self.graph, donor, beneficiary);
        let applicable = self.rules.rules_for(relationship_code);

        let deceased = deceased_rejection(donor_person, beneficiary_person, reference);
        let rules: Vec<RuleAllowance> = match deceased {
            Some(rejection) => {
                debug!(
                    donor = donor.0,
                    beneficiary = beneficiary.0,
                    %rejection,
                    "simulation for deceased party"
                );
                applicable
                    .iter()
                    .map(|rule| rejected(rule, Decimal::ZERO, rejection))
                    .collect()
            }
            None => {
                let consumed = ConsumptionAccumulator::new(self.graph, self.recall_window_years)
                    .consumed_amounts(donor, beneficiary, reference);
                let donor_age = donor_person.age_at(reference);
                let beneficiary_age = beneficiary_person.age_at(reference);

                applicable
                    .iter()
                    .map(|rule| {
                        evaluate(rule, &consumed, donor_age, beneficiary_age, reference)
                    })
                    .collect()
            }
        };

        let total_available = total_of_valid(&rules);

        Ok(AllowanceSimulation {
            donor,
            beneficiary,
            relationship_code,
            reference_date: reference,
            rules,
            total_available,
        })
    }

    fn person(
        &self,
        id: PersonId,
    ) -> Result<&'a Person, GraphError> {
        self.graph.person(id).ok_or(GraphError::UnknownPerson(id))
    }
}

fn deceased_rejection(
    donor: &Person,
    beneficiary: &Person,
    reference: NaiveDate,
) -> Option<RuleRejection> {
    if donor.is_deceased_at(reference) {
        return donor.death_date.map(|on| RuleRejection::DonorDeceased { on });
    }
    if beneficiary.is_deceased_at(reference) {
        return beneficiary
            .death_date
            .map(|on| RuleRejection::BeneficiaryDeceased { on });
    }
    None
}

fn rejected(
    rule: &DonationRule,
    consumed: Decimal,
    reason: RuleRejection,
) -> RuleAllowance {
    RuleAllowance {
        label: rule.label.clone(),
        tax_system: rule.tax_system,
        ceiling: rule.allowance_amount,
        consumed,
        available: Decimal::ZERO,
        is_valid: false,
        reason: Some(reason),
    }
}

fn evaluate(
    rule: &DonationRule,
    consumed: &ConsumedAmounts,
    donor_age: u32,
    beneficiary_age: u32,
    reference: NaiveDate,
) -> RuleAllowance {
    let already_given = consumed.for_bucket(rule.tax_system.bucket());

    // The beneficiary check is reported when both limits fail.
    if beneficiary_age < rule.receiver_min_age {
        return rejected(
            rule,
            already_given,
            RuleRejection::BeneficiaryTooYoung {
                at: reference,
                min_age: rule.receiver_min_age,
            },
        );
    }
    if donor_age >= rule.donor_max_age {
        return rejected(
            rule,
            already_given,
            RuleRejection::DonorTooOld {
                at: reference,
                max_age: rule.donor_max_age,
            },
        );
    }

    RuleAllowance {
        label: rule.label.clone(),
        tax_system: rule.tax_system,
        ceiling: rule.allowance_amount,
        consumed: already_given,
        available: non_negative(rule.allowance_amount - already_given),
        is_valid: true,
        reason: None,
    }
}

fn total_of_valid(rules: &[RuleAllowance]) -> Decimal {
    rules
        .iter()
        .filter(|r| r.is_valid)
        .map(|r| r.available)
        .sum()
}
